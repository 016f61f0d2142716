mod display;

use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event},
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use space_glide::entities::Bounds;
use space_glide::playfield::Starfield;
use space_glide::profile::{CharacterProfile, Profiles};
use space_glide::scheduler::SystemClock;
use space_glide::session::{run as play_session, LoopConfig, Outcome, Session, Summary};

use display::{key_char, TerminalSurface};

/// Side-scrolling terminal space shooter.
#[derive(Parser, Debug)]
#[command(name = "space_glide", version, about)]
struct Args {
    /// Directory holding characters.json, levels.json and settings.json.
    /// Built-in profiles are used when omitted.
    #[arg(long, value_name = "DIR")]
    config_dir: Option<PathBuf>,
    /// Start straight at this level, skipping the level menu once.
    #[arg(long, value_name = "N")]
    level: Option<u32>,
    /// Character to fly (defaults to the first one listed).
    #[arg(long, value_name = "NAME")]
    character: Option<String>,
    /// Seed for a reproducible starfield and spawn pattern.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Where log output goes; the terminal itself is busy.
    #[arg(long, value_name = "PATH", default_value = "/tmp/space-glide.log")]
    log_file: PathBuf,
}

fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Menus ─────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(u32),
    Quit,
}

enum GameOverChoice {
    Retry,
    Levels,
    Quit,
}

fn level_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    profiles: &Profiles,
) -> std::io::Result<MenuResult> {
    display::draw_level_menu(out, &profiles.levels, &profiles.controls)?;

    // Block until the user makes a choice
    loop {
        let Ok(event) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        match key_char(&event) {
            Some('q') | Some('Q') | Some('\u{1b}') | Some('\u{3}') => return Ok(MenuResult::Quit),
            Some(c) => {
                if let Some(n) = c.to_digit(10) {
                    if profiles.level(n).is_ok() {
                        return Ok(MenuResult::Start(n));
                    }
                }
            }
            None => {}
        }
    }
}

fn game_over_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    summary: &Summary,
) -> std::io::Result<GameOverChoice> {
    // Keys mashed during play must not pick a menu entry.
    while rx.try_recv().is_ok() {}
    display::draw_game_over(out, summary)?;

    loop {
        let Ok(event) = rx.recv() else {
            return Ok(GameOverChoice::Quit);
        };
        match key_char(&event) {
            Some('1') => return Ok(GameOverChoice::Retry),
            Some('2') => return Ok(GameOverChoice::Levels),
            Some('q') | Some('Q') | Some('\u{1b}') | Some('\u{3}') => {
                return Ok(GameOverChoice::Quit);
            }
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Level menu → session → game-over menu, until the player quits.
fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    profiles: &Profiles,
    character: &CharacterProfile,
    mut next_level: Option<u32>,
    rng: &mut StdRng,
) -> space_glide::Result<()> {
    loop {
        let number = match next_level.take() {
            Some(n) => n,
            None => match level_menu(out, rx, profiles)? {
                MenuResult::Start(n) => n,
                MenuResult::Quit => break,
            },
        };
        let level = profiles.level(number)?;

        let (cols, rows) = terminal::size()?;
        let viewport = Bounds::new(i32::from(rows), i32::from(cols));
        let starfield = Starfield::generate(viewport, rng);
        let mut session = Session::new(character, level, viewport, starfield.width());

        let summary = {
            let mut surface = TerminalSurface::new(out, rx, viewport);
            play_session(
                &mut session,
                &mut surface,
                &starfield,
                &profiles.controls,
                &SystemClock,
                &LoopConfig::default(),
                rng,
            )?
        };

        if summary.outcome == Outcome::Abandoned {
            break;
        }
        match game_over_menu(out, rx, &summary)? {
            GameOverChoice::Retry => next_level = Some(number),
            GameOverChoice::Levels => {}
            GameOverChoice::Quit => break,
        }
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> space_glide::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    // Configuration problems are fatal, and reported before the terminal
    // is taken over.
    let profiles = match &args.config_dir {
        Some(dir) => Profiles::load(dir)?,
        None => Profiles::builtin(),
    };
    let character = profiles.character(args.character.as_deref())?.clone();
    if let Some(n) = args.level {
        profiles.level(n)?;
    }
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &profiles, &character, args.level, &mut rng);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("{e}");
    }
    result
}
