/// Rendering layer: all terminal I/O lives here.
///
/// `TerminalSurface` is the crossterm-backed `Surface` the session draws
/// on.  Draw calls land in a back buffer; `refresh` writes the frame out
/// row by row, and only when it differs from the last one written.  The
/// menu screens are drawn straight to the writer.

use std::io::Write;
use std::sync::mpsc;

use crossterm::{
    cursor,
    event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_glide::entities::Bounds;
use space_glide::profile::{ControlBinding, LevelProfile};
use space_glide::session::{Outcome, Summary};
use space_glide::surface::{Canvas, Cell, Surface, Tint};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_TITLE: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;
const C_TEXT: Color = Color::White;
const C_SCORE: Color = Color::Yellow;
const C_FAILED: Color = Color::Red;
const C_COMPLETE: Color = Color::Green;

fn color_of(tint: Tint) -> Color {
    match tint {
        Tint::Default => Color::Reset,
        Tint::White => Color::White,
        Tint::Yellow => Color::Yellow,
        Tint::Magenta => Color::Magenta,
        Tint::Red => Color::Red,
        Tint::Blue => Color::Blue,
        Tint::Green => Color::Green,
        Tint::Cyan => Color::Cyan,
    }
}

// ── Keys ──────────────────────────────────────────────────────────────────────

/// Reduce a terminal event to the single character the game binds keys to.
/// Esc becomes `\u{1b}`, Ctrl-C becomes `\u{3}`.
pub fn key_char(event: &Event) -> Option<char> {
    let Event::Key(KeyEvent {
        code,
        kind,
        modifiers,
        ..
    }) = event
    else {
        return None;
    };
    if *kind == KeyEventKind::Release {
        return None;
    }
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some('\u{3}'),
        KeyCode::Char(c) => Some(*c),
        KeyCode::Esc => Some('\u{1b}'),
        _ => None,
    }
}

// ── Terminal surface ──────────────────────────────────────────────────────────

pub struct TerminalSurface<'a, W: Write> {
    out: &'a mut W,
    rx: &'a mpsc::Receiver<Event>,
    back: Canvas,
    front: Option<Canvas>,
}

impl<'a, W: Write> TerminalSurface<'a, W> {
    pub fn new(out: &'a mut W, rx: &'a mpsc::Receiver<Event>, bounds: Bounds) -> Self {
        TerminalSurface {
            out,
            rx,
            back: Canvas::new(bounds),
            front: None,
        }
    }

    fn write_row(&mut self, row: usize, cells: &[Cell]) -> std::io::Result<()> {
        self.out.queue(cursor::MoveTo(0, row as u16))?;
        let mut run = String::new();
        let mut run_tint: Option<Tint> = None;
        for cell in cells {
            if run_tint != Some(cell.tint) && !run.is_empty() {
                self.flush_run(&mut run, run_tint)?;
            }
            run_tint = Some(cell.tint);
            run.push(cell.glyph);
        }
        self.flush_run(&mut run, run_tint)
    }

    fn flush_run(&mut self, run: &mut String, tint: Option<Tint>) -> std::io::Result<()> {
        if run.is_empty() {
            return Ok(());
        }
        self.out
            .queue(style::SetForegroundColor(color_of(tint.unwrap_or_default())))?;
        self.out.queue(Print(run.as_str()))?;
        run.clear();
        Ok(())
    }
}

impl<W: Write> Surface for TerminalSurface<'_, W> {
    fn clear(&mut self) -> std::io::Result<()> {
        self.back.clear()
    }

    fn move_print(&mut self, row: i32, col: i32, text: &str, tint: Tint) -> std::io::Result<()> {
        self.back.move_print(row, col, text, tint)
    }

    fn refresh(&mut self) -> std::io::Result<()> {
        if let Some(front) = &self.front {
            if front.rows().eq(self.back.rows()) {
                return Ok(());
            }
        }
        let frame = self.back.clone();
        for (row, cells) in frame.rows().enumerate() {
            self.write_row(row, cells)?;
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()?;
        self.front = Some(frame);
        Ok(())
    }

    fn dimensions(&self) -> Bounds {
        self.back.dimensions()
    }

    fn next_key(&mut self) -> Option<char> {
        // Skip events that are not keys (resize, mouse) without waiting.
        while let Ok(event) = self.rx.try_recv() {
            if let Some(key) = key_char(&event) {
                return Some(key);
            }
        }
        None
    }
}

// ── Menus ─────────────────────────────────────────────────────────────────────

fn print_centered<W: Write>(
    out: &mut W,
    width: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn key_label(key: char) -> String {
    match key {
        ' ' => "SPACE".to_string(),
        k => k.to_uppercase().to_string(),
    }
}

/// Level selection screen.
pub fn draw_level_menu<W: Write>(
    out: &mut W,
    levels: &[LevelProfile],
    controls: &ControlBinding,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let (width, height) = terminal::size()?;
    let cy = height / 2;

    print_centered(out, width, cy.saturating_sub(6), "★  SPACE  GLIDE  ★", C_TITLE)?;
    print_centered(out, width, cy.saturating_sub(4), "Select a level:", C_TEXT)?;

    for (i, level) in levels.iter().filter(|l| (1..=9).contains(&l.number)).enumerate() {
        let line = format!(
            "[{}] {:>3} hostiles  {:>3}s  target {:>3}",
            level.number, level.hostiles, level.time, level.score
        );
        print_centered(out, width, cy.saturating_sub(2) + i as u16, &line, C_HINT)?;
    }

    let hint = format!(
        "{} {} {} {} : Move   {} : Shoot   Q : Quit",
        key_label(controls.up),
        key_label(controls.left),
        key_label(controls.down),
        key_label(controls.right),
        key_label(controls.shoot)
    );
    print_centered(out, width, height.saturating_sub(2), &hint, C_HINT)?;

    out.queue(style::ResetColor)?;
    out.flush()
}

/// Game-over overlay, drawn on top of the last frame.
pub fn draw_game_over<W: Write>(out: &mut W, summary: &Summary) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let (banner, color) = match summary.outcome {
        Outcome::Complete => ("║   LEVEL  COMPLETE  ║", C_COMPLETE),
        Outcome::Failed | Outcome::Abandoned => ("║     GAME  OVER     ║", C_FAILED),
    };
    let score_line = format!("Final Score: {:>6}", summary.score);
    let target_line = if summary.target_met {
        "★ Target reached ★"
    } else {
        "Target missed"
    };

    let start = (height / 2).saturating_sub(3);
    print_centered(out, width, start, "╔════════════════════╗", color)?;
    print_centered(out, width, start + 1, banner, color)?;
    print_centered(out, width, start + 2, "╚════════════════════╝", color)?;
    print_centered(out, width, start + 3, &score_line, C_SCORE)?;
    print_centered(out, width, start + 4, target_line, C_SCORE)?;
    print_centered(out, width, start + 5, "1 - Play Again  2 - Levels  Q - Quit", C_TEXT)?;

    out.queue(style::ResetColor)?;
    out.flush()
}
