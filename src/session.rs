/// One play-through, from spawn to a terminal outcome.
///
/// `Session` owns the registry and every other piece of mutable game state.
/// It changes only through `step`, which applies exactly one event: a timer
/// firing or the result of one input poll.  `run` is the loop that turns a
/// scheduler, a clock and a surface into that stream of events.
///
/// Per event:
/// - `Scroll`: move the viewport one column into the playfield; finish with
///   `Complete` as soon as it reaches the far edge.
/// - `Update`: advance every entity, resolve player fire against hostiles,
///   then compact.
/// - `HostileSpawn`: spawn one hostile while the level budget lasts.
/// - `Countdown`: take one second off the clock.
/// - `Input`: apply the action, then resolve hostile fire against the
///   player's (possibly new) position.
///
/// After any event a player with no life left is retired and the session
/// finishes with `Failed`.

use std::io;
use std::thread;
use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use crate::collision::{resolve_hostile_hits, resolve_player_hits};
use crate::compute::{move_player, player_shoot, player_start, spawn_hostile};
use crate::entities::{Bounds, Entity};
use crate::playfield::Starfield;
use crate::profile::{Action, CharacterProfile, ControlBinding, LevelProfile};
use crate::registry::Registry;
use crate::scheduler::{Clock, TickScheduler, TimerPeriods, TimerSource};
use crate::surface::{Canvas, Surface, Tint};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The viewport scrolled to the end of the playfield.
    Complete,
    /// The player craft ran out of life.
    Failed,
    /// The player quit.
    Abandoned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Timer(TimerSource),
    /// One input poll; `None` when no bound key was pressed.
    Input(Option<Action>),
}

/// Heads-up numbers, refreshed every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    pub life: u32,
    pub max_life: u32,
    pub score: u32,
    pub time_left: u32,
}

/// What the game-over screen needs to know.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub outcome: Outcome,
    pub level: u32,
    pub score: u32,
    pub life: u32,
    pub time_left: u32,
    pub target_met: bool,
}

#[derive(Clone, Debug)]
pub struct Session {
    registry: Registry,
    viewport: Bounds,
    field_width: i32,
    scroll_offset: i32,
    time_left: u32,
    hostile_budget: u32,
    level: LevelProfile,
    score: u32,
    max_life: u32,
    outcome: Option<Outcome>,
}

impl Session {
    /// Fresh session with the player craft at its start position.
    pub fn new(
        character: &CharacterProfile,
        level: &LevelProfile,
        viewport: Bounds,
        field_width: i32,
    ) -> Self {
        let mut registry = Registry::new();
        let craft = character.craft_at(player_start(viewport));
        let max_life = craft.max_life;
        registry.add(Entity::Player(craft));
        info!(
            "session start: level {} as {:?}, viewport {}x{}, field width {}",
            level.number, character.name, viewport.rows, viewport.cols, field_width
        );
        Session {
            registry,
            viewport,
            field_width,
            scroll_offset: 0,
            time_left: level.time,
            hostile_budget: level.hostiles,
            level: level.clone(),
            score: 0,
            max_life,
            outcome: None,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn viewport(&self) -> Bounds {
        self.viewport
    }

    pub fn field_width(&self) -> i32 {
        self.field_width
    }

    pub fn scroll_offset(&self) -> i32 {
        self.scroll_offset
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn hostile_budget(&self) -> u32 {
        self.hostile_budget
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn hud(&self) -> Hud {
        let (life, score) = match self.registry.player() {
            Some(p) => (p.life, p.score),
            None => (0, self.score),
        };
        Hud {
            life,
            max_life: self.max_life,
            score,
            time_left: self.time_left,
        }
    }

    pub fn summary(&self) -> Summary {
        let hud = self.hud();
        Summary {
            outcome: self.outcome.unwrap_or(Outcome::Abandoned),
            level: self.level.number,
            score: hud.score,
            life: hud.life,
            time_left: hud.time_left,
            target_met: hud.score >= self.level.score,
        }
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    /// Apply one event.  Once an outcome is reached further events are
    /// ignored and the outcome is returned again.
    pub fn step<R: Rng + ?Sized>(&mut self, event: Event, rng: &mut R) -> Option<Outcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        match event {
            Event::Timer(TimerSource::Scroll) => self.advance_scroll(),
            Event::Timer(TimerSource::Update) => self.update(),
            Event::Timer(TimerSource::HostileSpawn) => self.spawn_hostile(rng),
            Event::Timer(TimerSource::Countdown) => self.time_left = self.time_left.saturating_sub(1),
            Event::Input(action) => self.handle_input(action),
        }
        self.settle();
        self.outcome
    }

    fn advance_scroll(&mut self) {
        if self.scroll_offset + self.viewport.cols < self.field_width {
            self.scroll_offset += 1;
        }
        if self.scroll_offset + self.viewport.cols >= self.field_width {
            self.finish(Outcome::Complete);
        }
    }

    fn update(&mut self) {
        self.registry.advance_all(self.viewport);
        resolve_hostile_hits(&mut self.registry);
        self.retire_expired();
    }

    fn spawn_hostile<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.hostile_budget == 0 {
            debug!("hostile budget spent, no spawn");
            return;
        }
        if let Some(at) = spawn_hostile(&mut self.registry, self.viewport, rng) {
            self.hostile_budget -= 1;
            debug!("hostile spawned at {:?}, {} left", at, self.hostile_budget);
        }
    }

    fn handle_input(&mut self, action: Option<Action>) {
        match action {
            Some(Action::Quit) => {
                self.finish(Outcome::Abandoned);
                return;
            }
            Some(Action::Shoot) => {
                player_shoot(&mut self.registry);
            }
            Some(direction) => {
                move_player(&mut self.registry, direction, self.viewport);
            }
            None => {}
        }
        resolve_player_hits(&mut self.registry);
    }

    /// End the session as soon as the player craft has no life left.
    fn settle(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        let alive = self.registry.player().is_some_and(|p| p.life > 0);
        if !alive {
            self.retire_expired();
            self.finish(Outcome::Failed);
        }
    }

    fn retire_expired(&mut self) {
        for retired in self.registry.compact(self.viewport) {
            if let Entity::Player(p) = &retired {
                debug!("player craft retired with score {}", p.score);
                self.score = p.score;
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        let hud = self.hud();
        info!(
            "session over: {:?}, score {}, life {}, time left {}s",
            outcome, hud.score, hud.life, hud.time_left
        );
        self.outcome = Some(outcome);
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    /// Draw one frame: starfield slice, entities, HUD.  Read-only.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, starfield: &Starfield) -> io::Result<()> {
        surface.clear()?;
        starfield.render_viewport(surface, self.scroll_offset, self.viewport)?;
        self.registry.render_all(surface)?;
        surface.overlay(&self.hud_layer()?)?;
        surface.refresh()
    }

    fn hud_layer(&self) -> io::Result<Canvas> {
        let hud = self.hud();
        let mut layer = Canvas::new(Bounds::new(1, self.viewport.cols));
        let gauge = format!(
            "Life: [{:<width$}]",
            "*".repeat(hud.life as usize),
            width = hud.max_life as usize
        );
        layer.move_print(0, 0, &gauge, Tint::Red)?;
        layer.move_print(0, 20, &format!("Score: {}", hud.score), Tint::Yellow)?;
        layer.move_print(0, 40, &format!("TimeLeft: {}s", hud.time_left), Tint::White)?;
        Ok(layer)
    }
}

// ── The loop ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopConfig {
    pub periods: TimerPeriods,
    /// Pause after an input poll that found nothing, capped at the time to
    /// the next timer.  Zero spins.
    pub idle_nap: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            periods: TimerPeriods::default(),
            idle_nap: Duration::from_millis(1),
        }
    }
}

/// Drive `session` until it reaches an outcome.
///
/// Each iteration renders, then applies exactly one event: the earliest
/// due timer, or, when none is due, one non-blocking input poll.  An update
/// tick is followed by a second render so its result is on screen
/// before the next poll.
pub fn run<S, C, R>(
    session: &mut Session,
    surface: &mut S,
    starfield: &Starfield,
    controls: &ControlBinding,
    clock: &C,
    config: &LoopConfig,
    rng: &mut R,
) -> io::Result<Summary>
where
    S: Surface + ?Sized,
    C: Clock + ?Sized,
    R: Rng + ?Sized,
{
    let mut scheduler = TickScheduler::new(config.periods, clock.now());

    loop {
        session.render(surface, starfield)?;

        let now = clock.now();
        let event = match scheduler.poll(now) {
            Some(source) => Event::Timer(source),
            None => {
                let key = surface.next_key();
                if key.is_none() && !config.idle_nap.is_zero() {
                    thread::sleep(config.idle_nap.min(scheduler.until_next(now)));
                }
                Event::Input(key.and_then(|k| controls.action_for(k)))
            }
        };

        let outcome = session.step(event, rng);
        if event == Event::Timer(TimerSource::Update) {
            session.render(surface, starfield)?;
        }
        if outcome.is_some() {
            return Ok(session.summary());
        }
    }
}
