/// Character, level and control profiles.
///
/// These are read once before a session starts.  The JSON layout matches the
/// files shipped in a config directory:
///
/// - `characters.json`: `{"characters": [{"name", "ascii_art", "attributes": {"speed", "damage", "color"}}]}`
/// - `levels.json`: `{"levels": [{"number", "enemies", "time", "score"}]}`
/// - `settings.json`: `{"controls": {"up", "down", "left", "right", "shoot"}}`

use std::fs;
use std::path::Path;

use log::info;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::entities::{PlayerCraft, Position, Sprite, SHIP_ART};
use crate::error::ConfigError;
use crate::surface::Tint;

pub const CHARACTERS_FILE: &str = "characters.json";
pub const LEVELS_FILE: &str = "levels.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// Substituted when a profile leaves life unset (0).
pub const DEFAULT_LIFE: u32 = 5;
/// Substituted when a profile leaves speed unset or non-positive.
pub const DEFAULT_SPEED: i32 = 1;

const ESCAPE: char = '\u{1b}';
const CTRL_C: char = '\u{3}';

// ── Character ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Attributes {
    #[serde(default)]
    pub speed: i32,
    /// Hits the craft can take.
    #[serde(default)]
    pub damage: u32,
    #[serde(default)]
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CharacterProfile {
    pub name: String,
    #[serde(default)]
    pub ascii_art: Vec<String>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl Default for CharacterProfile {
    fn default() -> Self {
        CharacterProfile {
            name: "Glider".to_string(),
            ascii_art: SHIP_ART.iter().map(|l| l.to_string()).collect(),
            attributes: Attributes {
                speed: DEFAULT_SPEED,
                damage: DEFAULT_LIFE,
                color: "blue".to_string(),
            },
        }
    }
}

impl CharacterProfile {
    pub fn life(&self) -> u32 {
        match self.attributes.damage {
            0 => DEFAULT_LIFE,
            n => n,
        }
    }

    pub fn speed(&self) -> i32 {
        if self.attributes.speed > 0 {
            self.attributes.speed
        } else {
            DEFAULT_SPEED
        }
    }

    pub fn tint(&self) -> Tint {
        Tint::from_name(&self.attributes.color)
    }

    /// Build this character's craft at `pos`.
    pub fn craft_at(&self, pos: Position) -> PlayerCraft {
        let sprite = if self.ascii_art.is_empty() {
            Sprite::new(&SHIP_ART, self.tint())
        } else {
            Sprite::new(self.ascii_art.as_slice(), self.tint())
        };
        PlayerCraft::new(pos, self.life(), self.speed(), sprite)
    }
}

// ── Level ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LevelProfile {
    pub number: u32,
    /// Hostile spawn budget for the session.
    #[serde(rename = "enemies")]
    pub hostiles: u32,
    /// Session clock, in seconds.
    pub time: u32,
    /// Target score.
    pub score: u32,
}

impl LevelProfile {
    /// The built-in ladder: each level brings more hostiles, a longer clock
    /// and a higher target.
    pub fn builtin(number: u32) -> Self {
        LevelProfile {
            number,
            hostiles: 10 + 5 * number,
            time: 30 + 10 * number,
            score: 3 * number,
        }
    }
}

// ── Controls ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Shoot,
    Quit,
}

#[derive(Deserialize)]
struct RawBinding {
    up: String,
    down: String,
    left: String,
    right: String,
    shoot: String,
}

/// One key per action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawBinding")]
pub struct ControlBinding {
    pub up: char,
    pub down: char,
    pub left: char,
    pub right: char,
    pub shoot: char,
}

impl Default for ControlBinding {
    fn default() -> Self {
        ControlBinding {
            up: 'w',
            down: 's',
            left: 'a',
            right: 'd',
            shoot: ' ',
        }
    }
}

fn parse_key(control: &'static str, value: &str) -> Result<char, ConfigError> {
    if value.eq_ignore_ascii_case("space") {
        return Ok(' ');
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(ConfigError::InvalidKey {
            control,
            value: value.to_string(),
        }),
    }
}

impl TryFrom<RawBinding> for ControlBinding {
    type Error = ConfigError;

    fn try_from(raw: RawBinding) -> Result<Self, Self::Error> {
        Ok(ControlBinding {
            up: parse_key("up", &raw.up)?,
            down: parse_key("down", &raw.down)?,
            left: parse_key("left", &raw.left)?,
            right: parse_key("right", &raw.right)?,
            shoot: parse_key("shoot", &raw.shoot)?,
        })
    }
}

impl ControlBinding {
    /// Map a key press to an action.  Esc and Ctrl-C always quit.
    pub fn action_for(&self, key: char) -> Option<Action> {
        match key {
            ESCAPE | CTRL_C => Some(Action::Quit),
            k if k == self.up => Some(Action::Up),
            k if k == self.down => Some(Action::Down),
            k if k == self.left => Some(Action::Left),
            k if k == self.right => Some(Action::Right),
            k if k == self.shoot => Some(Action::Shoot),
            _ => None,
        }
    }
}

// ── Files ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CharactersFile {
    characters: Vec<CharacterProfile>,
}

#[derive(Deserialize)]
struct LevelsFile {
    levels: Vec<LevelProfile>,
}

#[derive(Deserialize)]
struct SettingsFile {
    controls: ControlBinding,
}

pub fn parse_characters(json: &str) -> serde_json::Result<Vec<CharacterProfile>> {
    serde_json::from_str::<CharactersFile>(json).map(|f| f.characters)
}

pub fn parse_levels(json: &str) -> serde_json::Result<Vec<LevelProfile>> {
    serde_json::from_str::<LevelsFile>(json).map(|f| f.levels)
}

pub fn parse_controls(json: &str) -> serde_json::Result<ControlBinding> {
    serde_json::from_str::<SettingsFile>(json).map(|f| f.controls)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Everything a session needs from configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Profiles {
    pub characters: Vec<CharacterProfile>,
    pub levels: Vec<LevelProfile>,
    pub controls: ControlBinding,
}

impl Profiles {
    /// One character, nine levels, WASD + space.
    pub fn builtin() -> Self {
        Profiles {
            characters: vec![CharacterProfile::default()],
            levels: (1..=9).map(LevelProfile::builtin).collect(),
            controls: ControlBinding::default(),
        }
    }

    /// Read the three profile files from `dir`.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let characters = read_json::<CharactersFile>(&dir.join(CHARACTERS_FILE))?.characters;
        let levels = read_json::<LevelsFile>(&dir.join(LEVELS_FILE))?.levels;
        let controls = read_json::<SettingsFile>(&dir.join(SETTINGS_FILE))?.controls;
        if characters.is_empty() {
            return Err(ConfigError::Empty(CHARACTERS_FILE));
        }
        if levels.is_empty() {
            return Err(ConfigError::Empty(LEVELS_FILE));
        }
        info!(
            "loaded {} character(s) and {} level(s) from {}",
            characters.len(),
            levels.len(),
            dir.display()
        );
        Ok(Profiles {
            characters,
            levels,
            controls,
        })
    }

    /// The named character, or the first one when no name is given.
    pub fn character(&self, name: Option<&str>) -> Result<&CharacterProfile, ConfigError> {
        match name {
            None => self
                .characters
                .first()
                .ok_or(ConfigError::Empty(CHARACTERS_FILE)),
            Some(name) => self
                .characters
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| ConfigError::UnknownCharacter(name.to_string())),
        }
    }

    pub fn level(&self, number: u32) -> Result<&LevelProfile, ConfigError> {
        self.levels
            .iter()
            .find(|l| l.number == number)
            .ok_or(ConfigError::UnknownLevel(number))
    }
}
