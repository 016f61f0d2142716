use std::fs;

use space_glide::entities::{Position, SHIP_ART};
use space_glide::profile::*;
use space_glide::surface::Tint;
use space_glide::ConfigError;

const CHARACTERS: &str = r#"{
  "characters": [
    {
      "name": "Viper",
      "ascii_art": ["  /\\   ", " <==>  ", "  \\/   "],
      "attributes": { "speed": 2, "damage": 3, "color": "red" }
    },
    { "name": "Drifter", "attributes": { "speed": 0, "damage": 0, "color": "teal" } }
  ]
}"#;

const LEVELS: &str = r#"{
  "levels": [
    { "number": 1, "enemies": 10, "time": 60, "score": 5 },
    { "number": 2, "enemies": 20, "time": 90, "score": 12 }
  ]
}"#;

const SETTINGS: &str = r#"{
  "controls": { "up": "i", "down": "k", "left": "j", "right": "l", "shoot": "space" }
}"#;

// ── Characters ────────────────────────────────────────────────────────────────

#[test]
fn characters_parse_with_attributes() {
    let chars = parse_characters(CHARACTERS).unwrap();
    assert_eq!(chars.len(), 2);
    let viper = &chars[0];
    assert_eq!(viper.name, "Viper");
    assert_eq!(viper.ascii_art.len(), 3);
    assert_eq!(viper.life(), 3);
    assert_eq!(viper.speed(), 2);
    assert_eq!(viper.tint(), Tint::Red);
}

#[test]
fn unset_attributes_fall_back_to_defaults() {
    let chars = parse_characters(CHARACTERS).unwrap();
    let drifter = &chars[1];
    assert!(drifter.ascii_art.is_empty());
    assert_eq!(drifter.life(), DEFAULT_LIFE);
    assert_eq!(drifter.speed(), DEFAULT_SPEED);
    assert_eq!(drifter.tint(), Tint::Default);
}

#[test]
fn craft_takes_life_and_speed_from_profile() {
    let chars = parse_characters(CHARACTERS).unwrap();
    let craft = chars[0].craft_at(Position::new(4, 5));
    assert_eq!(craft.pos, Position::new(4, 5));
    assert_eq!(craft.life, 3);
    assert_eq!(craft.max_life, 3);
    assert_eq!(craft.speed, 2);
    assert_eq!(craft.score, 0);
}

#[test]
fn default_character_flies_the_stock_ship() {
    let glider = CharacterProfile::default();
    assert_eq!(glider.ascii_art, SHIP_ART);
    assert_eq!(glider.life(), 5);
    assert_eq!(glider.speed(), 1);
}

// ── Levels ────────────────────────────────────────────────────────────────────

#[test]
fn levels_read_enemies_as_hostile_budget() {
    let levels = parse_levels(LEVELS).unwrap();
    assert_eq!(
        levels[1],
        LevelProfile {
            number: 2,
            hostiles: 20,
            time: 90,
            score: 12
        }
    );
}

#[test]
fn builtin_levels_grow_harder() {
    let one = LevelProfile::builtin(1);
    let two = LevelProfile::builtin(2);
    assert!(two.hostiles > one.hostiles);
    assert!(two.time > one.time);
    assert!(two.score > one.score);
}

// ── Controls ──────────────────────────────────────────────────────────────────

#[test]
fn controls_accept_single_chars_and_space() {
    let controls = parse_controls(SETTINGS).unwrap();
    assert_eq!(
        controls,
        ControlBinding {
            up: 'i',
            down: 'k',
            left: 'j',
            right: 'l',
            shoot: ' '
        }
    );
}

#[test]
fn multi_char_key_is_rejected() {
    let json = r#"{"controls": {"up": "up", "down": "s", "left": "a", "right": "d", "shoot": " "}}"#;
    let err = parse_controls(json).unwrap_err();
    assert!(err.to_string().contains("control `up`"), "{err}");
}

#[test]
fn empty_key_is_rejected() {
    let json = r#"{"controls": {"up": "w", "down": "s", "left": "a", "right": "d", "shoot": ""}}"#;
    assert!(parse_controls(json).is_err());
}

#[test]
fn keys_map_to_actions() {
    let c = ControlBinding::default();
    assert_eq!(c.action_for('w'), Some(Action::Up));
    assert_eq!(c.action_for('s'), Some(Action::Down));
    assert_eq!(c.action_for('a'), Some(Action::Left));
    assert_eq!(c.action_for('d'), Some(Action::Right));
    assert_eq!(c.action_for(' '), Some(Action::Shoot));
    assert_eq!(c.action_for('x'), None);
    assert_eq!(c.action_for('\u{1b}'), Some(Action::Quit));
    assert_eq!(c.action_for('\u{3}'), Some(Action::Quit));
}

// ── Loading ───────────────────────────────────────────────────────────────────

fn write_config(characters: &str, levels: &str, settings: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CHARACTERS_FILE), characters).unwrap();
    fs::write(dir.path().join(LEVELS_FILE), levels).unwrap();
    fs::write(dir.path().join(SETTINGS_FILE), settings).unwrap();
    dir
}

#[test]
fn load_reads_all_three_files() {
    let dir = write_config(CHARACTERS, LEVELS, SETTINGS);
    let profiles = Profiles::load(dir.path()).unwrap();
    assert_eq!(profiles.characters.len(), 2);
    assert_eq!(profiles.levels.len(), 2);
    assert_eq!(profiles.controls.up, 'i');

    assert_eq!(profiles.character(None).unwrap().name, "Viper");
    assert_eq!(profiles.character(Some("drifter")).unwrap().name, "Drifter");
    assert_eq!(profiles.level(2).unwrap().time, 90);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(CHARACTERS_FILE), CHARACTERS).unwrap();
    let err = Profiles::load(dir.path()).unwrap_err();
    match err {
        ConfigError::Io { path, .. } => assert!(path.ends_with(LEVELS_FILE)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = write_config(CHARACTERS, "{ not json", SETTINGS);
    assert!(matches!(Profiles::load(dir.path()), Err(ConfigError::Parse { .. })));
}

#[test]
fn empty_character_list_is_rejected() {
    let dir = write_config(r#"{"characters": []}"#, LEVELS, SETTINGS);
    assert!(matches!(
        Profiles::load(dir.path()),
        Err(ConfigError::Empty(CHARACTERS_FILE))
    ));
}

#[test]
fn unknown_names_and_levels_are_errors() {
    let profiles = Profiles::builtin();
    assert!(matches!(
        profiles.character(Some("Nobody")),
        Err(ConfigError::UnknownCharacter(_))
    ));
    assert!(matches!(profiles.level(42), Err(ConfigError::UnknownLevel(42))));
    assert_eq!(profiles.levels.len(), 9);
}
