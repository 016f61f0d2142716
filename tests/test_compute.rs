use space_glide::compute::*;
use space_glide::entities::*;
use space_glide::profile::{Action, CharacterProfile};
use space_glide::registry::Registry;

use rand::rngs::StdRng;
use rand::SeedableRng;

const FIELD: Bounds = Bounds::new(24, 80);

fn make_registry() -> Registry {
    let mut registry = Registry::new();
    let craft = CharacterProfile::default().craft_at(player_start(FIELD));
    registry.add(Entity::Player(craft));
    registry
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn player_pos(registry: &Registry) -> Position {
    registry.player().map(|p| p.pos).unwrap()
}

// ── Placement ─────────────────────────────────────────────────────────────────

#[test]
fn player_starts_mid_height_near_left_edge() {
    assert_eq!(player_start(FIELD), Position::new(12, PLAYER_START_COL));
}

#[test]
fn player_start_is_clamped_on_tiny_field() {
    let tiny = Bounds::new(6, 80);
    assert_eq!(player_start(tiny), Position::new(1, PLAYER_START_COL));
}

#[test]
fn hostiles_spawn_inset_from_right_edge() {
    assert_eq!(hostile_spawn_column(FIELD), 70);
}

// ── move_player ───────────────────────────────────────────────────────────────

#[test]
fn move_player_steps_one_cell_per_action() {
    let mut r = make_registry();
    assert!(move_player(&mut r, Action::Right, FIELD));
    assert_eq!(player_pos(&r), Position::new(12, 6));
    assert!(move_player(&mut r, Action::Down, FIELD));
    assert_eq!(player_pos(&r), Position::new(13, 6));
    assert!(move_player(&mut r, Action::Up, FIELD));
    assert!(move_player(&mut r, Action::Left, FIELD));
    assert_eq!(player_pos(&r), Position::new(12, 5));
}

#[test]
fn move_player_step_scales_with_speed() {
    let mut r = make_registry();
    r.player_mut().unwrap().speed = 3;
    move_player(&mut r, Action::Down, FIELD);
    assert_eq!(player_pos(&r), Position::new(15, 5));
}

#[test]
fn move_player_clamps_to_field() {
    let mut r = make_registry();
    for _ in 0..30 {
        move_player(&mut r, Action::Up, FIELD);
        move_player(&mut r, Action::Left, FIELD);
    }
    assert_eq!(player_pos(&r), Position::new(PLAY_TOP, 0));
    for _ in 0..100 {
        move_player(&mut r, Action::Down, FIELD);
        move_player(&mut r, Action::Right, FIELD);
    }
    assert_eq!(player_pos(&r), Position::new(19, 73));
}

#[test]
fn move_player_ignores_non_movement_actions() {
    let mut r = make_registry();
    assert!(!move_player(&mut r, Action::Shoot, FIELD));
    assert!(!move_player(&mut r, Action::Quit, FIELD));
    assert_eq!(player_pos(&r), Position::new(12, 5));
}

#[test]
fn move_player_without_player_is_noop() {
    let mut r = Registry::new();
    assert!(!move_player(&mut r, Action::Up, FIELD));
}

// ── player_shoot ──────────────────────────────────────────────────────────────

#[test]
fn player_shoot_adds_two_rightward_projectiles_at_muzzles() {
    let mut r = make_registry();
    assert_eq!(player_shoot(&mut r), 2);
    assert_eq!(r.count(EntityKind::Projectile), 2);

    let shots: Vec<&Projectile> = r.iter().filter_map(Entity::as_projectile).collect();
    assert_eq!(shots[0].pos, Position::new(13, 9));
    assert_eq!(shots[1].pos, Position::new(15, 9));
    assert!(shots.iter().all(|p| p.direction() == Direction::Right && p.alive));
}

#[test]
fn player_shoot_into_full_registry_is_dropped() {
    let mut r = Registry::with_capacity(2);
    r.add(Entity::Player(CharacterProfile::default().craft_at(player_start(FIELD))));
    assert_eq!(player_shoot(&mut r), 1);
    assert_eq!(player_shoot(&mut r), 0);
    assert_eq!(r.len(), 2);
}

// ── spawn_hostile ─────────────────────────────────────────────────────────────

#[test]
fn spawn_hostile_rows_stay_in_play_area() {
    let mut r = Registry::with_capacity(200);
    let mut rng = seeded_rng();
    for _ in 0..100 {
        let at = spawn_hostile(&mut r, FIELD, &mut rng).unwrap();
        assert_eq!(at.col, 70);
        assert!((PLAY_TOP..=FIELD.rows - CRAFT_EXTENT.height).contains(&at.row));
    }
    assert_eq!(r.count(EntityKind::HostileCraft), 100);
}

#[test]
fn spawn_hostile_is_reproducible_with_same_seed() {
    let mut a = Registry::new();
    let mut b = Registry::new();
    let mut rng_a = seeded_rng();
    let mut rng_b = seeded_rng();
    for _ in 0..10 {
        assert_eq!(
            spawn_hostile(&mut a, FIELD, &mut rng_a),
            spawn_hostile(&mut b, FIELD, &mut rng_b)
        );
    }
}

#[test]
fn spawn_hostile_on_too_small_field_is_dropped() {
    let mut r = Registry::new();
    let mut rng = seeded_rng();
    assert_eq!(spawn_hostile(&mut r, Bounds::new(5, 80), &mut rng), None);
    assert_eq!(spawn_hostile(&mut r, Bounds::new(24, 10), &mut rng), None);
    assert!(r.is_empty());
}

#[test]
fn spawn_hostile_into_full_registry_is_dropped() {
    let mut r = Registry::with_capacity(0);
    let mut rng = seeded_rng();
    assert_eq!(spawn_hostile(&mut r, FIELD, &mut rng), None);
    assert!(r.is_empty());
}
