//! Headless tests driving the real game systems through `App::update`.
//!
//! These use [`MinimalPlugins`] with no window, renderer or physics plugin.
//! Keyboard state is a bare `Input<KeyCode>` resource that the tests press
//! and clear by hand, one frame at a time.

use bevy::ecs::event::Events;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use marble_race::camera::FollowCamera;
use marble_race::game::{GamePhase, GameStore, PhaseChanged};
use marble_race::level::LevelEntity;
use marble_race::motion::Obstacle;
use marble_race::player::Player;
use marble_race::MarbleRacePlugin;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn race_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(Input::<KeyCode>::default())
        .add_plugin(MarbleRacePlugin);
    app.update();
    app
}

/// Hold `key` down for exactly one frame's worth of "just pressed".
fn tap(app: &mut App, key: KeyCode) {
    app.world.resource_mut::<Input<KeyCode>>().press(key);
    app.update();
    app.world.resource_mut::<Input<KeyCode>>().clear();
}

fn player(app: &mut App) -> Entity {
    app.world
        .query_filtered::<Entity, With<Player>>()
        .single(&app.world)
}

fn move_player(app: &mut App, position: Vec3) {
    let entity = player(app);
    app.world
        .entity_mut(entity)
        .get_mut::<Transform>()
        .unwrap()
        .translation = position;
}

fn phase(app: &App) -> GamePhase {
    app.world.resource::<GameStore>().phase
}

fn phase_changes(app: &App) -> Vec<PhaseChanged> {
    let events = app.world.resource::<Events<PhaseChanged>>();
    events.get_reader().iter(events).copied().collect()
}

fn obstacles(app: &mut App) -> Vec<Entity> {
    app.world
        .query_filtered::<Entity, With<Obstacle>>()
        .iter(&app.world)
        .collect()
}

// ── Level assembly ────────────────────────────────────────────────────────────

#[test]
fn first_frame_builds_the_default_course() {
    let mut app = race_app();

    // 12 floor tiles, 10 obstacles, the finish prop and the enclosure
    let level = app
        .world
        .query_filtered::<Entity, With<LevelEntity>>()
        .iter(&app.world)
        .count();
    assert_eq!(level, 24);
    assert_eq!(obstacles(&mut app).len(), 10);

    let mut bodies = app.world.query_filtered::<&RigidBody, With<Obstacle>>();
    assert!(bodies
        .iter(&app.world)
        .all(|body| *body == RigidBody::KinematicPositionBased));
}

#[test]
fn course_is_stable_until_the_seed_changes() {
    let mut app = race_app();
    let before = obstacles(&mut app);

    for _ in 0..3 {
        app.update();
    }
    let mut same = obstacles(&mut app);
    let mut expected = before.clone();
    same.sort();
    expected.sort();
    assert_eq!(same, expected);

    app.world.resource_mut::<GameStore>().blocks_seed = 1234;
    app.update();

    let after = obstacles(&mut app);
    assert_eq!(after.len(), 10);
    assert!(before.iter().all(|e| app.world.get_entity(*e).is_none()));
}

#[test]
fn zero_blocks_keeps_the_old_course() {
    let mut app = race_app();
    let before = obstacles(&mut app);

    app.world.resource_mut::<GameStore>().blocks_count = 0;
    app.update();
    app.update();

    assert_eq!(obstacles(&mut app).len(), before.len());
    assert!(before.iter().all(|e| app.world.get_entity(*e).is_some()));
}

// ── Obstacle motion ───────────────────────────────────────────────────────────

#[test]
fn obstacles_follow_their_motion_function() {
    let mut app = race_app();
    app.update();

    let elapsed = app.world.resource::<Time>().elapsed_seconds();
    let mut query = app.world.query::<(&Obstacle, &Transform)>();
    for (obstacle, transform) in query.iter(&app.world) {
        assert_eq!(Some(*transform), obstacle.pose_at(elapsed));
    }
}

#[test]
fn obstacle_without_a_body_is_left_alone() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_system(marble_race::motion::drive_obstacles);

    let obstacle = Obstacle {
        kind: marble_race::blocks::BlockKind::Axe,
        base: Vec3::new(0.0, 0.0, -4.0),
        motion: marble_race::blocks::MotionParams {
            speed: 1.0,
            phase_offset: 1.0,
        },
    };
    let parked = Transform::from_xyz(9.0, 9.0, 9.0);
    let unbound = app.world.spawn((obstacle, parked)).id();
    let bound = app
        .world
        .spawn((obstacle, parked, RigidBody::KinematicPositionBased))
        .id();

    app.update();

    assert_eq!(*app.world.get::<Transform>(unbound).unwrap(), parked);
    assert_ne!(*app.world.get::<Transform>(bound).unwrap(), parked);
}

// ── Race progress ─────────────────────────────────────────────────────────────

#[test]
fn any_movement_key_starts_the_race() {
    let mut app = race_app();
    assert_eq!(phase(&app), GamePhase::Ready);

    tap(&mut app, KeyCode::Up);

    assert_eq!(phase(&app), GamePhase::Playing);
    assert_eq!(
        phase_changes(&app),
        vec![PhaseChanged {
            from: GamePhase::Ready,
            to: GamePhase::Playing,
        }]
    );
}

#[test]
fn holding_a_key_does_not_retrigger() {
    let mut app = race_app();
    tap(&mut app, KeyCode::Space);
    assert_eq!(phase(&app), GamePhase::Playing);

    // still held, no new edge
    app.update();
    app.update();
    assert!(phase_changes(&app).is_empty());
}

#[test]
fn falling_restarts_on_a_new_course() {
    let mut app = race_app();
    tap(&mut app, KeyCode::W);
    let seed = app.world.resource::<GameStore>().blocks_seed;
    let entity = player(&mut app);

    move_player(&mut app, Vec3::new(0.4, -4.5, -10.0));
    app.world.get_mut::<Velocity>(entity).unwrap().linvel = Vec3::new(0.0, -8.0, -1.0);
    app.update();

    assert_eq!(phase(&app), GamePhase::Ready);
    assert_ne!(app.world.resource::<GameStore>().blocks_seed, seed);

    let transform = app.world.get::<Transform>(entity).unwrap();
    assert_eq!(transform.translation, Vec3::Y);
    let velocity = app.world.get::<Velocity>(entity).unwrap();
    assert_eq!(velocity.linvel, Vec3::ZERO);
    assert_eq!(velocity.angvel, Vec3::ZERO);
}

#[test]
fn releasing_a_key_held_through_a_restart_starts_the_race() {
    let mut app = race_app();
    tap(&mut app, KeyCode::W);

    move_player(&mut app, Vec3::new(0.0, -5.0, -3.0));
    app.update();
    assert_eq!(phase(&app), GamePhase::Ready);

    // W is still down; holding it changes nothing
    app.update();
    assert_eq!(phase(&app), GamePhase::Ready);

    app.world.resource_mut::<Input<KeyCode>>().release(KeyCode::W);
    app.update();
    app.world.resource_mut::<Input<KeyCode>>().clear();
    assert_eq!(phase(&app), GamePhase::Playing);
}

#[test]
fn just_above_the_fall_line_keeps_playing() {
    let mut app = race_app();
    tap(&mut app, KeyCode::W);

    move_player(&mut app, Vec3::new(0.0, -3.9, -6.0));
    app.update();

    assert_eq!(phase(&app), GamePhase::Playing);
}

#[test]
fn crossing_the_finish_line_ends_the_race() {
    let mut app = race_app();
    app.world.resource_mut::<GameStore>().blocks_count = 5;
    app.update();
    tap(&mut app, KeyCode::D);

    move_player(&mut app, Vec3::new(0.0, 0.3, -22.0));
    app.update();
    assert_eq!(phase(&app), GamePhase::Playing);

    move_player(&mut app, Vec3::new(0.0, 0.3, -22.1));
    app.update();
    assert_eq!(phase(&app), GamePhase::Ended);
    assert!(app.world.resource::<GameStore>().end_time >= app.world.resource::<GameStore>().start_time);
}

#[test]
fn restart_key_only_works_mid_race() {
    let mut app = race_app();

    tap(&mut app, KeyCode::R);
    assert_eq!(phase(&app), GamePhase::Ready);

    tap(&mut app, KeyCode::Left);
    assert_eq!(phase(&app), GamePhase::Playing);

    move_player(&mut app, Vec3::new(1.0, 0.3, -15.0));
    tap(&mut app, KeyCode::R);
    assert_eq!(phase(&app), GamePhase::Ready);
    let entity = player(&mut app);
    assert_eq!(app.world.get::<Transform>(entity).unwrap().translation, Vec3::Y);
}

// ── Marble and camera ─────────────────────────────────────────────────────────

#[test]
fn held_direction_pushes_the_marble() {
    let mut app = race_app();
    app.update();
    app.world.resource_mut::<Input<KeyCode>>().press(KeyCode::Left);
    app.update();

    let entity = player(&mut app);
    let push = app.world.get::<ExternalImpulse>(entity).unwrap();
    assert!(push.impulse.x < 0.0);
    assert_eq!(push.impulse.z, 0.0);
    assert!(push.torque_impulse.z > 0.0);
}

#[test]
fn jump_without_physics_is_harmless() {
    let mut app = race_app();
    tap(&mut app, KeyCode::Space);

    let entity = player(&mut app);
    assert_eq!(app.world.get::<ExternalImpulse>(entity).unwrap().impulse.y, 0.0);
}

#[test]
fn camera_closes_in_on_the_marble() {
    let mut app = race_app();
    let desired = Vec3::Y + marble_race::CAMERA_OFFSET;

    let distance = |app: &mut App| {
        let mut query = app.world.query::<&FollowCamera>();
        query.single(&app.world).position.distance(desired)
    };

    let start = distance(&mut app);
    for _ in 0..5 {
        std::thread::sleep(std::time::Duration::from_millis(2));
        app.update();
    }
    let later = distance(&mut app);
    assert!(later < start, "{later} should be below {start}");

    let mut query = app.world.query_filtered::<&Transform, With<FollowCamera>>();
    let camera = *query.single(&app.world);
    let follow = *app.world.query::<&FollowCamera>().single(&app.world);
    assert!(camera.translation.abs_diff_eq(follow.position, 1e-5));
}
