use crate::config::GameConfig;
use crate::controls::Controls;
use crate::game::{GamePhase, GameStore, PhaseChanged};
use crate::PLAYER_RADIUS;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

pub const PLAYER_RESTITUTION: f32 = 0.2;
pub const PLAYER_FRICTION: f32 = 1.0;
pub const PLAYER_DAMPING: f32 = 0.5;

#[derive(Component)]
pub struct Player;

pub fn setup_player(mut commands: Commands, config: Res<GameConfig>) {
    commands.spawn((
        Player,
        RigidBody::Dynamic,
        Collider::ball(PLAYER_RADIUS),
        Restitution::coefficient(PLAYER_RESTITUTION),
        Friction::coefficient(PLAYER_FRICTION),
        Damping {
            linear_damping: PLAYER_DAMPING,
            angular_damping: PLAYER_DAMPING,
        },
        Sleeping::disabled(),
        Velocity::default(),
        ExternalImpulse::default(),
        TransformBundle::from_transform(Transform::from_translation(config.spawn_position())),
    ));
}

/// Impulse and torque for this tick's held directions.
///
/// Each direction pushes along its axis and spins the marble about the
/// perpendicular one, so it rolls the way it is pushed. Directions add up.
pub fn movement_impulse(controls: &Controls, config: &GameConfig, delta: f32) -> ExternalImpulse {
    let impulse_strength = config.impulse_strength * delta;
    let torque_strength = config.torque_strength * delta;

    let mut impulse = Vec3::ZERO;
    let mut torque_impulse = Vec3::ZERO;

    if controls.forward {
        impulse.z -= impulse_strength;
        torque_impulse.x -= torque_strength;
    }
    if controls.backward {
        impulse.z += impulse_strength;
        torque_impulse.x += torque_strength;
    }
    if controls.leftward {
        impulse.x -= impulse_strength;
        torque_impulse.z += torque_strength;
    }
    if controls.rightward {
        impulse.x += impulse_strength;
        torque_impulse.z -= torque_strength;
    }

    ExternalImpulse {
        impulse,
        torque_impulse,
    }
}

/// Upward impulse for a jump, given the ground probe's time of impact.
///
/// A miss or a far hit means the marble is airborne and the jump is dropped.
pub fn jump_impulse(toi: Option<f32>, config: &GameConfig) -> Option<Vec3> {
    match toi {
        Some(toi) if toi < config.ground_threshold => Some(Vec3::Y * config.jump_impulse),
        _ => None,
    }
}

pub fn ground_probe_origin(position: Vec3, config: &GameConfig) -> Vec3 {
    position - Vec3::Y * config.ground_probe_offset
}

pub fn player_movement(
    time: Res<Time>,
    controls: Res<Controls>,
    config: Res<GameConfig>,
    mut query: Query<&mut ExternalImpulse, With<Player>>,
) {
    let Ok(mut external) = query.get_single_mut() else {
        return;
    };

    *external = movement_impulse(&controls, &config, time.delta_seconds());
}

pub fn player_jump(
    controls: Res<Controls>,
    config: Res<GameConfig>,
    rapier: Option<Res<RapierContext>>,
    mut query: Query<(Entity, &Transform, &mut ExternalImpulse), With<Player>>,
) {
    if !controls.jump {
        return;
    }
    let Some(rapier) = rapier else {
        return;
    };
    let Ok((entity, transform, mut external)) = query.get_single_mut() else {
        return;
    };

    let toi = rapier
        .cast_ray(
            ground_probe_origin(transform.translation, &config),
            -Vec3::Y,
            config.ground_probe_max_toi,
            true,
            QueryFilter::default().exclude_rigid_body(entity),
        )
        .map(|(_, toi)| toi);

    if let Some(impulse) = jump_impulse(toi, &config) {
        external.impulse += impulse;
    }
}

/// Put the marble back on the start pad, at rest.
pub fn reset_body(transform: &mut Transform, velocity: &mut Velocity, spawn: Vec3) {
    *transform = Transform::from_translation(spawn);
    *velocity = Velocity::zero();
}

pub fn reset_on_ready(
    config: Res<GameConfig>,
    mut phase_events: EventReader<PhaseChanged>,
    mut query: Query<(&mut Transform, &mut Velocity, &mut ExternalImpulse), With<Player>>,
) {
    let entered_ready = phase_events
        .iter()
        .filter(|change| change.to == GamePhase::Ready)
        .count()
        > 0;
    if !entered_ready {
        return;
    }
    let Ok((mut transform, mut velocity, mut external)) = query.get_single_mut() else {
        return;
    };

    reset_body(&mut transform, &mut velocity, config.spawn_position());
    *external = ExternalImpulse::default();
}

pub fn check_progress(
    time: Res<Time>,
    config: Res<GameConfig>,
    mut store: ResMut<GameStore>,
    mut phase_events: EventWriter<PhaseChanged>,
    query: Query<&Transform, With<Player>>,
) {
    let Ok(transform) = query.get_single() else {
        return;
    };
    let position = transform.translation;
    let now = time.elapsed_seconds();

    if position.z < config.finish_line(store.blocks_count) {
        if let Some(change) = store.end(now) {
            info!("Finished in {:.2}s", store.elapsed(now));
            phase_events.send(change);
        }
    }

    if position.y < config.fall_threshold {
        if let Some(change) = store.restart() {
            info!("Fell off the course");
            phase_events.send(change);
        }
    }
}
