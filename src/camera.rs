use crate::config::GameConfig;
use crate::player::Player;
use crate::CAMERA_START;
use bevy::prelude::*;

/// Smoothed camera position and look-at target trailing the marble.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            position: CAMERA_START,
            target: Vec3::ZERO,
        }
    }
}

impl FollowCamera {
    /// Move part of the way toward the desired pose for `body`.
    ///
    /// The fraction is `smoothing * delta`, capped at 1 so a long frame lands
    /// on the desired pose instead of overshooting it.
    pub fn advance(&mut self, body: Vec3, config: &GameConfig, delta: f32) {
        let t = (config.camera_smoothing * delta).clamp(0.0, 1.0);
        self.position = self.position.lerp(body + config.camera_offset(), t);
        self.target = self.target.lerp(body + config.camera_target_offset(), t);
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_at(self.target, Vec3::Y)
    }
}

pub fn setup_camera(mut commands: Commands) {
    let follow = FollowCamera::default();
    commands.spawn((
        Camera3dBundle {
            transform: follow.transform(),
            ..default()
        },
        follow,
    ));
}

pub fn camera_follow(
    time: Res<Time>,
    config: Res<GameConfig>,
    player: Query<&Transform, With<Player>>,
    mut cameras: Query<(&mut FollowCamera, &mut Transform, &mut GlobalTransform), Without<Player>>,
) {
    let Ok(body) = player.get_single() else {
        return;
    };

    for (mut follow, mut transform, mut global) in &mut cameras {
        follow.advance(body.translation, &config, time.delta_seconds());
        *transform = follow.transform();
        // root entity: its global pose is its local pose
        *global = GlobalTransform::from(*transform);
    }
}
