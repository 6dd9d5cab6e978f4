use crate::blocks::{obstacle_pose, BlockKind, MotionParams};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Runtime state of a moving obstacle. Speed and phase are fixed for the
/// lifetime of the entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Obstacle {
    pub kind: BlockKind,
    pub base: Vec3,
    pub motion: MotionParams,
}

impl Obstacle {
    pub fn pose_at(&self, elapsed: f32) -> Option<Transform> {
        obstacle_pose(self.kind, self.base, self.motion, elapsed)
    }
}

/// Push each obstacle's next kinematic pose.
///
/// Rapier picks up the changed `Transform` of a position-based kinematic body
/// as its next target, so no forces are involved. Obstacles without a body
/// are left alone.
pub fn drive_obstacles(
    time: Res<Time>,
    mut obstacles: Query<(&Obstacle, &mut Transform), With<RigidBody>>,
) {
    let elapsed = time.elapsed_seconds();

    for (obstacle, mut transform) in &mut obstacles {
        if let Some(pose) = obstacle.pose_at(elapsed) {
            *transform = pose;
        }
    }
}
