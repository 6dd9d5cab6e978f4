//! Block archetypes: what each course tile looks like and how its obstacle
//! moves.
//!
//! Obstacle motion is a pure function of the simulation clock and the
//! obstacle's [`MotionParams`], so a pose can be recomputed for any time
//! without integrating state.

use crate::BLOCK_WIDTH;
use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

pub const FLOOR_THICKNESS: f32 = 0.2;
pub const OBSTACLE_REST_HEIGHT: f32 = 0.3;
pub const BAR_SIZE: Vec3 = Vec3::new(3.5, 0.3, 0.3);
pub const BLADE_SIZE: Vec3 = Vec3::new(1.5, 1.5, 0.3);
pub const TROPHY_SIZE: Vec3 = Vec3::new(0.8, 0.5, 0.8);
pub const LIMBO_LIFT: f32 = 1.15;
pub const AXE_HEIGHT: f32 = 0.75;
pub const AXE_SWING: f32 = 1.25;
pub const OBSTACLE_RESTITUTION: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Start,
    End,
    Spinner,
    Limbo,
    Axe,
}

impl BlockKind {
    /// Archetypes a level draws its intermediate blocks from by default.
    pub const OBSTACLES: [BlockKind; 3] = [BlockKind::Spinner, BlockKind::Limbo, BlockKind::Axe];

    pub fn is_obstacle(self) -> bool {
        !matches!(self, BlockKind::Start | BlockKind::End)
    }

    /// Size of the moving body, if this archetype has one.
    pub fn obstacle_size(self) -> Option<Vec3> {
        match self {
            BlockKind::Spinner | BlockKind::Limbo => Some(BAR_SIZE),
            BlockKind::Axe => Some(BLADE_SIZE),
            BlockKind::Start | BlockKind::End => None,
        }
    }

    pub fn floor_material(self) -> BlockMaterial {
        if self.is_obstacle() {
            BlockMaterial::Track
        } else {
            BlockMaterial::Floor
        }
    }

    /// Draw the fixed motion parameters of a new obstacle of this kind.
    ///
    /// Spinners get a speed in ±[0.2, 1.2) and no phase; limbo bars and axes
    /// run at unit speed with a phase in [0, 2π).
    pub fn sample_motion(self, rng: &mut impl Rng) -> Option<MotionParams> {
        match self {
            BlockKind::Spinner => {
                let magnitude = rng.gen::<f32>() + 0.2;
                let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                Some(MotionParams {
                    speed: magnitude * sign,
                    phase_offset: 0.0,
                })
            }
            BlockKind::Limbo | BlockKind::Axe => Some(MotionParams {
                speed: 1.0,
                phase_offset: rng.gen_range(0.0..TAU),
            }),
            BlockKind::Start | BlockKind::End => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockMaterial {
    Floor,
    Track,
    Obstacle,
    Wall,
}

/// Static geometry of one box: full extents and the material to paint it.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub scale: Vec3,
    pub material: BlockMaterial,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub speed: f32,
    pub phase_offset: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockSpec {
    pub kind: BlockKind,
    pub position: Vec3,
    pub geometry: Geometry,
    pub motion: Option<MotionParams>,
}

impl BlockSpec {
    pub fn new(kind: BlockKind, position: Vec3, rng: &mut impl Rng) -> Self {
        Self {
            kind,
            position,
            geometry: Geometry {
                scale: Vec3::new(BLOCK_WIDTH, FLOOR_THICKNESS, BLOCK_WIDTH),
                material: kind.floor_material(),
            },
            motion: kind.sample_motion(rng),
        }
    }

    /// Where the floor tile's center sits; its top face is flush with the
    /// block position.
    pub fn floor_center(&self) -> Vec3 {
        self.position - Vec3::Y * FLOOR_THICKNESS * 0.5
    }

    /// Pose of the obstacle body before the first motion update.
    pub fn rest_pose(&self) -> Transform {
        Transform::from_translation(self.position + Vec3::Y * OBSTACLE_REST_HEIGHT)
    }
}

/// Pose of an obstacle `elapsed` seconds into the simulation.
///
/// Returns `None` for archetypes without a moving body.
pub fn obstacle_pose(
    kind: BlockKind,
    base: Vec3,
    motion: MotionParams,
    elapsed: f32,
) -> Option<Transform> {
    let pose = match kind {
        BlockKind::Spinner => Transform::from_translation(base + Vec3::Y * OBSTACLE_REST_HEIGHT)
            .with_rotation(Quat::from_rotation_y(spinner_angle(motion, elapsed))),
        BlockKind::Limbo => {
            let y = (elapsed * motion.speed + motion.phase_offset).sin() + LIMBO_LIFT;
            Transform::from_xyz(base.x, base.y + y, base.z)
        }
        BlockKind::Axe => {
            let x = (elapsed * motion.speed + motion.phase_offset).sin() * AXE_SWING;
            Transform::from_xyz(base.x + x, base.y + AXE_HEIGHT, base.z)
        }
        BlockKind::Start | BlockKind::End => return None,
    };
    Some(pose)
}

pub fn spinner_angle(motion: MotionParams, elapsed: f32) -> f32 {
    elapsed * motion.speed
}
