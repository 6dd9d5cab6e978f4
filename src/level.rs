use crate::blocks::*;
use crate::error::{LevelError, LevelResult};
use crate::game::GameStore;
use crate::motion::Obstacle;
use crate::{BLOCK_SPACING, BLOCK_WIDTH, MAX_BLOCKS_COUNT};
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

pub const WALL_THICKNESS: f32 = 0.3;
pub const WALL_HEIGHT: f32 = 1.5;
pub const WALL_RESTITUTION: f32 = 0.2;
pub const FLOOR_FRICTION: f32 = 1.0;

/// Marks every entity that belongs to the current course.
#[derive(Component)]
pub struct LevelEntity;

/// One box of the enclosure: center and full extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSpec {
    pub center: Vec3,
    pub size: Vec3,
}

impl BoxSpec {
    pub fn half_extents(&self) -> Vec3 {
        self.size * 0.5
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    /// Course length in blocks, start and finish included.
    pub length: u32,
    pub left: BoxSpec,
    pub right: BoxSpec,
    pub back: BoxSpec,
    pub floor: BoxSpec,
}

impl Bounds {
    pub fn new(length: u32) -> Self {
        let length_f = length as f32;
        let span = BLOCK_SPACING * length_f;
        let half_block = BLOCK_WIDTH * 0.5;
        let mid_z = -(span * 0.5) + half_block;
        let wall_y = WALL_HEIGHT * 0.5;
        let side_x = half_block + WALL_THICKNESS * 0.5;

        let side = |x: f32| BoxSpec {
            center: Vec3::new(x, wall_y, mid_z),
            size: Vec3::new(WALL_THICKNESS, WALL_HEIGHT, span),
        };

        Self {
            length,
            left: side(-side_x),
            right: side(side_x),
            back: BoxSpec {
                center: Vec3::new(0.0, wall_y, -span + half_block),
                size: Vec3::new(BLOCK_WIDTH, WALL_HEIGHT, WALL_THICKNESS),
            },
            floor: BoxSpec {
                center: Vec3::new(0.0, -FLOOR_THICKNESS * 0.5, mid_z),
                size: Vec3::new(BLOCK_WIDTH, FLOOR_THICKNESS, span),
            },
        }
    }

    pub fn wall_length(&self) -> f32 {
        self.left.size.z
    }

    /// Nearest and farthest z covered by the floor.
    pub fn z_range(&self) -> (f32, f32) {
        let half = self.floor.size.z * 0.5;
        (self.floor.center.z + half, self.floor.center.z - half)
    }

    pub fn walls(&self) -> [BoxSpec; 3] {
        [self.left, self.right, self.back]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub seed: u64,
    pub block_count: u32,
    pub blocks: Vec<BlockSpec>,
    pub bounds: Bounds,
}

impl LevelLayout {
    pub fn bounds_length(&self) -> u32 {
        self.bounds.length
    }

    pub fn finish(&self) -> &BlockSpec {
        // `generate` always appends the finish block last.
        &self.blocks[self.blocks.len() - 1]
    }
}

pub fn block_position(index: u32) -> Vec3 {
    Vec3::new(0.0, 0.0, -(index as f32) * BLOCK_SPACING)
}

/// Generate a course of `count` obstacles drawn from the default archetypes.
pub fn generate(count: u32, seed: u64) -> LevelResult<LevelLayout> {
    generate_with(count, seed, &BlockKind::OBSTACLES)
}

/// Course length in blocks for `count` obstacles, start and finish included.
///
/// Accepts 1..=`MAX_BLOCKS_COUNT` obstacles.
pub fn course_length(count: u32) -> LevelResult<u32> {
    let too_long = || LevelError::TooLong {
        count,
        max: MAX_BLOCKS_COUNT,
    };
    if count == 0 {
        return Err(LevelError::EmptyLevel);
    }
    if count > MAX_BLOCKS_COUNT {
        return Err(too_long());
    }
    count.checked_add(2).ok_or_else(too_long)
}

/// Generate a course of `count` obstacles drawn uniformly from `types`.
///
/// The same `(count, seed, types)` always produces the same layout, motion
/// parameters included.
pub fn generate_with(count: u32, seed: u64, types: &[BlockKind]) -> LevelResult<LevelLayout> {
    let length = course_length(count)?;
    if types.is_empty() {
        return Err(LevelError::EmptyTypeSet);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut blocks = Vec::with_capacity(length as usize);

    blocks.push(BlockSpec::new(BlockKind::Start, block_position(0), &mut rng));
    for i in 1..=count {
        let kind = types[rng.gen_range(0..types.len())];
        blocks.push(BlockSpec::new(kind, block_position(i), &mut rng));
    }
    blocks.push(BlockSpec::new(BlockKind::End, block_position(length - 1), &mut rng));

    Ok(LevelLayout {
        seed,
        block_count: count,
        blocks,
        bounds: Bounds::new(length),
    })
}

/// Holds the layout for the last `(count, seed)` asked for.
#[derive(Resource, Default)]
pub struct LevelCache {
    current: Option<Arc<LevelLayout>>,
}

impl LevelCache {
    pub fn get_or_generate(&mut self, count: u32, seed: u64) -> LevelResult<Arc<LevelLayout>> {
        if let Some(layout) = &self.current {
            if layout.block_count == count && layout.seed == seed {
                return Ok(layout.clone());
            }
        }

        let layout = Arc::new(generate(count, seed)?);
        self.current = Some(layout.clone());
        Ok(layout)
    }

    pub fn current(&self) -> Option<&Arc<LevelLayout>> {
        self.current.as_ref()
    }
}

#[derive(Default)]
pub struct SpawnedLevel {
    layout: Option<Arc<LevelLayout>>,
    failed: Option<(u32, u64)>,
}

/// Keep the spawned course in step with the store's count and seed.
pub fn sync_level(
    mut commands: Commands,
    store: Res<GameStore>,
    mut cache: ResMut<LevelCache>,
    mut spawned: Local<SpawnedLevel>,
    level_entities: Query<Entity, With<LevelEntity>>,
) {
    let key = (store.blocks_count, store.blocks_seed);
    if spawned.failed == Some(key) {
        return;
    }

    let layout = match cache.get_or_generate(key.0, key.1) {
        Ok(layout) => layout,
        Err(e) => {
            warn!("Cannot build level (count {}, seed {}): {e}", key.0, key.1);
            spawned.failed = Some(key);
            return;
        }
    };
    spawned.failed = None;

    if let Some(current) = &spawned.layout {
        if Arc::ptr_eq(current, &layout) {
            return;
        }
    }

    for entity in &level_entities {
        commands.entity(entity).despawn_recursive();
    }

    spawn_level(&mut commands, &layout);
    info!(
        "Built level: {} obstacles, seed {}",
        layout.block_count, layout.seed
    );
    spawned.layout = Some(layout);
}

pub fn spawn_level(commands: &mut Commands, layout: &LevelLayout) {
    for block in &layout.blocks {
        spawn_block(commands, block);
    }
    spawn_bounds(commands, &layout.bounds);
}

fn spawn_block(commands: &mut Commands, block: &BlockSpec) {
    // floor tile
    commands.spawn((
        LevelEntity,
        block.geometry,
        TransformBundle::from_transform(Transform::from_translation(block.floor_center())),
    ));

    if let (Some(size), Some(motion)) = (block.kind.obstacle_size(), block.motion) {
        commands.spawn((
            LevelEntity,
            Obstacle {
                kind: block.kind,
                base: block.position,
                motion,
            },
            Geometry {
                scale: size,
                material: BlockMaterial::Obstacle,
            },
            RigidBody::KinematicPositionBased,
            Collider::cuboid(size.x * 0.5, size.y * 0.5, size.z * 0.5),
            Restitution::coefficient(OBSTACLE_RESTITUTION),
            Friction::coefficient(0.0),
            TransformBundle::from_transform(block.rest_pose()),
        ));
    }

    if block.kind == BlockKind::End {
        let half = TROPHY_SIZE * 0.5;
        commands.spawn((
            LevelEntity,
            Geometry {
                scale: TROPHY_SIZE,
                material: BlockMaterial::Obstacle,
            },
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y, half.z),
            Restitution::coefficient(OBSTACLE_RESTITUTION),
            Friction::coefficient(0.0),
            TransformBundle::from_transform(Transform::from_translation(
                block.position + Vec3::Y * half.y,
            )),
        ));
    }
}

fn spawn_bounds(commands: &mut Commands, bounds: &Bounds) {
    commands
        .spawn((
            LevelEntity,
            RigidBody::Fixed,
            TransformBundle::default(),
            VisibilityBundle::default(),
        ))
        .with_children(|c| {
            for wall in bounds.walls() {
                let half = wall.half_extents();
                c.spawn((
                    Geometry {
                        scale: wall.size,
                        material: BlockMaterial::Wall,
                    },
                    Collider::cuboid(half.x, half.y, half.z),
                    Restitution::coefficient(WALL_RESTITUTION),
                    Friction::coefficient(0.0),
                    TransformBundle::from_transform(Transform::from_translation(wall.center)),
                ));
            }

            let half = bounds.floor.half_extents();
            c.spawn((
                Collider::cuboid(half.x, half.y, half.z),
                Restitution::coefficient(WALL_RESTITUTION),
                Friction::coefficient(FLOOR_FRICTION),
                TransformBundle::from_transform(Transform::from_translation(bounds.floor.center)),
            ));
        });
}
