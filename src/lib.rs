pub mod blocks;
pub mod camera;
pub mod config;
pub mod controls;
pub mod error;
pub mod game;
pub mod level;
pub mod motion;
pub mod player;
pub mod scene;

use bevy::prelude::*;
use bevy_rapier3d::prelude::PhysicsSet;

pub const DEFAULT_BLOCKS_COUNT: u32 = 10;
pub const MAX_BLOCKS_COUNT: u32 = 1000;
pub const BLOCK_SPACING: f32 = 4.0;
pub const BLOCK_WIDTH: f32 = 4.0;
pub const DEFAULT_POSITION: Vec3 = Vec3::Y;
pub const PLAYER_RADIUS: f32 = 0.3;
pub const IMPULSE_STRENGTH: f32 = 0.6;
pub const TORQUE_STRENGTH: f32 = 0.2;
pub const JUMP_IMPULSE: f32 = 0.5;
pub const GROUND_PROBE_OFFSET: f32 = 0.31;
pub const GROUND_PROBE_MAX_TOI: f32 = 10.0;
pub const GROUND_THRESHOLD: f32 = 0.15;
pub const CAMERA_SMOOTHING: f32 = 5.0;
pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 0.65, 2.25);
pub const CAMERA_TARGET_OFFSET: Vec3 = Vec3::new(0.0, 0.25, 0.0);
pub const CAMERA_START: Vec3 = Vec3::splat(10.0);
pub const FALL_THRESHOLD: f32 = -4.0;
pub const FINISH_MARGIN: f32 = 2.0;

/// Game logic: level assembly, obstacle motion, the marble and its camera.
///
/// Expects `RapierPhysicsPlugin` to be added by the caller. Everything in the
/// `Update` chain runs before the physics step; the camera reads the pose the
/// step wrote back.
pub struct MarbleRacePlugin;

impl Plugin for MarbleRacePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<config::GameConfig>()
            .init_resource::<game::GameStore>()
            .init_resource::<level::LevelCache>()
            .init_resource::<controls::Controls>()
            .add_event::<game::PhaseChanged>()
            .add_startup_systems(
                (config::load_game_config, game::apply_config_to_store)
                    .chain()
                    .in_base_set(StartupSet::PreStartup),
            )
            .add_startup_system(player::setup_player)
            .add_startup_system(camera::setup_camera)
            .add_systems(
                (
                    controls::sample_controls,
                    game::start_on_input,
                    game::restart_on_request,
                    motion::drive_obstacles,
                    player::player_movement,
                    player::player_jump,
                    player::check_progress,
                    player::reset_on_ready,
                    level::sync_level,
                )
                    .chain(),
            )
            .add_system(
                camera::camera_follow
                    .in_base_set(CoreSet::PostUpdate)
                    .after(PhysicsSet::Writeback),
            );
    }
}
