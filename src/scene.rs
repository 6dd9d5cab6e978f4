//! Presentation: lights, colors and meshes for whatever the game logic spawns.
//!
//! Nothing here feeds back into gameplay. Logic entities carry a
//! [`Geometry`] descriptor and this plugin dresses them when they appear.

use crate::blocks::{BlockMaterial, Geometry};
use crate::player::Player;
use crate::PLAYER_RADIUS;
use bevy::prelude::*;
use std::f32::consts::PI;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::rgb(0.741, 0.929, 0.988)))
            .insert_resource(AmbientLight {
                color: Color::WHITE,
                brightness: 0.5,
            })
            .add_startup_system(setup_scene)
            .add_system(dress_geometry)
            .add_system(dress_player);
    }
}

#[derive(Resource)]
pub struct Palette {
    floor: Handle<StandardMaterial>,
    track: Handle<StandardMaterial>,
    obstacle: Handle<StandardMaterial>,
    wall: Handle<StandardMaterial>,
    marble: Handle<StandardMaterial>,
}

impl Palette {
    fn get(&self, material: BlockMaterial) -> Handle<StandardMaterial> {
        match material {
            BlockMaterial::Floor => self.floor.clone(),
            BlockMaterial::Track => self.track.clone(),
            BlockMaterial::Obstacle => self.obstacle.clone(),
            BlockMaterial::Wall => self.wall.clone(),
        }
    }
}

fn setup_scene(mut commands: Commands, mut materials: ResMut<Assets<StandardMaterial>>) {
    commands.insert_resource(Palette {
        floor: materials.add(Color::rgb(0.196, 0.804, 0.196).into()),
        track: materials.add(Color::rgb(0.678, 1.0, 0.184).into()),
        obstacle: materials.add(Color::rgb(1.0, 0.271, 0.0).into()),
        wall: materials.add(Color::rgb(0.439, 0.502, 0.565).into()),
        marble: materials.add(StandardMaterial {
            base_color: Color::rgb(0.576, 0.439, 0.859),
            perceptual_roughness: 0.6,
            ..default()
        }),
    });

    // light
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        transform: Transform {
            translation: Vec3::new(4.0, 4.0, 1.0),
            rotation: Quat::from_rotation_x(-PI / 4.),
            ..default()
        },
        ..default()
    });
}

fn dress_geometry(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    palette: Res<Palette>,
    query: Query<(Entity, &Geometry), Added<Geometry>>,
) {
    for (entity, geometry) in &query {
        let size = geometry.scale;
        commands.entity(entity).insert((
            meshes.add(Mesh::from(shape::Box::new(size.x, size.y, size.z))),
            palette.get(geometry.material),
            VisibilityBundle::default(),
        ));
    }
}

fn dress_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    palette: Res<Palette>,
    query: Query<Entity, Added<Player>>,
) {
    for entity in &query {
        commands.entity(entity).insert((
            meshes.add(Mesh::from(shape::UVSphere {
                radius: PLAYER_RADIUS,
                sectors: 16,
                stacks: 8,
            })),
            palette.marble.clone(),
            VisibilityBundle::default(),
        ));
    }
}
