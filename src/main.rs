use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use marble_race::scene::ScenePlugin;
use marble_race::MarbleRacePlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Marble Race".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugin(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugin(RapierDebugRenderPlugin::default())
        .add_plugin(MarbleRacePlugin)
        .add_plugin(ScenePlugin)
        .run();
}
