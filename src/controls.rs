use bevy::prelude::*;

const FORWARD: [KeyCode; 2] = [KeyCode::W, KeyCode::Up];
const BACKWARD: [KeyCode; 2] = [KeyCode::S, KeyCode::Down];
const LEFTWARD: [KeyCode; 2] = [KeyCode::A, KeyCode::Left];
const RIGHTWARD: [KeyCode; 2] = [KeyCode::D, KeyCode::Right];
const JUMP: KeyCode = KeyCode::Space;
const RESTART: KeyCode = KeyCode::R;
const CONTROL_KEYS: [KeyCode; 9] = [
    FORWARD[0],
    FORWARD[1],
    BACKWARD[0],
    BACKWARD[1],
    LEFTWARD[0],
    LEFTWARD[1],
    RIGHTWARD[0],
    RIGHTWARD[1],
    JUMP,
];

/// Input for the current tick, sampled once before anything reads it.
///
/// Directions are held state. `jump` and `restart` are true only on the tick
/// the key went down. `any_changed` is true on the tick any control key went
/// down or came back up.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub forward: bool,
    pub backward: bool,
    pub leftward: bool,
    pub rightward: bool,
    pub jump: bool,
    pub any_changed: bool,
    pub restart: bool,
}

impl Controls {
    pub fn sample(keyboard: &Input<KeyCode>) -> Self {
        Self {
            forward: keyboard.any_pressed(FORWARD),
            backward: keyboard.any_pressed(BACKWARD),
            leftward: keyboard.any_pressed(LEFTWARD),
            rightward: keyboard.any_pressed(RIGHTWARD),
            jump: keyboard.just_pressed(JUMP),
            any_changed: keyboard.any_just_pressed(CONTROL_KEYS)
                || keyboard.any_just_released(CONTROL_KEYS),
            restart: keyboard.just_pressed(RESTART),
        }
    }
}

pub fn sample_controls(keyboard: Res<Input<KeyCode>>, mut controls: ResMut<Controls>) {
    *controls = Controls::sample(&keyboard);
}
