//! Race progress: which phase the game is in, the course parameters, and the
//! race clock.
//!
//! [`GameStore`] is the single authority. Every accepted transition is
//! announced as a [`PhaseChanged`] event; anything that must react to a phase
//! change (resetting the marble, rebuilding the course) reads those events or
//! the store instead of polling its own copy.

use crate::config::GameConfig;
use crate::controls::Controls;
use crate::DEFAULT_BLOCKS_COUNT;
use bevy::prelude::*;
use rand::Rng;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GamePhase {
    #[default]
    Ready,
    Playing,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChanged {
    pub from: GamePhase,
    pub to: GamePhase,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameStore {
    pub phase: GamePhase,
    pub blocks_count: u32,
    pub blocks_seed: u64,
    pub start_time: f32,
    pub end_time: f32,
}

impl Default for GameStore {
    fn default() -> Self {
        Self {
            phase: GamePhase::Ready,
            blocks_count: DEFAULT_BLOCKS_COUNT,
            blocks_seed: 0,
            start_time: 0.0,
            end_time: 0.0,
        }
    }
}

impl GameStore {
    /// Ready → Playing. `now` is the simulation clock in seconds.
    pub fn start(&mut self, now: f32) -> Option<PhaseChanged> {
        if self.phase != GamePhase::Ready {
            return None;
        }
        self.start_time = now;
        Some(self.transition(GamePhase::Playing))
    }

    /// Playing or Ended → Ready, on a freshly seeded course.
    pub fn restart(&mut self) -> Option<PhaseChanged> {
        self.restart_with_seed(rand::thread_rng().gen())
    }

    pub fn restart_with_seed(&mut self, seed: u64) -> Option<PhaseChanged> {
        if self.phase == GamePhase::Ready {
            return None;
        }
        self.blocks_seed = seed;
        Some(self.transition(GamePhase::Ready))
    }

    /// Playing → Ended.
    pub fn end(&mut self, now: f32) -> Option<PhaseChanged> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        self.end_time = now;
        Some(self.transition(GamePhase::Ended))
    }

    /// Race time so far, frozen once the course is finished.
    pub fn elapsed(&self, now: f32) -> f32 {
        match self.phase {
            GamePhase::Ready => 0.0,
            GamePhase::Playing => now - self.start_time,
            GamePhase::Ended => self.end_time - self.start_time,
        }
    }

    fn transition(&mut self, to: GamePhase) -> PhaseChanged {
        let change = PhaseChanged {
            from: self.phase,
            to,
        };
        self.phase = to;
        debug!("Phase {:?} -> {:?}", change.from, change.to);
        change
    }
}

pub fn apply_config_to_store(config: Res<GameConfig>, mut store: ResMut<GameStore>) {
    store.blocks_count = config.blocks_count;
}

pub fn start_on_input(
    time: Res<Time>,
    controls: Res<Controls>,
    mut store: ResMut<GameStore>,
    mut phase_events: EventWriter<PhaseChanged>,
) {
    if !controls.any_changed {
        return;
    }
    if let Some(change) = store.start(time.elapsed_seconds()) {
        phase_events.send(change);
    }
}

pub fn restart_on_request(
    controls: Res<Controls>,
    mut store: ResMut<GameStore>,
    mut phase_events: EventWriter<PhaseChanged>,
) {
    if !controls.restart {
        return;
    }
    if let Some(change) = store.restart() {
        phase_events.send(change);
    }
}
