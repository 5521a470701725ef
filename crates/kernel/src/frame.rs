use std::time::Instant;

use rockyard_common::DrawCommand;
use rockyard_input::{InputSource, InputState};
use serde::{Deserialize, Serialize};

use crate::camera::CameraState;
use crate::config::WorldConfig;
use crate::timing::{Clock, FrameClock, FrameTimer};
use crate::world::{World, WorldEvent};

/// Lifecycle of the frame loop. `Closing` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Running,
    Closing,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub tick: u64,
    pub camera: CameraState,
    pub draws: Vec<DrawCommand>,
    /// Events raised by the tick that produced this frame.
    pub events: Vec<WorldEvent>,
}

/// Frames kept in the timing window.
const TIMER_WINDOW: usize = 120;

/// Per-frame driver: owns the world, turns clock readings into deltas, and
/// stops for good once a close is requested.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    state: RunState,
    clock: FrameClock,
    timer: FrameTimer,
}

impl Simulation {
    pub fn new(config: WorldConfig) -> Self {
        Self::from_world(World::new(config))
    }

    pub fn from_world(world: World) -> Self {
        let clock = FrameClock::new(world.config().timing);
        Self {
            world,
            state: RunState::Running,
            clock,
            timer: FrameTimer::new(TIMER_WINDOW),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Wall time spent inside recent ticks.
    pub fn frame_timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Enter `Closing`. No further ticks run.
    pub fn request_close(&mut self) {
        if self.state == RunState::Running {
            tracing::info!(tick = self.world.tick(), "close requested, stopping");
            self.state = RunState::Closing;
        }
    }

    /// Run one tick with an explicit delta and return the frame to draw.
    ///
    /// The tick's events move out of the world into the frame, so the world
    /// log stays empty between ticks.
    ///
    /// Returns `None` without touching the world once closing, including on
    /// the tick whose input carries the close request.
    pub fn tick(&mut self, input: &InputState, dt: f32) -> Option<Frame> {
        if input.close_requested {
            self.request_close();
        }
        if !self.is_running() {
            return None;
        }
        let started = Instant::now();
        self.world.step(input, dt);
        let mut frame = self.frame();
        frame.events = self.world.drain_events();
        self.timer.record(started.elapsed());
        Some(frame)
    }

    /// Read the clock and the input source, then tick.
    pub fn advance<I, C>(&mut self, input: &mut I, clock: &mut C) -> Option<Frame>
    where
        I: InputSource + ?Sized,
        C: Clock + ?Sized,
    {
        if !self.is_running() {
            return None;
        }
        let dt = self.clock.tick(clock.now_seconds());
        let signals = input.poll();
        self.tick(&signals, dt)
    }

    /// Tick until closing or until `max_frames` frames were produced,
    /// handing each frame to `present`. Returns the number of frames.
    pub fn run<I, C, F>(
        &mut self,
        input: &mut I,
        clock: &mut C,
        max_frames: Option<u64>,
        mut present: F,
    ) -> u64
    where
        I: InputSource + ?Sized,
        C: Clock + ?Sized,
        F: FnMut(&Frame),
    {
        let mut frames = 0;
        while max_frames.is_none_or(|max| frames < max) {
            let Some(frame) = self.advance(input, clock) else {
                break;
            };
            present(&frame);
            frames += 1;
        }
        tracing::debug!(frames, state = ?self.state, "frame loop exited");
        frames
    }

    /// Snapshot of the current world for the renderer. Carries no events.
    pub fn frame(&self) -> Frame {
        Frame {
            tick: self.world.tick(),
            camera: *self.world.camera(),
            draws: self.world.draw_list(),
            events: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::FixedStepClock;
    use glam::Vec3;
    use rockyard_common::EntityKind;
    use rockyard_input::ScriptedInput;

    #[test]
    fn close_request_is_terminal() {
        let mut sim = Simulation::new(WorldConfig::default());
        assert!(sim.tick(&InputState::idle(), 0.016).is_some());
        assert!(sim.tick(&InputState::close(), 0.016).is_none());
        assert_eq!(sim.state(), RunState::Closing);
        // Later input does nothing.
        assert!(sim.tick(&InputState::forward(), 0.016).is_none());
        assert_eq!(sim.world().tick(), 1);
    }

    #[test]
    fn run_stops_at_close_request() {
        let mut sim = Simulation::new(WorldConfig::default());
        let mut input: ScriptedInput = "w:10,esc,w:10".parse().unwrap();
        let mut clock = FixedStepClock::from_fps(60.0);
        let mut seen = Vec::new();
        let frames = sim.run(&mut input, &mut clock, None, |f| seen.push(f.tick));
        assert_eq!(frames, 10);
        assert_eq!(seen, (1..=10).collect::<Vec<_>>());
        assert!(!sim.is_running());
    }

    #[test]
    fn run_respects_frame_limit() {
        let mut sim = Simulation::new(WorldConfig::default());
        let mut input = InputState::idle();
        let mut clock = FixedStepClock::from_fps(60.0);
        let frames = sim.run(&mut input, &mut clock, Some(25), |_| {});
        assert_eq!(frames, 25);
        assert!(sim.is_running());
        assert_eq!(sim.frame_timer().count(), 25);
    }

    #[test]
    fn advance_uses_clock_deltas() {
        let config = WorldConfig {
            obstacles: Vec::new(),
            ..WorldConfig::default()
        };
        let mut sim = Simulation::new(config);
        let mut input = InputState::forward();
        let mut clock = FixedStepClock::from_fps(10.0);
        // First tick has no previous reading and barely moves.
        sim.advance(&mut input, &mut clock);
        let first = sim.world().player().actor.position.z;
        assert!(first > -1e-3);
        sim.advance(&mut input, &mut clock);
        let second = sim.world().player().actor.position.z;
        assert!((second - first + 0.3).abs() < 1e-4);
    }

    #[test]
    fn events_leave_the_world_with_each_frame() {
        let mut sim = Simulation::new(WorldConfig::default());
        let mut input = InputState::idle();
        let mut clock = FixedStepClock::from_fps(60.0);
        let mut per_frame = Vec::new();
        let frames = sim.run(&mut input, &mut clock, Some(5_000), |f| {
            per_frame.push(f.events.len());
        });
        assert_eq!(frames, 5_000);
        assert!(sim.world().events().is_empty());
        // Idle ticks raise exactly one `Stepped` each.
        assert!(per_frame.iter().all(|&n| n == 1));
    }

    #[test]
    fn frame_carries_its_tick_events() {
        let config = WorldConfig {
            obstacles: Vec::new(),
            ..WorldConfig::default()
        };
        let mut sim = Simulation::new(config);
        let item = sim.world().item().position;
        sim.world_mut().place_player(item);
        let frame = sim.tick(&InputState::idle(), 0.016).unwrap();
        assert!(frame.events.contains(&WorldEvent::ItemCollected { tick: 1 }));
        assert!(matches!(
            frame.events.last(),
            Some(WorldEvent::Stepped { tick: 1, .. })
        ));
        assert!(sim.world().events().is_empty());
    }

    #[test]
    fn frame_mirrors_world() {
        let mut sim = Simulation::new(WorldConfig::default());
        let frame = sim.tick(&InputState::idle(), 0.016).unwrap();
        assert_eq!(frame.tick, 1);
        assert_eq!(frame.camera, *sim.world().camera());
        assert_eq!(frame.draws.first().map(|d| d.kind), Some(EntityKind::Ground));
        assert_eq!(frame.draws.last().map(|d| d.kind), Some(EntityKind::Player));
        assert_eq!(
            frame.draws.last().map(|d| d.transform.translation),
            Some(Vec3::new(0.0, -1.0, 0.0))
        );
    }
}
