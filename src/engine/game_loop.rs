/// Frame timing for the character core
///
/// Produces one variable-length `update` per frame plus a number of
/// fixed-length `fixed_update` passes, the way the hosting runtime ticks
/// the active state. Wall-clock driving goes through `begin_frame`;
/// tests and replays feed durations directly through `advance`.
use std::time::{Duration, Instant};

/// Target fixed update rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of fixed steps per frame to prevent spiral of death
const MAX_FIXED_STEPS: u32 = 5;

/// What the agent should run for one rendered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    /// Variable delta time for `update` (seconds)
    pub dt: f32,
    /// Number of `fixed_update` passes to run after `update`
    pub fixed_steps: u32,
}

impl FrameStep {
    /// A frame that runs no logic at all (paused)
    pub const IDLE: FrameStep = FrameStep {
        dt: 0.0,
        fixed_steps: 0,
    };
}

/// Frame clock state
#[derive(Debug)]
pub struct FrameClock {
    /// Accumulated time for fixed timestep updates
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether the simulation is paused (menu with time scale zero)
    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total fixed updates scheduled
    fixed_update_count: u64,
}

impl FrameClock {
    /// Create a new frame clock
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            frame_count: 0,
            fixed_update_count: 0,
        }
    }

    /// Begin a new frame using wall-clock time
    pub fn begin_frame(&mut self) -> FrameStep {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Advance the clock by an explicit frame duration
    pub fn advance(&mut self, frame_time: Duration) -> FrameStep {
        self.frame_count += 1;

        // Paused frames skip update entirely, like a zero time scale
        if self.paused {
            return FrameStep::IDLE;
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && steps < MAX_FIXED_STEPS {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            steps += 1;
        }

        // Drop whatever could not be simulated this frame
        if steps == MAX_FIXED_STEPS && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::debug!(
                "Frame clock dropping {:?} of backlog",
                self.accumulator
            );
            self.accumulator = Duration::ZERO;
        }

        self.fixed_update_count += steps as u64;
        FrameStep {
            dt: frame_time.as_secs_f32(),
            fixed_steps: steps,
        }
    }

    /// Get the fixed timestep (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Get total number of frames started
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of fixed updates scheduled
    pub fn fixed_update_count(&self) -> u64 {
        self.fixed_update_count
    }

    /// Check if the clock is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the clock
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Frame clock paused");
        }
    }

    /// Resume the clock
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Frame clock resumed");
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
