use crate::error::SoftBodyError;

pub const DEFAULT_TIME_STEP: f32 = 1. / 300.;
pub const DEFAULT_MAX_FRAME_TIME: f32 = 0.25;

/// Splits variable frame times into fixed simulation increments. Time that
/// does not fill a whole increment carries over to the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStepper {
    time_step: f32,
    max_frame_time: f32,
    accumulator: f32,
}

impl Default for FixedStepper {
    fn default() -> Self {
        FixedStepper {
            time_step: DEFAULT_TIME_STEP,
            max_frame_time: DEFAULT_MAX_FRAME_TIME,
            accumulator: 0.,
        }
    }
}

impl FixedStepper {
    /// Fails unless `time_step` is finite and above zero. A negative or NaN
    /// frame cap means no frame time is ever accepted.
    pub fn new(time_step: f32, max_frame_time: f32) -> Result<Self, SoftBodyError> {
        if !time_step.is_finite() || time_step <= 0. {
            return Err(SoftBodyError::InvalidTimeStep(time_step));
        }
        Ok(FixedStepper {
            time_step,
            max_frame_time: max_frame_time.max(0.),
            accumulator: 0.,
        })
    }

    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Leftover fraction of an increment, in `[0, 1)`.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.time_step
    }

    /// Feeds one frame and calls `step` once per whole increment. Frame times
    /// above the cap are clamped so a stall cannot trigger a runaway catch up.
    pub fn advance<F>(&mut self, frame_time: f32, mut step: F) -> usize
    where
        F: FnMut(f32),
    {
        let frame_time = if frame_time.is_finite() {
            frame_time.clamp(0., self.max_frame_time)
        } else {
            0.
        };
        self.accumulator += frame_time;
        let mut steps = 0;
        while self.accumulator >= self.time_step {
            step(self.time_step);
            self.accumulator -= self.time_step;
            steps += 1;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.;
    }
}
