//! Fixed-timestep loop timing.
//!
//! The loop runs on a wall-clock accumulator: each frame `begin_frame()`
//! measures the real elapsed time and feeds it into the accumulator, then the
//! caller drains whole fixed steps with `while time.should_step() { ... }`.
//! Simulation therefore always advances in exact `fixed_dt` slices regardless
//! of render frame rate, which is what makes replayed input sequences land on
//! identical states.
//!
//! The accumulator is capped so a long stall (debugger pause, window drag)
//! produces at most `max_accumulator` worth of catch-up steps.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,
    pub interpolation_alpha: f64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    /// `ticks_per_second` is the target simulation rate (60 for every title
    /// this engine ships).
    pub fn new(ticks_per_second: u32) -> Self {
        let fixed_dt = 1.0 / f64::from(ticks_per_second.max(1));
        Self {
            fixed_dt,
            max_accumulator: 0.25,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            interpolation_alpha: 0.0,
            fps_samples: [fixed_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 1.0 / fixed_dt,
            smoothed_frame_time_ms: fixed_dt * 1000.0,
        }
    }

    /// The fixed step in whole microseconds, for integer-time consumers
    /// (the frame animator).
    pub fn fixed_dt_us(&self) -> u64 {
        (self.fixed_dt * 1_000_000.0).round() as u64
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms — capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn end_frame(&mut self) {
        self.interpolation_alpha = self.accumulator / self.fixed_dt;
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new(60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_dt_matches_tick_rate() {
        let time = TimeState::new(60);
        assert!((time.fixed_dt - 1.0 / 60.0).abs() < 1e-12);
        assert_eq!(time.fixed_dt_us(), 16_667);
    }

    #[test]
    fn no_steps_until_accumulator_fills() {
        let mut time = TimeState::new(60);
        // Manually feed half a step's worth of time.
        time.accumulator = time.fixed_dt * 0.5;
        assert!(!time.should_step());
    }

    #[test]
    fn accumulator_drains_in_whole_steps() {
        let mut time = TimeState::new(60);
        time.accumulator = time.fixed_dt * 3.5;

        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 3);
        assert_eq!(time.fixed_step_count, 3);
        // Remainder stays for the next frame.
        assert!(time.accumulator > 0.0 && time.accumulator < time.fixed_dt);
    }

    #[test]
    fn end_frame_yields_alpha_in_unit_range() {
        let mut time = TimeState::new(60);
        time.accumulator = time.fixed_dt * 0.25;
        time.end_frame();
        assert!((time.interpolation_alpha - 0.25).abs() < 1e-9);
    }

    #[test]
    fn begin_frame_caps_long_stalls() {
        let mut time = TimeState::new(60);
        time.max_accumulator = 0.1;
        // Simulate a 10s stall by back-dating the last instant.
        time.last_instant = Instant::now() - std::time::Duration::from_secs(10);
        time.begin_frame();
        assert!(time.real_dt <= 0.1 + 1e-9);
        assert!(time.accumulator <= 0.1 + 1e-9);
    }
}
