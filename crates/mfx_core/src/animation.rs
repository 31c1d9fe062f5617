//! Frame-based sprite animation with deterministic tick logic.
//!
//! A clip is a non-empty ordered list of sheet region ids advanced at a
//! uniform interval. All timing uses integer microseconds (`u64`) so
//! advancement is exact under the fixed-timestep model -- no floating-point
//! drift across platforms.
//!
//! When the elapsed accumulator reaches the interval it resets to zero and
//! the frame index advances by one, modulo the frame count. The reset (rather
//! than a subtract-and-carry loop) means at most one frame advance per tick;
//! at a 100 ms interval and 60 Hz steps that cadence is the observable one.

use std::fmt;

/// Named animation state of an actor. Which states a character actually
/// defines is a content decision; enemies only ever walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorState {
    Idle,
    Walking,
    Jumping,
}

impl ActorState {
    pub const ALL: &'static [ActorState] =
        &[ActorState::Idle, ActorState::Walking, ActorState::Jumping];

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walking => "walking",
            Self::Jumping => "jumping",
        }
    }
}

impl fmt::Display for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validated frame sequence. Construction rejects empty frame lists and
/// zero intervals, so `Animator::tick` can index unconditionally.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    frames: Vec<String>,
    interval_us: u64,
}

impl AnimationClip {
    pub fn new(frames: Vec<String>, interval_us: u64) -> Result<Self, String> {
        if frames.is_empty() {
            return Err("Animation clip has no frames".to_string());
        }
        if interval_us == 0 {
            return Err("Animation clip has zero frame interval".to_string());
        }
        Ok(Self {
            frames,
            interval_us,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> &str {
        &self.frames[index % self.frames.len()]
    }

    pub fn interval_us(&self) -> u64 {
        self.interval_us
    }

    pub fn frames(&self) -> impl Iterator<Item = &str> {
        self.frames.iter().map(String::as_str)
    }
}

/// Runtime state of one animated actor: the active state plus frame cursor.
#[derive(Debug, Clone)]
pub struct Animator {
    state: ActorState,
    frame_index: usize,
    elapsed_us: u64,
}

impl Animator {
    pub fn new(state: ActorState) -> Self {
        Self {
            state,
            frame_index: 0,
            elapsed_us: 0,
        }
    }

    pub fn state(&self) -> ActorState {
        self.state
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Switch the active state. Index and accumulator reset so a stale high
    /// index can never address past the end of a shorter clip.
    pub fn set_state(&mut self, state: ActorState) {
        if self.state != state {
            self.state = state;
            self.frame_index = 0;
            self.elapsed_us = 0;
        }
    }

    /// Advance by `dt_us` against the clip for the active state and return
    /// the current frame's region id.
    pub fn tick<'a>(&mut self, dt_us: u64, clip: &'a AnimationClip) -> &'a str {
        self.elapsed_us += dt_us;
        if self.elapsed_us >= clip.interval_us {
            self.elapsed_us = 0;
            self.frame_index = (self.frame_index + 1) % clip.frame_count();
        }
        // A state switch can leave the index pointing into a longer previous
        // clip for the remainder of the current tick; the modulo read keeps
        // the lookup in bounds regardless.
        clip.frame(self.frame_index)
    }

    /// Current frame id without advancing time.
    pub fn current_frame<'a>(&self, clip: &'a AnimationClip) -> &'a str {
        clip.frame(self.frame_index)
    }
}
