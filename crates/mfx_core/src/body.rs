//! Kinematic bodies: position + velocity pairs under constant gravity with
//! ground-plane clipping.
//!
//! Units are pixels per tick in screen space (y grows downward), so gravity is
//! a positive constant and a jump is a negative impulse. There is no
//! mass/force model and no horizontal acceleration: held input snaps the
//! horizontal velocity to a signed constant, releasing it snaps back to zero.
//!
//! The only collision is the ground line. `grounded` is true exactly when the
//! last integration tick clipped the body against it, and a grounded body has
//! zero vertical velocity.

use glam::Vec2;

use crate::animation::ActorState;

#[derive(Debug, Clone, Copy)]
pub struct BodyConfig {
    /// Horizontal walk speed, px/tick.
    pub move_speed: f32,
    /// Downward acceleration, px/tick².
    pub gravity: f32,
    /// Vertical velocity set on jump (negative = upward), px/tick.
    pub jump_impulse: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            gravity: 0.8,
            jump_impulse: -15.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KinematicBody {
    /// Top-left corner, screen space.
    pub position: Vec2,
    /// Pixels per tick.
    pub velocity: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    pub facing_right: bool,
    pub config: BodyConfig,
}

impl KinematicBody {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            grounded: false,
            facing_right: true,
            config: BodyConfig::default(),
        }
    }

    /// Snap horizontal velocity from held-key intent. `dir` is -1, 0 or +1;
    /// a non-zero direction also turns the body.
    pub fn walk(&mut self, dir: f32) {
        self.velocity.x = dir * self.config.move_speed;
        if dir > 0.0 {
            self.facing_right = true;
        } else if dir < 0.0 {
            self.facing_right = false;
        }
    }

    /// Edge-triggered jump. Only legal from the ground; an airborne press is
    /// ignored. Returns whether the jump happened.
    pub fn jump(&mut self) -> bool {
        if !self.grounded {
            return false;
        }
        self.velocity.y = self.config.jump_impulse;
        self.grounded = false;
        true
    }

    /// One simulation tick: apply gravity, integrate, clip against the ground
    /// line. `ground_line` is the y coordinate of the walkable floor.
    pub fn integrate(&mut self, ground_line: f32) {
        self.velocity.y += self.config.gravity;
        self.position += self.velocity;

        if self.position.y + self.size.y > ground_line {
            self.position.y = ground_line - self.size.y;
            self.velocity.y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    /// Screen-edge patrol bounce: leaving `[min_x, max_x]` sets the velocity
    /// sign back toward the span (sets, not negates, so a body spawned out of
    /// range cannot oscillate in place). Facing follows the travel direction.
    pub fn bounce_in_span(&mut self, min_x: f32, max_x: f32) {
        if self.position.x + self.size.x > max_x {
            self.velocity.x = -self.velocity.x.abs();
        } else if self.position.x < min_x {
            self.velocity.x = self.velocity.x.abs();
        }
        if self.velocity.x > 0.0 {
            self.facing_right = true;
        } else if self.velocity.x < 0.0 {
            self.facing_right = false;
        }
    }

    /// Animation state implied by current motion.
    pub fn motion_state(&self) -> ActorState {
        if !self.grounded {
            ActorState::Jumping
        } else if self.velocity.x != 0.0 {
            ActorState::Walking
        } else {
            ActorState::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: f32 = 560.0;

    fn grounded_body() -> KinematicBody {
        let mut body = KinematicBody::new(Vec2::new(100.0, 0.0), Vec2::new(32.0, 64.0));
        body.position.y = GROUND - body.size.y;
        body.grounded = true;
        body
    }

    #[test]
    fn gravity_accumulates_before_clip() {
        // Body one pixel above the floor, at rest.
        let mut body = KinematicBody::new(
            Vec2::new(100.0, GROUND - 64.0 - 1.0),
            Vec2::new(32.0, 64.0),
        );

        // Tick 1: velocity picks up one gravity step, position follows, and
        // the body is still 0.2 px short of the ground line.
        body.integrate(GROUND);
        assert!((body.velocity.y - 0.8).abs() < 1e-5);
        assert!((body.position.y - (GROUND - 64.0 - 0.2)).abs() < 1e-4);
        assert!(!body.grounded);

        // Tick 2: the body crosses the line and clips.
        body.integrate(GROUND);
        assert!(body.grounded);
        assert_eq!(body.velocity.y, 0.0);
        assert!((body.position.y - (GROUND - 64.0)).abs() < 1e-5);
    }

    #[test]
    fn ground_clamp_is_idempotent() {
        let mut body = grounded_body();
        let rest_y = body.position.y;
        for _ in 0..100 {
            body.integrate(GROUND);
            assert!(body.grounded);
            assert_eq!(body.velocity.y, 0.0);
            assert!((body.position.y - rest_y).abs() < 1e-5);
        }
    }

    #[test]
    fn jump_only_from_ground() {
        let mut body = grounded_body();
        assert!(body.jump());
        assert_eq!(body.velocity.y, body.config.jump_impulse);
        assert!(!body.grounded);

        // A second press mid-air has no effect on velocity.
        let airborne_vy = body.velocity.y;
        assert!(!body.jump());
        assert_eq!(body.velocity.y, airborne_vy);
    }

    #[test]
    fn jump_arc_returns_to_ground() {
        let mut body = grounded_body();
        let rest_y = body.position.y;
        body.jump();

        let mut peaked = false;
        for _ in 0..120 {
            body.integrate(GROUND);
            if body.position.y < rest_y - 50.0 {
                peaked = true;
            }
            if body.grounded {
                break;
            }
        }
        assert!(peaked, "jump should clear at least 50 px");
        assert!(body.grounded, "body should land within 120 ticks");
        assert!((body.position.y - rest_y).abs() < 1e-4);
    }

    #[test]
    fn walk_snaps_velocity_and_facing() {
        let mut body = grounded_body();
        body.walk(-1.0);
        assert_eq!(body.velocity.x, -body.config.move_speed);
        assert!(!body.facing_right);

        body.walk(1.0);
        assert_eq!(body.velocity.x, body.config.move_speed);
        assert!(body.facing_right);

        // No input zeroes velocity but keeps facing.
        body.walk(0.0);
        assert_eq!(body.velocity.x, 0.0);
        assert!(body.facing_right);
    }

    #[test]
    fn patrol_bounce_reverses_at_edges() {
        let mut body = KinematicBody::new(Vec2::new(770.0, 0.0), Vec2::new(32.0, 32.0));
        body.velocity.x = 2.0;

        // Right edge: sign flips to leftward.
        body.bounce_in_span(0.0, 800.0);
        assert_eq!(body.velocity.x, -2.0);
        assert!(!body.facing_right);

        // Left edge: sign flips back.
        body.position.x = -4.0;
        body.bounce_in_span(0.0, 800.0);
        assert_eq!(body.velocity.x, 2.0);
        assert!(body.facing_right);
    }

    #[test]
    fn bounce_out_of_range_does_not_oscillate() {
        // Spawned well past the right edge and walking right: the bounce sets
        // a leftward sign every tick until back in range, never flip-flops.
        let mut body = KinematicBody::new(Vec2::new(900.0, 0.0), Vec2::new(32.0, 32.0));
        body.velocity.x = 2.0;
        for _ in 0..3 {
            body.bounce_in_span(0.0, 800.0);
            assert_eq!(body.velocity.x, -2.0);
            body.position.x += body.velocity.x;
        }
    }

    #[test]
    fn motion_state_tracks_ground_and_velocity() {
        let mut body = grounded_body();
        assert_eq!(body.motion_state(), ActorState::Idle);

        body.walk(1.0);
        assert_eq!(body.motion_state(), ActorState::Walking);

        body.jump();
        assert_eq!(body.motion_state(), ActorState::Jumping);
    }
}
