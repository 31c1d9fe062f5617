//! Gameplay simulation state.
//!
//! `PlayWorld` owns every actor and is passed by reference into update and
//! mesh building -- there is no global game object, and none of this touches
//! the display, so the whole simulation runs under `cargo test`.
//!
//! Update order per fixed step: players apply input intent and integrate,
//! enemies bounce-patrol and integrate, then every animator is retargeted
//! from its body's motion and ticked.

use glam::Vec2;

use mfx_core::animation::{ActorState, Animator};
use mfx_core::body::KinematicBody;

use crate::cast::{Cast, CharacterId};
use crate::level::LevelSpec;

pub const SCREEN_WIDTH: f32 = 800.0;
pub const SCREEN_HEIGHT: f32 = 600.0;
pub const TILE_SIZE: f32 = 40.0;
/// Top of the walkable ground strip.
pub const GROUND_LINE: f32 = SCREEN_HEIGHT - TILE_SIZE;

const MARIO_SPAWN_X: f32 = 100.0;
const LUIGI_SPAWN_X: f32 = 200.0;

/// One player's intent for a fixed step, derived from key state by the loop:
/// movement from held keys, jump from a press edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerIntent {
    pub move_x: f32,
    pub jump_pressed: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WorldInput {
    pub mario: PlayerIntent,
    pub luigi: PlayerIntent,
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub character: CharacterId,
    pub body: KinematicBody,
    pub animator: Animator,
}

impl Actor {
    fn spawn(character: CharacterId, x: f32, cast: &Cast) -> Self {
        let (w, h) = cast.body_size(character);
        let state = if character.is_player() {
            ActorState::Idle
        } else {
            ActorState::Walking
        };
        Self {
            character,
            // Feet on the ground line; the first integration tick clips and
            // sets `grounded`.
            body: KinematicBody::new(Vec2::new(x, GROUND_LINE - h), Vec2::new(w, h)),
            animator: Animator::new(state),
        }
    }
}

/// The rotating, breathing backdrop behind gameplay: rotation creeps while
/// the scale ping-pongs between its bounds.
#[derive(Debug, Clone)]
pub struct BackdropFx {
    pub angle_deg: f32,
    pub scale: f32,
    scale_speed: f32,
}

const BACKDROP_ROTATION_PER_TICK: f32 = 0.05;
const BACKDROP_MIN_SCALE: f32 = 0.5;
const BACKDROP_MAX_SCALE: f32 = 1.2;

impl BackdropFx {
    pub fn new() -> Self {
        Self {
            angle_deg: 0.0,
            scale: 1.0,
            scale_speed: 0.01,
        }
    }

    pub fn tick(&mut self) {
        self.angle_deg += BACKDROP_ROTATION_PER_TICK;
        self.scale += self.scale_speed;
        if self.scale > BACKDROP_MAX_SCALE || self.scale < BACKDROP_MIN_SCALE {
            self.scale_speed = -self.scale_speed;
        }
    }
}

impl Default for BackdropFx {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct PlayWorld {
    pub theme: &'static str,
    pub sky: [f64; 3],
    pub mario: Actor,
    pub luigi: Actor,
    pub enemies: Vec<Actor>,
    pub backdrop: BackdropFx,
}

impl PlayWorld {
    pub fn spawn(level: &LevelSpec, cast: &Cast) -> Self {
        let enemies = level
            .enemies
            .iter()
            .map(|spawn| {
                let mut actor = Actor::spawn(spawn.character, spawn.x, cast);
                actor.body.velocity.x = spawn.speed;
                actor
            })
            .collect();

        Self {
            theme: level.theme,
            sky: level.sky,
            mario: Actor::spawn(CharacterId::Mario, MARIO_SPAWN_X, cast),
            luigi: Actor::spawn(CharacterId::Luigi, LUIGI_SPAWN_X, cast),
            enemies,
            backdrop: BackdropFx::new(),
        }
    }

    pub fn actor_count(&self) -> usize {
        2 + self.enemies.len()
    }

    /// One fixed simulation step.
    pub fn update(&mut self, input: &WorldInput, dt_us: u64, cast: &Cast) {
        self.backdrop.tick();

        step_player(&mut self.mario, input.mario);
        step_player(&mut self.luigi, input.luigi);

        for enemy in &mut self.enemies {
            enemy.body.bounce_in_span(0.0, SCREEN_WIDTH);
            enemy.body.integrate(GROUND_LINE);
        }

        // Animators follow the bodies they render. Enemies stay on their walk
        // cycle; players derive their state from motion.
        for actor in [&mut self.mario, &mut self.luigi] {
            actor.animator.set_state(actor.body.motion_state());
            let clip = cast.clip(actor.character, actor.animator.state());
            actor.animator.tick(dt_us, clip);
        }
        for enemy in &mut self.enemies {
            let clip = cast.clip(enemy.character, ActorState::Walking);
            enemy.animator.tick(dt_us, clip);
        }
    }

    /// All actors in draw order (enemies behind players).
    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.enemies
            .iter()
            .chain([&self.mario, &self.luigi])
    }
}

fn step_player(actor: &mut Actor, intent: PlayerIntent) {
    actor.body.walk(intent.move_x);
    if intent.jump_pressed {
        actor.body.jump();
    }
    actor.body.integrate(GROUND_LINE);
}
