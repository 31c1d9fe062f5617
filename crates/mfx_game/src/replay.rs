//! Scripted input playback for simulation tests.
//!
//! A replay is a JSON list of input frames with repeat counts, expanded into
//! one intent per fixed step. Because the integrator is fixed-step and
//! integer-timed, the same sequence must always land on the same final state;
//! the tests here pin that down.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::world::PlayerIntent;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub move_x: f32,
    #[serde(default)]
    pub jump_pressed: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    pub fn expanded_intents(&self) -> Vec<PlayerIntent> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for _ in 0..frame.repeat.max(1) {
                out.push(PlayerIntent {
                    move_x: frame.move_x.clamp(-1.0, 1.0),
                    jump_pressed: frame.jump_pressed,
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(replay)
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{GROUND_LINE, SCREEN_WIDTH};
    use glam::Vec2;
    use mfx_core::body::KinematicBody;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "mfx_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn spawn_body() -> KinematicBody {
        let size = Vec2::new(32.0, 64.0);
        let mut body = KinematicBody::new(Vec2::new(100.0, GROUND_LINE - size.y), size);
        body.grounded = true;
        body
    }

    fn run(body: &mut KinematicBody, intents: &[PlayerIntent]) {
        for intent in intents {
            body.walk(intent.move_x);
            if intent.jump_pressed {
                body.jump();
            }
            body.integrate(GROUND_LINE);
        }
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "move_x": 1.0, "repeat": 3 },
                { "jump_pressed": true, "repeat": 1 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_intents();
        assert_eq!(expanded.len(), 4);
        assert!(expanded[3].jump_pressed);
        assert!(!expanded[0].jump_pressed);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_empty_frame_list() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn out_of_range_move_is_clamped() {
        let path = temp_file_path("clamp");
        fs::write(&path, r#"{ "frames": [ { "move_x": 7.5 } ] }"#).expect("write replay file");
        let replay = load_replay_from_path(&path).expect("replay should load");
        assert_eq!(replay.expanded_intents()[0].move_x, 1.0);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let path = temp_file_path("deterministic");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "move_x": 1.0, "repeat": 60 },
                { "move_x": 1.0, "jump_pressed": true, "repeat": 1 },
                { "move_x": 1.0, "repeat": 60 },
                { "move_x": -1.0, "repeat": 45 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let intents = replay.expanded_intents();

        let mut run_a = spawn_body();
        let mut run_b = spawn_body();
        run(&mut run_a, &intents);
        run(&mut run_b, &intents);

        assert!((run_a.position.x - run_b.position.x).abs() < 0.0001);
        assert!((run_a.position.y - run_b.position.y).abs() < 0.0001);
        assert!((run_a.velocity.x - run_b.velocity.x).abs() < 0.0001);
        assert!((run_a.velocity.y - run_b.velocity.y).abs() < 0.0001);
        assert_eq!(run_a.grounded, run_b.grounded);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replayed_jump_lands_back_on_the_ground() {
        let path = temp_file_path("land");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "jump_pressed": true },
                { "repeat": 120 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let mut body = spawn_body();
        let rest_y = body.position.y;
        run(&mut body, &replay.expanded_intents());

        assert!(body.grounded);
        assert!((body.position.y - rest_y).abs() < 0.0001);
        assert!(body.position.x < SCREEN_WIDTH);

        let _ = fs::remove_file(path);
    }
}
