//! Built-in level roster.
//!
//! Levels are authored in code, not files. Each entry picks a sky tint and an
//! enemy patrol list; the rest of the stage (ground strip, castle) is shared.
//! The roster is checked once at startup: an empty roster logs a message and
//! the process exits cleanly rather than failing later on a missing level.

use crate::cast::CharacterId;

#[derive(Debug, Clone, Copy)]
pub struct EnemySpawn {
    pub character: CharacterId,
    pub x: f32,
    /// Initial horizontal velocity, px/tick. Sign picks the starting
    /// direction; the magnitude survives edge bounces.
    pub speed: f32,
}

#[derive(Debug, Clone)]
pub struct LevelSpec {
    pub theme: &'static str,
    /// Clear color behind the backdrop, linear RGB.
    pub sky: [f64; 3],
    pub enemies: Vec<EnemySpawn>,
}

pub fn builtin_levels() -> Vec<LevelSpec> {
    vec![
        LevelSpec {
            theme: "grass",
            sky: [0.28, 0.62, 0.82],
            enemies: vec![
                EnemySpawn {
                    character: CharacterId::Goomba,
                    x: 400.0,
                    speed: -2.0,
                },
                EnemySpawn {
                    character: CharacterId::Koopa,
                    x: 600.0,
                    speed: -2.0,
                },
            ],
        },
        LevelSpec {
            theme: "desert",
            sky: [0.80, 0.68, 0.38],
            enemies: vec![
                EnemySpawn {
                    character: CharacterId::Goomba,
                    x: 300.0,
                    speed: -2.0,
                },
                EnemySpawn {
                    character: CharacterId::Goomba,
                    x: 500.0,
                    speed: 2.0,
                },
                EnemySpawn {
                    character: CharacterId::Koopa,
                    x: 650.0,
                    speed: -2.0,
                },
            ],
        },
        LevelSpec {
            theme: "snow",
            sky: [0.75, 0.80, 0.88],
            enemies: vec![
                EnemySpawn {
                    character: CharacterId::Goomba,
                    x: 250.0,
                    speed: 2.0,
                },
                EnemySpawn {
                    character: CharacterId::Goomba,
                    x: 450.0,
                    speed: -2.0,
                },
                EnemySpawn {
                    character: CharacterId::Koopa,
                    x: 550.0,
                    speed: 2.0,
                },
                EnemySpawn {
                    character: CharacterId::Koopa,
                    x: 700.0,
                    speed: -2.0,
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_is_not_empty() {
        assert!(!builtin_levels().is_empty());
    }

    #[test]
    fn themes_are_distinct() {
        let levels = builtin_levels();
        let mut themes: Vec<&str> = levels.iter().map(|l| l.theme).collect();
        themes.sort_unstable();
        themes.dedup();
        assert_eq!(themes.len(), levels.len());
    }

    #[test]
    fn spawns_sit_inside_the_screen_and_move() {
        for level in builtin_levels() {
            for spawn in &level.enemies {
                assert!((0.0..800.0).contains(&spawn.x), "{}: x out of range", level.theme);
                assert!(spawn.speed != 0.0, "{}: static enemy", level.theme);
                assert!(!spawn.character.is_player(), "{}: player as enemy", level.theme);
            }
        }
    }
}
