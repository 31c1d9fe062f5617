//! The character roster and its animation catalog.
//!
//! `region_table()` is the sheet layout as authored: per character, per state,
//! the ordered pixel rects on `assets/sprites.png`. [`Cast::build`] compiles
//! it into a validated [`SheetRegistry`] plus an [`AnimationCatalog`] mapping
//! `(character, state)` to a clip. A character/state pair that gameplay can
//! request but the table does not define is an error here, at content
//! definition time, never a lookup failure in the render path.

use std::collections::HashMap;

use mfx_core::animation::{ActorState, AnimationClip};

use crate::sheet::{RegionPx, SheetRegistry};

/// Frame cadence shared by every clip.
pub const FRAME_INTERVAL_US: u64 = 100_000; // 100 ms

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterId {
    Mario,
    Luigi,
    Goomba,
    Koopa,
}

impl CharacterId {
    pub const ALL: &'static [CharacterId] = &[
        CharacterId::Mario,
        CharacterId::Luigi,
        CharacterId::Goomba,
        CharacterId::Koopa,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Mario => "mario",
            Self::Luigi => "luigi",
            Self::Goomba => "goomba",
            Self::Koopa => "koopa",
        }
    }

    pub fn is_player(self) -> bool {
        matches!(self, Self::Mario | Self::Luigi)
    }

    /// States gameplay will request for this character. Players run the full
    /// idle/walk/jump set; enemies only ever walk.
    pub fn required_states(self) -> &'static [ActorState] {
        if self.is_player() {
            ActorState::ALL
        } else {
            &[ActorState::Walking]
        }
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The sheet layout. Players occupy one 32px row each (idle doubles as the
/// first walking frame, jumping is the fourth column); the enemy rows are
/// two-frame walk cycles at their native heights.
fn region_table() -> Vec<(CharacterId, ActorState, Vec<RegionPx>)> {
    let strip = |y: u32, h: u32, xs: &[u32]| -> Vec<RegionPx> {
        xs.iter().map(|&x| RegionPx { x, y, w: 16, h }).collect()
    };

    vec![
        (CharacterId::Mario, ActorState::Idle, strip(0, 32, &[0])),
        (
            CharacterId::Mario,
            ActorState::Walking,
            strip(0, 32, &[0, 16, 32]),
        ),
        (CharacterId::Mario, ActorState::Jumping, strip(0, 32, &[48])),
        (CharacterId::Luigi, ActorState::Idle, strip(32, 32, &[0])),
        (
            CharacterId::Luigi,
            ActorState::Walking,
            strip(32, 32, &[0, 16, 32]),
        ),
        (CharacterId::Luigi, ActorState::Jumping, strip(32, 32, &[48])),
        (
            CharacterId::Goomba,
            ActorState::Walking,
            strip(64, 16, &[0, 16]),
        ),
        (
            CharacterId::Koopa,
            ActorState::Walking,
            strip(80, 24, &[0, 16]),
        ),
    ]
}

fn region_id(character: CharacterId, state: ActorState, index: usize) -> String {
    format!("{}_{}_{}", character.label(), state.label(), index)
}

#[derive(Debug, Clone)]
pub struct AnimationCatalog {
    clips: HashMap<(CharacterId, ActorState), AnimationClip>,
}

impl AnimationCatalog {
    pub fn resolve(&self, character: CharacterId, state: ActorState) -> Option<&AnimationClip> {
        self.clips.get(&(character, state))
    }

    #[allow(dead_code)]
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }
}

/// Everything content-side the game needs: validated regions + clips.
#[derive(Debug, Clone)]
pub struct Cast {
    pub sheet: SheetRegistry,
    pub catalog: AnimationCatalog,
}

impl Cast {
    pub fn build() -> Result<Self, String> {
        let table = region_table();

        // Regions first: idle aliases the first walking rect, so ids are
        // per-(character, state, frame) while rects may repeat.
        let mut entries = Vec::new();
        for (character, state, rects) in &table {
            for (i, rect) in rects.iter().enumerate() {
                entries.push((region_id(*character, *state, i), *rect));
            }
        }
        let sheet = SheetRegistry::from_entries(&entries)?;

        let mut clips = HashMap::new();
        for (character, state, rects) in &table {
            let frames: Vec<String> = (0..rects.len())
                .map(|i| region_id(*character, *state, i))
                .collect();
            for frame in &frames {
                if sheet.resolve(frame).is_none() {
                    return Err(format!(
                        "Cast validation failed: clip {}/{} references unknown region '{}'",
                        character, state, frame
                    ));
                }
            }
            let clip = AnimationClip::new(frames, FRAME_INTERVAL_US).map_err(|e| {
                format!("Cast validation failed: clip {}/{}: {}", character, state, e)
            })?;
            clips.insert((*character, *state), clip);
        }

        let catalog = AnimationCatalog { clips };

        // Every state gameplay can request must exist now, not at render time.
        for &character in CharacterId::ALL {
            for &state in character.required_states() {
                if catalog.resolve(character, state).is_none() {
                    return Err(format!(
                        "Cast validation failed: character '{}' is missing required state '{}'",
                        character, state
                    ));
                }
            }
        }

        Ok(Self { sheet, catalog })
    }

    /// Clip for a character/state pair that `Cast::build` guaranteed exists.
    pub fn clip(&self, character: CharacterId, state: ActorState) -> &AnimationClip {
        self.catalog
            .resolve(character, state)
            .unwrap_or_else(|| panic!("validated cast lost clip {character}/{state}"))
    }

    /// On-screen pixel size of a character, derived from its first required
    /// state's first frame at sprite scale.
    pub fn body_size(&self, character: CharacterId) -> (f32, f32) {
        let state = character.required_states()[0];
        let clip = self.clip(character, state);
        let first = clip.frame(0);
        let region = self
            .sheet
            .resolve(first)
            .unwrap_or_else(|| panic!("validated cast lost region '{first}'"));
        (
            region.size_px.0 as f32 * crate::sheet::SPRITE_SCALE,
            region.size_px.1 as f32 * crate::sheet::SPRITE_SCALE,
        )
    }
}
