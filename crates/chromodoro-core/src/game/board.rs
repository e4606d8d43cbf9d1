//! Tile boards for the color-matching game.
//!
//! A board is 12 tiles over a fixed 8-color palette. Exactly 4 tiles
//! carry the round's target color; the other 8 are drawn independently,
//! with replacement, from the rest of the palette, and the whole sequence
//! is shuffled uniformly. The random source is injected so tests can pin
//! the layout.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const BOARD_SIZE: usize = 12;
pub const TARGET_COUNT: usize = 4;

/// The visual color of a tile. Equal keys render as the same color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorKey {
    Orange,
    Blue,
    Green,
    Purple,
    Red,
    Pink,
    Yellow,
    Cyan,
}

impl ColorKey {
    pub const ALL: [ColorKey; 8] = [
        ColorKey::Orange,
        ColorKey::Blue,
        ColorKey::Green,
        ColorKey::Purple,
        ColorKey::Red,
        ColorKey::Pink,
        ColorKey::Yellow,
        ColorKey::Cyan,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorKey::Orange => "orange",
            ColorKey::Blue => "blue",
            ColorKey::Green => "green",
            ColorKey::Purple => "purple",
            ColorKey::Red => "red",
            ColorKey::Pink => "pink",
            ColorKey::Yellow => "yellow",
            ColorKey::Cyan => "cyan",
        }
    }
}

impl std::fmt::Display for ColorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ColorKey {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorKey::ALL
            .into_iter()
            .find(|c| c.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| crate::error::ValidationError::InvalidValue {
                field: "color".to_string(),
                message: format!("unknown color '{s}'"),
            })
    }
}

/// One tile on the board. Tiles are replaced wholesale, never mutated,
/// except for the display-only `matched` flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub id: Uuid,
    pub color: ColorKey,
    #[serde(default)]
    pub matched: bool,
}

impl Tile {
    fn new(color: ColorKey) -> Self {
        Self {
            id: Uuid::new_v4(),
            color,
            matched: false,
        }
    }
}

/// A generated board plus the color its 4 correct tiles carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub target: ColorKey,
    pub tiles: Vec<Tile>,
}

impl Board {
    /// Generate a board over the full palette.
    pub fn generate(rng: &mut impl Rng) -> Self {
        Self::generate_from(rng, &ColorKey::ALL)
    }

    /// Generate a board over an explicit palette of at least 2 colors.
    pub fn generate_from(rng: &mut impl Rng, palette: &[ColorKey]) -> Self {
        assert!(palette.len() >= 2, "palette needs at least 2 colors");

        let target = palette[rng.gen_range(0..palette.len())];
        let others: Vec<ColorKey> = palette.iter().copied().filter(|c| *c != target).collect();

        let mut tiles = Vec::with_capacity(BOARD_SIZE);
        for _ in 0..TARGET_COUNT {
            tiles.push(Tile::new(target));
        }
        for _ in 0..(BOARD_SIZE - TARGET_COUNT) {
            tiles.push(Tile::new(others[rng.gen_range(0..others.len())]));
        }
        tiles.shuffle(rng);

        Self { target, tiles }
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn target_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.color == self.target).count()
    }
}
