//! Match and AI configuration

use std::path::Path;

use crate::eval::Heuristics;
use crate::game::{Match, Side};
use serde::{Deserialize, Serialize};

/// Default board, eight columns of four cells
pub const DEFAULT_WIDTH: u16 = 8;
pub const DEFAULT_HEIGHT: u16 = 4;

/// Default search depth
pub const DEFAULT_DEPTH: u32 = 2;

/// Rejected match setups
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("board has no cells")]
    EmptyBoard,

    #[error("{width}x{height} board has an odd number of cells; initial herds cannot be split evenly")]
    OddCellCount { width: u16, height: u16 },

    #[error("board of {cells} cells is too large")]
    TooLarge { cells: usize },

    #[error("cell ({q}, {r}) is not on the board")]
    OffBoard { q: i16, r: i16 },

    #[error("herd at ({q}, {r}) has no sheep")]
    EmptyHerd { q: i16, r: i16 },

    #[error("search depth must be at least 1")]
    ZeroDepth,
}

/// Largest board whose offset coordinates still fit the hex type
const MAX_CELLS: usize = i16::MAX as usize;

/// Check that a board can host a match
pub fn validate_board(width: u16, height: u16) -> Result<(), ConfigError> {
    let cells = width as usize * height as usize;
    if cells == 0 {
        return Err(ConfigError::EmptyBoard);
    }
    if cells % 2 != 0 {
        return Err(ConfigError::OddCellCount { width, height });
    }
    if cells > MAX_CELLS || width > i16::MAX as u16 || height > i16::MAX as u16 {
        return Err(ConfigError::TooLarge { cells });
    }
    Ok(())
}

/// Search settings for one machine-controlled side
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Plies searched per move
    pub depth: u32,
    /// Evaluation weights
    pub heuristics: Heuristics,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            heuristics: Heuristics::default(),
        }
    }
}

impl AiConfig {
    /// Create config for alpha-beta at given depth
    pub fn alpha_beta(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }
}

/// Everything needed to start a match
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub width: u16,
    pub height: u16,
    pub red: AiConfig,
    pub blue: AiConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            red: AiConfig::default(),
            blue: AiConfig::default(),
        }
    }
}

impl MatchConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MatchConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_board(self.width, self.height)?;
        if self.red.depth == 0 || self.blue.depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }

    pub fn ai(&self, side: Side) -> &AiConfig {
        match side {
            Side::Red => &self.red,
            Side::Blue => &self.blue,
        }
    }

    /// Fresh match on the configured board
    pub fn new_match(&self) -> Result<Match, ConfigError> {
        self.validate()?;
        Match::new(self.width, self.height)
    }
}
