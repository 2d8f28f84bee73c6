//! Pasture Core - Game engine and AI
//!
//! This crate provides the core game logic for Pasture:
//! - Board geometry (hex grid with axial coordinates)
//! - Cells, herds and staged moves
//! - Match state, move composition and reversible moves
//! - Position evaluation
//! - Alpha-beta AI over apply/undo
//! - Screen layout for renderers

pub mod board;
pub mod cell;
pub mod game;
pub mod eval;
pub mod ai;
pub mod config;
pub mod layout;

// Re-exports for convenient access
pub use board::{Grid, Hex, DIRECTIONS};
pub use cell::{Cell, CellId, Herd, Staged};
pub use game::{Action, Adjust, GameResult, Match, Phase, SelectOutcome, Side, Undo};
pub use eval::{evaluate, Heuristics, WIN_VALUE};
pub use ai::{search, AlphaBetaAI, SearchResult, SearchStats};
pub use config::{AiConfig, ConfigError, MatchConfig};
pub use layout::Layout;
