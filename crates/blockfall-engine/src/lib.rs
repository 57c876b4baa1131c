//! Core of a falling-block puzzle game.
//!
//! [`core`] holds the data structures (grid, piece catalog, shapes and
//! pieces); [`engine`] holds the rules and the [`GameSession`] controller that
//! drives a game from spawn to game over. Rendering and input live elsewhere:
//! the session is advanced with explicit elapsed time and reports changes as
//! [`GameEvent`]s.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
