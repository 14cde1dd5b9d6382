//! Tennis core game engine - single-player paddle game against a reactive AI

pub mod ai;
pub mod game;
pub mod physics;
pub mod render;
pub mod serve;
pub mod types;

pub use ai::ai_intent;
pub use game::Game;
pub use render::{CellRect, RenderHelper};
pub use serve::{RngServe, ScriptedServe, ServeSource};
pub use types::*;
