//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the session.
//! - Everything shown derives from session state at render time.

mod hud;
mod renderer;

pub use hud::HudView;
pub use renderer::{DebugTextRenderer, Renderer};
