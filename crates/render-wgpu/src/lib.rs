//! wgpu render backend for the shooting gallery.
//!
//! Draws a floor grid and one instanced box per live target, tinted with the
//! target's color and faded into the sky with distance fog.
//!
//! # Invariants
//! - Renderer never mutates session state.
//! - Camera pose is copied from the player each frame.

mod camera;
mod gpu;
mod shaders;

pub use camera::FpsCamera;
pub use gpu::WgpuRenderer;
