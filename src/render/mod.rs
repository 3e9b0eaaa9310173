//! Timer face rendering module
//!
//! Pure geometry: session numbers in, drawable primitives out.

pub mod face;

pub use face::{render_face, TimerFace};
