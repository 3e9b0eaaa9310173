//! Capability services module
//!
//! This module contains the platform capabilities the countdown calls
//! out to at phase completion: desktop notifications and the audible
//! cue. Both are fire-and-forget; their failures never reach the state
//! machine.

pub mod audio;
pub mod notify;

// Re-export main types
pub use notify::{Notifier, Permission};
