//! Animation support: easing functions and transition timing.
//!
//! The controllers in this crate never run animations themselves; the host
//! framework's transition primitive does. These types describe *how* a move
//! should look, and the host interprets them.

mod easing;
mod timing;

pub use easing::{Easing, ease, lerp_eased};
pub use timing::TransitionTiming;
