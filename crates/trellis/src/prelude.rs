//! Prelude module for Trellis.
//!
//! Re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use trellis::prelude::*;
//! ```

// ============================================================================
// Controllers
// ============================================================================

pub use crate::snap::PageSnap;
pub use crate::stack::{MoveMode, PanelRef, PanelStack, PanelState, TransitionTargets};

// ============================================================================
// Host Seam
// ============================================================================

pub use crate::host::{MoveTicket, Orientation, PageId, PanelHost, PanelId, PanelKind, SnapHost};

// ============================================================================
// Configuration and Shared Types
// ============================================================================

pub use crate::animation::{Easing, TransitionTiming};
pub use crate::config::{SnapConfig, StackConfig};
pub use crate::direction::Direction;
pub use crate::geometry::Offset;
pub use crate::underlay::Underlay;

// ============================================================================
// Core Re-exports
// ============================================================================

pub use trellis_core::{ConnectionGuard, ConnectionId, DeferredQueue, Signal, TimerId};
