//! Trellis - panel stack and page snap controllers for scrollable UIs.
//!
//! Two small, host-driven controllers:
//!
//! - [`stack::PanelStack`]: an ordered stack of panels with directional
//!   push/pop transitions and optional underlay coordination.
//! - [`snap::PageSnap`]: keeps a scrollable view aligned to page
//!   boundaries, with programmatic navigation and free-scroll correction.
//!
//! Neither controller owns widgets or runs animations. A host framework
//! implements the [`host::PanelHost`] / [`host::SnapHost`] traits, drives
//! the controllers through their public operations, and reports animation
//! and timer completion back through their hooks.
//!
//! # Example
//!
//! ```ignore
//! use trellis::prelude::*;
//!
//! let mut stack = PanelStack::new(StackConfig {
//!     push_from: Direction::Left,
//!     underlay: Underlay::With,
//!     ..StackConfig::default()
//! });
//! stack.attach(&mut host);
//! stack.push(&mut host, panel);
//! ```

pub mod animation;
pub mod config;
pub mod direction;
pub mod geometry;
pub mod host;
pub mod prelude;
pub mod snap;
pub mod stack;
pub mod underlay;
