//! The seam between Trellis controllers and their host widget framework.
//!
//! Trellis does not own widgets, run animations, or pump an event loop; the
//! host framework does all of that. The controllers talk to the host through
//! the two traits here, and the host drives the controllers back through
//! their completion hooks ([`crate::stack::PanelStack::on_move_done`],
//! [`crate::snap::PageSnap::on_scroll_end`], ...).
//!
//! Everything the controllers reference in the host is an opaque ID. Hosts
//! mint [`PanelId`]/[`PageId`] keys from their own `slotmap` storage and
//! [`MoveTicket`]s from a counter; the controllers never inspect them.

use std::time::Duration;

use slotmap::new_key_type;
use trellis_core::TimerId;

use crate::animation::{Easing, TransitionTiming};
use crate::geometry::Offset;

new_key_type! {
    /// Opaque handle to a panel owned by the host container.
    pub struct PanelId;
}

new_key_type! {
    /// Opaque handle to one page element inside a scrollable view.
    pub struct PageId;
}

/// Token identifying one in-flight animated move.
///
/// Returned by [`PanelHost::animate`]; the host echoes it back through
/// [`crate::stack::PanelStack::on_move_done`] when the animation settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveTicket(u64);

impl MoveTicket {
    /// Construct a ticket from a host-side counter value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw counter value.
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// Capability marker for panels.
///
/// A [`crate::stack::PanelStack`] configured with a required kind vetoes
/// adds of panels tagged differently. Host applications define whatever
/// kinds their panel variants need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelKind(&'static str);

impl PanelKind {
    /// Define a kind marker.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The marker name.
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Scroll axis of a snap host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Pages flow left-to-right; offsets are measured along x.
    Horizontal,
    /// Pages flow top-to-bottom; offsets are measured along y.
    Vertical,
}

/// Host capabilities a [`crate::stack::PanelStack`] consumes.
///
/// One implementation wraps one container widget. All geometry is in the
/// container's coordinate space; offsets are relative to a panel's resting
/// position.
pub trait PanelHost {
    /// Handle to a scrollable view nested inside a panel.
    type ScrollRef;

    /// Current container width in pixels.
    fn width(&self) -> f32;

    /// Current container height in pixels.
    fn height(&self) -> f32;

    /// Whether the container is currently visible.
    ///
    /// Moves requested while invisible are applied instantly; there is
    /// nothing to animate for the user.
    fn is_visible(&self) -> bool;

    /// The capability kind of a panel.
    fn panel_kind(&self, panel: PanelId) -> PanelKind;

    /// Set a panel's width and height.
    fn set_panel_size(&mut self, panel: PanelId, width: f32, height: f32);

    /// Place a panel at an offset instantly, without animation.
    fn place(&mut self, panel: PanelId, offset: Offset);

    /// Start animating a panel toward an offset.
    ///
    /// The host must call [`crate::stack::PanelStack::on_move_done`] with
    /// the returned ticket when the animation settles.
    fn animate(&mut self, panel: PanelId, offset: Offset, timing: &TransitionTiming) -> MoveTicket;

    /// Schedule a fire-once deferred callback.
    ///
    /// The host must call [`crate::stack::PanelStack::on_delay_elapsed`]
    /// with the returned ID when the delay passes. Typically backed by a
    /// [`trellis_core::DeferredQueue`].
    fn defer(&mut self, delay: Duration) -> TimerId;

    /// Cancel a previously scheduled deferred callback.
    ///
    /// Cancelling an already-fired ID must be harmless.
    fn cancel_deferred(&mut self, timer: TimerId);

    /// Insert a panel into the container's child collection.
    fn attach(&mut self, panel: PanelId);

    /// Remove a panel from the container's child collection.
    ///
    /// The panel's resources stay alive; see [`destroy_panel`](Self::destroy_panel).
    fn detach(&mut self, panel: PanelId);

    /// Release a panel's resources.
    fn destroy_panel(&mut self, panel: PanelId);

    /// Query pre-existing children matching a selector, in document order.
    fn query_children(&self, selector: &str) -> Vec<PanelId>;

    /// Apply declarative default configuration to a panel before adoption.
    ///
    /// The value's shape is host-defined; controllers pass it through
    /// opaquely.
    fn configure_panel(&mut self, panel: PanelId, defaults: &serde_json::Value);

    /// The scrollable view nested inside a panel, if it has one.
    fn panel_scroll(&self, panel: PanelId) -> Option<Self::ScrollRef>;
}

/// Host capabilities a [`crate::snap::PageSnap`] consumes.
///
/// One implementation wraps one scrollable view. Offsets and extents are
/// measured along the view's single active axis.
pub trait SnapHost {
    /// The scroll axis. Read once at attach time; hosts must not change it.
    fn orientation(&self) -> Orientation;

    /// Whether a flick gesture is still being processed.
    ///
    /// While flicking, a further scroll-end event is expected and snapping
    /// must hold off.
    fn is_flicking(&self) -> bool;

    /// Current scroll offset along the active axis.
    fn scroll_offset(&self) -> f32;

    /// Query the page elements, in document order.
    ///
    /// `None` means all direct children of the content box.
    fn query_pages(&self, selector: Option<&str>) -> Vec<PageId>;

    /// A page's leading-edge offset along the active axis.
    fn page_leading(&self, page: PageId) -> f32;

    /// A page's extent along the active axis.
    fn page_extent(&self, page: PageId) -> f32;

    /// Issue a scroll command along the given axis.
    ///
    /// `duration` of zero means instant. For animated scrolls the host must
    /// call [`crate::snap::PageSnap::on_scroll_end`] when the scroll
    /// settles.
    fn scroll_to(&mut self, offset: f32, axis: Orientation, duration: Duration, easing: Easing);
}
