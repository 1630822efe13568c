//! Panel stack with directional push/pop transitions.
//!
//! [`PanelStack`] manages an ordered stack of panels inside one host
//! container. Pushing animates a new panel in from a configured off-screen
//! direction; popping reverses the motion and removes the panel. The panel
//! beneath the top (the underlay) can be coordinated with either transition:
//! moved concurrently, or in a two-stage motion with a deferred second step.
//!
//! The controller never blocks on animation. It issues moves through the
//! [`PanelHost`] seam and the host reports completion back through
//! [`PanelStack::on_move_done`] / [`PanelStack::on_delay_elapsed`].
//!
//! Only one push or pop transition should be in flight per stack at a time;
//! overlapping calls are not detected. Callers serialize, typically by
//! disabling controls while a transition runs.
//!
//! # Example
//!
//! ```ignore
//! use trellis::config::StackConfig;
//! use trellis::stack::PanelStack;
//!
//! let mut stack = PanelStack::new(StackConfig {
//!     push_from: "left".parse()?,
//!     underlay: "with".parse()?,
//!     ..StackConfig::default()
//! });
//!
//! stack.push(&mut host, detail_panel);
//! // ... later, when the user navigates back:
//! stack.pop(&mut host, false);
//! ```

use std::time::Duration;

use serde_json::Value;
use trellis_core::{Signal, TimerId};

use crate::animation::TransitionTiming;
use crate::config::StackConfig;
use crate::direction::Direction;
use crate::geometry::Offset;
use crate::host::{MoveTicket, PanelHost, PanelId, PanelKind};
use crate::underlay::Underlay;

/// Transition endpoint offsets derived from direction and container size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransitionTargets {
    /// Off-screen position a pushed panel enters from (and a popped panel
    /// exits to): `direction_vector * (width, height)`.
    pub entry: Offset,
    /// Resting position. Always the origin.
    pub rest: Offset,
    /// Position the underlay retreats to. Always `-entry`.
    pub underlay: Offset,
}

/// Lifecycle state of one stacked panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// Animating from the entry offset toward rest.
    Entering,
    /// Sitting at (or moving back to) a settled position.
    Resting,
    /// Animating out toward the entry offset; removed on completion.
    Exiting,
}

/// A panel reference: by handle or by stack index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelRef {
    /// Direct handle.
    Id(PanelId),
    /// Position in the stack, bottom is 0.
    Index(usize),
}

impl From<PanelId> for PanelRef {
    fn from(id: PanelId) -> Self {
        Self::Id(id)
    }
}

impl From<usize> for PanelRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// How a public [`PanelStack::move_child`] is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    /// Apply the offset immediately.
    Instant,
    /// Animate with the stack's configured timing.
    Animated,
}

/// Precondition run before a panel is added; returning `false` vetoes the add.
pub type AddGuard<H> = Box<dyn Fn(&H, PanelId) -> bool + Send + Sync>;

/// Observer run after a panel has been added.
pub type AddObserver<H> = Box<dyn Fn(&mut H, PanelId) + Send + Sync>;

/// Action taken when an in-flight animated move settles.
#[derive(Debug, Clone, Copy)]
enum PendingMove {
    /// Mark the panel resting; nothing else follows.
    Settled(PanelId),
    /// Push with a deferred underlay stage: the old top reached the underlay
    /// offset; wait `delay`, then bring the new panel to rest.
    UnderlayOut { next_panel: PanelId, delay: Duration },
    /// Pop: the exiting panel reached the entry offset; detach it, destroy
    /// it unless kept, and schedule the underlay's deferred return.
    PopOut {
        panel: PanelId,
        below: Option<PanelId>,
        keep: bool,
    },
}

/// Action taken when a deferred delay elapses.
#[derive(Debug, Clone, Copy)]
enum PendingDelay {
    /// Animate the panel to rest if it is still stacked.
    MoveToRest(PanelId),
}

struct PanelEntry {
    id: PanelId,
    state: PanelState,
}

/// Controller for an ordered stack of panels with push/pop transitions.
///
/// # Signals
///
/// - `pushed(PanelId)`: emitted when a push has been initiated
/// - `popped(PanelId)`: emitted when a popped panel has been detached
pub struct PanelStack<H: PanelHost> {
    panels: Vec<PanelEntry>,
    push_from: Direction,
    underlay: Underlay,
    timing: TransitionTiming,
    default_kind: Option<PanelKind>,
    child_query: Option<String>,
    child_defaults: Value,
    targets: TransitionTargets,
    pending_moves: Vec<(MoveTicket, PendingMove)>,
    pending_delays: Vec<(TimerId, PendingDelay)>,
    add_guards: Vec<AddGuard<H>>,
    add_observers: Vec<AddObserver<H>>,

    /// Signal emitted when a push has been initiated.
    pub pushed: Signal<PanelId>,
    /// Signal emitted when a popped panel has been detached.
    pub popped: Signal<PanelId>,
}

impl<H: PanelHost> PanelStack<H> {
    /// Create a stack controller from configuration.
    ///
    /// Transition targets start at the origin; they take real values once
    /// the host reports a size ([`attach`](Self::attach) or
    /// [`sync_wh`](Self::sync_wh)).
    pub fn new(config: StackConfig) -> Self {
        Self {
            panels: Vec::new(),
            push_from: config.push_from,
            underlay: config.underlay,
            timing: config.timing,
            default_kind: config.default_kind,
            child_query: config.child_query,
            child_defaults: config.child_defaults,
            targets: TransitionTargets::default(),
            pending_moves: Vec::new(),
            pending_delays: Vec::new(),
            add_guards: Vec::new(),
            add_observers: Vec::new(),
            pushed: Signal::new(),
            popped: Signal::new(),
        }
    }

    /// Bind to a host: compute transition targets from its current size and
    /// adopt any pre-existing children matching the configured query.
    pub fn attach(&mut self, host: &mut H) {
        self.update_targets(host);
        self.adopt_children(host);
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// The configured push direction.
    pub fn push_from(&self) -> Direction {
        self.push_from
    }

    /// Set the push direction and recompute transition targets.
    pub fn set_push_from(&mut self, host: &H, direction: Direction) {
        self.push_from = direction;
        self.update_targets(host);
    }

    /// The configured timing.
    pub fn timing(&self) -> TransitionTiming {
        self.timing
    }

    /// Set the transition timing and recompute transition targets.
    pub fn set_timing(&mut self, host: &H, timing: TransitionTiming) {
        self.timing = timing;
        self.update_targets(host);
    }

    /// The configured underlay mode.
    pub fn underlay(&self) -> Underlay {
        self.underlay
    }

    /// Set the underlay mode.
    pub fn set_underlay(&mut self, underlay: Underlay) {
        self.underlay = underlay;
    }

    /// Current transition targets.
    pub fn targets(&self) -> TransitionTargets {
        self.targets
    }

    /// Register a precondition run before every add; returning `false`
    /// vetoes the add entirely.
    pub fn add_guard(&mut self, guard: impl Fn(&H, PanelId) -> bool + Send + Sync + 'static) {
        self.add_guards.push(Box::new(guard));
    }

    /// Register an observer run after every completed add.
    pub fn add_observer(&mut self, observer: impl Fn(&mut H, PanelId) + Send + Sync + 'static) {
        self.add_observers.push(Box::new(observer));
    }

    /// Recompute entry/rest/underlay offsets from the current direction and
    /// container size. Called at every mutation site the offsets depend on.
    fn update_targets(&mut self, host: &H) {
        let entry = Offset::scaled(self.push_from.unit_vector(), host.width(), host.height());
        self.targets = TransitionTargets {
            entry,
            rest: Offset::ZERO,
            underlay: -entry,
        };
    }

    // =========================================================================
    // Stack access
    // =========================================================================

    /// Number of stacked panels.
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// The top (last pushed, still surviving) panel.
    pub fn top_item(&self) -> Option<PanelId> {
        self.panels.last().map(|entry| entry.id)
    }

    /// The scrollable view inside the top panel, if any.
    pub fn top_scroll(&self, host: &H) -> Option<H::ScrollRef> {
        self.top_item().and_then(|panel| host.panel_scroll(panel))
    }

    /// Resolve a panel reference to a handle.
    pub fn get_child(&self, panel: impl Into<PanelRef>) -> Option<PanelId> {
        match panel.into() {
            PanelRef::Id(id) => self
                .panels
                .iter()
                .any(|entry| entry.id == id)
                .then_some(id),
            PanelRef::Index(index) => self.panels.get(index).map(|entry| entry.id),
        }
    }

    /// Lifecycle state of a stacked panel.
    pub fn panel_state(&self, panel: PanelId) -> Option<PanelState> {
        self.panels
            .iter()
            .find(|entry| entry.id == panel)
            .map(|entry| entry.state)
    }

    // =========================================================================
    // Size propagation
    // =========================================================================

    /// Set one panel's size to the container's current size.
    pub fn sync(&self, host: &mut H, panel: PanelId) {
        let (width, height) = (host.width(), host.height());
        host.set_panel_size(panel, width, height);
    }

    /// Propagate the container size to every panel, then recompute
    /// transition targets (they depend on the size).
    pub fn sync_wh(&mut self, host: &mut H) {
        let (width, height) = (host.width(), host.height());
        for entry in &self.panels {
            host.set_panel_size(entry.id, width, height);
        }
        self.update_targets(host);
    }

    // =========================================================================
    // Adding panels
    // =========================================================================

    /// Add a panel to the top of the stack without a transition.
    ///
    /// Runs the precondition list first: the built-in kind filter, then
    /// registered guards, in order. Any veto drops the add entirely and
    /// returns `false`. After a successful add the panel's size is synced
    /// and registered observers run.
    pub fn add(&mut self, host: &mut H, panel: PanelId) -> bool {
        if let Some(required) = self.default_kind {
            if host.panel_kind(panel) != required {
                tracing::debug!(
                    target: "trellis::stack",
                    ?panel,
                    required = required.as_str(),
                    "add vetoed: panel kind mismatch"
                );
                return false;
            }
        }
        for guard in &self.add_guards {
            if !guard(host, panel) {
                tracing::debug!(target: "trellis::stack", ?panel, "add vetoed by guard");
                return false;
            }
        }

        host.attach(panel);
        self.panels.push(PanelEntry {
            id: panel,
            state: PanelState::Resting,
        });

        self.sync(host, panel);
        for observer in &self.add_observers {
            observer(host, panel);
        }
        true
    }

    /// Adopt pre-existing children matching the configured child query.
    ///
    /// Each adopted panel gets the declarative child defaults applied first,
    /// then goes through the normal [`add`](Self::add) pipeline.
    pub fn adopt_children(&mut self, host: &mut H) {
        let Some(query) = self.child_query.clone() else {
            return;
        };
        let found = host.query_children(&query);
        tracing::debug!(target: "trellis::stack", count = found.len(), "adopting children");
        for panel in found {
            if !self.child_defaults.is_null() {
                let defaults = self.child_defaults.clone();
                host.configure_panel(panel, &defaults);
            }
            self.add(host, panel);
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Push a panel onto the stack with an entry transition.
    ///
    /// The panel is placed at the entry offset instantly and animated to
    /// rest; the old top coordinates per the configured underlay mode.
    /// Returns `false` (and does nothing further) if the add was vetoed.
    pub fn push(&mut self, host: &mut H, panel: PanelId) -> bool {
        let old_top = self.top_item();

        if self.underlay == Underlay::With {
            if let Some(top) = old_top {
                self.start_move(host, top, self.targets.underlay, PendingMove::Settled(top));
            }
        }

        if !self.add(host, panel) {
            return false;
        }
        if let Some(entry) = self.panels.last_mut() {
            entry.state = PanelState::Entering;
        }
        host.place(panel, self.targets.entry);

        match (self.underlay, old_top) {
            (Underlay::After(delay), Some(top)) => {
                self.start_move(
                    host,
                    top,
                    self.targets.underlay,
                    PendingMove::UnderlayOut {
                        next_panel: panel,
                        delay,
                    },
                );
            }
            _ => {
                self.start_move(host, panel, self.targets.rest, PendingMove::Settled(panel));
            }
        }

        tracing::debug!(target: "trellis::stack", ?panel, direction = %self.push_from, "push initiated");
        self.pushed.emit(panel);
        true
    }

    /// Pop the top panel off the stack with an exit transition.
    ///
    /// On completion the panel is detached and, unless `keep` is set, its
    /// resources are destroyed. Popping an empty stack is a no-op; returns
    /// whether a pop was initiated.
    pub fn pop(&mut self, host: &mut H, keep: bool) -> bool {
        let Some(top) = self.top_item() else {
            return false;
        };
        let below = self
            .panels
            .len()
            .checked_sub(2)
            .map(|index| self.panels[index].id);

        if !self.underlay.is_none() {
            if let Some(beneath) = below {
                host.place(beneath, self.targets.underlay);
                if self.underlay == Underlay::With {
                    self.start_move(
                        host,
                        beneath,
                        self.targets.rest,
                        PendingMove::Settled(beneath),
                    );
                }
            }
        }

        if let Some(entry) = self.panels.last_mut() {
            entry.state = PanelState::Exiting;
        }
        self.start_move(
            host,
            top,
            self.targets.entry,
            PendingMove::PopOut {
                panel: top,
                below,
                keep,
            },
        );

        tracing::debug!(target: "trellis::stack", panel = ?top, keep, "pop initiated");
        true
    }

    /// Move a stacked panel to an offset.
    ///
    /// Animated moves fall back to instant placement while the host is not
    /// visible. Unknown references are a no-op.
    pub fn move_child(
        &mut self,
        host: &mut H,
        panel: impl Into<PanelRef>,
        target: Offset,
        mode: MoveMode,
    ) {
        let Some(panel) = self.get_child(panel) else {
            return;
        };
        match mode {
            MoveMode::Instant => host.place(panel, target),
            MoveMode::Animated => {
                if host.is_visible() {
                    let ticket = host.animate(panel, target, &self.timing);
                    self.pending_moves
                        .push((ticket, PendingMove::Settled(panel)));
                } else {
                    host.place(panel, target);
                }
            }
        }
    }

    /// Start a move whose completion continues a transition.
    ///
    /// While the host is invisible there is nothing to animate; the panel is
    /// placed instantly and the completion action runs inline.
    fn start_move(&mut self, host: &mut H, panel: PanelId, target: Offset, pending: PendingMove) {
        if host.is_visible() {
            let ticket = host.animate(panel, target, &self.timing);
            self.pending_moves.push((ticket, pending));
        } else {
            host.place(panel, target);
            self.complete_move(host, pending);
        }
    }

    // =========================================================================
    // Completion hooks
    // =========================================================================

    /// Hook the host calls when an animated move settles.
    ///
    /// Tickets this stack did not issue (or already consumed) are ignored.
    pub fn on_move_done(&mut self, host: &mut H, ticket: MoveTicket) {
        let Some(position) = self
            .pending_moves
            .iter()
            .position(|(pending, _)| *pending == ticket)
        else {
            tracing::trace!(target: "trellis::stack", ?ticket, "ignoring unknown move ticket");
            return;
        };
        let (_, pending) = self.pending_moves.remove(position);
        self.complete_move(host, pending);
    }

    /// Hook the host calls when a deferred delay elapses.
    ///
    /// Timers this stack did not schedule (or already consumed) are ignored.
    pub fn on_delay_elapsed(&mut self, host: &mut H, timer: TimerId) {
        let Some(position) = self
            .pending_delays
            .iter()
            .position(|(pending, _)| *pending == timer)
        else {
            tracing::trace!(target: "trellis::stack", ?timer, "ignoring unknown timer");
            return;
        };
        let (_, pending) = self.pending_delays.remove(position);
        match pending {
            PendingDelay::MoveToRest(panel) => {
                if self.get_child(panel).is_some() {
                    self.start_move(host, panel, self.targets.rest, PendingMove::Settled(panel));
                }
            }
        }
    }

    fn complete_move(&mut self, host: &mut H, pending: PendingMove) {
        match pending {
            PendingMove::Settled(panel) => {
                if let Some(entry) = self.panels.iter_mut().find(|entry| entry.id == panel) {
                    entry.state = PanelState::Resting;
                }
            }
            PendingMove::UnderlayOut { next_panel, delay } => {
                let timer = host.defer(delay);
                self.pending_delays
                    .push((timer, PendingDelay::MoveToRest(next_panel)));
            }
            PendingMove::PopOut { panel, below, keep } => {
                self.panels.retain(|entry| entry.id != panel);
                host.detach(panel);
                if !keep {
                    host.destroy_panel(panel);
                }
                tracing::debug!(target: "trellis::stack", ?panel, kept = keep, "pop completed");
                self.popped.emit(panel);

                if let (Underlay::After(delay), Some(beneath)) = (self.underlay, below) {
                    let timer = host.defer(delay);
                    self.pending_delays
                        .push((timer, PendingDelay::MoveToRest(beneath)));
                }
            }
        }
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Cancel all pending deferred stages and forget in-flight moves.
    ///
    /// After teardown a late timer fire or animation completion reaching the
    /// old hooks is inert.
    pub fn teardown(&mut self, host: &mut H) {
        for (timer, _) in self.pending_delays.drain(..) {
            host.cancel_deferred(timer);
        }
        self.pending_moves.clear();
    }
}
