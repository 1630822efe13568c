//! Page snapping for scrollable views.
//!
//! [`PageSnap`] keeps a scrollable view aligned to page boundaries. It
//! tracks a committed page index, exposes programmatic navigation
//! ([`set_index`](PageSnap::set_index), [`next`](PageSnap::next),
//! [`prev`](PageSnap::prev)), and corrects free scrolls back onto a page
//! when the host reports that scrolling ended.
//!
//! Like the stack controller, snapping is host-driven: the controller
//! issues scroll commands through the [`SnapHost`] seam and the host calls
//! [`PageSnap::on_scroll_end`] whenever a scroll settles, whether the
//! controller started it or the user did.

use std::time::Duration;

use trellis_core::Signal;

use crate::animation::Easing;
use crate::config::SnapConfig;
use crate::host::{Orientation, PageId, SnapHost};

/// Controller keeping a scrollable view aligned to page boundaries.
///
/// # Signals
///
/// - `index_changed(i32)`: emitted when the committed index changes
/// - `total_changed(i32)`: emitted when the page count changes
pub struct PageSnap {
    pages: Vec<PageId>,
    index: i32,
    is_snapping: bool,
    axis: Orientation,
    attached: bool,
    selector: Option<String>,
    snap_duration: Duration,
    easing: Easing,

    /// Signal emitted when the committed index changes.
    pub index_changed: Signal<i32>,
    /// Signal emitted when the page count changes.
    pub total_changed: Signal<i32>,
}

impl PageSnap {
    /// Create a snap controller from configuration.
    pub fn new(config: SnapConfig) -> Self {
        Self {
            pages: Vec::new(),
            index: 0,
            is_snapping: false,
            axis: Orientation::Horizontal,
            attached: false,
            selector: config.selector,
            snap_duration: config.snap_duration,
            easing: config.easing,
            index_changed: Signal::new(),
            total_changed: Signal::new(),
        }
    }

    /// Bind to a host: read its scroll axis and discover its pages.
    pub fn attach<H: SnapHost>(&mut self, host: &H) {
        self.axis = host.orientation();
        self.attached = true;
        self.refresh_pages(host);
        tracing::debug!(
            target: "trellis::snap",
            total = self.total(),
            axis = ?self.axis,
            "attached"
        );
    }

    /// The committed page index.
    pub fn index(&self) -> i32 {
        self.index
    }

    /// Number of known pages.
    pub fn total(&self) -> i32 {
        self.pages.len() as i32
    }

    /// The page handle at an index.
    pub fn page(&self, index: i32) -> Option<PageId> {
        usize::try_from(index).ok().and_then(|i| self.pages.get(i)).copied()
    }

    /// Whether a controller-issued snap scroll is still in flight.
    pub fn is_snapping(&self) -> bool {
        self.is_snapping
    }

    /// Re-discover the host's pages after content changes.
    ///
    /// Emits `total_changed` when the count differs, and clamps (and
    /// re-emits) the committed index if it fell off the end.
    pub fn refresh_pages<H: SnapHost>(&mut self, host: &H) {
        let old_total = self.total();
        self.pages = host.query_pages(self.selector.as_deref());
        let total = self.total();
        if total != old_total {
            self.total_changed.emit(total);
        }
        if total > 0 && self.index >= total {
            self.index = total - 1;
            self.index_changed.emit(self.index);
        }
    }

    /// Scroll so a page's leading edge reaches the view's leading edge.
    ///
    /// Negative page numbers are treated as 0; a page number past the end
    /// (or an empty page list) scrolls to offset 0. Zero duration scrolls
    /// instantly; otherwise the scroll animates and the snapping flag is
    /// raised until the host reports the end.
    pub fn scroll_to_page<H: SnapHost>(
        &mut self,
        host: &mut H,
        page: i32,
        duration: Duration,
        easing: Easing,
    ) {
        let slot = page.max(0) as usize;
        let offset = self
            .pages
            .get(slot)
            .map(|&p| host.page_leading(p))
            .unwrap_or(0.0);
        if duration > Duration::ZERO {
            self.is_snapping = true;
        }
        tracing::trace!(target: "trellis::snap", page, offset, "scrolling to page");
        host.scroll_to(offset, self.axis, duration, easing);
    }

    /// Commit a page index, scrolling there if attached.
    ///
    /// The value is clamped to `0..total` (any value commits as `max(0, v)`
    /// while no pages are known). Re-committing the current index issues an
    /// instant correction scroll rather than an animated one. Returns the
    /// committed value.
    pub fn set_index<H: SnapHost>(&mut self, host: &mut H, value: i32) -> i32 {
        let total = self.total();
        let mut value = value.max(0);
        if total > 0 && value >= total {
            value = total - 1;
        }

        if self.attached {
            let duration = if value == self.index {
                Duration::ZERO
            } else {
                self.snap_duration
            };
            self.scroll_to_page(host, value, duration, self.easing);
        }

        if value != self.index {
            self.index = value;
            self.index_changed.emit(value);
        }
        value
    }

    /// Alias for [`set_index`](Self::set_index), matching gesture-handler
    /// call sites.
    pub fn snap_to<H: SnapHost>(&mut self, host: &mut H, page: i32) -> i32 {
        self.set_index(host, page)
    }

    /// Advance to the next page. At the last page this is a no-op.
    pub fn next<H: SnapHost>(&mut self, host: &mut H) {
        if self.index + 1 < self.total() {
            self.set_index(host, self.index + 1);
        }
    }

    /// Go back to the previous page. At the first page this is a no-op.
    pub fn prev<H: SnapHost>(&mut self, host: &mut H) {
        if self.index > 0 {
            self.set_index(host, self.index - 1);
        }
    }

    /// The page the current scroll offset reads as: the first page whose
    /// midpoint lies past the offset. `None` when the offset is past every
    /// midpoint (or no pages are known).
    pub fn snap_index<H: SnapHost>(&self, host: &H) -> Option<i32> {
        let offset = host.scroll_offset();
        self.pages.iter().position(|&page| {
            offset < host.page_leading(page) + host.page_extent(page) / 2.0
        }).map(|i| i as i32)
    }

    /// Hook the host calls when any scroll settles.
    ///
    /// Mid-flick settles are ignored (a further scroll-end follows). A
    /// settle of the controller's own snap scroll just lowers the flag.
    /// Any other settle is a free scroll and gets corrected onto the
    /// nearest page boundary.
    pub fn on_scroll_end<H: SnapHost>(&mut self, host: &mut H) {
        if host.is_flicking() {
            self.is_snapping = false;
            return;
        }
        if self.is_snapping {
            self.is_snapping = false;
            return;
        }
        if let Some(page) = self.snap_index(host) {
            tracing::trace!(target: "trellis::snap", page, "correcting free scroll");
            self.snap_to(host, page);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    const PAGE_EXTENT: f32 = 100.0;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct ScrollCommand {
        offset: f32,
        axis: Orientation,
        duration: Duration,
        easing: Easing,
    }

    struct MockSnapHost {
        // Owns the key allocator the page handles came from.
        _keys: SlotMap<PageId, ()>,
        pages: Vec<PageId>,
        orientation: Orientation,
        flicking: bool,
        scroll_offset: f32,
        commands: Vec<ScrollCommand>,
    }

    impl MockSnapHost {
        /// Pages laid out contiguously: page `i` spans `[i*100, (i+1)*100)`.
        fn with_pages(count: usize) -> Self {
            let mut keys = SlotMap::with_key();
            let pages = (0..count).map(|_| keys.insert(())).collect();
            Self {
                _keys: keys,
                pages,
                orientation: Orientation::Horizontal,
                flicking: false,
                scroll_offset: 0.0,
                commands: Vec::new(),
            }
        }

        fn page_number(&self, page: PageId) -> usize {
            self.pages.iter().position(|&p| p == page).unwrap()
        }

        fn last_command(&self) -> ScrollCommand {
            *self.commands.last().expect("no scroll issued")
        }
    }

    impl SnapHost for MockSnapHost {
        fn orientation(&self) -> Orientation {
            self.orientation
        }

        fn is_flicking(&self) -> bool {
            self.flicking
        }

        fn scroll_offset(&self) -> f32 {
            self.scroll_offset
        }

        fn query_pages(&self, _selector: Option<&str>) -> Vec<PageId> {
            self.pages.clone()
        }

        fn page_leading(&self, page: PageId) -> f32 {
            self.page_number(page) as f32 * PAGE_EXTENT
        }

        fn page_extent(&self, _page: PageId) -> f32 {
            PAGE_EXTENT
        }

        fn scroll_to(&mut self, offset: f32, axis: Orientation, duration: Duration, easing: Easing) {
            self.scroll_offset = offset;
            self.commands.push(ScrollCommand {
                offset,
                axis,
                duration,
                easing,
            });
        }
    }

    fn attached(host: &MockSnapHost) -> PageSnap {
        let mut snap = PageSnap::new(SnapConfig::default());
        snap.attach(host);
        snap
    }

    #[test]
    fn test_attach_discovers_pages_and_axis() {
        let mut host = MockSnapHost::with_pages(4);
        host.orientation = Orientation::Vertical;
        let snap = attached(&host);

        assert_eq!(snap.total(), 4);
        assert_eq!(snap.index(), 0);
        assert_eq!(snap.page(2), Some(host.pages[2]));
        assert_eq!(snap.page(-1), None);
        assert_eq!(snap.page(4), None);
    }

    #[test]
    fn test_set_index_clamps() {
        let mut host = MockSnapHost::with_pages(3);
        let mut snap = attached(&host);

        assert_eq!(snap.set_index(&mut host, -5), 0);
        assert_eq!(snap.set_index(&mut host, 1), 1);
        assert_eq!(snap.set_index(&mut host, 2), 2);
        assert_eq!(snap.set_index(&mut host, 3), 2);
        assert_eq!(snap.set_index(&mut host, 99), 2);
        assert_eq!(snap.index(), 2);
    }

    #[test]
    fn test_set_index_with_no_pages_commits_nonnegative_value() {
        let mut host = MockSnapHost::with_pages(0);
        let mut snap = attached(&host);

        assert_eq!(snap.set_index(&mut host, 7), 7);
        assert_eq!(snap.index(), 7);
        assert_eq!(snap.set_index(&mut host, -3), 0);
        assert_eq!(snap.index(), 0);
        // Missing page scrolls to the origin.
        assert_eq!(host.last_command().offset, 0.0);
    }

    #[test]
    fn test_changed_index_animates_repeat_is_instant() {
        let mut host = MockSnapHost::with_pages(3);
        let mut snap = attached(&host);

        snap.set_index(&mut host, 2);
        let animated = host.last_command();
        assert_eq!(animated.offset, 200.0);
        assert_eq!(animated.duration, Duration::from_millis(300));
        assert!(snap.is_snapping());

        snap.on_scroll_end(&mut host);
        assert!(!snap.is_snapping());

        // Same index again: instant correction, no snapping flag.
        snap.set_index(&mut host, 2);
        let instant = host.last_command();
        assert_eq!(instant.offset, 200.0);
        assert_eq!(instant.duration, Duration::ZERO);
        assert!(!snap.is_snapping());
    }

    #[test]
    fn test_scroll_uses_attach_time_axis() {
        let mut host = MockSnapHost::with_pages(2);
        host.orientation = Orientation::Vertical;
        let mut snap = attached(&host);

        snap.set_index(&mut host, 1);
        assert_eq!(host.last_command().axis, Orientation::Vertical);
    }

    #[test]
    fn test_snap_index_midpoint_rule() {
        let mut host = MockSnapHost::with_pages(3);
        let snap = attached(&host);

        // Page midpoints sit at 50, 150, 250.
        host.scroll_offset = 0.0;
        assert_eq!(snap.snap_index(&host), Some(0));
        host.scroll_offset = 49.9;
        assert_eq!(snap.snap_index(&host), Some(0));
        host.scroll_offset = 50.0;
        assert_eq!(snap.snap_index(&host), Some(1));
        host.scroll_offset = 149.0;
        assert_eq!(snap.snap_index(&host), Some(1));
        host.scroll_offset = 150.0;
        assert_eq!(snap.snap_index(&host), Some(2));
        host.scroll_offset = 249.9;
        assert_eq!(snap.snap_index(&host), Some(2));
        // Past the last midpoint there is nothing to snap to.
        host.scroll_offset = 250.0;
        assert_eq!(snap.snap_index(&host), None);
    }

    #[test]
    fn test_snap_index_empty() {
        let host = MockSnapHost::with_pages(0);
        let snap = attached(&host);
        assert_eq!(snap.snap_index(&host), None);
    }

    #[test]
    fn test_free_scroll_end_corrects_to_nearest_page() {
        let mut host = MockSnapHost::with_pages(3);
        let mut snap = attached(&host);

        host.scroll_offset = 160.0;
        snap.on_scroll_end(&mut host);

        assert_eq!(snap.index(), 2);
        let correction = host.last_command();
        assert_eq!(correction.offset, 200.0);
        assert_eq!(correction.duration, Duration::from_millis(300));
    }

    #[test]
    fn test_scroll_end_mid_flick_holds_off() {
        let mut host = MockSnapHost::with_pages(3);
        let mut snap = attached(&host);

        host.flicking = true;
        host.scroll_offset = 160.0;
        snap.on_scroll_end(&mut host);

        assert!(host.commands.is_empty());
        assert_eq!(snap.index(), 0);
    }

    #[test]
    fn test_own_snap_settle_does_not_recurse() {
        let mut host = MockSnapHost::with_pages(3);
        let mut snap = attached(&host);

        snap.set_index(&mut host, 1);
        let issued = host.commands.len();

        snap.on_scroll_end(&mut host);
        assert_eq!(host.commands.len(), issued);
        assert!(!snap.is_snapping());
    }

    #[test]
    fn test_scroll_end_past_last_midpoint_takes_no_action() {
        let mut host = MockSnapHost::with_pages(3);
        let mut snap = attached(&host);

        host.scroll_offset = 260.0;
        snap.on_scroll_end(&mut host);

        assert!(host.commands.is_empty());
        assert_eq!(snap.index(), 0);
    }

    #[test]
    fn test_next_prev_with_boundary_noops() {
        let mut host = MockSnapHost::with_pages(3);
        let mut snap = attached(&host);

        snap.prev(&mut host);
        assert_eq!(snap.index(), 0);
        assert!(host.commands.is_empty());

        snap.next(&mut host);
        assert_eq!(snap.index(), 1);
        snap.next(&mut host);
        assert_eq!(snap.index(), 2);

        let issued = host.commands.len();
        snap.next(&mut host);
        assert_eq!(snap.index(), 2);
        assert_eq!(host.commands.len(), issued);

        snap.prev(&mut host);
        assert_eq!(snap.index(), 1);
    }

    #[test]
    fn test_refresh_pages_emits_and_clamps() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicI32, Ordering};

        let mut host = MockSnapHost::with_pages(5);
        let mut snap = attached(&host);
        snap.set_index(&mut host, 4);

        let seen_total = Arc::new(AtomicI32::new(-1));
        let seen_index = Arc::new(AtomicI32::new(-1));
        let totals = seen_total.clone();
        let indices = seen_index.clone();
        snap.total_changed.connect(move |total| {
            totals.store(*total, Ordering::SeqCst);
        });
        snap.index_changed.connect(move |index| {
            indices.store(*index, Ordering::SeqCst);
        });

        host.pages.truncate(2);
        snap.refresh_pages(&host);

        assert_eq!(snap.total(), 2);
        assert_eq!(snap.index(), 1);
        assert_eq!(seen_total.load(Ordering::SeqCst), 2);
        assert_eq!(seen_index.load(Ordering::SeqCst), 1);

        // Same pages again: no further signals.
        seen_total.store(-1, Ordering::SeqCst);
        snap.refresh_pages(&host);
        assert_eq!(seen_total.load(Ordering::SeqCst), -1);
    }

    #[test]
    fn test_index_changed_fires_once_per_change() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let mut host = MockSnapHost::with_pages(3);
        let mut snap = attached(&host);

        let fired = Arc::new(AtomicUsize::new(0));
        let fired2 = fired.clone();
        snap.index_changed.connect(move |_| {
            fired2.fetch_add(1, Ordering::SeqCst);
        });

        snap.set_index(&mut host, 1);
        snap.set_index(&mut host, 1);
        snap.set_index(&mut host, 99);
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    static_assertions::assert_impl_all!(PageSnap: Send, Sync);
}
