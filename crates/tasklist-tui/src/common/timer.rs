//! Single-flight timer bookkeeping.
//!
//! Each timer purpose owns at most one pending timer. Scheduling a new one
//! cancels the previous token first, and an expiry is honoured only if its id
//! is still the active one for that purpose.

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Default)]
pub struct TimerSeq {
    next: u64,
}

impl TimerSeq {
    pub fn next_id(&mut self) -> TimerId {
        let id = TimerId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Right-padding recomputation after the list changes size.
    Padding,
    /// Deferred scroll to the end of the list.
    Scroll,
    /// Minimum display time of the loading indicator.
    LoadingFloor,
}

impl TimerKind {
    pub const ALL: [TimerKind; 3] = [TimerKind::Padding, TimerKind::Scroll, TimerKind::LoadingFloor];
}

/// Pending-timer state for one purpose (mutated only by the reducer).
#[derive(Debug, Default, Clone)]
pub struct TimerState {
    pub active: Option<TimerId>,
    pub cancel: Option<CancellationToken>,
}

impl TimerState {
    pub fn is_pending(&self) -> bool {
        self.active.is_some()
    }

    pub fn on_started(&mut self, id: TimerId, cancel: CancellationToken) {
        self.active = Some(id);
        self.cancel = Some(cancel);
    }

    /// Clears the state if `id` is the pending timer. Returns whether it was.
    pub fn finish_if_active(&mut self, id: TimerId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.clear();
        }
        ok
    }

    /// Forgets the pending timer, handing back its token for cancellation.
    pub fn take(&mut self) -> Option<CancellationToken> {
        self.active = None;
        self.cancel.take()
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cancel = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Timers {
    pub padding: TimerState,
    pub scroll: TimerState,
    pub loading_floor: TimerState,
}

impl Timers {
    pub fn state(&self, kind: TimerKind) -> &TimerState {
        match kind {
            TimerKind::Padding => &self.padding,
            TimerKind::Scroll => &self.scroll,
            TimerKind::LoadingFloor => &self.loading_floor,
        }
    }

    pub fn state_mut(&mut self, kind: TimerKind) -> &mut TimerState {
        match kind {
            TimerKind::Padding => &mut self.padding,
            TimerKind::Scroll => &mut self.scroll,
            TimerKind::LoadingFloor => &mut self.loading_floor,
        }
    }

    pub fn is_any_pending(&self) -> bool {
        self.padding.is_pending() || self.scroll.is_pending() || self.loading_floor.is_pending()
    }
}
