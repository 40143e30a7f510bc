use crate::domain::Change;
use std::time::{Duration, Instant};

/// How long a burst of notes edits must stay quiet before the save fires
pub const NOTES_DEBOUNCE: Duration = Duration::from_secs(2);

/// Decides when the document should be flushed to disk. Task mutations save
/// on the next poll; notes edits (re)start a quiet window so a typing burst
/// of any length defers the write until typing stops. The scheduler performs
/// no I/O itself - the caller polls `take_due` each tick with the current
/// instant and runs the actual save.
#[derive(Debug, Default)]
pub struct SaveScheduler {
    save_now: bool,
    notes_deadline: Option<Instant>,
}

impl SaveScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a document change notification into the right save mode
    pub fn document_changed(&mut self, change: Change, now: Instant) {
        match change {
            Change::Tasks => self.request_immediate(),
            Change::Notes => self.request_debounced(now),
        }
    }

    /// A task mutation happened: save on the next poll
    pub fn request_immediate(&mut self) {
        self.save_now = true;
    }

    /// A notes edit happened: (re)start the quiet window from `now`
    pub fn request_debounced(&mut self, now: Instant) {
        self.notes_deadline = Some(now + NOTES_DEBOUNCE);
    }

    /// Whether anything is waiting to be saved, due or not
    pub fn is_pending(&self) -> bool {
        self.save_now || self.notes_deadline.is_some()
    }

    /// Returns true when a save should run at `now` and claims the pending
    /// state. A full-document save covers notes too, so an immediate request
    /// also clears any open debounce window.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.save_now {
            self.save_now = false;
            self.notes_deadline = None;
            return true;
        }

        match self.notes_deadline {
            Some(deadline) if now >= deadline => {
                self.notes_deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Claim everything pending regardless of deadlines (shutdown path)
    pub fn take_pending(&mut self) -> bool {
        let pending = self.is_pending();
        self.save_now = false;
        self.notes_deadline = None;
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_mutation_saves_on_next_poll() {
        let mut scheduler = SaveScheduler::new();
        let now = Instant::now();

        scheduler.document_changed(Change::Tasks, now);

        assert!(scheduler.take_due(now));
        assert!(!scheduler.take_due(now));
    }

    #[test]
    fn test_notes_burst_produces_single_save_after_quiet_window() {
        let mut scheduler = SaveScheduler::new();
        let t0 = Instant::now();

        // Three keystrokes, each less than 2 s after the previous
        scheduler.document_changed(Change::Notes, t0);
        scheduler.document_changed(Change::Notes, t0 + Duration::from_millis(900));
        scheduler.document_changed(Change::Notes, t0 + Duration::from_millis(1500));

        // 2 s after the FIRST keystroke: window restarted, nothing due yet
        assert!(!scheduler.take_due(t0 + Duration::from_millis(2100)));

        // 2 s after the LAST keystroke: exactly one save
        assert!(scheduler.take_due(t0 + Duration::from_millis(3500)));
        assert!(!scheduler.take_due(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn test_immediate_save_subsumes_open_debounce_window() {
        let mut scheduler = SaveScheduler::new();
        let now = Instant::now();

        scheduler.request_debounced(now);
        scheduler.request_immediate();

        assert!(scheduler.take_due(now));
        // The debounce window must not fire a second save later
        assert!(!scheduler.take_due(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_take_pending_bypasses_deadline() {
        let mut scheduler = SaveScheduler::new();
        let now = Instant::now();

        scheduler.request_debounced(now);
        assert!(scheduler.is_pending());

        assert!(scheduler.take_pending());
        assert!(!scheduler.is_pending());
        assert!(!scheduler.take_due(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_idle_scheduler_has_nothing_due() {
        let mut scheduler = SaveScheduler::new();
        assert!(!scheduler.is_pending());
        assert!(!scheduler.take_due(Instant::now()));
        assert!(!scheduler.take_pending());
    }
}
