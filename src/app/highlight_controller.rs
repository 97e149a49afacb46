use fltk::app::{self, Sender};

use super::document::DocumentId;
use super::highlight::ScanJob;
use super::messages::Message;

/// Quiet period after the last edit/scroll/resize before a scan is requested.
pub const DEBOUNCE_DELAY: f64 = 0.2;
/// Interval of the poll that drains at most one pending scan per tick.
pub const POLL_INTERVAL: f64 = 0.1;

/// Debounce-and-drain scheduling for the highlight scan.
///
/// Every trigger bumps the epoch and arms a fresh one-shot timer; only the
/// timer carrying the newest epoch marks the request pending, so bursts
/// coalesce into one request. A separate fixed-interval poll (armed in main)
/// drains at most one pending request per tick and hands a `ScanJob` snapshot
/// to a worker thread. The worker posts `Message::HighlightReady` back over
/// the channel; it never touches widget state. The `in_flight` guard bounds
/// scans to one at a time.
pub struct HighlightController {
    epoch: u64,
    pending: bool,
    in_flight: bool,
    /// Active document when the in-flight scan was snapshotted.
    scan_doc: Option<DocumentId>,
}

impl HighlightController {
    pub fn new() -> Self {
        Self {
            epoch: 0,
            pending: false,
            in_flight: false,
            scan_doc: None,
        }
    }

    /// Restart the debounce window. Called on every edit, scroll or resize.
    pub fn schedule(&mut self, sender: &Sender<Message>) {
        self.epoch = self.epoch.wrapping_add(1);
        let epoch = self.epoch;
        let s = *sender;
        app::add_timeout3(DEBOUNCE_DELAY, move |_| {
            s.send(Message::DebounceElapsed(epoch));
        });
    }

    /// A debounce timer fired. Stale epochs are superseded restarts.
    pub fn debounce_elapsed(&mut self, epoch: u64) {
        if epoch == self.epoch {
            self.pending = true;
        }
    }

    /// Drain one pending request if no scan is in flight. The snapshot
    /// closure runs on the UI thread; the job runs on the worker.
    pub fn poll(&mut self, sender: &Sender<Message>, snapshot: impl FnOnce() -> Option<ScanJob>) {
        if !self.pending || self.in_flight {
            return;
        }
        self.pending = false;
        let Some(job) = snapshot() else {
            return;
        };
        self.in_flight = true;
        self.scan_doc = Some(job.doc);
        let s = *sender;
        std::thread::spawn(move || {
            s.send(Message::HighlightReady(job.run()));
        });
    }

    /// A result arrived. Returns whether it is still worth applying: the
    /// scan's document must still be the active one.
    pub fn scan_finished(&mut self, result_doc: DocumentId, active: Option<DocumentId>) -> bool {
        self.in_flight = false;
        let started_for = self.scan_doc.take();
        started_for == Some(result_doc) && active == Some(result_doc)
    }

    #[cfg(test)]
    fn force_pending(&mut self) {
        self.pending = true;
    }
}

impl Default for HighlightController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_newest_epoch_marks_pending() {
        let (sender, _receiver) = app::channel::<Message>();
        let mut ctrl = HighlightController::new();
        ctrl.schedule(&sender);
        ctrl.schedule(&sender);
        ctrl.schedule(&sender);

        ctrl.debounce_elapsed(1);
        ctrl.debounce_elapsed(2);
        assert!(!ctrl.pending);
        ctrl.debounce_elapsed(3);
        assert!(ctrl.pending);
    }

    #[test]
    fn test_poll_is_noop_without_pending() {
        let (sender, _receiver) = app::channel::<Message>();
        let mut ctrl = HighlightController::new();
        let mut called = false;
        ctrl.poll(&sender, || {
            called = true;
            None
        });
        assert!(!called);
    }

    #[test]
    fn test_one_scan_in_flight() {
        let (sender, _receiver) = app::channel::<Message>();
        let mut ctrl = HighlightController::new();
        let doc = DocumentId(7);

        ctrl.force_pending();
        ctrl.poll(&sender, || {
            Some(ScanJob {
                doc,
                text: String::new(),
                caret_line: 0,
                rows: 1,
                search_spans: Vec::new(),
            })
        });
        assert!(ctrl.in_flight);

        // A second pending request does not start while one is in flight.
        ctrl.force_pending();
        let mut called = false;
        ctrl.poll(&sender, || {
            called = true;
            None
        });
        assert!(!called);
        assert!(ctrl.pending);
    }

    #[test]
    fn test_stale_results_discarded() {
        let (sender, _receiver) = app::channel::<Message>();
        let mut ctrl = HighlightController::new();
        let scanned = DocumentId(1);
        let other = DocumentId(2);

        ctrl.force_pending();
        ctrl.poll(&sender, || {
            Some(ScanJob {
                doc: scanned,
                text: String::new(),
                caret_line: 0,
                rows: 1,
                search_spans: Vec::new(),
            })
        });

        // Active tab changed before the result came back.
        assert!(!ctrl.scan_finished(scanned, Some(other)));
        assert!(!ctrl.in_flight);
    }
}
