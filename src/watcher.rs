/*!
 * Lifecycle and mutation watching.
 *
 * A `Watcher` starts `Uninitialized` and moves to `Watching` once the host
 * document is interactive: it scans the body once, then subscribes to
 * document-wide mutations and rewrites whatever is inserted or edited from
 * then on. There is no teardown; the subscription lives as long as the host.
 */

use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;

use crate::document::{DocumentHost, MutationKind, MutationRecord, ObserveOptions, Subscription};
use crate::scanner::{Rewriter, ScanReport};

/// Lifecycle state of a watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Uninitialized,
    /// Terminal: subscribed to the document for the rest of its lifetime
    Watching,
}

/// Counters accumulated by a watcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatcherStats {
    /// Result of the one-time scan of the main content root
    pub initial_scan: ScanReport,
    /// Mutation batches handled
    pub batches: usize,
    /// Mutation records handled
    pub records: usize,
    /// Text units processed because of mutations
    pub units_processed: usize,
    /// Text units rewritten because of mutations
    pub units_rewritten: usize,
}

#[derive(Debug)]
struct WatcherStatus {
    state: WatcherState,
    stats: WatcherStats,
    subscription: Option<Subscription>,
}

/// Keeps a host document rewritten as it changes
#[derive(Debug, Clone)]
pub struct Watcher {
    rewriter: Rc<Rewriter>,
    status: Rc<RefCell<WatcherStatus>>,
}

impl Watcher {
    /// Create an uninitialized watcher
    pub fn new(rewriter: Rewriter) -> Self {
        Self {
            rewriter: Rc::new(rewriter),
            status: Rc::new(RefCell::new(WatcherStatus {
                state: WatcherState::Uninitialized,
                stats: WatcherStats::default(),
                subscription: None,
            })),
        }
    }

    /// Create a watcher and attach it to `host`
    pub fn install<H: DocumentHost + 'static>(host: &mut H, rewriter: Rewriter) -> Self {
        let watcher = Self::new(rewriter);
        watcher.attach(host);
        watcher
    }

    /// Install with the default word pair and exemption set
    pub fn install_default<H: DocumentHost + 'static>(host: &mut H) -> Self {
        Self::install(host, Rewriter::default())
    }

    /// Start watching now if the document is interactive, otherwise once it
    /// becomes so
    pub fn attach<H: DocumentHost + 'static>(&self, host: &mut H) {
        if self.is_watching() {
            warn!("Watcher is already attached, ignoring");
            return;
        }

        if host.ready_state().is_ready() {
            self.start(host);
        } else {
            debug!("Document still loading, deferring watcher start");
            let watcher = self.clone();
            host.on_ready(Box::new(move |host: &mut H| watcher.start(host)));
        }
    }

    fn start<H: DocumentHost + 'static>(&self, host: &mut H) {
        if self.is_watching() {
            return;
        }

        let initial_scan = match host.body() {
            Some(body) => self.rewriter.scan_subtree(host, body),
            None => {
                debug!("No body yet, relying on mutations only");
                ScanReport::default()
            }
        };

        let handler = self.clone();
        let root = host.document_root();
        let subscription = host.observe(
            root,
            ObserveOptions::document_wide(),
            Box::new(move |host: &mut H, records: &[MutationRecord<H::Node>]| {
                handler.handle_batch(host, records)
            }),
        );

        let mut status = self.status.borrow_mut();
        status.stats.initial_scan = initial_scan;
        status.subscription = Some(subscription);
        status.state = WatcherState::Watching;
        info!(
            "Watching document ({} of {} text unit(s) rewritten on initial scan)",
            initial_scan.rewritten, initial_scan.visited
        );
    }

    /// Handle one batch of mutation records, in delivery order.
    /// Character-data edits reprocess the edited unit; every added node is
    /// scanned; removals are ignored.
    pub fn handle_batch<H: DocumentHost>(&self, host: &mut H, records: &[MutationRecord<H::Node>]) {
        let mut report = ScanReport::default();

        for record in records {
            match record.kind {
                MutationKind::CharacterData => {
                    let rewritten = self.rewriter.process_text_unit(host, record.target);
                    report.visited += 1;
                    report.rewritten += usize::from(rewritten);
                }
                MutationKind::ChildList => {
                    for &added in &record.added_nodes {
                        let scanned = self.rewriter.scan_subtree(host, added);
                        report.visited += scanned.visited;
                        report.rewritten += scanned.rewritten;
                    }
                }
            }
        }

        debug!(
            "Handled batch of {} record(s): {} unit(s) processed, {} rewritten",
            records.len(),
            report.visited,
            report.rewritten
        );

        let mut status = self.status.borrow_mut();
        status.stats.batches += 1;
        status.stats.records += records.len();
        status.stats.units_processed += report.visited;
        status.stats.units_rewritten += report.rewritten;
    }

    pub fn state(&self) -> WatcherState {
        self.status.borrow().state
    }

    pub fn is_watching(&self) -> bool {
        self.state() == WatcherState::Watching
    }

    pub fn stats(&self) -> WatcherStats {
        self.status.borrow().stats
    }

    /// Handle of the document subscription, once watching
    pub fn subscription(&self) -> Option<Subscription> {
        self.status.borrow().subscription.clone()
    }

    pub fn rewriter(&self) -> &Rewriter {
        &self.rewriter
    }
}
