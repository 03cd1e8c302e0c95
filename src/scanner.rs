/*!
 * Text unit processing and subtree scanning.
 *
 * `Rewriter` pairs a `Substituter` with an `ExemptionPolicy` and applies
 * them to a host document: one text node at a time, or to every text node
 * below a root while pruning exempt subtrees.
 */

use log::{debug, trace};
use std::borrow::Cow;

use crate::document::{DocumentHost, NodeKind, WalkFilter};
use crate::exemption::ExemptionPolicy;
use crate::substitution::{Substituter, default_substituter};

/// Outcome of a subtree scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Text units handed to the processor
    pub visited: usize,
    /// Text units whose payload was rewritten
    pub rewritten: usize,
}

impl ScanReport {
    fn record(&mut self, rewritten: bool) {
        self.visited += 1;
        if rewritten {
            self.rewritten += 1;
        }
    }
}

/// Applies substitution to text nodes of a host document
#[derive(Debug, Clone)]
pub struct Rewriter {
    substituter: Substituter,
    policy: ExemptionPolicy,
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new(default_substituter().clone(), ExemptionPolicy::default())
    }
}

impl Rewriter {
    pub fn new(substituter: Substituter, policy: ExemptionPolicy) -> Self {
        Self {
            substituter,
            policy,
        }
    }

    pub fn substituter(&self) -> &Substituter {
        &self.substituter
    }

    pub fn policy(&self) -> &ExemptionPolicy {
        &self.policy
    }

    /// Rewrite one text unit in place. Returns whether its payload changed.
    ///
    /// Exempt units and empty payloads are left alone, and nothing is written
    /// back when substitution leaves the text as it was, so no spurious
    /// mutation records are produced.
    pub fn process_text_unit<H: DocumentHost>(&self, host: &mut H, unit: H::Node) -> bool {
        if self.policy.is_exempt(host.parent_element(unit)) {
            trace!("Text unit {:?} is in an exempt region", unit);
            return false;
        }

        let replaced = match host.text(unit) {
            Some(payload) if !payload.is_empty() => {
                match self.substituter.substitute(payload) {
                    Cow::Owned(replaced) if replaced != payload => replaced,
                    _ => return false,
                }
            }
            _ => return false,
        };

        trace!("Rewriting text unit {:?} to '{}'", unit, replaced);
        host.set_text(unit, replaced);
        true
    }

    /// Rewrite every text unit under `root` in document order, pruning
    /// exempt subtrees. A text `root` is processed directly.
    pub fn scan_subtree<H: DocumentHost>(&self, host: &mut H, root: H::Node) -> ScanReport {
        let mut report = ScanReport::default();

        match host.node_kind(root) {
            NodeKind::Text => {
                report.record(self.process_text_unit(host, root));
                return report;
            }
            NodeKind::Other => return report,
            NodeKind::Element | NodeKind::Document => {}
        }

        if self.policy.is_exempt(host.element(root)) {
            trace!("Skipping exempt subtree {:?}", root);
            return report;
        }

        let units = {
            let host_ref: &H = host;
            let policy = &self.policy;
            host_ref.walk_text_nodes(root, &mut |node| match host_ref.element(node) {
                Some(element) if policy.is_exempt_element(&element) => {
                    trace!("Pruning exempt subtree {:?}", node);
                    WalkFilter::Reject
                }
                Some(_) => WalkFilter::Skip,
                None => WalkFilter::Accept,
            })
        };

        for unit in units {
            report.record(self.process_text_unit(host, unit));
        }

        debug!(
            "Scanned subtree {:?}: {} text unit(s), {} rewritten",
            root, report.visited, report.rewritten
        );
        report
    }
}
