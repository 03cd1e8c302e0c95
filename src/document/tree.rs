/*!
 * In-memory document tree.
 *
 * `DomTree` is an arena of nodes that behaves like a small live document:
 * structural and text edits queue mutation records, which are handed to
 * subscribers in batches when the owner calls `flush_mutations`. Records
 * produced while a batch is being handled land in the next batch, the same
 * way a browser delivers observer callbacks.
 */

use log::{debug, trace, warn};
use std::mem;

use super::{
    DocumentHost, ElementCategory, ElementView, HasCategory, HasEditableFlag, MutationCallback,
    MutationKind, MutationRecord, NodeKind, ObserveOptions, ReadyCallback, ReadyState,
    Subscription, WalkFilter,
};

/// Handle to a node in a `DomTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum Payload {
    Document,
    Element {
        tag: String,
        /// `contenteditable` attribute; `None` inherits from the parent
        content_editable: Option<bool>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    payload: Payload,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// What a subscription listens to; outlives the delivery of any one batch
struct Observer {
    target: NodeId,
    options: ObserveOptions,
    subscription: Subscription,
}

/// Queued record with the subscriptions that were interested when it was queued
struct PendingRecord {
    record: MutationRecord<NodeId>,
    recipients: Vec<u64>,
}

/// Arena-backed live document
pub struct DomTree {
    nodes: Vec<NodeData>,
    ready_state: ReadyState,
    ready_callbacks: Vec<ReadyCallback<DomTree>>,
    observers: Vec<Observer>,
    callbacks: Vec<(u64, MutationCallback<DomTree>)>,
    pending: Vec<PendingRecord>,
    next_subscription: u64,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Empty document, still loading
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                payload: Payload::Document,
                parent: None,
                children: Vec::new(),
            }],
            ready_state: ReadyState::Loading,
            ready_callbacks: Vec::new(),
            observers: Vec::new(),
            callbacks: Vec::new(),
            pending: Vec::new(),
            next_subscription: 1,
        }
    }

    /// Document with `HTML > (HEAD, BODY)` in the given ready state.
    /// Returns the tree and the body node.
    pub fn with_body(ready_state: ReadyState) -> (Self, NodeId) {
        let mut tree = Self::new();
        let root = tree.document_root();
        let html = tree.create_element("HTML");
        let head = tree.create_element("HEAD");
        let body = tree.create_element("BODY");
        tree.append_child(root, html);
        tree.append_child(html, head);
        tree.append_child(html, body);
        tree.pending.clear();
        tree.ready_state = ready_state;
        (tree, body)
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Payload::Element {
            tag: tag.to_ascii_uppercase(),
            content_editable: None,
        })
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Payload::Text(text.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Payload::Comment(text.to_string()))
    }

    /// Create an element with a single text child and append it to `parent`.
    /// Returns `(element, text)`.
    pub fn append_element_with_text(
        &mut self,
        parent: NodeId,
        tag: &str,
        text: &str,
    ) -> (NodeId, NodeId) {
        let element = self.create_element(tag);
        let text_node = self.create_text(text);
        self.append_child(element, text_node);
        self.append_child(parent, element);
        (element, text_node)
    }

    /// Append `child` as the last child of `parent`, detaching it first if needed.
    /// Inserting a node into itself or one of its descendants is refused.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.is_inclusive_ancestor(child, parent) {
            warn!("Refusing to insert {:?} into its own subtree at {:?}", child, parent);
            return;
        }
        if let Some(old_parent) = self.nodes[child.0].parent {
            self.remove_child(old_parent, child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        self.queue(MutationRecord::child_list(parent, vec![child], Vec::new()));
    }

    /// Detach `child` from `parent`; no-op if it is not a child of `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let children = &mut self.nodes[parent.0].children;
        if let Some(index) = children.iter().position(|&c| c == child) {
            children.remove(index);
            self.nodes[child.0].parent = None;
            self.queue(MutationRecord::child_list(parent, Vec::new(), vec![child]));
        }
    }

    /// Set or clear the `contenteditable` attribute of an element
    pub fn set_content_editable(&mut self, element: NodeId, editable: Option<bool>) {
        if let Payload::Element {
            content_editable, ..
        } = &mut self.nodes[element.0].payload
        {
            *content_editable = editable;
        }
    }

    /// Advance the loading state; leaving `Loading` fires the ready callbacks once
    pub fn set_ready_state(&mut self, state: ReadyState) {
        let was_ready = self.ready_state.is_ready();
        self.ready_state = state;
        if !was_ready && state.is_ready() {
            let callbacks = mem::take(&mut self.ready_callbacks);
            debug!("Document ready, firing {} ready callback(s)", callbacks.len());
            for callback in callbacks {
                callback(self);
            }
        }
    }

    /// Upper-case tag name of an element
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].payload {
            Payload::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Text of a comment node
    pub fn comment_text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].payload {
            Payload::Comment(text) => Some(text),
            _ => None,
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Concatenated text of every text node under `node`, in document order
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Payload::Text(text) = &self.nodes[current.0].payload {
                out.push_str(text);
            }
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        out
    }

    /// Number of mutation records waiting for delivery
    pub fn pending_mutations(&self) -> usize {
        self.pending.len()
    }

    /// Deliver every queued record as one batch to the interested subscribers.
    /// Interest is decided when a record is queued, so subscribers only see
    /// records queued after they registered, and later moves or removals do
    /// not take records away from them.
    /// Returns the number of records in the batch.
    pub fn flush_mutations(&mut self) -> usize {
        let batch = mem::take(&mut self.pending);
        if batch.is_empty() {
            return 0;
        }

        let mut callbacks = mem::take(&mut self.callbacks);
        for (id, callback) in callbacks.iter_mut() {
            let id = *id;
            if !self.is_subscription_active(id) {
                continue;
            }
            let records: Vec<MutationRecord<NodeId>> = batch
                .iter()
                .filter(|pending| pending.recipients.contains(&id))
                .map(|pending| pending.record.clone())
                .collect();
            if !records.is_empty() {
                trace!("Delivering {} record(s) to subscription {}", records.len(), id);
                callback(self, &records);
            }
        }

        self.observers.retain(|observer| observer.subscription.is_active());
        let observers = &self.observers;
        callbacks.retain(|(id, _)| {
            observers
                .iter()
                .any(|observer| observer.subscription.id() == *id)
        });
        // keep subscriptions registered from inside a callback
        callbacks.append(&mut self.callbacks);
        self.callbacks = callbacks;

        batch.len()
    }

    /// Flush until no records remain. Returns the number of batches delivered.
    pub fn settle(&mut self) -> usize {
        let mut batches = 0;
        while self.flush_mutations() > 0 {
            batches += 1;
        }
        batches
    }

    fn queue(&mut self, record: MutationRecord<NodeId>) {
        let recipients = self
            .observers
            .iter()
            .filter(|observer| {
                observer.subscription.is_active() && self.is_observed_by(observer, &record)
            })
            .map(|observer| observer.subscription.id())
            .collect();
        self.pending.push(PendingRecord { record, recipients });
    }

    fn push(&mut self, payload: Payload) -> NodeId {
        self.nodes.push(NodeData {
            payload,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    fn is_subscription_active(&self, id: u64) -> bool {
        self.observers
            .iter()
            .any(|observer| observer.subscription.id() == id && observer.subscription.is_active())
    }

    fn is_observed_by(&self, observer: &Observer, record: &MutationRecord<NodeId>) -> bool {
        let wanted = match record.kind {
            MutationKind::ChildList => observer.options.child_list,
            MutationKind::CharacterData => observer.options.character_data,
        };
        if !wanted {
            return false;
        }
        if observer.options.subtree {
            self.is_inclusive_ancestor(observer.target, record.target)
        } else {
            observer.target == record.target
        }
    }
}

/// Borrowed element view into a `DomTree`
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn new(tree: &'a DomTree, id: NodeId) -> Option<Self> {
        match tree.nodes[id.0].payload {
            Payload::Element { .. } => Some(Self { tree, id }),
            _ => None,
        }
    }
}

impl HasCategory for ElementRef<'_> {
    fn category(&self) -> ElementCategory {
        ElementCategory::from_tag_name(self.tree.tag_name(self.id).unwrap_or_default())
    }
}

impl HasEditableFlag for ElementRef<'_> {
    fn is_content_editable(&self) -> bool {
        let mut current = Some(self.id);
        while let Some(id) = current {
            if let Payload::Element {
                content_editable: Some(editable),
                ..
            } = self.tree.nodes[id.0].payload
            {
                return editable;
            }
            current = self.tree.nodes[id.0].parent;
        }
        false
    }
}

impl ElementView for ElementRef<'_> {
    fn parent_element(&self) -> Option<Self> {
        let parent = self.tree.nodes[self.id.0].parent?;
        ElementRef::new(self.tree, parent)
    }
}

impl DocumentHost for DomTree {
    type Node = NodeId;
    type Element<'a> = ElementRef<'a>;

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn on_ready(&mut self, callback: ReadyCallback<Self>) {
        self.ready_callbacks.push(callback);
    }

    fn document_root(&self) -> NodeId {
        NodeId(0)
    }

    fn body(&self) -> Option<NodeId> {
        let mut stack = vec![self.document_root()];
        while let Some(node) = stack.pop() {
            if self.tag_name(node) == Some("BODY") {
                return Some(node);
            }
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        None
    }

    fn node_kind(&self, node: NodeId) -> NodeKind {
        match self.nodes[node.0].payload {
            Payload::Document => NodeKind::Document,
            Payload::Element { .. } => NodeKind::Element,
            Payload::Text(_) => NodeKind::Text,
            Payload::Comment(_) => NodeKind::Other,
        }
    }

    fn element(&self, node: NodeId) -> Option<ElementRef<'_>> {
        ElementRef::new(self, node)
    }

    fn parent_element(&self, node: NodeId) -> Option<ElementRef<'_>> {
        let parent = self.nodes[node.0].parent?;
        ElementRef::new(self, parent)
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].payload {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    fn set_text(&mut self, node: NodeId, text: String) {
        if let Payload::Text(current) = &mut self.nodes[node.0].payload {
            *current = text;
            self.queue(MutationRecord::character_data(node));
        }
    }

    fn walk_text_nodes(
        &self,
        root: NodeId,
        filter: &mut dyn FnMut(NodeId) -> WalkFilter,
    ) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[root.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            match filter(node) {
                WalkFilter::Reject => continue,
                WalkFilter::Skip => {}
                WalkFilter::Accept => {
                    if self.node_kind(node) == NodeKind::Text {
                        found.push(node);
                    }
                }
            }
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        found
    }

    fn observe(
        &mut self,
        target: NodeId,
        options: ObserveOptions,
        callback: MutationCallback<Self>,
    ) -> Subscription {
        let subscription = Subscription::new(self.next_subscription);
        self.next_subscription += 1;
        debug!(
            "Registered subscription {} on {:?} ({:?})",
            subscription.id(),
            target,
            options
        );
        self.observers.push(Observer {
            target,
            options,
            subscription: subscription.clone(),
        });
        self.callbacks.push((subscription.id(), callback));
        subscription
    }
}
