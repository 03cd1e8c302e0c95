/*!
 * Host document capability surface.
 *
 * The engine never owns the document it rewrites. Everything it needs from
 * the host is expressed here as narrow traits:
 *
 * - `HasCategory` / `HasEditableFlag`: per-element introspection used by the
 *   exemption check, small enough to fake in tests
 * - `ElementView`: an element that can also name its parent element
 * - `DocumentHost`: readiness, traversal, text payload access and mutation
 *   subscriptions
 *
 * `tree::DomTree` is an in-memory host used by the binary, benches and tests.
 */

pub mod tree;

use std::fmt::Debug;
use std::hash::Hash;
use std::cell::Cell;
use std::rc::Rc;

pub use tree::{DomTree, NodeId};

/// Loading state of a host document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    /// Still parsing
    Loading,
    /// Parsed, subresources may still be loading
    Interactive,
    /// Fully loaded
    Complete,
}

impl ReadyState {
    /// Whether the document has reached interactive-or-later
    pub fn is_ready(self) -> bool {
        self >= ReadyState::Interactive
    }
}

/// Broad kind of a document node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    /// Comments and anything else without rewritable text
    Other,
}

/// Element categories the exemption policy can name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementCategory {
    Script,
    Style,
    NoScript,
    Input,
    TextArea,
    Code,
    Pre,
    /// Any other tag, stored uppercase
    Other(String),
}

impl ElementCategory {
    /// Map a tag name (any case) to its category
    pub fn from_tag_name(tag: &str) -> Self {
        let upper = tag.trim().to_ascii_uppercase();
        match upper.as_str() {
            "SCRIPT" => Self::Script,
            "STYLE" => Self::Style,
            "NOSCRIPT" => Self::NoScript,
            "INPUT" => Self::Input,
            "TEXTAREA" => Self::TextArea,
            "CODE" => Self::Code,
            "PRE" => Self::Pre,
            _ => Self::Other(upper),
        }
    }
}

/// Tag/category introspection on an element
pub trait HasCategory {
    fn category(&self) -> ElementCategory;
}

/// Live user-editable region introspection on an element
pub trait HasEditableFlag {
    /// True when the element is inside a live editable region, the way a
    /// browser reports `isContentEditable`
    fn is_content_editable(&self) -> bool;
}

/// An element view that can walk to its parent element
pub trait ElementView: HasCategory + HasEditableFlag + Sized {
    fn parent_element(&self) -> Option<Self>;
}

/// Decision returned by a walker filter for each visited node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkFilter {
    /// Yield the node if it is a text node, and descend into it
    Accept,
    /// Do not yield the node, but descend into it
    Skip,
    /// Do not yield the node and prune its whole subtree
    Reject,
}

/// What a mutation subscription listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObserveOptions {
    /// Node insertions and removals
    pub child_list: bool,
    /// All descendant levels of the target, not just the target itself
    pub subtree: bool,
    /// Text payload edits
    pub character_data: bool,
}

impl ObserveOptions {
    /// Child-list, subtree and character-data all enabled
    pub const fn document_wide() -> Self {
        Self {
            child_list: true,
            subtree: true,
            character_data: true,
        }
    }
}

/// Kind of change a mutation record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    CharacterData,
}

/// A single change delivered to a mutation subscriber
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord<N> {
    pub kind: MutationKind,
    /// Parent for child-list changes, the text node for character-data changes
    pub target: N,
    pub added_nodes: Vec<N>,
    pub removed_nodes: Vec<N>,
}

impl<N> MutationRecord<N> {
    /// Record for nodes inserted into and/or removed from `target`
    pub fn child_list(target: N, added_nodes: Vec<N>, removed_nodes: Vec<N>) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            added_nodes,
            removed_nodes,
        }
    }

    /// Record for an edit of the text payload of `target`
    pub fn character_data(target: N) -> Self {
        Self {
            kind: MutationKind::CharacterData,
            target,
            added_nodes: Vec::new(),
            removed_nodes: Vec::new(),
        }
    }
}

/// Cancellation handle for a mutation subscription
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    active: Rc<Cell<bool>>,
}

impl Subscription {
    /// Create an active subscription handle
    pub fn new(id: u64) -> Self {
        Self {
            id,
            active: Rc::new(Cell::new(true)),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Stop delivery to this subscription; hosts check `is_active` before delivering
    pub fn cancel(&self) {
        self.active.set(false);
    }
}

/// Batch handler registered with `DocumentHost::observe`
pub type MutationCallback<H> =
    Box<dyn FnMut(&mut H, &[MutationRecord<<H as DocumentHost>::Node>])>;

/// One-shot handler registered with `DocumentHost::on_ready`
pub type ReadyCallback<H> = Box<dyn FnOnce(&mut H)>;

/// Capabilities the engine consumes from a live document
pub trait DocumentHost: Sized {
    /// Cheap handle to a node
    type Node: Copy + Eq + Hash + Debug;

    /// Element view borrowed from the host
    type Element<'a>: ElementView
    where
        Self: 'a;

    /// Current loading state
    fn ready_state(&self) -> ReadyState;

    /// Run `callback` once when the document leaves the loading state
    fn on_ready(&mut self, callback: ReadyCallback<Self>);

    /// Root of the whole document
    fn document_root(&self) -> Self::Node;

    /// Main content root, if it exists yet
    fn body(&self) -> Option<Self::Node>;

    fn node_kind(&self, node: Self::Node) -> NodeKind;

    /// Element view of `node`, if it is an element
    fn element(&self, node: Self::Node) -> Option<Self::Element<'_>>;

    /// Element view of the parent of `node`, if the parent is an element
    fn parent_element(&self, node: Self::Node) -> Option<Self::Element<'_>>;

    /// Text payload of a text node
    fn text(&self, node: Self::Node) -> Option<&str>;

    /// Replace the text payload of a text node
    fn set_text(&mut self, node: Self::Node, text: String);

    /// Depth-first, document-order walk over the descendants of `root`
    /// (excluding `root`), yielding only text nodes that `filter` accepts.
    /// A `Reject` on any node prunes its subtree.
    fn walk_text_nodes(
        &self,
        root: Self::Node,
        filter: &mut dyn FnMut(Self::Node) -> WalkFilter,
    ) -> Vec<Self::Node>;

    /// Subscribe to mutations of `target` (and its subtree, per `options`)
    fn observe(
        &mut self,
        target: Self::Node,
        options: ObserveOptions,
        callback: MutationCallback<Self>,
    ) -> Subscription;
}
