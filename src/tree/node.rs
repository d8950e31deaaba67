//! Node types for reference trees
//!
//! Nodes live in an arena owned by [`RefTree`]. A node's children are the
//! ordered list of arena indices it owns; its parent is a plain index back into
//! the same arena, so the hierarchy never holds two owning links to one node.

use crate::tree::path;
use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Index of a node inside its [`RefTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root of every tree
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Object type of a listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// File content, never has children
    Blob,
    /// Directory, owns children
    Tree,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Blob => "blob",
            EntryKind::Tree => "tree",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single blob or tree in the hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) kind: EntryKind,
    pub(crate) sha: String,
    /// Basename; the reference name for the root
    pub(crate) name: String,
    /// Octal mode from the listing, absent for the root
    pub(crate) mode: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

/// Snapshot of one reference as a linked hierarchy
#[derive(Debug, Clone)]
pub struct RefTree {
    reference: String,
    nodes: Vec<Node>,
}

impl RefTree {
    /// Create a tree holding only the root for `reference`
    pub(crate) fn new(reference: impl Into<String>, sha: impl Into<String>) -> Self {
        let reference = reference.into();
        let root = Node {
            kind: EntryKind::Tree,
            sha: sha.into(),
            name: reference.clone(),
            mode: None,
            parent: None,
            children: Vec::new(),
        };
        Self {
            reference,
            nodes: vec![root],
        }
    }

    /// Append a node under `parent`.
    ///
    /// Callers must have checked that `parent` is a tree.
    pub(crate) fn attach(
        &mut self,
        parent: NodeId,
        kind: EntryKind,
        name: String,
        sha: String,
        mode: String,
    ) -> NodeId {
        debug_assert_eq!(self.nodes[parent.0].kind, EntryKind::Tree);
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            sha,
            name,
            mode: Some(mode),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Name of the reference this tree was built from
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Root content hash
    pub fn sha(&self) -> &str {
        &self.nodes[NodeId::ROOT.0].sha
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: NodeId::ROOT,
        }
    }

    /// Handle for `id`, if it belongs to this tree
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    /// Resolve a relative path from the root
    pub fn lookup(&self, path: &str) -> Option<NodeRef<'_>> {
        self.root().lookup(path)
    }

    /// Pre-order traversal from the root
    pub fn traverse(&self) -> Traverse<'_> {
        self.root().traverse()
    }

    /// Blob nodes in pre-order
    pub fn blobs(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.traverse().filter(NodeRef::is_blob)
    }

    /// Number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the root has no children
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Nested JSON rendering of the whole hierarchy
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for RefTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("RefTree", 3)?;
        state.serialize_field("reference", &self.reference)?;
        state.serialize_field("sha", self.sha())?;
        state.serialize_field("root", &self.root())?;
        state.end()
    }
}

/// Borrowed handle to one node of a [`RefTree`]
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a RefTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a Node {
        &self.tree.nodes[self.id.0]
    }

    fn at(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef {
            tree: self.tree,
            id,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn sha(&self) -> &'a str {
        &self.node().sha
    }

    pub fn name(&self) -> &'a str {
        &self.node().name
    }

    pub fn kind(&self) -> EntryKind {
        self.node().kind
    }

    pub fn mode(&self) -> Option<&'a str> {
        self.node().mode.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    pub fn is_blob(&self) -> bool {
        self.kind() == EntryKind::Blob
    }

    pub fn is_tree(&self) -> bool {
        self.kind() == EntryKind::Tree
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| self.at(id))
    }

    /// Children in listing order
    pub fn children(&self) -> impl ExactSizeIterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// Names from the root's first child down to this node
    fn lineage(&self) -> Vec<&'a str> {
        let mut names = Vec::new();
        let mut current = *self;
        while let Some(parent) = current.parent() {
            names.push(current.name());
            current = parent;
        }
        names.reverse();
        names
    }

    /// Path from the root, `/` separated; empty for the root itself
    pub fn relative_path(&self) -> String {
        path::join(self.lineage())
    }

    /// Path anchored at the repository checkout `root_path`
    ///
    /// The root resolves to exactly `root_path`.
    pub fn absolute_path(&self, root_path: &Path) -> PathBuf {
        self.lineage()
            .into_iter()
            .fold(root_path.to_path_buf(), |acc, name| acc.join(name))
    }

    /// Resolve a `/` separated path relative to this node
    ///
    /// Each segment selects the first child with that name. Returns `None` as
    /// soon as a segment has no match.
    pub fn lookup(&self, path: &str) -> Option<NodeRef<'a>> {
        path::segments(path).try_fold(*self, |current, segment| {
            current.children().find(|child| child.name() == segment)
        })
    }

    /// Lazy pre-order traversal starting at this node
    pub fn traverse(&self) -> Traverse<'a> {
        Traverse {
            tree: self.tree,
            stack: vec![self.id],
        }
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("name", &self.name())
            .field("sha", &self.sha())
            .finish()
    }
}

impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let field_count = match self.kind() {
            EntryKind::Blob => 5,
            EntryKind::Tree => 6,
        };
        let mut state = serializer.serialize_struct("Node", field_count)?;
        state.serialize_field("sha", self.sha())?;
        state.serialize_field("name", self.name())?;
        state.serialize_field("type", &self.kind())?;
        state.serialize_field("path", &self.relative_path())?;
        state.serialize_field("mode", &self.mode())?;
        match self.kind() {
            EntryKind::Blob => {}
            EntryKind::Tree => state.serialize_field("children", &Children(*self))?,
        }
        state.end()
    }
}

/// Serializes the children of a tree node as a sequence
struct Children<'a>(NodeRef<'a>);

impl Serialize for Children<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let children = self.0.children();
        let mut seq = serializer.serialize_seq(Some(children.len()))?;
        for child in children {
            seq.serialize_element(&child)?;
        }
        seq.end()
    }
}

/// Pre-order iterator over a subtree
///
/// Holds an explicit stack of pending nodes, so deep trees never recurse.
pub struct Traverse<'a> {
    tree: &'a RefTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id.0];
        match node.kind {
            EntryKind::Blob => {}
            EntryKind::Tree => self.stack.extend(node.children.iter().rev().copied()),
        }
        Some(NodeRef {
            tree: self.tree,
            id,
        })
    }
}
