//! Node tree for the Kotoba markup parser.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships.
//! A node's parent is a plain index into the same arena, so the back-reference
//! never owns anything and the tree is owned top-down by [`DomTree`].
//!
//! Every node additionally carries a [`NodeUid`]: a process-wide, monotonically
//! increasing identifier used for identity and debugging only.

/// Insertion-ordered attribute map.
pub mod attributes;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::ser::{Serialize, SerializeStruct, Serializer};

pub use attributes::{AttributeValue, AttributesMap};

/// A type-safe index into a [`DomTree`] arena.
///
/// Only meaningful for the tree that allocated it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Process-wide node identifier.
///
/// Allocated from an atomic counter, so documents may be parsed concurrently
/// on several threads without two nodes ever sharing a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeUid(u64);

static NEXT_UID: AtomicU64 = AtomicU64::new(1);

impl NodeUid {
    /// Allocate the next identifier. Values are never reused.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_UID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A single node stored in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// Identity of this node, unique across the process.
    pub uid: NodeUid,
    /// What kind of node this is.
    pub node_type: NodeType,
    /// The enclosing element. `None` for the root and for nodes that were
    /// never attached.
    pub parent: Option<NodeId>,
    /// Child nodes in document order.
    pub children: Vec<NodeId>,
}

/// The two kinds of node a document produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// A text leaf.
    Data(String),
    /// An element with a name, attributes and (possibly) children.
    Element(ElementData),
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Element name, case as written.
    pub tag_name: String,
    /// Attributes in declaration order.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data from a name and its attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>, attrs: AttributesMap) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs,
        }
    }

    /// Returns the element's `id` attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").and_then(AttributeValue::as_str)
    }

    /// Returns the class names from the `class` attribute, in order.
    #[must_use]
    pub fn classes(&self) -> Vec<&str> {
        self.attrs
            .get("class")
            .and_then(AttributeValue::as_str)
            .map(|list| list.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Arena-based node tree.
///
/// All nodes produced while building a document live here, including nodes
/// that ended up outside the root element. The root is the first element
/// that opened a scope; a document with no elements has no root.
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl DomTree {
    /// Create an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// The root element, if the document contained any element.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Record `id` as the root element.
    ///
    /// The root is assigned at most once; later calls are ignored and return
    /// `false`.
    pub fn set_root(&mut self, id: NodeId) -> bool {
        if self.root.is_some() {
            return false;
        }
        self.root = Some(id);
        true
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no node has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new, unattached node and return its ID.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            uid: NodeUid::next(),
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// A node's parent is assigned exactly once: returns `false` and leaves
    /// the tree untouched if `child` is already attached, if either ID is
    /// out of range, or if `parent` is not an element.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let attachable = parent != child
            && self.as_element(parent).is_some()
            && self.get(child).is_some_and(|n| n.parent.is_none());
        if !attachable {
            return false;
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        true
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over the descendants of a node, depth-first, children in
    /// document order. The node itself is not included.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Data(_) => None,
        })
    }

    /// Get the text if this node is a data node.
    #[must_use]
    pub fn as_data(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Data(text) => Some(text.as_str()),
            NodeType::Element(_) => None,
        })
    }

    /// Find the arena slot holding the node with the given process-wide ID.
    #[must_use]
    pub fn find_by_uid(&self, uid: NodeUid) -> Option<NodeId> {
        // Allocation order follows the counter, so the arena is sorted by uid.
        self.nodes
            .binary_search_by_key(&uid, |n| n.uid)
            .ok()
            .map(NodeId)
    }

    /// Concatenated text of every data node beneath `id`, in document order,
    /// separated by single spaces.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.as_data(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.as_data(d))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Find the first element named `tag` in the subtree rooted at `from`
    /// (inclusive), depth-first. Names compare ASCII case-insensitively.
    #[must_use]
    pub fn find_element(&self, from: NodeId, tag: &str) -> Option<NodeId> {
        std::iter::once(from)
            .chain(self.descendants(from))
            .find(|&id| {
                self.as_element(id)
                    .is_some_and(|e| e.tag_name.eq_ignore_ascii_case(tag))
            })
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Depth-first iterator over the descendants of a node.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Serializes the subtree rooted at one node.
struct SubtreeRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl Serialize for SubtreeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(node) = self.tree.get(self.id) else {
            return serializer.serialize_none();
        };
        match &node.node_type {
            NodeType::Data(text) => {
                let mut state = serializer.serialize_struct("DataNode", 3)?;
                state.serialize_field("type", "data")?;
                state.serialize_field("uid", &node.uid.get())?;
                state.serialize_field("text", text)?;
                state.end()
            }
            NodeType::Element(data) => {
                let children: Vec<SubtreeRef<'_>> = node
                    .children
                    .iter()
                    .map(|&id| SubtreeRef {
                        tree: self.tree,
                        id,
                    })
                    .collect();
                let mut state = serializer.serialize_struct("ElementNode", 5)?;
                state.serialize_field("type", "element")?;
                state.serialize_field("uid", &node.uid.get())?;
                state.serialize_field("name", &data.tag_name)?;
                state.serialize_field("attributes", &data.attrs)?;
                state.serialize_field("children", &children)?;
                state.end()
            }
        }
    }
}

/// Serializes the tree from its root; a tree without a root serializes as
/// `null`.
impl Serialize for DomTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.root {
            Some(id) => SubtreeRef { tree: self, id }.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}
