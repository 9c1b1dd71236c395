//! Suite tree model and the builder that assembles it from declarations.

use crate::array::DynArray;
use crate::error::{Error, NodeShape};
use crate::trace_categories;

/// Identity of a node, assigned in discovery preorder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

impl NodeId {
    /// Returns a node id for the given preorder index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the preorder index of this id.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of a node in a suite tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// A named container of hooks and children.
    Group,
    /// A test whose body performs assertions.
    Test,
    /// Runs once before a group's children.
    Before,
    /// Runs once after a group's children.
    After,
    /// Runs before every test nested in a group.
    BeforeEach,
    /// Runs after every test nested in a group.
    AfterEach,
    /// A test that is registered but never executed.
    Skipped,
}

impl NodeKind {
    /// Returns `true` for the four hook kinds.
    pub const fn is_hook(self) -> bool {
        matches!(
            self,
            Self::Before | Self::After | Self::BeforeEach | Self::AfterEach
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Group => write!(f, "group"),
            Self::Test => write!(f, "test"),
            Self::Before => write!(f, "before"),
            Self::After => write!(f, "after"),
            Self::BeforeEach => write!(f, "before each"),
            Self::AfterEach => write!(f, "after each"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Ordered hook and child lists owned by a group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupLists {
    /// Hooks run once before the group's children.
    pub before: DynArray<NodeId>,
    /// Hooks run once after the group's children.
    pub after: DynArray<NodeId>,
    /// Hooks run before every nested test.
    pub before_each: DynArray<NodeId>,
    /// Hooks run after every nested test.
    pub after_each: DynArray<NodeId>,
    /// Nested groups and tests, in registration order.
    pub children: DynArray<NodeId>,
}

impl GroupLists {
    fn list_for(&mut self, kind: NodeKind) -> &mut DynArray<NodeId> {
        match kind {
            NodeKind::Before => &mut self.before,
            NodeKind::After => &mut self.after,
            NodeKind::BeforeEach => &mut self.before_each,
            NodeKind::AfterEach => &mut self.after_each,
            NodeKind::Group | NodeKind::Test | NodeKind::Skipped => &mut self.children,
        }
    }
}

/// A node in a suite tree, carrying an optional body of type `B`.
#[derive(Debug)]
pub struct Node<B> {
    id: NodeId,
    next_id: NodeId,
    name: String,
    kind: NodeKind,
    lists: Option<GroupLists>,
    body: Option<B>,
}

impl<B> Node<B> {
    fn new(id: NodeId, kind: NodeKind, name: String, body: Option<B>) -> Self {
        let lists = (kind == NodeKind::Group).then(GroupLists::default);
        Self {
            id,
            next_id: NodeId(id.0 + 1),
            name,
            kind,
            lists,
            body,
        }
    }

    /// Returns the node's id.
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the first id that does not belong to this node's subtree.
    pub const fn next_id(&self) -> NodeId {
        self.next_id
    }

    /// Returns the node's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the node's kind.
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns the node's kind and name.
    pub fn shape(&self) -> NodeShape {
        NodeShape::new(self.kind, self.name.as_str())
    }

    /// Returns the hook and child lists, if this node is a group.
    pub const fn lists(&self) -> Option<&GroupLists> {
        self.lists.as_ref()
    }

    /// Returns the node's children; empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        self.lists.as_ref().map_or(&[], |lists| lists.children.as_slice())
    }

    /// Returns `true` if the node has no children. A childless group is a
    /// leaf, and is planned and run as an empty test.
    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Returns `true` if `id` lies in this node's `[id, next_id)` range.
    pub fn contains(&self, id: NodeId) -> bool {
        (self.id..self.next_id).contains(&id)
    }

    /// Returns the body bound to this node, if any.
    pub const fn body(&self) -> Option<&B> {
        self.body.as_ref()
    }
}

/// A suite tree: nodes stored in preorder, so a node's id is its index.
#[derive(Debug)]
pub struct SuiteTree<B> {
    nodes: DynArray<Node<B>>,
}

impl<B> SuiteTree<B> {
    /// Returns the id of the root group.
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Returns the node with the given id, if it exists.
    pub fn node(&self, id: NodeId) -> Option<&Node<B>> {
        self.nodes.get(id.0)
    }

    /// Returns the node with the given id, or an error if it does not exist.
    pub fn get(&self, id: NodeId) -> Result<&Node<B>, Error> {
        self.node(id).ok_or(Error::UnknownNode(id))
    }

    /// Returns a mutable reference to the body bound to the given node.
    pub fn body_mut(&mut self, id: NodeId) -> Option<&mut B> {
        self.nodes.get_mut(id.0).and_then(|node| node.body.as_mut())
    }

    /// Returns the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree has no nodes. A finished tree always has its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in preorder.
    pub fn iter(&self) -> impl Iterator<Item = &Node<B>> {
        self.nodes.iter()
    }

    /// Checks that another tree has the same ids, ranges, names and kinds as this one.
    ///
    /// # Arguments
    ///
    /// * `other` - The tree produced by another pass over the same suite definition.
    pub fn verify_same_shape<O>(&self, other: &SuiteTree<O>) -> Result<(), Error> {
        for (index, ours) in self.nodes.iter().enumerate() {
            let Some(theirs) = other.nodes.get(index) else {
                return Err(Error::MissingNode {
                    id: ours.id,
                    expected: ours.shape(),
                });
            };

            if ours.kind != theirs.kind || ours.name != theirs.name {
                return Err(Error::NonDeterministic {
                    id: ours.id,
                    expected: ours.shape(),
                    found: theirs.shape(),
                });
            }

            if ours.next_id != theirs.next_id {
                return Err(Error::RangeMismatch {
                    group: ours.id,
                    expected: ours.next_id,
                    found: theirs.next_id,
                });
            }
        }

        if let Some(extra) = other.nodes.get(self.nodes.len()) {
            return Err(Error::UnexpectedNode {
                id: extra.id,
                found: extra.shape(),
            });
        }

        Ok(())
    }
}

impl<B> std::ops::Index<NodeId> for SuiteTree<B> {
    type Output = Node<B>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

/// Assembles a [`SuiteTree`] from a sequence of declarations.
///
/// The builder keeps a stack of open groups; new nodes attach to the innermost
/// one. Ids are handed out sequentially, so they follow declaration preorder.
#[derive(Debug)]
pub struct TreeBuilder<B> {
    nodes: DynArray<Node<B>>,
    open: DynArray<NodeId>,
}

impl<B> TreeBuilder<B> {
    /// Creates a builder whose root group has the given name.
    pub fn new(root_name: impl Into<String>) -> Self {
        let root = Node::new(NodeId(0), NodeKind::Group, root_name.into(), None);
        let mut open = DynArray::new();
        open.push(root.id);
        let mut nodes = DynArray::new();
        nodes.push(root);

        Self { nodes, open }
    }

    /// Returns the id the next declared node will receive.
    pub fn next_id(&self) -> NodeId {
        NodeId(self.nodes.len())
    }

    /// Returns the innermost open group.
    pub fn current_group(&self) -> Option<NodeId> {
        self.open.last().copied()
    }

    /// Returns the number of open groups, including the root.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Declares a group under the innermost open group and opens it.
    pub fn open_group(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.attach(NodeKind::Group, name.into(), None);
        self.open.push(id);
        id
    }

    /// Closes the innermost open group, recording the end of its id range.
    pub fn close_group(&mut self) -> Result<NodeId, Error> {
        // The root stays open until `finish`.
        if self.open.len() <= 1 {
            return Err(Error::NoOpenGroup);
        }

        let id = self.open.pop().ok_or(Error::NoOpenGroup)?;
        self.seal(id);
        Ok(id)
    }

    /// Declares a test, hook or skipped test under the innermost open group.
    ///
    /// # Arguments
    ///
    /// * `kind` - The kind of leaf; must not be [`NodeKind::Group`].
    /// * `name` - Display name of the leaf.
    /// * `body` - Body to bind to the node, if the caller stores bodies.
    pub fn add_leaf(
        &mut self,
        kind: NodeKind,
        name: impl Into<String>,
        body: Option<B>,
    ) -> Result<NodeId, Error> {
        let name = name.into();
        if kind == NodeKind::Group {
            return Err(Error::GroupAsLeaf(name));
        }

        Ok(self.attach(kind, name, body))
    }

    /// Closes the root and returns the finished tree.
    pub fn finish(mut self) -> Result<SuiteTree<B>, Error> {
        if self.open.len() != 1 {
            return Err(Error::UnbalancedGroups(self.open.len().saturating_sub(1)));
        }

        let root = self.open.pop().ok_or(Error::NoOpenGroup)?;
        self.seal(root);

        tracing::debug!(target: trace_categories::DISCOVERY, "discovered {} nodes", self.nodes.len());

        Ok(SuiteTree { nodes: self.nodes })
    }

    fn attach(&mut self, kind: NodeKind, name: String, body: Option<B>) -> NodeId {
        let id = self.next_id();

        tracing::debug!(target: trace_categories::DISCOVERY, "declaring {kind} '{name}' as {id}");

        if let Some(parent) = self.open.last().copied() {
            if let Some(lists) = self.nodes[parent.0].lists.as_mut() {
                lists.list_for(kind).push(id);
            }
        }

        self.nodes.push(Node::new(id, kind, name, body));
        id
    }

    fn seal(&mut self, id: NodeId) {
        let next_id = self.next_id();
        self.nodes[id.0].next_id = next_id;
    }
}
