use crate::tree::{NodeId, NodeKind};

/// The kind and name of a node, as seen by one pass over a suite definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeShape {
    /// Kind of the node.
    pub kind: NodeKind,
    /// Display name of the node.
    pub name: String,
}

impl NodeShape {
    /// Returns a new shape.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for NodeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} '{}'", self.kind, self.name)
    }
}

/// Monolithic error type for the engine.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Two passes over the same suite definition declared different nodes at the same id.
    #[error("non-deterministic suite: node {id} was {expected} during discovery but {found} now")]
    NonDeterministic {
        /// Id at which the passes disagree.
        id: NodeId,
        /// Shape recorded during discovery.
        expected: NodeShape,
        /// Shape declared by the current pass.
        found: NodeShape,
    },

    /// A pass declared a node past the end of the recorded tree.
    #[error("non-deterministic suite: {found} at node {id} was never seen during discovery")]
    UnexpectedNode {
        /// Id the node would have been given.
        id: NodeId,
        /// Shape declared by the current pass.
        found: NodeShape,
    },

    /// A pass declared fewer nodes than were recorded during discovery.
    #[error("non-deterministic suite: {expected} at node {id} was not declared again")]
    MissingNode {
        /// Id of the node that went missing.
        id: NodeId,
        /// Shape recorded during discovery.
        expected: NodeShape,
    },

    /// A group's contents ended at a different id than recorded during discovery.
    #[error("non-deterministic suite: group {group} should end at node {expected} but ended at {found}")]
    RangeMismatch {
        /// The group whose range disagrees.
        group: NodeId,
        /// End of range recorded during discovery.
        expected: NodeId,
        /// End of range reached by the current pass.
        found: NodeId,
    },

    /// A replay pass finished without reaching its target node.
    #[error("non-deterministic suite: node {0} was never reached during replay")]
    TargetNotReached(NodeId),

    /// The given node is a group or skipped test and has no body to execute.
    #[error("node {0} has no body to execute")]
    NotExecutable(NodeId),

    /// A group was declared where only leaves are accepted.
    #[error("cannot declare a group as a leaf: '{0}'")]
    GroupAsLeaf(String),

    /// A group was closed while no group was open.
    #[error("no open group to close")]
    NoOpenGroup,

    /// The suite definition finished with groups still open.
    #[error("suite definition left {0} group(s) open")]
    UnbalancedGroups(usize),

    /// A reference was made to a node that does not exist.
    #[error("unknown node: {0}")]
    UnknownNode(NodeId),
}

impl Error {
    /// Returns `true` if the error means the suite definition is not deterministic.
    pub const fn is_non_deterministic(&self) -> bool {
        matches!(
            self,
            Self::NonDeterministic { .. }
                | Self::UnexpectedNode { .. }
                | Self::MissingNode { .. }
                | Self::RangeMismatch { .. }
                | Self::TargetNotReached(..)
        )
    }
}
