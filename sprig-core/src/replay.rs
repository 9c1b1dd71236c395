//! Range-directed replay: re-running a suite definition so that exactly one body executes.
//!
//! Each pass walks the definition with an id cursor that mirrors the ids handed
//! out during discovery. Groups whose `[id, next_id)` range does not contain the
//! target are skipped wholesale (their bodies are never invoked) by jumping the
//! cursor to `next_id`. Every node met along the way is compared against the
//! recorded tree; any disagreement aborts the pass as non-deterministic.

use crate::array::DynArray;
use crate::error::{Error, NodeShape};
use crate::outcome::Outcome;
use crate::suite::{Body, Declarations, Suite};
use crate::trace_categories;
use crate::tree::{Node, NodeId, NodeKind, SuiteTree};

/// A single replay pass targeting one node.
pub struct Replay<'t, 'c, B, C> {
    recorded: &'t SuiteTree<B>,
    context: &'c mut C,
    target: NodeId,
    cursor: NodeId,
    open: DynArray<NodeId>,
    outcome: Option<Outcome>,
    error: Option<Error>,
}

impl<'t, 'c, B, C> Replay<'t, 'c, B, C> {
    /// Prepares a pass over `recorded` that executes the body of `target`.
    ///
    /// # Arguments
    ///
    /// * `recorded` - The tree recorded during discovery.
    /// * `target` - The hook or test whose body should execute.
    /// * `context` - Fixture context handed to the executed body.
    pub fn new(
        recorded: &'t SuiteTree<B>,
        target: NodeId,
        context: &'c mut C,
    ) -> Result<Self, Error> {
        match recorded.get(target)?.kind() {
            NodeKind::Group | NodeKind::Skipped => return Err(Error::NotExecutable(target)),
            _ => (),
        }

        // The root group is implied by the suite itself and always entered.
        let root = recorded.root();
        let mut open = DynArray::new();
        open.push(root);

        Ok(Self {
            recorded,
            context,
            target,
            cursor: NodeId::new(root.index() + 1),
            open,
            outcome: None,
            error: None,
        })
    }

    /// Completes the pass, returning the executed body's outcome.
    pub fn finish(mut self) -> Result<Outcome, Error> {
        if self.error.is_none() {
            let root = self.recorded.root();
            self.check_range_end(root);
        }

        if let Some(err) = self.error {
            return Err(err);
        }

        self.outcome.ok_or(Error::TargetNotReached(self.target))
    }

    /// Consumes the node at the cursor after checking it against the recording.
    fn expect(&mut self, kind: NodeKind, name: String) -> Option<&'t Node<B>> {
        if self.error.is_some() {
            return None;
        }

        let id = self.cursor;
        let found = NodeShape::new(kind, name);

        let Some(node) = self.recorded.node(id) else {
            self.fail(Error::UnexpectedNode { id, found });
            return None;
        };

        if node.kind() != found.kind || node.name() != found.name {
            self.fail(Error::NonDeterministic {
                id,
                expected: node.shape(),
                found,
            });
            return None;
        }

        Some(node)
    }

    fn check_range_end(&mut self, group: NodeId) {
        let Some(node) = self.recorded.node(group) else {
            self.fail(Error::UnknownNode(group));
            return;
        };

        if node.next_id() != self.cursor {
            self.fail(Error::RangeMismatch {
                group,
                expected: node.next_id(),
                found: self.cursor,
            });
        }
    }

    fn fail(&mut self, err: Error) {
        tracing::debug!(target: trace_categories::REPLAY, "aborting replay: {err}");
        self.error.get_or_insert(err);
    }
}

impl<'a, B, C> Declarations<'a, C> for Replay<'_, '_, B, C> {
    fn enter_group(&mut self, name: String) -> bool {
        let Some(node) = self.expect(NodeKind::Group, name) else {
            return false;
        };

        if node.contains(self.target) {
            self.cursor = NodeId::new(node.id().index() + 1);
            self.open.push(node.id());
            true
        } else {
            tracing::debug!(target: trace_categories::REPLAY, "skipping group {} ({} .. {})", node.name(), node.id(), node.next_id());
            self.cursor = node.next_id();
            false
        }
    }

    fn leave_group(&mut self) {
        let Some(group) = self.open.pop() else {
            self.fail(Error::NoOpenGroup);
            return;
        };

        if self.error.is_none() {
            self.check_range_end(group);
        }
    }

    fn declare(&mut self, kind: NodeKind, name: String, mut body: Body<'a, C>) {
        let Some(node) = self.expect(kind, name) else {
            return;
        };

        self.cursor = node.next_id();

        if node.id() == self.target {
            tracing::debug!(target: trace_categories::REPLAY, "executing {} '{}'", node.kind(), node.name());
            self.outcome = Some(body(self.context));
        }
    }
}

/// Re-runs `definition` so that only the body of `target` executes.
///
/// # Arguments
///
/// * `recorded` - The tree recorded by discovering the same definition.
/// * `target` - The hook or test whose body should execute.
/// * `context` - Fixture context handed to the executed body.
/// * `definition` - The suite definition.
pub fn replay<'a, B, C>(
    recorded: &SuiteTree<B>,
    target: NodeId,
    context: &mut C,
    definition: impl FnOnce(&mut Suite<'_, 'a, C>),
) -> Result<Outcome, Error> {
    let mut pass = Replay::new(recorded, target, context)?;
    definition(&mut Suite::new(&mut pass));
    pass.finish()
}
