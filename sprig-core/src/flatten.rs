//! Flattening a suite tree into an ordered execution plan.

use crate::array::DynArray;
use crate::error::Error;
use crate::trace_categories;
use crate::tree::{Node, NodeId, NodeKind, SuiteTree};

/// One element of the flattened execution plan.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// Nesting depth, used for indentation only.
    pub level: usize,
    /// Node this step executes.
    pub id: NodeId,
    /// Kind of the node.
    pub kind: NodeKind,
    /// Display name of the node.
    pub name: String,
}

impl Step {
    /// Returns `true` if this step runs a test body.
    pub fn is_test(&self) -> bool {
        self.kind == NodeKind::Test
    }

    /// Returns `true` if this step only marks the start of a group.
    pub fn is_group(&self) -> bool {
        self.kind == NodeKind::Group
    }
}

/// Returns the number of test steps in a plan; groups and hooks are not counted.
pub fn test_count(steps: &[Step]) -> usize {
    steps.iter().filter(|step| step.is_test()).count()
}

/// Flattens the whole tree, starting at its root.
pub fn flatten<B>(tree: &SuiteTree<B>) -> DynArray<Step> {
    let mut flattener = Flattener::new(tree);
    flattener.visit(&tree[tree.root()], 0);
    flattener.finish()
}

/// Flattens the subtree rooted at `start`.
///
/// Hooks registered on ancestors of `start` are not applied; the subtree is treated
/// as if it were the whole suite.
pub fn flatten_from<B>(tree: &SuiteTree<B>, start: NodeId) -> Result<DynArray<Step>, Error> {
    let node = tree.get(start)?;
    let mut flattener = Flattener::new(tree);
    flattener.visit(node, 0);
    Ok(flattener.finish())
}

struct Flattener<'t, B> {
    tree: &'t SuiteTree<B>,
    steps: DynArray<Step>,
    before_each_lists: DynArray<&'t [NodeId]>,
    after_each_lists: DynArray<&'t [NodeId]>,
}

impl<'t, B> Flattener<'t, B> {
    fn new(tree: &'t SuiteTree<B>) -> Self {
        Self {
            tree,
            steps: DynArray::new(),
            before_each_lists: DynArray::new(),
            after_each_lists: DynArray::new(),
        }
    }

    fn finish(self) -> DynArray<Step> {
        tracing::debug!(target: trace_categories::FLATTEN, "flattened into {} steps", self.steps.len());
        self.steps
    }

    fn visit(&mut self, node: &'t Node<B>, level: usize) {
        match (node.kind(), node.lists()) {
            (NodeKind::Group, Some(lists)) if !node.is_leaf() => {
                self.emit(node, level);
                self.emit_all(&lists.before, level + 1);

                self.before_each_lists.push(&lists.before_each);
                self.after_each_lists.push(&lists.after_each);

                for child in &lists.children {
                    let tree = self.tree;
                    self.visit(&tree[*child], level + 1);
                }

                self.before_each_lists.pop();
                self.after_each_lists.pop();

                self.emit_all(&lists.after, level + 1);
            }
            (NodeKind::Skipped, _) => {
                tracing::debug!(target: trace_categories::FLATTEN, "skipping '{}'", node.name());
            }
            _ => {
                // Outermost `before_each` list first...
                for list_index in 0..self.before_each_lists.len() {
                    let list = self.before_each_lists[list_index];
                    self.emit_all(list, level);
                }

                // A group without children is planned as an empty test.
                let kind = match node.kind() {
                    NodeKind::Group => NodeKind::Test,
                    kind => kind,
                };
                self.emit_as(node, kind, level);

                // ...but innermost `after_each` list first.
                for list_index in (0..self.after_each_lists.len()).rev() {
                    let list = self.after_each_lists[list_index];
                    self.emit_all(list, level);
                }
            }
        }
    }

    fn emit_all(&mut self, ids: &[NodeId], level: usize) {
        let tree = self.tree;
        for id in ids {
            self.emit(&tree[*id], level);
        }
    }

    fn emit(&mut self, node: &Node<B>, level: usize) {
        self.emit_as(node, node.kind(), level);
    }

    fn emit_as(&mut self, node: &Node<B>, kind: NodeKind, level: usize) {
        self.steps.push(Step {
            level,
            id: node.id(),
            kind,
            name: node.name().to_owned(),
        });
    }
}
