//! Discovery: running a suite definition once to record its tree.

use crate::error::Error;
use crate::suite::{Body, Declarations, Suite};
use crate::tree::{NodeKind, SuiteTree, TreeBuilder};

/// Records declarations into a tree, binding each body to its node.
pub struct Discovery<'a, C> {
    builder: TreeBuilder<Body<'a, C>>,
    error: Option<Error>,
}

impl<'a, C> Discovery<'a, C> {
    /// Starts discovery of a suite with the given root name.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            builder: TreeBuilder::new(root_name),
            error: None,
        }
    }

    /// Returns the recorded tree, or the first error met while recording.
    pub fn finish(self) -> Result<SuiteTree<Body<'a, C>>, Error> {
        match self.error {
            Some(err) => Err(err),
            None => self.builder.finish(),
        }
    }

    fn record(&mut self, result: Result<(), Error>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }
}

impl<'a, C> Declarations<'a, C> for Discovery<'a, C> {
    fn enter_group(&mut self, name: String) -> bool {
        self.builder.open_group(name);
        true
    }

    fn leave_group(&mut self) {
        let result = self.builder.close_group().map(|_| ());
        self.record(result);
    }

    fn declare(&mut self, kind: NodeKind, name: String, body: Body<'a, C>) {
        // Skipped tests keep their id but never need a body.
        let body = (kind != NodeKind::Skipped).then_some(body);
        let result = self.builder.add_leaf(kind, name, body).map(|_| ());
        self.record(result);
    }
}

/// Runs a suite definition once and returns the tree it declares.
///
/// # Arguments
///
/// * `root_name` - Name of the root group (the suite name).
/// * `definition` - The suite definition.
pub fn discover<'a, C>(
    root_name: impl Into<String>,
    definition: impl FnOnce(&mut Suite<'_, 'a, C>),
) -> Result<SuiteTree<Body<'a, C>>, Error> {
    let mut discovery = Discovery::new(root_name);
    definition(&mut Suite::new(&mut discovery));
    discovery.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeId;
    use pretty_assertions::assert_eq;

    fn definition(s: &mut Suite<'_, '_, Vec<&'static str>>) {
        s.before(|log| {
            log.push("before");
            Ok(())
        });
        s.describe("group", |s| {
            s.it("first", |log| {
                log.push("first");
                Ok(())
            });
            s.xit("pending", |_| Ok(()));
        });
        s.it("second", |log| {
            log.push("second");
            Ok(())
        });
    }

    #[test]
    fn records_every_declaration_in_preorder() -> anyhow::Result<()> {
        let tree = discover("suite", definition)?;

        let shapes: Vec<_> = tree
            .iter()
            .map(|node| (node.id().index(), node.kind(), node.name().to_owned()))
            .collect();

        assert_eq!(
            shapes,
            [
                (0, NodeKind::Group, "suite".to_owned()),
                (1, NodeKind::Before, "before".to_owned()),
                (2, NodeKind::Group, "group".to_owned()),
                (3, NodeKind::Test, "first".to_owned()),
                (4, NodeKind::Skipped, "pending".to_owned()),
                (5, NodeKind::Test, "second".to_owned()),
            ]
        );
        assert_eq!(tree[NodeId::new(2)].next_id(), NodeId::new(5));

        Ok(())
    }

    #[test]
    fn bodies_are_stored_but_not_run() -> anyhow::Result<()> {
        let mut tree = discover("suite", definition)?;
        let mut log = vec![];

        if let Some(body) = tree.body_mut(NodeId::new(3)) {
            body(&mut log)?;
        }

        assert_eq!(log, ["first"]);
        assert!(tree[NodeId::new(4)].body().is_none());

        Ok(())
    }

    #[test]
    fn repeated_discovery_is_deterministic() -> anyhow::Result<()> {
        let first = discover("suite", definition)?;
        let second = discover("suite", definition)?;

        first.verify_same_shape(&second)?;
        Ok(())
    }

    fn single_test(s: &mut Suite<'_, '_, ()>, name: &str) {
        s.it(name, |_| Ok(()));
    }

    #[test]
    fn shape_changes_between_passes_are_detected() -> anyhow::Result<()> {
        let first = discover("suite", |s| single_test(s, "test 1"))?;
        let second = discover("suite", |s| single_test(s, "test 2"))?;

        let err = first.verify_same_shape(&second).unwrap_err();
        assert!(err.is_non_deterministic());

        Ok(())
    }
}
