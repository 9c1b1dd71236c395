//! Suite runner implementation.

use std::io::Write;

use anyhow::Result;
use sprig_core::{Error, NodeKind, Outcome, Step, Suite, discover, flatten, trace_categories};

use crate::config::{ExecutionStrategy, RunConfig};
use crate::reporting::{Reporter, RunSummary};

/// Discovers, flattens and executes suites.
pub struct SuiteRunner {
    config: RunConfig,
}

impl SuiteRunner {
    /// Creates a new runner with the given configuration.
    pub const fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Returns the runner's configuration.
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs every step of the suite declared by `definition`, reporting to `writer`.
    ///
    /// Assertion failures are reported and counted; engine errors (a malformed
    /// tree, or a definition that declares a different shape on replay) abort
    /// the run before the summary is written.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the suite; becomes the root group.
    /// * `context` - Fixture context handed to every hook and test body.
    /// * `writer` - Destination for the report.
    /// * `definition` - The suite definition.
    pub fn run<'a, C, W: Write>(
        &self,
        name: &str,
        context: &mut C,
        writer: W,
        definition: impl Fn(&mut Suite<'_, 'a, C>),
    ) -> Result<RunSummary> {
        let mut tree = discover(name, &definition)?;
        let plan = flatten(&tree);

        tracing::debug!(target: trace_categories::RUN,
            "suite '{name}': {} nodes, {} steps, strategy {:?}",
            tree.len(),
            plan.len(),
            self.config.strategy
        );

        let mut reporter = Reporter::new(writer, &self.config);
        reporter.begin(&plan)?;

        for step in &plan {
            if step.is_group() {
                reporter.group(step)?;
                continue;
            }

            tracing::debug!(target: trace_categories::RUN,
                "running {} '{}' ({})", step.kind, step.name, step.id);

            let outcome = match self.config.strategy {
                // A childless group is planned as a test with nothing to run.
                _ if tree.get(step.id)?.kind() == NodeKind::Group => Ok(()),
                ExecutionStrategy::Stored => {
                    let body = tree
                        .body_mut(step.id)
                        .ok_or(Error::NotExecutable(step.id))?;
                    body(&mut *context)
                }
                ExecutionStrategy::Replay => {
                    sprig_core::replay(&tree, step.id, &mut *context, &definition)?
                }
            };

            log_outcome(step, &outcome);
            reporter.step(step, &outcome)?;
        }

        reporter.finish()
    }
}

fn log_outcome(step: &Step, outcome: &Outcome) {
    if let Err(failure) = outcome {
        tracing::debug!(target: trace_categories::RUN,
            "{} '{}' failed at {}", step.kind, step.name, failure.location());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_matches};
    use sprig_core::check;

    #[derive(Default)]
    struct Counter {
        value: u32,
        seen: Vec<u32>,
    }

    fn counting(s: &mut Suite<'_, '_, Counter>) {
        s.before_each(|c| {
            c.value += 1;
            Ok(())
        });

        s.describe("values", |s| {
            s.it("is one", |c| {
                c.seen.push(c.value);
                check!(c.value == 1);
                Ok(())
            });
            s.it("is three", |c| {
                c.seen.push(c.value);
                check!(c.value == 3, "value was {}", c.value);
                Ok(())
            });
        });
    }

    fn run_with(strategy: ExecutionStrategy) -> Result<(String, RunSummary, Vec<u32>)> {
        let runner = SuiteRunner::new(RunConfig::new().with_strategy(strategy));
        let mut counter = Counter::default();
        let mut out = vec![];

        let summary = runner.run("counter", &mut counter, &mut out, counting)?;
        Ok((String::from_utf8(out)?, summary, counter.seen))
    }

    #[test]
    fn fixture_state_is_shared_across_steps() -> Result<()> {
        let (output, summary, seen) = run_with(ExecutionStrategy::Stored)?;

        assert_eq!(seen, [1, 2]);
        assert_eq!(summary, RunSummary { tests_run: 2, failed: 1 });
        assert!(output.contains("    is three (FAIL)\n      Check failed: value was 2 ("));

        Ok(())
    }

    #[test]
    fn strategies_agree() -> Result<()> {
        let stored = run_with(ExecutionStrategy::Stored)?;
        let replayed = run_with(ExecutionStrategy::Replay)?;

        assert_eq!(stored, replayed);
        Ok(())
    }

    #[test]
    fn shape_changes_abort_a_replayed_run() {
        let runner = SuiteRunner::new(RunConfig::new().with_strategy(ExecutionStrategy::Replay));
        let passes = std::cell::Cell::new(0);
        let mut out = vec![];

        let result = runner.run("unstable", &mut (), &mut out, |s| {
            passes.set(passes.get() + 1);
            s.it(format!("pass {}", passes.get()), |_| Ok(()));
        });

        let err = result.unwrap_err();
        assert_matches!(
            err.downcast_ref::<Error>(),
            Some(Error::NonDeterministic { .. })
        );
    }
}
