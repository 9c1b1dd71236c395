//! Runner for sprig suites.
//!
//! This crate takes a suite definition, discovers its tree, executes the flattened
//! plan and reports each step either as indented human-readable text or as TAP.
//!
//! # Execution strategies
//!
//! 1. **Stored** (default): the definition runs once; each step invokes the body
//!    bound to its node during discovery.
//!
//! 2. **Replay**: the definition re-runs once per step, entering only the groups
//!    that contain the step. A definition that declares a different shape on a
//!    later pass aborts the run.
//!
//! # Example
//!
//! A suite binary built with `harness = false`:
//!
//! ```no_run
//! use sprig_core::check;
//!
//! fn main() -> std::process::ExitCode {
//!     sprig_harness::main_with("strings", |s| {
//!         s.it("concatenates", |_: &mut ()| {
//!             check!(format!("{}{}", "a", "b") == "ab");
//!             Ok(())
//!         });
//!     })
//! }
//! ```

mod config;
mod events;
mod reporting;
mod runner;

use std::io::{IsTerminal, Write};
use std::process::ExitCode;

use clap::Parser;
use sprig_core::Suite;

pub use config::{
    ExecutionStrategy, HarnessOptions, ProcessEnvironment, RunConfig, RunEnvironment, USE_TAP_VAR,
};
pub use events::{TraceEvent, compose_filter, init_tracing};
pub use reporting::{Reporter, RunSummary};
pub use runner::SuiteRunner;

/// Exit code reported when the engine itself fails.
pub const ENGINE_FAILURE_EXIT_CODE: u8 = 2;

/// Runs a suite with a default-constructed fixture context.
///
/// # Arguments
///
/// * `name` - Name of the suite.
/// * `config` - Run configuration.
/// * `writer` - Destination for the report.
/// * `definition` - The suite definition.
pub fn run_suite<'a, C: Default, W: Write>(
    name: &str,
    config: &RunConfig,
    writer: W,
    definition: impl Fn(&mut Suite<'_, 'a, C>),
) -> anyhow::Result<RunSummary> {
    let mut context = C::default();
    SuiteRunner::new(config.clone()).run(name, &mut context, writer, definition)
}

/// Entry point for suite binaries: parses the command line, runs the suite
/// on stdout and maps the result to an exit code.
///
/// Returns `0` if everything passed, `1` if any test or hook failed, and `2`
/// if the engine failed (e.g. the definition is non-deterministic).
pub fn main_with<'a, C: Default>(
    name: &str,
    definition: impl Fn(&mut Suite<'_, 'a, C>),
) -> ExitCode {
    let options = HarnessOptions::parse();
    init_tracing(&options.trace);

    let stdout = std::io::stdout();
    let config = RunConfig::from_options(&options, &ProcessEnvironment, stdout.is_terminal());
    colored::control::set_override(config.use_color);

    let result = run_suite(name, &config, stdout.lock(), definition);
    ExitCode::from(exit_status(&result))
}

/// Maps the result of a run to the process exit status, logging engine errors.
fn exit_status(result: &anyhow::Result<RunSummary>) -> u8 {
    match result {
        Ok(summary) => summary.exit_code(),
        Err(err) => {
            tracing::error!("error: {err:#}");
            ENGINE_FAILURE_EXIT_CODE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn passing_runs_exit_with_zero() {
        let result = Ok(RunSummary { tests_run: 3, failed: 0 });
        assert_eq!(exit_status(&result), 0);
    }

    #[test]
    fn failing_runs_exit_with_one() {
        let result = Ok(RunSummary { tests_run: 3, failed: 2 });
        assert_eq!(exit_status(&result), 1);
    }

    #[test]
    fn engine_errors_exit_with_two() {
        let result = Err(anyhow::Error::from(sprig_core::Error::NoOpenGroup));
        assert_eq!(exit_status(&result), ENGINE_FAILURE_EXIT_CODE);
        assert_eq!(ENGINE_FAILURE_EXIT_CODE, 2);
    }

    #[test]
    fn engine_errors_from_a_run_exit_with_two() {
        let config = RunConfig::new().with_strategy(ExecutionStrategy::Replay);
        let passes = std::cell::Cell::new(0);

        let result = run_suite("unstable", &config, std::io::sink(), |s| {
            passes.set(passes.get() + 1);
            s.it(format!("pass {}", passes.get()), |_: &mut ()| Ok(()));
        });

        assert_eq!(exit_status(&result), ENGINE_FAILURE_EXIT_CODE);
    }
}
