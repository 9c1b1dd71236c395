//! Reporting of step outcomes, in human-readable or TAP form.

use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use sprig_core::{Failure, Outcome, Step, test_count};

use crate::config::RunConfig;

const INDENT_WIDTH: usize = 2;

/// Counts accumulated over a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of tests executed.
    pub tests_run: usize,
    /// Number of failed tests and hooks.
    pub failed: usize,
}

impl RunSummary {
    /// Returns `true` if nothing failed.
    pub const fn succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Returns the process exit code for this run: `1` if anything failed, `0` otherwise.
    pub const fn exit_code(&self) -> u8 {
        if self.succeeded() { 0 } else { 1 }
    }
}

/// Writes step outcomes to an output stream.
pub struct Reporter<W: Write> {
    writer: W,
    use_color: bool,
    use_tap: bool,
    verbose: bool,
    summary: RunSummary,
}

impl<W: Write> Reporter<W> {
    /// Creates a reporter writing to `writer` in the format selected by `config`.
    pub fn new(writer: W, config: &RunConfig) -> Self {
        Self {
            writer,
            use_color: config.use_color,
            use_tap: config.use_tap,
            verbose: config.verbose,
            summary: RunSummary::default(),
        }
    }

    /// Writes the preamble for a run over `plan`.
    pub fn begin(&mut self, plan: &[Step]) -> Result<()> {
        if self.use_tap {
            writeln!(self.writer, "TAP version 13")?;
            writeln!(self.writer, "1..{}", test_count(plan))?;
        }

        Ok(())
    }

    /// Writes the header for a group step.
    pub fn group(&mut self, step: &Step) -> Result<()> {
        if !self.use_tap {
            writeln!(self.writer, "{}{}", indentation(step.level), step.name)?;
        }

        Ok(())
    }

    /// Records and writes the outcome of an executed test or hook step.
    pub fn step(&mut self, step: &Step, outcome: &Outcome) -> Result<()> {
        if step.is_test() {
            self.summary.tests_run += 1;
        }
        if outcome.is_err() {
            self.summary.failed += 1;
        }

        if self.use_tap {
            self.write_tap(step, outcome)
        } else {
            self.write_human(step, outcome)
        }
    }

    /// Writes the closing summary and returns the accumulated counts.
    pub fn finish(mut self) -> Result<RunSummary> {
        if !self.use_tap && !self.summary.succeeded() {
            let tests = self.summary.tests_run;
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "{}{} test{} run, {} failed.",
                indentation(1),
                tests,
                if tests == 1 { "" } else { "s" },
                self.summary.failed
            )?;
        }

        self.writer.flush()?;
        Ok(self.summary)
    }

    /// Returns the counts accumulated so far.
    pub const fn summary(&self) -> RunSummary {
        self.summary
    }

    fn write_human(&mut self, step: &Step, outcome: &Outcome) -> Result<()> {
        let prefix = indentation(step.level);

        match outcome {
            Ok(()) if step.is_test() || self.verbose => {
                writeln!(self.writer, "{prefix}{} ({})", step.name, self.ok_marker())?;
            }
            Ok(()) => (),
            Err(failure) => {
                writeln!(self.writer, "{prefix}{} ({})", step.name, self.fail_marker())?;
                let detail = indent::indent_all_by(
                    (step.level + 1) * INDENT_WIDTH,
                    describe_failure(failure),
                );
                writeln!(self.writer, "{}", detail.trim_end())?;
            }
        }

        Ok(())
    }

    fn write_tap(&mut self, step: &Step, outcome: &Outcome) -> Result<()> {
        if step.is_test() {
            let status = if outcome.is_ok() { "ok" } else { "not ok" };
            writeln!(
                self.writer,
                "{status} {} - {}",
                self.summary.tests_run, step.name
            )?;

            if let Err(failure) = outcome {
                self.write_tap_diagnostic(&describe_failure(failure))?;
            }
        } else if let Err(failure) = outcome {
            let line = format!("{} failed: {}", step.name, describe_failure(failure));
            self.write_tap_diagnostic(&line)?;
        }

        Ok(())
    }

    fn write_tap_diagnostic(&mut self, text: &str) -> Result<()> {
        for line in text.lines() {
            writeln!(self.writer, "# {line}")?;
        }

        Ok(())
    }

    fn ok_marker(&self) -> String {
        if self.use_color {
            "OK".green().to_string()
        } else {
            "OK".to_owned()
        }
    }

    fn fail_marker(&self) -> String {
        if self.use_color {
            "FAIL".red().to_string()
        } else {
            "FAIL".to_owned()
        }
    }
}

fn indentation(level: usize) -> String {
    " ".repeat(level * INDENT_WIDTH)
}

fn describe_failure(failure: &Failure) -> String {
    format!("{} ({})", failure.message(), failure.location())
}
