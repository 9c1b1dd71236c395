//! Configuration types for the harness.

use clap::Parser;

use crate::events::TraceEvent;

/// Environment variable that forces TAP output when set.
pub const USE_TAP_VAR: &str = "SPRIG_USE_TAP";

/// How each step's body is brought to execution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExecutionStrategy {
    /// Build the tree once and invoke each step's stored body directly.
    #[default]
    Stored,
    /// Re-run the suite definition once per step, descending only into the
    /// groups whose id range contains the step.
    Replay,
}

/// Source of environment variables consulted when choosing defaults.
pub trait RunEnvironment {
    /// Returns the value of the given variable, if set.
    fn get_env_var(&self, key: &str) -> Option<String>;
}

/// Reads variables from the process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnvironment;

impl RunEnvironment for ProcessEnvironment {
    fn get_env_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Configuration for one run of a suite.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunConfig {
    /// Whether to color OK/FAIL markers.
    pub use_color: bool,
    /// Whether to report in TAP format instead of the human-readable one.
    pub use_tap: bool,
    /// How step bodies are executed.
    pub strategy: ExecutionStrategy,
    /// Whether to also report hooks that succeed.
    pub verbose: bool,
}

impl RunConfig {
    /// Creates a config with plain human-readable output and stored bodies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives defaults from the environment and the output stream.
    ///
    /// Color is enabled only for a color-capable terminal; TAP is enabled when
    /// [`USE_TAP_VAR`] holds a value other than empty or `0`.
    ///
    /// # Arguments
    ///
    /// * `env` - Environment to consult.
    /// * `output_is_terminal` - Whether results are written to an interactive terminal.
    pub fn detect(env: &impl RunEnvironment, output_is_terminal: bool) -> Self {
        Self {
            use_color: output_is_terminal && terminal_supports_color(env),
            use_tap: tap_forced(env),
            ..Self::default()
        }
    }

    /// Combines command-line options with environment-derived defaults.
    ///
    /// # Arguments
    ///
    /// * `options` - Parsed command-line options.
    /// * `env` - Environment to consult.
    /// * `output_is_terminal` - Whether results are written to an interactive terminal.
    pub fn from_options(
        options: &HarnessOptions,
        env: &impl RunEnvironment,
        output_is_terminal: bool,
    ) -> Self {
        let detected = Self::detect(env, output_is_terminal);

        let use_color = match options.color {
            clap::ColorChoice::Auto => detected.use_color,
            clap::ColorChoice::Always => true,
            clap::ColorChoice::Never => false,
        };

        Self {
            use_color,
            use_tap: options.tap || detected.use_tap,
            strategy: options.strategy,
            verbose: options.verbose,
        }
    }

    /// Sets whether OK/FAIL markers are colored.
    #[must_use]
    pub const fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Sets whether results are reported as TAP.
    #[must_use]
    pub const fn with_tap(mut self, use_tap: bool) -> Self {
        self.use_tap = use_tap;
        self
    }

    /// Sets the execution strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets whether successful hooks are reported.
    #[must_use]
    pub const fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

fn terminal_supports_color(env: &impl RunEnvironment) -> bool {
    if env.get_env_var("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        return false;
    }

    env.get_env_var("TERM")
        .is_some_and(|term| !term.is_empty() && term != "dumb")
}

fn tap_forced(env: &impl RunEnvironment) -> bool {
    env.get_env_var(USE_TAP_VAR)
        .is_some_and(|v| !v.is_empty() && v != "0")
}

/// Command-line options for a suite binary.
#[derive(Clone, Parser, Debug)]
#[clap(version, about)]
pub struct HarnessOptions {
    /// Report results in TAP format.
    #[clap(long = "tap")]
    pub tap: bool,

    /// Colorize output?
    #[clap(long = "color", default_value_t = clap::ColorChoice::Auto)]
    pub color: clap::ColorChoice,

    /// How step bodies are executed.
    #[clap(long = "strategy", value_enum, default_value_t = ExecutionStrategy::Stored)]
    pub strategy: ExecutionStrategy,

    /// Report hooks that succeed as well as those that fail.
    #[clap(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable trace output for the given areas.
    #[clap(long = "trace", value_enum)]
    pub trace: Vec<TraceEvent>,

    /// Capture output? (for compatibility with `cargo test` only, has no effect).
    #[clap(long = "nocapture")]
    pub no_capture: bool,

    /// Test name filters (for compatibility with `cargo test` only, has no effect).
    pub filters: Vec<String>,
}
