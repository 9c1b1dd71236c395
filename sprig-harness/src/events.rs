//! Trace event selection and subscriber setup.

use std::collections::HashSet;
use std::fmt::Display;

use sprig_core::trace_categories;
use tracing_subscriber::{Layer, filter::Targets, layer::SubscriberExt, util::SubscriberInitExt};

/// Type of event to trace.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, clap::ValueEnum)]
pub enum TraceEvent {
    /// Traces building the suite tree from its definition.
    #[clap(name = "discovery")]
    Discovery,
    /// Traces flattening the tree into an execution plan.
    #[clap(name = "flatten")]
    Flatten,
    /// Traces range-directed replay passes.
    #[clap(name = "replay")]
    Replay,
    /// Traces execution of individual steps.
    #[clap(name = "run")]
    Run,
}

impl Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discovery => write!(f, "discovery"),
            Self::Flatten => write!(f, "flatten"),
            Self::Replay => write!(f, "replay"),
            Self::Run => write!(f, "run"),
        }
    }
}

impl TraceEvent {
    const fn target(self) -> &'static str {
        match self {
            Self::Discovery => trace_categories::DISCOVERY,
            Self::Flatten => trace_categories::FLATTEN,
            Self::Replay => trace_categories::REPLAY,
            Self::Run => trace_categories::RUN,
        }
    }
}

/// Builds the target filter enabling debug output for the given events.
pub fn compose_filter(events: &[TraceEvent]) -> Targets {
    let enabled: HashSet<TraceEvent> = events.iter().copied().collect();

    Targets::new()
        .with_default(tracing_subscriber::filter::LevelFilter::WARN)
        .with_targets(
            enabled
                .into_iter()
                .map(|event| (event.target(), tracing::Level::DEBUG)),
        )
}

/// Installs a stderr subscriber for the given events.
///
/// Failure to install (e.g. because a subscriber is already set) is reported
/// on stderr and otherwise ignored.
pub fn init_tracing(events: &[TraceEvent]) {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_filter(compose_filter(events));

    if tracing_subscriber::registry().with(layer).try_init().is_err() {
        eprintln!("warning: failed to initialize tracing.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_matches_value_names() {
        use clap::ValueEnum;

        for event in TraceEvent::value_variants() {
            let name = event.to_possible_value().map(|v| v.get_name().to_owned());
            assert_eq!(name, Some(event.to_string()));
        }
    }

    #[test]
    fn filter_enables_selected_targets_only() {
        let filter = compose_filter(&[TraceEvent::Replay]);

        assert!(filter.would_enable(trace_categories::REPLAY, &tracing::Level::DEBUG));
        assert!(!filter.would_enable(trace_categories::RUN, &tracing::Level::DEBUG));
        assert!(filter.would_enable(trace_categories::RUN, &tracing::Level::WARN));
    }
}
