//! Trace utilities

/// Trace category for suite discovery.
pub const DISCOVERY: &str = "discovery";
/// Trace category for flattening a tree into steps.
pub const FLATTEN: &str = "flatten";
/// Trace category for range-directed replay.
pub const REPLAY: &str = "replay";
/// Trace category for step execution.
pub const RUN: &str = "run";
