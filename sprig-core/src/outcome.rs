//! Results of running hook and test bodies.

use std::panic::Location;

/// A failed check inside a hook or test body.
///
/// Returning a `Failure` ends the body it was raised in; other steps are unaffected.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("{message}")]
pub struct Failure {
    message: String,
    file: &'static str,
    line: u32,
}

impl Failure {
    /// Returns a new failure raised at the given source location.
    ///
    /// # Arguments
    ///
    /// * `message` - Human-readable description of the failure.
    /// * `file` - Source file that raised the failure.
    /// * `line` - Line within `file`.
    pub fn new(message: impl Into<String>, file: &'static str, line: u32) -> Self {
        Self {
            message: message.into(),
            file,
            line,
        }
    }

    /// Returns a new failure located at the caller.
    #[track_caller]
    pub fn here(message: impl Into<String>) -> Self {
        let location = Location::caller();
        Self::new(message, location.file(), location.line())
    }

    /// Returns the failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the source file that raised the failure.
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// Returns the line that raised the failure.
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns the source location formatted as `file:line`.
    pub fn location(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }
}

/// Result of running one hook or test body.
pub type Outcome = Result<(), Failure>;

/// Fails with `message` unless `condition` holds.
///
/// Meant to be used with `?` so that a failing check ends the enclosing body:
///
/// ```
/// use sprig_core::{Outcome, ensure};
///
/// fn body(count: usize) -> Outcome {
///     ensure(count > 0, "count should be positive")?;
///     Ok(())
/// }
///
/// assert!(body(0).is_err());
/// ```
#[track_caller]
pub fn ensure(condition: bool, message: impl std::fmt::Display) -> Outcome {
    if condition {
        Ok(())
    } else {
        Err(Failure::here(format!("Check failed: {message}")))
    }
}

/// Ends the enclosing body with a [`Failure`] unless the condition holds.
///
/// With a single argument the failure message is the stringified condition; any
/// further arguments are a format string and its arguments.
///
/// ```
/// use sprig_core::{Outcome, check};
///
/// fn body(span: usize) -> Outcome {
///     check!(span == 3, "got {}", span);
///     Ok(())
/// }
///
/// assert_eq!(body(4).unwrap_err().message(), "Check failed: got 4");
/// ```
#[macro_export]
macro_rules! check {
    ($condition:expr $(,)?) => {
        if !($condition) {
            return ::core::result::Result::Err(::core::convert::From::from(
                $crate::Failure::new(
                    concat!("Check failed: ", stringify!($condition)),
                    file!(),
                    line!(),
                ),
            ));
        }
    };
    ($condition:expr, $($arg:tt)+) => {
        if !($condition) {
            return ::core::result::Result::Err(::core::convert::From::from(
                $crate::Failure::new(
                    format!("Check failed: {}", format_args!($($arg)+)),
                    file!(),
                    line!(),
                ),
            ));
        }
    };
}
