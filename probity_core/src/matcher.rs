use crate::comparison::report;
use crate::text_diff::compare_strings;
use std::fmt::Display;
use std::io;

/// Matches an error (or anything displayable) against an expected message.
///
/// With `verbose` set, a failed match also prints the long-string overlay of
/// the two messages, which helps when they differ by a single character deep
/// inside a long sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    expected: String,
    verbose: bool,
}

impl ErrorMessage {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Whether the displayed form of `error` equals the expected message.
    pub fn matches<E: Display + ?Sized>(&self, error: &E) -> bool {
        let actual = error.to_string();
        if self.verbose {
            let comparison = compare_strings(&actual, &self.expected);
            if let Err(e) = report(&comparison, &mut io::stdout().lock()) {
                tracing::warn!(error = %e, "failed to write error message diagnostic");
            }
        }
        actual == self.expected
    }

    pub fn describe(&self) -> String {
        format!("compare the error message with \"{}\".", self.expected)
    }
}
