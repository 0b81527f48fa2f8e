use serde::Deserialize;
use std::fmt;
use std::io::{self, Write};
use thiserror::Error;

/// Line framing the body of every mismatch diagnostic.
pub const SEPARATOR: &str = "---------------------------------------------------";

/// Terminal escape that starts inverse video.
pub const INVERSE_ON: &str = "\x1b[7m";
/// Terminal escape that resets all attributes.
pub const INVERSE_OFF: &str = "\x1b[0m";

/// Bytes of equal data shown before the first difference in a buffer diff.
pub const DEFAULT_CONTEXT_BYTES: usize = 10;
/// Maximum number of bytes rendered by a buffer diff (4 rows of 16).
pub const DEFAULT_WINDOW_BYTES: usize = 64;

/// Rendering settings shared by the comparators.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields, default)]
pub struct DiffSettings {
    /// Wrap differing runs in inverse-video escapes.
    pub highlight: bool,
    /// Equal bytes kept before the first difference of a buffer diff,
    /// before the start is aligned down to a row boundary.
    pub context_bytes: usize,
    /// Maximum number of bytes rendered by a buffer diff.
    pub window_bytes: usize,
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self {
            highlight: true,
            context_bytes: DEFAULT_CONTEXT_BYTES,
            window_bytes: DEFAULT_WINDOW_BYTES,
        }
    }
}

impl DiffSettings {
    pub(crate) fn inverse_on(&self) -> &'static str {
        if self.highlight { INVERSE_ON } else { "" }
    }

    pub(crate) fn inverse_off(&self) -> &'static str {
        if self.highlight { INVERSE_OFF } else { "" }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    LongString,
    LargeBuffer,
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchKind::LongString => f.write_str("long strings do not match"),
            MismatchKind::LargeBuffer => f.write_str("large buffers a and b differ"),
        }
    }
}

/// A failed comparison, with everything needed to report it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} (first difference at offset {first_difference}, {lhs_len} versus {rhs_len} bytes)")]
pub struct Mismatch {
    pub kind: MismatchKind,
    /// Offset of the first differing byte, or the shorter length when one
    /// side is a prefix of the other.
    pub first_difference: usize,
    /// Every differing offset within the common length.
    pub differences: Vec<usize>,
    pub lhs_len: usize,
    pub rhs_len: usize,
    /// The rendered, human-readable diagnostic.
    pub diagnostic: String,
}

/// Outcome of comparing two values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Match,
    Mismatch(Mismatch),
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Match)
    }

    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            Comparison::Match => None,
            Comparison::Mismatch(m) => Some(m),
        }
    }

    /// The rendered diagnostic; empty on a match.
    pub fn diagnostic(&self) -> &str {
        self.mismatch().map_or("", |m| m.diagnostic.as_str())
    }

    /// Converts the outcome into a `Result` so it can flow through `?` in a
    /// test returning `Result`.
    pub fn into_result(self) -> Result<(), Mismatch> {
        match self {
            Comparison::Match => Ok(()),
            Comparison::Mismatch(m) => Err(m),
        }
    }
}

/// Compares two values and renders their differences.
pub trait Comparator<T: ?Sized> {
    fn compare(&self, lhs: &T, rhs: &T) -> Comparison;
}

/// Writes the diagnostic of `comparison` to `out`. Nothing is written on a
/// match.
pub fn report<W: Write>(comparison: &Comparison, out: &mut W) -> io::Result<()> {
    if let Comparison::Mismatch(m) = comparison {
        out.write_all(m.diagnostic.as_bytes())?;
        out.flush()?;
    }
    Ok(())
}

/// Prints the diagnostic to stdout and panics on a mismatch, which is how a
/// Rust test records a failed expectation.
#[track_caller]
pub fn require(comparison: Comparison) {
    if let Comparison::Mismatch(m) = comparison {
        print!("{}", m.diagnostic);
        panic!("{m}");
    }
}
