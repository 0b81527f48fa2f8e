use crate::comparison::{
    Comparator, Comparison, DiffSettings, Mismatch, MismatchKind, SEPARATOR, require,
};
use crate::text_diff::longer_side;
use std::fmt;

/// Bytes per rendered row. The window start is aligned to this.
pub const ROW_BYTES: usize = 16;

/// Compares large byte buffers and renders a hex window around the first
/// difference.
#[derive(Debug, Clone, Default)]
pub struct LargeBufferComparator {
    settings: DiffSettings,
}

impl LargeBufferComparator {
    pub fn new(settings: DiffSettings) -> Self {
        Self { settings }
    }
}

/// Start offset of the rendered window for a first difference at `first`.
///
/// Keeps up to `context` equal bytes in view, then aligns down to a row.
pub fn window_start(first: usize, context: usize) -> usize {
    if first > context {
        (first - context) & !(ROW_BYTES - 1)
    } else {
        0
    }
}

/// The hex rows of a buffer diff, from `start` up to `limit`.
struct HexWindow<'a> {
    a: &'a [u8],
    b: &'a [u8],
    start: usize,
    limit: usize,
    settings: &'a DiffSettings,
}

impl fmt::Display for HexWindow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut in_error = false;
        for idx in self.start..self.limit {
            if idx % ROW_BYTES == 0 {
                if idx != self.start {
                    f.write_str("\n")?;
                }
                write!(f, "{}{idx:08x}- ", self.settings.inverse_off())?;
                in_error = false;
            }

            let (lhs, rhs) = (self.a[idx], self.b[idx]);
            if lhs == rhs {
                if in_error {
                    in_error = false;
                    f.write_str(self.settings.inverse_off())?;
                }
                write!(f, "{lhs:02x} ")?;
            } else {
                if !in_error {
                    in_error = true;
                    f.write_str(self.settings.inverse_on())?;
                }
                write!(f, "[{lhs:02x}/{rhs:02x}] ")?;
            }
        }
        if in_error {
            f.write_str(self.settings.inverse_off())?;
        }
        Ok(())
    }
}

impl Comparator<[u8]> for LargeBufferComparator {
    fn compare(&self, lhs: &[u8], rhs: &[u8]) -> Comparison {
        if lhs == rhs {
            return Comparison::Match;
        }

        let common = lhs.len().min(rhs.len());
        let differences: Vec<usize> = lhs
            .iter()
            .zip(rhs)
            .enumerate()
            .filter(|(_, (l, r))| l != r)
            .map(|(idx, _)| idx)
            .collect();
        let first_difference = differences.first().copied().unwrap_or(common);

        let start = window_start(first_difference, self.settings.context_bytes);
        // the first differing byte is always rendered, whatever the window
        let limit = start
            .saturating_add(self.settings.window_bytes)
            .max(first_difference.saturating_add(1))
            .min(common);
        let window = HexWindow {
            a: lhs,
            b: rhs,
            start,
            limit,
            settings: &self.settings,
        };

        let mut diagnostic = format!(
            "error: large buffers do not match.\n{SEPARATOR}\n{window}{}\n{SEPARATOR}\n",
            if limit != common { "..." } else { "" }
        );
        if let Some(side) = longer_side(lhs.len(), rhs.len()) {
            diagnostic.push_str(&format!(
                "{side} hand side buffer is longer ({} versus {}).\n",
                lhs.len(),
                rhs.len()
            ));
        }

        tracing::warn!(
            first_difference,
            window_start = start,
            lhs_len = lhs.len(),
            rhs_len = rhs.len(),
            "large buffers do not match"
        );

        Comparison::Mismatch(Mismatch {
            kind: MismatchKind::LargeBuffer,
            first_difference,
            differences,
            lhs_len: lhs.len(),
            rhs_len: rhs.len(),
            diagnostic,
        })
    }
}

/// Compares two buffers with the default settings.
pub fn compare_buffers(a: &[u8], b: &[u8]) -> Comparison {
    LargeBufferComparator::default().compare(a, b)
}

/// Asserts that two buffers are equal, printing a hex window around the first
/// difference before failing.
#[track_caller]
pub fn require_large_buffer(a: &[u8], b: &[u8]) {
    require(compare_buffers(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::{INVERSE_OFF, INVERSE_ON};

    fn plain() -> LargeBufferComparator {
        LargeBufferComparator::new(DiffSettings {
            highlight: false,
            ..DiffSettings::default()
        })
    }

    fn rows(diagnostic: &str) -> Vec<&str> {
        diagnostic
            .lines()
            .skip(2)
            .take_while(|line| *line != SEPARATOR)
            .collect()
    }

    #[test]
    fn equal_buffers_match() {
        let data: Vec<u8> = (0..=255).collect();
        assert!(compare_buffers(&data, &data.clone()).is_match());
        assert!(compare_buffers(&[], &[]).is_match());
    }

    #[test]
    fn window_start_alignment() {
        assert_eq!(window_start(0, 10), 0);
        assert_eq!(window_start(10, 10), 0);
        assert_eq!(window_start(11, 10), 0);
        assert_eq!(window_start(26, 10), 16);
        assert_eq!(window_start(1000, 10), 976);
    }

    #[test]
    fn difference_deep_in_buffer_is_windowed() {
        let a = vec![0x55u8; 2048];
        let mut b = a.clone();
        b[1000] = 0xAA;

        let comparison = plain().compare(&a, &b);
        let mismatch = comparison.mismatch().unwrap();
        assert_eq!(mismatch.first_difference, 1000);
        assert_eq!(mismatch.differences, vec![1000]);

        let rows = rows(&mismatch.diagnostic);
        assert_eq!(rows.len(), 4);
        assert!(rows[0].starts_with("000003d0- "), "got {:?}", rows[0]);
        assert!(rows[1].starts_with("000003e0- "));
        assert!(rows[1].contains("[55/aa] "));
        assert!(rows[3].starts_with("00000400- "));
        assert!(rows[3].ends_with("..."), "window should be truncated");
    }

    #[test]
    fn early_difference_starts_at_zero() {
        let a = [1u8, 2, 3, 4];
        let b = [1u8, 9, 3, 4];
        let comparison = compare_buffers(&a, &b);
        assert_eq!(
            comparison.diagnostic(),
            format!(
                "error: large buffers do not match.\n{SEPARATOR}\n\
                 {INVERSE_OFF}00000000- 01 {INVERSE_ON}[02/09] {INVERSE_OFF}03 04 \n\
                 {SEPARATOR}\n"
            )
        );
    }

    #[test]
    fn highlight_resets_at_each_row() {
        let a = [0u8; 32];
        let b = [1u8; 32];
        let comparison = compare_buffers(&a, &b);
        let diagnostic = comparison.diagnostic();
        assert_eq!(diagnostic.matches(INVERSE_ON).count(), 2);
        assert!(!diagnostic.contains("..."));
    }

    #[test]
    fn size_difference_is_reported() {
        let a = [7u8; 20];
        let b = [7u8; 24];
        let comparison = plain().compare(&a, &b);
        let mismatch = comparison.mismatch().unwrap();
        assert_eq!(mismatch.first_difference, 20);
        assert!(mismatch.differences.is_empty());
        assert!(mismatch
            .diagnostic
            .ends_with("Right hand side buffer is longer (20 versus 24).\n"));

        let comparison = plain().compare(&b, &a);
        assert!(comparison
            .diagnostic()
            .ends_with("Left hand side buffer is longer (24 versus 20).\n"));
    }

    #[test]
    fn empty_side_renders_no_rows() {
        let comparison = plain().compare(&[], &[1, 2, 3]);
        assert_eq!(
            comparison.diagnostic(),
            format!(
                "error: large buffers do not match.\n{SEPARATOR}\n\n{SEPARATOR}\n\
                 Right hand side buffer is longer (0 versus 3).\n"
            )
        );
    }

    #[test]
    fn custom_window_limits_rows() {
        let comparator = LargeBufferComparator::new(DiffSettings {
            highlight: false,
            context_bytes: 0,
            window_bytes: 16,
        });
        let a = vec![0u8; 128];
        let mut b = a.clone();
        b[40] = 1;
        let comparison = comparator.compare(&a, &b);
        let rows = rows(comparison.diagnostic());
        assert_eq!(rows.len(), 1);
        assert!(rows[0].starts_with("00000020- "));
    }

    #[test]
    fn narrow_window_still_reaches_the_difference() {
        let comparator = LargeBufferComparator::new(DiffSettings {
            highlight: false,
            context_bytes: 40,
            window_bytes: 16,
        });
        let a = vec![0u8; 256];
        let mut b = a.clone();
        b[100] = 1;
        let comparison = comparator.compare(&a, &b);
        let rows = rows(comparison.diagnostic());
        assert!(rows[0].starts_with("00000030- "), "got {:?}", rows[0]);
        assert!(rows.last().unwrap().contains("[00/01] "));
        assert!(rows.last().unwrap().ends_with("..."));

        let zero_window = LargeBufferComparator::new(DiffSettings {
            highlight: false,
            context_bytes: 0,
            window_bytes: 0,
        });
        assert!(zero_window.compare(&a, &b).diagnostic().contains("[00/01] "));
    }

    #[test]
    #[should_panic(expected = "large buffers a and b differ")]
    fn require_fails_the_test_on_mismatch() {
        require_large_buffer(b"abc", b"abd");
    }
}
