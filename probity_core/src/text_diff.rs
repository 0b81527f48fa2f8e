use crate::comparison::{
    Comparator, Comparison, DiffSettings, Mismatch, MismatchKind, SEPARATOR, require,
};

/// U+2423 OPEN BOX, used to make spaces visible.
const VISIBLE_SPACE: &str = "\u{2423}";

/// Compares long strings byte by byte and renders an inline overlay of the
/// differences.
#[derive(Debug, Clone, Default)]
pub struct LongStringComparator {
    settings: DiffSettings,
}

impl LongStringComparator {
    pub fn new(settings: DiffSettings) -> Self {
        Self { settings }
    }
}

/// Appends a printable stand-in for one byte of a differing position.
///
/// Bytes are handled one at a time, so a multi-byte UTF-8 character shows
/// up as a series of `\xhh` escapes.
fn push_glyph(out: &mut String, byte: u8) {
    match byte {
        b' ' => out.push_str(VISIBLE_SPACE),
        0x00..0x20 => {
            out.push('^');
            out.push(char::from(byte + 0x40));
        }
        0x20..0x80 => out.push(char::from(byte)),
        0x80..0xA0 => {
            out.push('@');
            out.push(char::from(byte - 0x40));
        }
        _ => push_escape(out, byte),
    }
}

fn push_escape(out: &mut String, byte: u8) {
    out.push_str(&format!("\\x{byte:x}"));
}

/// Copies a run of matching bytes. A run cut out of a multi-byte character
/// keeps its orphaned bytes as `\xhh` escapes.
fn push_raw(out: &mut String, run: &[u8]) {
    for chunk in run.utf8_chunks() {
        out.push_str(chunk.valid());
        for &byte in chunk.invalid() {
            push_escape(out, byte);
        }
    }
}

impl LongStringComparator {
    fn render(&self, a: &[u8], b: &[u8]) -> String {
        let mut out = String::with_capacity(a.len().max(b.len()) * 2 + 256);
        out.push_str("error: long strings do not match.\n");
        out.push_str(SEPARATOR);
        out.push('\n');

        let common = a.len().min(b.len());
        let mut idx = 0;
        while idx < common {
            let same = a[idx] == b[idx];
            let run = a[idx..common]
                .iter()
                .zip(&b[idx..common])
                .take_while(|(l, r)| (l == r) == same)
                .count();
            if same {
                push_raw(&mut out, &a[idx..idx + run]);
            } else {
                out.push_str(self.settings.inverse_on());
                for (&lhs, &rhs) in a[idx..idx + run].iter().zip(&b[idx..idx + run]) {
                    out.push('[');
                    push_glyph(&mut out, lhs);
                    out.push('/');
                    push_glyph(&mut out, rhs);
                    out.push(']');
                }
                out.push_str(self.settings.inverse_off());
            }
            idx += run;
        }

        out.push('\n');
        out.push_str(SEPARATOR);
        out.push('\n');

        if let Some(side) = longer_side(a.len(), b.len()) {
            out.push_str(&format!(
                "{side} hand side string is longer ({} versus {}).\n",
                a.len(),
                b.len()
            ));
        }
        out
    }
}

pub(crate) fn longer_side(lhs_len: usize, rhs_len: usize) -> Option<&'static str> {
    match lhs_len.cmp(&rhs_len) {
        std::cmp::Ordering::Greater => Some("Left"),
        std::cmp::Ordering::Less => Some("Right"),
        std::cmp::Ordering::Equal => None,
    }
}

impl Comparator<str> for LongStringComparator {
    fn compare(&self, lhs: &str, rhs: &str) -> Comparison {
        if lhs == rhs {
            return Comparison::Match;
        }

        let (a, b) = (lhs.as_bytes(), rhs.as_bytes());
        let differences: Vec<usize> = a
            .iter()
            .zip(b)
            .enumerate()
            .filter(|(_, (l, r))| l != r)
            .map(|(idx, _)| idx)
            .collect();
        let first_difference = differences
            .first()
            .copied()
            .unwrap_or_else(|| a.len().min(b.len()));

        tracing::warn!(
            first_difference,
            lhs_len = a.len(),
            rhs_len = b.len(),
            "long strings do not match"
        );

        Comparison::Mismatch(Mismatch {
            kind: MismatchKind::LongString,
            first_difference,
            differences,
            lhs_len: a.len(),
            rhs_len: b.len(),
            diagnostic: self.render(a, b),
        })
    }
}

/// Compares two strings with the default settings.
pub fn compare_strings(a: &str, b: &str) -> Comparison {
    LongStringComparator::default().compare(a, b)
}

/// Asserts that two long strings are equal, printing a highlighted overlay
/// of the differences before failing.
#[track_caller]
pub fn require_long_string(a: &str, b: &str) {
    require(compare_strings(a, b));
}
