use crate::random::TestRng;
use rand_core::RngCore;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// First code point of the UTF-16 surrogate block.
pub const SURROGATE_START: u32 = 0xD800;
/// One past the last code point of the UTF-16 surrogate block.
pub const SURROGATE_END: u32 = 0xE000;
/// Number of code points in the surrogate block.
pub const SURROGATES_COUNT: u32 = SURROGATE_END - SURROGATE_START;

const DIGIT_ZERO: u32 = '0' as u32;
const DIGIT_NINE: u32 = '9' as u32;
const UPPER_A: u32 = 'A' as u32;
const UPPER_Z: u32 = 'Z' as u32;
const LOWER_A: u32 = 'a' as u32;
const LOWER_Z: u32 = 'z' as u32;
const UNDERSCORE: u32 = '_' as u32;
const SPACE: u32 = ' ' as u32;
const TILDE: u32 = '~' as u32;

/// The character classes a random character can be drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Any code point from 0 to 0x10FFFF.
    ZUnicode,
    /// Any code point from 0 to 0xFFFF.
    ZPlan0,
    /// Any code point from 1 to 0x10FFFF.
    Unicode,
    /// Any code point from 1 to 0xFFFF.
    Plan0,
    /// `A-Z` and `a-z`.
    Letters,
    /// `0-9`, `A-Z` and `a-z`.
    Alphanumeric,
    /// `0-9`.
    Digits,
    /// Printable ASCII, 0x20 to 0x7E.
    #[default]
    Ascii,
    /// `0-9`, `A-Z`, `a-z` and `_`. A label must not start with a digit;
    /// the string generator enforces that.
    Label,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown character category \"{0}\"")]
pub struct UnknownCategory(pub String);

impl Category {
    pub const ALL: [Category; 9] = [
        Category::ZUnicode,
        Category::ZPlan0,
        Category::Unicode,
        Category::Plan0,
        Category::Letters,
        Category::Alphanumeric,
        Category::Digits,
        Category::Ascii,
        Category::Label,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::ZUnicode => "z-unicode",
            Category::ZPlan0 => "z-plan0",
            Category::Unicode => "unicode",
            Category::Plan0 => "plan0",
            Category::Letters => "letters",
            Category::Alphanumeric => "alphanumeric",
            Category::Digits => "digits",
            Category::Ascii => "ascii",
            Category::Label => "label",
        }
    }

    /// Maps a raw 32-bit draw into this category, before the surrogate skip.
    ///
    /// Each arm keeps its own gap arithmetic. The lettered categories walk
    /// digits, then uppercase, then lowercase (then `_` for labels), shifting
    /// over the ASCII gaps between those runs.
    pub fn reduce(self, raw: u32) -> u32 {
        match self {
            Category::ZUnicode => raw % (0x110000 - SURROGATES_COUNT),
            Category::ZPlan0 => raw % (0x10000 - SURROGATES_COUNT),
            Category::Unicode => raw % (0x110000 - SURROGATES_COUNT - 1) + 1,
            Category::Plan0 => raw % (0x10000 - SURROGATES_COUNT - 1) + 1,
            Category::Letters => reduce_letters(raw),
            Category::Alphanumeric => reduce_alphanumeric(raw),
            Category::Digits => raw % 10 + DIGIT_ZERO,
            Category::Ascii => raw % (TILDE - SPACE + 1) + SPACE,
            Category::Label => reduce_label(raw),
        }
    }

    /// Whether `code_point` is a value this category can produce.
    pub fn contains(self, code_point: u32) -> bool {
        let is_scalar = code_point < 0x110000 && !is_surrogate(code_point);
        match self {
            Category::ZUnicode => is_scalar,
            Category::ZPlan0 => is_scalar && code_point < 0x10000,
            Category::Unicode => is_scalar && code_point != 0,
            Category::Plan0 => is_scalar && code_point != 0 && code_point < 0x10000,
            Category::Letters => is_letter(code_point),
            Category::Alphanumeric => is_digit(code_point) || is_letter(code_point),
            Category::Digits => is_digit(code_point),
            Category::Ascii => (SPACE..=TILDE).contains(&code_point),
            Category::Label => {
                is_digit(code_point) || is_letter(code_point) || code_point == UNDERSCORE
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

fn reduce_letters(raw: u32) -> u32 {
    let mut c = raw % (26 * 2) + UPPER_A;
    if c > UPPER_Z {
        c += LOWER_A - UPPER_Z - 1;
    }
    c
}

fn reduce_alphanumeric(raw: u32) -> u32 {
    let mut c = raw % (26 * 2 + 10) + DIGIT_ZERO;
    if c > DIGIT_NINE {
        c += UPPER_A - DIGIT_NINE - 1;
        if c > UPPER_Z {
            c += LOWER_A - UPPER_Z - 1;
        }
    }
    c
}

fn reduce_label(raw: u32) -> u32 {
    let mut c = raw % (26 * 2 + 10 + 1) + DIGIT_ZERO;
    if c > DIGIT_NINE {
        c += UPPER_A - DIGIT_NINE - 1;
        if c > UPPER_Z {
            c += LOWER_A - UPPER_Z - 1;
            if c > LOWER_Z {
                c = UNDERSCORE;
            }
        }
    }
    c
}

pub fn is_surrogate(code_point: u32) -> bool {
    (SURROGATE_START..SURROGATE_END).contains(&code_point)
}

pub(crate) fn is_digit(code_point: u32) -> bool {
    (DIGIT_ZERO..=DIGIT_NINE).contains(&code_point)
}

fn is_letter(code_point: u32) -> bool {
    (UPPER_A..=UPPER_Z).contains(&code_point) || (LOWER_A..=LOWER_Z).contains(&code_point)
}

/// Moves values at or above the surrogate block past it, so the reduced
/// range maps one-to-one onto valid scalar values.
pub fn skip_surrogates(code_point: u32) -> u32 {
    if code_point >= SURROGATE_START {
        code_point + SURROGATES_COUNT
    } else {
        code_point
    }
}

impl<R: RngCore> TestRng<R> {
    /// Draws one code point from `category`.
    ///
    /// The result is never in the surrogate block.
    pub fn random_char(&mut self, category: Category) -> u32 {
        let raw: u32 = self.random();
        skip_surrogates(category.reduce(raw))
    }
}
