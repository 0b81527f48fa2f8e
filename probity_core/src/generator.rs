use crate::charset::{Category, is_digit};
use crate::random::TestRng;
use crate::utf8::encode_utf8;
use rand_core::RngCore;
use std::string::FromUtf8Error;
use thiserror::Error;

/// Errors that can occur while generating strings or buffers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    /// The minimum length is larger than the (inclusive) maximum.
    #[error("invalid length range: minimum {min} is larger than maximum {max}")]
    InvalidRange { min: usize, max: usize },
    /// The encoded characters did not form valid UTF-8. Sampled code points
    /// are always scalar values, so generation never reports this; it is
    /// kept so a sampler change surfaces as an error instead of a panic.
    #[error("generated string is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

/// A reusable recipe for producing random test values.
///
/// # Type Parameters
/// * `R`: The word source backing the [`TestRng`].
pub trait Generator<R: RngCore> {
    /// The type of value this generator produces.
    type Output;

    /// Produces one value, consuming draws from `rng`.
    ///
    /// # Returns
    /// `Ok(value)`, or a [`GenerateError`] if the recipe itself is invalid.
    fn generate(&self, rng: &mut TestRng<R>) -> Result<Self::Output, GenerateError>;
}

/// Generates strings of `min..=max` characters taken from `category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringGenerator {
    pub min: usize,
    pub max: usize,
    pub category: Category,
}

impl StringGenerator {
    pub fn new(min: usize, max: usize, category: Category) -> Self {
        Self { min, max, category }
    }
}

impl<R: RngCore> Generator<R> for StringGenerator {
    type Output = String;

    fn generate(&self, rng: &mut TestRng<R>) -> Result<String, GenerateError> {
        rng.try_random_string(self.min, self.max, self.category)
    }
}

/// Generates byte buffers of `min..=max` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferGenerator {
    pub min: usize,
    pub max: usize,
}

impl BufferGenerator {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

impl<R: RngCore> Generator<R> for BufferGenerator {
    type Output = Vec<u8>;

    fn generate(&self, rng: &mut TestRng<R>) -> Result<Vec<u8>, GenerateError> {
        rng.try_random_buffer(self.min, self.max)
    }
}

impl<R: RngCore> TestRng<R> {
    /// Picks a length in `min..=max` from a single `usize` draw.
    ///
    /// The reduction is a plain modulo, so lengths are only approximately
    /// uniform when the span does not divide the draw space.
    pub fn random_length(&mut self, min: usize, max: usize) -> Result<usize, GenerateError> {
        if min > max {
            return Err(GenerateError::InvalidRange { min, max });
        }
        let raw: usize = self.random();
        let span = (max - min).wrapping_add(1);
        if span == 0 {
            // min..=max covers every usize
            return Ok(raw);
        }
        Ok(raw % span + min)
    }

    /// Generates a string of `min..=max` characters from `category`.
    ///
    /// With [`Category::Label`] the first character is re-drawn until it is
    /// not a digit; later characters may be digits.
    ///
    /// # Errors
    /// [`GenerateError::InvalidRange`] when `min > max`.
    pub fn try_random_string(
        &mut self,
        min: usize,
        max: usize,
        category: Category,
    ) -> Result<String, GenerateError> {
        let length = self.random_length(min, max)?;

        let mut bytes = Vec::with_capacity(length);
        for _ in 0..length {
            let mut c = self.random_char(category);
            while bytes.is_empty() && category == Category::Label && is_digit(c) {
                c = self.random_char(category);
            }
            encode_utf8(&mut bytes, c);
        }

        Ok(String::from_utf8(bytes)?)
    }

    /// Generates a string of `min..=max` characters from `category`.
    ///
    /// Panics when `min > max`; use [`TestRng::try_random_string`] to get
    /// the error instead.
    pub fn random_string(&mut self, min: usize, max: usize, category: Category) -> String {
        self.try_random_string(min, max, category)
            .unwrap_or_else(|e| panic!("random_string(): {e}"))
    }

    /// [`TestRng::random_string`] with the default [`Category::Ascii`].
    pub fn random_ascii_string(&mut self, min: usize, max: usize) -> String {
        self.random_string(min, max, Category::default())
    }

    /// Generates a buffer of `min..=max` random bytes.
    ///
    /// # Errors
    /// [`GenerateError::InvalidRange`] when `min > max`.
    pub fn try_random_buffer(&mut self, min: usize, max: usize) -> Result<Vec<u8>, GenerateError> {
        let size = self.random_length(min, max)?;
        Ok((0..size).map(|_| self.random::<u8>()).collect())
    }

    /// Generates a buffer of `min..=max` random bytes, panicking when
    /// `min > max`.
    pub fn random_buffer(&mut self, min: usize, max: usize) -> Vec<u8> {
        self.try_random_buffer(min, max)
            .unwrap_or_else(|e| panic!("random_buffer(): {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_string_of_fixed_length() {
        let mut rng = TestRng::from_seed(2024);
        for _ in 0..100 {
            let s = rng.random_string(5, 5, Category::Digits);
            assert_eq!(s.len(), 5);
            assert!(s.bytes().all(|b| b.is_ascii_digit()), "unexpected {:?}", s);
        }
    }

    #[test]
    fn lengths_stay_within_bounds() {
        let mut rng = TestRng::from_seed(8);
        for _ in 0..500 {
            let s = rng.random_ascii_string(3, 9);
            assert!((3..=9).contains(&s.chars().count()), "bad length {}", s.len());

            let b = rng.random_buffer(0, 4);
            assert!(b.len() <= 4);
        }
    }

    #[test]
    fn unicode_strings_count_characters_not_bytes() {
        let mut rng = TestRng::from_seed(31337);
        for _ in 0..50 {
            let s = rng.random_string(10, 10, Category::Unicode);
            assert_eq!(s.chars().count(), 10);
            assert!(s.chars().all(|c| c != '\0'));
        }
    }

    #[test]
    fn labels_never_start_with_a_digit() {
        let mut rng = TestRng::from_seed(17);
        let mut saw_inner_digit = false;
        for _ in 0..1000 {
            let label = rng.random_string(1, 12, Category::Label);
            let first = label.chars().next().unwrap();
            assert!(!first.is_ascii_digit(), "label {:?} starts with a digit", label);
            assert!(label.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
            saw_inner_digit |= label.chars().skip(1).any(|c| c.is_ascii_digit());
        }
        assert!(saw_inner_digit, "digits should still appear after the first character");
    }

    #[test]
    fn empty_range_yields_empty_values() {
        let mut rng = TestRng::from_seed(0);
        assert_eq!(rng.random_ascii_string(0, 0), "");
        assert!(rng.random_buffer(0, 0).is_empty());
    }

    #[test]
    fn every_category_encodes_to_valid_utf8() {
        let mut rng = TestRng::from_seed(0x5EED);
        for category in Category::ALL {
            for _ in 0..200 {
                let generated = rng.try_random_string(1, 24, category);
                assert!(generated.is_ok(), "{category}: {generated:?}");
            }
        }
    }

    #[test]
    fn inverted_range_is_an_error() {
        let mut rng = TestRng::from_seed(0);
        assert_eq!(
            rng.try_random_buffer(5, 4),
            Err(GenerateError::InvalidRange { min: 5, max: 4 })
        );
        assert!(matches!(
            rng.try_random_string(2, 1, Category::Ascii),
            Err(GenerateError::InvalidRange { min: 2, max: 1 })
        ));
    }

    #[test]
    #[should_panic(expected = "invalid length range")]
    fn infallible_wrapper_panics_on_inverted_range() {
        let mut rng = TestRng::from_seed(0);
        let _ = rng.random_string(9, 1, Category::Digits);
    }

    #[test]
    fn generators_replay_with_the_same_seed() {
        let strings = StringGenerator::new(0, 32, Category::ZUnicode);
        let buffers = BufferGenerator::new(16, 64);

        let mut first = TestRng::from_seed(555);
        let mut second = TestRng::from_seed(555);
        for _ in 0..20 {
            assert_eq!(
                strings.generate(&mut first).unwrap(),
                strings.generate(&mut second).unwrap()
            );
            assert_eq!(
                buffers.generate(&mut first).unwrap(),
                buffers.generate(&mut second).unwrap()
            );
        }
    }

    #[test]
    fn full_usize_range_does_not_overflow() {
        let mut rng = TestRng::from_seed(1);
        assert!(rng.random_length(0, usize::MAX).is_ok());
        let n = rng.random_length(usize::MAX, usize::MAX).unwrap();
        assert_eq!(n, usize::MAX);
    }
}
