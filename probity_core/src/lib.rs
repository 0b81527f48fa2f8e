pub mod buffer_diff;
pub mod charset;
pub mod comparison;
pub mod config;
pub mod float;
pub mod generator;
pub mod matcher;
pub mod random;
pub mod text_diff;
pub mod utf8;

pub use buffer_diff::{LargeBufferComparator, compare_buffers, require_large_buffer};
pub use charset::{Category, UnknownCategory};
pub use comparison::{Comparator, Comparison, DiffSettings, Mismatch, MismatchKind, report};
pub use config::ProbityConfig;
pub use float::{Float, nearly_equal, nearly_equal_default, require_nearly_equal};
pub use generator::{BufferGenerator, GenerateError, Generator, StringGenerator};
pub use matcher::ErrorMessage;
pub use random::{RandomError, RandomInt, TestRng};
pub use text_diff::{LongStringComparator, compare_strings, require_long_string};
pub use utf8::encode_utf8;
