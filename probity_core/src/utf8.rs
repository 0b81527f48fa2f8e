//! Minimal UTF-8 serialization for sampled code points.
//!
//! Only what the string generator needs: one code point in, one to four
//! bytes out. Values past the Unicode range are dropped silently; they can
//! only come from a caller bug since the sampler never produces them.

/// One past the largest Unicode code point.
pub const CODE_POINT_LIMIT: u32 = 0x110000;

/// Appends the UTF-8 form of `code_point` to `out`.
///
/// Code points at or above [`CODE_POINT_LIMIT`] append nothing.
pub fn encode_utf8(out: &mut Vec<u8>, code_point: u32) {
    let cp = code_point;
    if cp < 0x80 {
        out.push(cp as u8);
    } else if cp < 0x800 {
        out.push(((cp >> 6) | 0xC0) as u8);
        out.push(((cp & 0x3F) | 0x80) as u8);
    } else if cp < 0x10000 {
        out.push(((cp >> 12) | 0xE0) as u8);
        out.push((((cp >> 6) & 0x3F) | 0x80) as u8);
        out.push(((cp & 0x3F) | 0x80) as u8);
    } else if cp < CODE_POINT_LIMIT {
        out.push(((cp >> 18) | 0xF0) as u8);
        out.push((((cp >> 12) & 0x3F) | 0x80) as u8);
        out.push((((cp >> 6) & 0x3F) | 0x80) as u8);
        out.push(((cp & 0x3F) | 0x80) as u8);
    }
}

/// Number of bytes [`encode_utf8`] appends for `code_point`.
pub fn encoded_len(code_point: u32) -> usize {
    match code_point {
        0..0x80 => 1,
        0x80..0x800 => 2,
        0x800..0x10000 => 3,
        0x10000..CODE_POINT_LIMIT => 4,
        _ => 0,
    }
}
