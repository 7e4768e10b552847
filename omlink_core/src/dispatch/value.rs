//! Best-effort parsing of wire values.
//!
//! Every parser returns `None` for malformed input; the caller then drops
//! the value and keeps the previous state.

/// Literal the remote uses for an absent value.
pub const NULL: &str = "null";

#[inline]
pub fn is_null(value: &str) -> bool {
    value.trim() == NULL
}

pub fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

pub fn parse_f32(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Integer, also accepting a float and rounding it (`"1200.0"`).
pub fn parse_i32(value: &str) -> Option<i32> {
    let value = value.trim();
    value
        .parse()
        .ok()
        .or_else(|| parse_f32(value).map(|v| v.round() as i32))
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Fraction (`0.0..`) to a rounded percentage.
pub fn parse_percent(value: &str) -> Option<i32> {
    parse_f32(value).map(|v| (v * 100.0).round() as i32)
}

/// Heater or tool index that must fit a `u8`.
pub fn parse_index_u8(value: &str) -> Option<u8> {
    parse_i32(value).and_then(|v| u8::try_from(v).ok())
}

/// Index where a negative value or `null` means "none". The outer `None`
/// is malformed input.
pub fn parse_optional_index(value: &str) -> Option<Option<usize>> {
    if is_null(value) {
        return Some(None);
    }
    parse_i32(value).map(|v| usize::try_from(v).ok())
}
