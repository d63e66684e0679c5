//! Skill validation
//!
//! Every skill value that enters the roster, whether typed by the organizer,
//! read from the data file or produced by a rating update, passes through
//! [`validate`] or [`clamp`]. Both are total: they never fail and always return
//! a value in `[MIN_SKILL, MAX_SKILL]` rounded to two decimals.

/// Lowest skill (and interaction) a player can hold
pub const MIN_SKILL: f64 = 0.1;

/// Highest skill (and interaction) a player can hold
pub const MAX_SKILL: f64 = 1.0;

/// Value used when the raw input is not a number
pub const DEFAULT_SKILL: f64 = 0.5;

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to two decimals and clamp into the skill range.
///
/// NaN maps to [`DEFAULT_SKILL`]; infinities clamp to the nearest bound.
pub fn clamp(value: f64) -> f64 {
    if value.is_nan() {
        return DEFAULT_SKILL;
    }
    round2(value).clamp(MIN_SKILL, MAX_SKILL)
}

/// Validate a raw textual skill value
pub fn validate(raw: &str) -> f64 {
    match parse_number(raw) {
        Some(value) => clamp(value),
        None => DEFAULT_SKILL,
    }
}

/// Validate a skill value coming from a JSON document
pub fn validate_value(raw: &serde_json::Value) -> f64 {
    match raw {
        serde_json::Value::Number(n) => n.as_f64().map(clamp).unwrap_or(DEFAULT_SKILL),
        serde_json::Value::String(s) => validate(s),
        _ => DEFAULT_SKILL,
    }
}

/// Whether `value` lies in the skill range without any clamping
pub fn is_within_bounds(value: f64) -> bool {
    (MIN_SKILL..=MAX_SKILL).contains(&value)
}

/// Parse the leading decimal number of `raw`, ignoring leading whitespace.
///
/// Accepts an optional sign followed by digits with an optional fraction and
/// exponent, or the literal `Infinity`. Anything after the number is ignored:
/// `"0.75"`, `" 0.7 points"` and `"1e-1"` all parse; `"abc"`, `"inf"` and `""`
/// do not.
pub fn parse_number(raw: &str) -> Option<f64> {
    const INFINITY: &str = "Infinity";

    let text = raw.trim_start();
    let bytes = text.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if text[end..].starts_with(INFINITY) {
        return text[..end + INFINITY.len()].parse().ok();
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exp_digits = count_digits(&bytes[exponent..]);
        if exp_digits > 0 {
            end = exponent + exp_digits;
        }
    }

    text[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
