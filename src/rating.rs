//! Rating normalization for heterogeneous client input.
//!
//! Clients send ratings as plain numbers (`4`, `"4.5"`) or star strings
//! (`"4 star"`, `"4 stars"`). Both schemas accept the star form but break
//! it apart differently.

use crate::model::SchemaVariant;

/// Attempts to parse a raw rating into a float.
///
/// Star strings are split per the schema: the school-only schema extracts
/// the first contiguous run of ASCII digits, the school-teacher schema
/// takes the first whitespace-delimited token and parses it as a float.
/// Anything else is parsed directly after trimming.
///
/// Returns `None` when no numeric value can be extracted.
pub fn try_parse_rating(raw: &str, variant: SchemaVariant) -> Option<f64> {
    if raw.to_lowercase().contains("star") {
        let token = match variant {
            SchemaVariant::SchoolOnly => first_digit_run(raw),
            SchemaVariant::SchoolTeacher => {
                raw.split_whitespace().next().map(str::to_string)
            }
        };
        return token?.parse::<f64>().ok();
    }

    raw.trim().parse::<f64>().ok()
}

/// Infallible rating parse: unparsable input soft-defaults to `0.0`.
///
/// The zero still counts as a real (lowering) contribution to an average
/// unless a range filter drops the record first.
pub fn parse_rating(raw: &str, variant: SchemaVariant) -> f64 {
    try_parse_rating(raw, variant).unwrap_or(0.0)
}

/// Renders a parsed rating back to its canonical decimal string.
///
/// Whole numbers keep one decimal place (`4.0` -> `"4.0"`), matching the
/// stored form expected by clients.
pub fn canonical_rating(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn first_digit_run(s: &str) -> Option<String> {
    let digits: String = s
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() { None } else { Some(digits) }
}
