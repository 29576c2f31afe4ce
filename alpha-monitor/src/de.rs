//! Parse-with-default utilities for the untrusted, string-encoded fields of the token list.
//!
//! Every numeric projection of raw API text goes through this module so that no downstream
//! component has to reason about malformed input: anything that is not a finite number becomes
//! zero.

use serde::{Deserialize, Deserializer};

/// Parse `text` as a finite `f64`, falling back to `0.0`.
pub fn f64_or_zero(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Parse `text` as a non-negative integer count, falling back to `0`.
///
/// Decimal text such as `"1234.0"` is truncated toward zero.
pub fn u64_or_zero(text: &str) -> u64 {
    let text = text.trim();
    if let Ok(value) = text.parse::<u64>() {
        return value;
    }

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value.trunc() as u64,
        _ => 0,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

/// Deserialize a text field that the API occasionally delivers as a JSON number or `null`.
///
/// Numbers keep their textual form, `null` becomes the empty string.
pub fn de_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        None => String::new(),
        Some(TextOrNumber::Text(text)) => text,
        Some(TextOrNumber::Number(number)) => number.to_string(),
        Some(TextOrNumber::Flag(flag)) => flag.to_string(),
    })
}

/// Deserialize an integer field, treating `null` and numeric text as lenient inputs.
pub fn de_i64_lenient<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        None | Some(TextOrNumber::Flag(_)) => 0,
        Some(TextOrNumber::Number(number)) => number_to_i64(&number).unwrap_or(0),
        Some(TextOrNumber::Text(text)) => text.trim().parse().unwrap_or(0),
    })
}

/// Deserialize an optional integer tag. Flags map to `0`/`1`, and `null` or text that is
/// neither a number nor a flag becomes `None`.
pub fn de_tag_lenient<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        None => None,
        Some(TextOrNumber::Flag(flag)) => Some(i64::from(flag)),
        Some(TextOrNumber::Number(number)) => number_to_i64(&number),
        Some(TextOrNumber::Text(text)) => {
            let text = text.trim();
            match text.parse::<serde_json::Number>() {
                Ok(number) => number_to_i64(&number),
                Err(_) => text.parse::<bool>().ok().map(i64::from),
            }
        }
    })
}

fn number_to_i64(number: &serde_json::Number) -> Option<i64> {
    number
        .as_i64()
        .or_else(|| number.as_f64().filter(|v| v.is_finite()).map(|v| v as i64))
}

/// Deserialize a boolean flag, treating `null` as `false`.
pub fn de_bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TextOrNumber>::deserialize(deserializer)? {
        Some(TextOrNumber::Flag(flag)) => flag,
        Some(TextOrNumber::Text(text)) => text.trim().eq_ignore_ascii_case("true"),
        Some(TextOrNumber::Number(number)) => number.as_i64().is_some_and(|v| v != 0),
        None => false,
    })
}
