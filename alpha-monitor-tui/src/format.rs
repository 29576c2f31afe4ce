use chrono::DateTime;
use itertools::{Itertools, MinMaxResult};
use std::time::Duration;

const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// `$0.012300` below one dollar, `$1.20` otherwise.
pub fn price(value: f64) -> String {
    if value < 1.0 {
        format!("${value:.6}")
    } else {
        format!("${value:.2}")
    }
}

/// `$12.35M`
pub fn millions(value: f64) -> String {
    format!("${:.2}M", value / 1_000_000.0)
}

/// Short compact notation: `950`, `1.5K`, `12M`, `3.4B`.
pub fn compact(value: f64) -> String {
    const SCALES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

    let magnitude = value.abs();
    let Some((scale, suffix)) = SCALES.iter().find(|(scale, _)| magnitude >= *scale) else {
        return trim_decimal(format!("{value:.2}"));
    };

    let scaled = value / scale;
    if scaled.abs() < 10.0 {
        format!("{}{suffix}", trim_decimal(format!("{scaled:.1}")))
    } else {
        format!("{scaled:.0}{suffix}")
    }
}

/// Integer with thousands separators: `15,234`.
pub fn thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

/// Decimal with thousands separators and at most two fraction digits: `456,789.33`.
pub fn decimal_thousands(value: f64) -> String {
    let text = format!("{:.2}", value.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    let sign = if value < 0.0 { "-" } else { "" };

    if fraction.is_empty() {
        format!("{sign}{}", group_digits(integer))
    } else {
        format!("{sign}{}.{fraction}", group_digits(integer))
    }
}

/// Signed 24h change built from the API text, `+` prefixed when positive.
pub fn change(text: &str, value: f64) -> String {
    let text = text.trim();
    let text = if text.is_empty() { "0" } else { text };
    let sign = if value > 0.0 && !text.starts_with('+') { "+" } else { "" };
    format!("{sign}{text}%")
}

/// `0x1234...abcd`
pub fn short_address(address: &str) -> String {
    let chars = address.chars().collect::<Vec<_>>();
    if chars.len() <= 10 {
        return address.to_string();
    }

    let head = chars[..6].iter().collect::<String>();
    let tail = chars[chars.len() - 4..].iter().collect::<String>();
    format!("{head}...{tail}")
}

/// `5 min`, or seconds for periods that are not whole minutes.
pub fn interval(period: Duration) -> String {
    let secs = period.as_secs();
    if secs % 60 == 0 {
        format!("{} min", secs / 60)
    } else {
        format!("{secs} s")
    }
}

/// Listing date from epoch milliseconds, `-` when absent.
pub fn listing_date(epoch_ms: i64) -> String {
    match DateTime::from_timestamp_millis(epoch_ms) {
        Some(listed) if epoch_ms > 0 => listed.format("%Y-%m-%d").to_string(),
        _ => "-".to_string(),
    }
}

/// Inline block-glyph sparkline of the last `width` values, scaled between their min and max.
pub fn sparkline(values: &[f64], width: usize) -> String {
    let window = &values[values.len().saturating_sub(width)..];

    match window.iter().copied().minmax() {
        MinMaxResult::NoElements => "·".to_string(),
        MinMaxResult::OneElement(_) => SPARK_GLYPHS[3].to_string(),
        MinMaxResult::MinMax(min, max) => window
            .iter()
            .map(|value| {
                let level = scale(*value, min, max, (SPARK_GLYPHS.len() - 1) as f64);
                SPARK_GLYPHS[level as usize]
            })
            .collect(),
    }
}

/// Bar heights in `1..=100` for a ratatui `Sparkline`, scaled between min and max.
///
/// A flat series renders at mid height.
pub fn bars(values: &[f64]) -> Vec<u64> {
    match values.iter().copied().minmax() {
        MinMaxResult::NoElements => Vec::new(),
        MinMaxResult::OneElement(_) => vec![50],
        MinMaxResult::MinMax(min, max) if max <= min => vec![50; values.len()],
        MinMaxResult::MinMax(min, max) => values
            .iter()
            .map(|value| 1 + scale(*value, min, max, 99.0) as u64)
            .collect(),
    }
}

fn scale(value: f64, min: f64, max: f64, top: f64) -> f64 {
    if max <= min {
        return (top / 2.0).floor();
    }
    (((value - min) / (max - min)) * top).round().clamp(0.0, top)
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    digits
        .chars()
        .enumerate()
        .fold(String::with_capacity(len + len / 3), |mut out, (index, digit)| {
            if index > 0 && (len - index) % 3 == 0 {
                out.push(',');
            }
            out.push(digit);
            out
        })
}

fn trim_decimal(text: String) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}
