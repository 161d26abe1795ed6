//! Human-friendly rendering of forecast records.
//!
//! Records are opaque JSON objects; each line shows whatever of time, star
//! rating, swell and wind the record actually contains.

use std::fmt::Write;

use chrono::DateTime;
use msw_core::ForecastEntry;
use serde_json::Value;

pub fn summary(forecast: &[ForecastEntry]) -> String {
    if forecast.is_empty() {
        return "No forecast entries returned.\n".to_string();
    }

    let mut out = String::new();
    for entry in forecast {
        let _ = writeln!(out, "{}", line(entry));
    }
    out
}

fn line(entry: &ForecastEntry) -> String {
    let parts: Vec<String> = [time(entry), rating(entry), swell(entry), wind(entry)]
        .into_iter()
        .flatten()
        .collect();

    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join("  ")
    }
}

fn time(entry: &ForecastEntry) -> Option<String> {
    let ts = entry
        .get("localTimestamp")
        .or_else(|| entry.get("timestamp"))
        .and_then(Value::as_i64)?;

    DateTime::from_timestamp(ts, 0).map(|dt| dt.format("%a %d %b %H:%M").to_string())
}

/// Ratings are on a five-star scale; larger values are clamped.
fn rating(entry: &ForecastEntry) -> Option<String> {
    const MAX_STARS: usize = 5;

    let solid = entry.get("solidRating").and_then(Value::as_u64);
    let faded = entry.get("fadedRating").and_then(Value::as_u64);
    if solid.is_none() && faded.is_none() {
        return None;
    }

    let count = |v: Option<u64>| {
        usize::try_from(v.unwrap_or(0)).map_or(MAX_STARS, |n| n.min(MAX_STARS))
    };
    let solid = count(solid);
    let faded = count(faded).min(MAX_STARS - solid);

    let stars = "★".repeat(solid) + &"☆".repeat(faded);
    Some(format!("{stars:<5}"))
}

fn swell(entry: &ForecastEntry) -> Option<String> {
    let swell = entry.get("swell")?;
    let min = swell.get("minBreakingHeight").and_then(Value::as_f64)?;
    let max = swell.get("maxBreakingHeight").and_then(Value::as_f64)?;
    let unit = swell.get("unit").and_then(Value::as_str).unwrap_or("");

    Some(format!("swell {min}-{max}{unit}"))
}

fn wind(entry: &ForecastEntry) -> Option<String> {
    let wind = entry.get("wind")?;
    let speed = wind.get("speed").and_then(Value::as_f64)?;
    let unit = wind.get("unit").and_then(Value::as_str).unwrap_or("");

    match wind.get("compassDirection").and_then(Value::as_str) {
        Some(dir) => Some(format!("wind {speed}{unit} {dir}")),
        None => Some(format!("wind {speed}{unit}")),
    }
}
