use std::time::Duration;

use jiff::SpanRelativeTo;

/// Parses "250ms", "2s", "PT1M30S" or a bare millisecond count.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        return Ok(duration.unsigned_abs());
    }

    if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        return Ok(duration.unsigned_abs());
    }

    if let Ok(millis) = input.parse::<u64>() {
        return Ok(Duration::from_millis(millis));
    }

    Err(String::from("Invalid duration"))
}

/// Parses a speed in km/h, rejecting zero, negative and non-finite values.
pub fn parse_speed(input: &str) -> Result<f64, String> {
    let speed: f64 = input.parse().map_err(|_| String::from("Invalid speed"))?;

    if !speed.is_finite() || speed <= 0.0 {
        return Err(String::from("Speed must be a positive number of km/h"));
    }

    Ok(speed)
}
