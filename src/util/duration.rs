//! Jitter helper used by the timer wheel and by `Cooldown`/`Service` decorators.

use core::time::Duration;
use rand::Rng;

/// Apply `delay ± deviation/2`, clamped to zero, sampling uniformly.
///
/// A `deviation` of zero returns `delay` unchanged.
pub fn jittered(delay: Duration, deviation: Duration) -> Duration {
    if deviation.is_zero() {
        return delay;
    }
    let half = deviation.as_secs_f64() / 2.0;
    let offset = rand::rng().random_range(-half..=half);
    let secs = (delay.as_secs_f64() + offset).max(0.0);
    Duration::from_secs_f64(secs)
}

/// Parse a Go-style duration literal (`"200ms"`, `"1.5s"`, `"2m"`), as used
/// by blackboard-driven durations (`WaitBB`, `BBCooldown`) and config
/// `properties` blobs. Accepts a bare unit suffix of `ns`, `us`/`µs`, `ms`,
/// `s`, `m`, or `h`; the numeric part may be fractional.
#[must_use]
pub fn parse(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let split_at = raw.rfind(|c: char| c.is_ascii_digit() || c == '.')?;
    let (number, unit) = raw.split_at(split_at + 1);
    let value: f64 = number.parse().ok()?;
    if value < 0.0 {
        return None;
    }
    let secs = match unit.trim() {
        "ns" => value / 1e9,
        "us" | "µs" => value / 1e6,
        "ms" => value / 1e3,
        "s" => value,
        "m" => value * 60.0,
        "h" => value * 3600.0,
        _ => return None,
    };
    Some(Duration::from_secs_f64(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_unit_suffixes() {
        assert_eq!(parse("200ms"), Some(Duration::from_millis(200)));
        assert_eq!(parse("1.5s"), Some(Duration::from_millis(1500)));
        assert_eq!(parse("2m"), Some(Duration::from_secs(120)));
    }

    #[test]
    fn rejects_unknown_units_and_negatives() {
        assert_eq!(parse("5 bananas"), None);
        assert_eq!(parse("-1s"), None);
    }

    #[test]
    fn zero_deviation_is_exact() {
        let d = Duration::from_secs(5);
        assert_eq!(jittered(d, Duration::ZERO), d);
    }

    #[test]
    fn jitter_stays_within_bounds_and_non_negative() {
        let delay = Duration::from_millis(200);
        let deviation = Duration::from_millis(400);
        for _ in 0..200 {
            let got = jittered(delay, deviation);
            assert!(got >= Duration::ZERO);
            assert!(got <= delay + deviation / 2);
        }
    }
}
