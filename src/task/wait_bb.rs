//! `WaitBB`: like [`super::wait`], but the wait duration is read from a
//! blackboard key at `start` rather than fixed in config. Grounded in
//! `task/waitbb.go`.

use crate::node::Action;
use crate::util::duration::{jittered, parse as parse_duration_literal};
use std::time::Duration;

/// Parse a blackboard value into a duration: an integer is nanoseconds, a
/// string is parsed as a Go-style duration literal (`"1.5s"`, `"200ms"`), and
/// anything else fails.
#[must_use]
pub fn parse_duration(raw: &str) -> Option<Duration> {
    if let Ok(nanos) = raw.parse::<u64>() {
        return Some(Duration::from_nanos(nanos));
    }
    parse_duration_literal(raw)
}

/// Start: read the duration key. Missing or unparseable, per the original's
/// "default to not waiting": finish immediately with success. Otherwise arm
/// a timer for `duration ± deviation/2`.
#[must_use]
pub fn on_start(raw: Option<&str>, deviation: Duration) -> std::vec::Vec<Action> {
    let Some(duration) = raw.and_then(parse_duration) else {
        tracing::error!(?raw, "WaitBB: blackboard key did not hold a parseable duration");
        return std::vec![Action::Finish(true)];
    };
    std::vec![Action::ScheduleTimer(jittered(duration, deviation))]
}

/// The timer fired: succeed.
#[must_use]
pub fn on_timer() -> std::vec::Vec<Action> {
    std::vec![Action::Finish(true)]
}

/// Aborted before the timer fired: stop it and finish with `result_on_abort`.
#[must_use]
pub fn on_abort(result_on_abort: bool) -> std::vec::Vec<Action> {
    std::vec![Action::StopTimer, Action::Finish(result_on_abort)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_nanoseconds() {
        assert_eq!(parse_duration("1500000000"), Some(Duration::from_nanos(1_500_000_000)));
    }

    #[test]
    fn parses_duration_strings() {
        assert_eq!(parse_duration("200ms"), Some(Duration::from_millis(200)));
    }

    #[test]
    fn missing_key_defaults_to_immediate_success() {
        let actions = on_start(None, Duration::ZERO);
        assert_eq!(actions, std::vec![Action::Finish(true)]);
    }

    #[test]
    fn unparseable_key_defaults_to_immediate_success() {
        let actions = on_start(Some("not-a-duration"), Duration::ZERO);
        assert_eq!(actions, std::vec![Action::Finish(true)]);
    }

    #[test]
    fn valid_key_arms_a_timer() {
        let actions = on_start(Some("500ms"), Duration::ZERO);
        assert_eq!(actions, std::vec![Action::ScheduleTimer(Duration::from_millis(500))]);
    }
}
