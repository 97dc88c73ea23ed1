//! `Cooldown`/`BBCooldown`: blocks re-entry into the child for a window
//! after it last ran, persisting a `cooling` flag across start/finish cycles
//! so a re-`start` that lands mid-window can wait it out instead of racing
//! the child again immediately.

use crate::node::Action;
use crate::util::duration::jittered;
use crate::ConstString;
use std::time::Duration;

/// `start` was called. If the window isn't currently in force, open it (and,
/// unless the window counts from the child's own finish, start the timer
/// right away) and start the child. If the window is already in force,
/// either fail outright (`fail_on_cool_down`) or sit quietly — the decorator
/// stays `Active` with no child running until the pending timer's `on_timer`
/// fires and decides whether to let it through.
#[must_use]
pub fn on_start(child: &ConstString, cooling: bool, window: Duration, deviation: Duration, start_after_decorated: bool, fail_on_cool_down: bool) -> (bool, std::vec::Vec<Action>) {
    if !cooling {
        let mut actions = std::vec::Vec::new();
        if !start_after_decorated {
            actions.push(Action::ScheduleTimer(jittered(window, deviation)));
        }
        actions.push(Action::StartChild(child.clone()));
        return (true, actions);
    }
    if fail_on_cool_down {
        (cooling, std::vec![Action::Finish(false)])
    } else {
        (cooling, std::vec::Vec::new())
    }
}

/// `abort` was called: drop the cooldown unconditionally and stop any
/// pending timer. The caller is still responsible for forwarding the abort
/// to the child.
#[must_use]
pub fn on_abort() -> (bool, std::vec::Vec<Action>) {
    (false, std::vec![Action::StopTimer])
}

/// The child finished. On a failure that resets the cooldown, drop it and
/// stop any pending timer so the next `start` runs immediately. Otherwise,
/// if the window counts from the child's finish rather than its start, open
/// the timer now. Either way the decorator's own result is the child's.
#[must_use]
pub fn on_child_finished(succeeded: bool, cooling: bool, window: Duration, deviation: Duration, reset_on_failure: bool, start_after_decorated: bool) -> (bool, std::vec::Vec<Action>) {
    if !succeeded && reset_on_failure {
        return (false, std::vec![Action::StopTimer, Action::Finish(succeeded)]);
    }
    let mut actions = std::vec::Vec::new();
    if start_after_decorated {
        actions.push(Action::ScheduleTimer(jittered(window, deviation)));
    }
    actions.push(Action::Finish(succeeded));
    (cooling, actions)
}

/// The cooldown timer fired. If the decorator is still `Active` with no
/// child running (a `start` landed mid-window and is waiting it out), let it
/// through now and open a fresh window for the run that's about to happen.
/// Otherwise the window has simply elapsed with nothing waiting: close it.
#[must_use]
pub fn on_timer(child: &ConstString, decorator_active: bool, child_active: bool, window: Duration, deviation: Duration) -> (bool, std::vec::Vec<Action>) {
    if decorator_active && !child_active {
        (true, std::vec![Action::ScheduleTimer(jittered(window, deviation)), Action::StartChild(child.clone())])
    } else {
        (false, std::vec::Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child() -> ConstString {
        ConstString::from("c")
    }

    #[test]
    fn opens_the_window_and_starts_the_child_when_not_cooling() {
        let (cooling, actions) = on_start(&child(), false, Duration::from_secs(1), Duration::ZERO, false, false);
        assert!(cooling);
        assert_eq!(actions, std::vec![Action::ScheduleTimer(Duration::from_secs(1)), Action::StartChild(child())]);
    }

    #[test]
    fn start_after_decorated_defers_the_timer_past_start() {
        let (cooling, actions) = on_start(&child(), false, Duration::from_secs(1), Duration::ZERO, true, false);
        assert!(cooling);
        assert_eq!(actions, std::vec![Action::StartChild(child())]);
    }

    #[test]
    fn fails_immediately_mid_cooldown_when_configured_to() {
        let (cooling, actions) = on_start(&child(), true, Duration::from_secs(1), Duration::ZERO, false, true);
        assert!(cooling);
        assert_eq!(actions, std::vec![Action::Finish(false)]);
    }

    #[test]
    fn waits_quietly_mid_cooldown_by_default() {
        let (cooling, actions) = on_start(&child(), true, Duration::from_secs(1), Duration::ZERO, false, false);
        assert!(cooling);
        assert!(actions.is_empty());
    }

    #[test]
    fn failure_with_reset_on_failure_drops_the_window() {
        let (cooling, actions) = on_child_finished(false, true, Duration::from_secs(1), Duration::ZERO, true, false);
        assert!(!cooling);
        assert_eq!(actions, std::vec![Action::StopTimer, Action::Finish(false)]);
    }

    #[test]
    fn start_after_decorated_opens_the_timer_on_finish() {
        let (cooling, actions) = on_child_finished(true, true, Duration::from_secs(1), Duration::ZERO, true, true);
        assert!(cooling);
        assert_eq!(actions, std::vec![Action::ScheduleTimer(Duration::from_secs(1)), Action::Finish(true)]);
    }

    #[test]
    fn timer_restarts_a_waiting_entry() {
        let (cooling, actions) = on_timer(&child(), true, false, Duration::from_secs(1), Duration::ZERO);
        assert!(cooling);
        assert_eq!(actions, std::vec![Action::ScheduleTimer(Duration::from_secs(1)), Action::StartChild(child())]);
    }

    #[test]
    fn timer_just_closes_the_window_otherwise() {
        let (cooling, actions) = on_timer(&child(), false, false, Duration::from_secs(1), Duration::ZERO);
        assert!(!cooling);
        assert!(actions.is_empty());
    }
}
