//! Task (leaf) node classes (spec §4.5): no children, drive external state
//! through a delegate and/or script.

pub mod action;
pub mod wait;
pub mod wait_bb;

use crate::ConstString;

/// `Action`: dispatches its delegate/script once per `start`, and again on
/// every `on_delegate_result` callback until the delegate reports a finished
/// result.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionConfig;

/// `Wait`: succeeds after `wait_time ± deviation/2`, or never if `forever`
/// (the timer is never armed; the node only ever finishes via abort).
#[derive(Debug, Clone, Copy)]
pub struct WaitConfig {
    pub wait_time: std::time::Duration,
    pub deviation: std::time::Duration,
    pub forever: bool,
    /// What an external abort reports as the node's result.
    pub result_on_abort: bool,
}

/// `WaitBB`: like `Wait`, but the duration is read from a blackboard key at
/// `start` instead of being fixed in config.
#[derive(Debug, Clone)]
pub struct WaitBbConfig {
    pub duration_key: ConstString,
    pub deviation: std::time::Duration,
    pub result_on_abort: bool,
}
