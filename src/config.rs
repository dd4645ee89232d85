//! Scheduler configuration (spec §6). A plain struct, not a file-format
//! parser — parsing config files stays an explicit non-goal.

use crate::queue::PriorityType;

/// `queueClass` (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueClass {
    Fifo,
    Priority(PriorityType),
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub preemption_enabled: bool,
    pub keep_scheduling: bool,
    pub keep_scheduling_timeout: usize,
    pub queue_class: QueueClass,
    /// Initial `oversubFactor` for newly constructed nodes.
    pub global_oversub_default: f64,
    /// Fan-out worker pool size (§4.8).
    pub worker_num: usize,
}

impl SchedulerConfig {
    pub const MAX_OVERSUB: f64 = 2.0;
    pub const OVERSUB_SLACK: f64 = 0.9;
    pub const OVERSUB_STEP: f64 = 0.1;
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            preemption_enabled: false,
            keep_scheduling: false,
            keep_scheduling_timeout: 0,
            queue_class: QueueClass::Fifo,
            global_oversub_default: 1.0,
            worker_num: 16,
        }
    }
}
