//! The only outputs `Schedule` produces (spec §6): no other state is
//! mutated in the outside world by the core.

use crate::models::PodId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Bind { pod: PodId, node_name: String },
    Delete { pod: PodId, node_name: String },
}
