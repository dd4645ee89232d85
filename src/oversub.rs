//! Oversubscription controller (§4.5): run once at the start of every
//! `Schedule` call, before any pod is considered.

use crate::config::SchedulerConfig;
use crate::metrics::NodeMetricsCache;
use crate::models::Node;

/// Updates every node's `oversub_factor` in place from its metrics
/// snapshot. Nodes absent from `metrics` are left untouched — there is
/// nothing to base a raise or reset on.
pub fn update_oversub_factors<'a>(nodes: impl Iterator<Item = &'a mut Node>, metrics: &NodeMetricsCache) {
    for node in nodes {
        let Some(m) = metrics.get(&node.name) else {
            continue;
        };
        let request_within_slack =
            m.requested.fits_within_scaled(&m.allocatable, SchedulerConfig::OVERSUB_SLACK);
        let usage_within_slack = m.usage.fits_within_scaled(&m.allocatable, SchedulerConfig::OVERSUB_SLACK);
        if !request_within_slack && usage_within_slack {
            node.oversub_factor =
                (node.oversub_factor + SchedulerConfig::OVERSUB_STEP).min(SchedulerConfig::MAX_OVERSUB);
        } else {
            node.oversub_factor = 1.0;
        }
    }
}
