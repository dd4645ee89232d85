//! The scheduling driver (§4.6): per-tick loop of dequeue → filter →
//! prioritize → extend → select → bind, or preempt.

use std::collections::HashMap;
use std::sync::Arc;

use crate::clock::Tick;
use crate::config::SchedulerConfig;
use crate::error::ScheduleError;
use crate::events::Event;
use crate::extender::Extender;
use crate::fanout::fan_out;
use crate::metrics::NodeMetricsCache;
use crate::models::{Node, Pod};
use crate::node_map::{NodeInfoMap, NodeLister};
use crate::oversub::update_oversub_factors;
use crate::plugins::{PredicateRegistry, PrioritizerRegistry};
use crate::preemption::preempt;
use crate::queue::PodQueue;

pub struct Driver {
    config: SchedulerConfig,
    predicates: Arc<PredicateRegistry>,
    prioritizers: Arc<PrioritizerRegistry>,
    extenders: Vec<Box<dyn Extender>>,
}

impl Driver {
    pub fn new(
        config: SchedulerConfig,
        predicates: PredicateRegistry,
        prioritizers: PrioritizerRegistry,
        extenders: Vec<Box<dyn Extender>>,
    ) -> Self {
        Self {
            config,
            predicates: Arc::new(predicates),
            prioritizers: Arc::new(prioritizers),
            extenders,
        }
    }

    /// `Schedule(clock, queue, nodeLister, nodeInfoMap) -> ([]Event, error)`.
    pub async fn schedule(
        &self,
        clock: Tick,
        queue: &mut dyn PodQueue,
        node_lister: &dyn NodeLister,
        nodes: &mut NodeInfoMap,
        metrics: &NodeMetricsCache,
    ) -> Result<Vec<Event>, ScheduleError> {
        update_oversub_factors(nodes.values_mut(), metrics);

        let mut events = Vec::new();
        let mut fail_queue: Vec<Pod> = Vec::new();
        let mut fatal: Option<ScheduleError> = None;

        loop {
            let pod = match queue.front() {
                Ok(pod) => pod.clone(),
                Err(ScheduleError::EmptyQueue) => break,
                Err(e) => {
                    fatal = Some(e);
                    break;
                }
            };

            match self.schedule_one(clock, &pod, node_lister, nodes, metrics).await {
                Ok(host) => {
                    queue.pop()?;
                    queue.remove_nominated_node(&pod.id);
                    match nodes.get_mut(&host) {
                        Some(node) => {
                            node.bind(&pod);
                        }
                        None => {
                            fatal = Some(ScheduleError::UnknownNode(host));
                            break;
                        }
                    }
                    log::debug!("bound pod {} to node {}", pod.id, host);
                    events.push(Event::Bind {
                        pod: pod.id.clone(),
                        node_name: host,
                    });
                }
                Err(err @ ScheduleError::FitError { .. }) if self.config.preemption_enabled => {
                    if let Some(outcome) = preempt(&pod, &err, nodes) {
                        queue.update_nominated_node(&pod.id, outcome.node_name.clone());
                        queue.clear_lower_priority_nominations(&outcome.node_name, pod.priority);
                        for victim in outcome.victims {
                            events.push(Event::Delete {
                                pod: victim,
                                node_name: outcome.node_name.clone(),
                            });
                        }
                    }
                    // Victims must terminate before the preemptor can bind.
                    break;
                }
                Err(ScheduleError::FitError { .. }) if self.config.keep_scheduling => {
                    let popped = queue.pop()?;
                    fail_queue.push(popped);
                    if fail_queue.len() > self.config.keep_scheduling_timeout {
                        break;
                    }
                }
                Err(ScheduleError::FitError { pod: pod_id, node_count, .. }) => {
                    log::trace!(
                        "pod {} did not fit any of {} node(s); staying at head",
                        pod_id,
                        node_count
                    );
                    break;
                }
                Err(other) => {
                    fatal = Some(other);
                    break;
                }
            }
        }

        // §4.6 step 3: drain the fail-queue back into the pending queue,
        // preserving order, regardless of how the loop above ended.
        for pod in fail_queue {
            queue.push(pod)?;
        }

        match fatal {
            Some(err) => Err(err),
            None => Ok(events),
        }
    }

    async fn schedule_one(
        &self,
        _clock: Tick,
        pod: &Pod,
        node_lister: &dyn NodeLister,
        nodes: &NodeInfoMap,
        metrics: &NodeMetricsCache,
    ) -> Result<String, ScheduleError> {
        let names = node_lister.list();
        if names.is_empty() {
            return Err(ScheduleError::NoNodesAvailable);
        }

        let snapshot: Arc<[Node]> = Arc::from(
            names
                .iter()
                .filter_map(|name| nodes.get(name).cloned())
                .collect::<Vec<_>>(),
        );

        let predicates = Arc::clone(&self.predicates);
        let filter_pod = pod.clone();
        let filter_results = fan_out(Arc::clone(&snapshot), self.config.worker_num, move |_, node| {
            predicates.evaluate(&filter_pod, node)
        })
        .await;

        let mut failed = HashMap::new();
        let mut filtered_nodes: Vec<Node> = Vec::new();
        for (node, result) in snapshot.iter().zip(filter_results.into_iter()) {
            if result.fits {
                filtered_nodes.push(node.clone());
            } else {
                failed.insert(node.name.clone(), result.reason);
            }
        }

        if filtered_nodes.is_empty() {
            return Err(ScheduleError::FitError {
                pod: pod.id.clone(),
                node_count: snapshot.len(),
                failed,
            });
        }

        let prioritizers = Arc::clone(&self.prioritizers);
        let score_pod = pod.clone();
        let filtered_arc: Arc<[Node]> = Arc::from(filtered_nodes.clone());
        let base_scores = fan_out(Arc::clone(&filtered_arc), self.config.worker_num, move |_, node| {
            prioritizers.score(&score_pod, node)
        })
        .await;

        let mut scores: HashMap<String, u32> = filtered_nodes
            .iter()
            .zip(base_scores)
            .map(|(node, score)| (node.name.clone(), score))
            .collect();
        let mut candidates: Vec<String> = filtered_nodes.iter().map(|n| n.name.clone()).collect();
        let mut candidate_nodes = filtered_nodes;

        for extender in &self.extenders {
            let survivors = extender.filter(pod, &candidate_nodes, metrics);
            candidates.retain(|name| survivors.contains(name));
            candidate_nodes.retain(|node| candidates.contains(&node.name));
            if candidates.is_empty() {
                failed
                    .entry("*".to_string())
                    .or_insert_with(|| format!("rejected by extender {}", extender.name()));
                return Err(ScheduleError::FitError {
                    pod: pod.id.clone(),
                    node_count: snapshot.len(),
                    failed,
                });
            }
            let ext_scores = extender.prioritize(pod, &candidate_nodes, metrics);
            for name in &candidates {
                if let Some(score) = ext_scores.get(name) {
                    *scores.entry(name.clone()).or_insert(0) += score;
                }
            }
        }

        select_host(&candidates, &scores).ok_or_else(|| ScheduleError::FitError {
            pod: pod.id.clone(),
            node_count: snapshot.len(),
            failed,
        })
    }
}

/// The last node at the max score wins (§4.3, §8 boundary behavior 10) — a
/// deliberate departure from round-robin that makes best-fit deterministic.
fn select_host(candidates: &[String], scores: &HashMap<String, u32>) -> Option<String> {
    let mut best: Option<(&str, u32)> = None;
    for name in candidates {
        let score = *scores.get(name).unwrap_or(&0);
        match best {
            Some((_, best_score)) if score < best_score => {}
            _ => best = Some((name, score)),
        }
    }
    best.map(|(name, _)| name.to_string())
}
