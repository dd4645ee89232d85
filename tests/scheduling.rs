//! End-to-end scenarios (spec §8 S1-S6) and boundary behaviors, driving the
//! real `Driver` the way a harness would.

use schedsim::driver::Driver;
use schedsim::events::Event;
use schedsim::extender::{Extender, FilterFitResource};
use schedsim::metrics::NodeMetricsCache;
use schedsim::models::NodeMetrics;
use schedsim::node_map::{NodeInfoMap, StaticNodeList};
use schedsim::plugins::resources_fit::{LeastRequested, MostRequested, PodFitsResources};
use schedsim::plugins::{PredicateRegistry, PrioritizerRegistry};
use schedsim::queue::{FifoQueue, PodQueue};
use schedsim::{Node, Pod, PodId, ResourceVector, SchedulerConfig};

fn node(name: &str, cpu: u64) -> Node {
    Node::new(name, ResourceVector::new(cpu, 0), 1.0)
}

fn pod(name: &str, cpu: u64) -> Pod {
    Pod::new("default", name, ResourceVector::new(cpu, 0), 0, 0)
}

fn lister(nodes: &NodeInfoMap) -> StaticNodeList {
    StaticNodeList(nodes.values().map(|n| n.name.clone()).collect())
}

fn best_fit_driver(extenders: Vec<Box<dyn Extender>>) -> Driver {
    let mut predicates = PredicateRegistry::new();
    predicates.register(Box::new(PodFitsResources));
    let mut prioritizers = PrioritizerRegistry::new();
    prioritizers.register(Box::new(MostRequested), 1);
    Driver::new(SchedulerConfig::default(), predicates, prioritizers, extenders)
}

fn worst_fit_driver() -> Driver {
    let mut predicates = PredicateRegistry::new();
    predicates.register(Box::new(PodFitsResources));
    let mut prioritizers = PrioritizerRegistry::new();
    prioritizers.register(Box::new(LeastRequested), 1);
    Driver::new(SchedulerConfig::default(), predicates, prioritizers, Vec::new())
}

#[tokio::test]
async fn s1_best_fit_prefers_the_fuller_node() {
    let driver = best_fit_driver(Vec::new());
    let mut nodes = NodeInfoMap::new();
    let a = node("A", 10);
    let mut b = node("B", 10);
    b.bind(&pod("prior", 6));
    nodes.insert(a);
    nodes.insert(b);
    let names = lister(&nodes);

    let mut queue = FifoQueue::new();
    queue.push(pod("P", 3)).unwrap();
    let metrics = NodeMetricsCache::new();

    let events = driver
        .schedule(0, &mut queue, &names, &mut nodes, &metrics)
        .await
        .unwrap();

    assert_eq!(
        events,
        vec![Event::Bind {
            pod: PodId::new("default", "P"),
            node_name: "B".to_string(),
        }]
    );
    assert_eq!(nodes.get("B").unwrap().request_sum(), ResourceVector::new(9, 0));
}

#[tokio::test]
async fn s2_worst_fit_prefers_the_emptier_node() {
    let driver = worst_fit_driver();
    let mut nodes = NodeInfoMap::new();
    let a = node("A", 10);
    let mut b = node("B", 10);
    b.bind(&pod("prior", 6));
    nodes.insert(a);
    nodes.insert(b);
    let names = lister(&nodes);

    let mut queue = FifoQueue::new();
    queue.push(pod("P", 3)).unwrap();
    let metrics = NodeMetricsCache::new();

    let events = driver
        .schedule(0, &mut queue, &names, &mut nodes, &metrics)
        .await
        .unwrap();

    assert_eq!(
        events,
        vec![Event::Bind {
            pod: PodId::new("default", "P"),
            node_name: "A".to_string(),
        }]
    );
}

#[tokio::test]
async fn empty_queue_returns_no_events_and_mutates_nothing() {
    let driver = best_fit_driver(Vec::new());
    let mut nodes = NodeInfoMap::new();
    nodes.insert(node("A", 10));
    let names = lister(&nodes);
    let mut queue = FifoQueue::new();
    let metrics = NodeMetricsCache::new();

    let events = driver
        .schedule(0, &mut queue, &names, &mut nodes, &metrics)
        .await
        .unwrap();

    assert!(events.is_empty());
    assert_eq!(nodes.get("A").unwrap().request_sum(), ResourceVector::ZERO);
}

#[tokio::test]
async fn boundary_pod_exactly_fits() {
    let driver = best_fit_driver(Vec::new());
    let mut nodes = NodeInfoMap::new();
    nodes.insert(node("A", 10));
    let names = lister(&nodes);
    let mut queue = FifoQueue::new();
    queue.push(pod("P", 10)).unwrap();
    let metrics = NodeMetricsCache::new();

    let events = driver
        .schedule(0, &mut queue, &names, &mut nodes, &metrics)
        .await
        .unwrap();

    assert_eq!(events.len(), 1);
    assert!(queue.is_empty());
}

#[tokio::test]
async fn boundary_pod_exceeds_allocatable_stays_at_head_without_preemption() {
    let driver = best_fit_driver(Vec::new());
    let mut nodes = NodeInfoMap::new();
    nodes.insert(node("A", 10));
    let names = lister(&nodes);
    let mut queue = FifoQueue::new();
    queue.push(pod("P", 20)).unwrap();
    let metrics = NodeMetricsCache::new();

    let events = driver
        .schedule(0, &mut queue, &names, &mut nodes, &metrics)
        .await
        .unwrap();

    assert!(events.is_empty());
    assert_eq!(queue.front().unwrap().id.name, "P");
}

#[tokio::test]
async fn s5_preemption_minimizes_victim_priority() {
    let mut predicates = PredicateRegistry::new();
    predicates.register(Box::new(PodFitsResources));
    let mut prioritizers = PrioritizerRegistry::new();
    prioritizers.register(Box::new(MostRequested), 1);
    let mut config = SchedulerConfig::default();
    config.preemption_enabled = true;
    let driver = Driver::new(config, predicates, prioritizers, Vec::new());

    let mut nodes = NodeInfoMap::new();
    let mut x = node("X", 10);
    let mut low = pod("low", 10);
    low.priority = 1;
    x.bind(&low);
    let mut y = node("Y", 10);
    let mut high = pod("high-occupant", 10);
    high.priority = 5;
    y.bind(&high);
    nodes.insert(x);
    nodes.insert(y);
    let names = lister(&nodes);

    let mut queue = FifoQueue::new();
    let mut preemptor = pod("preemptor", 10);
    preemptor.priority = 9;
    queue.push(preemptor).unwrap();
    let metrics = NodeMetricsCache::new();

    let events = driver
        .schedule(0, &mut queue, &names, &mut nodes, &metrics)
        .await
        .unwrap();

    assert_eq!(
        events,
        vec![Event::Delete {
            pod: PodId::new("default", "low"),
            node_name: "X".to_string(),
        }]
    );
    assert_eq!(queue.front().unwrap().nominated_node, Some("X".to_string()));
    assert_eq!(queue.len(), 1);
}

#[tokio::test]
async fn s6_extender_usage_aware_rejection() {
    let driver = best_fit_driver(vec![Box::new(FilterFitResource)]);
    let mut nodes = NodeInfoMap::new();
    nodes.insert(node("N", 10));
    let names = lister(&nodes);

    let mut queue = FifoQueue::new();
    queue.push(pod("P", 2)).unwrap();

    let mut metrics = NodeMetricsCache::new();
    metrics.insert(
        "N".to_string(),
        NodeMetrics {
            usage: ResourceVector::new(9, 0),
            allocatable: ResourceVector::new(10, 0),
            requested: ResourceVector::ZERO,
        },
    );

    let events = driver
        .schedule(0, &mut queue, &names, &mut nodes, &metrics)
        .await
        .unwrap();

    assert!(events.is_empty());
    assert_eq!(queue.front().unwrap().id.name, "P");
}
