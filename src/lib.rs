//! A discrete-event simulator of a cluster workload scheduler: a pending-pod
//! queue, a filter/prioritize/extend scheduling pipeline, an
//! oversubscription controller, and a preemption subroutine, all driven by
//! a harness that owns the virtual clock and the node fleet.

pub mod clock;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod extender;
pub mod fanout;
pub mod metrics;
pub mod models;
pub mod node_map;
pub mod oversub;
pub mod plugins;
pub mod preemption;
pub mod queue;
pub mod resources;

pub use clock::Tick;
pub use config::{QueueClass, SchedulerConfig};
pub use driver::Driver;
pub use error::ScheduleError;
pub use events::Event;
pub use models::{Node, NodeMetrics, Pod, PodId};
pub use node_map::{NodeInfoMap, NodeLister};
pub use queue::{FifoQueue, PodQueue, PriorityQueue, PriorityType};
pub use resources::ResourceVector;
