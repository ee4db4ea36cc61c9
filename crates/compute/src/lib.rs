pub mod algorithms;
pub mod assessment;
pub mod engine;
pub mod health;
pub mod stats;

pub use algorithms::degree::DegreeInfo;
pub use assessment::{Assessment, StatsFault};
pub use engine::{build_graph, build_graph_with, ComputeEngine, GraphReport};
pub use health::{assess_org_health, compute_org_health, HealthComponents, HealthScore};
pub use stats::{Cluster, NodeMetrics, Stats, TopConnector, TOP_CONNECTOR_LIMIT};
