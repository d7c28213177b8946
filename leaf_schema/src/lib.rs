//! Data contracts for the LEAF network viewer: element ids, type tags and the
//! time-sliced infrastructure topology.

mod ids;
mod infrastructure;
mod topology;

pub use ids::{
    is_edge_id, split_edge_id, ElementId, ElementKind, ElementType, TimeKey, EDGE_SEPARATOR,
    FOG_MARKER, FOG_NODE_TYPE,
};
pub use infrastructure::{
    InfrastructureFile, InfrastructureLink, InfrastructureNode, InfrastructureSlice,
};
pub use topology::{
    InfrastructureTimeline, Position, TopologyEdge, TopologyError, TopologyNode, TopologySlice,
    TopologyStore,
};
