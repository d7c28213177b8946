//! Loader for the infrastructure file exported by the LEAF simulator.
//!
//! The file maps each decimal time key to the nodes and links present at that
//! time:
//!
//! ```json
//! { "100": { "nodes": [{ "id": "taxi_1", "class": "Taxi", "x": 0.5, "y": 1.0 }],
//!            "links": [{ "id": "taxi_1$traffic_1", "class": "LinkWifiTaxiToTrafficLight" }] } }
//! ```

use std::collections::BTreeMap;
use std::{fs, path::Path};

use schemars::{schema::RootSchema, schema_for, JsonSchema};
use serde::Deserialize;

use crate::ids::{ElementId, TimeKey};
use crate::topology::{InfrastructureTimeline, TopologyError, TopologyNode, TopologySlice};

/// Raw infrastructure document keyed by decimal time.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct InfrastructureFile(pub BTreeMap<String, InfrastructureSlice>);

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InfrastructureSlice {
    pub nodes: Vec<InfrastructureNode>,
    pub links: Vec<InfrastructureLink>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InfrastructureNode {
    pub id: String,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct InfrastructureLink {
    pub id: String,
    #[serde(default)]
    pub class: Option<String>,
}

impl InfrastructureFile {
    pub fn from_json_str(json: &str) -> Result<Self, TopologyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// JSON Schema describing the infrastructure document.
    pub fn json_schema() -> RootSchema {
        schema_for!(InfrastructureFile)
    }

    /// Validate every slice and assemble the timeline.
    pub fn into_timeline(self) -> Result<InfrastructureTimeline, TopologyError> {
        let mut slices = Vec::with_capacity(self.0.len());
        for (raw_key, slice) in self.0 {
            let time = raw_key
                .parse::<TimeKey>()
                .map_err(|_| TopologyError::InvalidTimeKey(raw_key.clone()))?;
            slices.push(slice.into_slice(time)?);
        }
        InfrastructureTimeline::from_slices(slices)
    }
}

impl InfrastructureSlice {
    fn into_slice(self, time: TimeKey) -> Result<TopologySlice, TopologyError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(|node| {
                let mut topo = TopologyNode::new(node.id);
                topo.class = node.class;
                // a position needs both coordinates
                if let (Some(x), Some(y)) = (node.x, node.y) {
                    topo = topo.with_position(x, y);
                }
                topo
            })
            .collect();
        let edges = self
            .links
            .into_iter()
            .map(|link| (ElementId::from(link.id), link.class))
            .collect();
        TopologySlice::new(time, nodes, edges)
    }
}

impl InfrastructureTimeline {
    pub fn from_json_str(json: &str) -> Result<Self, TopologyError> {
        InfrastructureFile::from_json_str(json)?.into_timeline()
    }

    pub fn from_file(path: &Path) -> Result<Self, TopologyError> {
        let contents = fs::read_to_string(path).map_err(|source| TopologyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::TopologyStore;

    const SAMPLE: &str = r#"{
        "200": {
            "nodes": [{ "id": "taxi_1", "class": "Taxi" }, { "id": "traffic_1" }],
            "links": []
        },
        "100": {
            "nodes": [
                { "id": "taxi_1", "class": "Taxi", "x": 1.0, "y": 2.0 },
                { "id": "traffic_1", "class": "TrafficLight", "x": 3.0 }
            ],
            "links": [{ "id": "taxi_1$traffic_1", "class": "LinkWifiTaxiToTrafficLight" }]
        }
    }"#;

    #[test]
    fn parses_slices_in_numeric_order() {
        let timeline = InfrastructureTimeline::from_json_str(SAMPLE).expect("valid file");
        assert_eq!(timeline.time_keys(), &[TimeKey(100), TimeKey(200)]);

        let first = timeline.slice(TimeKey(100)).expect("slice 100");
        assert_eq!(first.nodes().len(), 2);
        assert_eq!(first.edges().len(), 1);
        assert!(first.node("taxi_1").and_then(|n| n.position).is_some());
        // only one coordinate present
        assert!(first.node("traffic_1").and_then(|n| n.position).is_none());
        assert_eq!(
            first.edges()[0].class.as_deref(),
            Some("LinkWifiTaxiToTrafficLight")
        );
    }

    #[test]
    fn rejects_malformed_link_ids_at_load_time() {
        let json = r#"{ "100": { "nodes": [{ "id": "a" }, { "id": "b" }], "links": [{ "id": "a-b" }] } }"#;
        let err = InfrastructureTimeline::from_json_str(json).expect_err("malformed link");
        assert!(matches!(err, TopologyError::MalformedEdgeId { .. }));
    }

    #[test]
    fn rejects_non_numeric_time_keys() {
        let json = r#"{ "later": { "nodes": [] } }"#;
        let err = InfrastructureTimeline::from_json_str(json).expect_err("bad key");
        assert!(matches!(err, TopologyError::InvalidTimeKey(ref key) if key == "later"));
    }

    #[test]
    fn schema_describes_nodes_and_links() {
        let schema = serde_json::to_string(&InfrastructureFile::json_schema()).expect("schema");
        assert!(schema.contains("InfrastructureNode"));
        assert!(schema.contains("links"));
    }
}
