use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct WalkParams {
    pub version: u8,
    pub max_repetitions: u32,
    pub retries: u32,
    pub timeout_millis: u64,
    pub use_unconnected_udp_socket: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub community: Option<String>,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            version: 2,
            max_repetitions: 25,
            retries: 3,
            timeout_millis: 5_000,
            use_unconnected_udp_socket: false,
            community: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub label_name: String,
    #[serde(rename = "type")]
    pub index_type: String,
    #[serde(default)]
    pub fixed_size: u32,
    #[serde(default)]
    pub implied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub name: String,
    pub oid: String,
    #[serde(rename = "type")]
    pub metric_type: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub indexes: Vec<IndexSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub walk: Vec<String>,
    #[serde(default)]
    pub get: Vec<String>,
    pub metrics: Vec<MetricSpec>,
    #[serde(default)]
    pub walk_params: WalkParams,
}

impl ModuleDescriptor {
    pub fn single_lookup(
        module_name: &str,
        oid: &str,
        metric_name: &str,
        walk_params: WalkParams,
    ) -> Self {
        Self {
            name: module_name.to_string(),
            walk: vec![oid.to_string()],
            get: Vec::new(),
            metrics: vec![MetricSpec {
                name: metric_name.to_string(),
                oid: oid.to_string(),
                metric_type: "OctetString".to_string(),
                help: String::new(),
                indexes: vec![IndexSpec {
                    label_name: metric_name.to_string(),
                    index_type: "gauge".to_string(),
                    fixed_size: 0,
                    implied: false,
                }],
            }],
            walk_params,
        }
    }
}
