use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Counter,
    #[default]
    Gauge,
}

impl ValueType {
    pub fn as_prometheus_type(&self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Gauge => "gauge",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDescriptor {
    pub name: String,
    #[serde(default)]
    pub help: String,
    #[serde(default)]
    pub value_type: ValueType,
}

impl MetricDescriptor {
    pub fn new(name: impl Into<String>, help: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            value_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub descriptor: MetricDescriptor,
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

impl MetricSample {
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidSample {
    pub descriptor: MetricDescriptor,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Metric(MetricSample),
    Invalid(InvalidSample),
}

impl Sample {
    pub fn name(&self) -> &str {
        match self {
            Self::Metric(sample) => &sample.descriptor.name,
            Self::Invalid(sample) => &sample.descriptor.name,
        }
    }

    pub fn as_metric(&self) -> Option<&MetricSample> {
        match self {
            Self::Metric(sample) => Some(sample),
            Self::Invalid(_) => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}
