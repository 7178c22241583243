use std::collections::HashSet;

use thiserror::Error;
use tracing::warn;

use crate::types::{InvalidSample, MetricDescriptor, MetricSample, Sample, ValueType};

pub const ERROR_METRIC_NAME: &str = "snmp_error";
pub const ERROR_METRIC_HELP: &str = "Error calling NewConstMetric";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmitError {
    #[error("inconsistent label cardinality: expected {names} label values but got {values}")]
    ArityMismatch { names: usize, values: usize },
    #[error("{0:?} is not a valid metric name")]
    InvalidMetricName(String),
    #[error("{0:?} is not a valid label name")]
    InvalidLabelName(String),
    #[error("duplicate label name {0:?}")]
    DuplicateLabel(String),
}

/// Assembly failures become an `snmp_error` sample instead of being dropped.
pub fn emit(
    descriptor: &MetricDescriptor,
    label_names: &[String],
    label_values: &[String],
    value: f64,
    index_oids: &[u32],
) -> Sample {
    match assemble(descriptor, label_names, label_values, value) {
        Ok(sample) => Sample::Metric(sample),
        Err(err) => {
            warn!(metric = %descriptor.name, error = %err, "failed to assemble metric sample");
            Sample::Invalid(InvalidSample {
                descriptor: MetricDescriptor::new(
                    ERROR_METRIC_NAME,
                    ERROR_METRIC_HELP,
                    ValueType::Gauge,
                ),
                error: format!(
                    "error for metric {} with labels {:?} from indexOids {:?}: {}",
                    descriptor.name, label_values, index_oids, err
                ),
            })
        }
    }
}

fn assemble(
    descriptor: &MetricDescriptor,
    label_names: &[String],
    label_values: &[String],
    value: f64,
) -> Result<MetricSample, EmitError> {
    if !is_valid_metric_name(&descriptor.name) {
        return Err(EmitError::InvalidMetricName(descriptor.name.clone()));
    }

    let mut seen = HashSet::with_capacity(label_names.len());
    for name in label_names {
        if !is_valid_label_name(name) {
            return Err(EmitError::InvalidLabelName(name.clone()));
        }
        if !seen.insert(name.as_str()) {
            return Err(EmitError::DuplicateLabel(name.clone()));
        }
    }

    if label_names.len() != label_values.len() {
        return Err(EmitError::ArityMismatch {
            names: label_names.len(),
            values: label_values.len(),
        });
    }

    Ok(MetricSample {
        descriptor: descriptor.clone(),
        labels: label_names
            .iter()
            .cloned()
            .zip(label_values.iter().cloned())
            .collect(),
        value,
    })
}

fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_' || first == ':')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with("__")
}
