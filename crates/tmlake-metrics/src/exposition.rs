use chrono::{DateTime, Utc};

use crate::types::{MetricDescriptor, MetricSample, Sample};

pub fn render(samples: &[Sample], timestamp: Option<DateTime<Utc>>) -> String {
    let suffix = timestamp
        .map(|ts| format!(" {}", ts.timestamp_millis()))
        .unwrap_or_default();
    let mut output = String::new();

    for (descriptor, group) in group_by_name(samples) {
        output.push_str(&format!(
            "# HELP {name} {help}\n# TYPE {name} {kind}\n",
            name = descriptor.name,
            help = escape_help(&descriptor.help),
            kind = descriptor.value_type.as_prometheus_type(),
        ));

        for sample in group {
            output.push_str(&format!(
                "{}{} {}{}\n",
                descriptor.name,
                label_set(&sample.labels),
                format_metric_value(sample.value),
                suffix,
            ));
        }
    }

    let errors = samples.iter().filter_map(|sample| match sample {
        Sample::Invalid(invalid) => Some(invalid),
        Sample::Metric(_) => None,
    });
    for invalid in errors {
        output.push_str(&format!(
            "# ERROR {}: {}\n",
            invalid.descriptor.name,
            escape_help(&invalid.error)
        ));
    }

    output
}

fn group_by_name(samples: &[Sample]) -> Vec<(&MetricDescriptor, Vec<&MetricSample>)> {
    let mut groups: Vec<(&MetricDescriptor, Vec<&MetricSample>)> = Vec::new();

    for sample in samples.iter().filter_map(Sample::as_metric) {
        match groups
            .iter_mut()
            .find(|(descriptor, _)| descriptor.name == sample.descriptor.name)
        {
            Some((_, group)) => group.push(sample),
            None => groups.push((&sample.descriptor, vec![sample])),
        }
    }

    groups
}

fn label_set(labels: &[(String, String)]) -> String {
    if labels.is_empty() {
        return String::new();
    }

    let pairs = labels
        .iter()
        .map(|(key, value)| format!("{key}=\"{}\"", escape_label_value(value)))
        .collect::<Vec<_>>();
    format!("{{{}}}", pairs.join(","))
}

fn format_metric_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

fn escape_help(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('"', "\\\"")
}
