use std::path::Path;

use bytes::Bytes;
use serde::Deserialize;
use tmlake_common::{Pdu, PduValue, WalkParams, error::Result};
use tmlake_metrics::MetricDescriptor;
use tmlake_relabel::{MetricInstanceContext, ScrapeSession, StaticScraper};

#[derive(Debug, Clone, Deserialize)]
pub struct Capture {
    pub target: String,
    #[serde(default)]
    pub walk_params: WalkParams,
    #[serde(default)]
    pub lookups: Vec<CapturedPdu>,
    #[serde(default)]
    pub failing_lookups: Vec<String>,
    pub instances: Vec<CapturedInstance>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CapturedPdu {
    pub oid: String,
    #[serde(flatten)]
    pub value: CapturedValue,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CapturedValue {
    OctetString(String),
    Integer(i64),
    Counter32(u32),
    Gauge32(u32),
    Counter64(u64),
    Null,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CapturedInstance {
    pub metric: MetricDescriptor,
    #[serde(default)]
    pub index_oids: Vec<u32>,
    #[serde(default)]
    pub label_names: Vec<String>,
    #[serde(default)]
    pub label_values: Vec<String>,
    #[serde(default)]
    pub value: f64,
}

impl From<CapturedPdu> for Pdu {
    fn from(captured: CapturedPdu) -> Self {
        let value = match captured.value {
            CapturedValue::OctetString(text) => PduValue::OctetString(Bytes::from(text)),
            CapturedValue::Integer(value) => PduValue::Integer(value),
            CapturedValue::Counter32(value) => PduValue::Counter32(value),
            CapturedValue::Gauge32(value) => PduValue::Gauge32(value),
            CapturedValue::Counter64(value) => PduValue::Counter64(value),
            CapturedValue::Null => PduValue::Null,
        };
        Pdu {
            oid: captured.oid,
            value,
        }
    }
}

impl Capture {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn scraper(&self) -> StaticScraper {
        let pdus = self.lookups.iter().cloned().map(Pdu::from).collect();
        self.failing_lookups
            .iter()
            .fold(StaticScraper::new(pdus), |scraper, oid| scraper.fail_on(oid.clone()))
    }

    pub fn instances<'s>(&self, session: &'s ScrapeSession) -> Vec<MetricInstanceContext<'s>> {
        self.instances
            .iter()
            .map(|captured| {
                MetricInstanceContext::new(
                    session,
                    captured.metric.clone(),
                    captured.label_names.clone(),
                    captured.label_values.clone(),
                )
                .with_value(captured.value)
                .with_index_oids(captured.index_oids.clone())
            })
            .collect()
    }
}
