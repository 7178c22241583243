use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use tmlake_common::WalkParams;
use tmlake_metrics::MetricDescriptor;
use tokio::time::Instant;

use crate::resolver::IndexNameMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupReuse {
    #[default]
    PerInstance,
    PerScrape,
}

#[derive(Debug)]
pub struct ScrapeSession {
    target: String,
    walk_params: WalkParams,
    deadline: Instant,
    lookup_reuse: LookupReuse,
    lookups: Mutex<HashMap<String, Arc<IndexNameMap>>>,
}

impl ScrapeSession {
    pub fn new(target: impl Into<String>, walk_params: WalkParams, timeout: Duration) -> Self {
        Self {
            target: target.into(),
            walk_params,
            deadline: Instant::now() + timeout,
            lookup_reuse: LookupReuse::default(),
            lookups: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_lookup_reuse(mut self, lookup_reuse: LookupReuse) -> Self {
        self.lookup_reuse = lookup_reuse;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn walk_params(&self) -> &WalkParams {
        &self.walk_params
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn lookup_reuse(&self) -> LookupReuse {
        self.lookup_reuse
    }

    pub(crate) fn cached_lookup(&self, oid: &str) -> Option<Arc<IndexNameMap>> {
        if self.lookup_reuse != LookupReuse::PerScrape {
            return None;
        }
        self.lookups.lock().ok()?.get(oid).cloned()
    }

    pub(crate) fn remember_lookup(&self, oid: &str, map: Arc<IndexNameMap>) {
        if self.lookup_reuse != LookupReuse::PerScrape {
            return;
        }
        if let Ok(mut guard) = self.lookups.lock() {
            guard.insert(oid.to_string(), map);
        }
    }
}

#[derive(Debug, Clone)]
pub struct MetricInstanceContext<'s> {
    pub descriptor: MetricDescriptor,
    pub index_oids: Vec<u32>,
    pub label_names: Vec<String>,
    pub label_values: Vec<String>,
    pub value: f64,
    pub session: &'s ScrapeSession,
}

impl<'s> MetricInstanceContext<'s> {
    pub fn new(
        session: &'s ScrapeSession,
        descriptor: MetricDescriptor,
        label_names: Vec<String>,
        label_values: Vec<String>,
    ) -> Self {
        Self {
            descriptor,
            index_oids: Vec::new(),
            label_names,
            label_values,
            value: 0.0,
            session,
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }

    pub fn with_index_oids(mut self, index_oids: Vec<u32>) -> Self {
        self.index_oids = index_oids;
        self
    }

    pub fn label(&self, position: usize) -> Option<&str> {
        self.label_values.get(position).map(String::as_str)
    }

    pub fn set_label(&mut self, position: usize, value: String) {
        if let Some(slot) = self.label_values.get_mut(position) {
            *slot = value;
        }
    }

    pub fn push_label(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.label_names.push(name.into());
        self.label_values.push(value.into());
    }

    pub fn truncate_labels(&mut self, len: usize) {
        self.label_names.truncate(len);
        self.label_values.truncate(len);
    }
}
