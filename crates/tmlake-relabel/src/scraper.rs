use std::{
    collections::HashSet,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use tmlake_common::{
    ModuleDescriptor, Pdu,
    error::{Result, TmlakeError},
    oid::is_within,
};

#[async_trait]
pub trait Scraper: Send + Sync {
    async fn scrape(&self, target: &str, module: &ModuleDescriptor) -> Result<Vec<Pdu>>;
}

#[derive(Debug, Default)]
pub struct StaticScraper {
    pdus: Vec<Pdu>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    walks: AtomicUsize,
}

impl StaticScraper {
    pub fn new(pdus: Vec<Pdu>) -> Self {
        Self {
            pdus,
            ..Self::default()
        }
    }

    pub fn fail_on(mut self, oid: impl Into<String>) -> Self {
        self.failing.insert(oid.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn walk_count(&self) -> usize {
        self.walks.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Scraper for StaticScraper {
    async fn scrape(&self, target: &str, module: &ModuleDescriptor) -> Result<Vec<Pdu>> {
        self.walks.fetch_add(1, Ordering::Relaxed);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut results = Vec::new();
        for subtree in &module.walk {
            if self.failing.contains(subtree) {
                return Err(TmlakeError::Scrape {
                    target: target.to_string(),
                    message: format!("walk of {subtree} refused"),
                });
            }

            results.extend(
                self.pdus
                    .iter()
                    .filter(|pdu| is_within(&pdu.oid, subtree))
                    .cloned(),
            );
        }

        Ok(results)
    }
}
