use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tmlake_common::{ModuleDescriptor, Pdu, TmlakeError, oid::last_sub_identifier};
use tracing::debug;

use crate::{context::ScrapeSession, profile::LookupTable, scraper::Scraper};

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("lookup walk of {oid} failed: {source}")]
    Walk {
        oid: String,
        #[source]
        source: TmlakeError,
    },
    #[error("lookup walk of {oid} exceeded the scrape deadline")]
    Deadline { oid: String },
    #[error("lookup walk of {oid} returned no rows")]
    EmptyWalk { oid: String },
    #[error("index {index} has no entry under {oid}")]
    UnresolvedIndex { oid: String, index: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexNameMap(HashMap<String, String>);

impl IndexNameMap {
    pub fn from_pdus(pdus: &[Pdu]) -> Self {
        let entries = pdus
            .iter()
            .filter_map(|pdu| {
                let index = last_sub_identifier(&pdu.oid)?;
                let name = pdu.value.as_text()?;
                Some((index.to_string(), name))
            })
            .collect();
        Self(entries)
    }

    pub fn get(&self, index: &str) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub struct IndexNameResolver {
    scraper: Arc<dyn Scraper>,
    module_name: String,
}

impl IndexNameResolver {
    pub fn new(scraper: Arc<dyn Scraper>, module_name: impl Into<String>) -> Self {
        Self {
            scraper,
            module_name: module_name.into(),
        }
    }

    pub fn lookup_module(&self, session: &ScrapeSession, table: &LookupTable) -> ModuleDescriptor {
        ModuleDescriptor::single_lookup(
            &self.module_name,
            &table.oid,
            &table.metric_name,
            session.walk_params().clone(),
        )
    }

    pub async fn load(
        &self,
        session: &ScrapeSession,
        table: &LookupTable,
    ) -> Result<Arc<IndexNameMap>, ResolveError> {
        if let Some(map) = session.cached_lookup(&table.oid) {
            return Ok(map);
        }

        let module = self.lookup_module(session, table);
        let walk = self.scraper.scrape(session.target(), &module);
        let pdus = tokio::time::timeout_at(session.deadline(), walk)
            .await
            .map_err(|_| ResolveError::Deadline {
                oid: table.oid.clone(),
            })?
            .map_err(|source| {
                debug!(
                    target_addr = %session.target(),
                    oid = %table.oid,
                    kind = source.kind(),
                    error = %source,
                    "lookup walk failed"
                );
                ResolveError::Walk {
                    oid: table.oid.clone(),
                    source,
                }
            })?;

        if pdus.is_empty() {
            return Err(ResolveError::EmptyWalk {
                oid: table.oid.clone(),
            });
        }

        let map = Arc::new(IndexNameMap::from_pdus(&pdus));
        debug!(
            target_addr = %session.target(),
            oid = %table.oid,
            rows = map.len(),
            "loaded index name table"
        );
        session.remember_lookup(&table.oid, Arc::clone(&map));
        Ok(map)
    }

    pub async fn resolve(
        &self,
        session: &ScrapeSession,
        table: &LookupTable,
        index: &str,
    ) -> Result<String, ResolveError> {
        let map = self.load(session, table).await?;
        map.get(index)
            .map(str::to_string)
            .ok_or_else(|| ResolveError::UnresolvedIndex {
                oid: table.oid.clone(),
                index: index.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use tmlake_common::{Pdu, PduValue, WalkParams};

    use crate::{
        context::{LookupReuse, ScrapeSession},
        profile::DeviceProfile,
        scraper::StaticScraper,
    };

    use super::{IndexNameMap, IndexNameResolver, ResolveError};

    fn interface_rows() -> Vec<Pdu> {
        vec![
            Pdu::octet_string(".1.3.6.1.4.1.99999.1.2.2.2.1.2.1", "mgmt0"),
            Pdu::octet_string(".1.3.6.1.4.1.99999.1.2.2.2.1.2.12", "eth12"),
            Pdu::octet_string(".1.3.6.1.4.1.99999.1.6.1.2.1.2.3", "vs-web"),
        ]
    }

    fn session() -> ScrapeSession {
        ScrapeSession::new("10.0.0.5:161", WalkParams::default(), Duration::from_secs(5))
    }

    #[test]
    fn keys_by_full_last_component() {
        let map = IndexNameMap::from_pdus(&interface_rows());
        assert_eq!(map.get("12"), Some("eth12"));
        assert_eq!(map.get("2"), None);
        assert_eq!(map.len(), 3);

        let with_null = IndexNameMap::from_pdus(&[Pdu {
            oid: "1.3.6.1.4.1.99999.1.2.2.2.1.2.4".to_string(),
            value: PduValue::Null,
        }]);
        assert!(with_null.is_empty());
    }

    #[tokio::test]
    async fn resolves_only_rows_under_the_table() {
        let profile = DeviceProfile::default();
        let scraper = StaticScraper::new(interface_rows());
        let resolver = IndexNameResolver::new(Arc::new(scraper), "tmlake");
        let session = session();

        let name = resolver
            .resolve(&session, &profile.interface_names, "12")
            .await
            .unwrap();
        assert_eq!(name, "eth12");

        let err = resolver
            .resolve(&session, &profile.interface_names, "3")
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::UnresolvedIndex { .. }));
    }

    #[tokio::test]
    async fn walk_failures_and_empty_tables_are_errors() {
        let profile = DeviceProfile::default();
        let scraper =
            StaticScraper::new(interface_rows()).fail_on(profile.interface_names.oid.clone());
        let resolver = IndexNameResolver::new(Arc::new(scraper), "tmlake");
        let session = session();

        let err = resolver
            .load(&session, &profile.interface_names)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Walk { .. }));

        let empty = IndexNameResolver::new(Arc::new(StaticScraper::new(Vec::new())), "tmlake");
        let err = empty
            .load(&session, &profile.vserver_names)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::EmptyWalk { .. }));
    }

    #[tokio::test]
    async fn slow_walks_stop_at_the_scrape_deadline() {
        let profile = DeviceProfile::default();
        let scraper = StaticScraper::new(interface_rows()).with_delay(Duration::from_secs(30));
        let resolver = IndexNameResolver::new(Arc::new(scraper), "tmlake");
        let timeout = Duration::from_millis(20);
        let session = ScrapeSession::new("10.0.0.5:161", WalkParams::default(), timeout);

        let err = resolver
            .load(&session, &profile.interface_names)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Deadline { .. }));
    }

    #[tokio::test]
    async fn per_scrape_reuse_walks_each_table_once() {
        let profile = DeviceProfile::default();
        let scraper = Arc::new(StaticScraper::new(interface_rows()));
        let resolver = IndexNameResolver::new(scraper.clone(), "tmlake");

        let shared = session().with_lookup_reuse(LookupReuse::PerScrape);
        for index in ["1", "12", "1"] {
            resolver
                .resolve(&shared, &profile.interface_names, index)
                .await
                .unwrap();
        }
        assert_eq!(scraper.walk_count(), 1);

        let independent = session();
        for index in ["1", "12"] {
            resolver
                .resolve(&independent, &profile.interface_names, index)
                .await
                .unwrap();
        }
        assert_eq!(scraper.walk_count(), 3);
    }
}
