use std::{collections::HashSet, sync::Arc};

use futures::future::join_all;
use tmlake_metrics::{InvalidSample, MetricSample, Sample, emit};
use tracing::{debug, trace, warn};

use crate::{
    context::{LookupReuse, MetricInstanceContext, ScrapeSession},
    profile::DeviceProfile,
    resolver::IndexNameResolver,
    rules::{Degradation, FilterReason, Rule, RuleOutcome, RuleTable},
    scraper::Scraper,
};

#[derive(Debug)]
pub enum Disposition {
    Filtered(FilterReason),
    Emitted {
        sample: MetricSample,
        degraded: Option<Degradation>,
    },
    EmissionError(InvalidSample),
}

impl Disposition {
    pub fn into_sample(self) -> Option<Sample> {
        match self {
            Self::Filtered(_) => None,
            Self::Emitted { sample, .. } => Some(Sample::Metric(sample)),
            Self::EmissionError(invalid) => Some(Sample::Invalid(invalid)),
        }
    }

    pub fn sample(&self) -> Option<&MetricSample> {
        match self {
            Self::Emitted { sample, .. } => Some(sample),
            _ => None,
        }
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self, Self::Filtered(_))
    }
}

pub struct RelabelEngine {
    profile: DeviceProfile,
    rules: RuleTable,
    resolver: IndexNameResolver,
}

impl RelabelEngine {
    pub fn new(profile: DeviceProfile, scraper: Arc<dyn Scraper>) -> Self {
        let resolver = IndexNameResolver::new(scraper, profile.module_name.clone());
        Self {
            profile,
            rules: RuleTable::new(),
            resolver,
        }
    }

    pub fn rule_for(&self, metric_name: &str) -> Option<Rule> {
        self.rules.get(metric_name)
    }

    pub async fn process(&self, mut ctx: MetricInstanceContext<'_>) -> Disposition {
        trace!(?ctx, "dispatching metric instance");

        let outcome = match self.rules.get(&ctx.descriptor.name) {
            Some(rule) => match rule.apply(&mut ctx, &self.profile, &self.resolver).await {
                Ok(outcome) => outcome,
                Err(reason) => {
                    debug!(
                        metric = %ctx.descriptor.name,
                        labels = ?ctx.label_values,
                        reason = %reason,
                        "metric instance filtered"
                    );
                    return Disposition::Filtered(reason);
                }
            },
            None => RuleOutcome::Applied,
        };

        let degraded = match outcome {
            RuleOutcome::Applied => None,
            RuleOutcome::Degraded(degradation) => {
                debug!(
                    metric = %ctx.descriptor.name,
                    labels = ?ctx.label_values,
                    degradation = ?degradation,
                    "metric instance decoded with placeholders"
                );
                Some(degradation)
            }
        };
        trace!(?ctx, "rule applied");

        match emit(
            &ctx.descriptor,
            &ctx.label_names,
            &ctx.label_values,
            ctx.value,
            &ctx.index_oids,
        ) {
            Sample::Metric(sample) => Disposition::Emitted { sample, degraded },
            Sample::Invalid(invalid) => Disposition::EmissionError(invalid),
        }
    }

    pub async fn process_all<'s>(
        &self,
        session: &'s ScrapeSession,
        instances: Vec<MetricInstanceContext<'s>>,
    ) -> Vec<Sample> {
        if session.lookup_reuse() == LookupReuse::PerScrape {
            self.prefetch_lookups(session, &instances).await;
        }

        let mut samples = Vec::with_capacity(instances.len());
        for ctx in instances {
            if let Some(sample) = self.process(ctx).await.into_sample() {
                samples.push(sample);
            }
        }
        samples
    }

    async fn prefetch_lookups(
        &self,
        session: &ScrapeSession,
        instances: &[MetricInstanceContext<'_>],
    ) {
        let mut seen = HashSet::new();
        let tables = instances
            .iter()
            .filter_map(|ctx| self.rules.get(&ctx.descriptor.name))
            .filter_map(|rule| rule.lookup_table(&self.profile))
            .filter(|table| seen.insert(table.oid.clone()))
            .collect::<Vec<_>>();

        let loads = tables
            .iter()
            .map(|table| self.resolver.load(session, table));
        for (table, result) in tables.iter().zip(join_all(loads).await) {
            if let Err(err) = result {
                warn!(
                    target_addr = %session.target(),
                    oid = %table.oid,
                    error = %err,
                    "failed to prefetch index name table"
                );
            }
        }
    }
}
