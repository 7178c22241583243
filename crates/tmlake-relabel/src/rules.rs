use std::collections::HashMap;

use thiserror::Error;

use crate::{
    context::MetricInstanceContext,
    disk::{DiskRecord, tokenize},
    payload::decode_hex_payload,
    profile::{DeviceProfile, LookupTable},
    resolver::{IndexNameResolver, ResolveError},
};

pub const CPU_USAGE: &str = "cpu_usage";
pub const MEMORY_USAGE: &str = "memory_usage";
pub const FILESYSTEM_USAGE: &str = "filesystem_usage";
pub const CPU_TEMPERATURE: &str = "cpu_temperature";
pub const INTERFACE_THROUGHPUT_RX: &str = "adcInterfaceStatThrputRx";
pub const INTERFACE_THROUGHPUT_TX: &str = "adcInterfaceStatThrputTx";
pub const VSERVER_ALIVE: &str = "llb_vserver_alive";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    CpuUsage,
    MemoryUsage,
    FilesystemUsage,
    CpuTemperature,
    InterfaceThroughput,
    VirtualServerAlive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    UndecodableHex { payload: String },
    NonNumeric { text: String },
    ShortDiskRecord { tokens: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Applied,
    Degraded(Degradation),
}

#[derive(Debug, Error)]
pub enum FilterReason {
    #[error("{rule:?} needs {required} label values, found {found}")]
    MissingLabels {
        rule: Rule,
        required: usize,
        found: usize,
    },
    #[error("index {index} is outside the rows {rule:?} reports")]
    OutOfScope { rule: Rule, index: String },
    #[error(transparent)]
    Resolution(#[from] ResolveError),
}

impl Rule {
    pub const ALL: [Rule; 6] = [
        Rule::CpuUsage,
        Rule::MemoryUsage,
        Rule::FilesystemUsage,
        Rule::CpuTemperature,
        Rule::InterfaceThroughput,
        Rule::VirtualServerAlive,
    ];

    pub fn metric_names(&self) -> &'static [&'static str] {
        match self {
            Self::CpuUsage => &[CPU_USAGE],
            Self::MemoryUsage => &[MEMORY_USAGE],
            Self::FilesystemUsage => &[FILESYSTEM_USAGE],
            Self::CpuTemperature => &[CPU_TEMPERATURE],
            Self::InterfaceThroughput => &[INTERFACE_THROUGHPUT_RX, INTERFACE_THROUGHPUT_TX],
            Self::VirtualServerAlive => &[VSERVER_ALIVE],
        }
    }

    fn required_labels(&self) -> usize {
        match self {
            Self::CpuUsage | Self::FilesystemUsage => 2,
            Self::MemoryUsage
            | Self::CpuTemperature
            | Self::InterfaceThroughput
            | Self::VirtualServerAlive => 1,
        }
    }

    pub fn lookup_table<'p>(&self, profile: &'p DeviceProfile) -> Option<&'p LookupTable> {
        match self {
            Self::InterfaceThroughput => Some(&profile.interface_names),
            Self::VirtualServerAlive => Some(&profile.vserver_names),
            _ => None,
        }
    }

    pub async fn apply(
        &self,
        ctx: &mut MetricInstanceContext<'_>,
        profile: &DeviceProfile,
        resolver: &IndexNameResolver,
    ) -> Result<RuleOutcome, FilterReason> {
        let found = ctx.label_values.len();
        if found < self.required_labels() {
            return Err(FilterReason::MissingLabels {
                rule: *self,
                required: self.required_labels(),
                found,
            });
        }

        match self {
            Self::CpuUsage => {
                self.require_index(ctx, &profile.cpu_aggregate_index)?;
                Ok(decode_numeric_label(ctx, 1))
            }
            Self::MemoryUsage => {
                self.require_index(ctx, &profile.memory_used_index)?;
                Ok(RuleOutcome::Applied)
            }
            Self::FilesystemUsage => {
                let slot = ctx.label(0).unwrap_or_default();
                if !profile.is_disk_slot(slot) {
                    return Err(self.out_of_scope(slot));
                }
                Ok(rebuild_disk_labels(ctx))
            }
            Self::CpuTemperature => Ok(decode_numeric_label(ctx, 0)),
            Self::InterfaceThroughput | Self::VirtualServerAlive => {
                let Some(table) = self.lookup_table(profile) else {
                    return Ok(RuleOutcome::Applied);
                };
                let index = ctx.label(0).unwrap_or_default().to_string();
                let name = resolver.resolve(ctx.session, table, &index).await?;
                ctx.push_label(table.label_name.clone(), name);
                Ok(RuleOutcome::Applied)
            }
        }
    }

    fn require_index(
        &self,
        ctx: &MetricInstanceContext<'_>,
        expected: &str,
    ) -> Result<(), FilterReason> {
        match ctx.label(0) {
            Some(index) if index == expected => Ok(()),
            index => Err(self.out_of_scope(index.unwrap_or_default())),
        }
    }

    fn out_of_scope(&self, index: &str) -> FilterReason {
        FilterReason::OutOfScope {
            rule: *self,
            index: index.to_string(),
        }
    }
}

fn decode_numeric_label(ctx: &mut MetricInstanceContext<'_>, position: usize) -> RuleOutcome {
    let payload = ctx.label(position).unwrap_or_default().to_string();
    let Some(text) = decode_hex_payload(&payload) else {
        ctx.value = 0.0;
        ctx.set_label(position, String::new());
        return RuleOutcome::Degraded(Degradation::UndecodableHex { payload });
    };

    let outcome = match text.parse::<f64>() {
        Ok(value) => {
            ctx.value = value;
            RuleOutcome::Applied
        }
        Err(_) => {
            ctx.value = 0.0;
            RuleOutcome::Degraded(Degradation::NonNumeric { text: text.clone() })
        }
    };
    ctx.set_label(position, text);
    outcome
}

// A line with fewer than six fields still yields a sample: value 0 and
// empty derived labels.
fn rebuild_disk_labels(ctx: &mut MetricInstanceContext<'_>) -> RuleOutcome {
    let payload = ctx.label(1).unwrap_or_default().to_string();
    let decoded = decode_hex_payload(&payload);
    let text = decoded.clone().unwrap_or_default();
    ctx.set_label(1, text.clone());

    let record = DiskRecord::parse(&text);
    let mut outcome = match (&decoded, &record) {
        (None, _) => RuleOutcome::Degraded(Degradation::UndecodableHex { payload }),
        (Some(_), None) => RuleOutcome::Degraded(Degradation::ShortDiskRecord {
            tokens: tokenize(&text).len(),
        }),
        (Some(_), Some(_)) => RuleOutcome::Applied,
    };

    ctx.value = 0.0;
    let record = record.unwrap_or_default();
    match record.usage() {
        Some(usage) => ctx.value = usage,
        None if outcome == RuleOutcome::Applied => {
            outcome = RuleOutcome::Degraded(Degradation::NonNumeric {
                text: record.usage_percent.clone(),
            });
        }
        None => {}
    }

    ctx.truncate_labels(1);
    ctx.push_label("mountpoint", record.mountpoint);
    ctx.push_label("size", record.size);
    ctx.push_label("used", record.used);
    ctx.push_label("avail", record.available);
    ctx.push_label("filesystem", record.filesystem);
    outcome
}

#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: HashMap<&'static str, Rule>,
}

impl RuleTable {
    pub fn new() -> Self {
        let rules = Rule::ALL
            .iter()
            .flat_map(|rule| rule.metric_names().iter().map(move |name| (*name, *rule)))
            .collect();
        Self { rules }
    }

    pub fn get(&self, metric_name: &str) -> Option<Rule> {
        self.rules.get(metric_name).copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}
