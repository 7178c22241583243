use std::path::Path;

use serde::{Deserialize, Serialize};
use tmlake_common::error::{Result, TmlakeError};

pub const MODULE_NAME: &str = "tmlake";
pub const INTERFACE_NAME_OID: &str = "1.3.6.1.4.1.99999.1.2.2.2.1.2";
pub const INTERFACE_NAME_METRIC: &str = "adcInterfaceStatName";
pub const VSERVER_NAME_OID: &str = "1.3.6.1.4.1.99999.1.6.1.2.1.2";
pub const VSERVER_NAME_METRIC: &str = "adcLLBAppName";

const PROFILE_ENV: &str = "TMLAKE_DEVICE_PROFILE";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookupTable {
    pub oid: String,
    pub metric_name: String,
    pub label_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceProfile {
    pub module_name: String,
    pub cpu_aggregate_index: String,
    pub memory_used_index: String,
    pub disk_slots: Vec<String>,
    pub interface_names: LookupTable,
    pub vserver_names: LookupTable,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            module_name: MODULE_NAME.to_string(),
            cpu_aggregate_index: "0".to_string(),
            memory_used_index: "1".to_string(),
            disk_slots: vec!["6".to_string(), "7".to_string(), "8".to_string()],
            interface_names: LookupTable {
                oid: INTERFACE_NAME_OID.to_string(),
                metric_name: INTERFACE_NAME_METRIC.to_string(),
                label_name: "interface_name".to_string(),
            },
            vserver_names: LookupTable {
                oid: VSERVER_NAME_OID.to_string(),
                metric_name: VSERVER_NAME_METRIC.to_string(),
                label_name: "vserver_name".to_string(),
            },
        }
    }
}

impl DeviceProfile {
    pub fn from_json(json: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_env() -> Result<Option<Self>> {
        let Some(path) = std::env::var(PROFILE_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
        else {
            return Ok(None);
        };

        Self::from_file(path).map(Some)
    }

    pub fn is_disk_slot(&self, index: &str) -> bool {
        self.disk_slots.iter().any(|slot| slot == index)
    }

    pub fn validate(&self) -> Result<()> {
        if self.module_name.trim().is_empty() {
            return Err(TmlakeError::Config("module_name must not be empty".to_string()));
        }

        for table in [&self.interface_names, &self.vserver_names] {
            tmlake_common::oid::parse_oid(&table.oid).map_err(|_| {
                TmlakeError::Config(format!("lookup table oid {:?} is not numeric", table.oid))
            })?;
            if table.metric_name.is_empty() || table.label_name.is_empty() {
                return Err(TmlakeError::Config(format!(
                    "lookup table {} needs a metric and a label name",
                    table.oid
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DeviceProfile, INTERFACE_NAME_OID, PROFILE_ENV};

    fn write_profile(name: &str, json: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{name}-{}.json", std::process::id()));
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn default_matches_shipped_appliance() {
        let profile = DeviceProfile::default();
        assert!(profile.is_disk_slot("7"));
        assert!(!profile.is_disk_slot("5"));
        assert_eq!(profile.cpu_aggregate_index, "0");
        assert_eq!(profile.memory_used_index, "1");
        assert_eq!(profile.interface_names.oid, INTERFACE_NAME_OID);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn json_overrides_keep_remaining_defaults() {
        let profile =
            DeviceProfile::from_json(r#"{"disk_slots": ["2", "3"], "cpu_aggregate_index": "9"}"#)
                .unwrap();
        assert!(profile.is_disk_slot("3"));
        assert!(!profile.is_disk_slot("7"));
        assert_eq!(profile.cpu_aggregate_index, "9");
        assert_eq!(profile.memory_used_index, "1");
    }

    #[test]
    fn rejects_non_numeric_lookup_oid() {
        let err = DeviceProfile::from_json(
            r#"{"vserver_names": {"oid": "vendor.names", "metric_name": "x", "label_name": "y"}}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "config");
    }

    #[test]
    fn loads_profile_from_file() {
        let path = write_profile("tmlake-profile-file", r#"{"memory_used_index": "4"}"#);
        let profile = DeviceProfile::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(profile.memory_used_index, "4");
        assert_eq!(profile.module_name, "tmlake");

        let missing = DeviceProfile::from_file(&path).unwrap_err();
        assert_eq!(missing.kind(), "io");
    }

    #[test]
    fn env_var_names_the_profile_file() {
        let path = write_profile("tmlake-profile-env", r#"{"disk_slots": ["1"]}"#);

        unsafe { std::env::set_var(PROFILE_ENV, format!(" {} ", path.display())) };
        let profile = DeviceProfile::from_env().unwrap().unwrap();
        assert!(profile.is_disk_slot("1"));

        unsafe { std::env::set_var(PROFILE_ENV, "  ") };
        assert_eq!(DeviceProfile::from_env().unwrap(), None);

        unsafe { std::env::remove_var(PROFILE_ENV) };
        assert_eq!(DeviceProfile::from_env().unwrap(), None);
        std::fs::remove_file(&path).unwrap();
    }
}
