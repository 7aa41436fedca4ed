use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rdpbench_core::{Resolution, StaticResolver};
use serde::{Deserialize, Serialize};

use super::atomic::write_bytes_atomic;
use super::{WorkspaceError, WorkspaceResult};

pub const DEFAULT_SETTINGS_FILE: &str = "rdpbench.toml";

/// Canned answer for a URI the offline resolver knows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineResolution {
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub run_dir: PathBuf,
    /// Undetermined checks listed in a markdown report before truncating.
    pub max_messages: usize,
    /// Weight overrides keyed by evaluation key (`TrueEvaluation[1]`).
    pub weights: BTreeMap<String, f64>,
    /// Answers of the offline resolver, keyed by URI.
    pub resolutions: BTreeMap<String, OfflineResolution>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            run_dir: PathBuf::from("runs"),
            max_messages: 20,
            weights: BTreeMap::new(),
            resolutions: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> WorkspaceResult<()> {
        for (key, weight) in &self.weights {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(WorkspaceError::Invalid(format!(
                    "weight for {key} must be positive, got {weight}"
                )));
            }
        }
        Ok(())
    }

    /// Resolver answering only the configured URIs.
    pub fn resolver(&self) -> StaticResolver {
        self.resolutions
            .iter()
            .fold(StaticResolver::new(), |resolver, (uri, answer)| {
                let mut resolution = Resolution::new(answer.status_code);
                if let Some(location) = &answer.location {
                    resolution = resolution.with_header("Location", location);
                }
                resolver.answer(uri, resolution)
            })
    }
}

pub fn load_or_create_settings(path: &Path) -> WorkspaceResult<Settings> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        settings.validate()?;
        return Ok(settings);
    }

    let settings = Settings::default();
    save_settings(path, &settings)?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &Settings) -> WorkspaceResult<()> {
    let encoded = toml::to_string_pretty(settings)?;
    write_bytes_atomic(path, encoded.as_bytes()).map_err(WorkspaceError::from)
}
