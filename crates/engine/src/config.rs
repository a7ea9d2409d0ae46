use crate::EngineError;
use mazeworld_assets::{LoadProgress, ShaderKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the loading gate does when an asset fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum LoadFailurePolicy {
    /// Keep waiting. The gate never opens.
    Stall,
    /// Re-request the asset until `max_attempts` loads have been issued,
    /// then abort.
    Retry { max_attempts: u32 },
    /// Fail the gate on the first error.
    Abort,
}

impl Default for LoadFailurePolicy {
    fn default() -> Self {
        LoadFailurePolicy::Retry { max_attempts: 3 }
    }
}

/// Engine options. Every field has a default, so a config file only needs
/// to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Prefix of every relative asset path.
    pub path_root: String,
    /// Register the stock image and model set at construction.
    pub init_default_assets: bool,
    /// Keep an [`crate::Inspector`] with per-tick entity snapshots.
    pub debug_inspection: bool,
    /// Disable wall collision entirely.
    pub noclip: bool,
    pub load_failure: LoadFailurePolicy,
    /// Shader image tiles are built with.
    pub image_shader: ShaderKind,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path_root: ".".into(),
            init_default_assets: true,
            debug_inspection: true,
            noclip: false,
            load_failure: LoadFailurePolicy::default(),
            image_shader: ShaderKind::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, EngineError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Fold launch options in. They only ever switch features on.
    pub fn with_launch_options(mut self, options: LaunchOptions) -> Self {
        self.noclip |= options.noclip;
        self
    }
}

/// Flags read once from the host's launch query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    pub noclip: bool,
}

impl LaunchOptions {
    /// Parse a query string such as `?noclip` or `level=2&noclip=1`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let noclip = query
            .split('&')
            .map(|pair| pair.split_once('=').map_or(pair, |(key, _)| key))
            .any(|key| key == "noclip");
        Self { noclip }
    }
}

/// Host callbacks for the loading gate.
#[derive(Default)]
pub struct LoadingHooks {
    pub(crate) progress: Option<Box<dyn FnMut(LoadProgress)>>,
    pub(crate) loading_finished: Option<Box<dyn FnOnce()>>,
}

impl LoadingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called on every asset poll with the current counts.
    pub fn on_progress(mut self, f: impl FnMut(LoadProgress) + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Called once, when the last asset has loaded.
    pub fn on_loading_finished(mut self, f: impl FnOnce() + 'static) -> Self {
        self.loading_finished = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for LoadingHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadingHooks")
            .field("progress", &self.progress.is_some())
            .field("loading_finished", &self.loading_finished.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.path_root, ".");
        assert!(config.init_default_assets);
        assert!(!config.noclip);
        assert_eq!(
            config.load_failure,
            LoadFailurePolicy::Retry { max_attempts: 3 }
        );
    }

    #[test]
    fn yaml_overrides_only_named_fields() {
        let config = EngineConfig::from_yaml_str(
            "path_root: public\nnoclip: true\nload_failure:\n  policy: retry\n  max_attempts: 5\n",
        )
        .unwrap();
        assert_eq!(config.path_root, "public");
        assert!(config.noclip);
        assert!(config.init_default_assets);
        assert_eq!(
            config.load_failure,
            LoadFailurePolicy::Retry { max_attempts: 5 }
        );

        let stall = EngineConfig::from_yaml_str("load_failure:\n  policy: stall\n").unwrap();
        assert_eq!(stall.load_failure, LoadFailurePolicy::Stall);
    }

    #[test]
    fn bad_yaml_is_a_config_error() {
        assert!(matches!(
            EngineConfig::from_yaml_str("noclip: [1, 2"),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn query_flag_detection() {
        assert!(LaunchOptions::from_query("?noclip").noclip);
        assert!(LaunchOptions::from_query("level=2&noclip=1").noclip);
        assert!(!LaunchOptions::from_query("?level=2").noclip);
        assert!(!LaunchOptions::from_query("").noclip);
        assert!(!LaunchOptions::from_query("?noclipping").noclip);
    }

    #[test]
    fn launch_options_enable_noclip() {
        let config = EngineConfig::default().with_launch_options(LaunchOptions { noclip: true });
        assert!(config.noclip);
    }
}
