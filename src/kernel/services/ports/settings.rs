use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKEND_URL: &str = "https://intergrated-developers-tools-for.onrender.com";
pub const DEFAULT_ACTION_PATH: &str = "/api/v1/tools/ide/action";
pub const DEFAULT_HEALTH_PATH: &str = "/api/v1/health";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub preview: PreviewSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_action_path")]
    pub action_path: String,
    #[serde(default = "default_health_path")]
    pub health_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSettings {
    #[serde(default = "default_true")]
    pub auto_detect_resources: bool,
}

fn default_base_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_action_path() -> String {
    DEFAULT_ACTION_PATH.to_string()
}

fn default_health_path() -> String {
    DEFAULT_HEALTH_PATH.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            action_path: default_action_path(),
            health_path: default_health_path(),
        }
    }
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            auto_detect_resources: true,
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/ports/settings.rs"]
mod tests;
