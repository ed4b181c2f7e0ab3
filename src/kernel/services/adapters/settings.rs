use crate::kernel::services::ports::settings::Settings;
use std::path::PathBuf;

const SETTINGS_DIR: &str = ".ide-workspace";
const SETTINGS_FILE: &str = "setting.json";

/// Overrides `backend.base_url` when set and non-empty.
pub const BACKEND_URL_ENV: &str = "IDE_WORKSPACE_BACKEND_URL";

pub fn get_settings_path() -> Option<PathBuf> {
    get_cache_dir().map(|dir| dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

pub fn ensure_settings_file() -> std::io::Result<PathBuf> {
    let path = get_settings_path().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine settings directory",
        )
    })?;
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content =
            serde_json::to_string_pretty(&Settings::default()).unwrap_or_else(|_| "{}".to_string());
        std::fs::write(&path, content)?;
    }
    Ok(path)
}

pub fn load_settings() -> Option<Settings> {
    let path = get_settings_path()?;
    let data = std::fs::read_to_string(path).ok()?;
    parse_settings(&data)
}

pub fn parse_settings(data: &str) -> Option<Settings> {
    match serde_json::from_str(data) {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed settings file");
            None
        }
    }
}

/// Settings file (or defaults) with the environment override applied.
pub fn resolve_settings() -> Settings {
    let settings = load_settings().unwrap_or_default();
    apply_env_override(settings, std::env::var(BACKEND_URL_ENV).ok())
}

pub fn apply_env_override(mut settings: Settings, base_url: Option<String>) -> Settings {
    if let Some(url) = base_url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
        settings.backend.base_url = url;
    }
    settings
}

fn get_cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Caches"));
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            return Some(PathBuf::from(xdg));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".cache"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            return Some(PathBuf::from(local));
        }
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}
