//! Persistent settings and the signed-in session.
//!
//! Everything lives in one TOML file. The content side only needs the `extension_enabled`
//! flag; the solve runtime reads the session through [`runtime_solve::SessionSource`].

mod auth;
mod error;

use std::fs;
use std::path::{Path, PathBuf};

use bus::CoreEvent;
use runtime_solve::{Credentials, SessionSource};
use serde::{Deserialize, Serialize};

pub use auth::{AUTH_MESSAGE_TYPE, AuthMessage, AuthUser, accept_auth_message};
pub use error::SettingsError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/solve";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub extension_enabled: bool,
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub allowed_origins: Vec<String>,
    pub session: Session,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extension_enabled: true,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 30,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            session: Session::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub subscription_active: bool,
}

impl Session {
    pub fn is_signed_in(&self) -> bool {
        self.auth_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            auth_token: self.auth_token.clone(),
            subscription_active: self.subscription_active,
        }
    }
}

/// Result of changing the enabled flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub extension_enabled: bool,
    pub changed: bool,
}

impl SettingsUpdate {
    /// The notification content pages listen for.
    pub fn event(&self) -> CoreEvent {
        CoreEvent::SettingsUpdated {
            extension_enabled: self.extension_enabled,
        }
    }
}

/// File-backed settings. Every call re-reads the file, so several processes sharing it see
/// each other's changes.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at [`SettingsStore::default_path`].
    pub fn open_default() -> Result<Self, SettingsError> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf, SettingsError> {
        dirs::config_dir()
            .map(|dir| dir.join("formsolve").join("settings.toml"))
            .ok_or(SettingsError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file yields the defaults.
    pub fn load(&self) -> Result<Settings, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(settings)?)?;
        log::debug!("settings written to {}", self.path.display());
        Ok(())
    }

    pub fn set_extension_enabled(&self, enabled: bool) -> Result<SettingsUpdate, SettingsError> {
        let mut settings = self.load()?;
        let changed = settings.extension_enabled != enabled;
        settings.extension_enabled = enabled;
        self.save(&settings)?;
        Ok(SettingsUpdate {
            extension_enabled: enabled,
            changed,
        })
    }

    pub fn sign_in(
        &self,
        token: &str,
        email: Option<&str>,
        subscription_active: bool,
    ) -> Result<(), SettingsError> {
        let mut settings = self.load()?;
        settings.session = Session {
            auth_token: Some(token.to_string()),
            user_email: email.map(str::to_string),
            subscription_active,
        };
        self.save(&settings)?;
        log::info!("signed in{}", email.map(|e| format!(" as {e}")).unwrap_or_default());
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), SettingsError> {
        let mut settings = self.load()?;
        settings.session = Session::default();
        self.save(&settings)
    }
}

impl SessionSource for SettingsStore {
    fn credentials(&self) -> Credentials {
        match self.load() {
            Ok(settings) => settings.session.credentials(),
            Err(e) => {
                log::warn!("could not read session from {}: {e}", self.path.display());
                Credentials::default()
            }
        }
    }
}
