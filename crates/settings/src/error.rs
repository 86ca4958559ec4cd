use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid auth message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No platform configuration directory")]
    NoConfigDir,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts_and_keeps_message() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = SettingsError::from(io_err);
        assert!(matches!(err, SettingsError::Io(_)));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn parse_error_names_toml() {
        let err = toml::from_str::<toml::Value>("= nope").unwrap_err();
        assert!(SettingsError::from(err).to_string().starts_with("TOML parse error"));
    }
}
