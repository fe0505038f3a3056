use std::path::PathBuf;

use crate::auth::password::CredentialScheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON file per key under `data_dir`.
    File,
    /// Nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub data_dir: PathBuf,
    pub credential_scheme: CredentialScheme,
    pub seed_demo_reports: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v
                .parse::<u16>()
                .map_err(|e| anyhow::anyhow!("APP_PORT `{v}`: {e}"))?,
            Err(_) => 8080,
        };
        let storage = match std::env::var("STORAGE_BACKEND").as_deref() {
            Ok("memory") => StorageBackend::Memory,
            Ok("file") | Err(_) => StorageBackend::File,
            Ok(other) => anyhow::bail!("unknown STORAGE_BACKEND `{other}`"),
        };
        let data_dir = std::env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let credential_scheme = match std::env::var("CREDENTIAL_SCHEME") {
            Ok(v) => v.parse::<CredentialScheme>()?,
            Err(_) => CredentialScheme::default(),
        };
        let seed_demo_reports = std::env::var("SEED_DEMO_REPORTS")
            .ok()
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        Ok(Self {
            host,
            port,
            storage,
            data_dir,
            credential_scheme,
            seed_demo_reports,
        })
    }
}

fn parse_flag(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::parse_flag;

    #[test]
    fn flags() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag(""));
    }
}
