use crate::application::normalizer::AliasTable;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

const ENV_PREFIX: &str = "RISKVIZ";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub aliases: AliasTable,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetSettings {
    pub path: PathBuf,
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    load_config_from("config/dashboard")
}

/// File source first, then `RISKVIZ__SECTION__KEY` environment overrides.
pub fn load_config_from(name: &str) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(name))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(file_name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(file_name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_config_with_defaults() {
        let path = write_config(
            "riskviz_config_defaults.toml",
            r#"
            [dataset]
            path = "data/assets.json"
            "#,
        );

        let config = load_config_from(path.to_str().unwrap()).unwrap();

        assert_eq!(config.dataset.path, PathBuf::from("data/assets.json"));
        assert_eq!(config.server.listen, default_listen());
        assert_eq!(config.aliases, AliasTable::default());
    }

    #[test]
    fn test_load_config_with_alias_override() {
        let path = write_config(
            "riskviz_config_aliases.toml",
            r#"
            [server]
            listen = "127.0.0.1:9000"

            [dataset]
            path = "assets.json"

            [aliases]
            asset_name = ["Site", "site_name"]
            "#,
        );

        let config = load_config_from(path.to_str().unwrap()).unwrap();

        assert_eq!(config.server.listen.port(), 9000);
        assert_eq!(config.aliases.asset_name, vec!["Site", "site_name"]);
        assert_eq!(config.aliases.year, AliasTable::default().year);
    }

    #[test]
    fn test_missing_dataset_section_is_an_error() {
        let path = write_config(
            "riskviz_config_missing.toml",
            r#"
            [server]
            listen = "127.0.0.1:9000"
            "#,
        );

        assert!(load_config_from(path.to_str().unwrap()).is_err());
    }
}
