use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use crate::identity::IdentityAlgorithm;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    12345
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("media.db")
}

/// Media library configuration (scan root and static serving)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Directory to scan, also the root of the static file server.
    #[serde(default = "default_music_dir")]
    pub music_dir: PathBuf,
    /// URL prefix under which files are served (default: "/static/").
    #[serde(default = "default_static_prefix")]
    pub static_prefix: String,
    /// Digest used for record identities.
    #[serde(default)]
    pub identity_algorithm: IdentityAlgorithm,
    /// Follow symlinks while walking (default: false).
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Only consider files with these extensions. Empty means every file.
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Remove records whose file was not seen during a scan (default: false).
    #[serde(default)]
    pub prune_stale: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            music_dir: default_music_dir(),
            static_prefix: default_static_prefix(),
            identity_algorithm: IdentityAlgorithm::default(),
            follow_symlinks: false,
            extensions: Vec::new(),
            prune_stale: false,
        }
    }
}

fn default_music_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_static_prefix() -> String {
    "/static/".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 12345);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.database.path.to_str().unwrap(), "media.db");
        assert_eq!(config.library.music_dir.to_str().unwrap(), ".");
        assert_eq!(config.library.static_prefix, "/static/");
        assert_eq!(config.library.identity_algorithm, IdentityAlgorithm::Md5);
        assert!(!config.library.follow_symlinks);
        assert!(!config.library.prune_stale);
        assert!(config.library.extensions.is_empty());
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[database]
path = "/data/catalog.db"

[library]
music_dir = "/srv/music"
static_prefix = "/files/"
identity_algorithm = "sha256"
follow_symlinks = true
extensions = ["mp3", "flac"]
prune_stale = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.database.path.to_str().unwrap(), "/data/catalog.db");
        assert_eq!(config.library.music_dir.to_str().unwrap(), "/srv/music");
        assert_eq!(config.library.static_prefix, "/files/");
        assert_eq!(config.library.identity_algorithm, IdentityAlgorithm::Sha256);
        assert!(config.library.follow_symlinks);
        assert_eq!(config.library.extensions, vec!["mp3", "flac"]);
        assert!(config.library.prune_stale);
    }

    #[test]
    fn test_deserialize_unknown_algorithm_fails() {
        let toml = r#"
[library]
identity_algorithm = "crc32"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }
}
