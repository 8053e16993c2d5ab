//! Command line flags.
//!
//! Flags override the config file and `MEDIACAT_` environment variables.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;
use mediacat_core::Config;

#[derive(Debug, Clone, Parser)]
#[command(name = "mediacat", version, about = "Index a music directory and serve it over HTTP")]
pub struct Cli {
    /// Walk the music directory, index it into the database, then exit
    #[arg(long)]
    pub scan: bool,

    /// Directory to scan and serve [default: .]
    #[arg(long = "musicDir", value_name = "DIR")]
    pub music_dir: Option<PathBuf>,

    /// SQLite database file [default: media.db]
    #[arg(long, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Optional TOML config file
    #[arg(long, env = "MEDIACAT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Remove records for files that were not found during this scan
    #[arg(long)]
    pub prune: bool,

    /// Address to bind [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to bind [default: 12345]
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Apply flags that were given on top of a loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.music_dir {
            config.library.music_dir = dir.clone();
        }
        if let Some(path) = &self.database {
            config.database.path = path.clone();
        }
        if self.prune {
            config.library.prune_stale = true;
        }
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
