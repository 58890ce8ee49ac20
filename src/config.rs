//! Runtime configuration and data folder layout
//!
//! Resolution priority for every knob: command-line argument, then
//! environment variable, then compiled default. All persistent state lives
//! under one data directory:
//!
//! ```text
//! <data>/default/tags/      pristine tag snapshot (read-only)
//! <data>/default/prompt.json job-graph template
//! <data>/public/tags/       active tag catalogs + deletion journal
//! <data>/public/images/     generated images
//! <data>/public/thumbnails/ thumbnails
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "genbooth", about = "Image generation relay and tag catalog backend")]
pub struct Args {
    /// Base data directory holding default/ and public/
    #[arg(long, env = "GENBOOTH_DATA", default_value = ".")]
    pub data_dir: PathBuf,

    /// host:port of the generation backend
    #[arg(long, env = "GENBOOTH_BACKEND", default_value = "127.0.0.1:8188")]
    pub backend_address: String,

    /// Port to listen on
    #[arg(long, env = "GENBOOTH_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Seconds to wait for a generation job before giving up
    #[arg(long, env = "GENBOOTH_GENERATION_TIMEOUT", default_value_t = 600)]
    pub generation_timeout: u64,
}

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub backend_address: String,
    pub port: u16,
    pub generation_timeout: Duration,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        Self {
            data_dir: args.data_dir,
            backend_address: args.backend_address,
            port: args.port,
            generation_timeout: Duration::from_secs(args.generation_timeout),
        }
    }

    /// Active tag catalogs (mutable copy)
    pub fn tags_dir(&self) -> PathBuf {
        self.data_dir.join("public").join("tags")
    }

    /// Pristine tag snapshot used for seeding and full reset
    pub fn default_tags_dir(&self) -> PathBuf {
        self.data_dir.join("default").join("tags")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.data_dir.join("public").join("images")
    }

    pub fn thumbnails_dir(&self) -> PathBuf {
        self.data_dir.join("public").join("thumbnails")
    }

    /// Node-graph template submitted to the generation backend
    pub fn prompt_template_path(&self) -> PathBuf {
        self.data_dir.join("default").join("prompt.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_hang_off_data_dir() {
        let config = Config {
            data_dir: PathBuf::from("/srv/booth"),
            backend_address: "127.0.0.1:8188".to_string(),
            port: 8000,
            generation_timeout: Duration::from_secs(600),
        };

        assert_eq!(config.tags_dir(), PathBuf::from("/srv/booth/public/tags"));
        assert_eq!(
            config.default_tags_dir(),
            PathBuf::from("/srv/booth/default/tags")
        );
        assert_eq!(
            config.prompt_template_path(),
            PathBuf::from("/srv/booth/default/prompt.json")
        );
    }
}
