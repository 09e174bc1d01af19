use std::{fs::File, io::Read};

use camino::Utf8PathBuf;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Deserialize)]
pub struct Config {
    pub system: System,
    pub media: Media,
}

#[derive(Deserialize)]
pub struct System {
    /// directory that will contain `mixtape.sqlite`
    pub data_path: Utf8PathBuf,
}

#[derive(Deserialize)]
pub struct Media {
    /// root directory for uploaded files
    pub upload_root: Utf8PathBuf,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

const DEFAULT_CFG: &str = "mixtape.toml";
impl Config {
    pub fn new(path: Option<String>) -> Result<Self, Error> {
        let path = path.unwrap_or_else(|| {
            info!("no config file path provided, using default ({DEFAULT_CFG})");
            DEFAULT_CFG.to_string()
        });

        let mut fh = File::open(path)?;
        let mut data = String::new();
        fh.read_to_string(&mut data)?;

        Ok(toml::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_a_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[system]\ndata_path = \"/var/lib/mixtape\"\n\n[media]\nupload_root = \"/srv/media\"\n"
        )
        .unwrap();

        let config = Config::new(Some(file.path().to_str().unwrap().to_string())).unwrap();
        assert_eq!(config.system.data_path, "/var/lib/mixtape");
        assert_eq!(config.media.upload_root, "/srv/media");
    }
}
