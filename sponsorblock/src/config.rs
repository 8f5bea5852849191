use std::{
  fs::File,
  io::{BufReader, Read},
  path::Path,
  time::Duration,
};

use serde::Deserialize;

use crate::{
  data::Category,
  error::{Error, Result},
};

mod default;

pub use default::*;

/// Client settings, usually read from a TOML file:
///
/// ```toml
/// base-url = "https://sponsor.ajay.app"
/// default-categories = ["sponsor", "selfpromo"]
/// hashed-video-id-length = 4
/// timeout = "10s"
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
  #[serde(default = "base_url_default")]
  pub base_url: String,
  /// Private user id; generated when absent.
  #[serde(default)]
  pub user_id: Option<String>,
  #[serde(alias = "categories")]
  #[serde(default = "default_categories_default")]
  pub default_categories: Vec<Category>,
  #[serde(alias = "hash-length")]
  #[serde(default = "hashed_video_id_length_default")]
  pub hashed_video_id_length: usize,
  /// Whole-request deadline enforced by the http client.
  #[serde(default, with = "humantime_serde")]
  pub timeout: Option<Duration>,
  #[serde(default = "user_agent_default")]
  pub user_agent: String,
}

impl ClientConfig {
  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|error| {
      Error::Config(format!(
        "Failed to open config file `{}`, {error}",
        path.to_string_lossy()
      ))
    })?;
    let size_hint = file
      .metadata()
      .map(|metadata| metadata.len() as usize)
      .unwrap_or(8 * 1024);
    let mut buf = String::with_capacity(size_hint);
    BufReader::new(file)
      .read_to_string(&mut buf)
      .map_err(|error| {
        Error::Config(format!(
          "Failed to read config file `{}`, {error}",
          path.to_string_lossy()
        ))
      })?;
    Self::from_toml(&buf).map_err(|error| {
      Error::Config(format!(
        "Failed to deserialize config file `{}`, {error}",
        path.to_string_lossy()
      ))
    })
  }

  pub fn from_toml(text: &str) -> Result<Self> {
    let config: ClientConfig = toml::from_str(text).map_err(|error| Error::Config(error.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    if !kanon_hash::PREFIX_LEN_RANGE.contains(&self.hashed_video_id_length) {
      return Err(Error::InvalidHashLength(self.hashed_video_id_length));
    }
    if self.base_url.trim().is_empty() {
      return Err(Error::Config("base url must not be empty".to_string()));
    }
    Ok(())
  }
}
