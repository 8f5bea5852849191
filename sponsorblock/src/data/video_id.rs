use std::{borrow::Cow, fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static VIDEO_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
  Regex::new(
    r"^.+?/(?:watch\?v=)?(?:embed/watch\?feature=player_embedded&v=)?([a-zA-Z0-9_-]{11})",
  )
  .unwrap() // constant pattern
});

/// An 11-character video id, extracted from a raw id or a video url.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct VideoId(String);

impl VideoId {
  pub const LEN: usize = 11;

  /// Accepts a raw id (anything exactly 11 chars long) or a url that
  /// contains one, e.g. `https://www.youtube.com/watch?v=kJQP7kiw5Fk`.
  pub fn parse(input: &str) -> Result<VideoId> {
    if input.chars().count() == Self::LEN {
      return Ok(VideoId(input.to_string()));
    }
    VIDEO_ID_REGEX
      .captures(input)
      .and_then(|captures| captures.get(1))
      .map(|id| VideoId(id.as_str().to_string()))
      .ok_or_else(|| Error::InvalidVideoId(input.to_string()))
  }

  #[inline]
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Truncated SHA-256 of the id, as sent to the K-Anonymity endpoint.
  pub fn hash_prefix(&self, len: usize) -> Result<String> {
    kanon_hash::hash_prefix(&self.0, len).ok_or(Error::InvalidHashLength(len))
  }
}

impl FromStr for VideoId {
  type Err = Error;

  #[inline]
  fn from_str(s: &str) -> Result<Self> {
    VideoId::parse(s)
  }
}

impl AsRef<str> for VideoId {
  #[inline]
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for VideoId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<VideoId> for String {
  fn from(val: VideoId) -> Self {
    val.0
  }
}

impl<'de> Deserialize<'de> for VideoId {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let raw = Cow::<'de, str>::deserialize(deserializer)?;
    VideoId::parse(&raw).map_err(serde::de::Error::custom)
  }
}
