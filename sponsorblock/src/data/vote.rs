use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A vote on a segment.
///
/// Parsing only accepts a closed vocabulary:
/// `yes`, `upvote`, `up`, `good`, `1`, `true` for [`Vote::Up`],
/// `no`, `downvote`, `down`, `bad`, `0`, `false` for [`Vote::Down`],
/// `undo`, `20` for [`Vote::Undo`]. Anything else is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vote {
  Down,
  Up,
  Undo,
}

impl Vote {
  /// Value of the `type` field sent to `/api/voteOnSponsorTime`.
  pub const fn value(self) -> u8 {
    match self {
      Vote::Down => 0,
      Vote::Up => 1,
      Vote::Undo => 20,
    }
  }
}

impl FromStr for Vote {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "yes" | "upvote" | "up" | "good" | "1" | "true" => Ok(Vote::Up),
      "no" | "downvote" | "down" | "bad" | "0" | "false" => Ok(Vote::Down),
      "undo" | "20" => Ok(Vote::Undo),
      _ => Err(Error::InvalidVote(s.to_string())),
    }
  }
}

impl From<bool> for Vote {
  fn from(value: bool) -> Self {
    if value {
      Vote::Up
    } else {
      Vote::Down
    }
  }
}

impl TryFrom<i64> for Vote {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> {
    match value {
      1 => Ok(Vote::Up),
      0 => Ok(Vote::Down),
      20 => Ok(Vote::Undo),
      other => Err(Error::InvalidVote(other.to_string())),
    }
  }
}

/// Leaderboard ordering for `/api/getTopUsers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortType {
  #[default]
  MinutesSaved,
  ViewCount,
  TotalSubmissions,
}

impl SortType {
  pub const fn value(self) -> u8 {
    match self {
      SortType::MinutesSaved => 0,
      SortType::ViewCount => 1,
      SortType::TotalSubmissions => 2,
    }
  }
}
