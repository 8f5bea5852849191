use serde::Deserialize;

/// Aggregated account record from `/api/userInfo`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  #[serde(rename = "userID")]
  pub user_id: String,
  pub user_name: String,
  pub minutes_saved: f64,
  pub segment_count: u64,
  #[serde(default)]
  pub ignored_segment_count: u64,
  pub view_count: u64,
  #[serde(default)]
  pub ignored_view_count: u64,
  #[serde(default)]
  pub warnings: u64,
  #[serde(default)]
  pub reputation: f64,
  #[serde(default)]
  pub vip: bool,
  /// `None` until the user submits a segment.
  #[serde(rename = "lastSegmentID", default)]
  pub last_segment_id: Option<String>,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq)]
pub struct TopUser {
  pub user_name: String,
  pub view_count: u64,
  pub total_submissions: u64,
  pub minutes_saved: f64,
}

/// `/api/getTopUsers` answers with parallel arrays, one per column.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TopUsersColumns {
  user_names: Vec<String>,
  view_counts: Vec<u64>,
  total_submissions: Vec<u64>,
  minutes_saved: Vec<f64>,
}

impl TopUsersColumns {
  /// Zips the columns row by row, stopping at the shortest one.
  pub(crate) fn into_rows(self) -> Vec<TopUser> {
    self
      .user_names
      .into_iter()
      .zip(self.view_counts)
      .zip(self.total_submissions)
      .zip(self.minutes_saved)
      .map(
        |(((user_name, view_count), total_submissions), minutes_saved)| TopUser {
          user_name,
          view_count,
          total_submissions,
          minutes_saved,
        },
      )
      .collect()
  }
}

/// A user found by name through `/api/userID`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchedUser {
  #[serde(rename = "userName")]
  pub name: String,
  #[serde(rename = "userID")]
  pub id: String,
}
