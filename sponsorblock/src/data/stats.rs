use serde::{Deserialize, Deserializer};

/// Service-wide counters from `/api/getTotalStats`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalStats {
  /// Only present when contributing users were requested.
  #[serde(default)]
  pub user_count: Option<u64>,
  /// Sum of public install stats from the browser extension stores.
  pub active_users: u64,
  /// API users active in the last 48 hours.
  pub api_users: u64,
  pub view_count: u64,
  pub total_submissions: u64,
  pub minutes_saved: f64,
}

/// `/api/getDaysSavedFormatted` sends the number as a string.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DaysSaved {
  #[serde(deserialize_with = "number_or_string")]
  pub days_saved: f64,
}

fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Inner {
    Number(f64),
    Text(String),
  }

  match Inner::deserialize(deserializer)? {
    Inner::Number(number) => Ok(number),
    Inner::Text(text) => text
      .trim()
      .parse()
      .map_err(|error| serde::de::Error::custom(format!("invalid number `{text}`, {error}"))),
  }
}

#[test]
fn stats_test() {
  use serde_json::json;

  let stats: TotalStats = serde_json::from_value(json!({
    "userCount": 170551,
    "activeUsers": 295571,
    "apiUsers": 1323906,
    "viewCount": 286114842,
    "totalSubmissions": 1946245,
    "minutesSaved": 144998543.20013103
  }))
  .unwrap();
  assert_eq!(stats.user_count, Some(170551));

  let stats: TotalStats = serde_json::from_value(json!({
    "activeUsers": 1,
    "apiUsers": 2,
    "viewCount": 3,
    "totalSubmissions": 4,
    "minutesSaved": 5
  }))
  .unwrap();
  assert_eq!(stats.user_count, None);

  let days: DaysSaved = serde_json::from_value(json!({"daysSaved": "132654.20"})).unwrap();
  assert_eq!(days.days_saved, 132654.20);
  let days: DaysSaved = serde_json::from_value(json!({"daysSaved": 12.5})).unwrap();
  assert_eq!(days.days_saved, 12.5);
  assert!(serde_json::from_value::<DaysSaved>(json!({"daysSaved": "lots"})).is_err());
}
