use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{flag, Category};

/// A skip segment.
///
/// Segments from the server carry a uuid, duration, action type and the raw
/// record. Segments built with [`Segment::new`] only carry what a submission
/// needs. `end >= start` is assumed for server data but never checked; a
/// reversed span reports a zero duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
  category: Category,
  start: f64,
  end: f64,
  uuid: Option<String>,
  duration: Option<Duration>,
  action_type: Option<String>,
  data: Option<Value>,
}

impl Segment {
  /// `start` and `end` in seconds.
  pub fn new(category: impl Into<Category>, start: f64, end: f64) -> Segment {
    Segment {
      category: category.into(),
      start,
      end,
      uuid: None,
      duration: None,
      action_type: None,
      data: None,
    }
  }

  pub fn from_durations(category: impl Into<Category>, start: Duration, end: Duration) -> Segment {
    Segment::new(category, start.as_secs_f64(), end.as_secs_f64())
  }

  #[inline]
  pub fn with_action_type(mut self, action_type: impl Into<String>) -> Self {
    self.action_type = Some(action_type.into());
    self
  }

  #[inline]
  pub fn category(&self) -> &Category {
    &self.category
  }

  #[inline]
  pub fn start(&self) -> f64 {
    self.start
  }

  #[inline]
  pub fn end(&self) -> f64 {
    self.end
  }

  #[inline]
  pub fn uuid(&self) -> Option<&str> {
    self.uuid.as_deref()
  }

  /// Set for segments received from the server.
  #[inline]
  pub fn duration(&self) -> Option<Duration> {
    self.duration
  }

  #[inline]
  pub fn action_type(&self) -> Option<&str> {
    self.action_type.as_deref()
  }

  /// The raw record this segment was decoded from.
  #[inline]
  pub fn data(&self) -> Option<&Value> {
    self.data.as_ref()
  }

  /// `end - start`, zero if the span is reversed.
  pub fn span(&self) -> Duration {
    Duration::try_from_secs_f64(self.end - self.start).unwrap_or_default()
  }

  /// Wire shape of one entry in a `/api/skipSegments` submission.
  pub(crate) fn to_submission(&self) -> SubmittedSegment<'_> {
    SubmittedSegment {
      segment: [self.start, self.end],
      category: &self.category,
      action_type: self.action_type.as_deref(),
    }
  }
}

#[derive(Deserialize)]
struct RawSegment {
  category: Category,
  segment: (f64, f64),
  #[serde(rename = "UUID")]
  uuid: String,
  #[serde(rename = "actionType", default)]
  action_type: Option<String>,
}

impl<'de> Deserialize<'de> for Segment {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let data = Value::deserialize(deserializer)?;
    let raw = RawSegment::deserialize(&data).map_err(serde::de::Error::custom)?;
    let (start, end) = raw.segment;
    let mut segment = Segment::new(raw.category, start, end);
    segment.duration = Some(segment.span());
    segment.uuid = Some(raw.uuid);
    segment.action_type = raw.action_type;
    segment.data = Some(data);
    Ok(segment)
  }
}

#[derive(Serialize, Debug)]
pub(crate) struct SubmittedSegment<'a> {
  segment: [f64; 2],
  category: &'a Category,
  #[serde(rename = "actionType", skip_serializing_if = "Option::is_none")]
  action_type: Option<&'a str>,
}

/// Full provenance of one segment, from `/api/segmentInfo`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentInfo {
  #[serde(rename = "videoID")]
  pub video_id: String,
  pub start_time: f64,
  pub end_time: f64,
  pub votes: i64,
  #[serde(deserialize_with = "flag")]
  pub locked: bool,
  #[serde(rename = "UUID")]
  pub uuid: String,
  #[serde(rename = "userID")]
  pub user_id: String,
  #[serde(deserialize_with = "epoch_millis")]
  pub time_submitted: DateTime<Utc>,
  pub views: u64,
  pub category: Category,
  #[serde(default)]
  pub action_type: Option<String>,
  pub service: String,
  #[serde(default)]
  pub video_duration: f64,
  #[serde(deserialize_with = "flag")]
  pub hidden: bool,
  pub reputation: f64,
  #[serde(deserialize_with = "flag")]
  pub shadow_hidden: bool,
  #[serde(rename = "hashedVideoID")]
  pub hashed_video_id: String,
  #[serde(default)]
  pub user_agent: String,
}

fn epoch_millis<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
  D: Deserializer<'de>,
{
  let millis = i64::deserialize(deserializer)?;
  DateTime::from_timestamp_millis(millis)
    .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {millis}")))
}

/// Anything that names a segment by uuid.
pub trait SegmentUuid {
  fn segment_uuid(&self) -> Option<&str>;
}

impl SegmentUuid for str {
  fn segment_uuid(&self) -> Option<&str> {
    Some(self)
  }
}

impl SegmentUuid for String {
  fn segment_uuid(&self) -> Option<&str> {
    Some(self)
  }
}

impl SegmentUuid for Segment {
  fn segment_uuid(&self) -> Option<&str> {
    self.uuid()
  }
}

impl SegmentUuid for SegmentInfo {
  fn segment_uuid(&self) -> Option<&str> {
    Some(&self.uuid)
  }
}

impl<T: SegmentUuid + ?Sized> SegmentUuid for &T {
  fn segment_uuid(&self) -> Option<&str> {
    (**self).segment_uuid()
  }
}
