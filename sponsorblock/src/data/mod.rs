use serde::{Deserialize, Deserializer};

mod category;
mod segment;
mod stats;
mod user;
mod video_id;
mod vote;

pub use category::*;
pub use segment::*;
pub use stats::*;
pub use user::*;
pub use video_id::*;
pub use vote::*;

/// Server flags arrive as `0`/`1`, occasionally as booleans.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Inner {
    Bool(bool),
    Int(i64),
  }

  Ok(match Inner::deserialize(deserializer)? {
    Inner::Bool(value) => value,
    Inner::Int(value) => value != 0,
  })
}
