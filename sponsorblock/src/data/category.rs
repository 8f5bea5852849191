use std::fmt;

use serde::{Deserialize, Serialize};

/// Segment category, see <https://wiki.sponsor.ajay.app/w/Types>.
///
/// Unknown strings from the server are kept verbatim in [`Category::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
  Sponsor,
  SelfPromo,
  Interaction,
  Intro,
  Outro,
  Preview,
  MusicOfftopic,
  PoiHighlight,
  Filler,
  ExclusiveAccess,
  Chapter,
  Other(String),
}

macro_rules! categories {
  (
    $(
      ( $variant:ident, $wire:literal, $display:literal $(,)? )
    ),+
    $(,)?
  ) => {
    impl Category {
      pub const KNOWN: &'static [Category] = &[$(Category::$variant,)+];

      pub fn as_str(&self) -> &str {
        match self {
          $(
            Category::$variant => $wire,
          )+
          Category::Other(raw) => raw.as_str(),
        }
      }

      /// Human readable name, as shown by the extension.
      pub fn display_name(&self) -> &str {
        match self {
          $(
            Category::$variant => $display,
          )+
          Category::Other(raw) => raw.as_str(),
        }
      }

      fn from_wire(raw: &str) -> Option<Category> {
        match raw {
          $(
            $wire => Some(Category::$variant),
          )+
          _ => None,
        }
      }
    }
  }
}

categories! {
  (Sponsor, "sponsor", "Sponsor"),
  (SelfPromo, "selfpromo", "Unpaid/Self Promotion"),
  (Interaction, "interaction", "Interaction Reminder"),
  (Intro, "intro", "Intermission/Intro Animation"),
  (Outro, "outro", "Endcards/Credits"),
  (Preview, "preview", "Preview/Recap"),
  (MusicOfftopic, "music_offtopic", "Music: Non-Music Section"),
  (PoiHighlight, "poi_highlight", "Point of Interest"),
  (Filler, "filler", "Filler"),
  (ExclusiveAccess, "exclusive_access", "Exclusive Access"),
  (Chapter, "chapter", "Chapter"),
}

impl Category {
  /// Categories requested when the caller does not pick any.
  pub fn defaults() -> Vec<Category> {
    Category::KNOWN[..8].to_vec()
  }

  #[inline]
  pub fn is_known(&self) -> bool {
    !matches!(self, Category::Other(_))
  }
}

impl From<&str> for Category {
  fn from(value: &str) -> Self {
    Category::from_wire(value).unwrap_or_else(|| Category::Other(value.to_string()))
  }
}

impl From<String> for Category {
  fn from(value: String) -> Self {
    Category::from_wire(&value).unwrap_or(Category::Other(value))
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for Category {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for Category {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    String::deserialize(deserializer).map(Category::from)
  }
}

#[test]
fn category_test() {
  use serde_json::json;

  assert_eq!(Category::from("music_offtopic"), Category::MusicOfftopic);
  assert_eq!(Category::MusicOfftopic.to_string(), "music_offtopic");
  assert_eq!(Category::SelfPromo.display_name(), "Unpaid/Self Promotion");

  let other: Category = serde_json::from_value(json!("mystery")).unwrap();
  assert_eq!(other, Category::Other("mystery".to_string()));
  assert!(!other.is_known());
  assert_eq!(serde_json::to_value(&other).unwrap(), json!("mystery"));

  let defaults = Category::defaults();
  assert_eq!(defaults.len(), 8);
  assert_eq!(defaults.first(), Some(&Category::Sponsor));
  assert_eq!(defaults.last(), Some(&Category::PoiHighlight));
}
