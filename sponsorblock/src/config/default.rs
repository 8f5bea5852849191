use super::*;

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url: base_url_default(),
      user_id: None,
      default_categories: default_categories_default(),
      hashed_video_id_length: hashed_video_id_length_default(),
      timeout: None,
      user_agent: user_agent_default(),
    }
  }
}

pub const DEFAULT_BASE_URL: &str = "https://sponsor.ajay.app";

#[inline]
pub fn base_url_default() -> String {
  DEFAULT_BASE_URL.to_string()
}

#[inline]
pub fn default_categories_default() -> Vec<Category> {
  Category::defaults()
}

#[inline]
pub fn hashed_video_id_length_default() -> usize {
  4
}

#[inline]
pub fn user_agent_default() -> String {
  crate::USER_AGENT.to_string()
}
