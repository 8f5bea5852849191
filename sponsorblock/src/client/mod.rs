//! Blocking client for the SponsorBlock HTTP API

use std::{fmt, num::NonZeroUsize, time::Duration};

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
  cache::TtlCache,
  config::ClientConfig,
  data::*,
  error::{self, Error, HttpErrorKind, Result},
};

mod identity;
mod segments;
mod stats;
mod transport;
mod users;

pub use identity::*;
pub use segments::*;
pub use transport::*;

/// Prelude for the endpoint modules
mod prelude {
  pub use log::{debug, warn};
  pub use serde_json::json;

  pub use super::{ApiRequest, Client, Transport};
  pub use crate::{
    data::*,
    error::{Error, HttpErrorKind, Result},
  };

  #[cfg(test)]
  pub(crate) use super::{test_client, transport::fake::FakeTransport};
}

const SEGMENTS_TTL: Duration = Duration::from_secs(5 * 60);
const USER_INFO_TTL: Duration = Duration::from_secs(15 * 60);
const VOLATILE_TTL: Duration = Duration::from_secs(60);
const TOP_USERS_TTL: Duration = Duration::from_secs(60 * 60);
const LOOKUP_CAPACITY: usize = 300;

/// One cache per read operation, keyed by that operation's arguments.
struct Caches {
  skip_segments: TtlCache<(VideoId, SegmentQuery), Vec<Segment>>,
  skip_segments_hashed: TtlCache<(VideoId, SegmentQuery), Vec<Segment>>,
  user_info: TtlCache<Option<String>, User>,
  views: TtlCache<(), u64>,
  saved_time: TtlCache<(), f64>,
  user_name: TtlCache<(), String>,
  top_users: TtlCache<SortType, Vec<TopUser>>,
  total_stats: TtlCache<bool, TotalStats>,
  days_saved: TtlCache<(), f64>,
  segment_info: TtlCache<Vec<String>, Vec<SegmentInfo>>,
  user_search: TtlCache<(String, bool), Vec<SearchedUser>>,
}

impl Caches {
  fn new() -> Self {
    // SAFETY: non-zero constant
    let capacity = unsafe { NonZeroUsize::new_unchecked(LOOKUP_CAPACITY) };
    Self {
      skip_segments: TtlCache::with_ttl(SEGMENTS_TTL),
      skip_segments_hashed: TtlCache::with_ttl(SEGMENTS_TTL),
      user_info: TtlCache::with_ttl(USER_INFO_TTL),
      views: TtlCache::with_ttl(VOLATILE_TTL),
      saved_time: TtlCache::with_ttl(VOLATILE_TTL),
      user_name: TtlCache::with_ttl(VOLATILE_TTL),
      top_users: TtlCache::with_ttl(TOP_USERS_TTL),
      total_stats: TtlCache::with_ttl(VOLATILE_TTL),
      days_saved: TtlCache::with_ttl(VOLATILE_TTL),
      segment_info: TtlCache::with_capacity(capacity),
      user_search: TtlCache::with_capacity(capacity),
    }
  }

  fn clear(&self) {
    self.skip_segments.clear();
    self.skip_segments_hashed.clear();
    self.user_info.clear();
    self.views.clear();
    self.saved_time.clear();
    self.user_name.clear();
    self.top_users.clear();
    self.total_stats.clear();
    self.days_saved.clear();
    self.segment_info.clear();
    self.user_search.clear();
  }
}

/// A client for the SponsorBlock server.
///
/// Every operation blocks until the server answers. Read operations are
/// cached per client for a few minutes (see the individual methods).
///
/// ```no_run
/// let client = sponsorblock::Client::new()?;
/// let segments = client.get_skip_segments(
///   "https://www.youtube.com/watch?v=kJQP7kiw5Fk",
///   &Default::default(),
/// )?;
/// # Ok::<_, sponsorblock::Error>(())
/// ```
pub struct Client<T = reqwest::blocking::Client> {
  base_url: String,
  user_id: String,
  default_categories: Vec<Category>,
  hash_length: usize,
  user_agent: String,
  transport: T,
  caches: Caches,
}

impl<T> fmt::Debug for Client<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Client")
      .field("base_url", &self.base_url)
      .field("default_categories", &self.default_categories)
      .field("hash_length", &self.hash_length)
      .field("user_agent", &self.user_agent)
      .finish_non_exhaustive()
  }
}

impl Client {
  /// Default settings and a freshly generated user id.
  pub fn new() -> Result<Self> {
    Self::builder().build()
  }

  pub fn builder() -> ClientBuilder {
    ClientBuilder::default()
  }
}

impl<T: Transport> Client<T> {
  /// The private user id used for submissions and votes.
  #[inline]
  pub fn user_id(&self) -> &str {
    &self.user_id
  }

  #[inline]
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  #[inline]
  pub fn default_categories(&self) -> &[Category] {
    &self.default_categories
  }

  #[inline]
  pub fn hashed_video_id_length(&self) -> usize {
    self.hash_length
  }

  #[inline]
  pub fn transport(&self) -> &T {
    &self.transport
  }

  /// Drops every cached response.
  pub fn clear_caches(&self) {
    self.caches.clear();
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
    debug!("{} {}", request.method, request.url);
    self.transport.execute(request)
  }

  /// Sends a request whose answer carries no payload we use.
  fn call(&self, request: ApiRequest, recognized: &[HttpErrorKind]) -> Result<()> {
    let response = self.send(request)?;
    error::check_status(response, recognized).map(drop)
  }

  /// Sends a request and decodes its JSON answer.
  ///
  /// A body that is not JSON at all fails with [`Error::InvalidJson`] before
  /// the status is looked at; otherwise non-200 statuses are classified
  /// first and only a 200 body is mapped to `R`.
  fn fetch<R: DeserializeOwned>(
    &self,
    request: ApiRequest,
    recognized: &[HttpErrorKind],
  ) -> Result<R> {
    self
      .fetch_with_response(request, recognized)
      .map(|(value, _)| value)
  }

  fn fetch_with_response<R: DeserializeOwned>(
    &self,
    request: ApiRequest,
    recognized: &[HttpErrorKind],
  ) -> Result<(R, ApiResponse)> {
    let response = self.send(request)?;
    let value = match serde_json::from_str::<Value>(&response.body) {
      Ok(value) => value,
      Err(source) => return Err(Error::InvalidJson { response, source }),
    };
    let response = error::check_status(response, recognized)?;
    match serde_json::from_value(value) {
      Ok(decoded) => Ok((decoded, response)),
      Err(source) => Err(Error::InvalidJson { response, source }),
    }
  }
}

#[derive(Default)]
pub struct ClientBuilder {
  config: ClientConfig,
  user_id_store: Option<Box<dyn UserIdStore>>,
}

impl ClientBuilder {
  /// Replaces every setting at once.
  pub fn config(mut self, config: ClientConfig) -> Self {
    self.config = config;
    self
  }

  pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
    self.config.user_id = Some(user_id.into());
    self
  }

  pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
    self.config.base_url = base_url.into();
    self
  }

  pub fn default_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
    self.config.default_categories = categories.into_iter().collect();
    self
  }

  /// 4 to 32 hex chars; shorter prefixes hide the video better but make
  /// the server send more unrelated segments.
  pub fn hashed_video_id_length(mut self, len: usize) -> Self {
    self.config.hashed_video_id_length = len;
    self
  }

  pub fn timeout(mut self, timeout: Duration) -> Self {
    self.config.timeout = Some(timeout);
    self
  }

  pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
    self.config.user_agent = user_agent.into();
    self
  }

  /// Loads the user id from `store` when none is given, and saves a
  /// generated one back to it.
  pub fn user_id_store(mut self, store: impl UserIdStore + 'static) -> Self {
    self.user_id_store = Some(Box::new(store));
    self
  }

  /// Builds a client on top of a blocking reqwest client.
  pub fn build(self) -> Result<Client> {
    let http = reqwest::blocking::Client::builder()
      .user_agent(self.config.user_agent.as_str())
      .timeout(self.config.timeout)
      .build()?;
    self.build_with(http)
  }

  pub fn build_with<T: Transport>(self, transport: T) -> Result<Client<T>> {
    let ClientBuilder {
      config,
      user_id_store,
    } = self;
    config.validate()?;

    let user_id = resolve_user_id(config.user_id, user_id_store.as_deref());
    let default_categories = if config.default_categories.is_empty() {
      Category::defaults()
    } else {
      config.default_categories
    };

    Ok(Client {
      base_url: config.base_url.trim_end_matches('/').to_string(),
      user_id,
      default_categories,
      hash_length: config.hashed_video_id_length,
      user_agent: config.user_agent,
      transport,
      caches: Caches::new(),
    })
  }
}

#[cfg(test)]
pub(crate) fn test_client() -> Client<transport::fake::FakeTransport> {
  Client::builder()
    .user_id("local-user")
    .base_url("https://sb.test/")
    .build_with(Default::default())
    .unwrap()
}
