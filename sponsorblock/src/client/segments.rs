use serde::Deserialize;

use super::prelude::*;

pub const DEFAULT_SERVICE: &str = "YouTube";

const LOOKUP_STATUSES: &[HttpErrorKind] = &[HttpErrorKind::BadRequest, HttpErrorKind::NotFound];
const SUBMIT_STATUSES: &[HttpErrorKind] = &[
  HttpErrorKind::BadRequest,
  HttpErrorKind::Forbidden,
  HttpErrorKind::Duplicate,
  HttpErrorKind::RateLimited,
];
const VOTE_STATUSES: &[HttpErrorKind] = &[HttpErrorKind::BadRequest, HttpErrorKind::Forbidden];
const VIEWED_STATUSES: &[HttpErrorKind] = &[HttpErrorKind::BadRequest];

/// Filters for a skip segment lookup.
///
/// ```
/// use sponsorblock::{Category, SegmentQuery};
///
/// let query = SegmentQuery::default()
///   .categories([Category::Sponsor, Category::Outro])
///   .required_segments(["728cbf17"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SegmentQuery {
  /// Empty means the client's default categories.
  pub categories: Vec<Category>,
  /// Segments to return even below the vote threshold.
  pub required_segments: Vec<String>,
  pub service: String,
}

impl Default for SegmentQuery {
  fn default() -> Self {
    Self {
      categories: Vec::new(),
      required_segments: Vec::new(),
      service: DEFAULT_SERVICE.to_string(),
    }
  }
}

impl SegmentQuery {
  /// Only this category, replacing any list set before.
  pub fn category(mut self, category: impl Into<Category>) -> Self {
    self.categories = vec![category.into()];
    self
  }

  pub fn categories<I>(mut self, categories: I) -> Self
  where
    I: IntoIterator,
    I::Item: Into<Category>,
  {
    self.categories = categories.into_iter().map(Into::into).collect();
    self
  }

  pub fn required_segments<I>(mut self, uuids: I) -> Self
  where
    I: IntoIterator,
    I::Item: Into<String>,
  {
    self.required_segments = uuids.into_iter().map(Into::into).collect();
    self
  }

  pub fn service(mut self, service: impl Into<String>) -> Self {
    self.service = service.into();
    self
  }
}

/// One video in a K-Anonymity answer.
#[derive(Deserialize, Debug)]
struct HashedVideo {
  #[serde(rename = "videoID")]
  video_id: String,
  #[serde(default)]
  segments: Vec<Segment>,
}

impl<T: Transport> Client<T> {
  /// Skip segments of a video, in the order the server sent them.
  ///
  /// `video` is a raw id or a video url. Cached for 5 minutes.
  pub fn get_skip_segments(&self, video: &str, query: &SegmentQuery) -> Result<Vec<Segment>> {
    let video_id = VideoId::parse(video)?;
    let key = (video_id.clone(), query.clone());
    self.caches.skip_segments.get_or_try_insert_with(key, || {
      let request = self
        .segment_request("/api/skipSegments", query)
        .query("videoID", &video_id);
      self.fetch(request, LOOKUP_STATUSES)
    })
  }

  /// Like [`Client::get_skip_segments`], but only sends a prefix of the
  /// SHA-256 of the video id. The server answers for every video sharing
  /// the prefix and the segments of the requested one are picked out here.
  ///
  /// Fails with [`HttpErrorKind::BadRequest`] when the requested video is
  /// not part of the answer. Cached for 5 minutes.
  pub fn get_skip_segments_with_hash(
    &self,
    video: &str,
    query: &SegmentQuery,
  ) -> Result<Vec<Segment>> {
    let video_id = VideoId::parse(video)?;
    let prefix = video_id.hash_prefix(self.hash_length)?;
    self.hashed_lookup(video_id, &prefix, query)
  }

  /// [`Client::get_skip_segments_with_hash`] with a prefix the caller
  /// already computed, 4 to 32 hex chars of the SHA-256 of the video id.
  /// Shares its cache with the computed-prefix lookup.
  pub fn get_skip_segments_with_prefix(
    &self,
    video: &str,
    prefix: &str,
    query: &SegmentQuery,
  ) -> Result<Vec<Segment>> {
    if !kanon_hash::PREFIX_LEN_RANGE.contains(&prefix.len()) {
      return Err(Error::InvalidHashLength(prefix.len()));
    }
    let video_id = VideoId::parse(video)?;
    self.hashed_lookup(video_id, prefix, query)
  }

  fn hashed_lookup(
    &self,
    video_id: VideoId,
    prefix: &str,
    query: &SegmentQuery,
  ) -> Result<Vec<Segment>> {
    let key = (video_id.clone(), query.clone());
    self.caches.skip_segments_hashed.get_or_try_insert_with(key, || {
      let request = self.segment_request(&format!("/api/skipSegments/{prefix}"), query);
      let (videos, response): (Vec<HashedVideo>, _) =
        self.fetch_with_response(request, LOOKUP_STATUSES)?;

      match videos
        .into_iter()
        .find(|video| video.video_id == video_id.as_str())
      {
        Some(video) => Ok(video.segments),
        None => {
          warn!("No video `{video_id}` among the results for hash prefix `{prefix}`");
          Err(http_err!(
            HttpErrorKind::BadRequest,
            response,
            "No video returned from server with the specified hash"
          ))
        },
      }
    })
  }

  fn segment_request(&self, path: &str, query: &SegmentQuery) -> ApiRequest {
    let categories = if query.categories.is_empty() {
      &self.default_categories
    } else {
      &query.categories
    };
    ApiRequest::get(self.url(path))
      .query_all("category", categories)
      .query_all("requiredSegments", &query.required_segments)
      .query("service", &query.service)
  }

  /// Submits segments for a video. Times are sent as plain seconds.
  ///
  /// `service` defaults to [`DEFAULT_SERVICE`].
  pub fn add_skip_segments(
    &self,
    video: &str,
    segments: &[Segment],
    service: Option<&str>,
  ) -> Result<()> {
    if segments.is_empty() {
      return Err(Error::MissingArgument("segments"));
    }
    let video_id = VideoId::parse(video)?;
    let body = json!({
      "videoID": video_id,
      "userID": self.user_id,
      "userAgent": self.user_agent,
      "service": service.unwrap_or(DEFAULT_SERVICE),
      "segments": segments.iter().map(Segment::to_submission).collect::<Vec<_>>(),
    });
    let request = ApiRequest::post(self.url("/api/skipSegments")).json(body);
    self.call(request, SUBMIT_STATUSES)
  }

  /// Votes on a segment, or suggests a different category for it.
  /// At least one of `vote` and `category` is required.
  pub fn vote_skip_segment<S>(
    &self,
    segment: &S,
    vote: Option<Vote>,
    category: Option<Category>,
  ) -> Result<()>
  where
    S: SegmentUuid + ?Sized,
  {
    if vote.is_none() && category.is_none() {
      return Err(Error::MissingArgument("vote or category"));
    }
    let uuid = segment
      .segment_uuid()
      .ok_or(Error::MissingArgument("uuid"))?;

    let mut form = vec![
      ("UUID".to_string(), uuid.to_string()),
      ("userID".to_string(), self.user_id.clone()),
    ];
    if let Some(vote) = vote {
      form.push(("type".to_string(), vote.value().to_string()));
    }
    if let Some(category) = category {
      form.push(("category".to_string(), category.to_string()));
    }

    let request = ApiRequest::post(self.url("/api/voteOnSponsorTime")).form(form);
    self.call(request, VOTE_STATUSES)
  }

  /// Tells the server a segment was skipped.
  pub fn post_viewed_video_sponsor_time<S>(&self, segment: &S) -> Result<()>
  where
    S: SegmentUuid + ?Sized,
  {
    let uuid = segment
      .segment_uuid()
      .ok_or(Error::MissingArgument("uuid"))?;
    let request = ApiRequest::post(self.url("/api/viewedVideoSponsorTime")).query("UUID", uuid);
    self.call(request, VIEWED_STATUSES)
  }

  /// Detailed information about segments. Keeps the last 300 lookups.
  pub fn get_segment_info<S: SegmentUuid>(&self, segments: &[S]) -> Result<Vec<SegmentInfo>> {
    if segments.is_empty() {
      return Err(Error::MissingArgument("segments"));
    }
    let uuids = segments
      .iter()
      .map(|segment| {
        segment
          .segment_uuid()
          .map(str::to_string)
          .ok_or(Error::MissingArgument("uuid"))
      })
      .collect::<Result<Vec<_>>>()?;

    self
      .caches
      .segment_info
      .get_or_try_insert_with(uuids.clone(), || {
        let request = ApiRequest::get(self.url("/api/segmentInfo")).query_all("UUID", &uuids);
        self.fetch(request, LOOKUP_STATUSES)
      })
  }
}

#[cfg(test)]
mod tests {
  use http::Method;

  use super::*;
  use crate::client::RequestBody;

  const ID: &str = "kJQP7kiw5Fk";

  fn segments_json() -> &'static str {
    r#"[
      {"category": "music_offtopic", "segment": [249.6543, 281.521], "UUID": "ae38", "actionType": "skip"},
      {"category": "music_offtopic", "segment": [0, 21.808434], "UUID": "728c", "actionType": "skip"}
    ]"#
  }

  fn hashed_json() -> String {
    format!(
      r#"[
        {{"videoID": "aaaaaaaaaaa", "hash": "x", "segments": [
          {{"category": "sponsor", "segment": [1, 2], "UUID": "other", "actionType": "skip"}}
        ]}},
        {{"videoID": "{ID}", "hash": "y", "segments": [
          {{"category": "outro", "segment": [274.674, 281.521], "UUID": "cd33", "actionType": "skip"}}
        ]}}
      ]"#
    )
  }

  #[test]
  fn skip_segments_request_and_order() {
    let client = test_client();
    client.transport().respond(200, segments_json());

    let segments = client
      .get_skip_segments("https://www.youtube.com/watch?v=kJQP7kiw5Fk", &SegmentQuery::default())
      .unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].uuid(), Some("ae38"));
    assert_eq!(segments[1].start(), 0.0);

    let request = client.transport().last_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.url, "https://sb.test/api/skipSegments");
    assert_eq!(request.query_values("videoID").collect::<Vec<_>>(), [ID]);
    assert_eq!(request.query_values("category").count(), 8);
    assert_eq!(request.query_values("service").collect::<Vec<_>>(), ["YouTube"]);
    assert_eq!(request.query_values("requiredSegments").count(), 0);
  }

  #[test]
  fn skip_segments_cached_by_normalized_id() {
    let client = test_client();
    client.transport().respond(200, segments_json());
    let query = SegmentQuery::default();

    let first = client.get_skip_segments("https://youtu.be/kJQP7kiw5Fk", &query).unwrap();
    let second = client.get_skip_segments(ID, &query).unwrap();
    assert_eq!(first, second);
    assert_eq!(client.transport().calls(), 1);
  }

  #[test]
  fn skip_segments_query_changes_key() {
    let client = test_client();
    client.transport().respond(200, "[]").respond(200, "[]");

    client.get_skip_segments(ID, &SegmentQuery::default()).unwrap();
    let query = SegmentQuery::default()
      .categories(["sponsor", "intro"])
      .category(Category::Outro)
      .required_segments(["r1", "r2"]);
    client.get_skip_segments(ID, &query).unwrap();
    assert_eq!(client.transport().calls(), 2);

    let request = client.transport().last_request();
    assert_eq!(request.query_values("category").collect::<Vec<_>>(), ["outro"]);
    assert_eq!(
      request.query_values("requiredSegments").collect::<Vec<_>>(),
      ["r1", "r2"]
    );
  }

  #[test]
  fn skip_segments_invalid_id_sends_nothing() {
    let client = test_client();
    let error = client
      .get_skip_segments("invalid", &SegmentQuery::default())
      .unwrap_err();
    assert!(matches!(error, Error::InvalidVideoId(_)));
    assert_eq!(client.transport().calls(), 0);
  }

  #[test]
  fn skip_segments_statuses() {
    let cases = [
      (400, HttpErrorKind::BadRequest),
      (404, HttpErrorKind::NotFound),
      (500, HttpErrorKind::ServerError),
      (502, HttpErrorKind::ServerError),
      (403, HttpErrorKind::Unexpected),
      (429, HttpErrorKind::Unexpected),
    ];
    for (status, kind) in cases {
      let client = test_client();
      client.transport().respond(status, "{}");
      let error = client
        .get_skip_segments(ID, &SegmentQuery::default())
        .unwrap_err();
      assert_eq!(error.http_kind(), Some(kind), "{status}");
    }
  }

  #[test]
  fn failures_are_not_cached() {
    let client = test_client();
    client
      .transport()
      .respond(500, "{}")
      .respond(200, segments_json());

    assert!(client.get_skip_segments(ID, &SegmentQuery::default()).is_err());
    let segments = client.get_skip_segments(ID, &SegmentQuery::default()).unwrap();
    assert_eq!(segments.len(), 2);
    assert_eq!(client.transport().calls(), 2);
  }

  #[test]
  fn malformed_segment_is_invalid_json() {
    let client = test_client();
    client.transport().respond(200, r#"[{"category": "sponsor"}]"#);
    let error = client
      .get_skip_segments(ID, &SegmentQuery::default())
      .unwrap_err();
    assert!(matches!(error, Error::InvalidJson { .. }));
  }

  #[test]
  fn hashed_lookup_picks_exact_video() {
    let client = test_client();
    client.transport().respond(200, hashed_json());

    let segments = client
      .get_skip_segments_with_hash(ID, &SegmentQuery::default())
      .unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].uuid(), Some("cd33"));
    assert_eq!(segments[0].category(), &Category::Outro);

    let request = client.transport().last_request();
    let prefix = &kanon_hash::sha256_hex(ID)[..4];
    assert_eq!(request.url, format!("https://sb.test/api/skipSegments/{prefix}"));
    assert_eq!(request.query_values("videoID").count(), 0);

    client
      .get_skip_segments_with_hash(ID, &SegmentQuery::default())
      .unwrap();
    assert_eq!(client.transport().calls(), 1);
  }

  #[test]
  fn hashed_lookup_without_match() {
    let client = test_client();
    client.transport().respond(
      200,
      r#"[{"videoID": "aaaaaaaaaaa", "hash": "x", "segments": []}]"#,
    );
    let error = client
      .get_skip_segments_with_hash(ID, &SegmentQuery::default())
      .unwrap_err();
    assert_eq!(error.http_kind(), Some(HttpErrorKind::BadRequest));
    assert!(error.to_string().starts_with("No video returned from server"));
  }

  #[test]
  fn hashed_lookup_prefix_length() {
    let client = Client::builder()
      .user_id("local-user")
      .base_url("https://sb.test")
      .hashed_video_id_length(32)
      .build_with(FakeTransport::default())
      .unwrap();
    client.transport().respond(200, "[]");

    let error = client
      .get_skip_segments_with_hash(ID, &SegmentQuery::default())
      .unwrap_err();
    assert_eq!(error.http_kind(), Some(HttpErrorKind::BadRequest));
    let request = client.transport().last_request();
    let prefix = &kanon_hash::sha256_hex(ID)[..32];
    assert!(request.url.ends_with(prefix));
  }

  #[test]
  fn hashed_lookup_not_found() {
    let client = test_client();
    client.transport().respond(404, "[]");
    let error = client
      .get_skip_segments_with_hash(ID, &SegmentQuery::default())
      .unwrap_err();
    assert_eq!(error.http_kind(), Some(HttpErrorKind::NotFound));
  }

  #[test]
  fn hashed_lookup_explicit_prefix() {
    let client = test_client();
    client.transport().respond(200, hashed_json());

    let prefix = &kanon_hash::sha256_hex(ID)[..10];
    let segments = client
      .get_skip_segments_with_prefix(ID, prefix, &SegmentQuery::default())
      .unwrap();
    assert_eq!(segments[0].uuid(), Some("cd33"));
    assert_eq!(
      client.transport().last_request().url,
      format!("https://sb.test/api/skipSegments/{prefix}")
    );

    client
      .get_skip_segments_with_hash(ID, &SegmentQuery::default())
      .unwrap();
    assert_eq!(client.transport().calls(), 1);
  }

  #[test]
  fn explicit_prefix_length_checked() {
    let client = test_client();
    for prefix in ["abc", "0123456789abcdef0123456789abcdef0"] {
      let error = client
        .get_skip_segments_with_prefix(ID, prefix, &SegmentQuery::default())
        .unwrap_err();
      assert!(matches!(error, Error::InvalidHashLength(len) if len == prefix.len()));
    }
    assert_eq!(client.transport().calls(), 0);
  }

  #[test]
  fn submit_requires_segments() {
    let client = test_client();
    let error = client.add_skip_segments(ID, &[], None).unwrap_err();
    assert!(matches!(error, Error::MissingArgument("segments")));
    assert_eq!(client.transport().calls(), 0);
  }

  #[test]
  fn submit_body() {
    let client = test_client();
    client.transport().respond(200, "");

    let segments = [
      Segment::new(Category::MusicOfftopic, 0.0, 21.808434).with_action_type("skip"),
      Segment::from_durations(
        Category::Outro,
        std::time::Duration::from_secs(274),
        std::time::Duration::from_millis(281_500),
      ),
    ];
    client
      .add_skip_segments("https://youtu.be/kJQP7kiw5Fk", &segments, None)
      .unwrap();

    let request = client.transport().last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.url, "https://sb.test/api/skipSegments");
    let RequestBody::Json(body) = request.body else {
      panic!("expected a json body");
    };
    assert_eq!(body["videoID"], ID);
    assert_eq!(body["userID"], "local-user");
    assert_eq!(body["service"], "YouTube");
    assert_eq!(body["userAgent"], crate::USER_AGENT);
    assert_eq!(
      body["segments"],
      json!([
        {"segment": [0.0, 21.808434], "category": "music_offtopic", "actionType": "skip"},
        {"segment": [274.0, 281.5], "category": "outro"}
      ])
    );
  }

  #[test]
  fn submit_statuses() {
    let cases = [
      (400, HttpErrorKind::BadRequest),
      (403, HttpErrorKind::Forbidden),
      (409, HttpErrorKind::Duplicate),
      (429, HttpErrorKind::RateLimited),
      (404, HttpErrorKind::Unexpected),
      (503, HttpErrorKind::ServerError),
    ];
    let segments = [Segment::new(Category::Sponsor, 1.0, 2.0)];
    for (status, kind) in cases {
      let client = test_client();
      client.transport().respond(status, "nope");
      let error = client.add_skip_segments(ID, &segments, Some("PeerTube")).unwrap_err();
      assert_eq!(error.http_kind(), Some(kind), "{status}");
    }
  }

  #[test]
  fn vote_form() {
    let client = test_client();
    client.transport().respond(200, "").respond(200, "");

    client
      .vote_skip_segment("728c", Some("undo".parse().unwrap()), None)
      .unwrap();
    let request = client.transport().last_request();
    assert_eq!(request.url, "https://sb.test/api/voteOnSponsorTime");
    assert_eq!(
      request.body,
      RequestBody::Form(vec![
        ("UUID".to_string(), "728c".to_string()),
        ("userID".to_string(), "local-user".to_string()),
        ("type".to_string(), "20".to_string()),
      ])
    );

    let segment: Segment = serde_json::from_value(
      json!({"category": "intro", "segment": [0, 5], "UUID": "seg-1", "actionType": "skip"}),
    )
    .unwrap();
    client
      .vote_skip_segment(&segment, None, Some(Category::Outro))
      .unwrap();
    let request = client.transport().last_request();
    assert_eq!(
      request.body,
      RequestBody::Form(vec![
        ("UUID".to_string(), "seg-1".to_string()),
        ("userID".to_string(), "local-user".to_string()),
        ("category".to_string(), "outro".to_string()),
      ])
    );
  }

  #[test]
  fn vote_requires_arguments() {
    let client = test_client();
    let error = client.vote_skip_segment("728c", None, None).unwrap_err();
    assert!(matches!(error, Error::MissingArgument("vote or category")));

    let local = Segment::new(Category::Sponsor, 0.0, 1.0);
    let error = client
      .vote_skip_segment(&local, Some(Vote::Up), None)
      .unwrap_err();
    assert!(matches!(error, Error::MissingArgument("uuid")));
    assert_eq!(client.transport().calls(), 0);
  }

  #[test]
  fn vote_statuses() {
    let cases = [
      (400, HttpErrorKind::BadRequest),
      (403, HttpErrorKind::Forbidden),
      (409, HttpErrorKind::Unexpected),
      (500, HttpErrorKind::ServerError),
    ];
    for (status, kind) in cases {
      let client = test_client();
      client.transport().respond(status, "");
      let error = client
        .vote_skip_segment("728c", Some(Vote::Down), None)
        .unwrap_err();
      assert_eq!(error.http_kind(), Some(kind), "{status}");
    }
  }

  #[test]
  fn viewed_segment() {
    let client = test_client();
    client.transport().respond(200, "").respond(400, "");

    client.post_viewed_video_sponsor_time("728c").unwrap();
    let request = client.transport().last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.url, "https://sb.test/api/viewedVideoSponsorTime");
    assert_eq!(request.query_values("UUID").collect::<Vec<_>>(), ["728c"]);

    let error = client.post_viewed_video_sponsor_time("728c").unwrap_err();
    assert_eq!(error.http_kind(), Some(HttpErrorKind::BadRequest));
  }

  #[test]
  fn segment_info_lookup() {
    let client = test_client();
    client.transport().respond(
      200,
      r#"[{
        "videoID": "kJQP7kiw5Fk", "startTime": 0, "endTime": 21.808434, "votes": 15,
        "locked": 1, "UUID": "728c", "userID": "2ad8", "timeSubmitted": 1592337605037,
        "views": 43655, "category": "music_offtopic", "actionType": "skip",
        "service": "YouTube", "videoDuration": 0, "hidden": 0, "reputation": 0,
        "shadowHidden": 0, "hashedVideoID": "f1d9", "userAgent": ""
      }]"#,
    );

    let infos = client.get_segment_info(&["728c", "ae38"]).unwrap();
    assert_eq!(infos.len(), 1);
    assert!(infos[0].locked);
    assert_eq!(infos[0].views, 43655);

    let request = client.transport().last_request();
    assert_eq!(request.url, "https://sb.test/api/segmentInfo");
    assert_eq!(request.query_values("UUID").collect::<Vec<_>>(), ["728c", "ae38"]);

    client.get_segment_info(&["728c", "ae38"]).unwrap();
    assert_eq!(client.transport().calls(), 1);
  }

  #[test]
  fn segment_info_errors() {
    let client = test_client();
    let none: [&str; 0] = [];
    assert!(matches!(
      client.get_segment_info(&none),
      Err(Error::MissingArgument("segments"))
    ));

    let cases = [
      (400, HttpErrorKind::BadRequest),
      (404, HttpErrorKind::NotFound),
      (409, HttpErrorKind::Unexpected),
      (500, HttpErrorKind::ServerError),
    ];
    for (status, kind) in cases {
      let client = test_client();
      client.transport().respond(status, "\"Not Found\"");
      let error = client.get_segment_info(&["missing"]).unwrap_err();
      assert_eq!(error.http_kind(), Some(kind), "{status}");
    }
  }

  #[test]
  fn plain_text_not_found_keeps_status() {
    let client = test_client();
    client.transport().respond(404, "Not Found");
    let error = client
      .get_skip_segments(ID, &SegmentQuery::default())
      .unwrap_err();
    assert!(matches!(error, Error::InvalidJson { .. }));
    assert_eq!(error.http_kind(), None);
    assert_eq!(error.status(), Some(http::StatusCode::NOT_FOUND));
  }
}
