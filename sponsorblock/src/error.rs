use std::{borrow::Cow, fmt::Display};

use http::StatusCode;

use crate::client::ApiResponse;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
  #[error(transparent)]
  Http(#[from] HttpError),
  /// The body was not JSON, or not the JSON shape the endpoint documents.
  #[error("The server returned invalid JSON: {source}")]
  InvalidJson {
    response: ApiResponse,
    #[source]
    source: serde_json::Error,
  },
  #[error("Invalid video id `{0}`")]
  InvalidVideoId(String),
  #[error("Missing required argument: {0}")]
  MissingArgument(&'static str),
  #[error("Unrecognized vote `{0}`")]
  InvalidVote(String),
  #[error("Hashed video id length must be between 4 and 32, got {0}")]
  InvalidHashLength(usize),
  #[error("Failed to send request: {0}")]
  Transport(#[from] reqwest::Error),
  #[error("{0}")]
  Config(String),
}

impl Error {
  /// Status of the response behind this error, if one was received.
  pub fn status(&self) -> Option<StatusCode> {
    self.response().map(|response| response.status)
  }

  pub fn response(&self) -> Option<&ApiResponse> {
    match self {
      Error::Http(error) => Some(&error.response),
      Error::InvalidJson { response, .. } => Some(response),
      _ => None,
    }
  }

  pub fn http_kind(&self) -> Option<HttpErrorKind> {
    match self {
      Error::Http(error) => Some(error.kind),
      _ => None,
    }
  }
}

#[derive(thiserror::Error, Debug)]
pub struct HttpError {
  pub kind: HttpErrorKind,
  pub message: Cow<'static, str>,
  pub response: ApiResponse,
}

impl Display for HttpError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}: {} {}",
      self.message,
      self.response.status.as_u16(),
      self.response.reason()
    )
  }
}

impl HttpError {
  pub fn new(kind: HttpErrorKind, response: ApiResponse) -> HttpError {
    HttpError {
      kind,
      message: Cow::Borrowed(kind.message()),
      response,
    }
  }

  #[inline]
  pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
    self.message = message.into();
    self
  }
}

macro_rules! http_error_kinds {
  (
    $(
      ( $code:literal, $name:ident, $msg:literal $(,)? )
    ),+
    $(,)?
  ) => {
    /// Failure kinds for non-200 responses.
    ///
    /// Kinds with a fixed status are only produced by endpoints that
    /// document that status; everything else falls back to
    /// [`HttpErrorKind::ServerError`] or [`HttpErrorKind::Unexpected`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum HttpErrorKind {
      $(
      $name,
      )+
      ServerError,
      Unexpected,
    }

    impl HttpErrorKind {
      pub const fn status(self) -> Option<u16> {
        match self {
          $(
            Self::$name => Some($code),
          )+
          _ => None,
        }
      }

      pub const fn message(self) -> &'static str {
        match self {
          $(
            Self::$name => $msg,
          )+
          Self::ServerError => "Server Error",
          Self::Unexpected => "Unexpected response from server",
        }
      }

      const fn from_code(code: u16) -> Option<Self> {
        match code {
          $(
            $code => Some(Self::$name),
          )+
          _ => None,
        }
      }
    }
  }
}

http_error_kinds! {
  (400, BadRequest, "Your inputs are wrong/impossible"),
  (403, Forbidden, "Rejected by auto moderator"),
  (404, NotFound, "Not Found"),
  (409, Duplicate, "Duplicate"),
  (429, RateLimited, "Rate Limit (Too many for the same user or IP)"),
}

impl HttpErrorKind {
  /// Maps a non-200 status to a kind, honoring only the `recognized` kinds.
  pub fn classify(status: StatusCode, recognized: &[HttpErrorKind]) -> HttpErrorKind {
    if status.is_server_error() {
      return HttpErrorKind::ServerError;
    }
    match Self::from_code(status.as_u16()) {
      Some(kind) if recognized.contains(&kind) => kind,
      _ => HttpErrorKind::Unexpected,
    }
  }
}

/// Passes a 200 response through, turns anything else into [`Error::Http`].
pub fn check_status(response: ApiResponse, recognized: &[HttpErrorKind]) -> Result<ApiResponse> {
  if response.status == StatusCode::OK {
    return Ok(response);
  }
  let kind = HttpErrorKind::classify(response.status, recognized);
  Err(http_err!(kind, response))
}
