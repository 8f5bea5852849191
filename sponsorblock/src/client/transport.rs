use http::{HeaderMap, Method, StatusCode};
use serde_json::Value;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
  Empty,
  Form(Vec<(String, String)>),
  Json(Value),
}

/// One request to the API, independent of the http library sending it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
  pub method: Method,
  pub url: String,
  /// Repeated keys are sent as repeated parameters.
  pub query: Vec<(String, String)>,
  pub body: RequestBody,
}

impl ApiRequest {
  pub fn new(method: Method, url: impl Into<String>) -> ApiRequest {
    ApiRequest {
      method,
      url: url.into(),
      query: Vec::new(),
      body: RequestBody::Empty,
    }
  }

  #[inline]
  pub fn get(url: impl Into<String>) -> ApiRequest {
    Self::new(Method::GET, url)
  }

  #[inline]
  pub fn post(url: impl Into<String>) -> ApiRequest {
    Self::new(Method::POST, url)
  }

  pub fn query(mut self, key: &str, value: impl ToString) -> Self {
    self.query.push((key.to_string(), value.to_string()));
    self
  }

  pub fn query_all<I>(mut self, key: &str, values: I) -> Self
  where
    I: IntoIterator,
    I::Item: ToString,
  {
    self
      .query
      .extend(values.into_iter().map(|value| (key.to_string(), value.to_string())));
    self
  }

  pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
    self.body = RequestBody::Form(fields);
    self
  }

  pub fn json(mut self, body: Value) -> Self {
    self.body = RequestBody::Json(body);
    self
  }

  /// All query values sent under `key`, in order.
  pub fn query_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    self
      .query
      .iter()
      .filter(move |(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }
}

/// What the client keeps of a response: enough to decode it and to
/// diagnose a failure.
#[derive(Debug, Clone)]
pub struct ApiResponse {
  pub status: StatusCode,
  pub body: String,
  pub request_headers: HeaderMap,
}

impl ApiResponse {
  pub fn new(status: StatusCode, body: impl Into<String>) -> ApiResponse {
    ApiResponse {
      status,
      body: body.into(),
      request_headers: HeaderMap::new(),
    }
  }

  #[inline]
  pub fn reason(&self) -> &'static str {
    self.status.canonical_reason().unwrap_or("")
  }

  #[inline]
  pub fn text(&self) -> &str {
    &self.body
  }
}

/// Sends [`ApiRequest`]s. Implemented for the blocking reqwest client;
/// anything else (a recorder, a proxy) can be injected in its place.
pub trait Transport {
  fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

impl Transport for reqwest::blocking::Client {
  fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
    let ApiRequest {
      method,
      url,
      query,
      body,
    } = request;

    let mut builder = self.request(method, url);
    if !query.is_empty() {
      builder = builder.query(&query);
    }
    builder = match body {
      RequestBody::Empty => builder,
      RequestBody::Form(fields) => builder.form(&fields),
      RequestBody::Json(value) => builder.json(&value),
    };

    let request = builder.build()?;
    let request_headers = request.headers().clone();
    let response = reqwest::blocking::Client::execute(self, request)?;
    let status = response.status();
    let body = response.text()?;

    Ok(ApiResponse {
      status,
      body,
      request_headers,
    })
  }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
  fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
    (**self).execute(request)
  }
}
