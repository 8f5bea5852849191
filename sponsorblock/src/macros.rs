#[macro_export]
macro_rules! http_err {
  ($kind:expr, $response:expr $(,)?) => {{
    $crate::error::Error::Http($crate::error::HttpError::new($kind, $response))
  }};
  ($kind:expr, $response:expr, $msg:literal $(,)?) => {{
    $crate::error::Error::Http($crate::error::HttpError::new($kind, $response).message($msg))
  }};
  ($kind:expr, $response:expr, $fmt:expr, $($arg:tt)*) => {{
    $crate::error::Error::Http(
      $crate::error::HttpError::new($kind, $response).message(format!($fmt, $($arg)*))
    )
  }};
}
