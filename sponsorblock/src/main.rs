use std::io::IsTerminal;

use anyhow::Context;
use clap::{
  builder::styling::{AnsiColor, Style},
  Parser,
};
use http::StatusCode;
use log::debug;
use sponsorblock::{Category, Client, ClientConfig, EnvUserIdStore, Segment, SegmentQuery};

use crate::cli::Args;

mod cli;

fn main() -> anyhow::Result<()> {
  #[cfg(feature = "dev")]
  dotenvy::dotenv().ok();

  let args = Args::parse();

  const LOG_ENV: &str = "SPONSORBLOCK_LOG";
  if std::env::var_os(LOG_ENV).is_none() {
    std::env::set_var(LOG_ENV, "warn");
  }
  pretty_env_logger::try_init_custom_env(LOG_ENV)
    .context("Failed to init sponsorblock logger")?;

  let Some(video) = args.video.as_deref() else {
    eprintln!("No video was passed");
    std::process::exit(1);
  };

  let config = match &args.config {
    Some(path) => ClientConfig::load(path).context("Failed to load config")?,
    None => ClientConfig::default(),
  };
  let mut builder = Client::builder()
    .config(config)
    .user_id_store(EnvUserIdStore);
  if let Some(base_url) = args.base_url {
    builder = builder.base_url(base_url);
  }
  if let Some(user_id) = args.user_id {
    builder = builder.user_id(user_id);
  }
  let client = builder.build().context("Failed to create client")?;
  debug!("Using {client:?}");

  let query = SegmentQuery::default().categories(args.categories.iter().map(String::as_str));
  let result = if args.hash {
    client.get_skip_segments_with_hash(video, &query)
  } else {
    client.get_skip_segments(video, &query)
  };
  let mut segments =
    segments_or_empty(result).with_context(|| format!("Failed to get segments of `{video}`"))?;

  if segments.is_empty() {
    println!("No segments found for `{video}`");
    return Ok(());
  }

  segments.sort_by(|a, b| a.start().total_cmp(&b.start()));
  let colored = std::io::stdout().is_terminal();
  for (index, segment) in segments.iter().enumerate() {
    print_segment(index + 1, segment, colored);
  }

  Ok(())
}

/// The server answers 404, usually with a plain text body, for videos
/// without segments.
fn segments_or_empty(
  result: sponsorblock::Result<Vec<Segment>>,
) -> sponsorblock::Result<Vec<Segment>> {
  match result {
    Err(error) if error.status() == Some(StatusCode::NOT_FOUND) => Ok(Vec::new()),
    result => result,
  }
}

fn print_segment(number: usize, segment: &Segment, colored: bool) {
  let category = segment.category();
  let style = if colored {
    category_style(category)
  } else {
    Style::new()
  };
  println!(
    "{}Segment #{number} ({}):{}",
    style.render(),
    category.display_name(),
    style.render_reset()
  );
  println!("\tStart: {}", format_timestamp(segment.start()));
  println!("\tEnd: {}", format_timestamp(segment.end()));
}

fn category_style(category: &Category) -> Style {
  let color = match category {
    Category::Sponsor => AnsiColor::Green,
    Category::SelfPromo => AnsiColor::Yellow,
    Category::Interaction => AnsiColor::Magenta,
    Category::Intro => AnsiColor::Cyan,
    Category::Outro => AnsiColor::Blue,
    Category::Preview => AnsiColor::BrightBlue,
    Category::MusicOfftopic => AnsiColor::BrightYellow,
    Category::PoiHighlight => AnsiColor::BrightMagenta,
    Category::Filler => AnsiColor::BrightBlack,
    Category::ExclusiveAccess => AnsiColor::BrightGreen,
    Category::Chapter => AnsiColor::White,
    Category::Other(_) => AnsiColor::Red,
  };
  color.on_default().bold()
}

/// `H:MM:SS`, fractions of a second dropped.
fn format_timestamp(seconds: f64) -> String {
  let total = seconds.max(0.0) as u64;
  format!("{}:{:02}:{:02}", total / 3600, total / 60 % 60, total % 60)
}

#[test]
fn timestamp_test() {
  assert_eq!(format_timestamp(0.0), "0:00:00");
  assert_eq!(format_timestamp(21.808434), "0:00:21");
  assert_eq!(format_timestamp(281.521), "0:04:41");
  assert_eq!(format_timestamp(3723.9), "1:02:03");
  assert_eq!(format_timestamp(-5.0), "0:00:00");
}

#[test]
fn not_found_is_empty_test() {
  use sponsorblock::{error::check_status, ApiResponse, Error, HttpErrorKind};

  let plain = ApiResponse::new(StatusCode::NOT_FOUND, "Not Found");
  let source = serde_json::from_str::<serde_json::Value>(&plain.body).unwrap_err();
  let invalid_json = Err(Error::InvalidJson {
    response: plain,
    source,
  });
  assert!(segments_or_empty(invalid_json).unwrap().is_empty());

  let json_body = ApiResponse::new(StatusCode::NOT_FOUND, "[]");
  let not_found = check_status(json_body, &[HttpErrorKind::NotFound]).map(|_| Vec::new());
  assert!(segments_or_empty(not_found).unwrap().is_empty());

  let server = ApiResponse::new(StatusCode::INTERNAL_SERVER_ERROR, "{}");
  let server_error = check_status(server, &[]).map(|_| Vec::new());
  assert!(segments_or_empty(server_error).is_err());

  let segment = Segment::new(Category::Sponsor, 1.0, 2.0);
  assert_eq!(segments_or_empty(Ok(vec![segment.clone()])).unwrap(), [segment]);
}
