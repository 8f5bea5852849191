use clap::{
  builder::{styling::AnsiColor, Styles},
  Parser, ValueHint,
};
use std::path::PathBuf;

fn clap_v3_styles() -> Styles {
  Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default())
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(styles(clap_v3_styles()))]
pub struct Args {
  /// Video id or url to look up
  #[arg(value_hint = ValueHint::Url)]
  pub video: Option<String>,
  /// Sets a custom config file
  #[arg(short = 'c', long = "config", value_name = "FILE")]
  #[arg(value_hint = ValueHint::FilePath)]
  #[arg(env = "SPONSORBLOCK_CONFIG")]
  pub config: Option<PathBuf>,
  /// SponsorBlock server to query
  #[arg(short = 'u', long = "base-url", value_name = "URL")]
  #[arg(value_hint = ValueHint::Url)]
  #[arg(env = "SPONSORBLOCK_BASE_URL")]
  pub base_url: Option<String>,
  /// Private user id, generated when absent
  #[arg(long = "user-id")]
  #[arg(env = "SPONSORBLOCK_USER_ID", hide_env_values = true)]
  pub user_id: Option<String>,
  /// Only send a prefix of the hashed video id
  #[arg(short = 'k', long = "hash")]
  pub hash: bool,
  /// Category to show, may be repeated
  #[arg(long = "category", value_name = "CATEGORY")]
  pub categories: Vec<String>,
}
