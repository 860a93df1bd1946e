// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There is only one thing this tool does, so there are no subcommands:
// every option has a sensible default and the plain invocation
//
//   index-notifier
//
// reads ./service-account.json and ./urls-to-index.txt and submits every
// URL. The two paths can also come from environment variables, which is
// handy in CI.
//
// Rust concepts:
// - Derive macros: #[derive(Parser)] generates all the parsing code
// - ArgAction::Count: turns -v -v into the number 2
// =============================================================================

use crate::batch::DEFAULT_DELAY;
use crate::notify::{UpdateType, DEFAULT_ENDPOINT};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "index-notifier",
    version,
    about = "Batch-submit URLs to the Google Indexing API",
    long_about = "index-notifier reads a list of URLs and asks the Google Indexing API to \
                  (re)crawl each of them, one request at a time, staying under the API's \
                  rate limit. Authentication uses a service account JSON key."
)]
pub struct Cli {
    /// Path to the service account JSON key file
    #[arg(
        long,
        env = "INDEX_NOTIFIER_CREDENTIALS",
        default_value = "service-account.json"
    )]
    pub credentials: PathBuf,

    /// Path to the URL list (one URL per line, '#' starts a comment)
    #[arg(long, env = "INDEX_NOTIFIER_URLS", default_value = "urls-to-index.txt")]
    pub urls: PathBuf,

    /// Milliseconds to wait between two requests
    ///
    /// The API allows ~200 requests per minute; the default of 300ms keeps
    /// us just under that.
    #[arg(long, default_value_t = DEFAULT_DELAY.as_millis() as u64)]
    pub delay_ms: u64,

    /// Give up on a single request after this many seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Publish endpoint (override for testing against a fake server)
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: Url,

    /// Notification type sent with every URL
    #[arg(long, value_enum, default_value_t = UpdateType::Updated)]
    pub update_type: UpdateType,

    /// Print the final report as JSON on stdout (progress goes to stderr)
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// More diagnostic logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
