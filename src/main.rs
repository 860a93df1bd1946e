// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load credentials, build the API client, load the URL list
// 3. Submit every URL (see batch::BatchDriver)
// 4. Exit with proper code:
//      0 = batch ran to the end (even if some URLs failed)
//      1 = configuration problem (missing/invalid credentials, missing list)
//      2 = unexpected internal error
//
// Rust concepts:
// - async/await: HTTP calls and the delay between them are async
// - anyhow::Error::downcast: pick our ConfigurationError back out of an
//   anyhow error to decide the exit code
// =============================================================================

// Module declarations - tells Rust about our other source files
mod auth;          // src/auth/ - service account key + access tokens
mod batch;         // src/batch/ - the per-URL loop, pauses and output
mod cli;           // src/cli.rs - command-line parsing
mod error;         // src/error.rs - fatal configuration errors
mod notify;        // src/notify/ - submitting one URL to the API
mod urls;          // src/urls/ - reading the URL list file

// anyhow::Result lets us return any error type with the ? operator
use anyhow::Result;
use batch::{BatchDriver, BatchReport, ConsoleReporter, FixedIntervalGate, Reporter};
use clap::Parser;  // Parser trait enables the parse() method
use cli::Cli;
use error::ConfigurationError;
use notify::IndexingClient;
use std::io::{self, IsTerminal};  // IsTerminal: are we writing to a real terminal?
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// One request at a time, so a single-threaded runtime is all we need
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole error chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = batch completed
//   Ok(1) = configuration error (already reported to the user)
//   Err   = unexpected error
async fn run() -> Result<i32> {
    // Parse command-line arguments (handles --help and --version for us)
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.json {
        // Keep stdout clean for the JSON document
        let color = !cli.no_color && io::stderr().is_terminal();
        let mut reporter = ConsoleReporter::new(io::stderr(), color);

        match handle_batch(&cli, &mut reporter).await? {
            Some(report) => println!("{}", serde_json::to_string_pretty(&report)?),
            None => return Ok(1),
        }
    } else {
        // Colors only make sense on a terminal, not when piped into a file
        let color = !cli.no_color && io::stdout().is_terminal();
        let mut reporter = ConsoleReporter::new(io::stdout(), color);

        if handle_batch(&cli, &mut reporter).await?.is_none() {
            return Ok(1);
        }
    }

    Ok(0)
}

// Runs the whole batch, reporting configuration errors to the user
//
// Returns: Some(report) after a full run, None if a ConfigurationError
// stopped us before the first request
async fn handle_batch<R: Reporter>(cli: &Cli, reporter: &mut R) -> Result<Option<BatchReport>> {
    reporter.banner()?;

    match submit_all(cli, reporter).await {
        Ok(report) => Ok(Some(report)),
        // Is this one of our configuration errors, or something unexpected?
        Err(e) => match e.downcast::<ConfigurationError>() {
            Ok(config_error) => {
                // The reporter shows it to the user; the log line is only for -vv
                tracing::debug!(error = %config_error, "configuration error");
                reporter.fatal(&config_error)?;
                Ok(None)
            }
            Err(other) => Err(other),
        },
    }
}

async fn submit_all<R: Reporter>(cli: &Cli, reporter: &mut R) -> Result<BatchReport> {
    // Each ? returns early with a ConfigurationError if a step fails
    let credentials = auth::load_credentials(&cli.credentials)?;
    tracing::debug!(client_email = credentials.client_email(), "credentials loaded");
    reporter.credentials_loaded()?;

    let client = IndexingClient::new(
        credentials,
        cli.endpoint.clone(),
        cli.update_type,
        Duration::from_secs(cli.timeout_secs),
    )?;
    reporter.client_ready()?;

    // Loaded after the client, so a bad key is reported first
    let urls = urls::load_urls(&cli.urls)?;
    reporter.urls_loaded(urls.len())?;

    let gate = FixedIntervalGate::new(Duration::from_millis(cli.delay_ms));
    tracing::debug!(
        delay_ms = gate.interval().as_millis() as u64,
        endpoint = %cli.endpoint,
        "starting batch"
    );

    // Borrow the client and reporter; the driver owns only the gate
    let mut driver = BatchDriver::new(&client, gate, reporter);
    driver.run(&urls).await
}

// Sends tracing output to stderr.
// RUST_LOG wins over -v when it is set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // Only our own crate's events; reqwest/hyper stay quiet
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("index_notifier={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
