// src/urls/mod.rs
// =============================================================================
// This module reads the list of URLs we want to submit.
//
// The list is a plain text file, one URL per line. Blank lines and lines
// starting with '#' are skipped so the file can carry comments.
// =============================================================================

mod loader;

pub use loader::load_urls;
