//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document for the JSON API.
//!
//! Usage: `openapi [OUTPUT]`. OUTPUT defaults to `openapi.json` in the
//! current directory.

use api_lib::{error::ApiError, web::rest::write_openapi};
use std::path::PathBuf;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), ApiError> {
    let output = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    let paths = write_openapi(&output)?;
    println!("Wrote {} API paths to {}", paths, output.display());
    Ok(())
}
