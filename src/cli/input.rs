//! Input readers for CLI operations
//!
//! Files ending in `.gz` are decompressed transparently and `-` reads stdin.

use crate::cli::process_input_line;
use crate::error::FerroError;
use crate::variant::VariantRecord;
use flate2::read::MultiGzDecoder;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Open a file (or stdin for `-`) for buffered reading
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>, FerroError> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).map_err(|e| FerroError::Io {
        msg: format!("{}: {}", path.display(), e),
    })?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read a whole input as text
pub fn read_to_string(path: &Path) -> Result<String, FerroError> {
    let mut content = String::new();
    open_input(path)?.read_to_string(&mut content)?;
    Ok(content)
}

/// Deserialize one JSON document from a file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FerroError> {
    let content = read_to_string(path)?;
    parse_json(&content)
}

fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, FerroError> {
    let content = crate::cli::strip_bom(content);
    serde_json::from_str(content).map_err(FerroError::from)
}

/// Parse variant records from a JSON array or from JSON Lines.
///
/// In JSON Lines input blank lines and `#` comments are skipped; the line
/// number of a malformed record is part of the error.
pub fn parse_variants(content: &str) -> Result<Vec<VariantRecord>, FerroError> {
    let trimmed = crate::cli::strip_bom(content).trim_start();
    if trimmed.starts_with('[') {
        return parse_json(trimmed);
    }

    let mut records = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let Some(line) = process_input_line(line, number == 0) else {
            continue;
        };
        let record = serde_json::from_str(line).map_err(|e| FerroError::Json {
            msg: format!("line {}: {}", number + 1, e),
        })?;
        records.push(record);
    }
    Ok(records)
}

pub fn read_variants(path: &Path) -> Result<Vec<VariantRecord>, FerroError> {
    parse_variants(&read_to_string(path)?)
}
