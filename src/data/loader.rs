//! Whitespace-delimited fill and price log loading

use crate::feed::{FillRecord, PriceRecord, Side, Timestamped};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Log loading errors
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be opened or read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// A line did not have the expected shape
    #[error("{path}:{line}: {reason}")]
    Malformed {
        path: String,
        line: usize,
        reason: String,
    },
}

/// Open a log file, decompressing it when the name ends in `.gz`
fn open(path: &Path) -> Result<Box<dyn BufRead>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let reader: Box<dyn BufRead> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}

/// Load fills (`type timestampMillis symbol price size side`) from `path`.
///
/// Records at or after `until` are dropped. Input order is kept.
pub fn load_fills(
    path: impl AsRef<Path>,
    until: Option<DateTime<Utc>>,
) -> Result<Vec<FillRecord>, LoadError> {
    let path = path.as_ref();
    let records = read_records(open(path)?, &path.display().to_string(), parse_fill)?;
    let total = records.len();
    let records = before(records, until);
    tracing::info!(
        path = %path.display(),
        total,
        kept = records.len(),
        "Loaded fills"
    );
    Ok(records)
}

/// Load prices (`type timestampMillis symbol price`) from `path`.
///
/// Records at or after `until` are dropped. Input order is kept.
pub fn load_prices(
    path: impl AsRef<Path>,
    until: Option<DateTime<Utc>>,
) -> Result<Vec<PriceRecord>, LoadError> {
    let path = path.as_ref();
    let records = read_records(open(path)?, &path.display().to_string(), parse_price)?;
    let total = records.len();
    let records = before(records, until);
    tracing::info!(
        path = %path.display(),
        total,
        kept = records.len(),
        "Loaded prices"
    );
    Ok(records)
}

/// Parse every non-blank line of `reader` with `parse`
pub fn read_records<R, T>(
    reader: R,
    source: &str,
    parse: fn(&[&str]) -> Result<T, String>,
) -> Result<Vec<T>, LoadError>
where
    R: BufRead,
{
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source_err| LoadError::Io {
            path: source.to_string(),
            source: source_err,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let record = parse(&fields).map_err(|reason| LoadError::Malformed {
            path: source.to_string(),
            line: index + 1,
            reason,
        })?;
        records.push(record);
    }

    Ok(records)
}

fn before<T: Timestamped>(records: Vec<T>, until: Option<DateTime<Utc>>) -> Vec<T> {
    match until {
        Some(until) => records
            .into_iter()
            .filter(|record| record.timestamp() < until)
            .collect(),
        None => records,
    }
}

/// `type timestampMillis symbol price size side`
pub fn parse_fill(fields: &[&str]) -> Result<FillRecord, String> {
    let [_kind, timestamp, symbol, price, size, side] = fields else {
        return Err(format!("expected 6 fields, got {}", fields.len()));
    };

    let size = parse_decimal("size", size)?;
    if size.is_sign_negative() {
        return Err(format!("size must not be negative, got {}", size));
    }

    Ok(FillRecord {
        timestamp: parse_timestamp(timestamp)?,
        symbol: symbol.to_string(),
        price: parse_decimal("price", price)?,
        size,
        side: Side::from_str(side).map_err(|e| e.to_string())?,
    })
}

/// `type timestampMillis symbol price`
pub fn parse_price(fields: &[&str]) -> Result<PriceRecord, String> {
    let [_kind, timestamp, symbol, price] = fields else {
        return Err(format!("expected 4 fields, got {}", fields.len()));
    };

    Ok(PriceRecord {
        timestamp: parse_timestamp(timestamp)?,
        symbol: symbol.to_string(),
        price: parse_decimal("price", price)?,
    })
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let millis: i64 = raw
        .parse()
        .map_err(|_| format!("invalid timestamp {:?}", raw))?;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| format!("timestamp out of range: {}", millis))
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| format!("invalid {} {:?}", field, raw))
}
