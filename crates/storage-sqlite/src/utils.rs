//! TEXT column codecs.
//!
//! Decimals are stored in their canonical string form so no precision is lost.
//! Dates use ISO `YYYY-MM-DD`, timestamps `YYYY-MM-DD HH:MM:SS%.f`. A value that
//! does not parse is reported as a corrupt row.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use wealthledger_core::errors::{Error, ValidationError};

use crate::errors::StorageError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

pub(crate) type ColumnResult<T> = std::result::Result<T, StorageError>;

pub(crate) fn decimal_to_text(value: Decimal) -> String {
    value.normalize().to_string()
}

pub(crate) fn date_to_text(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn datetime_to_text(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

pub(crate) fn parse_decimal(column: &str, text: &str) -> ColumnResult<Decimal> {
    Decimal::from_str(text.trim()).map_err(|e| {
        StorageError::CorruptRow(format!("{}: invalid decimal '{}': {}", column, text, e))
    })
}

pub(crate) fn parse_date(column: &str, text: &str) -> ColumnResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|e| {
        StorageError::CorruptRow(format!("{}: invalid date '{}': {}", column, text, e))
    })
}

pub(crate) fn parse_datetime(column: &str, text: &str) -> ColumnResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), DATETIME_FORMAT).map_err(|e| {
        StorageError::CorruptRow(format!("{}: invalid timestamp '{}': {}", column, text, e))
    })
}

pub(crate) fn parse_optional_decimal(
    column: &str,
    text: Option<&str>,
) -> ColumnResult<Option<Decimal>> {
    text.map(|t| parse_decimal(column, t)).transpose()
}

pub(crate) fn parse_optional_date(
    column: &str,
    text: Option<&str>,
) -> ColumnResult<Option<NaiveDate>> {
    text.map(|t| parse_date(column, t)).transpose()
}

/// Row counts are stored as INTEGER. Negative values are corrupt.
pub(crate) fn parse_count(column: &str, value: i32) -> ColumnResult<u32> {
    u32::try_from(value).map_err(|_| {
        StorageError::CorruptRow(format!("{}: negative count {}", column, value))
    })
}

/// Counts wider than an INTEGER column are rejected rather than clamped.
pub(crate) fn count_to_column(column: &str, value: u32) -> ColumnResult<i32> {
    i32::try_from(value).map_err(|_| {
        StorageError::Core(Error::Validation(ValidationError::InvalidInput(format!(
            "{}: {} is too large to store",
            column, value
        ))))
    })
}

/// Terminal-state columns must be all present for a terminal status and all
/// absent otherwise.
pub(crate) fn mismatched_status(entity: &str, id: i64, status: &str) -> StorageError {
    StorageError::CorruptRow(format!(
        "{} {} has status {} but its closure columns disagree",
        entity, id, status
    ))
}
