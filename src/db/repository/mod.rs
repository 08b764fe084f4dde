pub mod appointment;
pub mod doctor;
pub mod patient;
pub mod prescription;

pub use appointment::*;
pub use doctor::*;
pub use patient::*;
pub use prescription::*;

use std::str::FromStr;

use crate::db::DatabaseError;

/// Parse a stored enum string inside a rusqlite row closure.
pub(crate) fn parse_enum<T>(column: usize, s: &str) -> rusqlite::Result<T>
where
    T: FromStr<Err = DatabaseError>,
{
    s.parse().map_err(|e: DatabaseError| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}

/// Parse a stored UUID inside a rusqlite row closure.
pub(crate) fn parse_uuid(column: usize, s: &str) -> rusqlite::Result<uuid::Uuid> {
    uuid::Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    })
}
