//! Error types for gudlft.
//!
//! `Error` covers everything that can stop the service from starting or a
//! command from completing. Rejected bookings are not errors in that sense:
//! they are reported back to the club as flash messages and live in
//! [`BookingError`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for gudlft operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Data Errors ===
    /// A data file could not be read.
    #[error("failed to read data file {path}: {source}")]
    DataRead {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A data file was read but its contents are not a valid dataset.
    #[error("invalid data file {path}: {source}")]
    DataParse {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Server Errors ===
    /// The HTTP listener could not be bound.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Address the server tried to listen on.
        address: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === I/O Errors ===
    /// File system or socket operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for gudlft operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// Check if this error came from loading the club or competition data.
    #[must_use]
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::DataRead { .. } | Self::DataParse { .. })
    }
}

/// Why a booking page or a purchase was refused.
///
/// The `Display` text is shown to the club verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// The club or the competition named in the request does not exist.
    #[error("Something went wrong-please try again")]
    NotFound,

    /// The requested quantity is not a whole number.
    #[error("Invalid number of places: please enter a whole number.")]
    InvalidNumber,

    /// The requested quantity is zero or negative.
    #[error("Invalid quantity: please enter a positive number.")]
    NonPositive,

    /// The booking page was requested for a competition that already took place.
    #[error("This competition has already passed.")]
    CompetitionPassed,

    /// A purchase was attempted for a competition that already took place.
    #[error("This competition has already passed, booking is over.")]
    CompetitionOver,

    /// The club would hold more than the per-competition maximum.
    #[error("You can't book more than {max} places per competition.")]
    OverLimit {
        /// Maximum places a club may hold in one competition.
        max: u32,
    },

    /// The club cannot afford the requested places.
    #[error("Not enough points available.")]
    NotEnoughPoints,

    /// The competition has fewer places left than requested.
    #[error("Not enough places available in this competition.")]
    NotEnoughPlaces,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::config_validation("bind must be a socket address");
        assert_eq!(
            err.to_string(),
            "invalid configuration: bind must be a socket address"
        );
    }

    #[test]
    fn test_data_read_error_display() {
        let err = Error::DataRead {
            path: PathBuf::from("/srv/gudlft/clubs.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/srv/gudlft/clubs.json"));
        assert!(msg.contains("no such file"));
        assert!(err.is_data_error());
    }

    #[test]
    fn test_data_parse_error_display() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::DataParse {
            path: PathBuf::from("competitions.json"),
            source,
        };
        assert!(err.to_string().contains("competitions.json"));
        assert!(err.is_data_error());
    }

    #[test]
    fn test_bind_error_display() {
        let err = Error::Bind {
            address: "127.0.0.1:5000".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use"),
        };
        let msg = err.to_string();
        assert!(msg.contains("127.0.0.1:5000"));
        assert!(!err.is_data_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_booking_error_messages() {
        assert_eq!(
            BookingError::NotFound.to_string(),
            "Something went wrong-please try again"
        );
        assert!(BookingError::NonPositive
            .to_string()
            .contains("positive number"));
        assert!(BookingError::InvalidNumber.to_string().contains("Invalid"));
        assert!(BookingError::CompetitionPassed
            .to_string()
            .contains("already passed"));
        assert!(BookingError::CompetitionOver.to_string().contains("over"));
        assert_eq!(
            BookingError::OverLimit { max: 12 }.to_string(),
            "You can't book more than 12 places per competition."
        );
        assert!(BookingError::NotEnoughPoints
            .to_string()
            .contains("Not enough points"));
        assert!(BookingError::NotEnoughPlaces
            .to_string()
            .contains("Not enough places"));
    }
}
