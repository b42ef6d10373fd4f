use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::convert::ValueConversionError;

/// Direction a resource was being opened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => write!(f, "reading"),
            Access::Write => write!(f, "writing"),
        }
    }
}

/// Failure of a conversion run. Every variant aborts the run; nothing is retried
/// and no row is skipped.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Cannot open {} for {access}: {source}", .path.display())]
    ResourceOpen {
        path: PathBuf,
        access: Access,
        #[source]
        source: io::Error,
    },

    #[error("Input has no header row")]
    MissingHeader,

    #[error("Line {line}: expected {expected} field(s), found {found}")]
    RowShape {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: {source}")]
    ValueConversion {
        line: u64,
        #[source]
        source: ValueConversionError,
    },

    #[error("Reading line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Writing output row: {source}")]
    Write {
        #[source]
        source: csv::Error,
    },

    #[error("Flushing output: {source}")]
    Flush {
        #[source]
        source: io::Error,
    },
}

impl BatchError {
    pub fn is_resource_open(&self) -> bool {
        matches!(self, BatchError::ResourceOpen { .. })
    }

    pub fn is_row_shape(&self) -> bool {
        matches!(self, BatchError::RowShape { .. })
    }

    pub fn is_value_conversion(&self) -> bool {
        matches!(self, BatchError::ValueConversion { .. })
    }
}
