use thiserror::Error;

use crate::metadata::token::Token;

/// Create an [`Error::Malformed`] carrying the call site.
macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// Create an [`Error::OutOfBounds`] carrying the call site.
macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds {
            file: file!(),
            line: line!(),
        }
    };
}

/// Create an [`Error::DataViolation`], the winmd broke an assumption the generator encodes.
macro_rules! data_violation {
    ($msg:expr) => {
        crate::Error::DataViolation {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::DataViolation {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// Create an [`Error::PatchViolation`], the patch table disagrees with the winmd.
macro_rules! patch_violation {
    ($msg:expr) => {
        crate::Error::PatchViolation {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::PatchViolation {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// Create an [`Error::Invariant`], an internal state that should be impossible.
macro_rules! invariant_violation {
    ($msg:expr) => {
        crate::Error::Invariant {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Invariant {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// Return a [`Error::DataViolation`] unless `cond` holds.
macro_rules! ensure_data {
    ($cond:expr) => {
        if !$cond {
            return Err(data_violation!(concat!("expected `", stringify!($cond), "`")));
        }
    };

    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err(data_violation!($($arg)+));
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The three generator categories report different problems:
/// [`Error::DataViolation`] means the metadata changed in a way the code does not understand,
/// [`Error::PatchViolation`] means a compensating patch went stale, and [`Error::Invariant`]
/// means a bug in this crate. Everything else comes from reading the winmd itself.
#[derive(Error, Debug)]
pub enum Error {
    /// The file is damaged and could not be parsed
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while parsing the file
    #[error("Out of Bound read would have occurred - {file}:{line}")]
    OutOfBounds {
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// This file type is not supported
    #[error("This file type is not supported")]
    NotSupported,

    /// Provided input was empty
    #[error("Provided input was empty")]
    Empty,

    /// File I/O error
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Error while parsing the PE container
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),

    /// Error while serializing an output document or reading a patch file
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// A token that the metadata refers to does not exist
    #[error("Failed to find {0} in the metadata")]
    TokenNotFound(Token),

    /// The winmd violated an assumption made while building, resolving or classifying
    #[error(
        "an assumption about the win32metadata winmd data was violated: \
         {message} ({file}:{line})"
    )]
    DataViolation {
        /// What was expected
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The patch table does not match the winmd (a stale or redundant patch)
    #[error("an error occurred while applying a patch: {message} ({file}:{line})")]
    PatchViolation {
        /// What went wrong
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Internal state that should be unreachable
    #[error("an invariant was violated: {message} ({file}:{line})")]
    Invariant {
        /// What went wrong
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },
}

impl Error {
    /// Returns `true` for errors caused by the winmd contents
    #[must_use]
    pub fn is_data_violation(&self) -> bool {
        matches!(self, Error::DataViolation { .. })
    }

    /// Returns `true` for errors caused by a stale or conflicting patch
    #[must_use]
    pub fn is_patch_violation(&self) -> bool {
        matches!(self, Error::PatchViolation { .. })
    }

    /// Returns `true` for internal bugs
    #[must_use]
    pub fn is_invariant(&self) -> bool {
        matches!(self, Error::Invariant { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails_when(cond: bool) -> crate::Result<()> {
        ensure_data!(!cond, "condition {} held", cond);
        Ok(())
    }

    #[test]
    fn categories() {
        let data = data_violation!("two Apis types in {}", "Foundation");
        assert!(data.is_data_violation());
        assert!(!data.is_patch_violation());
        assert!(data.to_string().starts_with(
            "an assumption about the win32metadata winmd data was violated: \
             two Apis types in Foundation"
        ));

        let patch = patch_violation!("never applied");
        assert!(patch.is_patch_violation());
        assert!(patch.to_string().contains("while applying a patch"));

        let bug = invariant_violation!("worklist");
        assert!(bug.is_invariant());
    }

    #[test]
    fn ensure() {
        assert!(fails_when(false).is_ok());
        match fails_when(true) {
            Err(Error::DataViolation { message, file, .. }) => {
                assert_eq!(message, "condition true held");
                assert!(file.ends_with("error.rs"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
