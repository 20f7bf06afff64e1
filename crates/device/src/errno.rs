//! Error codes returned by device operations.
//!
//! Each variant corresponds to one Linux errno so callers that speak the
//! syscall convention can translate with [`Errno::to_errno`].

use thiserror::Error;

pub type Result<T, E = Errno> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Errno {
    #[error("no such file or directory")]
    NoEntry,
    #[error("input/output error")]
    Io,
    #[error("cannot allocate memory")]
    NoMemory,
    #[error("device or resource busy")]
    Busy,
    #[error("file exists")]
    Exists,
    #[error("no such device")]
    NoDevice,
    #[error("invalid argument")]
    Invalid,
    #[error("inappropriate ioctl for device")]
    NotTty,
    #[error("operation not supported")]
    NotSupported,
}

impl Errno {
    /// Positive errno value
    pub fn to_errno(self) -> i32 {
        match self {
            Errno::NoEntry => 2,
            Errno::Io => 5,
            Errno::NoMemory => 12,
            Errno::Busy => 16,
            Errno::Exists => 17,
            Errno::NoDevice => 19,
            Errno::Invalid => 22,
            Errno::NotTty => 25,
            Errno::NotSupported => 95,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Errno::NoEntry => "ENOENT",
            Errno::Io => "EIO",
            Errno::NoMemory => "ENOMEM",
            Errno::Busy => "EBUSY",
            Errno::Exists => "EEXIST",
            Errno::NoDevice => "ENODEV",
            Errno::Invalid => "EINVAL",
            Errno::NotTty => "ENOTTY",
            Errno::NotSupported => "EOPNOTSUPP",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_values_match_linux() {
        assert_eq!(Errno::NoEntry.to_errno(), 2);
        assert_eq!(Errno::Invalid.to_errno(), 22);
        assert_eq!(Errno::NotSupported.to_errno(), 95);
        assert_eq!(Errno::NotSupported.name(), "EOPNOTSUPP");
    }

    #[test]
    fn display_is_strerror_text() {
        assert_eq!(Errno::Busy.to_string(), "device or resource busy");
    }
}
