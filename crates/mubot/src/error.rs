use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Attach denied for process {pid}: {message}")]
    AttachDenied { pid: u32, message: String },

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    ReadFailed { address: u64, message: String },

    #[error("Input injection rejected: {0}")]
    ActuationFailed(String),

    #[error("License invalid: {0}")]
    LicenseInvalid(String),

    #[error("Invalid config value for '{key}': {message}")]
    InvalidConfig { key: String, message: String },

    #[error("Invalid key name: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }

    /// Attach failures end the session; the caller decides whether to re-attach.
    pub fn is_attach_failure(&self) -> bool {
        matches!(self, Error::ProcessNotFound(_) | Error::AttachDenied { .. })
    }

    pub(crate) fn read_failed(address: u64, message: impl Into<String>) -> Self {
        Error::ReadFailed {
            address,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::Io(io_err);
        assert!(err.is_not_found());

        let other_io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err2 = Error::Io(other_io_err);
        assert!(!err2.is_not_found());
    }

    #[test]
    fn test_attach_failures() {
        assert!(Error::ProcessNotFound("main.exe".into()).is_attach_failure());
        assert!(
            Error::AttachDenied {
                pid: 42,
                message: "access denied".into()
            }
            .is_attach_failure()
        );
        assert!(!Error::read_failed(0x1000, "partial read").is_attach_failure());
    }

    #[test]
    fn test_read_failed_message_has_hex_address() {
        let err = Error::read_failed(0x4000, "partial read");
        assert_eq!(
            err.to_string(),
            "Failed to read process memory at address 0x4000: partial read"
        );
    }
}
