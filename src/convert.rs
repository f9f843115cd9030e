//! HEIC to JPEG conversion via an external tool.
//!
//! Phones drop HEIC files into the source folders, but browsers want JPEG.
//! Conversion shells out to macOS `sips` by default (the command is
//! configurable), invoked with an argument vector so paths with spaces or
//! shell metacharacters pass through untouched:
//!
//! ```text
//! sips -s format jpeg <source> --out <dest>
//! ```
//!
//! The exit status is checked: a conversion that fails leaves the item out of
//! the output rather than silently publishing a missing asset.
//!
//! [`ImageConverter`] is the seam that keeps sync logic testable on machines
//! without `sips`; tests swap in a recording mock.

use std::path::Path;
use std::process::{Command, ExitStatus};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to run '{command}': {error}")]
    Launch {
        command: String,
        #[source]
        error: std::io::Error,
    },
    #[error("'{command}' exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Converts one image file to JPEG at the given destination.
pub trait ImageConverter {
    fn convert(&self, source: &Path, dest: &Path) -> Result<(), ConvertError>;
}

/// The real converter: spawns the configured command, `sips` by default.
pub struct SipsConverter {
    command: String,
}

impl SipsConverter {
    pub fn new(command: &str) -> Self {
        SipsConverter {
            command: command.to_string(),
        }
    }
}

impl ImageConverter for SipsConverter {
    fn convert(&self, source: &Path, dest: &Path) -> Result<(), ConvertError> {
        let output = Command::new(&self.command)
            .args(["-s", "format", "jpeg"])
            .arg(source)
            .arg("--out")
            .arg(dest)
            .output()
            .map_err(|error| ConvertError::Launch {
                command: self.command.clone(),
                error,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ConvertError::Failed {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records conversions instead of shelling out.
    ///
    /// On success it writes a marker file at the destination so callers can
    /// verify where the converted asset would land.
    pub struct MockConverter {
        pub conversions: Mutex<Vec<(PathBuf, PathBuf)>>,
        fail_with: Option<String>,
    }

    impl MockConverter {
        pub fn new() -> Self {
            MockConverter {
                conversions: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        /// A converter whose every call fails with the given reason.
        pub fn failing(reason: &str) -> Self {
            MockConverter {
                conversions: Mutex::new(Vec::new()),
                fail_with: Some(reason.to_string()),
            }
        }
    }

    impl ImageConverter for MockConverter {
        fn convert(&self, source: &Path, dest: &Path) -> Result<(), ConvertError> {
            self.conversions
                .lock()
                .unwrap()
                .push((source.to_path_buf(), dest.to_path_buf()));
            if let Some(reason) = &self.fail_with {
                return Err(ConvertError::Launch {
                    command: "mock-convert".to_string(),
                    error: std::io::Error::other(reason.clone()),
                });
            }
            fs::write(dest, b"converted").unwrap();
            Ok(())
        }
    }

    #[test]
    fn mock_records_and_writes_marker() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("out.jpg");

        let mock = MockConverter::new();
        mock.convert(Path::new("in.heic"), &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"converted");
        let calls = mock.conversions.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Path::new("in.heic"));
    }

    #[test]
    fn failing_mock_reports_reason() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("out.jpg");

        let mock = MockConverter::failing("no codec");
        let err = mock.convert(Path::new("in.heic"), &dest).unwrap_err();

        assert!(err.to_string().contains("no codec"));
        assert!(!dest.exists());
    }

    #[test]
    fn missing_command_is_a_launch_error() {
        let converter = SipsConverter::new("definitely-not-a-real-command");
        let err = converter
            .convert(Path::new("in.heic"), Path::new("out.jpg"))
            .unwrap_err();
        assert!(matches!(err, ConvertError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_a_failed_error() {
        // `false` ignores its arguments and exits 1.
        let converter = SipsConverter::new("false");
        let err = converter
            .convert(Path::new("in.heic"), Path::new("out.jpg"))
            .unwrap_err();
        match err {
            ConvertError::Failed { status, .. } => assert!(!status.success()),
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
