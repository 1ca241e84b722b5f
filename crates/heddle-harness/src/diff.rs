//! Diff rendering for verification failures.
//!
//! Rendering is a side channel: [`DiffReporter`] output is attached to the
//! failure for humans to read, and the optional [`ExternalDiffTool`] opens a
//! comparison tool. Neither can change whether verification passes.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use diffy::PatchFormatter;
use tracing::{debug, warn};

const DIFF_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::diff");

/// Renders a human-readable difference between expected and actual text.
pub trait DiffReporter: std::fmt::Debug {
    /// Renders the difference. Identical inputs may render as empty text.
    fn render(&self, expected: &str, actual: &str) -> String;
}

/// Unified inline diff produced with `diffy`, expected text first.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineDiff;

impl DiffReporter for InlineDiff {
    fn render(&self, expected: &str, actual: &str) -> String {
        let patch = diffy::create_patch(expected, actual);
        PatchFormatter::new().fmt_patch(&patch).to_string()
    }
}

/// Launches an external comparison tool on a mismatch.
///
/// The command is split on whitespace; the expected and actual texts are
/// written to temporary files whose paths are appended as the last two
/// arguments. The launch does not wait for the tool to exit, and the files
/// are left behind for it to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDiffTool {
    command: String,
}

impl ExternalDiffTool {
    /// Creates a launcher for `command`.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Configured command line.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Launches the tool, logging rather than returning any failure.
    pub fn launch(&self, expected: &str, actual: &str) {
        if let Err(error) = self.try_launch(expected, actual) {
            warn!(
                target: DIFF_TARGET,
                command = %self.command,
                %error,
                "external diff tool could not be launched"
            );
        }
    }

    fn try_launch(&self, expected: &str, actual: &str) -> io::Result<()> {
        let mut words = self.command.split_whitespace();
        let Some(program) = words.next() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "diff tool command is empty",
            ));
        };
        let expected_path = persist("expected", expected)?;
        let actual_path = persist("actual", actual)?;
        let mut child = Command::new(program)
            .args(words)
            .arg(&expected_path)
            .arg(&actual_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        debug!(
            target: DIFF_TARGET,
            program,
            pid = child.id(),
            expected = %expected_path.display(),
            actual = %actual_path.display(),
            "launched external diff tool"
        );
        // Reaped off-thread; verification never waits for the tool.
        thread::spawn(move || child.wait());
        Ok(())
    }
}

fn persist(label: &str, text: &str) -> io::Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix(&format!("heddle-{label}-"))
        .suffix(".txt")
        .tempfile()?;
    file.write_all(text.as_bytes())?;
    file.flush()?;
    file.into_temp_path().keep().map_err(|error| error.error)
}
