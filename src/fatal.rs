//! The single reporting path for failures that end the run.

use std::io::Write;
use std::process::ExitCode;

use tracing::debug;

use crate::error::OptionsError;

/// Exit status for every usage and validation failure.
pub const FAILURE_STATUS: u8 = 1;

/// Write `err` to `sink` and return the status the process should exit with.
///
/// The binary passes stderr; tests pass a buffer and inspect it. Usage errors
/// from clap are printed in clap's own layout.
pub fn fatal<W: Write>(sink: &mut W, err: &OptionsError) -> ExitCode {
    debug!(usage = err.is_usage(), error = ?err, "fatal");
    let written = match err {
        OptionsError::Usage(clap_err) => write!(sink, "{}", clap_err.render()),
        other => writeln!(sink, "{other}"),
    };
    // Nothing else to report to if the sink itself is gone.
    let _ = written.and_then(|()| sink.flush());
    ExitCode::from(FAILURE_STATUS)
}
