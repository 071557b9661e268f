//! Remote collection script invocation and log bundle naming.

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

/// User the bootstrap image grants SSH access to.
pub const REMOTE_USER: &str = "core";

/// Collection script shipped on the bootstrap image.
pub const GATHER_SCRIPT: &str = "/usr/local/bin/installer-gather.sh";

/// Archive the collection script leaves behind.
pub const REMOTE_BUNDLE_PATH: &str = "/home/core/log-bundle.tar.gz";

/// Second-resolution, lexically sortable capture timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Remote command line: the script followed by the control plane addresses.
#[must_use]
pub fn collection_command(control_plane: &[String]) -> String {
    if control_plane.is_empty() {
        GATHER_SCRIPT.to_string()
    } else {
        format!("{GATHER_SCRIPT} {}", control_plane.join(" "))
    }
}

/// `log-bundle-<YYYYMMDDHHMMSS>.tar.gz`
#[must_use]
pub fn bundle_file_name<Tz: TimeZone>(captured_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("log-bundle-{}.tar.gz", captured_at.format(TIMESTAMP_FORMAT))
}

/// Local path the bundle captured at `captured_at` is written to.
///
/// Two captures within the same second map to the same path. The writer
/// refuses to replace an existing file, so the second capture fails rather
/// than overwriting the first.
#[must_use]
pub fn bundle_path<Tz: TimeZone>(output_dir: &Path, captured_at: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    output_dir.join(bundle_file_name(captured_at))
}
