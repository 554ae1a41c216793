//! Absolute base directory for scratch extraction directories.
//!
//! Guards against a relative TMPDIR (e.g. `TMPDIR=tmp`) placing scratch
//! directories inside the project being operated on.

use std::env;
use std::path::PathBuf;

/// Returns an absolute directory path suitable for scratch directories.
pub fn scratch_base() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        return t;
    }
    #[cfg(windows)]
    {
        env::var("TEMP")
            .or_else(|_| env::var("TMP"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Windows\\Temp"))
    }
    #[cfg(not(windows))]
    {
        PathBuf::from("/tmp")
    }
}
