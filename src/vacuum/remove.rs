use std::ffi::OsString;
use std::fs;
use std::path::Path;

use tracing::{debug, error, warn};

/// Never removed, whatever its age.
pub const PROTECTED_FILE: &str = "map_p.bin";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RemoveOptions {
    /// Skip the per-file stat used for size accounting.
    pub faster: bool,
    /// Count only; leave files in place.
    pub dry_run: bool,
}

/// Remove `names` from `dir` and return the number of bytes freed.
///
/// Failures are logged and the loop moves on to the next file; nothing
/// already removed is restored. With `faster` set the result is always 0.
pub fn remove_files(dir: &Path, names: &[OsString], options: RemoveOptions) -> u64 {
    let mut bytes_freed = 0;
    for name in names {
        if name == PROTECTED_FILE {
            warn!("won't remove '{PROTECTED_FILE}'!");
            continue;
        }

        let path = dir.join(name);
        if !options.faster {
            match fs::metadata(&path) {
                Ok(metadata) => bytes_freed += metadata.len(),
                Err(err) => {
                    error!("could not stat file: {}", path.display());
                    debug!("exception encountered: {err}");
                }
            }
        }

        if options.dry_run {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => debug!("- {}", path.display()),
            Err(err) => {
                error!("could not remove file: {}", path.display());
                debug!("exception encountered: {err}");
            }
        }
    }
    bytes_freed
}
