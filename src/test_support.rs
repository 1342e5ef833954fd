use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::Utf8PathBuf;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Fresh, already created directory under the system temp dir.
pub fn unique_temp_dir(tag: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    dir.push(format!("pzkit-test-{tag}-{ts}-{seq}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn unique_utf8_temp_dir(tag: &str) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(unique_temp_dir(tag)).unwrap()
}
