//! Crash-safe file replacement inside a capability directory.
//!
//! Contents land in a hidden sibling file first and are then renamed over the
//! target, so readers see either the old document or the new one.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use cap_std::fs::{Dir, OpenOptions};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Replace `file_name` in `dir` with `contents`.
///
/// `file_name` must be a bare file name; callers validate it.
pub(crate) fn replace_file(dir: &Dir, file_name: &str, contents: &[u8]) -> io::Result<()> {
    let staging = format!(
        ".{file_name}.{}.{}.tmp",
        std::process::id(),
        SEQUENCE.fetch_add(1, Ordering::Relaxed)
    );

    let outcome = stage(dir, &staging, contents).and_then(|()| swap(dir, &staging, file_name));
    if outcome.is_err() && dir.remove_file(&staging).is_err() {
        // The staging file may never have been created.
    }
    outcome?;

    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        // Directory sync is best effort.
    }
    Ok(())
}

fn stage(dir: &Dir, staging: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(staging, &options)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(windows)]
fn swap(dir: &Dir, staging: &str, file_name: &str) -> io::Result<()> {
    match dir.remove_file(file_name) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(err),
        _ => {}
    }
    dir.rename(staging, dir, file_name)
}

#[cfg(not(windows))]
fn swap(dir: &Dir, staging: &str, file_name: &str) -> io::Result<()> {
    dir.rename(staging, dir, file_name)
}

#[cfg(test)]
mod tests {
    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use cap_std::ambient_authority;

    use super::*;

    fn temp_dir() -> (tempfile::TempDir, Dir) {
        let temp = tempfile::tempdir().expect("temp dir");
        let dir = Dir::open_ambient_dir(temp.path(), ambient_authority()).expect("open temp dir");
        (temp, dir)
    }

    #[test]
    fn replaces_existing_contents_without_leftovers() {
        let (_temp, dir) = temp_dir();
        dir.write("favorites.json", b"old").expect("seed file");

        replace_file(&dir, "favorites.json", b"new").expect("replace");

        assert_eq!(
            dir.read_to_string("favorites.json").expect("read back"),
            "new"
        );
        let names: Vec<String> = dir
            .entries()
            .expect("list dir")
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        assert_eq!(names, vec!["favorites.json".to_owned()]);
    }

    #[test]
    fn creates_missing_file() {
        let (_temp, dir) = temp_dir();

        replace_file(&dir, "fresh.json", b"{}").expect("create");

        assert_eq!(dir.read_to_string("fresh.json").expect("read back"), "{}");
    }
}
