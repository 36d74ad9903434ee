//! No-clobber file creation. The content is staged in a temporary file next
//! to the destination and only linked into place once it is complete, so a
//! failed write never leaves a partial destination behind.

use std::io::ErrorKind;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::{Result, TopSeriesError, WriteOutcome};

/// Create `dst` from whatever `fill` writes, unless `dst` already exists.
pub(crate) fn write_new<F>(dst: &Path, fill: F) -> Result<WriteOutcome>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    if dst.exists() {
        warn!(path = %dst.display(), "destination already exists, leaving it untouched");
        return Ok(WriteOutcome::AlreadyExists(dst.to_path_buf()));
    }

    let dir = match dst.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| TopSeriesError::io(dir, e))?;
    fill(&mut staged)?;

    match staged.persist_noclobber(dst) {
        Ok(_) => Ok(WriteOutcome::Written(dst.to_path_buf())),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
            warn!(path = %dst.display(), "destination appeared while writing, left untouched");
            Ok(WriteOutcome::AlreadyExists(dst.to_path_buf()))
        }
        Err(e) => Err(TopSeriesError::io(dst, e.error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    #[test]
    fn failed_fill_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("out.txt");

        let err = write_new(&dst, |f| {
            f.write_all(b"half").unwrap();
            Err(TopSeriesError::Consistency("stopped".into()))
        })
        .unwrap_err();
        assert!(matches!(err, TopSeriesError::Consistency(_)));
        assert!(!dst.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

        let ok = write_new(&dst, |f| {
            f.write_all(b"whole").map_err(|e| TopSeriesError::io("out", e))
        });
        assert_eq!(ok.unwrap(), WriteOutcome::Written(dst.clone()));
        assert_eq!(fs::read_to_string(&dst).unwrap(), "whole");
    }

    #[test]
    fn existing_destination_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("out.txt");
        fs::write(&dst, "mine").unwrap();

        let outcome = write_new(&dst, |_| panic!("must not be called")).unwrap();
        assert_eq!(outcome, WriteOutcome::AlreadyExists(dst.clone()));
        assert_eq!(fs::read_to_string(&dst).unwrap(), "mine");
    }
}
