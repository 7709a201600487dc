//! Class-file lookup across an ordered list of JAR archives.
//!
//! Archives are searched in list order and the first archive containing the
//! requested entry wins. A missing entry is silence; an archive that cannot
//! be opened or decoded is a hard [`ArchiveError`], never treated as absence.

use memmap2::Mmap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipArchive;
use zip::result::ZipError;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("cannot open archive {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode archive {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: ZipError,
    },
}

/// Converts a dotted type name to the entry path its compiled form lives at.
pub fn class_name_to_entry_path(class_name: &str) -> String {
    format!("{}.class", class_name.replace('.', "/"))
}

/// Returns the bytes of `class_name`'s compiled form from the first archive
/// containing it, or `Ok(None)` when no archive has a matching entry.
pub fn locate_class(
    class_name: &str,
    archives: &[PathBuf],
) -> Result<Option<Vec<u8>>, ArchiveError> {
    let entry_path = class_name_to_entry_path(class_name);
    for jar_path in archives {
        if let Some(bytes) = read_entry(jar_path, &entry_path)? {
            return Ok(Some(bytes));
        }
    }
    Ok(None)
}

fn read_entry(jar_path: &Path, entry_path: &str) -> Result<Option<Vec<u8>>, ArchiveError> {
    let file = File::open(jar_path).map_err(|source| ArchiveError::Unreadable {
        path: jar_path.to_path_buf(),
        source,
    })?;
    // SAFETY: The file is opened read-only and remains valid for the lifetime
    // of the mmap. The mmap is dropped before the file.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| ArchiveError::Unreadable {
        path: jar_path.to_path_buf(),
        source,
    })?;
    let mut archive =
        ZipArchive::new(Cursor::new(&mmap[..])).map_err(|source| ArchiveError::Corrupt {
            path: jar_path.to_path_buf(),
            source,
        })?;

    match archive.by_name(entry_path) {
        Ok(mut entry) => {
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut bytes)
                .map_err(|source| ArchiveError::Unreadable {
                    path: jar_path.to_path_buf(),
                    source,
                })?;
            Ok(Some(bytes))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(source) => Err(ArchiveError::Corrupt {
            path: jar_path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "classpath_check_archive_{}_{}_{}",
            std::process::id(),
            nanos,
            name
        ))
    }

    fn write_jar(path: &Path, entries: &[(&str, &[u8])]) -> anyhow::Result<()> {
        let file = File::create(path)?;
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        for (name, content) in entries {
            zip.start_file(*name, options)?;
            zip.write_all(content)?;
        }
        zip.finish()?;
        Ok(())
    }

    #[test]
    fn entry_path_is_slashed_with_class_extension() {
        assert_eq!(
            class_name_to_entry_path("com.example.App"),
            "com/example/App.class"
        );
        assert_eq!(class_name_to_entry_path("App"), "App.class");
    }

    #[test]
    fn locate_returns_bytes_from_first_matching_archive() -> anyhow::Result<()> {
        let first = temp_path("first.jar");
        let second = temp_path("second.jar");
        write_jar(&first, &[("com/example/App.class", b"from-first")])?;
        write_jar(&second, &[("com/example/App.class", b"from-second")])?;

        let archives = vec![first.clone(), second.clone()];
        let bytes = locate_class("com.example.App", &archives)?.unwrap();
        assert_eq!(bytes, b"from-first");

        let reversed = vec![second.clone(), first.clone()];
        let bytes = locate_class("com.example.App", &reversed)?.unwrap();
        assert_eq!(bytes, b"from-second");

        std::fs::remove_file(first)?;
        std::fs::remove_file(second)?;
        Ok(())
    }

    #[test]
    fn locate_reports_absence_as_none() -> anyhow::Result<()> {
        let jar = temp_path("absent.jar");
        write_jar(&jar, &[("com/example/Other.class", b"x")])?;

        let found = locate_class("com.example.App", &[jar.clone()])?;
        assert!(found.is_none());

        std::fs::remove_file(jar)?;
        Ok(())
    }

    #[test]
    fn missing_archive_is_a_hard_error() {
        let jar = temp_path("does_not_exist.jar");
        let err = locate_class("com.example.App", &[jar]).unwrap_err();
        assert!(matches!(err, ArchiveError::Unreadable { .. }));
    }

    #[test]
    fn corrupt_archive_is_a_hard_error() -> anyhow::Result<()> {
        let jar = temp_path("corrupt.jar");
        std::fs::write(&jar, b"this is not a zip container")?;

        let err = locate_class("com.example.App", &[jar.clone()]).unwrap_err();
        assert!(matches!(err, ArchiveError::Corrupt { .. }));

        std::fs::remove_file(jar)?;
        Ok(())
    }
}
