//! JAR discovery for directory arguments.

use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// Expands archive arguments: a directory becomes the sorted list of `.jar`
/// files under it, a plain file passes through. Caller order is preserved;
/// sorting within a directory keeps first-match-wins search deterministic.
pub fn expand_archives(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();
    for path in paths {
        if path.is_dir() {
            archives.extend(scan_jars(path)?);
        } else {
            archives.push(path.clone());
        }
    }
    Ok(archives)
}

/// Collects every `.jar` file under `base_path`, sorted by path.
pub fn scan_jars(base_path: &Path) -> Result<Vec<PathBuf>> {
    let (tx, rx) = mpsc::channel();

    let walker = WalkBuilder::new(base_path)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build_parallel();

    walker.run(|| {
        let tx = tx.clone();
        Box::new(move |entry| {
            if let Ok(entry) = entry {
                let path = entry.path();
                if path.extension().is_some_and(|e| e == "jar") {
                    let _ = tx.send(path.to_path_buf());
                }
            }
            ignore::WalkState::Continue
        })
    });

    drop(tx);
    let mut jars: Vec<PathBuf> = rx.iter().collect();
    jars.sort();
    Ok(jars)
}
