//! Concurrent transitive traversal of the class reference graph.
//!
//! The traversal is a fork-join recursion: each node resolves its own bytes
//! and references sequentially, then fans the unvisited references out as
//! parallel child visits and waits for the batch. The visited set is the
//! dedup invariant: a type name is dispatched at most once per invocation
//! regardless of how many edges reach it, which also terminates cycles.

use dashmap::DashSet;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, warn};

use crate::archive::{self, ArchiveError};
use crate::extract;
use crate::runtime;

/// Knobs for one top-level check.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    /// Worker pool size; `None` leaves the choice to rayon.
    pub threads: Option<usize>,
}

/// Result of one top-level check.
#[derive(Debug, Serialize)]
pub struct CheckOutcome {
    pub entry_class: String,
    /// True iff every transitively referenced non-runtime class was found.
    pub sufficient: bool,
    pub classes_visited: usize,
    pub dependencies: BTreeSet<String>,
    pub duration_ms: u64,
}

/// Checks whether `archives` is self-contained for `entry_class`.
///
/// Returns `Err` only for hard archive failures (unreadable or corrupt
/// container); a class that is merely absent or malformed yields a
/// `sufficient: false` outcome instead.
pub fn check_dependencies(
    entry_class: &str,
    archives: &[PathBuf],
) -> Result<CheckOutcome, ArchiveError> {
    check_dependencies_with(entry_class, archives, &CheckOptions::default())
}

pub fn check_dependencies_with(
    entry_class: &str,
    archives: &[PathBuf],
    options: &CheckOptions,
) -> Result<CheckOutcome, ArchiveError> {
    let start = Instant::now();
    let entry = extract::normalize_type_name(entry_class);

    let traversal = Traversal {
        archives,
        visited: DashSet::new(),
        dependencies: DashSet::new(),
    };

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(threads) = options.threads {
        builder = builder.num_threads(threads);
    }
    let sufficient = match builder.build() {
        Ok(pool) => pool.install(|| traversal.visit(entry.clone()))?,
        Err(err) => {
            // No positive sufficiency claim can be made without workers.
            warn!(error = %err, "worker pool could not be started");
            false
        }
    };

    Ok(CheckOutcome {
        entry_class: entry,
        sufficient,
        classes_visited: traversal.visited.len(),
        dependencies: traversal.dependencies.into_iter().collect(),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Shared state for one invocation; dropped once the verdict is produced.
struct Traversal<'a> {
    archives: &'a [PathBuf],
    visited: DashSet<String>,
    dependencies: DashSet<String>,
}

impl Traversal<'_> {
    /// Resolves one node. `type_name` must already be normalized.
    fn visit(&self, type_name: String) -> Result<bool, ArchiveError> {
        if runtime::is_runtime_type(&type_name) {
            return Ok(true);
        }
        // Atomic insert-if-absent: exactly one task dispatches each name.
        if !self.visited.insert(type_name.clone()) {
            return Ok(true);
        }

        let Some(bytes) = archive::locate_class(&type_name, self.archives)? else {
            debug!(class = %type_name, "class not found in any archive");
            return Ok(false);
        };

        let references = match extract::extract_references(&bytes) {
            Ok(references) => references,
            Err(err) => {
                warn!(class = %type_name, error = %err, "unreadable class file");
                return Ok(false);
            }
        };

        for reference in &references {
            self.dependencies.insert(reference.clone());
        }

        let pending: Vec<String> = references
            .into_iter()
            .filter(|reference| !self.visited.contains(reference))
            .collect();

        pending
            .into_par_iter()
            .map(|reference| self.visit(reference))
            .try_reduce(|| true, |left, right| Ok(left && right))
    }
}
