//! # classpath-check
//!
//! Decides whether every class transitively referenced by an entry class can
//! be located in a supplied, ordered set of JAR archives. Runtime classes
//! are assumed always available and excluded from the graph; reflective and
//! dynamically loaded dependencies are out of scope.
//!
//! ## Architecture
//!
//! - **archive**: class-file lookup across an ordered list of JARs
//! - **extract**: bytecode reference extraction from one compiled class
//! - **runtime**: predicate for platform classes excluded from the graph
//! - **engine**: concurrent transitive traversal producing the verdict
//! - **scan**: JAR discovery when a directory is supplied instead of a file
//! - **cli**: command-line surface

pub mod archive;
pub mod cli;
pub mod engine;
pub mod extract;
pub mod runtime;
pub mod scan;
