use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "classpath-check")]
#[command(about = "Check whether a set of JARs is self-contained for an entry class")]
pub struct Cli {
    /// Fully qualified name of the entry class, e.g. com.example.App
    pub class_name: String,

    /// JAR files (or directories to scan for JARs), searched in order
    #[arg(required = true, value_name = "ARCHIVE")]
    pub archives: Vec<PathBuf>,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Worker pool size for the traversal
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
