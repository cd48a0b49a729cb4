//! Command line argument parsing for the docset CLI using clap.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::DocSetError;

/// docset - combine document id sets with bit set algebra
#[derive(Parser, Debug, Clone)]
#[command(name = "docset")]
#[command(about = "Combine document id sets with streaming bit set algebra")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct DocSetArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl DocSetArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a bit set from id files and combine it with further id files
    Combine(CombineArgs),

    /// Decode a saved bit set and report its contents
    Inspect(InspectArgs),
}

/// Arguments for combining id sets
#[derive(Parser, Debug, Clone)]
pub struct CombineArgs {
    /// Capacity of the bit set: ids at or above it are dropped
    #[arg(short, long, env = "DOCSET_CAPACITY")]
    pub capacity: usize,

    /// Id file OR-ed into the empty set first
    #[arg(long, value_name = "FILE")]
    pub from: Option<PathBuf>,

    /// Combination step, applied in order (or|and|not|xor)
    #[arg(long = "op", value_name = "OP=FILE")]
    pub ops: Vec<OpStep>,

    /// Save the encoded result to this path
    #[arg(long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// List the member ids in the report
    #[arg(long)]
    pub list: bool,
}

/// Arguments for inspecting a saved bit set
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Path of an encoded bit set
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// List the member ids in the report
    #[arg(long)]
    pub list: bool,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}

/// In-place set operation applied with a doc id cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetOperation {
    Or,
    And,
    Not,
    Xor,
}

impl FromStr for SetOperation {
    type Err = DocSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "or" => Ok(SetOperation::Or),
            "and" => Ok(SetOperation::And),
            "not" => Ok(SetOperation::Not),
            "xor" => Ok(SetOperation::Xor),
            other => Err(DocSetError::invalid_argument(format!(
                "unknown operation '{other}', expected or, and, not or xor"
            ))),
        }
    }
}

impl fmt::Display for SetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SetOperation::Or => "or",
            SetOperation::And => "and",
            SetOperation::Not => "not",
            SetOperation::Xor => "xor",
        };
        f.write_str(name)
    }
}

/// One `--op OP=FILE` step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpStep {
    pub operation: SetOperation,
    pub file: PathBuf,
}

impl FromStr for OpStep {
    type Err = DocSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (operation, file) = s.split_once('=').ok_or_else(|| {
            DocSetError::invalid_argument(format!("expected OP=FILE, got '{s}'"))
        })?;
        if file.is_empty() {
            return Err(DocSetError::invalid_argument(format!(
                "missing file in '{s}'"
            )));
        }
        Ok(OpStep {
            operation: operation.parse()?,
            file: PathBuf::from(file),
        })
    }
}
