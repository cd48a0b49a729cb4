//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::args::{DocSetArgs, OutputFormat, SetOperation};
use crate::error::Result;

/// Result of one combination step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepReport {
    pub operation: SetOperation,
    pub file: String,
    pub input_ids: usize,
    pub cardinality_after: u64,
}

/// Result structure for the combine command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CombineReport {
    pub size: usize,
    pub cardinality: u64,
    pub steps: Vec<StepReport>,
    pub saved_to: Option<String>,
    pub ids: Option<Vec<usize>>,
}

/// Result structure for the inspect command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InspectReport {
    pub path: String,
    pub size: usize,
    pub words: usize,
    pub cardinality: u64,
    pub first: Option<usize>,
    pub last: Option<usize>,
    pub ids: Option<Vec<usize>>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &DocSetArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &DocSetArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
    }
    let value = serde_json::to_value(result)?;
    print!("{}", render_human(&value, 0));
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &DocSetArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

/// Render a JSON value as indented `key: value` lines.
fn render_human(value: &Value, indent: usize) -> String {
    let pad = "  ".repeat(indent);
    let mut out = String::new();
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                match value {
                    Value::Null => {}
                    Value::Object(_) => {
                        out.push_str(&format!("{pad}{key}:\n"));
                        out.push_str(&render_human(value, indent + 1));
                    }
                    Value::Array(items) if items.iter().any(Value::is_object) => {
                        out.push_str(&format!("{pad}{key}:\n"));
                        for item in items {
                            out.push_str(&render_human(item, indent + 1));
                            out.push_str(&format!("{pad}  --\n"));
                        }
                    }
                    other => out.push_str(&format!("{pad}{key}: {}\n", render_scalar(other))),
                }
            }
        }
        other => out.push_str(&format!("{pad}{}\n", render_scalar(other))),
    }
    out
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_scalar)
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}
