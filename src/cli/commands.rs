//! Command implementations for the docset CLI.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::{DocSetError, Result};
use crate::search::{DocId, DocIdSet, DocIdSetIterator, SortedDocIdSet};
use crate::util::OpenBitSetDisi;
use crate::util::open_bit_set_io::{read_from, write_to};

/// Execute a CLI command.
pub fn execute_command(args: DocSetArgs) -> Result<()> {
    match &args.command {
        Command::Combine(combine_args) => {
            let report = combine(combine_args)?;
            output_result("Combined document sets", &report, &args)
        }
        Command::Inspect(inspect_args) => {
            let report = inspect(inspect_args)?;
            output_result("Decoded document set", &report, &args)
        }
    }
}

/// Build a bit set from the `--from` file, then apply every `--op` step.
pub fn combine(args: &CombineArgs) -> Result<CombineReport> {
    let mut set = OpenBitSetDisi::new(args.capacity)?;

    if let Some(from) = &args.from {
        let ids = read_doc_ids(from)?;
        set.in_place_or(&mut ids.iterator());
        info!("loaded {} ids from {}", ids.len(), from.display());
    }

    let mut steps = Vec::with_capacity(args.ops.len());
    for step in &args.ops {
        let ids = read_doc_ids(&step.file)?;
        apply(&mut set, step.operation, &mut ids.iterator());
        info!(
            "applied {} with {} ids from {}",
            step.operation,
            ids.len(),
            step.file.display()
        );
        steps.push(StepReport {
            operation: step.operation,
            file: step.file.display().to_string(),
            input_ids: ids.len(),
            cardinality_after: set.cardinality(),
        });
    }

    let saved_to = match &args.save {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            write_to(&set, writer)?;
            info!("saved bit set to {}", path.display());
            Some(path.display().to_string())
        }
        None => None,
    };

    Ok(CombineReport {
        size: set.size(),
        cardinality: set.cardinality(),
        steps,
        saved_to,
        ids: args.list.then(|| set.ones().collect()),
    })
}

/// Decode a saved bit set.
pub fn inspect(args: &InspectArgs) -> Result<InspectReport> {
    let reader = BufReader::new(File::open(&args.file)?);
    let bits = read_from(reader)?;

    Ok(InspectReport {
        path: args.file.display().to_string(),
        size: bits.size(),
        words: bits.num_words(),
        cardinality: bits.cardinality(),
        first: bits.next_set_bit(0),
        last: bits.size().checked_sub(1).and_then(|end| bits.prev_set_bit(end)),
        ids: args.list.then(|| bits.ones().collect()),
    })
}

/// Apply one in-place operation of `disi` to `set`.
pub fn apply<I>(set: &mut OpenBitSetDisi, operation: SetOperation, disi: &mut I)
where
    I: DocIdSetIterator + ?Sized,
{
    match operation {
        SetOperation::Or => set.in_place_or(disi),
        SetOperation::And => set.in_place_and(disi),
        SetOperation::Not => set.in_place_not(disi),
        SetOperation::Xor => set.in_place_xor(disi),
    }
}

/// Read an id file into a sorted, deduplicated set.
pub fn read_doc_ids(path: &Path) -> Result<SortedDocIdSet> {
    let text = fs::read_to_string(path)?;
    let ids = parse_doc_ids(&text).map_err(|err| {
        DocSetError::invalid_argument(format!("{}: {err}", path.display()))
    })?;
    debug!("parsed {} ids from {}", ids.len(), path.display());
    SortedDocIdSet::from_unsorted(ids)
}

/// Parse whitespace separated decimal ids. `#` starts a comment running to
/// the end of the line.
pub fn parse_doc_ids(text: &str) -> Result<Vec<DocId>> {
    let mut ids = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or_default();
        for token in content.split_whitespace() {
            let id = token.parse::<DocId>().map_err(|_| {
                DocSetError::invalid_argument(format!(
                    "line {}: '{token}' is not a document id",
                    line_no + 1
                ))
            })?;
            ids.push(id);
        }
    }
    Ok(ids)
}
