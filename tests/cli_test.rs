//! End-to-end tests for the combine and inspect commands.

use std::fs;
use std::path::{Path, PathBuf};

use docset::cli::{CombineArgs, InspectArgs, OpStep, SetOperation, combine, inspect};
use docset::prelude::*;
use tempfile::TempDir;

fn write_ids(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn step(operation: SetOperation, file: &Path) -> OpStep {
    OpStep {
        operation,
        file: file.to_path_buf(),
    }
}

#[test]
fn test_combine_save_and_inspect() -> Result<()> {
    let dir = TempDir::new()?;
    let base = write_ids(dir.path(), "base.txt", "# base\n2 4 6 8\n10 12\n");
    let filter = write_ids(dir.path(), "filter.txt", "12 4 6 99\n");
    let removed = write_ids(dir.path(), "removed.txt", "6\n");
    let toggled = write_ids(dir.path(), "toggled.txt", "1 4 50\n");
    let saved = dir.path().join("result.bin");

    let report = combine(&CombineArgs {
        capacity: 20,
        from: Some(base),
        ops: vec![
            step(SetOperation::And, &filter),
            step(SetOperation::Not, &removed),
            step(SetOperation::Xor, &toggled),
        ],
        save: Some(saved.clone()),
        list: true,
    })?;

    // {2,4,6,8,10,12} and {4,6,12} = {4,6,12}; minus 6 = {4,12}; xor {1,4} = {1,12}.
    assert_eq!(report.size, 20);
    assert_eq!(report.cardinality, 2);
    assert_eq!(report.ids, Some(vec![1, 12]));
    let after: Vec<u64> = report.steps.iter().map(|s| s.cardinality_after).collect();
    assert_eq!(after, vec![3, 2, 2]);
    assert_eq!(report.steps[0].input_ids, 4);
    assert_eq!(report.saved_to, Some(saved.display().to_string()));

    let decoded = inspect(&InspectArgs {
        file: saved,
        list: true,
    })?;
    assert_eq!(decoded.size, 20);
    assert_eq!(decoded.cardinality, 2);
    assert_eq!(decoded.first, Some(1));
    assert_eq!(decoded.last, Some(12));
    assert_eq!(decoded.ids, Some(vec![1, 12]));
    Ok(())
}

#[test]
fn test_combine_without_from_starts_empty() -> Result<()> {
    let dir = TempDir::new()?;
    let ids = write_ids(dir.path(), "ids.txt", "3 1 3 2\n");

    let report = combine(&CombineArgs {
        capacity: 3,
        from: None,
        ops: vec![step(SetOperation::Or, &ids)],
        save: None,
        list: true,
    })?;

    // Duplicates collapse and 3 is beyond the capacity.
    assert_eq!(report.steps[0].input_ids, 3);
    assert_eq!(report.ids, Some(vec![1, 2]));
    assert_eq!(report.saved_to, None);
    Ok(())
}

#[test]
fn test_combine_rejects_bad_id_file() -> Result<()> {
    let dir = TempDir::new()?;
    let bad = write_ids(dir.path(), "bad.txt", "1 2\nthree\n");

    let err = combine(&CombineArgs {
        capacity: 10,
        from: Some(bad),
        ops: Vec::new(),
        save: None,
        list: false,
    })
    .unwrap_err();
    assert!(matches!(err, DocSetError::InvalidArgument(_)));
    assert!(err.to_string().contains("bad.txt"));

    let missing = combine(&CombineArgs {
        capacity: 10,
        from: Some(dir.path().join("missing.txt")),
        ops: Vec::new(),
        save: None,
        list: false,
    })
    .unwrap_err();
    assert!(matches!(missing, DocSetError::Io(_)));
    Ok(())
}

#[test]
fn test_inspect_rejects_corrupt_file() -> Result<()> {
    let dir = TempDir::new()?;
    let ids = write_ids(dir.path(), "ids.txt", "5 7\n");
    let saved = dir.path().join("set.bin");
    combine(&CombineArgs {
        capacity: 64,
        from: Some(ids),
        ops: Vec::new(),
        save: Some(saved.clone()),
        list: false,
    })?;

    let mut bytes = fs::read(&saved)?;
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    fs::write(&saved, bytes)?;

    let err = inspect(&InspectArgs {
        file: saved,
        list: false,
    })
    .unwrap_err();
    assert!(matches!(err, DocSetError::Corrupt(_)));
    Ok(())
}

#[test]
fn test_inspect_empty_set() -> Result<()> {
    let dir = TempDir::new()?;
    let saved = dir.path().join("empty.bin");
    combine(&CombineArgs {
        capacity: 0,
        from: None,
        ops: Vec::new(),
        save: Some(saved.clone()),
        list: false,
    })?;

    let report = inspect(&InspectArgs {
        file: saved,
        list: true,
    })?;
    assert_eq!(report.size, 0);
    assert_eq!(report.first, None);
    assert_eq!(report.last, None);
    assert_eq!(report.ids, Some(Vec::new()));
    Ok(())
}
