//! One CSV file per employee.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use prod_report_production_models::TypedRecord;

use crate::ExportError;
use crate::csv_file::write_records_to_path;

/// File name for an employee's split report: every character that is not
/// ASCII alphanumeric becomes `_`, e.g. `Jane Doe` → `Jane_Doe_report.csv`.
#[must_use]
pub fn report_file_name(owner: &str) -> String {
    let stem: String = owner
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}_report.csv")
}

/// Like [`report_file_name`], but appends `_2`, `_3`, ... to the stem until
/// the name is not in `taken`, e.g. `Ann-Marie` after `Ann Marie` becomes
/// `Ann_Marie_2_report.csv`. The chosen name is added to `taken`.
fn unique_report_file_name(owner: &str, taken: &mut BTreeSet<String>) -> String {
    let mut name = report_file_name(owner);
    let mut n = 2_usize;
    while taken.contains(&name) {
        name = report_file_name(&format!("{owner}_{n}"));
        n += 1;
    }
    taken.insert(name.clone());
    name
}

/// Groups records by owner, keeping each owner's records in input order.
#[must_use]
pub fn group_by_owner(records: &[TypedRecord]) -> BTreeMap<&str, Vec<TypedRecord>> {
    let mut groups: BTreeMap<&str, Vec<TypedRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.owner.as_str())
            .or_default()
            .push(record.clone());
    }
    groups
}

/// Writes one CSV per owner into `output_dir`, creating it if needed.
///
/// Returns the written paths in owner order. Owners whose names sanitize to
/// the same file name get numbered files instead of overwriting each other.
///
/// # Errors
///
/// Returns [`ExportError`] if the directory or any file cannot be written.
pub fn split_by_owner(records: &[TypedRecord], output_dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(output_dir)?;

    let mut written = Vec::new();
    let mut taken = BTreeSet::new();
    for (owner, owned) in group_by_owner(records) {
        let path = output_dir.join(unique_report_file_name(owner, &mut taken));
        write_records_to_path(&owned, &path)?;
        written.push(path);
    }

    log::info!(
        "Split {} records into {} employee files under {}",
        records.len(),
        written.len(),
        output_dir.display()
    );

    Ok(written)
}

#[cfg(test)]
mod tests {
    use prod_report_production_models::{Metrics, RecordDate};

    use super::*;

    fn record(owner: &str) -> TypedRecord {
        TypedRecord {
            owner: owner.to_owned(),
            date: RecordDate::Unknown("01/05/2025".to_owned()),
            location: "Main St".to_owned(),
            metrics: Metrics::default(),
            ambiguities: Vec::new(),
        }
    }

    #[test]
    fn sanitizes_file_names() {
        assert_eq!(report_file_name("Jane Doe"), "Jane_Doe_report.csv");
        assert_eq!(report_file_name("O'Neil/Ann"), "O_Neil_Ann_report.csv");
    }

    #[test]
    fn groups_keep_input_order_within_owner() {
        let mut second = record("Ann");
        second.location = "Oak St".to_owned();
        let records = [record("Bob"), record("Ann"), second];
        let groups = group_by_owner(&records);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec!["Ann", "Bob"]);
        assert_eq!(groups["Ann"][1].location, "Oak St");
    }

    #[test]
    fn writes_one_file_per_owner() {
        let dir = std::env::temp_dir().join(format!("prod_report_split_{}", std::process::id()));
        let paths = split_by_owner(&[record("Ann"), record("Bob"), record("Ann")], &dir).unwrap();
        assert_eq!(paths.len(), 2);
        let ann = std::fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(ann.lines().count(), 3);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn colliding_names_get_numbered() {
        let mut taken = BTreeSet::new();
        assert_eq!(unique_report_file_name("Ann Marie", &mut taken), "Ann_Marie_report.csv");
        assert_eq!(unique_report_file_name("Ann-Marie", &mut taken), "Ann_Marie_2_report.csv");
        assert_eq!(unique_report_file_name("Ann.Marie", &mut taken), "Ann_Marie_3_report.csv");
        assert_eq!(unique_report_file_name("Ann Marie 2", &mut taken), "Ann_Marie_2_2_report.csv");
    }

    #[test]
    fn owners_with_colliding_names_keep_every_row() {
        let dir = std::env::temp_dir().join(format!("prod_report_split_collide_{}", std::process::id()));
        let records = [record("Ann Marie"), record("Ann-Marie"), record("Ann-Marie")];
        let paths = split_by_owner(&records, &dir).unwrap();
        assert_eq!(paths.len(), 2);
        assert_ne!(paths[0], paths[1]);
        let rows: usize = paths
            .iter()
            .map(|p| std::fs::read_to_string(p).unwrap().lines().count() - 1)
            .sum();
        assert_eq!(rows, 3);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
