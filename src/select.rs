//! Dataset selection over the upload store.
//!
//! A heatmap request needs exactly three tables: the location csv and the
//! two measurement spreadsheets. [`SelectionPolicy`] decides which uploads
//! fill those slots; [`FilenameConvention`] is the stock policy based on the
//! upstream naming convention.

use thiserror::Error;

use crate::store::UploadedTable;

/// The three tables a heatmap request is built from.
#[derive(Debug, Clone)]
pub struct DatasetSelection {
    pub locations: UploadedTable,
    pub with_filter: UploadedTable,
    pub without_filter: UploadedTable,
}

/// A missing slot. These surface to the user as-is, so the messages say what
/// to upload rather than what broke.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no location table found; upload a csv of site coordinates first")]
    NoLocationTable,

    #[error(
        "no with-filter measurement table found; upload a spreadsheet whose name contains \"with\""
    )]
    NoWithTable,

    #[error(
        "no without-filter measurement table found; upload a spreadsheet whose name contains \"without\""
    )]
    NoWithoutTable,
}

/// Picks the three datasets for one request from the store's listings.
///
/// Both listings arrive oldest first, the order [`crate::store::UploadStore`]
/// guarantees.
pub trait SelectionPolicy {
    fn select(
        &self,
        csvs: &[UploadedTable],
        excels: &[UploadedTable],
    ) -> Result<DatasetSelection, SelectionError>;
}

/// The upstream naming convention: the newest csv holds the locations, and
/// measurement spreadsheets are recognized by `"with"` / `"without"` in
/// their filename, case-insensitively, newest winning per slot.
///
/// `"without"` is tested first. Every without-name also contains `"with"`,
/// so the other order would file every spreadsheet under the with slot.
pub struct FilenameConvention;

impl SelectionPolicy for FilenameConvention {
    fn select(
        &self,
        csvs: &[UploadedTable],
        excels: &[UploadedTable],
    ) -> Result<DatasetSelection, SelectionError> {
        let locations = csvs.last().cloned().ok_or(SelectionError::NoLocationTable)?;

        let mut with_filter = None;
        let mut without_filter = None;

        for table in excels {
            let name = table.name.to_lowercase();
            if name.contains("without") {
                without_filter = Some(table.clone());
            } else if name.contains("with") {
                with_filter = Some(table.clone());
            }
        }

        Ok(DatasetSelection {
            locations,
            with_filter: with_filter.ok_or(SelectionError::NoWithTable)?,
            without_filter: without_filter.ok_or(SelectionError::NoWithoutTable)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::TableKind;

    fn upload(name: &str, kind: TableKind, seq: u64) -> UploadedTable {
        UploadedTable {
            name: name.to_string(),
            kind,
            seq,
            bytes: name.as_bytes().to_vec(),
        }
    }

    fn csvs(names: &[&str]) -> Vec<UploadedTable> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| upload(n, TableKind::Csv, i as u64 + 1))
            .collect()
    }

    fn excels(names: &[&str]) -> Vec<UploadedTable> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| upload(n, TableKind::Excel, i as u64 + 1))
            .collect()
    }

    #[test]
    fn test_selects_all_three_slots() {
        let selection = FilenameConvention
            .select(
                &csvs(&["sites.csv"]),
                &excels(&["with_filter.xlsx", "without_filter.xlsx"]),
            )
            .unwrap();

        assert_eq!(selection.locations.name, "sites.csv");
        assert_eq!(selection.with_filter.name, "with_filter.xlsx");
        assert_eq!(selection.without_filter.name, "without_filter.xlsx");
    }

    #[test]
    fn test_without_names_never_land_in_the_with_slot() {
        // "without_filter.xlsx" contains "with" as a substring; it must
        // still only fill the without slot
        let result = FilenameConvention.select(
            &csvs(&["sites.csv"]),
            &excels(&["without_filter.xlsx"]),
        );

        assert_eq!(result.unwrap_err(), SelectionError::NoWithTable);
    }

    #[test]
    fn test_most_recent_csv_wins() {
        let selection = FilenameConvention
            .select(
                &csvs(&["old_sites.csv", "new_sites.csv"]),
                &excels(&["with.xlsx", "without.xlsx"]),
            )
            .unwrap();

        assert_eq!(selection.locations.name, "new_sites.csv");
    }

    #[test]
    fn test_most_recent_measurement_wins_per_slot() {
        let selection = FilenameConvention
            .select(
                &csvs(&["sites.csv"]),
                &excels(&[
                    "with_v1.xlsx",
                    "without_v1.xlsx",
                    "with_v2.xlsx",
                    "without_v2.xlsx",
                ]),
            )
            .unwrap();

        assert_eq!(selection.with_filter.name, "with_v2.xlsx");
        assert_eq!(selection.without_filter.name, "without_v2.xlsx");
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let selection = FilenameConvention
            .select(
                &csvs(&["sites.csv"]),
                &excels(&["WITH_Filter.XLSX", "Without_Filter.XLSX"]),
            )
            .unwrap();

        assert_eq!(selection.with_filter.name, "WITH_Filter.XLSX");
        assert_eq!(selection.without_filter.name, "Without_Filter.XLSX");
    }

    #[test]
    fn test_no_location_table() {
        let result = FilenameConvention.select(&[], &excels(&["with.xlsx", "without.xlsx"]));
        assert_eq!(result.unwrap_err(), SelectionError::NoLocationTable);
    }

    #[test]
    fn test_no_with_table() {
        let result = FilenameConvention.select(&csvs(&["sites.csv"]), &excels(&["without.xlsx"]));
        assert_eq!(result.unwrap_err(), SelectionError::NoWithTable);
    }

    #[test]
    fn test_no_without_table() {
        let result = FilenameConvention.select(&csvs(&["sites.csv"]), &excels(&["with.xlsx"]));
        assert_eq!(result.unwrap_err(), SelectionError::NoWithoutTable);
    }

    #[test]
    fn test_unrelated_excel_names_fill_no_slot() {
        let result = FilenameConvention.select(
            &csvs(&["sites.csv"]),
            &excels(&["survey_notes.xlsx", "without.xlsx"]),
        );
        assert_eq!(result.unwrap_err(), SelectionError::NoWithTable);
    }
}
