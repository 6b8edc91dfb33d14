//! CSV word lists: parsing uploads into candidate rows, exporting the store.
//!
//! The documented column order is `Level,Article,German,Plural,English`. A
//! file whose first record names both `German` and `English` is read by
//! header; anything else is read positionally.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use storage::{PersistStatus, StorageError};
use vocab_core::model::{WordEntry, WordRow};

use crate::error::ImportError;

pub const CSV_HEADER: [&str; 5] = ["Level", "Article", "German", "Plural", "English"];

/// Downloadable starter file.
pub const TEMPLATE_CSV: &str =
    "Level,Article,German,Plural,English\nA1,der,Hund,Hunde,dog\nA1,die,Katze,Katzen,cat\n";

//
// ─── PARSING ───────────────────────────────────────────────────────────────────
//

/// Rows read from one CSV text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    pub rows: Vec<WordRow>,
    /// Data rows dropped for a missing German or English cell.
    pub skipped: usize,
}

/// Column index per schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMapping {
    level: Option<usize>,
    article: Option<usize>,
    german: Option<usize>,
    plural: Option<usize>,
    english: Option<usize>,
}

impl ColumnMapping {
    const POSITIONAL: Self = Self {
        level: Some(0),
        article: Some(1),
        german: Some(2),
        plural: Some(3),
        english: Some(4),
    };

    /// Mapping from a header record, if it names both required columns.
    fn from_header(record: &StringRecord) -> Option<Self> {
        let names: Vec<String> = record.iter().map(str::to_lowercase).collect();
        let find = |name: &str| names.iter().position(|n| n == name);
        let mapping = Self {
            level: find("level"),
            article: find("article"),
            german: find("german"),
            plural: find("plural"),
            english: find("english"),
        };
        (mapping.german.is_some() && mapping.english.is_some()).then_some(mapping)
    }

    fn row(&self, record: &StringRecord) -> WordRow {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_owned()
        };
        WordRow {
            level: cell(self.level),
            article: cell(self.article),
            german: cell(self.german),
            plural: cell(self.plural),
            english: cell(self.english),
        }
    }
}

fn is_repeated_header(row: &WordRow) -> bool {
    row.german.eq_ignore_ascii_case("german") && row.english.eq_ignore_ascii_case("english")
}

/// Parse CSV text into candidate rows.
///
/// Strips a leading BOM, trims every cell, skips blank lines, rows lacking
/// German or English, and header rows repeated inside the data.
///
/// # Errors
///
/// Returns `ImportError::Csv` if the reader reports a malformed record.
pub fn parse_csv(text: &str) -> Result<ParsedCsv, ImportError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut parsed = ParsedCsv::default();
    let mut mapping = None;
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if index == 0
            && let Some(by_name) = ColumnMapping::from_header(&record)
        {
            mapping = Some(by_name);
            continue;
        }
        if record.iter().all(str::is_empty) {
            continue;
        }

        let row = mapping.unwrap_or(ColumnMapping::POSITIONAL).row(&record);
        if row.german.is_empty() || row.english.is_empty() {
            parsed.skipped += 1;
            continue;
        }
        if is_repeated_header(&row) {
            continue;
        }
        parsed.rows.push(row);
    }

    log::debug!(
        "parsed {} csv rows ({} skipped, header: {})",
        parsed.rows.len(),
        parsed.skipped,
        mapping.is_some()
    );
    Ok(parsed)
}

/// Read and parse one CSV file.
///
/// # Errors
///
/// Returns `ImportError::Read` if the file cannot be read as UTF-8 text, or
/// the `parse_csv` error.
pub fn read_csv_file(path: &Path) -> Result<ParsedCsv, ImportError> {
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_csv(&text)
}

//
// ─── EXPORT ────────────────────────────────────────────────────────────────────
//

/// Serialize `words` in the documented column order, header first.
///
/// Fields holding quotes, commas or line breaks are quoted.
///
/// # Errors
///
/// Returns `ImportError` if the writer fails.
pub fn export_csv(words: &[WordEntry]) -> Result<String, ImportError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for word in words {
        writer.serialize(word.to_row())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ImportError::Export(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ImportError::Export(err.to_string()))
}

//
// ─── REPORTS ───────────────────────────────────────────────────────────────────
//

/// What happened to one file of a multi-file import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Imported {
        level: String,
        accepted: usize,
        rejected: usize,
    },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file: String,
    pub status: FileStatus,
}

/// Aggregate result of importing rows or files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub accepted: usize,
    pub rejected: usize,
    pub files: Vec<FileReport>,
    /// First persistence failure of the batch, if any.
    pub persist: PersistStatus,
}

impl Default for ImportReport {
    fn default() -> Self {
        Self {
            accepted: 0,
            rejected: 0,
            files: Vec::new(),
            persist: PersistStatus::Saved,
        }
    }
}

impl ImportReport {
    pub(crate) fn record_persist(&mut self, status: PersistStatus) {
        if self.persist.is_saved() {
            self.persist = status;
        }
    }

    #[must_use]
    pub fn warning(&self) -> Option<&StorageError> {
        self.persist.warning()
    }

    #[must_use]
    pub fn failed_files(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Failed(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::model::WordId;

    #[test]
    fn header_rows_map_columns_by_name() {
        let text = "\u{feff}English, German ,article\r\ndog,Hund,der\r\n\r\ncat,Katze,die\r\n";
        let parsed = parse_csv(text).unwrap();
        assert_eq!(
            parsed.rows,
            [
                WordRow::new("", "der", "Hund", "", "dog"),
                WordRow::new("", "die", "Katze", "", "cat"),
            ]
        );
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn headerless_rows_are_positional() {
        let text = "A1,der,Hund,Hunde,dog\nB2,,laufen,,\"to run, to walk\"\n";
        let parsed = parse_csv(text).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0], WordRow::new("A1", "der", "Hund", "Hunde", "dog"));
        assert_eq!(parsed.rows[1].english, "to run, to walk");
    }

    #[test]
    fn short_and_incomplete_rows_are_skipped() {
        let text = "Level,Article,German,Plural,English\nA1,der,Hund\nA1,,,,cat\nA2,die,Maus,Mäuse,mouse\n";
        let parsed = parse_csv(text).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].german, "Maus");
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn repeated_header_lines_are_dropped() {
        let text = "Level,Article,German,Plural,English\nA1,der,Hund,,dog\nLevel,Article,German,Plural,English\n";
        let parsed = parse_csv(text).unwrap();
        assert_eq!(parsed.rows.len(), 1);
    }

    #[test]
    fn old_mac_line_endings_are_accepted() {
        let parsed = parse_csv("A1,der,Hund,,dog\rA1,die,Katze,,cat").unwrap();
        assert_eq!(parsed.rows.len(), 2);
    }

    #[test]
    fn empty_text_has_no_rows() {
        assert_eq!(parse_csv("").unwrap(), ParsedCsv::default());
    }

    #[test]
    fn template_parses_into_two_rows() {
        let parsed = parse_csv(TEMPLATE_CSV).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].plural, "Katzen");
    }

    #[test]
    fn export_quotes_when_needed_and_reimports() {
        let words = vec![
            WordEntry::from_persisted(WordId::generate(), "A1", "der", "Hund", "Hunde", "dog")
                .unwrap(),
            WordEntry::from_persisted(
                WordId::generate(),
                "B1",
                "",
                "sagen",
                "",
                "to say, \"tell\"",
            )
            .unwrap(),
        ];
        let csv = export_csv(&words).unwrap();
        assert_eq!(
            csv,
            "Level,Article,German,Plural,English\nA1,der,Hund,Hunde,dog\nB1,,sagen,,\"to say, \"\"tell\"\"\"\n"
        );

        let parsed = parse_csv(&csv).unwrap();
        let rows: Vec<_> = words.iter().map(WordEntry::to_row).collect();
        assert_eq!(parsed.rows, rows);
    }

    #[test]
    fn export_of_empty_store_is_just_the_header() {
        assert_eq!(export_csv(&[]).unwrap(), "Level,Article,German,Plural,English\n");
    }

    #[test]
    fn unreadable_file_reports_its_path() {
        let err = read_csv_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ImportError::Read { ref path, .. } if path.ends_with("here.csv")));
    }
}
