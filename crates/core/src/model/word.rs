use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::WordId;
use crate::model::level::normalize_level;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Reasons a candidate row cannot become a `WordEntry`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordError {
    #[error("headword cannot be empty")]
    EmptyHeadword,

    #[error("translation cannot be empty")]
    EmptyTranslation,
}

//
// ─── IMPORT ROW ────────────────────────────────────────────────────────────────
//

/// Candidate record handed over by the import collaborator.
///
/// Field names follow the documented CSV schema
/// (`Level,Article,German,Plural,English`); every field may be empty here,
/// validation happens in [`WordEntry::from_row`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WordRow {
    pub level: String,
    pub article: String,
    pub german: String,
    pub plural: String,
    pub english: String,
}

impl WordRow {
    #[must_use]
    pub fn new(
        level: impl Into<String>,
        article: impl Into<String>,
        german: impl Into<String>,
        plural: impl Into<String>,
        english: impl Into<String>,
    ) -> Self {
        Self {
            level: level.into(),
            article: article.into(),
            german: german.into(),
            plural: plural.into(),
            english: english.into(),
        }
    }
}

//
// ─── WORD ENTRY ────────────────────────────────────────────────────────────────
//

/// A validated vocabulary record. Never mutated after import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    id: WordId,
    level: String,
    article: String,
    headword: String,
    plural: String,
    translation: String,
}

impl WordEntry {
    /// Convert an import row into an entry.
    ///
    /// - `level`: trimmed and uppercased; when empty, `fallback_level` is used
    ///   (also uppercased).
    /// - `article`, `plural`: optional, trimmed, may stay empty.
    /// - `german` (headword) and `english` (translation): required, trimmed.
    ///
    /// # Errors
    ///
    /// Returns `WordError::EmptyHeadword` or `WordError::EmptyTranslation` when a
    /// required field is blank.
    pub fn from_row(row: WordRow, fallback_level: &str, id: WordId) -> Result<Self, WordError> {
        let level = match normalize_level(&row.level) {
            level if level.is_empty() => normalize_level(fallback_level),
            level => level,
        };
        Self::from_persisted(id, level, row.article, row.german, row.plural, row.english)
    }

    /// Rehydrate an entry from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `WordError` if the stored headword or translation is blank.
    pub fn from_persisted(
        id: WordId,
        level: impl Into<String>,
        article: impl Into<String>,
        headword: impl Into<String>,
        plural: impl Into<String>,
        translation: impl Into<String>,
    ) -> Result<Self, WordError> {
        let headword = headword.into().trim().to_owned();
        if headword.is_empty() {
            return Err(WordError::EmptyHeadword);
        }
        let translation = translation.into().trim().to_owned();
        if translation.is_empty() {
            return Err(WordError::EmptyTranslation);
        }

        Ok(Self {
            id,
            level: normalize_level(&level.into()),
            article: article.into().trim().to_owned(),
            headword,
            plural: plural.into().trim().to_owned(),
            translation,
        })
    }

    #[must_use]
    pub fn id(&self) -> WordId {
        self.id
    }

    #[must_use]
    pub fn level(&self) -> &str {
        &self.level
    }

    #[must_use]
    pub fn article(&self) -> &str {
        &self.article
    }

    #[must_use]
    pub fn headword(&self) -> &str {
        &self.headword
    }

    #[must_use]
    pub fn plural(&self) -> &str {
        &self.plural
    }

    #[must_use]
    pub fn translation(&self) -> &str {
        &self.translation
    }

    /// Article and headword joined by a space, e.g. `der Hund`; just the
    /// headword when there is no article.
    #[must_use]
    pub fn headword_form(&self) -> String {
        if self.article.is_empty() {
            self.headword.clone()
        } else {
            format!("{} {}", self.article, self.headword)
        }
    }

    /// The plural if one was imported.
    #[must_use]
    pub fn plural_opt(&self) -> Option<&str> {
        Some(self.plural.as_str()).filter(|p| !p.is_empty())
    }

    /// Convert back into the import/export row shape.
    #[must_use]
    pub fn to_row(&self) -> WordRow {
        WordRow {
            level: self.level.clone(),
            article: self.article.clone(),
            german: self.headword.clone(),
            plural: self.plural.clone(),
            english: self.translation.clone(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_level_is_uppercased() {
        let row = WordRow::new(" a1 ", "der", "Hund", "Hunde", "dog");
        let entry = WordEntry::from_row(row, "OTHERS", WordId::generate()).unwrap();
        assert_eq!(entry.level(), "A1");
        assert_eq!(entry.headword_form(), "der Hund");
        assert_eq!(entry.plural_opt(), Some("Hunde"));
    }

    #[test]
    fn missing_level_uses_fallback() {
        let row = WordRow::new("", "", "laufen", "", "to run");
        let entry = WordEntry::from_row(row, "b1", WordId::generate()).unwrap();
        assert_eq!(entry.level(), "B1");
        assert_eq!(entry.headword_form(), "laufen");
        assert_eq!(entry.plural_opt(), None);
    }

    #[test]
    fn blank_headword_is_rejected() {
        let row = WordRow::new("A1", "der", "   ", "", "dog");
        let err = WordEntry::from_row(row, "A1", WordId::generate()).unwrap_err();
        assert_eq!(err, WordError::EmptyHeadword);
    }

    #[test]
    fn blank_translation_is_rejected() {
        let row = WordRow::new("A1", "der", "Hund", "", "");
        let err = WordEntry::from_row(row, "A1", WordId::generate()).unwrap_err();
        assert_eq!(err, WordError::EmptyTranslation);
    }

    #[test]
    fn to_row_restores_import_shape() {
        let row = WordRow::new("A2", "die", "Katze", "Katzen", "cat");
        let entry = WordEntry::from_row(row.clone(), "OTHERS", WordId::generate()).unwrap();
        assert_eq!(entry.to_row(), row);
    }

    #[test]
    fn row_deserializes_from_schema_field_names() {
        let json = r#"{"Level":"A1","Article":"das","German":"Haus","English":"house"}"#;
        let row: WordRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.german, "Haus");
        assert_eq!(row.plural, "");
    }
}
