use storage::WordStore;
use vocab_core::model::{LevelFilter, WordEntry};

/// One request for the paged revision table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionQuery {
    pub level: LevelFilter,
    pub search: String,
    /// 1-based; 0 is read as 1, anything past the end as the last page.
    pub page: usize,
}

impl Default for RevisionQuery {
    fn default() -> Self {
        Self {
            level: LevelFilter::All,
            search: String::new(),
            page: 1,
        }
    }
}

/// One page of matching entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionPage {
    pub rows: Vec<WordEntry>,
    pub page: usize,
    pub total_pages: usize,
    /// Matching entries across all pages.
    pub total: usize,
}

impl RevisionPage {
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slice `words.query(level, search)` into pages of `page_size` rows.
#[must_use]
pub fn revision_page(words: &WordStore, query: &RevisionQuery, page_size: usize) -> RevisionPage {
    let page_size = page_size.max(1);
    let matches = words.query(&query.level, &query.search);
    let total = matches.len();
    let total_pages = total.div_ceil(page_size).max(1);
    let page = query.page.clamp(1, total_pages);

    let rows = matches
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .collect();

    RevisionPage {
        rows,
        page,
        total_pages,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use storage::InMemoryRepository;
    use vocab_core::model::WordRow;

    fn store(count: usize) -> WordStore {
        let (mut words, _) = WordStore::load(Arc::new(InMemoryRepository::new()));
        let rows = (0..count).map(|i| {
            let level = if i % 2 == 0 { "A1" } else { "B1" };
            WordRow::new(level, "", format!("Wort{i}"), "", format!("word {i}"))
        });
        let _ = words.import_rows(rows, "OTHERS");
        words
    }

    fn query(level: &str, search: &str, page: usize) -> RevisionQuery {
        RevisionQuery {
            level: LevelFilter::parse(level),
            search: search.into(),
            page,
        }
    }

    #[test]
    fn pages_slice_in_insertion_order() {
        let words = store(120);
        let first = revision_page(&words, &query("ALL", "", 1), 50);
        assert_eq!(first.total, 120);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.rows.len(), 50);
        assert_eq!(first.rows[0].headword(), "Wort0");
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = revision_page(&words, &query("ALL", "", 3), 50);
        assert_eq!(last.rows.len(), 20);
        assert_eq!(last.rows[0].headword(), "Wort100");
        assert!(!last.has_next());
    }

    #[test]
    fn out_of_range_pages_are_clamped() {
        let words = store(10);
        assert_eq!(revision_page(&words, &query("ALL", "", 0), 4).page, 1);
        let past = revision_page(&words, &query("ALL", "", 99), 4);
        assert_eq!(past.page, 3);
        assert_eq!(past.rows.len(), 2);
    }

    #[test]
    fn filters_combine_level_and_text() {
        let words = store(10);
        let page = revision_page(&words, &query("b1", "WORD 3", 1), 50);
        assert_eq!(page.total, 1);
        assert_eq!(page.rows[0].headword(), "Wort3");
    }

    #[test]
    fn no_match_still_has_one_page() {
        let words = store(3);
        let page = revision_page(&words, &query("C1", "", 5), 50);
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
        assert!(page.rows.is_empty());
    }
}
