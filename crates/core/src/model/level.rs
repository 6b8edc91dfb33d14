use std::fmt;

/// Proficiency codes recognised when a level is detected from a file name.
pub const KNOWN_LEVELS: [&str; 6] = ["A1", "A2", "B1", "B2", "C1", "C2"];

/// Canonical form of a level tag: trimmed and uppercased.
#[must_use]
pub fn normalize_level(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Filter over the free-form level tag of each entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LevelFilter {
    /// Sentinel: no filtering.
    #[default]
    All,
    /// Exact (case-insensitive) match against one level tag.
    Level(String),
}

impl LevelFilter {
    /// Text form of the [`LevelFilter::All`] sentinel.
    pub const ALL: &'static str = "ALL";

    /// Parse user input. Empty input and `ALL` (any case) select everything.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let level = normalize_level(raw);
        if level.is_empty() || level == Self::ALL {
            Self::All
        } else {
            Self::Level(level)
        }
    }

    #[must_use]
    pub fn matches(&self, level: &str) -> bool {
        match self {
            Self::All => true,
            Self::Level(wanted) => normalize_level(level) == *wanted,
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL),
            Self::Level(level) => f.write_str(level),
        }
    }
}

/// How imported rows without their own level get one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LevelAssignment {
    /// Detect from the source file name, falling back to the configured level.
    #[default]
    Auto,
    Fixed(String),
}

impl LevelAssignment {
    /// Parse user input; empty input or `AUTO` (any case) selects detection.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let level = normalize_level(raw);
        if level.is_empty() || level == "AUTO" {
            Self::Auto
        } else {
            Self::Fixed(level)
        }
    }

    /// Resolve the fallback level for rows coming from `file_name`.
    #[must_use]
    pub fn resolve(&self, file_name: &str, fallback: &str) -> String {
        match self {
            Self::Fixed(level) => level.clone(),
            Self::Auto => detect_level(file_name)
                .map_or_else(|| normalize_level(fallback), str::to_owned),
        }
    }
}

/// First known proficiency code contained in the (uppercased) file name.
#[must_use]
pub fn detect_level(file_name: &str) -> Option<&'static str> {
    let upper = file_name.to_uppercase();
    KNOWN_LEVELS.into_iter().find(|code| upper.contains(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_and_blank_select_everything() {
        assert_eq!(LevelFilter::parse("ALL"), LevelFilter::All);
        assert_eq!(LevelFilter::parse("all"), LevelFilter::All);
        assert_eq!(LevelFilter::parse("  "), LevelFilter::All);
        assert!(LevelFilter::All.matches("anything"));
    }

    #[test]
    fn level_filter_is_case_insensitive() {
        let filter = LevelFilter::parse("b1");
        assert_eq!(filter, LevelFilter::Level("B1".into()));
        assert!(filter.matches("B1"));
        assert!(filter.matches("b1"));
        assert!(!filter.matches("B2"));
    }

    #[test]
    fn detects_level_from_file_name() {
        assert_eq!(detect_level("goethe_a2_list.csv"), Some("A2"));
        assert_eq!(detect_level("vocab.csv"), None);
    }

    #[test]
    fn auto_assignment_falls_back() {
        let auto = LevelAssignment::parse("auto");
        assert_eq!(auto.resolve("c1-words.csv", "OTHERS"), "C1");
        assert_eq!(auto.resolve("words.csv", "others"), "OTHERS");
        assert_eq!(LevelAssignment::parse("b2").resolve("a1.csv", "OTHERS"), "B2");
    }
}
