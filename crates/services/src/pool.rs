use rand::Rng;
use rand::seq::SliceRandom;

use storage::WordStore;
use vocab_core::model::{LevelFilter, WordEntry};

/// Ordered working subset of the word store for one session.
///
/// A snapshot: later imports do not show up until the pool is rebuilt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pool {
    entries: Vec<WordEntry>,
    filter: LevelFilter,
}

impl Pool {
    #[must_use]
    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&WordEntry> {
        self.entries.get(position)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The level filter this pool was built from.
    #[must_use]
    pub fn filter(&self) -> &LevelFilter {
        &self.filter
    }

    /// Fisher–Yates shuffle in place; every permutation is equally likely.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.entries.shuffle(rng);
    }
}

/// Derives pools from the word store.
pub struct PoolBuilder<'a> {
    words: &'a WordStore,
}

impl<'a> PoolBuilder<'a> {
    #[must_use]
    pub fn new(words: &'a WordStore) -> Self {
        Self { words }
    }

    /// Every entry matching `filter`, in insertion order.
    #[must_use]
    pub fn build(&self, filter: &LevelFilter) -> Pool {
        Pool {
            entries: self.words.query(filter, "").into_iter().cloned().collect(),
            filter: filter.clone(),
        }
    }

    /// `build` followed by a fresh shuffle.
    #[must_use]
    pub fn build_shuffled<R: Rng + ?Sized>(&self, filter: &LevelFilter, rng: &mut R) -> Pool {
        shuffle(self.build(filter), rng)
    }
}

/// A uniformly random permutation of `pool`.
#[must_use]
pub fn shuffle<R: Rng + ?Sized>(mut pool: Pool, rng: &mut R) -> Pool {
    pool.shuffle(rng);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;
    use storage::InMemoryRepository;
    use vocab_core::model::{WordId, WordRow};

    fn store_with(rows: Vec<WordRow>) -> WordStore {
        let (mut store, _) = WordStore::load(Arc::new(InMemoryRepository::new()));
        let _ = store.import_rows(rows, "OTHERS");
        store
    }

    fn sample_store() -> WordStore {
        store_with(vec![
            WordRow::new("A1", "der", "Hund", "", "dog"),
            WordRow::new("A2", "die", "Katze", "", "cat"),
            WordRow::new("a1", "das", "Haus", "", "house"),
            WordRow::new("B1", "", "laufen", "", "to run"),
        ])
    }

    fn ids(entries: &[WordEntry]) -> Vec<WordId> {
        entries.iter().map(WordEntry::id).collect()
    }

    #[test]
    fn build_matches_query_in_insertion_order() {
        let store = sample_store();
        let filter = LevelFilter::parse("A1");
        let pool = PoolBuilder::new(&store).build(&filter);

        let queried: Vec<WordId> = store.query(&filter, "").iter().map(|w| w.id()).collect();
        assert_eq!(ids(pool.entries()), queried);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.filter(), &filter);
    }

    #[test]
    fn all_filter_selects_everything() {
        let store = sample_store();
        let pool = PoolBuilder::new(&store).build(&LevelFilter::All);
        assert_eq!(ids(pool.entries()), ids(store.all()));
    }

    #[test]
    fn unknown_level_gives_empty_pool() {
        let store = sample_store();
        let pool = PoolBuilder::new(&store).build(&LevelFilter::parse("C2"));
        assert!(pool.is_empty());
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let store = sample_store();
        let pool = PoolBuilder::new(&store).build(&LevelFilter::All);
        let mut rng = StdRng::seed_from_u64(7);
        let shuffled = shuffle(pool.clone(), &mut rng);

        let mut before = ids(pool.entries());
        let mut after = ids(shuffled.entries());
        assert_eq!(before.len(), after.len());
        before.sort();
        after.sort();
        assert_eq!(before, after);
        // The store itself keeps its order.
        assert_eq!(ids(store.all()), ids(pool.entries()));
    }

    #[test]
    fn build_shuffled_keeps_the_filtered_set() {
        let store = sample_store();
        let filter = LevelFilter::parse("A1");
        let mut rng = StdRng::seed_from_u64(3);
        let pool = PoolBuilder::new(&store).build_shuffled(&filter, &mut rng);

        let mut shuffled = ids(pool.entries());
        let mut expected = ids(PoolBuilder::new(&store).build(&filter).entries());
        shuffled.sort();
        expected.sort();
        assert_eq!(shuffled, expected);
        assert_eq!(pool.filter(), &filter);
    }

    #[test]
    fn shuffle_spreads_elements_evenly() {
        let rows = (0..4)
            .map(|i| WordRow::new("A1", "", format!("w{i}"), "", format!("m{i}")))
            .collect();
        let store = store_with(rows);
        let pool = PoolBuilder::new(&store).build(&LevelFilter::All);
        let original = ids(pool.entries());

        let trials = 8_000;
        let mut counts = [[0_u32; 4]; 4];
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..trials {
            let shuffled = shuffle(pool.clone(), &mut rng);
            for (position, entry) in shuffled.entries().iter().enumerate() {
                let element = original.iter().position(|id| *id == entry.id()).unwrap();
                counts[element][position] += 1;
            }
        }

        // Expected 2000 per cell; allow a generous band.
        for row in counts {
            for cell in row {
                assert!((1_800..=2_200).contains(&cell), "skewed cell count {cell}");
            }
        }
    }
}
