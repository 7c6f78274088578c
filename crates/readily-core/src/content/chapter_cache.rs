//! Bounded LRU cache of segmented chapters.

use alloc::sync::Arc;

use heapless::Vec;
use log::debug;

use super::{ChapterSource, ProcessedChapter, Segmenter};

pub const DEFAULT_CHAPTER_CACHE_CAPACITY: usize = 10;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
    pub evictions: u32,
    /// Segmenter invocations.
    pub segmentations: u32,
}

#[derive(Debug)]
struct CacheEntry<K> {
    id: K,
    chapter: Arc<ProcessedChapter>,
    last_accessed: u64,
}

/// Memoizes [`Segmenter`] output per chapter id, evicting the least recently
/// accessed entry once `N` chapters are held. Identical text under different
/// ids is cached twice.
pub struct ChapterCache<S, const N: usize = DEFAULT_CHAPTER_CACHE_CAPACITY>
where
    S: ChapterSource,
{
    source: S,
    entries: Vec<CacheEntry<S::ChapterId>, N>,
    access_clock: u64,
    stats: CacheStats,
}

impl<S> ChapterCache<S>
where
    S: ChapterSource,
{
    pub fn with_default_capacity(source: S) -> Self {
        Self::new(source)
    }
}

impl<S, const N: usize> ChapterCache<S, N>
where
    S: ChapterSource,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: Vec::new(),
            access_clock: 0,
            stats: CacheStats::default(),
        }
    }

    /// Segmented chapter for `id`, computed on first access. `None` when the
    /// source has no text for that id.
    pub fn get(&mut self, id: &S::ChapterId) -> Option<Arc<ProcessedChapter>> {
        self.access_clock = self.access_clock.saturating_add(1);
        let now = self.access_clock;

        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == *id) {
            entry.last_accessed = now;
            self.stats.hits = self.stats.hits.saturating_add(1);
            return Some(entry.chapter.clone());
        }

        self.stats.misses = self.stats.misses.saturating_add(1);
        let Some(text) = self.source.chapter_text(id) else {
            debug!("chapter-cache: no content id={:?}", id);
            return None;
        };

        let chapter = Arc::new(Segmenter::new(self.source.language()).process(text));
        self.stats.segmentations = self.stats.segmentations.saturating_add(1);

        if self.entries.is_full() {
            self.evict_least_recent();
        }
        let pushed = self.entries.push(CacheEntry {
            id: id.clone(),
            chapter: chapter.clone(),
            last_accessed: now,
        });
        if pushed.is_err() {
            debug!("chapter-cache: zero capacity, not storing id={:?}", id);
        }

        debug!(
            "chapter-cache: stored id={:?} words={} entries={}/{}",
            id,
            chapter.word_count(),
            self.entries.len(),
            N
        );
        Some(chapter)
    }

    pub fn contains(&self, id: &S::ChapterId) -> bool {
        self.entries.iter().any(|entry| entry.id == *id)
    }

    /// Drops one chapter, e.g. after its text was edited.
    pub fn invalidate(&mut self, id: &S::ChapterId) -> bool {
        let Some(index) = self.entries.iter().position(|entry| entry.id == *id) else {
            return false;
        };
        self.entries.swap_remove(index);
        true
    }

    /// Empties the cache unconditionally.
    pub fn clear_cache(&mut self) {
        debug!("chapter-cache: clear entries={}", self.entries.len());
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source. Callers that change chapter text should
    /// follow up with [`Self::invalidate`] or [`Self::clear_cache`].
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn evict_least_recent(&mut self) {
        let Some(index) = self
            .entries
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(index, _)| index)
        else {
            return;
        };

        let evicted = self.entries.swap_remove(index);
        self.stats.evictions = self.stats.evictions.saturating_add(1);
        debug!(
            "chapter-cache: evict id={:?} last_accessed={}",
            evicted.id, evicted.last_accessed
        );
    }
}

#[cfg(test)]
mod tests {
    use core::cell::Cell;

    use super::*;
    use crate::content::Language;

    struct CountingSource {
        chapters: [(&'static str, &'static str); 3],
        reads: Cell<u32>,
        language: &'static str,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                chapters: [
                    ("A", "Alpha one. Alpha two."),
                    ("B", "Bravo."),
                    ("C", "Bravo."),
                ],
                reads: Cell::new(0),
                language: "en",
            }
        }
    }

    impl ChapterSource for CountingSource {
        type ChapterId = &'static str;

        fn chapter_text(&self, id: &Self::ChapterId) -> Option<&str> {
            self.reads.set(self.reads.get() + 1);
            self.chapters
                .iter()
                .find(|(chapter_id, _)| chapter_id == id)
                .map(|(_, text)| *text)
        }

        fn language(&self) -> Language {
            Language::new(self.language)
        }
    }

    #[test]
    fn evicts_least_recently_accessed() {
        let mut cache = ChapterCache::<_, 2>::new(CountingSource::new());
        cache.get(&"A").unwrap();
        cache.get(&"B").unwrap();
        cache.get(&"C").unwrap();

        assert!(!cache.contains(&"A"));
        assert!(cache.contains(&"B"));
        assert!(cache.contains(&"C"));
        assert_eq!(cache.stats().segmentations, 3);
        assert_eq!(cache.stats().evictions, 1);

        cache.get(&"A").unwrap();
        assert_eq!(cache.stats().segmentations, 4);
        // B was least recent when A came back.
        assert!(!cache.contains(&"B"));
        assert!(cache.contains(&"C"));
    }

    #[test]
    fn hits_refresh_recency_and_skip_segmentation() {
        let mut cache = ChapterCache::<_, 2>::new(CountingSource::new());
        let first = cache.get(&"A").unwrap();
        cache.get(&"B").unwrap();
        let again = cache.get(&"A").unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(cache.source().reads.get(), 2);

        cache.get(&"C").unwrap();
        assert!(cache.contains(&"A"));
        assert!(!cache.contains(&"B"));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 3);
    }

    #[test]
    fn identical_text_is_cached_per_id() {
        let mut cache = ChapterCache::with_default_capacity(CountingSource::new());
        let b = cache.get(&"B").unwrap();
        let c = cache.get(&"C").unwrap();
        assert_eq!(*b, *c);
        assert!(!Arc::ptr_eq(&b, &c));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.capacity(), DEFAULT_CHAPTER_CACHE_CAPACITY);
    }

    #[test]
    fn unknown_chapter_is_absent() {
        let mut cache = ChapterCache::<_, 2>::new(CountingSource::new());
        assert!(cache.get(&"Z").is_none());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().segmentations, 0);
    }

    #[test]
    fn clear_and_invalidate_force_resegmentation() {
        let mut cache = ChapterCache::<_, 4>::new(CountingSource::new());
        cache.get(&"A").unwrap();
        cache.get(&"B").unwrap();

        assert!(cache.invalidate(&"A"));
        assert!(!cache.invalidate(&"A"));
        cache.get(&"A").unwrap();
        assert_eq!(cache.stats().segmentations, 3);

        cache.clear_cache();
        assert!(cache.is_empty());
        cache.get(&"B").unwrap();
        assert_eq!(cache.stats().segmentations, 4);
    }

    #[test]
    fn chapters_use_source_language() {
        let mut source = CountingSource::new();
        source.language = "ru";
        let mut cache = ChapterCache::<_, 2>::new(source);
        assert_eq!(cache.get(&"A").unwrap().language().as_str(), "ru");

        cache.source_mut().language = "de";
        cache.clear_cache();
        assert_eq!(cache.get(&"A").unwrap().language().as_str(), "de");
    }
}
