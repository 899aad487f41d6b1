//! Memoized XBRL instance and filing-section fetches.
//!
//! Every cache here keys on the canonical form of the document URL, so
//! references differing only in query string, fragment or case share one
//! entry. Cache population is not single-flight: the lock is released
//! across the remote fetch, and two concurrent misses for the same key may
//! both fetch before either result lands. With one logical caller that
//! never happens; it only costs duplicate requests, never wrong data.

use std::sync::Arc;

use filings_core::{canonical_url, FilingsApi, Result, XbrlInstance};
use filings_cache::LruCache;
use tokio::sync::Mutex;
use tracing::debug;

/// Capacity of the parsed XBRL instance cache.
const XBRL_CACHE_CAPACITY: usize = 128;

/// Capacity of the filing-section text cache.
const SECTION_CACHE_CAPACITY: usize = 256;

/// Capacity of the derived section-list summary cache.
const SUMMARY_CACHE_CAPACITY: usize = 128;

/// Maximum length (in characters) of the section list in a summary.
const SUMMARY_SECTION_LIST_LIMIT: usize = 400;

/// Canonical-keyed caches over the expensive document endpoints.
///
/// Parsed content is immutable once cached and is evicted only by capacity
/// pressure. Fetch errors propagate to the caller and are never cached, so
/// a failed fetch is retried on the next call.
#[derive(Debug)]
pub struct DocumentStore {
    api: Arc<dyn FilingsApi>,
    instances: Mutex<LruCache<String, Arc<XbrlInstance>>>,
    sections: Mutex<LruCache<(String, String), Arc<String>>>,
    summaries: Mutex<LruCache<String, String>>,
}

impl DocumentStore {
    /// Create a store backed by the given API.
    #[must_use]
    pub fn new(api: Arc<dyn FilingsApi>) -> Self {
        Self {
            api,
            instances: Mutex::new(LruCache::new(XBRL_CACHE_CAPACITY)),
            sections: Mutex::new(LruCache::new(SECTION_CACHE_CAPACITY)),
            summaries: Mutex::new(LruCache::new(SUMMARY_CACHE_CAPACITY)),
        }
    }

    /// The parsed content of an XBRL instance document.
    ///
    /// Exactly one conversion call per unique canonical URL once a fetch
    /// has succeeded; the canonical URL is also what gets converted, so
    /// token query parameters never reach the converter.
    pub async fn instance(&self, url: &str) -> Result<Arc<XbrlInstance>> {
        let key = canonical_url(url);

        if let Some(cached) = self.instances.lock().await.get(&key) {
            debug!(key, "XBRL cache hit");
            return Ok(Arc::clone(cached));
        }

        debug!(key, "XBRL cache miss, converting");
        let instance = Arc::new(self.api.xbrl_instance(&key).await?);
        self.instances
            .lock()
            .await
            .insert(key, Arc::clone(&instance));
        Ok(instance)
    }

    /// One section of a filing as plain text.
    ///
    /// One extraction call per unique (canonical URL, section) pair; the
    /// original URL is used for the fetch itself.
    pub async fn section_text(&self, filing_url: &str, section: &str) -> Result<Arc<String>> {
        let key = (canonical_url(filing_url), section.to_string());

        if let Some(cached) = self.sections.lock().await.get(&key) {
            debug!(section, "Section cache hit");
            return Ok(Arc::clone(cached));
        }

        debug!(section, "Section cache miss, extracting");
        let text = Arc::new(self.api.filing_section(filing_url, section).await?);
        self.sections.lock().await.insert(key, Arc::clone(&text));
        Ok(text)
    }

    /// A short human-readable description of an instance document.
    ///
    /// Derived purely from [`instance`](Self::instance) output and memoized
    /// separately, so computing the summary never triggers a second fetch.
    pub async fn summary(&self, url: &str) -> Result<String> {
        let key = canonical_url(url);

        if let Some(cached) = self.summaries.lock().await.get(&key) {
            debug!(key, "Summary cache hit");
            return Ok(cached.clone());
        }

        let instance = self.instance(url).await?;
        let names = instance.keys().cloned().collect::<Vec<_>>().join(", ");
        let summary = format!(
            "Loaded XBRL. Sections available: {}",
            crate::format::truncate_chars(&names, SUMMARY_SECTION_LIST_LIMIT)
        );

        self.summaries.lock().await.insert(key, summary.clone());
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use filings_core::{
        CompensationRecord, EntityMapping, Fact, FilingRecord, FilingsError, HoldingsFiling,
        HoldingsQuery, InsiderFiling, InsiderQuery,
    };
    use indexmap::IndexMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Document-only mock that counts fetches and can fail once.
    #[derive(Debug, Default)]
    struct MockDocumentApi {
        fetches: AtomicUsize,
        section_fetches: AtomicUsize,
        fail_next: AtomicBool,
    }

    impl MockDocumentApi {
        fn sample_instance() -> XbrlInstance {
            let mut section: IndexMap<String, Vec<Fact>> = IndexMap::new();
            section.insert(
                "Assets".to_string(),
                vec![Fact {
                    value: Some(5_000_000_000.0),
                    ..Default::default()
                }],
            );
            let mut instance = XbrlInstance::new();
            instance.insert("BalanceSheets".to_string(), section);
            instance.insert("StatementsOfOperations".to_string(), IndexMap::new());
            instance
        }
    }

    #[async_trait]
    impl FilingsApi for MockDocumentApi {
        async fn ticker_mappings(&self, _ticker: &str) -> Result<Vec<EntityMapping>> {
            unimplemented!()
        }

        async fn cik_mappings(&self, _cik: &str) -> Result<Vec<EntityMapping>> {
            unimplemented!()
        }

        async fn annual_filings(&self, _cik: &str, _count: usize) -> Result<Vec<FilingRecord>> {
            unimplemented!()
        }

        async fn xbrl_instance(&self, _url: &str) -> Result<XbrlInstance> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(FilingsError::FetchFailed("HTTP 503".to_string()));
            }
            Ok(Self::sample_instance())
        }

        async fn filing_section(&self, _url: &str, section: &str) -> Result<String> {
            self.section_fetches.fetch_add(1, Ordering::SeqCst);
            Ok(format!("text of {section}"))
        }

        async fn insider_filings(&self, _query: &InsiderQuery) -> Result<Vec<InsiderFiling>> {
            unimplemented!()
        }

        async fn holdings_filings(&self, _query: &HoldingsQuery) -> Result<Vec<HoldingsFiling>> {
            unimplemented!()
        }

        async fn compensation_records(&self, _ticker: &str) -> Result<Vec<CompensationRecord>> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn equivalent_references_trigger_one_fetch() {
        let api = Arc::new(MockDocumentApi::default());
        let store = DocumentStore::new(api.clone());

        store.instance("https://sec.gov/a.xml?token=1").await.unwrap();
        store.instance("https://SEC.gov/a.XML#frag").await.unwrap();
        store.instance("https://sec.gov/a.xml").await.unwrap();

        assert_eq!(api.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let api = Arc::new(MockDocumentApi::default());
        api.fail_next.store(true, Ordering::SeqCst);
        let store = DocumentStore::new(api.clone());

        let err = store.instance("https://sec.gov/a.xml").await.unwrap_err();
        assert!(matches!(err, FilingsError::FetchFailed(_)));

        // The retry fetches again and succeeds.
        let instance = store.instance("https://sec.gov/a.xml").await.unwrap();
        assert!(instance.contains_key("BalanceSheets"));
        assert_eq!(api.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn summary_is_derived_without_second_fetch() {
        let api = Arc::new(MockDocumentApi::default());
        let store = DocumentStore::new(api.clone());

        store.instance("https://sec.gov/a.xml").await.unwrap();
        let summary = store.summary("https://sec.gov/a.xml").await.unwrap();
        let again = store.summary("https://sec.gov/a.xml?x=2").await.unwrap();

        assert_eq!(
            summary,
            "Loaded XBRL. Sections available: BalanceSheets, StatementsOfOperations"
        );
        assert_eq!(summary, again);
        assert_eq!(api.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn section_text_memoized_per_url_and_section() {
        let api = Arc::new(MockDocumentApi::default());
        let store = DocumentStore::new(api.clone());

        let a = store.section_text("https://sec.gov/f.htm", "1A").await.unwrap();
        let b = store.section_text("https://SEC.gov/f.htm", "1A").await.unwrap();
        let c = store.section_text("https://sec.gov/f.htm", "7").await.unwrap();

        assert_eq!(*a, "text of 1A");
        assert_eq!(a, b);
        assert_eq!(*c, "text of 7");
        assert_eq!(api.section_fetches.load(Ordering::SeqCst), 2);
    }
}
