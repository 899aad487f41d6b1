//! Document reference canonicalization.
//!
//! Remote document URLs arrive with volatile query strings, fragments and
//! mixed casing. Cache keys must be stable across those variants, so every
//! cache in the workspace keys on the canonical form produced here.

use crate::error::{FilingsError, Result};

/// Canonicalize a document URL for use as a cache key.
///
/// Strips the query string and fragment and lowercases the remainder, so
/// references that differ only in those parts share one cache entry.
/// Canonicalization is idempotent.
#[must_use]
pub fn canonical_url(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end].to_lowercase()
}

/// Guard that a reference points at an XBRL instance document.
///
/// The metric tools only operate on `.xml` instance URLs; anything else
/// (e.g. the HTML filing link) is rejected before any fetch happens.
pub fn expect_xbrl(url: &str) -> Result<()> {
    if canonical_url(url).ends_with(".xml") {
        Ok(())
    } else {
        Err(FilingsError::MalformedInput(
            "please supply the XBRL instance-document (.xml) URL".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_query_and_fragment() {
        assert_eq!(
            canonical_url("https://www.sec.gov/Archives/apple_10k.xml?token=abc#frag"),
            "https://www.sec.gov/archives/apple_10k.xml"
        );
    }

    #[test]
    fn lowercases() {
        assert_eq!(
            canonical_url("HTTPS://WWW.SEC.GOV/ARCHIVES/AAPL.XML"),
            "https://www.sec.gov/archives/aapl.xml"
        );
    }

    #[test]
    fn idempotent() {
        let once = canonical_url("https://Example.com/a.XML?x=1#y");
        let twice = canonical_url(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn variants_share_one_key() {
        let a = canonical_url("https://sec.gov/a.xml?token=1");
        let b = canonical_url("https://SEC.gov/a.XML#section");
        let c = canonical_url("https://sec.gov/a.xml");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn expect_xbrl_accepts_xml() {
        assert!(expect_xbrl("https://sec.gov/aapl_10k.XML?x=1").is_ok());
    }

    #[test]
    fn expect_xbrl_rejects_html() {
        let err = expect_xbrl("https://sec.gov/aapl_10k.htm").unwrap_err();
        assert!(matches!(err, FilingsError::MalformedInput(_)));
    }
}
