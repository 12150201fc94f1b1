//! Approximate title resolution over a [`KeyValueStore`].
//!
//! The backing store only knows exact keys, so a miss falls back to a full
//! scan: every key is compared to the query with a case-insensitive
//! Levenshtein distance and the closest key within `max_distance` wins.
//! Cost per miss is O(keys × key length × query length); there is no index.

use thiserror::Error;

use super::distance::levenshtein;
use super::{KeyValueStore, StoreError};

/// Default inclusive bound on the edit distance of a fuzzy match.
pub const DEFAULT_MAX_DISTANCE: usize = 3;

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// The query equals a stored key byte-for-byte.
    Exact { key: String, value: String },
    /// Closest stored key within the distance bound, compared case-insensitively.
    Fuzzy {
        key: String,
        value: String,
        distance: usize,
    },
    /// No key is within the distance bound. Not an error.
    NoMatch,
}

impl MatchResult {
    /// Caller-facing text for this outcome.
    pub fn to_response(&self, query: &str) -> String {
        match self {
            Self::Exact { value, .. } => format!("Found exact match for '{query}': {value}"),
            Self::Fuzzy {
                key,
                value,
                distance,
            } => format!("Found closest match '{key}' (distance: {distance}): {value}"),
            Self::NoMatch => format!("No research paper found matching '{query}'"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("error looking up '{key}': {source}")]
    Lookup { key: String, source: StoreError },

    #[error("error scanning keys: {0}")]
    Enumerate(#[source] StoreError),

    /// The winning key was deleted between the scan and the re-fetch.
    #[error("error retrieving content for key '{key}': key no longer exists")]
    Vanished { key: String },

    #[error("error retrieving content for key '{key}': {source}")]
    Refetch { key: String, source: StoreError },
}

/// Resolve `query` against `store`.
///
/// An exact key hit short-circuits without any distance computation. On a
/// miss, all keys are scanned and a candidate replaces the current best only
/// when its distance is strictly smaller, so among keys tied at the minimum
/// the first one yielded by [`KeyValueStore::keys`] wins. Results under ties
/// are therefore only as deterministic as the store's enumeration order.
///
/// The whole key space is always scanned; the loop does not stop early at
/// distance 1.
pub fn resolve<S>(query: &str, store: &S, max_distance: usize) -> Result<MatchResult, ResolveError>
where
    S: KeyValueStore + ?Sized,
{
    let exact = store.get(query).map_err(|source| ResolveError::Lookup {
        key: query.to_string(),
        source,
    })?;
    if let Some(value) = exact {
        tracing::debug!(query = %query, "exact title match");
        return Ok(MatchResult::Exact {
            key: query.to_string(),
            value,
        });
    }

    let keys = store.keys().map_err(ResolveError::Enumerate)?;
    let needle = query.to_lowercase();

    let mut best: Option<(String, usize)> = None;
    for key in keys {
        let distance = levenshtein(&needle, &key.to_lowercase());
        if distance > max_distance {
            continue;
        }
        if best.as_ref().map_or(true, |(_, d)| distance < *d) {
            best = Some((key, distance));
        }
    }

    let Some((key, distance)) = best else {
        tracing::debug!(query = %query, max_distance, "no title within distance");
        return Ok(MatchResult::NoMatch);
    };

    let value = match store.get(&key) {
        Ok(Some(value)) => value,
        Ok(None) => {
            tracing::warn!(key = %key, "matched title vanished before re-fetch");
            return Err(ResolveError::Vanished { key });
        }
        Err(source) => return Err(ResolveError::Refetch { key, source }),
    };

    tracing::debug!(query = %query, key = %key, distance, "fuzzy title match");
    Ok(MatchResult::Fuzzy {
        key,
        value,
        distance,
    })
}
