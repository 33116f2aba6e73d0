//! Fuzzy matching of a query against entry names.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use drivebox_entity::entry::Entry;

/// An entry that survived a search, annotated with its match.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The matched entry.
    pub entry: Entry,
    /// Relevance score; `None` for the empty-query passthrough.
    pub score: Option<i64>,
    /// Character indices of `entry.name` that matched the query, for
    /// rendering emphasis.
    pub highlight: Vec<usize>,
}

/// Fuzzy searcher over entry names.
///
/// Matching tolerates gaps and transposition-style typos; ranking is by
/// match score, best first, with input order as the tie-break so results
/// are deterministic for identical inputs.
pub struct FuzzySearcher {
    /// Shared matcher state.
    matcher: SkimMatcherV2,
}

impl std::fmt::Debug for FuzzySearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzySearcher").finish()
    }
}

impl Default for FuzzySearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FuzzySearcher {
    /// Creates a new searcher.
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Ranks the items against the query.
    ///
    /// An empty or whitespace-only query returns every item unmodified in
    /// input order with no highlight annotation. Otherwise items that do
    /// not plausibly match are dropped and survivors are ordered best
    /// score first.
    pub fn search(&self, query: &str, items: &[Entry]) -> Vec<SearchHit> {
        let query = query.trim();
        if query.is_empty() {
            return items
                .iter()
                .map(|entry| SearchHit {
                    entry: entry.clone(),
                    score: None,
                    highlight: Vec::new(),
                })
                .collect();
        }

        let mut scored: Vec<(usize, SearchHit)> = items
            .iter()
            .enumerate()
            .filter_map(|(position, entry)| {
                self.matcher
                    .fuzzy_indices(&entry.name, query)
                    .map(|(score, indices)| {
                        (
                            position,
                            SearchHit {
                                entry: entry.clone(),
                                score: Some(score),
                                highlight: indices,
                            },
                        )
                    })
            })
            .collect();

        scored.sort_by(|a, b| b.1.score.cmp(&a.1.score).then_with(|| a.0.cmp(&b.0)));
        scored.into_iter().map(|(_, hit)| hit).collect()
    }
}
