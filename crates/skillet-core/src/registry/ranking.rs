//! Scoring and auto-selection of indexed search results.
//!
//! The values below are product heuristics. They are kept as named constants
//! and carried in a [`RankingPolicy`] so callers can override them.

use super::SearchHit;

pub const EXACT_MATCH_SCORE: u32 = 100;
pub const PREFIX_MATCH_SCORE: u32 = 60;
pub const SUBSTRING_MATCH_SCORE: u32 = 40;
/// Added when the last path segment of the hit equals the query.
pub const PATH_SEGMENT_BONUS: u32 = 10;
/// Hits scoring below this are discarded.
pub const MIN_SCORE: u32 = 40;
/// Among several exact matches, the most popular wins outright when its
/// popularity exceeds this multiple of the runner-up's.
pub const DOMINANCE_RATIO: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingPolicy {
    pub exact_match: u32,
    pub prefix_match: u32,
    pub substring_match: u32,
    pub path_segment_bonus: u32,
    pub min_score: u32,
    pub dominance_ratio: u64,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            exact_match: EXACT_MATCH_SCORE,
            prefix_match: PREFIX_MATCH_SCORE,
            substring_match: SUBSTRING_MATCH_SCORE,
            path_segment_bonus: PATH_SEGMENT_BONUS,
            min_score: MIN_SCORE,
            dominance_ratio: DOMINANCE_RATIO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedHit {
    pub hit: SearchHit,
    pub score: u32,
}

impl RankingPolicy {
    /// Case-insensitive score of one hit against the query.
    pub fn score(&self, hit: &SearchHit, query: &str) -> u32 {
        let query = query.to_lowercase();
        let name = hit.name.to_lowercase();

        let mut score = if name == query {
            self.exact_match
        } else if name.starts_with(&query) {
            self.prefix_match
        } else if name.contains(&query) {
            self.substring_match
        } else {
            0
        };

        let last_segment = hit
            .identifier()
            .rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or_default();
        if last_segment.eq_ignore_ascii_case(&query) {
            score += self.path_segment_bonus;
        }
        score
    }

    /// Scored hits at or above the cutoff, best first. Ties on score are
    /// broken by popularity, descending.
    pub fn rank(&self, hits: Vec<SearchHit>, query: &str) -> Vec<RankedHit> {
        let mut ranked: Vec<RankedHit> = hits
            .into_iter()
            .map(|hit| RankedHit {
                score: self.score(&hit, query),
                hit,
            })
            .filter(|r| r.score >= self.min_score)
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(b.hit.popularity.cmp(&a.hit.popularity))
        });
        ranked
    }

    /// A hit that can be installed without asking, if any.
    ///
    /// One exact match is taken as is. Among several exact matches the most
    /// popular is taken only when it dominates the runner-up.
    pub fn auto_select<'a>(&self, ranked: &'a [RankedHit]) -> Option<&'a RankedHit> {
        let mut exact: Vec<&RankedHit> = ranked
            .iter()
            .filter(|r| r.score >= self.exact_match)
            .collect();
        match exact.len() {
            0 => None,
            1 => exact.pop(),
            _ => {
                exact.sort_by(|a, b| b.hit.popularity.cmp(&a.hit.popularity));
                let top = exact[0].hit.popularity;
                let second = exact[1].hit.popularity;
                (top > second.saturating_mul(self.dominance_ratio)).then(|| exact[0])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(name: &str, path: &str, popularity: u64) -> SearchHit {
        SearchHit {
            id: format!("acme/skills/{}", path),
            name: name.to_string(),
            owner: "acme".to_string(),
            repo: "skills".to_string(),
            path: Some(path.to_string()),
            description: None,
            popularity,
        }
    }

    #[test]
    fn scores_by_match_kind() {
        let policy = RankingPolicy::default();
        assert_eq!(policy.score(&hit("pdf", "docs/pdf", 0), "pdf"), 110);
        assert_eq!(policy.score(&hit("PDF", "x", 0), "pdf"), 100);
        assert_eq!(policy.score(&hit("pdf-tools", "x", 0), "pdf"), 60);
        assert_eq!(policy.score(&hit("super-pdf", "x", 0), "pdf"), 40);
        assert_eq!(policy.score(&hit("docx", "x", 0), "pdf"), 0);
    }

    #[test]
    fn rank_drops_low_scores_and_orders_by_popularity() {
        let policy = RankingPolicy::default();
        let ranked = policy.rank(
            vec![
                hit("docx", "docx", 999),
                hit("pdf-lite", "a", 1),
                hit("pdf-pro", "b", 50),
                hit("pdf", "c", 3),
            ],
            "pdf",
        );
        let names: Vec<_> = ranked.iter().map(|r| r.hit.name.as_str()).collect();
        assert_eq!(names, vec!["pdf", "pdf-pro", "pdf-lite"]);
    }

    #[test]
    fn single_exact_match_auto_selects() {
        let policy = RankingPolicy::default();
        let ranked = policy.rank(vec![hit("foo", "foo", 1), hit("foobar", "x", 500)], "foo");
        assert_eq!(policy.auto_select(&ranked).unwrap().hit.name, "foo");
    }

    #[test]
    fn dominant_exact_match_auto_selects() {
        let policy = RankingPolicy::default();
        let ranked = policy.rank(vec![hit("foo", "a", 10), hit("foo", "b", 51)], "foo");
        assert_eq!(policy.auto_select(&ranked).unwrap().hit.popularity, 51);
    }

    #[test]
    fn close_exact_matches_need_a_choice() {
        let policy = RankingPolicy::default();
        let ranked = policy.rank(vec![hit("foo", "a", 10), hit("foo", "b", 50)], "foo");
        assert!(policy.auto_select(&ranked).is_none());
    }

    #[test]
    fn only_prefix_matches_need_a_choice() {
        let policy = RankingPolicy::default();
        let ranked = policy.rank(vec![hit("foobar", "x", 10)], "foo");
        assert!(policy.auto_select(&ranked).is_none());
    }

    #[test]
    fn thresholds_are_overridable() {
        let policy = RankingPolicy {
            dominance_ratio: 1,
            ..RankingPolicy::default()
        };
        let ranked = policy.rank(vec![hit("foo", "a", 10), hit("foo", "b", 11)], "foo");
        assert_eq!(policy.auto_select(&ranked).unwrap().hit.popularity, 11);
    }
}
