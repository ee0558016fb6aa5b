//! Score index shared by the sorted types
//!
//! Elements are ordered by `(score, element)`, so ties on score fall back to
//! the element's byte order.

use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct Ranked {
    scores: BTreeMap<String, i64>,
    order: BTreeSet<(i64, String)>,
}

impl Ranked {
    /// Set `element`'s score, adding it if absent
    pub(super) fn set_score(&mut self, element: &str, score: i64) {
        if let Some(old) = self.scores.insert(element.to_string(), score) {
            self.order.remove(&(old, element.to_string()));
        }
        self.order.insert((score, element.to_string()));
    }

    pub(super) fn score(&self, element: &str) -> Option<i64> {
        self.scores.get(element).copied()
    }

    pub(super) fn contains(&self, element: &str) -> bool {
        self.scores.contains_key(element)
    }

    pub(super) fn remove(&mut self, element: &str) -> Option<i64> {
        let score = self.scores.remove(element)?;
        self.order.remove(&(score, element.to_string()));
        Some(score)
    }

    pub(super) fn len(&self) -> usize {
        self.scores.len()
    }

    /// Highest-ranked element
    pub(super) fn max(&self) -> Option<&str> {
        self.order.last().map(|(_, element)| element.as_str())
    }

    /// Lowest-ranked element
    pub(super) fn min(&self) -> Option<&str> {
        self.order.first().map(|(_, element)| element.as_str())
    }

    /// Elements with their scores, in element order
    pub(super) fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.scores.iter().map(|(element, score)| (element.as_str(), *score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescore_moves_element() {
        let mut ranked = Ranked::default();
        ranked.set_score("a", 5);
        ranked.set_score("b", 1);
        assert_eq!(ranked.max(), Some("a"));

        ranked.set_score("b", 10);
        assert_eq!(ranked.max(), Some("b"));
        assert_eq!(ranked.min(), Some("a"));
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_ties_break_on_element() {
        let mut ranked = Ranked::default();
        ranked.set_score("b", 0);
        ranked.set_score("a", 0);
        assert_eq!(ranked.min(), Some("a"));
        assert_eq!(ranked.max(), Some("b"));

        assert_eq!(ranked.remove("a"), Some(0));
        assert_eq!(ranked.min(), Some("b"));
        assert_eq!(ranked.remove("a"), None);
    }
}
