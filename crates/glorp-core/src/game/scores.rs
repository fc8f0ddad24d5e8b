//! High-score table persisted in the key-value store
//!
//! One best score per player, stored as a JSON object under
//! [`keys::HIGH_SCORES`]. The table never holds more than its capacity;
//! when full, a newcomer replaces the lowest entry only by beating it.

use crate::{
    storage::{keys, KeyValueStore},
    Result,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// A ranked table row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighScore {
    pub player: String,
    pub score: u32,
}

/// What happened to a submitted score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmitOutcome {
    /// First score for this player
    Added,
    /// Beat the player's previous best
    Improved { previous: u32 },
    /// Did not beat the player's previous best
    NotImproved { best: u32 },
    /// Table is full and the score does not beat its lowest entry
    Rejected,
}

impl SubmitOutcome {
    /// Whether the stored table changed
    pub fn is_recorded(&self) -> bool {
        matches!(self, SubmitOutcome::Added | SubmitOutcome::Improved { .. })
    }
}

/// Capacity-bounded map of player to best score
#[derive(Debug, Clone, PartialEq)]
pub struct HighScoreTable {
    capacity: usize,
    scores: BTreeMap<String, u32>,
}

impl HighScoreTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            scores: BTreeMap::new(),
        }
    }

    /// Read the table, starting empty when the stored value is missing or
    /// malformed. Oversized tables are trimmed to their best entries.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, capacity: usize) -> Self {
        let mut table = Self::new(capacity);
        let Some(raw) = store.get_or_none(keys::HIGH_SCORES) else {
            return table;
        };

        match serde_json::from_str::<BTreeMap<String, serde_json::Value>>(&raw) {
            Ok(stored) => {
                for (player, value) in stored {
                    if let Some(score) = value.as_u64().and_then(|s| u32::try_from(s).ok()) {
                        table.scores.insert(player, score);
                    }
                }
                table.trim();
            }
            Err(e) => debug!(error = %e, "Ignoring malformed high-score table"),
        }
        table
    }

    /// Write the table back
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        let json = serde_json::to_string(&self.scores)?;
        store.set(keys::HIGH_SCORES, &json)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn best(&self, player: &str) -> Option<u32> {
        self.scores.get(player).copied()
    }

    /// Whether `score` by `player` would change the table
    pub fn qualifies(&self, player: &str, score: u32) -> bool {
        match self.scores.get(player) {
            Some(best) => score > *best,
            None => self.scores.len() < self.capacity || self.lowest().is_some_and(|(_, low)| score > low),
        }
    }

    /// Record a score
    pub fn submit(&mut self, player: &str, score: u32) -> SubmitOutcome {
        if let Some(best) = self.scores.get_mut(player) {
            if score > *best {
                let previous = *best;
                *best = score;
                return SubmitOutcome::Improved { previous };
            }
            return SubmitOutcome::NotImproved { best: *best };
        }

        if self.scores.len() >= self.capacity {
            match self.lowest() {
                Some((low_player, low)) if score > low => {
                    self.scores.remove(&low_player);
                }
                _ => return SubmitOutcome::Rejected,
            }
        }
        self.scores.insert(player.to_string(), score);
        SubmitOutcome::Added
    }

    /// Entries ordered by score, highest first; ties by player name
    pub fn ranked(&self) -> Vec<HighScore> {
        let mut rows: Vec<HighScore> = self
            .scores
            .iter()
            .map(|(player, score)| HighScore {
                player: player.clone(),
                score: *score,
            })
            .collect();
        rows.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.player.cmp(&b.player)));
        rows
    }

    pub fn clear(&mut self) {
        self.scores.clear();
    }

    /// The entry evicted first: lowest score, last by name among ties
    fn lowest(&self) -> Option<(String, u32)> {
        self.ranked().pop().map(|row| (row.player, row.score))
    }

    fn trim(&mut self) {
        if self.scores.len() <= self.capacity {
            return;
        }
        let keep: BTreeMap<String, u32> = self
            .ranked()
            .into_iter()
            .take(self.capacity)
            .map(|row| (row.player, row.score))
            .collect();
        self.scores = keep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_only_improvements_are_recorded() {
        let mut table = HighScoreTable::new(5);
        assert_eq!(table.submit("Player", 4), SubmitOutcome::Added);
        assert_eq!(table.submit("Player", 2), SubmitOutcome::NotImproved { best: 4 });
        assert_eq!(table.submit("Player", 9), SubmitOutcome::Improved { previous: 4 });
        assert_eq!(table.best("Player"), Some(9));
    }

    #[test]
    fn test_capacity_evicts_lowest() {
        let mut table = HighScoreTable::new(3);
        table.submit("a", 10);
        table.submit("b", 20);
        table.submit("c", 5);

        assert_eq!(table.submit("d", 5), SubmitOutcome::Rejected);
        assert_eq!(table.submit("d", 6), SubmitOutcome::Added);
        assert_eq!(table.len(), 3);
        assert_eq!(table.best("c"), None);

        let scores: Vec<u32> = table.ranked().iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![20, 10, 6]);
    }

    #[test]
    fn test_load_trims_and_ignores_garbage() {
        let store = MemoryStore::with_values([(
            keys::HIGH_SCORES,
            r#"{"a": 1, "b": 7, "c": "lots", "d": 3, "e": -2}"#,
        )]);
        let table = HighScoreTable::load(&store, 2);
        assert_eq!(
            table.ranked(),
            vec![
                HighScore { player: "b".into(), score: 7 },
                HighScore { player: "d".into(), score: 3 },
            ]
        );

        let broken = MemoryStore::with_values([(keys::HIGH_SCORES, "not json")]);
        assert!(HighScoreTable::load(&broken, 5).is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let mut store = MemoryStore::new();
        let mut table = HighScoreTable::new(5);
        table.submit("Player", 12);
        table.save(&mut store).unwrap();

        assert_eq!(store.get(keys::HIGH_SCORES).unwrap().as_deref(), Some(r#"{"Player":12}"#));
        assert_eq!(HighScoreTable::load(&store, 5), table);
    }
}
