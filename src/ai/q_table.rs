//! Tabular action values with visit counting and least-frequently-used
//! eviction.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Action -> value for one state. Ordered by action so iteration matches
/// board order.
pub type ActionValues = BTreeMap<usize, f64>;

/// Q-table mapping state keys to per-action values, plus visit counts used
/// only to rank states for eviction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    values: HashMap<String, ActionValues>,
    visits: HashMap<String, u64>,
}

impl QTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the values for `key`, creating a zero entry for every legal action
    /// not yet present.
    pub fn entry_or_init(&mut self, key: &str, legal_actions: &[usize]) -> &mut ActionValues {
        let values = self.values.entry(key.to_string()).or_default();
        for &action in legal_actions {
            values.entry(action).or_insert(0.0);
        }
        values
    }

    pub fn get(&self, key: &str) -> Option<&ActionValues> {
        self.values.get(key)
    }

    /// Stored value for a state-action pair, zero when absent
    pub fn value(&self, key: &str, action: usize) -> f64 {
        self.values
            .get(key)
            .and_then(|values| values.get(&action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Maximum stored value for a state, zero for unknown or empty states
    pub fn max_value(&self, key: &str) -> f64 {
        self.values
            .get(key)
            .and_then(|values| values.values().copied().reduce(f64::max))
            .unwrap_or(0.0)
    }

    /// Legal action with the highest stored value; the first one in
    /// `legal_actions` wins ties.
    pub fn greedy_action(&self, key: &str, legal_actions: &[usize]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &action in legal_actions {
            let value = self.value(key, action);
            if best.is_none_or(|(_, best_value)| value > best_value) {
                best = Some((action, value));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Move `Q(key, action)` toward `target` by `learning_rate`, returning the new value.
    ///
    /// Q(s,a) <- Q(s,a) + alpha * (target - Q(s,a))
    pub fn update_toward(&mut self, key: &str, action: usize, target: f64, learning_rate: f64) -> f64 {
        let slot = self
            .values
            .entry(key.to_string())
            .or_default()
            .entry(action)
            .or_insert(0.0);
        *slot += learning_rate * (target - *slot);
        *slot
    }

    /// Overwrite `Q(key, action)`.
    pub fn set_value(&mut self, key: &str, action: usize, value: f64) {
        self.values
            .entry(key.to_string())
            .or_default()
            .insert(action, value);
    }

    pub fn record_visit(&mut self, key: &str) {
        *self.visits.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn visits(&self, key: &str) -> u64 {
        self.visits.get(key).copied().unwrap_or(0)
    }

    /// Number of states stored
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ActionValues)> {
        self.values.iter()
    }

    /// Remove `count` states with the fewest visits, ties broken by key order.
    /// Returns the number removed.
    pub fn evict_least_visited(&mut self, count: usize) -> usize {
        let mut ranked: Vec<(u64, &String)> = self
            .values
            .keys()
            .map(|key| (self.visits.get(key).copied().unwrap_or(0), key))
            .collect();
        ranked.sort_unstable();

        let doomed: Vec<String> = ranked
            .into_iter()
            .take(count)
            .map(|(_, key)| key.clone())
            .collect();
        for key in &doomed {
            self.values.remove(key);
            self.visits.remove(key);
        }
        doomed.len()
    }

    pub fn clear(&mut self) {
        self.values.clear();
        self.visits.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_initializes_legal_actions() {
        let mut table = QTable::new();
        let values = table.entry_or_init(".........:X", &[0, 4, 8]);
        assert_eq!(values.len(), 3);
        assert!(values.values().all(|&v| v == 0.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_entry_keeps_existing_values() {
        let mut table = QTable::new();
        table.entry_or_init("s", &[0, 1]).insert(1, 2.5);
        let values = table.entry_or_init("s", &[0, 1, 2]);
        assert_eq!(values.get(&1), Some(&2.5));
        assert_eq!(values.get(&2), Some(&0.0));
    }

    #[test]
    fn test_max_value() {
        let mut table = QTable::new();
        let values = table.entry_or_init("s", &[0, 1, 2]);
        values.insert(0, -0.5);
        values.insert(1, 1.5);
        values.insert(2, 0.8);
        assert_eq!(table.max_value("s"), 1.5);
        assert_eq!(table.max_value("unknown"), 0.0);
    }

    #[test]
    fn test_greedy_action_first_wins_ties() {
        let mut table = QTable::new();
        let values = table.entry_or_init("s", &[0, 1, 2, 3]);
        values.insert(1, 1.5);
        values.insert(3, 1.5);
        assert_eq!(table.greedy_action("s", &[0, 1, 2, 3]), Some(1));
        assert_eq!(table.greedy_action("s", &[2, 3]), Some(3));
        assert_eq!(table.greedy_action("fresh", &[5, 6]), Some(5));
        assert_eq!(table.greedy_action("s", &[]), None);
    }

    #[test]
    fn test_update_toward() {
        let mut table = QTable::new();
        // Q = 0 + 0.5 * (2.0 - 0) = 1.0
        assert_eq!(table.update_toward("s", 4, 2.0, 0.5), 1.0);
        // Q = 1 + 0.5 * (2.0 - 1) = 1.5
        assert_eq!(table.update_toward("s", 4, 2.0, 0.5), 1.5);
        assert_eq!(table.value("s", 4), 1.5);
    }

    #[test]
    fn test_set_value_overwrites() {
        let mut table = QTable::new();
        table.update_toward("s", 2, 4.0, 0.5);
        table.set_value("s", 2, 80.0);
        assert_eq!(table.value("s", 2), 80.0);
        table.set_value("t", 0, -1.0);
        assert_eq!(table.value("t", 0), -1.0);
    }

    #[test]
    fn test_visits() {
        let mut table = QTable::new();
        table.record_visit("a");
        table.record_visit("a");
        assert_eq!(table.visits("a"), 2);
        assert_eq!(table.visits("b"), 0);
    }

    #[test]
    fn test_evict_least_visited() {
        let mut table = QTable::new();
        for (key, visits) in [("a", 5), ("b", 1), ("c", 3), ("d", 1)] {
            table.entry_or_init(key, &[0]);
            for _ in 0..visits {
                table.record_visit(key);
            }
        }

        assert_eq!(table.evict_least_visited(2), 2);
        assert!(table.get("b").is_none());
        assert!(table.get("d").is_none());
        assert_eq!(table.visits("b"), 0);
        assert!(table.get("a").is_some());
        assert!(table.get("c").is_some());

        assert_eq!(table.evict_least_visited(10), 2);
        assert!(table.is_empty());
    }
}
