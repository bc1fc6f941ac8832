//! Dense Q-table for tabular temporal difference learning

use crate::grid::{ACTIONS, Action, GridEnvironment};

/// Dense value table mapping `(state, action)` pairs to expected-return
/// estimates
///
/// Values are stored row-major by state and then by action, so the slot for
/// `(state, action)` is `state * 4 + action`. This flat layout is also the
/// persisted wire format, so it must not change independently of
/// [`crate::persistence`].
///
/// A table carries its own copy of the grid dimensions. It is only valid for
/// use with an environment whose dimensions match; see [`QTable::matches`].
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl QTable {
    /// Create a zero-initialized table for a `width` x `height` grid
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; (width * height) as usize * ACTIONS],
        }
    }

    /// Reassemble a table from its raw parts (used by persistence)
    pub(crate) fn from_raw(width: u32, height: u32, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), (width * height) as usize * ACTIONS);
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True iff this table was built for the environment's dimensions
    pub fn matches(&self, env: &GridEnvironment) -> bool {
        self.width == env.width() && self.height == env.height()
    }

    /// Raw value slice in wire order (used by persistence)
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    fn slot(&self, state: usize, action: usize) -> usize {
        debug_assert!(state < (self.width * self.height) as usize);
        debug_assert!(action < ACTIONS);
        state * ACTIONS + action
    }

    /// Q-value for a state-action pair
    pub fn value(&self, state: usize, action: Action) -> f32 {
        self.values[self.slot(state, action.index())]
    }

    /// Overwrite the Q-value for a state-action pair
    pub fn set(&mut self, state: usize, action: Action, value: f32) {
        let slot = self.slot(state, action.index());
        self.values[slot] = value;
    }

    /// Action with the maximal Q-value for a state
    ///
    /// Ties break toward the lowest action index: the scan is ascending and
    /// only a strictly greater value displaces the current best. A freshly
    /// initialized table therefore always returns [`Action::Up`].
    pub fn greedy_action(&self, state: usize) -> Action {
        let mut best = self.values[self.slot(state, 0)];
        let mut best_action = 0;
        for action in 1..ACTIONS {
            let value = self.values[self.slot(state, action)];
            if value > best {
                best = value;
                best_action = action;
            }
        }
        Action::ALL[best_action]
    }

    /// Q-value of the greedy action for a state
    pub fn max_value(&self, state: usize) -> f32 {
        let base = self.slot(state, 0);
        self.values[base..base + ACTIONS]
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;

    #[test]
    fn fresh_table_is_zeroed() {
        let table = QTable::new(5, 5);
        assert_eq!(table.values().len(), 100);
        assert!(table.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn set_then_get() {
        let mut table = QTable::new(3, 3);
        table.set(4, Action::Left, 1.5);
        assert_eq!(table.value(4, Action::Left), 1.5);
        assert_eq!(table.value(4, Action::Up), 0.0);
    }

    #[test]
    fn greedy_action_picks_maximum() {
        let mut table = QTable::new(3, 3);
        table.set(2, Action::Up, 0.5);
        table.set(2, Action::Right, 1.5);
        table.set(2, Action::Down, 0.8);
        assert_eq!(table.greedy_action(2), Action::Right);
        assert_eq!(table.max_value(2), 1.5);
    }

    #[test]
    fn ties_break_toward_lowest_action_index() {
        let table = QTable::new(3, 3);
        // All four values equal: action 0 wins.
        assert_eq!(table.greedy_action(0), Action::Up);

        let mut table = QTable::new(3, 3);
        table.set(1, Action::Right, 2.0);
        table.set(1, Action::Left, 2.0);
        assert_eq!(table.greedy_action(1), Action::Right);
    }

    #[test]
    fn max_value_handles_negative_values() {
        let mut table = QTable::new(2, 2);
        for action in Action::ALL {
            table.set(0, action, -3.0);
        }
        table.set(0, Action::Down, -1.0);
        assert_eq!(table.max_value(0), -1.0);
        assert_eq!(table.greedy_action(0), Action::Down);
    }

    #[test]
    fn dimension_match() {
        let env = GridEnvironment::new(GridConfig::default()).unwrap();
        assert!(QTable::new(5, 5).matches(&env));
        assert!(!QTable::new(5, 4).matches(&env));
        assert!(!QTable::new(4, 5).matches(&env));
    }
}
