//! Search configuration.

use crate::tree::MAX_ARENA_NODES;

/// Configuration parameters for a search session.
///
/// Fields are public so a host can tweak a single value, starting from
/// [`EngineConfig::DEFAULT`] or through the `with_*` builders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// The exploration coefficient `C` of the UCT formula
    /// `score / n + C * sqrt(2 * ln(N) / n)`.
    pub exploration_coef: f64,
    /// Starting bonus of the backup when the first rollout move already wins.
    pub reward: i64,
    /// Maximum number of nodes the arena may hold, root included.
    pub max_nodes: usize,
    /// An optional seed for the random number generator.
    ///
    /// `Some(value)` makes every playout reproducible. With `None` the seed is
    /// taken from the current time.
    pub seed: Option<u64>,
}

impl EngineConfig {
    /// The default configuration.
    ///
    /// - `exploration_coef`: `1/sqrt(2)`
    /// - `reward`: `5`
    /// - `max_nodes`: `5_000_000`
    /// - `seed`: `None`
    pub const DEFAULT: EngineConfig = EngineConfig {
        exploration_coef: std::f64::consts::FRAC_1_SQRT_2,
        reward: 5,
        max_nodes: 5_000_000,
        seed: None,
    };

    /// Builder pattern: set the UCT exploration coefficient.
    pub fn with_exploration_coef(mut self, coef: f64) -> Self {
        self.exploration_coef = coef;
        self
    }

    /// Builder pattern: set the immediate-win reward.
    pub fn with_reward(mut self, reward: i64) -> Self {
        self.reward = reward;
        self
    }

    /// Builder pattern: set the arena capacity, clamped to
    /// `1..=MAX_ARENA_NODES` so the root always fits and node ids never wrap.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes.clamp(1, MAX_ARENA_NODES);
        self
    }

    /// Builder pattern: fix the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
