use log::warn;
use std::env;
use std::str::FromStr;

use crate::accounts::DEFAULT_CREDIT_LIMIT;
use crate::blockchain::{DEFAULT_DIFFICULTY, DEFAULT_MINING_REWARD, MAX_DIFFICULTY, SYSTEM_ADDRESS};
use crate::transaction::Cents;

/// Runtime settings, read from the environment (after `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub difficulty: u32,
    pub mining_reward: Cents,
    pub reward_address: String,
    pub initial_credit_limit: Cents,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            difficulty: DEFAULT_DIFFICULTY,
            mining_reward: DEFAULT_MINING_REWARD,
            reward_address: SYSTEM_ADDRESS.to_string(),
            initial_credit_limit: DEFAULT_CREDIT_LIMIT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Unset or unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let mut difficulty = parsed(&lookup, "LEDGER_DIFFICULTY").unwrap_or(defaults.difficulty);
        if difficulty > MAX_DIFFICULTY {
            warn!("LEDGER_DIFFICULTY={difficulty} exceeds the ceiling, using {MAX_DIFFICULTY}");
            difficulty = MAX_DIFFICULTY;
        }

        Self {
            host: lookup("HOST")
                .filter(|h| !h.trim().is_empty())
                .unwrap_or(defaults.host),
            port: parsed(&lookup, "PORT").unwrap_or(defaults.port),
            difficulty,
            mining_reward: parsed(&lookup, "MINING_REWARD").unwrap_or(defaults.mining_reward),
            reward_address: lookup("REWARD_ADDRESS")
                .filter(|a| !a.trim().is_empty())
                .unwrap_or(defaults.reward_address),
            initial_credit_limit: parsed(&lookup, "INITIAL_CREDIT_LIMIT")
                .unwrap_or(defaults.initial_credit_limit),
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        assert_eq!(settings(&[]), Settings::default());
    }

    #[test]
    fn reads_overrides() {
        let s = settings(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "3001"),
            ("LEDGER_DIFFICULTY", "3"),
            ("MINING_REWARD", "250"),
            ("REWARD_ADDRESS", "miner-1"),
            ("INITIAL_CREDIT_LIMIT", "100000"),
        ]);
        assert_eq!(s.host, "0.0.0.0");
        assert_eq!(s.port, 3001);
        assert_eq!(s.difficulty, 3);
        assert_eq!(s.mining_reward, 250);
        assert_eq!(s.reward_address, "miner-1");
        assert_eq!(s.initial_credit_limit, 100_000);
    }

    #[test]
    fn bad_values_fall_back_and_difficulty_is_clamped() {
        let s = settings(&[("PORT", "http"), ("LEDGER_DIFFICULTY", "12"), ("HOST", " ")]);
        assert_eq!(s.port, 8080);
        assert_eq!(s.difficulty, MAX_DIFFICULTY);
        assert_eq!(s.host, "127.0.0.1");
    }
}
