//! Request generations for discarding superseded responses

use std::collections::HashMap;

use parking_lot::Mutex;

/// Ticket handed out when a request is issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    key: String,
    value: u64,
}

impl Generation {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

/// Per-key counters; only the newest ticket for a key is current
#[derive(Debug, Default)]
pub struct RequestGenerations {
    latest: Mutex<HashMap<String, u64>>,
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket for `key`, superseding all earlier ones
    pub fn issue(&self, key: &str) -> Generation {
        let mut latest = self.latest.lock();
        let value = latest.entry(key.to_string()).or_insert(0);
        *value += 1;
        Generation {
            key: key.to_string(),
            value: *value,
        }
    }

    /// True while no newer ticket has been issued for the same key
    pub fn is_current(&self, generation: &Generation) -> bool {
        self.latest.lock().get(&generation.key) == Some(&generation.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes() {
        let generations = RequestGenerations::new();
        let first = generations.issue("chain");
        assert!(generations.is_current(&first));

        let second = generations.issue("chain");
        assert!(!generations.is_current(&first));
        assert!(generations.is_current(&second));
        assert_eq!(second.value(), 2);
    }

    #[test]
    fn test_keys_are_independent() {
        let generations = RequestGenerations::new();
        let chain = generations.issue("chain");
        generations.issue("payoff");
        assert!(generations.is_current(&chain));
        assert_eq!(chain.key(), "chain");
    }
}
