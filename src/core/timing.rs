// src/core/timing.rs

use crate::constants::COMMAND_TIME_BUDGET;
use std::time::{Duration, Instant};

/// RAII timer around one command. Logs the elapsed time when dropped and
/// warns when the command ran past its budget.
#[derive(Debug)]
pub struct CommandTimer {
    label: String,
    start: Instant,
    budget: Duration,
}

impl CommandTimer {
    pub fn new(label: impl Into<String>) -> Self {
        Self::with_budget(label, COMMAND_TIME_BUDGET)
    }

    pub fn with_budget(label: impl Into<String>, budget: Duration) -> Self {
        Self {
            label: label.into(),
            start: Instant::now(),
            budget,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn over_budget(&self) -> bool {
        self.elapsed() > self.budget
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed();
        if elapsed > self.budget {
            log::warn!(
                "'{}' took {} ms (budget {} ms)",
                self.label,
                elapsed.as_millis(),
                self.budget.as_millis()
            );
        } else {
            log::debug!("'{}' took {} µs", self.label, elapsed.as_micros());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_budget_is_exceeded() {
        let timer = CommandTimer::with_budget("list", Duration::ZERO);
        std::thread::sleep(Duration::from_millis(1));
        assert!(timer.over_budget());
    }

    #[test]
    fn test_default_budget_is_not_exceeded_immediately() {
        let timer = CommandTimer::new("list");
        assert!(!timer.over_budget());
    }
}
