//! Backoff strategies for calculating retry delays

use std::time::Duration;

/// Backoff strategy for calculating retry delays
///
/// `retry_number` is 1-based: the first retry waits `calculate_delay(1)`.
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// Fixed delay between retries
    Fixed(Duration),
    /// Linear backoff: `step * retry_number`
    Linear { step: Duration },
    /// Exponential backoff: `initial_delay * 2^(retry_number - 1)`, capped at
    /// `max_delay`
    Exponential { initial_delay: Duration, max_delay: Duration },
}

impl BackoffStrategy {
    /// Capped exponential backoff with base 2.
    pub fn capped_exponential(initial_delay: Duration, max_delay: Duration) -> Self {
        Self::Exponential { initial_delay, max_delay }
    }

    /// Calculate the delay before the given retry.
    pub fn calculate_delay(&self, retry_number: u32) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
            Self::Linear { step } => step.saturating_mul(retry_number.max(1)),
            Self::Exponential { initial_delay, max_delay } => {
                // 2^31 already saturates any realistic cap.
                let shift = retry_number.saturating_sub(1).min(31);
                let multiplier = 1u32 << shift;
                initial_delay.saturating_mul(multiplier).min(*max_delay)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_doubles_until_cap() {
        let backoff = BackoffStrategy::capped_exponential(
            Duration::from_millis(2_000),
            Duration::from_millis(10_000),
        );
        let delays: Vec<u128> = (1..=5).map(|n| backoff.calculate_delay(n).as_millis()).collect();
        assert_eq!(delays, vec![2_000, 4_000, 8_000, 10_000, 10_000]);
    }

    #[test]
    fn exponential_saturates_on_huge_retry_numbers() {
        let backoff = BackoffStrategy::capped_exponential(
            Duration::from_secs(1),
            Duration::from_secs(30),
        );
        assert_eq!(backoff.calculate_delay(u32::MAX), Duration::from_secs(30));
    }

    #[test]
    fn fixed_and_linear() {
        assert_eq!(
            BackoffStrategy::Fixed(Duration::from_millis(200)).calculate_delay(7),
            Duration::from_millis(200)
        );
        let linear = BackoffStrategy::Linear { step: Duration::from_millis(1_000) };
        assert_eq!(linear.calculate_delay(1), Duration::from_millis(1_000));
        assert_eq!(linear.calculate_delay(3), Duration::from_millis(3_000));
    }
}
