//! Simulated network latency for the mock persistence layer

use leadflow_config::LatencySetting;
use rand::Rng;
use std::time::Duration;

/// How long each persistence call pretends to wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Latency {
    /// Per-operation delays of a typical remote service
    #[default]
    Nominal,
    /// The same delay for every call
    Fixed(Duration),
    /// A uniformly random delay in the given millisecond range
    Random { min_ms: u64, max_ms: u64 },
    /// No delay at all
    None,
}

/// Nominal delays per call, in milliseconds
pub mod nominal {
    pub const FETCH_LEADS: u64 = 300;
    pub const GET_LEAD: u64 = 200;
    pub const CREATE_LEAD: u64 = 400;
    pub const UPDATE_LEAD: u64 = 400;
    pub const DELETE_LEAD: u64 = 300;
    pub const ADD_ACTIVITY: u64 = 300;
    pub const IMPORT_LEADS: u64 = 800;
    pub const FETCH_COLUMNS: u64 = 200;
    pub const COLUMN_WRITE: u64 = 300;
    pub const RESET: u64 = 200;
}

impl Latency {
    /// Delay for a call whose nominal latency is `nominal_ms`
    pub fn delay(&self, nominal_ms: u64) -> Duration {
        match *self {
            Self::Nominal => Duration::from_millis(nominal_ms),
            Self::Fixed(duration) => duration,
            Self::Random { min_ms, max_ms } if min_ms < max_ms => {
                Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
            }
            Self::Random { min_ms, .. } => Duration::from_millis(min_ms),
            Self::None => Duration::ZERO,
        }
    }

    /// Suspend the caller for the simulated delay
    pub async fn simulate(&self, nominal_ms: u64) {
        let delay = self.delay(nominal_ms);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl From<&LatencySetting> for Latency {
    fn from(setting: &LatencySetting) -> Self {
        match *setting {
            LatencySetting::Nominal => Self::Nominal,
            LatencySetting::Fixed { ms } => Self::Fixed(Duration::from_millis(ms)),
            LatencySetting::Random { min_ms, max_ms } => Self::Random { min_ms, max_ms },
            LatencySetting::None => Self::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays() {
        assert_eq!(
            Latency::Nominal.delay(nominal::IMPORT_LEADS),
            Duration::from_millis(800)
        );
        assert_eq!(
            Latency::Fixed(Duration::from_millis(5)).delay(nominal::IMPORT_LEADS),
            Duration::from_millis(5)
        );
        assert_eq!(Latency::None.delay(nominal::CREATE_LEAD), Duration::ZERO);
    }

    #[test]
    fn test_random_stays_in_range() {
        let latency = Latency::Random {
            min_ms: 200,
            max_ms: 800,
        };
        for _ in 0..50 {
            let ms = latency.delay(0).as_millis() as u64;
            assert!((200..=800).contains(&ms));
        }
        let pinned = Latency::Random {
            min_ms: 7,
            max_ms: 7,
        };
        assert_eq!(pinned.delay(0), Duration::from_millis(7));
    }

    #[test]
    fn test_from_setting() {
        assert_eq!(Latency::from(&LatencySetting::None), Latency::None);
        assert_eq!(
            Latency::from(&LatencySetting::Fixed { ms: 12 }),
            Latency::Fixed(Duration::from_millis(12))
        );
    }

    #[tokio::test]
    async fn test_simulate_sleeps() {
        let before = std::time::Instant::now();
        Latency::Fixed(Duration::from_millis(10))
            .simulate(nominal::FETCH_COLUMNS)
            .await;
        assert!(before.elapsed() >= Duration::from_millis(10));
    }
}
