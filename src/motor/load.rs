//! Synthetic load telemetry.
//!
//! The drive has no current sensing, so the reported load is a pseudo-random
//! value inside a configured band. It never influences motion.

use core::fmt;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{Millis, TelemetryConfig};

/// One load reading with 0.1 % resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadSample {
    tenths: u16,
}

impl LoadSample {
    /// Sample from tenths of a percent.
    #[inline]
    pub const fn from_tenths(tenths: u16) -> Self {
        Self { tenths }
    }

    /// Tenths of a percent.
    #[inline]
    pub const fn tenths(self) -> u16 {
        self.tenths
    }

    /// Load in percent.
    #[inline]
    pub fn percent(self) -> f32 {
        self.tenths as f32 / 10.0
    }
}

/// Renders as `23.4`.
impl fmt::Display for LoadSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.tenths / 10, self.tenths % 10)
    }
}

const MAX_TENTHS: u16 = 1000;

// NaN maps to 0.
fn percent_to_tenths(percent: f32) -> u16 {
    (percent * 10.0).clamp(0.0, MAX_TENTHS as f32) as u16
}

/// Periodic load sample generator.
#[derive(Debug, Clone)]
pub struct LoadSampler {
    rng: SmallRng,
    min_tenths: u16,
    max_tenths: u16,
    interval: Millis,
    last_sample_at: Millis,
    last: Option<LoadSample>,
}

impl LoadSampler {
    /// Sampler for the configured band, seeded for reproducible output.
    ///
    /// The band is clamped into 0-100 % and never empty.
    pub fn new(config: &TelemetryConfig, seed: u64) -> Self {
        let min_tenths = percent_to_tenths(config.load_min_percent).min(MAX_TENTHS - 1);
        let max_tenths = percent_to_tenths(config.load_max_percent).max(min_tenths + 1);
        Self {
            rng: SmallRng::seed_from_u64(seed),
            min_tenths,
            max_tenths,
            interval: config.load_sample_interval,
            last_sample_at: Millis(0),
            last: None,
        }
    }

    /// Draw a new sample if a full interval passed since the previous one.
    pub fn poll(&mut self, now: Millis) -> Option<LoadSample> {
        if now.since(self.last_sample_at) < self.interval {
            return None;
        }
        let sample = LoadSample::from_tenths(self.rng.random_range(self.min_tenths..self.max_tenths));
        self.last_sample_at = now;
        self.last = Some(sample);
        Some(sample)
    }

    /// Most recent sample.
    #[inline]
    pub fn last(&self) -> Option<LoadSample> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_stay_in_band() {
        let mut sampler = LoadSampler::new(&TelemetryConfig::default(), 7);

        for second in 1..=200 {
            let sample = sampler.poll(Millis(second * 1000)).unwrap();
            assert!((100..500).contains(&sample.tenths()), "{}", sample);
        }
    }

    #[test]
    fn test_samples_are_rate_limited() {
        let mut sampler = LoadSampler::new(&TelemetryConfig::default(), 7);

        assert!(sampler.poll(Millis(999)).is_none());
        let first = sampler.poll(Millis(1000));
        assert!(first.is_some());
        assert!(sampler.poll(Millis(1999)).is_none());
        assert_eq!(sampler.last(), first);
        assert!(sampler.poll(Millis(2000)).is_some());
    }

    #[test]
    fn test_out_of_range_band_is_clamped() {
        let config = TelemetryConfig {
            load_min_percent: 7000.0,
            load_max_percent: f32::NAN,
            ..TelemetryConfig::default()
        };
        let mut sampler = LoadSampler::new(&config, 7);

        for second in 1..=50 {
            let sample = sampler.poll(Millis(second * 1000)).unwrap();
            assert!(sample.tenths() <= 1000, "{}", sample);
        }

        let config = TelemetryConfig {
            load_min_percent: -5.0,
            load_max_percent: -1.0,
            ..TelemetryConfig::default()
        };
        let sample = LoadSampler::new(&config, 7).poll(Millis(1000)).unwrap();
        assert_eq!(sample.tenths(), 0);
    }

    #[test]
    fn test_display_one_decimal() {
        assert_eq!(format!("{}", LoadSample::from_tenths(234)), "23.4");
        assert_eq!(format!("{}", LoadSample::from_tenths(100)), "10.0");
        assert!((LoadSample::from_tenths(105).percent() - 10.5).abs() < 1e-6);
    }
}
