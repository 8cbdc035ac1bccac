//! Probabilistic sampling for high-volume log paths.
//!
//! ```text
//! should_log(custom_rate)
//!     → effective rate = custom_rate or configured default
//!     → one uniform draw in [0, 1)
//!     → draw < rate
//! ```
//!
//! Draws are independent; no counters are kept between calls. Rates are not
//! clamped, so anything at or below 0 never samples and anything at or
//! above 1 always does.

use rand::Rng;

/// Sampling gate with a default rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sampler {
    default_rate: f64,
}

impl Sampler {
    pub fn new(default_rate: f64) -> Self {
        Self { default_rate }
    }

    pub fn default_rate(&self) -> f64 {
        self.default_rate
    }

    /// Decide whether to log, using the thread-local RNG.
    pub fn should_log(&self, custom_rate: Option<f64>) -> bool {
        self.should_log_with(&mut rand::thread_rng(), custom_rate)
    }

    /// Decide whether to log, drawing from `rng`.
    pub fn should_log_with<R: Rng>(&self, rng: &mut R, custom_rate: Option<f64>) -> bool {
        let rate = custom_rate.unwrap_or(self.default_rate);
        rng.gen::<f64>() < rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TRIALS: usize = 10_000;

    fn count_true(sampler: &Sampler, rate: Option<f64>) -> usize {
        let mut rng = StdRng::seed_from_u64(7);
        (0..TRIALS)
            .filter(|_| sampler.should_log_with(&mut rng, rate))
            .count()
    }

    #[test]
    fn test_rate_zero_never_samples() {
        assert_eq!(count_true(&Sampler::new(0.5), Some(0.0)), 0);
        assert_eq!(count_true(&Sampler::new(0.0), None), 0);
    }

    #[test]
    fn test_rate_one_always_samples() {
        assert_eq!(count_true(&Sampler::new(0.0), Some(1.0)), TRIALS);
    }

    #[test]
    fn test_out_of_range_rates() {
        assert_eq!(count_true(&Sampler::new(0.5), Some(-0.3)), 0);
        assert_eq!(count_true(&Sampler::new(0.5), Some(4.0)), TRIALS);
    }

    #[test]
    fn test_half_rate_proportion() {
        let hits = count_true(&Sampler::new(0.5), None);
        let ratio = hits as f64 / TRIALS as f64;
        assert!((0.40..=0.60).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn test_custom_rate_overrides_default() {
        let sampler = Sampler::new(1.0);
        assert_eq!(count_true(&sampler, Some(0.0)), 0);
        assert!(sampler.should_log(None));
    }
}
