use crate::engine::error::ConfigError;

/// Fixed-bin histogram over `[min, max)`.
///
/// Entries outside the range are dropped, but still contribute to the running mean and
/// variance of everything that was offered. Non-finite values are ignored entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    min: f64,
    max: f64,
    bin_width: f64,
    counts: Vec<u64>,
    offered: u64,
    mean: f64,
    mean_sq: f64,
}

impl Histogram {
    pub fn new(min: f64, max: f64, bins: usize) -> Result<Self, ConfigError> {
        if bins == 0 || !(max > min) || !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::InvalidHistogram { min, max, bins });
        }
        Ok(Self {
            min,
            max,
            bin_width: (max - min) / bins as f64,
            counts: vec![0; bins],
            offered: 0,
            mean: 0.0,
            mean_sq: 0.0,
        })
    }

    pub fn add(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        self.offered += 1;
        let n = self.offered as f64;
        self.mean += (value - self.mean) / n;
        self.mean_sq += (value * value - self.mean_sq) / n;

        if value < self.min || value >= self.max {
            return;
        }
        let bin = ((value - self.min) / self.bin_width) as usize;
        // rounding can land exactly on the upper edge
        if let Some(count) = self.counts.get_mut(bin) {
            *count += 1;
        }
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn center(&self, bin: usize) -> f64 {
        self.min + (bin as f64 + 0.5) * self.bin_width
    }

    pub fn centers(&self) -> Vec<f64> {
        (0..self.bins()).map(|bin| self.center(bin)).collect()
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Entries that landed in a bin.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Every value passed to [`Histogram::add`], in range or not.
    pub fn offered(&self) -> u64 {
        self.offered
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        (self.mean_sq - self.mean * self.mean).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn new_rejects_empty_ranges_and_zero_bins() {
        assert!(Histogram::new(0.0, 1.0, 0).is_err());
        assert!(Histogram::new(1.0, 1.0, 4).is_err());
        assert!(Histogram::new(0.0, f64::INFINITY, 4).is_err());
    }

    #[test]
    fn entries_land_in_their_bins() {
        let mut hist = Histogram::new(0.0, 2.0, 4).unwrap();
        for value in [0.1, 0.4, 0.6, 1.99] {
            hist.add(value);
        }
        assert_eq!(hist.counts(), &[2, 1, 0, 1]);
        assert_eq!(hist.total(), 4);
    }

    #[test]
    fn out_of_range_entries_are_ignored() {
        let mut hist = Histogram::new(0.0, 1.0, 2).unwrap();
        hist.add(-0.1);
        hist.add(1.0);
        hist.add(f64::NAN);
        hist.add(0.25);
        assert_eq!(hist.total(), 1);
        assert_eq!(hist.offered(), 3);
    }

    #[test]
    fn centers_sit_in_the_middle_of_each_bin() {
        let hist = Histogram::new(1.0, 2.0, 4).unwrap();
        assert!(approx_eq(hist.bin_width(), 0.25));
        let centers = hist.centers();
        assert!(approx_eq(centers[0], 1.125));
        assert!(approx_eq(centers[3], 1.875));
    }

    #[test]
    fn moments_track_offered_values() {
        let mut hist = Histogram::new(0.0, 10.0, 10).unwrap();
        for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
            hist.add(value);
        }
        assert!(approx_eq(hist.mean(), 5.0));
        assert!((hist.variance() - 4.0).abs() < 1e-10);
    }
}
