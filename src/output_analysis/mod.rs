//! The output analysis module provides online estimation of a population
//! mean from simulation outputs.  Observations are recorded into a
//! fixed-capacity `Estimator`, which reports the sample mean and variance,
//! two-sided confidence intervals, and the number of further observations
//! needed to reach a target precision.

use std::fmt;

use log::debug;
use num_traits::Float;
use serde::{Deserialize, Serialize};

pub mod z_scores;
use crate::utils::errors::SimulationError;
pub use z_scores::{required_sample_size, z_score, PlanningParameters, Precision};

fn sum<T: Float>(points: &[T]) -> T {
    points.iter().fold(T::zero(), |sum, point| sum + *point)
}

/// This function converts a usize to a Float, with an associated
/// `SimulationError` returned for failed conversions
fn usize_to_float<T: Float>(unconv: usize) -> Result<T, SimulationError> {
    T::from(unconv).ok_or(SimulationError::FloatConvError)
}

fn f64_to_float<T: Float>(unconv: f64) -> Result<T, SimulationError> {
    T::from(unconv).ok_or(SimulationError::FloatConvError)
}

fn require_observations(required: usize, available: usize) -> Result<(), SimulationError> {
    if available < required {
        Err(SimulationError::InsufficientData {
            required,
            available,
        })
    } else {
        Ok(())
    }
}

/// The confidence interval on a mean, mean ± half-width, together with the
/// quantities it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceInterval<T: Float> {
    mean: T,
    half_width: T,
    z_gamma: f64,
    std: T,
    count: usize,
}

impl<T: Float> ConfidenceInterval<T> {
    pub fn mean(&self) -> T {
        self.mean
    }

    pub fn half_width(&self) -> T {
        self.half_width
    }

    /// The standard normal quantile used for the half-width.
    pub fn z_gamma(&self) -> f64 {
        self.z_gamma
    }

    pub fn std(&self) -> T {
        self.std
    }

    /// The number of observations behind the interval.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn lower(&self) -> T {
        self.mean - self.half_width
    }

    pub fn upper(&self) -> T {
        self.mean + self.half_width
    }

    pub fn contains(&self, value: T) -> bool {
        self.lower() <= value && value <= self.upper()
    }
}

impl<T: Float + fmt::Display> fmt::Display for ConfidenceInterval<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[CI:{:.4} ± {:.4}]", self.mean, self.half_width)
    }
}

/// The estimator records up to `capacity` observations, in order.  All
/// statistics are computed over the recorded prefix only; unused capacity
/// never contributes.  Recording past capacity is rejected.
#[derive(Debug, Clone, Serialize)]
pub struct Estimator<T> {
    capacity: usize,
    observations: Vec<T>,
}

impl<T: Float> Estimator<T> {
    pub fn new(capacity: usize) -> Self {
        Estimator {
            capacity,
            observations: Vec::with_capacity(capacity),
        }
    }

    pub fn add_observation(&mut self, value: T) -> Result<(), SimulationError> {
        if self.is_full() {
            debug!("rejecting observation: all {} slots used", self.capacity);
            return Err(SimulationError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.observations.push(value);
        Ok(())
    }

    /// The recorded observations, in recording order.
    pub fn observations(&self) -> &[T] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.observations.len() >= self.capacity
    }

    /// Sample mean of the recorded observations.
    pub fn mean(&self) -> Result<T, SimulationError> {
        require_observations(1, self.len())?;
        Ok(sum(&self.observations) / usize_to_float(self.len())?)
    }

    /// Unbiased sample variance, with the n - 1 divisor.
    pub fn variance(&self) -> Result<T, SimulationError> {
        require_observations(2, self.len())?;
        let mean = self.mean()?;
        let squared_deviations = self
            .observations
            .iter()
            .fold(T::zero(), |acc, point| acc + (*point - mean).powi(2));
        Ok(squared_deviations / usize_to_float(self.len() - 1)?)
    }

    pub fn standard_deviation(&self) -> Result<T, SimulationError> {
        Ok(self.variance()?.sqrt())
    }

    /// Calculate the confidence interval of the mean, for a two-sided
    /// significance level `delta` (0.05 for a 95% interval).
    pub fn confidence_interval(&self, delta: f64) -> Result<ConfidenceInterval<T>, SimulationError> {
        let z_gamma = z_score(delta)?;
        let mean = self.mean()?;
        let std = self.standard_deviation()?;
        let count: T = usize_to_float(self.len())?;
        Ok(ConfidenceInterval {
            mean,
            half_width: f64_to_float::<T>(z_gamma)? * std / count.sqrt(),
            z_gamma,
            std,
            count: self.len(),
        })
    }

    /// Recommended total number of observations for the planning target,
    /// from the current sample variance and mean.  See
    /// `z_scores::required_sample_size`.
    pub fn required_sample_size(
        &self,
        parameters: &PlanningParameters,
    ) -> Result<f64, SimulationError> {
        let variance = self.variance()?.to_f64().ok_or(SimulationError::FloatConvError)?;
        let mean = self.mean()?.to_f64().ok_or(SimulationError::FloatConvError)?;
        required_sample_size(parameters, variance, mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epsilon() -> f64 {
        1.0e-12
    }

    fn three_of_four() -> Estimator<f64> {
        let mut estimator = Estimator::new(4);
        estimator.add_observation(124.2).unwrap();
        estimator.add_observation(128.3).unwrap();
        estimator.add_observation(100.9).unwrap();
        estimator
    }

    #[test]
    fn statistics_cover_only_recorded_prefix() {
        let estimator = three_of_four();
        assert_eq!(estimator.len(), 3);
        assert_eq!(estimator.capacity(), 4);
        assert!(!estimator.is_full());
        assert!((estimator.mean().unwrap() - 117.8).abs() < epsilon());
        assert!((estimator.variance().unwrap() - 218.41).abs() < 1.0e-9);
        assert_eq!(
            estimator.standard_deviation().unwrap(),
            estimator.variance().unwrap().sqrt()
        );
    }

    #[test]
    fn confidence_interval_uses_recorded_count() {
        let estimator = three_of_four();
        let interval = estimator.confidence_interval(0.05).unwrap();
        assert_eq!(interval.count(), 3);
        assert_eq!(interval.z_gamma(), 1.960);
        let expected = 1.960 * estimator.standard_deviation().unwrap() / 3f64.sqrt();
        assert_eq!(interval.half_width(), expected);
        assert!(interval.contains(117.8));
        assert!((interval.upper() - interval.lower() - 2.0 * expected).abs() < epsilon());
    }

    #[test]
    fn capacity_is_enforced() {
        let mut estimator = three_of_four();
        estimator.add_observation(111.1).unwrap();
        assert!(estimator.is_full());
        assert!(matches!(
            estimator.add_observation(99.0),
            Err(SimulationError::CapacityExceeded { capacity: 4 })
        ));
        assert_eq!(estimator.observations(), &[124.2, 128.3, 100.9, 111.1]);
    }

    #[test]
    fn insufficient_observations() {
        let mut estimator = Estimator::<f64>::new(10);
        assert!(matches!(
            estimator.mean(),
            Err(SimulationError::InsufficientData {
                required: 1,
                available: 0
            })
        ));
        estimator.add_observation(1.0).unwrap();
        assert_eq!(estimator.mean().unwrap(), 1.0);
        assert!(estimator.variance().is_err());
        assert!(estimator.standard_deviation().is_err());
        assert!(estimator.confidence_interval(0.05).is_err());
    }

    #[test]
    fn required_sample_size_is_reproducible() {
        let estimator = three_of_four();
        let parameters = PlanningParameters::new(0.05, 0.01, Precision::Absolute).unwrap();
        let n = estimator.required_sample_size(&parameters).unwrap();
        assert_eq!(
            n,
            1.960f64.powi(2) * estimator.variance().unwrap() / 0.01f64.powi(2)
        );
    }

    #[test]
    fn display_rounds_to_four_decimals() {
        let interval = three_of_four().confidence_interval(0.05).unwrap();
        assert_eq!(interval.to_string(), "[CI:117.8000 ± 16.7237]");
    }

    #[test]
    fn single_precision_estimator() {
        let mut estimator = Estimator::<f32>::new(3);
        estimator.add_observation(1.0).unwrap();
        estimator.add_observation(2.0).unwrap();
        estimator.add_observation(3.0).unwrap();
        assert_eq!(estimator.mean().unwrap(), 2.0);
        assert_eq!(estimator.variance().unwrap(), 1.0);
        let interval = estimator.confidence_interval(0.1).unwrap();
        assert!((interval.half_width() - 1.645 / 3f32.sqrt()).abs() < 1.0e-6);
    }
}
