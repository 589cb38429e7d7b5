use wasm_bindgen::prelude::*;

use crate::input_modeling::{Distribution, RandomVariable};
use crate::output_analysis::{Estimator as CoreEstimator, PlanningParameters};
use crate::utils::set_panic_hook;

/// The web `RandomVariable` provides JS/WASM-compatible interfaces to a
/// configured distribution.  Configurations use the JSON or YAML forms of
/// `input_modeling::RandomVariable`.  Errors are unwrapped, instead of
/// returned, in the web methods.
#[wasm_bindgen]
pub struct WebRandomVariable {
    config: RandomVariable,
    distribution: Box<dyn Distribution>,
}

#[wasm_bindgen]
impl WebRandomVariable {
    pub fn post_json(config: &str) -> Self {
        set_panic_hook();
        Self::build(RandomVariable::from_json(config).unwrap())
    }

    pub fn post_yaml(config: &str) -> Self {
        set_panic_hook();
        Self::build(RandomVariable::from_yaml(config).unwrap())
    }

    /// Get a JSON representation of the distribution configuration.
    pub fn get_json(&self) -> String {
        serde_json::to_string_pretty(&self.config).unwrap()
    }

    pub fn describe(&self) -> String {
        self.distribution.describe()
    }

    pub fn sample(&mut self) -> f64 {
        self.distribution.sample()
    }

    pub fn sample_n(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.distribution.sample()).collect()
    }

    /// A JSON histogram of `samples` draws over `bins` equal-width bins.
    pub fn sketch_json(&mut self, samples: usize, bins: usize) -> String {
        serde_json::to_string(&self.distribution.sketch(samples, bins).unwrap()).unwrap()
    }
}

impl WebRandomVariable {
    fn build(config: RandomVariable) -> Self {
        let distribution = config.build().unwrap();
        Self {
            config,
            distribution,
        }
    }
}

/// The web `Estimator` provides JS/WASM-compatible interfaces to the core
/// `Estimator`, over double precision observations.
#[wasm_bindgen]
pub struct WebEstimator {
    estimator: CoreEstimator<f64>,
}

#[wasm_bindgen]
impl WebEstimator {
    #[wasm_bindgen(constructor)]
    pub fn new(capacity: usize) -> Self {
        set_panic_hook();
        Self {
            estimator: CoreEstimator::new(capacity),
        }
    }

    pub fn add_observation(&mut self, value: f64) {
        self.estimator.add_observation(value).unwrap()
    }

    pub fn len(&self) -> usize {
        self.estimator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimator.is_empty()
    }

    pub fn mean(&self) -> f64 {
        self.estimator.mean().unwrap()
    }

    pub fn variance(&self) -> f64 {
        self.estimator.variance().unwrap()
    }

    pub fn standard_deviation(&self) -> f64 {
        self.estimator.standard_deviation().unwrap()
    }

    /// A JSON representation of the confidence interval at significance
    /// level `delta`.
    pub fn confidence_interval_json(&self, delta: f64) -> String {
        serde_json::to_string(&self.estimator.confidence_interval(delta).unwrap()).unwrap()
    }

    /// `precision` is the tag `"abs"` or `"rel"`.
    pub fn required_sample_size(&self, delta: f64, epsilon: f64, precision: &str) -> f64 {
        let parameters = PlanningParameters::tagged(delta, epsilon, precision).unwrap();
        self.estimator.required_sample_size(&parameters).unwrap()
    }
}
