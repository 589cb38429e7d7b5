//! Standard normal quantiles for two-sided confidence intervals, and the
//! plug-in sample size calculation built on them.
//!
//! A significance level δ leaves δ/2 in each tail, so the interval uses the
//! quantile z_γ with γ = 1 - δ/2.  Quantiles are tabulated for a fixed set of
//! confidence levels only; there is no continuous inverse normal CDF.

use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;
use crate::utils::round_to_units;

/// Decimal places γ is rounded to before lookup.
const GAMMA_DECIMALS: i32 = 4;

lazy_static! {
    /// γ, in ten-thousandths, to z_γ.
    static ref Z_GAMMA: HashMap<i64, f64> = [
        (6000, 0.253),
        (7000, 0.524),
        (8000, 0.842),
        (9000, 1.282),
        (9333, 1.501),
        (9500, 1.645),
        (9600, 1.751),
        (9667, 1.834),
        (9750, 1.960),
        (9800, 2.054),
        (9833, 2.127),
        (9875, 2.241),
        (9900, 2.326),
        (9917, 2.395),
        (9928, 2.501),
        (9950, 2.576),
    ]
    .iter()
    .cloned()
    .collect();
}

/// The standard normal quantile for a two-sided significance level `delta`,
/// e.g. 0.05 for a 95% interval.
pub fn z_score(delta: f64) -> Result<f64, SimulationError> {
    let gamma = 1.0 - delta / 2.0;
    Z_GAMMA
        .get(&round_to_units(gamma, GAMMA_DECIMALS))
        .copied()
        .ok_or_else(|| {
            debug!("no tabulated quantile for gamma {}", gamma);
            SimulationError::UnsupportedPrecision { delta }
        })
}

/// The tabulated confidence levels γ, in ascending order.
pub fn supported_confidence_levels() -> Vec<f64> {
    let mut levels: Vec<i64> = Z_GAMMA.keys().cloned().collect();
    levels.sort_unstable();
    levels
        .into_iter()
        .map(|units| units as f64 / 10f64.powi(GAMMA_DECIMALS))
        .collect()
}

/// Whether a target half-width is stated in the units of the estimate, or as
/// a fraction of the estimated mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Precision {
    #[serde(alias = "abs")]
    Absolute,
    #[serde(alias = "rel")]
    Relative,
}

impl FromStr for Precision {
    type Err = SimulationError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "abs" | "absolute" => Ok(Precision::Absolute),
            "rel" | "relative" => Ok(Precision::Relative),
            other => Err(SimulationError::UnknownPrecisionKind(other.to_string())),
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Absolute => write!(f, "abs"),
            Precision::Relative => write!(f, "rel"),
        }
    }
}

/// The target of a sample size calculation: estimate the mean to within
/// ±epsilon (absolute) or ±epsilon·mean (relative), with probability
/// 1 - delta.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PlanningConfig")]
pub struct PlanningParameters {
    delta: f64,
    epsilon: f64,
    precision: Precision,
}

#[derive(Deserialize)]
struct PlanningConfig {
    delta: f64,
    epsilon: f64,
    precision: Precision,
}

impl TryFrom<PlanningConfig> for PlanningParameters {
    type Error = SimulationError;

    fn try_from(config: PlanningConfig) -> Result<Self, Self::Error> {
        PlanningParameters::new(config.delta, config.epsilon, config.precision)
    }
}

impl PlanningParameters {
    pub fn new(delta: f64, epsilon: f64, precision: Precision) -> Result<Self, SimulationError> {
        if !(epsilon > 0.0 && epsilon.is_finite()) {
            return Err(SimulationError::invalid(
                "planning parameters",
                format!("epsilon must be positive and finite, got {}", epsilon),
            ));
        }
        z_score(delta)?;
        Ok(PlanningParameters {
            delta,
            epsilon,
            precision,
        })
    }

    /// Construct from a precision tag, `"abs"` or `"rel"`.
    pub fn tagged(delta: f64, epsilon: f64, precision: &str) -> Result<Self, SimulationError> {
        Self::new(delta, epsilon, precision.parse()?)
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }
}

/// The number of observations needed to hit the target precision, using
/// the observed variance (and mean, for relative precision) in place of the
/// unknown population values.  A recommendation, not a guarantee.
///
/// * absolute: z² · variance / ε²
/// * relative: z² · variance / (ε² · mean²)
pub fn required_sample_size(
    parameters: &PlanningParameters,
    variance: f64,
    mean: f64,
) -> Result<f64, SimulationError> {
    let numerator = z_score(parameters.delta)?.powi(2) * variance;
    let denominator = match parameters.precision {
        Precision::Absolute => parameters.epsilon.powi(2),
        Precision::Relative => {
            if mean == 0.0 {
                return Err(SimulationError::ZeroMean);
            }
            parameters.epsilon.powi(2) * mean.powi(2)
        }
    };
    Ok(numerator / denominator)
}
