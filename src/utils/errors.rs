use thiserror::Error;

/// `SimulationError` enumerates all possible errors returned by stochastic
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Represents a distribution or source constructed with invalid parameters
    #[error("Invalid parameters for {distribution}: {reason}")]
    InvalidParameter {
        distribution: &'static str,
        reason: String,
    },

    /// Represents a precision kind tag other than absolute or relative
    #[error("No such precision kind available: {0}. Choose 'abs' or 'rel'")]
    UnknownPrecisionKind(String),

    /// Represents a statistic requested before enough observations exist
    #[error("At least {required} observation(s) are required, but only {available} were recorded")]
    InsufficientData { required: usize, available: usize },

    /// Represents a significance level outside the quantile table
    #[error("The delta value (={delta}) for the confidence interval is not supported")]
    UnsupportedPrecision { delta: f64 },

    /// Represents an observation recorded into a full estimator
    #[error("The estimator is full, with all {capacity} observation slots used")]
    CapacityExceeded { capacity: usize },

    /// Represents relative precision planning against a zero mean
    #[error("Relative precision is undefined when the current mean is zero")]
    ZeroMean,

    /// Represents a failed conversion to num-traits Float
    #[error("Failed to convert to a Float value")]
    FloatConvError,

    /// Transparent serde_json errors
    #[error(transparent)]
    JSONError(#[from] serde_json::error::Error),

    /// Transparent serde_yaml errors
    #[error(transparent)]
    YAMLError(#[from] serde_yaml::Error),
}

impl SimulationError {
    pub(crate) fn invalid(distribution: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidParameter {
            distribution,
            reason: reason.into(),
        }
    }
}
