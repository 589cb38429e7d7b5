//! Random variables as configuration.  `RandomVariable` names a family and
//! its common parameterization, optionally with the stream it draws from,
//! and builds the matching `Distribution`.  Configurations round-trip
//! through JSON and YAML with camelCase family tags, for example
//! `{"exponential": {"lambda": 3.0}}`.

use serde::{Deserialize, Serialize};

use super::distribution::*;
use super::stream::{shared_log_uniform, shared_uniform};
use crate::utils::errors::SimulationError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RandomVariable {
    Uniform {
        lower: f64,
        upper: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stream: Option<String>,
    },
    LogUniform {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stream: Option<String>,
    },
    Bernoulli {
        p: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stream: Option<String>,
    },
    Poisson {
        lambda: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stream: Option<String>,
    },
    Exponential {
        lambda: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stream: Option<String>,
    },
    KErlang {
        lambda: f64,
        k: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stream: Option<String>,
    },
    /// A normal variate draws from two streams, `<stream>-uniform` and
    /// `<stream>-log-uniform`, when a stream name is configured.
    Normal {
        mean: f64,
        variance: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stream: Option<String>,
    },
    SymmetricTriangular {
        lower: f64,
        upper: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stream: Option<String>,
    },
    Ramp {
        a: f64,
        #[serde(default)]
        offset: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stream: Option<String>,
    },
    Weibull {
        lambda: f64,
        alpha: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stream: Option<String>,
    },
}

fn stream_name<'a>(configured: &'a Option<String>, default: &'a str) -> &'a str {
    configured.as_deref().unwrap_or(default)
}

impl RandomVariable {
    pub fn from_json(config: &str) -> Result<Self, SimulationError> {
        Ok(serde_json::from_str(config)?)
    }

    pub fn from_yaml(config: &str) -> Result<Self, SimulationError> {
        Ok(serde_yaml::from_str(config)?)
    }

    /// Validate the parameters and construct the distribution, with fresh
    /// sources named after the configured (or default) stream.
    pub fn build(&self) -> Result<Box<dyn Distribution>, SimulationError> {
        Ok(match self {
            RandomVariable::Uniform {
                lower,
                upper,
                stream,
            } => Box::new(Uniform::with_stream(
                *lower,
                *upper,
                shared_uniform(stream_name(stream, DEFAULT_UNIFORM_STREAM)),
            )?),
            RandomVariable::LogUniform { stream } => Box::new(LogUniform::with_stream(
                shared_log_uniform(stream_name(stream, DEFAULT_LOG_UNIFORM_STREAM)),
            )),
            RandomVariable::Bernoulli { p, stream } => Box::new(Bernoulli::with_stream(
                *p,
                shared_uniform(stream_name(stream, DEFAULT_BERNOULLI_STREAM)),
            )?),
            RandomVariable::Poisson { lambda, stream } => Box::new(Poisson::with_stream(
                *lambda,
                shared_uniform(stream_name(stream, DEFAULT_POISSON_STREAM)),
            )?),
            RandomVariable::Exponential { lambda, stream } => Box::new(Exponential::with_stream(
                *lambda,
                shared_log_uniform(stream_name(stream, DEFAULT_EXPONENTIAL_STREAM)),
            )?),
            RandomVariable::KErlang { lambda, k, stream } => Box::new(KErlang::with_stream(
                *lambda,
                *k,
                shared_log_uniform(stream_name(stream, DEFAULT_EXPONENTIAL_STREAM)),
            )?),
            RandomVariable::Normal {
                mean,
                variance,
                stream,
            } => {
                let (uniform, log_uniform) = match stream {
                    Some(name) => (
                        shared_uniform(&format!("{}-uniform", name)),
                        shared_log_uniform(&format!("{}-log-uniform", name)),
                    ),
                    None => (
                        shared_uniform(DEFAULT_NORMAL_UNIFORM_STREAM),
                        shared_log_uniform(DEFAULT_NORMAL_LOG_UNIFORM_STREAM),
                    ),
                };
                Box::new(Normal::with_streams(*mean, *variance, uniform, log_uniform)?)
            }
            RandomVariable::SymmetricTriangular {
                lower,
                upper,
                stream,
            } => Box::new(SymmetricTriangular::with_stream(
                *lower,
                *upper,
                shared_uniform(stream_name(stream, DEFAULT_TRIANGULAR_STREAM)),
            )?),
            RandomVariable::Ramp { a, offset, stream } => Box::new(Ramp::with_stream(
                *a,
                *offset,
                shared_uniform(stream_name(stream, DEFAULT_RAMP_STREAM)),
            )?),
            RandomVariable::Weibull {
                lambda,
                alpha,
                stream,
            } => Box::new(Weibull::with_stream(
                *lambda,
                *alpha,
                shared_log_uniform(stream_name(stream, DEFAULT_WEIBULL_STREAM)),
            )?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_family_tags() {
        let variable = RandomVariable::from_json(r#"{"exponential": {"lambda": 3.0}}"#).unwrap();
        assert_eq!(
            variable,
            RandomVariable::Exponential {
                lambda: 3.0,
                stream: None
            }
        );
        let erlang =
            RandomVariable::from_json(r#"{"kErlang": {"lambda": 0.1, "k": 2, "stream": "s1"}}"#)
                .unwrap();
        assert_eq!(erlang.build().unwrap().describe(), "X~2-Erlang(0.1)");
    }

    #[test]
    fn parses_yaml_with_defaults() {
        let ramp = RandomVariable::from_yaml("ramp:\n  a: 3.0\n").unwrap();
        assert_eq!(
            ramp,
            RandomVariable::Ramp {
                a: 3.0,
                offset: 0.0,
                stream: None
            }
        );
        assert_eq!(ramp.build().unwrap().describe(), "X~Ramp(3, offset=0)");
    }

    #[test]
    fn configured_stream_matches_direct_construction() {
        let mut configured = RandomVariable::Uniform {
            lower: 2.0,
            upper: 4.0,
            stream: Some(String::from("configured")),
        }
        .build()
        .unwrap();
        let mut direct = Uniform::with_stream(2.0, 4.0, shared_uniform("configured")).unwrap();
        (0..50).for_each(|_| assert_eq!(configured.sample(), direct.sample()));
    }

    #[test]
    fn build_validates_parameters() {
        let invalid = RandomVariable::Weibull {
            lambda: 1.0,
            alpha: -2.0,
            stream: None,
        };
        assert!(matches!(
            invalid.build(),
            Err(SimulationError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn unknown_family_is_a_parse_error() {
        assert!(matches!(
            RandomVariable::from_json(r#"{"cauchy": {"x0": 0.0}}"#),
            Err(SimulationError::JSONError(_))
        ));
    }

    #[test]
    fn serializes_without_empty_stream() {
        let json = serde_json::to_string(&RandomVariable::Bernoulli {
            p: 0.2,
            stream: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"bernoulli":{"p":0.2}}"#);
    }
}
