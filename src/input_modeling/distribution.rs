//! Variate transforms for the supported distribution families.  Each family
//! turns draws from one or more named streams into a variate with a fixed,
//! closed-form transform, so a stream name fully determines the variates a
//! distribution produces.  Parameters are validated once, at construction.

use std::f64::consts::PI;
use std::fmt;

use log::trace;
use serde::Serialize;

use super::stream::{shared_log_uniform, shared_uniform, SharedLogUniform, SharedUniform};
use crate::utils::errors::SimulationError;

/// A source of random variates, with a human-readable description of the
/// distribution it samples from.
pub trait Distribution: fmt::Debug {
    /// Draw one variate.
    fn sample(&mut self) -> f64;

    fn describe(&self) -> String;

    /// Draw `samples` variates and bin them into `bins` equal-width classes,
    /// for visual inspection against `describe()`.
    fn sketch(&mut self, samples: usize, bins: usize) -> Result<Histogram, SimulationError> {
        Histogram::from_samples(
            self.describe(),
            (0..samples).map(|_| self.sample()).collect(),
            bins,
        )
    }
}

/// Equal-width histogram of drawn variates.  Diagnostic only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    label: String,
    lower: f64,
    upper: f64,
    counts: Vec<usize>,
}

impl Histogram {
    fn from_samples(label: String, samples: Vec<f64>, bins: usize) -> Result<Self, SimulationError> {
        if bins == 0 {
            return Err(SimulationError::invalid("histogram", "at least one bin is required"));
        }
        if samples.is_empty() {
            return Err(SimulationError::InsufficientData {
                required: 1,
                available: 0,
            });
        }
        let lower = samples.iter().cloned().fold(f64::INFINITY, f64::min);
        let upper = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let width = (upper - lower) / bins as f64;
        let mut counts = vec![0; bins];
        samples.iter().for_each(|sample| {
            let index = if width > 0.0 {
                (((sample - lower) / width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[index] += 1;
        });
        Ok(Histogram {
            label,
            lower,
            upper,
            counts,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Lower edge of every bin.
    pub fn edges(&self) -> Vec<f64> {
        let width = (self.upper - self.lower) / self.counts.len() as f64;
        (0..self.counts.len())
            .map(|index| self.lower + width * index as f64)
            .collect()
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const BAR_WIDTH: usize = 60;
        writeln!(f, "f(x) for {}", self.label)?;
        let peak = self.counts.iter().cloned().max().unwrap_or(0).max(1);
        for (edge, count) in self.edges().iter().zip(self.counts.iter()) {
            let bar = "#".repeat(count * BAR_WIDTH / peak);
            writeln!(f, "{:>12.4} | {}", edge, bar)?;
        }
        Ok(())
    }
}

pub const DEFAULT_UNIFORM_STREAM: &str = "uniform";
pub const DEFAULT_LOG_UNIFORM_STREAM: &str = "log-uniform";
pub const DEFAULT_BERNOULLI_STREAM: &str = "bernoulli";
pub const DEFAULT_POISSON_STREAM: &str = "poisson";
pub const DEFAULT_EXPONENTIAL_STREAM: &str = "exponential";
pub const DEFAULT_NORMAL_UNIFORM_STREAM: &str = "normal-uniform";
pub const DEFAULT_NORMAL_LOG_UNIFORM_STREAM: &str = "normal-log-uniform";
pub const DEFAULT_TRIANGULAR_STREAM: &str = "symmetric-triangular";
pub const DEFAULT_RAMP_STREAM: &str = "ramp";
pub const DEFAULT_WEIBULL_STREAM: &str = "weibull";

fn require_positive(distribution: &'static str, parameter: &str, value: f64) -> Result<(), SimulationError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            distribution,
            format!("{} must be positive and finite, got {}", parameter, value),
        ))
    }
}

fn require_ordered(distribution: &'static str, lower: f64, upper: f64) -> Result<(), SimulationError> {
    if lower < upper && lower.is_finite() && upper.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            distribution,
            format!("lower bound {} must be below upper bound {}", lower, upper),
        ))
    }
}

/// X ~ U(a, b), with X = a + U * (b - a).
#[derive(Debug, Clone)]
pub struct Uniform {
    lower: f64,
    upper: f64,
    range: f64,
    stream: SharedUniform,
}

impl Uniform {
    pub fn new(lower: f64, upper: f64) -> Result<Self, SimulationError> {
        Self::with_stream(lower, upper, shared_uniform(DEFAULT_UNIFORM_STREAM))
    }

    pub fn with_stream(lower: f64, upper: f64, stream: SharedUniform) -> Result<Self, SimulationError> {
        require_ordered("uniform", lower, upper)?;
        Ok(Uniform {
            lower,
            upper,
            range: upper - lower,
            stream,
        })
    }

    /// A raw U(0,1) draw from the underlying stream.
    pub fn unit(&mut self) -> f64 {
        self.stream.borrow_mut().draw_one()
    }
}

impl Distribution for Uniform {
    fn sample(&mut self) -> f64 {
        let u = self.stream.borrow_mut().draw_one();
        self.lower + u * self.range
    }

    fn describe(&self) -> String {
        format!("X~U({},{})", self.lower, self.upper)
    }
}

/// X = ln(U).
#[derive(Debug, Clone)]
pub struct LogUniform {
    stream: SharedLogUniform,
}

impl LogUniform {
    pub fn new() -> Self {
        Self::with_stream(shared_log_uniform(DEFAULT_LOG_UNIFORM_STREAM))
    }

    pub fn with_stream(stream: SharedLogUniform) -> Self {
        LogUniform { stream }
    }
}

impl Default for LogUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl Distribution for LogUniform {
    fn sample(&mut self) -> f64 {
        self.stream.borrow_mut().draw_one()
    }

    fn describe(&self) -> String {
        String::from("X~LogU(0,1)")
    }
}

/// X ∈ {0, 1}, with P(X = 1) = p.
#[derive(Debug, Clone)]
pub struct Bernoulli {
    p: f64,
    stream: SharedUniform,
}

impl Bernoulli {
    pub fn new(p: f64) -> Result<Self, SimulationError> {
        Self::with_stream(p, shared_uniform(DEFAULT_BERNOULLI_STREAM))
    }

    pub fn with_stream(p: f64, stream: SharedUniform) -> Result<Self, SimulationError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(SimulationError::invalid(
                "bernoulli",
                format!("p must lie in [0, 1], got {}", p),
            ));
        }
        Ok(Bernoulli { p, stream })
    }
}

impl Distribution for Bernoulli {
    fn sample(&mut self) -> f64 {
        if self.stream.borrow_mut().draw_one() < self.p {
            1.0
        } else {
            0.0
        }
    }

    fn describe(&self) -> String {
        format!("X~Bernoulli({})", self.p)
    }
}

/// Poisson variates by the product method: multiply uniform draws until the
/// running product falls to or below e^(-λ).
#[derive(Debug, Clone)]
pub struct Poisson {
    lambda: f64,
    threshold: f64,
    stream: SharedUniform,
}

impl Poisson {
    pub fn new(lambda: f64) -> Result<Self, SimulationError> {
        Self::with_stream(lambda, shared_uniform(DEFAULT_POISSON_STREAM))
    }

    pub fn with_stream(lambda: f64, stream: SharedUniform) -> Result<Self, SimulationError> {
        require_positive("poisson", "lambda", lambda)?;
        let threshold = (-lambda).exp();
        if threshold <= 0.0 {
            return Err(SimulationError::invalid(
                "poisson",
                format!("lambda {} is too large for the product method", lambda),
            ));
        }
        Ok(Poisson {
            lambda,
            threshold,
            stream,
        })
    }
}

impl Distribution for Poisson {
    fn sample(&mut self) -> f64 {
        let mut stream = self.stream.borrow_mut();
        let mut product = stream.draw_one();
        let mut multiplications = 0u64;
        while product > self.threshold {
            product *= stream.draw_one();
            multiplications += 1;
        }
        multiplications as f64
    }

    fn describe(&self) -> String {
        format!("X~Poisson({})", self.lambda)
    }
}

/// X ~ Exp(λ), with X = -(1/λ) * ln(U).
#[derive(Debug, Clone)]
pub struct Exponential {
    lambda: f64,
    lambda_inv: f64,
    stream: SharedLogUniform,
}

impl Exponential {
    pub fn new(lambda: f64) -> Result<Self, SimulationError> {
        Self::with_stream(lambda, shared_log_uniform(DEFAULT_EXPONENTIAL_STREAM))
    }

    pub fn with_stream(lambda: f64, stream: SharedLogUniform) -> Result<Self, SimulationError> {
        require_positive("exponential", "lambda", lambda)?;
        Ok(Exponential {
            lambda,
            lambda_inv: 1.0 / lambda,
            stream,
        })
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }
}

impl Distribution for Exponential {
    fn sample(&mut self) -> f64 {
        -self.lambda_inv * self.stream.borrow_mut().draw_one()
    }

    fn describe(&self) -> String {
        format!("X~Exp({})", self.lambda)
    }
}

/// Sum of `k` independent Exp(λ) variates, all drawn from one owned
/// exponential.
#[derive(Debug, Clone)]
pub struct KErlang {
    k: u32,
    exponential: Exponential,
}

impl KErlang {
    pub fn new(lambda: f64, k: u32) -> Result<Self, SimulationError> {
        Self::with_exponential(Exponential::new(lambda)?, k)
    }

    pub fn with_stream(lambda: f64, k: u32, stream: SharedLogUniform) -> Result<Self, SimulationError> {
        Self::with_exponential(Exponential::with_stream(lambda, stream)?, k)
    }

    pub fn with_exponential(exponential: Exponential, k: u32) -> Result<Self, SimulationError> {
        if k < 1 {
            return Err(SimulationError::invalid("k-erlang", "k must be at least 1"));
        }
        Ok(KErlang { k, exponential })
    }
}

impl Distribution for KErlang {
    fn sample(&mut self) -> f64 {
        let mut sum = self.exponential.sample();
        for _ in 1..self.k {
            sum += self.exponential.sample();
        }
        sum
    }

    fn describe(&self) -> String {
        format!("X~{}-Erlang({})", self.k, self.exponential.lambda())
    }
}

/// X ~ N(μ, σ²), generated in pairs.  Each generation consumes one
/// log-uniform and one uniform draw and yields two independent variates;
/// the second is held in `pending` and returned by the following call.
#[derive(Debug, Clone)]
pub struct Normal {
    mean: f64,
    variance: f64,
    std_dev: f64,
    uniform: SharedUniform,
    log_uniform: SharedLogUniform,
    pending: Option<f64>,
}

impl Normal {
    pub fn new(mean: f64, variance: f64) -> Result<Self, SimulationError> {
        Self::with_streams(
            mean,
            variance,
            shared_uniform(DEFAULT_NORMAL_UNIFORM_STREAM),
            shared_log_uniform(DEFAULT_NORMAL_LOG_UNIFORM_STREAM),
        )
    }

    /// The two streams must be independent: sharing one stream name between
    /// them correlates the radius and angle of every pair.
    pub fn with_streams(
        mean: f64,
        variance: f64,
        uniform: SharedUniform,
        log_uniform: SharedLogUniform,
    ) -> Result<Self, SimulationError> {
        if !(variance >= 0.0 && variance.is_finite()) || !mean.is_finite() {
            return Err(SimulationError::invalid(
                "normal",
                format!(
                    "mean must be finite and variance finite and non-negative, got N({}, {})",
                    mean, variance
                ),
            ));
        }
        Ok(Normal {
            mean,
            variance,
            std_dev: variance.sqrt(),
            uniform,
            log_uniform,
            pending: None,
        })
    }

    /// The cached second variate of the last generated pair, if not yet
    /// returned.
    pub fn pending(&self) -> Option<f64> {
        self.pending
    }

    fn generate_pair(&mut self) -> (f64, f64) {
        let l = self.log_uniform.borrow_mut().draw_one();
        let u = self.uniform.borrow_mut().draw_one();
        let radius = (-2.0 * l).sqrt();
        let angle = 2.0 * PI * u;
        let first = radius * angle.cos() * self.std_dev + self.mean;
        let second = radius * angle.sin() * self.std_dev + self.mean;
        trace!("generated normal pair ({}, {})", first, second);
        (first, second)
    }
}

impl Distribution for Normal {
    fn sample(&mut self) -> f64 {
        match self.pending.take() {
            Some(cached) => cached,
            None => {
                let (cosine, sine) = self.generate_pair();
                self.pending = Some(cosine);
                sine
            }
        }
    }

    fn describe(&self) -> String {
        format!("X~N({},{})", self.mean, self.variance)
    }
}

// f(x):          o
//              o | o
//            o   .   o
//          o     |     o
//        o       .       o
// ___o___________.___________o___
//    |<----r---->|           |
//    lower                   upper
/// Symmetric triangular on [a, b], with X = a + r * (U1 + U2) and
/// r = (b - a) / 2.
#[derive(Debug, Clone)]
pub struct SymmetricTriangular {
    lower: f64,
    upper: f64,
    r: f64,
    stream: SharedUniform,
}

impl SymmetricTriangular {
    pub fn new(lower: f64, upper: f64) -> Result<Self, SimulationError> {
        Self::with_stream(lower, upper, shared_uniform(DEFAULT_TRIANGULAR_STREAM))
    }

    pub fn with_stream(lower: f64, upper: f64, stream: SharedUniform) -> Result<Self, SimulationError> {
        require_ordered("symmetric triangular", lower, upper)?;
        Ok(SymmetricTriangular {
            lower,
            upper,
            r: (upper - lower) / 2.0,
            stream,
        })
    }
}

impl Distribution for SymmetricTriangular {
    fn sample(&mut self) -> f64 {
        let mut stream = self.stream.borrow_mut();
        let u1 = stream.draw_one();
        let u2 = stream.draw_one();
        self.lower + self.r * (u1 + u2)
    }

    fn describe(&self) -> String {
        format!("X~SymTriangle([{},{}])", self.lower, self.upper)
    }
}

// f(x):                      o
//                        o   |
//                o           |
//        o                   |
// ___o_______________________|___
//    |<----------a---------->|
//    offset
/// Linearly increasing density on [offset, offset + a], with
/// X = offset + a * sqrt(U).
#[derive(Debug, Clone)]
pub struct Ramp {
    a: f64,
    offset: f64,
    stream: SharedUniform,
}

impl Ramp {
    pub fn new(a: f64, offset: f64) -> Result<Self, SimulationError> {
        Self::with_stream(a, offset, shared_uniform(DEFAULT_RAMP_STREAM))
    }

    pub fn with_stream(a: f64, offset: f64, stream: SharedUniform) -> Result<Self, SimulationError> {
        require_positive("ramp", "a", a)?;
        Ok(Ramp { a, offset, stream })
    }
}

impl Distribution for Ramp {
    fn sample(&mut self) -> f64 {
        self.offset + self.a * self.stream.borrow_mut().draw_one().sqrt()
    }

    fn describe(&self) -> String {
        format!("X~Ramp({}, offset={})", self.a, self.offset)
    }
}

/// Weibull with rate λ and shape α, with X = (-ln(U))^(1/α) / λ.
#[derive(Debug, Clone)]
pub struct Weibull {
    lambda: f64,
    alpha: f64,
    alpha_inv: f64,
    stream: SharedLogUniform,
}

impl Weibull {
    pub fn new(lambda: f64, alpha: f64) -> Result<Self, SimulationError> {
        Self::with_stream(lambda, alpha, shared_log_uniform(DEFAULT_WEIBULL_STREAM))
    }

    pub fn with_stream(lambda: f64, alpha: f64, stream: SharedLogUniform) -> Result<Self, SimulationError> {
        require_positive("weibull", "lambda", lambda)?;
        require_positive("weibull", "alpha", alpha)?;
        Ok(Weibull {
            lambda,
            alpha,
            alpha_inv: 1.0 / alpha,
            stream,
        })
    }
}

impl Distribution for Weibull {
    fn sample(&mut self) -> f64 {
        let l = self.stream.borrow_mut().draw_one();
        (-l).powf(self.alpha_inv) / self.lambda
    }

    fn describe(&self) -> String {
        format!("X~Weibull({},{})", self.lambda, self.alpha)
    }
}
