//! The input modeling module provides reproducible random variates for
//! simulation models.  The module includes buffered, named uniform streams,
//! a set of distribution families transforming those streams into
//! variates, and a serializable configuration layer for describing
//! distributions as data.

pub mod distribution;
pub mod random_variable;
pub mod stream;

pub use distribution::{
    Bernoulli, Distribution, Exponential, Histogram, KErlang, LogUniform, Normal, Poisson, Ramp,
    SymmetricTriangular, Uniform, Weibull,
};
pub use random_variable::RandomVariable;
pub use stream::{
    shared_log_uniform, shared_uniform, LogUniformStream, NamedRng, SharedLogUniform,
    SharedUniform, UniformStream,
};
