//! Buffered uniform random streams.  Every stream is identified by a name,
//! and the name alone determines the sequence: two streams with the same
//! name replay the same draws, and streams with different names are
//! statistically independent.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::utils::errors::SimulationError;
use crate::utils::stable_hash;

/// Default number of draws generated per buffer regeneration.
pub const DEFAULT_BUFFER_CAPACITY: usize = 10_000;

/// The underlying pseudorandom generator of a stream.  PCG-64 is seeded from
/// a stable hash of the stream name; `seed_from_u64` expands that seed into
/// both the state and the stream increment, so distinct names select
/// distinct PCG streams.
#[derive(Debug, Clone)]
pub struct NamedRng {
    name: String,
    rng: Pcg64,
}

impl NamedRng {
    pub fn new(name: &str) -> Self {
        NamedRng {
            name: name.to_string(),
            rng: Pcg64::seed_from_u64(stable_hash(name)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A single draw in [0, 1).
    pub fn rand_u01(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Fill the slice with consecutive draws in [0, 1).
    pub fn fill_u01(&mut self, buffer: &mut [f64]) {
        buffer.iter_mut().for_each(|slot| *slot = self.rng.gen::<f64>());
    }
}

/// Buffer bookkeeping shared by the uniform and log-uniform streams.  The
/// buffer is regenerated in full, in one call to the generator, whenever the
/// cursor reaches its capacity.
#[derive(Debug, Clone)]
struct Buffered {
    rng: NamedRng,
    buffer: Vec<f64>,
    cursor: usize,
    transform: fn(f64) -> f64,
}

impl Buffered {
    fn new(
        name: &str,
        capacity: usize,
        transform: fn(f64) -> f64,
    ) -> Result<Self, SimulationError> {
        if capacity == 0 {
            return Err(SimulationError::invalid(
                "stream",
                "buffer capacity must be at least 1",
            ));
        }
        Ok(Buffered::allocate(name, capacity, transform))
    }

    fn allocate(name: &str, capacity: usize, transform: fn(f64) -> f64) -> Self {
        let mut buffered = Buffered {
            rng: NamedRng::new(name),
            buffer: vec![0.0; capacity],
            cursor: 0,
            transform,
        };
        buffered.regenerate();
        buffered
    }

    fn regenerate(&mut self) {
        debug!(
            "regenerating {} draws for stream '{}'",
            self.buffer.len(),
            self.rng.name()
        );
        self.rng.fill_u01(&mut self.buffer);
        let transform = self.transform;
        self.buffer.iter_mut().for_each(|value| *value = transform(*value));
        self.cursor = 0;
    }

    fn next(&mut self) -> f64 {
        if self.cursor == self.buffer.len() {
            self.regenerate();
        }
        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}

fn identity(u: f64) -> f64 {
    u
}

fn natural_log(u: f64) -> f64 {
    u.ln()
}

/// A named, buffered source of uniform draws in [0, 1).
#[derive(Debug, Clone)]
pub struct UniformStream {
    inner: Buffered,
}

impl UniformStream {
    pub fn new(name: &str) -> Self {
        UniformStream {
            inner: Buffered::allocate(name, DEFAULT_BUFFER_CAPACITY, identity),
        }
    }

    pub fn with_capacity(name: &str, capacity: usize) -> Result<Self, SimulationError> {
        Ok(UniformStream {
            inner: Buffered::new(name, capacity, identity)?,
        })
    }

    pub fn name(&self) -> &str {
        self.inner.rng.name()
    }

    pub fn capacity(&self) -> usize {
        self.inner.buffer.len()
    }

    /// Index of the next unread buffer slot.
    pub fn cursor(&self) -> usize {
        self.inner.cursor
    }

    pub fn draw_one(&mut self) -> f64 {
        self.inner.next()
    }

    /// `n` consecutive draws, taken through the buffer so that batched and
    /// single draws form one sequence.
    pub fn draw_batch(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.inner.next()).collect()
    }
}

/// A named, buffered source of `ln(U)` for uniform draws `U` in [0, 1).
/// Consumers that need the logarithm of a uniform draw (exponential,
/// Weibull, normal) read it from here instead of recomputing it per draw.
#[derive(Debug, Clone)]
pub struct LogUniformStream {
    inner: Buffered,
}

impl LogUniformStream {
    pub fn new(name: &str) -> Self {
        LogUniformStream {
            inner: Buffered::allocate(name, DEFAULT_BUFFER_CAPACITY, natural_log),
        }
    }

    pub fn with_capacity(name: &str, capacity: usize) -> Result<Self, SimulationError> {
        Ok(LogUniformStream {
            inner: Buffered::new(name, capacity, natural_log)?,
        })
    }

    pub fn name(&self) -> &str {
        self.inner.rng.name()
    }

    pub fn capacity(&self) -> usize {
        self.inner.buffer.len()
    }

    pub fn cursor(&self) -> usize {
        self.inner.cursor
    }

    pub fn draw_one(&mut self) -> f64 {
        self.inner.next()
    }

    pub fn draw_batch(&mut self, n: usize) -> Vec<f64> {
        (0..n).map(|_| self.inner.next()).collect()
    }
}

pub type SharedUniform = Rc<RefCell<UniformStream>>;
pub type SharedLogUniform = Rc<RefCell<LogUniformStream>>;

pub fn shared_uniform(name: &str) -> SharedUniform {
    Rc::new(RefCell::new(UniformStream::new(name)))
}

pub fn shared_log_uniform(name: &str) -> SharedLogUniform {
    Rc::new(RefCell::new(LogUniformStream::new(name)))
}
