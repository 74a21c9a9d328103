//! External input generators
//!
//! Every generator computes its whole trajectory in `initialize`, so stepping is
//! a table lookup and never touches a random number generator.

use crate::{
    device::{InputDevice, Output, OutputKind},
    error::{ensure_finite, ensure_non_negative, Result, RuntimeError},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Default first active step of a generator
pub const DEFAULT_START_STEP: usize = 0;
/// Default end (exclusive) of a generator's active window
pub const DEFAULT_END_STEP: usize = 10_000;

/// Active window `[start, end)` of a generator, in steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct Window {
    /// First active step
    pub start: usize,
    /// First inactive step after the window
    pub end: usize,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_STEP,
            end: DEFAULT_END_STEP,
        }
    }
}

impl Window {
    /// Create a window
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether `step` lies inside the window
    pub fn contains(&self, step: usize) -> bool {
        step >= self.start && step < self.end
    }

    fn silence<T: Copy>(&self, samples: &mut [T], zero: T) {
        for (step, sample) in samples.iter_mut().enumerate() {
            if !self.contains(step) {
                *sample = zero;
            }
        }
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Poisson spike source
#[derive(Debug, Clone)]
pub struct PoissonGenerator {
    /// Mean rate (Hz)
    pub rate: f64,
    /// Seed; `None` draws from entropy on every run
    pub seed: Option<u64>,
    /// Active window
    pub window: Window,
    train: Vec<bool>,
    spike: bool,
}

impl PoissonGenerator {
    /// Create a generator firing at `rate` Hz
    pub fn new(rate: f64) -> Result<Self> {
        ensure_finite("rate", rate)?;
        ensure_non_negative("rate", rate)?;
        Ok(Self {
            rate,
            seed: None,
            window: Window::default(),
            train: Vec::new(),
            spike: false,
        })
    }

    /// Fix the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Restrict output to `[start, end)`
    pub fn with_window(mut self, start: usize, end: usize) -> Self {
        self.window = Window::new(start, end);
        self
    }

    /// Spike train drawn for the current run
    pub fn train(&self) -> &[bool] {
        &self.train
    }
}

impl InputDevice for PoissonGenerator {
    fn kind(&self) -> OutputKind {
        OutputKind::Spikes
    }

    fn initialize(&mut self, steps: usize, dt: f64) -> Result<()> {
        let p = self.rate * dt / 1e3;
        if p > 1.0 {
            log::warn!(
                "Poisson rate {}Hz saturates at dt={}ms (p={:.3} per step)",
                self.rate,
                dt,
                p
            );
        }

        let mut rng = rng_from(self.seed);
        self.train = (0..steps).map(|_| rng.gen::<f64>() < p).collect();
        self.window.silence(&mut self.train, false);
        self.spike = self.train.first().copied().unwrap_or(false);
        Ok(())
    }

    fn advance(&mut self, step: usize) {
        self.spike = self.train.get(step).copied().unwrap_or(false);
    }

    fn output(&self) -> Output {
        Output::Spikes(self.spike)
    }
}

/// Step current: constant amplitude inside the window, zero outside
#[derive(Debug, Clone)]
pub struct CurrentInjector {
    /// Injected current inside the window
    pub amplitude: f64,
    /// Active window
    pub window: Window,
    samples: Vec<f64>,
    current: f64,
}

impl CurrentInjector {
    /// Create an injector
    pub fn new(amplitude: f64) -> Self {
        Self {
            amplitude,
            window: Window::default(),
            samples: Vec::new(),
            current: 0.0,
        }
    }

    /// Restrict output to `[start, end)`
    pub fn with_window(mut self, start: usize, end: usize) -> Self {
        self.window = Window::new(start, end);
        self
    }
}

impl InputDevice for CurrentInjector {
    fn kind(&self) -> OutputKind {
        OutputKind::Current
    }

    fn initialize(&mut self, steps: usize, _dt: f64) -> Result<()> {
        self.samples = vec![self.amplitude; steps];
        self.window.silence(&mut self.samples, 0.0);
        self.current = 0.0;
        Ok(())
    }

    fn advance(&mut self, step: usize) {
        self.current = self.samples.get(step).copied().unwrap_or(0.0);
    }

    fn output(&self) -> Output {
        Output::Current(self.current)
    }
}

/// Gaussian noise current
#[derive(Debug, Clone)]
pub struct GaussianGenerator {
    /// Mean current
    pub mean: f64,
    /// Standard deviation
    pub std: f64,
    /// Seed; `None` draws from entropy on every run
    pub seed: Option<u64>,
    /// Active window
    pub window: Window,
    samples: Vec<f64>,
    current: f64,
}

impl GaussianGenerator {
    /// Create a generator drawing from N(mean, std²)
    pub fn new(mean: f64, std: f64) -> Result<Self> {
        ensure_finite("mean", mean)?;
        ensure_finite("std", std)?;
        ensure_non_negative("std", std)?;
        Ok(Self {
            mean,
            std,
            seed: None,
            window: Window::default(),
            samples: Vec::new(),
            current: 0.0,
        })
    }

    /// Fix the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Restrict output to `[start, end)`
    pub fn with_window(mut self, start: usize, end: usize) -> Self {
        self.window = Window::new(start, end);
        self
    }

    /// Current trajectory drawn for the current run
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

impl InputDevice for GaussianGenerator {
    fn kind(&self) -> OutputKind {
        OutputKind::Current
    }

    fn initialize(&mut self, steps: usize, _dt: f64) -> Result<()> {
        let normal = Normal::new(self.mean, self.std).map_err(|e| {
            RuntimeError::invalid_parameter("std", self.std.to_string(), e.to_string())
        })?;
        let mut rng = rng_from(self.seed);
        self.samples = normal.sample_iter(&mut rng).take(steps).collect();
        self.window.silence(&mut self.samples, 0.0);
        self.current = 0.0;
        Ok(())
    }

    fn advance(&mut self, step: usize) {
        self.current = self.samples.get(step).copied().unwrap_or(0.0);
    }

    fn output(&self) -> Output {
        Output::Current(self.current)
    }
}

/// Deterministic spike pattern; silent past the end of the pattern
#[derive(Debug, Clone, Default)]
pub struct SpikeTrain {
    pattern: Vec<bool>,
    spike: bool,
}

impl SpikeTrain {
    /// Create from a per-step pattern
    pub fn new(pattern: Vec<bool>) -> Self {
        Self {
            pattern,
            spike: false,
        }
    }

    /// Pattern spiking at the given steps only
    pub fn at_steps(steps: &[usize]) -> Self {
        let len = steps.iter().max().map_or(0, |&last| last + 1);
        let mut pattern = vec![false; len];
        for &step in steps {
            pattern[step] = true;
        }
        Self::new(pattern)
    }

    /// The pattern
    pub fn pattern(&self) -> &[bool] {
        &self.pattern
    }
}

impl InputDevice for SpikeTrain {
    fn kind(&self) -> OutputKind {
        OutputKind::Spikes
    }

    fn initialize(&mut self, _steps: usize, _dt: f64) -> Result<()> {
        self.spike = self.pattern.first().copied().unwrap_or(false);
        Ok(())
    }

    fn advance(&mut self, step: usize) {
        self.spike = self.pattern.get(step).copied().unwrap_or(false);
    }

    fn output(&self) -> Output {
        Output::Spikes(self.spike)
    }
}
