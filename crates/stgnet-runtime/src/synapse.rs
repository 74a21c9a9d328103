//! Synapse models and their update laws
//!
//! A synapse is built from a [`SynapseSpec`] and owned by the neuron it
//! projects onto. Each step the neuron calls [`Synapse::update`] with a
//! [`SynapticInput`]; the returned value is the weight transmitted for that
//! step. Plastic laws update their traces before their weight.

use crate::{
    device::DeviceId,
    error::{Result, RuntimeError},
    params::{
        CompetitiveParams, DepressingParams, FacilitatingParams, GapParams, HebbianParams,
        StaticParams, StdpParams,
    },
};
use std::fmt;

/// Inbound bucket a synapse lives in; selects buffering and aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SynapseClass {
    /// Delayed, spike- or current-driven
    Chemical,
    /// Instantaneous potential coupling
    Gap,
    /// Delayed and spike-driven, reads both sides' activity
    Plastic,
}

impl fmt::Display for SynapseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SynapseClass::Chemical => "chemical",
            SynapseClass::Gap => "gap",
            SynapseClass::Plastic => "plastic",
        };
        f.write_str(name)
    }
}

/// Handle to a synapse created by a connect call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SynapseHandle {
    /// Neuron owning the synapse
    pub target: DeviceId,
    /// Bucket inside the neuron's inbound table
    pub class: SynapseClass,
    /// Position inside the bucket
    pub slot: usize,
}

/// Per-step values a synapse may read
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SynapticInput {
    /// Presynaptic spike after the transmission delay
    pub spike: f64,
    /// Presynaptic spike as currently published, undelayed
    pub pre_spike: f64,
    /// Postsynaptic spike from the previous step
    pub post_spike: f64,
    /// Step size (ms)
    pub dt: f64,
}

/// Construction spec for a connection, tagged by synapse type.
///
/// A spec whose weight is exactly zero means "no connection".
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "ctype"))]
pub enum SynapseSpec {
    /// Fixed-weight chemical synapse
    Static(StaticParams),
    /// Gap junction
    Gap(GapParams),
    /// Facilitating synapse
    #[cfg_attr(feature = "serde", serde(rename = "Faci"))]
    Facilitating(FacilitatingParams),
    /// Depressing synapse
    #[cfg_attr(feature = "serde", serde(rename = "Depr"))]
    Depressing(DepressingParams),
    /// Hebbian synapse
    #[cfg_attr(feature = "serde", serde(rename = "Hebb"))]
    Hebbian(HebbianParams),
    /// Competitive Hebbian synapse
    #[cfg_attr(feature = "serde", serde(rename = "Comp"))]
    Competitive(CompetitiveParams),
    /// Spike-timing-dependent synapse
    #[cfg_attr(feature = "serde", serde(rename = "STDP"))]
    Stdp(StdpParams),
}

impl SynapseSpec {
    /// Build a spec from a type tag and key/value overrides of its defaults
    pub fn from_pairs(ctype: &str, pairs: &[(&str, f64)]) -> Result<Self> {
        let spec = match ctype {
            "Static" => Self::Static(StaticParams::from_pairs(pairs)?),
            "Gap" => Self::Gap(GapParams::from_pairs(pairs)?),
            "Faci" => Self::Facilitating(FacilitatingParams::from_pairs(pairs)?),
            "Depr" => Self::Depressing(DepressingParams::from_pairs(pairs)?),
            "Hebb" => Self::Hebbian(HebbianParams::from_pairs(pairs)?),
            "Comp" => Self::Competitive(CompetitiveParams::from_pairs(pairs)?),
            "STDP" => Self::Stdp(StdpParams::from_pairs(pairs)?),
            other => {
                return Err(RuntimeError::UnknownSynapseType {
                    ctype: other.to_string(),
                })
            }
        };
        Ok(spec)
    }

    /// Static synapse with the given weight and delay
    pub fn fixed(weight: f64, delay: f64) -> Self {
        Self::Static(StaticParams { weight, delay })
    }

    /// Gap junction with the given weight
    pub fn gap(weight: f64) -> Self {
        Self::Gap(GapParams { weight })
    }

    /// Spec that creates no connection
    pub fn none() -> Self {
        Self::fixed(0.0, 0.0)
    }

    /// Type tag used in configuration files
    pub fn ctype(&self) -> &'static str {
        match self {
            Self::Static(_) => "Static",
            Self::Gap(_) => "Gap",
            Self::Facilitating(_) => "Faci",
            Self::Depressing(_) => "Depr",
            Self::Hebbian(_) => "Hebb",
            Self::Competitive(_) => "Comp",
            Self::Stdp(_) => "STDP",
        }
    }

    /// Initial weight
    pub fn weight(&self) -> f64 {
        match self {
            Self::Static(p) => p.weight,
            Self::Gap(p) => p.weight,
            Self::Facilitating(p) => p.weight,
            Self::Depressing(p) => p.weight,
            Self::Hebbian(p) => p.weight,
            Self::Competitive(p) => p.weight,
            Self::Stdp(p) => p.weight,
        }
    }

    /// Bucket the resulting synapse lives in
    pub fn class(&self) -> SynapseClass {
        match self {
            Self::Static(_) | Self::Facilitating(_) | Self::Depressing(_) => {
                SynapseClass::Chemical
            }
            Self::Gap(_) => SynapseClass::Gap,
            Self::Hebbian(_) | Self::Competitive(_) | Self::Stdp(_) => SynapseClass::Plastic,
        }
    }

    /// Whether this spec asks for a connection at all
    pub fn connects(&self) -> bool {
        self.weight() != 0.0
    }
}

/// Fixed-weight chemical synapse
#[derive(Debug, Clone, PartialEq)]
pub struct StaticSynapse {
    params: StaticParams,
    weights: Vec<f64>,
}

impl StaticSynapse {
    /// Build from parameters
    pub fn new(params: StaticParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            weights: vec![params.weight],
            params,
        })
    }

    /// Return the fixed weight and record it
    pub fn update(&mut self, _spike: f64) -> f64 {
        self.weights.push(self.params.weight);
        self.params.weight
    }
}

/// Electrical coupling; transmits the magnitude of its weight
#[derive(Debug, Clone, PartialEq)]
pub struct GapJunction {
    params: GapParams,
}

impl GapJunction {
    /// Build from parameters
    pub fn new(params: GapParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Sign-free coupling strength
    pub fn update(&mut self) -> f64 {
        self.params.weight.abs()
    }
}

/// Synapse whose release probability jumps up on each spike and decays back
#[derive(Debug, Clone, PartialEq)]
pub struct FacilitatingSynapse {
    params: FacilitatingParams,
    prel: f64,
}

impl FacilitatingSynapse {
    /// Build from parameters; release probability starts at rest
    pub fn new(params: FacilitatingParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            prel: params.p_init,
            params,
        })
    }

    /// Current release probability
    pub fn release_probability(&self) -> f64 {
        self.prel
    }

    /// Advance release probability and return the scaled weight
    pub fn update(&mut self, spike: f64) -> f64 {
        let p = &self.params;
        self.prel += (p.p_init - self.prel) / p.tau_fp + p.f_f * (1.0 - p.p_init) * spike;
        p.weight * self.prel / p.p_init
    }
}

/// Synapse whose release probability drops on each spike and recovers
#[derive(Debug, Clone, PartialEq)]
pub struct DepressingSynapse {
    params: DepressingParams,
    prel: f64,
}

impl DepressingSynapse {
    /// Build from parameters; release probability starts at rest
    pub fn new(params: DepressingParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            prel: params.p_init,
            params,
        })
    }

    /// Current release probability
    pub fn release_probability(&self) -> f64 {
        self.prel
    }

    /// Advance release probability and return the scaled weight
    pub fn update(&mut self, spike: f64) -> f64 {
        let p = &self.params;
        self.prel += (p.p_init - self.prel) / p.tau_dp - p.f_d * p.p_init * spike;
        p.weight * self.prel / p.p_init
    }
}

/// Leaky pre/post activity traces shared by the plastic laws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Traces {
    /// Presynaptic trace
    pub x: f64,
    /// Postsynaptic trace
    pub y: f64,
}

impl Traces {
    fn advance(&mut self, tau_x: f64, tau_y: f64, input: &SynapticInput) {
        self.x += (-self.x / tau_x + input.pre_spike) * input.dt;
        self.y += (-self.y / tau_y + input.post_spike) * input.dt;
    }
}

/// Soft-bounded Hebbian synapse, weight kept in `[0, wmax]`
#[derive(Debug, Clone, PartialEq)]
pub struct HebbianSynapse {
    params: HebbianParams,
    weight: f64,
    traces: Traces,
    weights: Vec<f64>,
}

impl HebbianSynapse {
    /// Build from parameters
    pub fn new(params: HebbianParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            weight: params.weight,
            traces: Traces {
                x: params.trace_x,
                y: params.trace_y,
            },
            weights: vec![params.weight],
            params,
        })
    }

    /// Advance traces, then weight
    pub fn update(&mut self, input: &SynapticInput) -> f64 {
        let p = &self.params;
        self.traces.advance(p.tau_x, p.tau_y, input);
        self.weight += p.gamma
            * (p.wmax - self.weight).powf(p.beta)
            * (self.traces.x - p.trace_th * input.dt)
            * self.traces.y;
        // f64::min/max drop a NaN operand, so the bound holds even then
        self.weight = self.weight.min(p.wmax).max(0.0);
        self.weights.push(self.weight);
        self.weight
    }
}

/// Hebbian synapse pulled toward the presynaptic trace, gated by postsynaptic activity
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitiveSynapse {
    params: CompetitiveParams,
    weight: f64,
    traces: Traces,
    weights: Vec<f64>,
}

impl CompetitiveSynapse {
    /// Build from parameters
    pub fn new(params: CompetitiveParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            weight: params.weight,
            traces: Traces {
                x: params.trace_x,
                y: params.trace_y,
            },
            weights: vec![params.weight],
            params,
        })
    }

    /// Advance traces, then weight
    pub fn update(&mut self, input: &SynapticInput) -> f64 {
        let p = &self.params;
        self.traces.advance(p.tau_x, p.tau_y, input);
        self.weight += p.lam * (self.traces.y * (self.traces.x - self.weight)) * input.dt;
        self.weights.push(self.weight);
        self.weight
    }
}

/// Trace STDP: potentiation on postsynaptic spikes, depression on presynaptic ones
#[derive(Debug, Clone, PartialEq)]
pub struct StdpSynapse {
    params: StdpParams,
    weight: f64,
    traces: Traces,
    weights: Vec<f64>,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl StdpSynapse {
    /// Build from parameters
    pub fn new(params: StdpParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            weight: params.weight,
            traces: Traces {
                x: params.trace_x,
                y: params.trace_y,
            },
            weights: vec![params.weight],
            xs: vec![params.trace_x],
            ys: vec![params.trace_y],
            params,
        })
    }

    /// Presynaptic trace history
    pub fn pre_trace_history(&self) -> &[f64] {
        &self.xs
    }

    /// Postsynaptic trace history
    pub fn post_trace_history(&self) -> &[f64] {
        &self.ys
    }

    /// Advance traces, then weight
    pub fn update(&mut self, input: &SynapticInput) -> f64 {
        let p = &self.params;
        self.traces.advance(p.tau_x, p.tau_y, input);
        self.weight += (-p.lam * p.alph * self.weight * self.traces.y * input.pre_spike
            + p.lam * self.traces.x * input.post_spike)
            * input.dt;
        self.weights.push(self.weight);
        self.xs.push(self.traces.x);
        self.ys.push(self.traces.y);
        self.weight
    }
}

/// Any synapse model
#[derive(Debug, Clone, PartialEq)]
pub enum Synapse {
    /// Fixed-weight chemical synapse
    Static(StaticSynapse),
    /// Gap junction
    Gap(GapJunction),
    /// Facilitating synapse
    Facilitating(FacilitatingSynapse),
    /// Depressing synapse
    Depressing(DepressingSynapse),
    /// Hebbian synapse
    Hebbian(HebbianSynapse),
    /// Competitive Hebbian synapse
    Competitive(CompetitiveSynapse),
    /// STDP synapse
    Stdp(StdpSynapse),
}

impl Synapse {
    /// Instantiate the model a spec describes
    pub fn from_spec(spec: &SynapseSpec) -> Result<Self> {
        let synapse = match spec {
            SynapseSpec::Static(p) => Self::Static(StaticSynapse::new(p.clone())?),
            SynapseSpec::Gap(p) => Self::Gap(GapJunction::new(p.clone())?),
            SynapseSpec::Facilitating(p) => {
                Self::Facilitating(FacilitatingSynapse::new(p.clone())?)
            }
            SynapseSpec::Depressing(p) => Self::Depressing(DepressingSynapse::new(p.clone())?),
            SynapseSpec::Hebbian(p) => Self::Hebbian(HebbianSynapse::new(p.clone())?),
            SynapseSpec::Competitive(p) => Self::Competitive(CompetitiveSynapse::new(p.clone())?),
            SynapseSpec::Stdp(p) => Self::Stdp(StdpSynapse::new(p.clone())?),
        };
        Ok(synapse)
    }

    /// Bucket this synapse lives in
    pub fn class(&self) -> SynapseClass {
        match self {
            Self::Static(_) | Self::Facilitating(_) | Self::Depressing(_) => {
                SynapseClass::Chemical
            }
            Self::Gap(_) => SynapseClass::Gap,
            Self::Hebbian(_) | Self::Competitive(_) | Self::Stdp(_) => SynapseClass::Plastic,
        }
    }

    /// Transmission delay (ms); gap junctions have none
    pub fn delay(&self) -> Option<f64> {
        match self {
            Self::Static(s) => Some(s.params.delay),
            Self::Gap(_) => None,
            Self::Facilitating(s) => Some(s.params.delay),
            Self::Depressing(s) => Some(s.params.delay),
            Self::Hebbian(s) => Some(s.params.delay),
            Self::Competitive(s) => Some(s.params.delay),
            Self::Stdp(s) => Some(s.params.delay),
        }
    }

    /// Current base weight, before any release-probability scaling
    pub fn weight(&self) -> f64 {
        match self {
            Self::Static(s) => s.params.weight,
            Self::Gap(s) => s.params.weight,
            Self::Facilitating(s) => s.params.weight,
            Self::Depressing(s) => s.params.weight,
            Self::Hebbian(s) => s.weight,
            Self::Competitive(s) => s.weight,
            Self::Stdp(s) => s.weight,
        }
    }

    /// Recorded weight after every update, starting with the initial weight.
    /// Empty for models that do not record.
    pub fn weight_history(&self) -> &[f64] {
        match self {
            Self::Static(s) => &s.weights,
            Self::Hebbian(s) => &s.weights,
            Self::Competitive(s) => &s.weights,
            Self::Stdp(s) => &s.weights,
            Self::Gap(_) | Self::Facilitating(_) | Self::Depressing(_) => &[],
        }
    }

    /// Current activity traces of plastic models
    pub fn traces(&self) -> Option<Traces> {
        match self {
            Self::Hebbian(s) => Some(s.traces),
            Self::Competitive(s) => Some(s.traces),
            Self::Stdp(s) => Some(s.traces),
            _ => None,
        }
    }

    /// Apply the update law and return the weight transmitted this step
    pub fn update(&mut self, input: &SynapticInput) -> f64 {
        match self {
            Self::Static(s) => s.update(input.spike),
            Self::Gap(s) => s.update(),
            Self::Facilitating(s) => s.update(input.spike),
            Self::Depressing(s) => s.update(input.spike),
            Self::Hebbian(s) => s.update(input),
            Self::Competitive(s) => s.update(input),
            Self::Stdp(s) => s.update(input),
        }
    }
}
