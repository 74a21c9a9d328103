//! Parameter sets for neurons and synapses
//!
//! Each set is a plain struct of `f64` fields whose defaults are the reference
//! values of the model. Fields can also be assigned by their configuration key
//! (the names used in experiment files, e.g. `V_th` or `tau_syn_E`); unknown keys
//! are rejected with [`RuntimeError::UnknownParameter`].

use crate::error::{ensure_finite, ensure_non_negative, ensure_positive, Result, RuntimeError};

macro_rules! parameter_set {
    (
        $(#[$meta:meta])*
        pub struct $name:ident as $owner:literal {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $key:literal = $default:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
        pub struct $name {
            $(
                $(#[$fmeta])*
                #[cfg_attr(feature = "serde", serde(rename = $key))]
                pub $field: f64,
            )*
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: $default, )*
                }
            }
        }

        impl $name {
            /// Configuration keys accepted by [`Self::set`]
            pub const KEYS: &'static [&'static str] = &[$($key),*];

            /// Assign one field by configuration key
            pub fn set(&mut self, key: &str, value: f64) -> Result<()> {
                match key {
                    $( $key => self.$field = value, )*
                    _ => return Err(RuntimeError::unknown_parameter($owner, key)),
                }
                Ok(())
            }

            /// Read one field by configuration key
            pub fn get(&self, key: &str) -> Option<f64> {
                match key {
                    $( $key => Some(self.$field), )*
                    _ => None,
                }
            }

            /// Assign several fields; nothing changes if any key is rejected
            pub fn apply(&mut self, pairs: &[(&str, f64)]) -> Result<()> {
                let mut next = self.clone();
                for &(key, value) in pairs {
                    next.set(key, value)?;
                }
                *self = next;
                Ok(())
            }

            /// Defaults overridden by `pairs`
            pub fn from_pairs(pairs: &[(&str, f64)]) -> Result<Self> {
                let mut params = Self::default();
                params.apply(pairs)?;
                Ok(params)
            }
        }
    };
}

parameter_set! {
    /// Biophysical constants of a leaky integrate-and-fire unit with
    /// conductance synapses, exponential spike onset and adaptation.
    pub struct LifParams as "LIF neuron" {
        /// Initial potential (mV)
        v_init: "V_init" = -70.0,
        /// Spike threshold (mV)
        v_th: "V_th" = -40.0,
        /// Reset potential (mV)
        v_reset: "V_reset" = -55.0,
        /// Leak reversal potential (mV)
        e_l: "E_L" = -70.0,
        /// Membrane time constant (ms)
        tau_m: "tau_m" = 20.0,
        /// Leak conductance (nS)
        g_l: "g_L" = 2.0,
        /// Refractory time (ms)
        tref: "tref" = 2.0,
        /// Excitatory conductance scale (nS)
        ge_bar: "gE_bar" = 3.0,
        /// Excitatory reversal potential (mV)
        ve: "VE" = 0.0,
        /// Excitatory synaptic time constant (ms)
        tau_syn_e: "tau_syn_E" = 2.0,
        /// Inhibitory conductance scale (nS)
        gi_bar: "gI_bar" = 3.0,
        /// Inhibitory reversal potential (mV)
        vi: "VI" = -80.0,
        /// Inhibitory synaptic time constant (ms)
        tau_syn_i: "tau_syn_I" = 5.0,
        /// Subthreshold adaptation coupling
        a: "a" = 0.0,
        /// Spike-triggered adaptation increment
        b: "b" = 3.0,
        /// Adaptation time constant (ms)
        tau_w: "tau_w" = 30.0,
        /// Slope factor of the exponential spike onset (mV)
        delta_t: "delatT" = 2.0,
        /// Rheobase potential of the exponential onset (mV)
        v_rh: "v_rh" = -50.0,
        /// Time constant of the running rate estimate (ms)
        tau_rt: "tau_rt" = 1e2,
        /// Time constant of the running mean potential (ms)
        v_tau: "v_tau" = 1e3,
    }
}

impl LifParams {
    /// Reject non-physical constants
    pub fn validate(&self) -> Result<()> {
        ensure_positive("tau_m", self.tau_m)?;
        ensure_positive("g_L", self.g_l)?;
        ensure_non_negative("tref", self.tref)?;
        ensure_positive("tau_syn_E", self.tau_syn_e)?;
        ensure_positive("tau_syn_I", self.tau_syn_i)?;
        ensure_positive("tau_w", self.tau_w)?;
        ensure_positive("delatT", self.delta_t)?;
        ensure_positive("tau_rt", self.tau_rt)?;
        ensure_positive("v_tau", self.v_tau)?;
        Ok(())
    }
}

parameter_set! {
    /// Fixed-weight chemical synapse
    pub struct StaticParams as "static synapse" {
        /// Synaptic weight; sign selects the excitatory or inhibitory pool
        weight: "weight" = 1.0,
        /// Transmission delay (ms)
        delay: "delay" = 5.0,
    }
}

parameter_set! {
    /// Electrical coupling between two neurons
    pub struct GapParams as "gap junction" {
        /// Coupling strength; only its magnitude is used
        weight: "weight" = 1.0,
    }
}

parameter_set! {
    /// Short-term facilitating synapse
    pub struct FacilitatingParams as "facilitating synapse" {
        /// Synaptic weight at resting release probability
        weight: "weight" = 1.0,
        /// Transmission delay (ms)
        delay: "delay" = 5.0,
        /// Resting release probability
        p_init: "p_init" = 0.5,
        /// Facilitation strength
        f_f: "fF" = 0.5,
        /// Facilitation recovery time constant (steps)
        tau_fp: "tau_FP" = 1e3,
    }
}

parameter_set! {
    /// Short-term depressing synapse
    pub struct DepressingParams as "depressing synapse" {
        /// Synaptic weight at resting release probability
        weight: "weight" = 1.0,
        /// Transmission delay (ms)
        delay: "delay" = 5.0,
        /// Resting release probability
        p_init: "p_init" = 0.5,
        /// Depression scale
        f_d: "fD" = 0.2,
        /// Depression recovery time constant (steps)
        tau_dp: "tau_DP" = 1e3,
    }
}

parameter_set! {
    /// Weight-dependent Hebbian synapse bounded to `[0, wmax]`
    pub struct HebbianParams as "Hebbian synapse" {
        /// Initial weight
        weight: "weight" = 1.0,
        /// Transmission delay (ms)
        delay: "delay" = 5.0,
        /// Learning rate
        gamma: "gamma" = 1e-2,
        /// Upper weight bound
        wmax: "wmax" = 2.0,
        /// Soft-bound exponent
        beta: "beta" = 1.0,
        /// Initial presynaptic trace
        trace_x: "trace_x" = 0.0,
        /// Presynaptic trace time constant (ms)
        tau_x: "tau_x" = 1e2,
        /// Presynaptic activity threshold
        trace_th: "trace_th" = 1.0,
        /// Initial postsynaptic trace
        trace_y: "trace_y" = 0.0,
        /// Postsynaptic trace time constant (ms)
        tau_y: "tau_y" = 3e2,
    }
}

parameter_set! {
    /// Competitive Hebbian synapse
    pub struct CompetitiveParams as "competitive Hebbian synapse" {
        /// Initial weight
        weight: "weight" = 1.0,
        /// Transmission delay (ms)
        delay: "delay" = 5.0,
        /// Learning rate
        lam: "lam" = 1e-1,
        /// Initial presynaptic trace
        trace_x: "trace_x" = 0.0,
        /// Presynaptic trace time constant (ms)
        tau_x: "tau_x" = 1e2,
        /// Initial postsynaptic trace
        trace_y: "trace_y" = 0.0,
        /// Postsynaptic trace time constant (ms)
        tau_y: "tau_y" = 1e2,
    }
}

parameter_set! {
    /// Trace-based spike-timing-dependent synapse
    pub struct StdpParams as "STDP synapse" {
        /// Initial weight
        weight: "weight" = 1.0,
        /// Transmission delay (ms)
        delay: "delay" = 5.0,
        /// Initial presynaptic trace
        trace_x: "trace_x" = 0.0,
        /// Presynaptic trace time constant (ms)
        tau_x: "tau_x" = 1e1,
        /// Initial postsynaptic trace
        trace_y: "trace_y" = 0.0,
        /// Postsynaptic trace time constant (ms)
        tau_y: "tau_y" = 1e1,
        /// Learning rate
        lam: "lam" = 2e1,
        /// Depression to potentiation ratio
        alph: "alph" = 0.5,
    }
}

impl StaticParams {
    /// Reject non-physical values
    pub fn validate(&self) -> Result<()> {
        ensure_finite("delay", self.delay)?;
        ensure_non_negative("delay", self.delay)
    }
}

impl GapParams {
    /// Reject non-physical values
    pub fn validate(&self) -> Result<()> {
        ensure_finite("weight", self.weight)
    }
}

impl FacilitatingParams {
    /// Reject non-physical values
    pub fn validate(&self) -> Result<()> {
        ensure_finite("delay", self.delay)?;
        ensure_non_negative("delay", self.delay)?;
        ensure_positive("p_init", self.p_init)?;
        ensure_positive("tau_FP", self.tau_fp)
    }
}

impl DepressingParams {
    /// Reject non-physical values
    pub fn validate(&self) -> Result<()> {
        ensure_finite("delay", self.delay)?;
        ensure_non_negative("delay", self.delay)?;
        ensure_positive("p_init", self.p_init)?;
        ensure_positive("tau_DP", self.tau_dp)
    }
}

impl HebbianParams {
    /// Reject non-physical values
    pub fn validate(&self) -> Result<()> {
        ensure_finite("delay", self.delay)?;
        ensure_non_negative("delay", self.delay)?;
        ensure_positive("wmax", self.wmax)?;
        ensure_positive("tau_x", self.tau_x)?;
        ensure_positive("tau_y", self.tau_y)
    }
}

impl CompetitiveParams {
    /// Reject non-physical values
    pub fn validate(&self) -> Result<()> {
        ensure_finite("delay", self.delay)?;
        ensure_non_negative("delay", self.delay)?;
        ensure_positive("tau_x", self.tau_x)?;
        ensure_positive("tau_y", self.tau_y)
    }
}

impl StdpParams {
    /// Reject non-physical values
    pub fn validate(&self) -> Result<()> {
        ensure_finite("delay", self.delay)?;
        ensure_non_negative("delay", self.delay)?;
        ensure_positive("tau_x", self.tau_x)?;
        ensure_positive("tau_y", self.tau_y)
    }
}
