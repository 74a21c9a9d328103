//! Error types for the simulation engine

use crate::device::DeviceId;
use thiserror::Error;

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors that can occur while building or running a circuit
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Invalid parameter value
    #[error("Invalid parameter {parameter}: {value} (expected {constraint})")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Configuration key that the target structure does not have
    #[error("Unknown parameter '{key}' for {owner}")]
    UnknownParameter {
        /// Structure receiving the key
        owner: String,
        /// Rejected key
        key: String,
    },

    /// Synapse type tag that names no known synapse model
    #[error("Unknown synapse type '{ctype}' (expected one of Static, Gap, Faci, Depr, Hebb, Comp, STDP)")]
    UnknownSynapseType {
        /// Rejected tag
        ctype: String,
    },

    /// Population and specification shapes disagree
    #[error("Dimension mismatch in {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Which dimension was checked
        what: String,
        /// Expected size
        expected: usize,
        /// Actual size
        actual: usize,
    },

    /// Device handle not present in the registry
    #[error("Device {device} not found")]
    DeviceNotFound {
        /// Missing handle
        device: DeviceId,
    },

    /// Operation requires a neuron but the handle names an input device
    #[error("Device {device} is not a neuron")]
    NotANeuron {
        /// Offending handle
        device: DeviceId,
    },

    /// Source output cannot drive the requested synapse class
    #[error("Device {device} cannot drive a {synapse} synapse")]
    UnsupportedSource {
        /// Source handle
        device: DeviceId,
        /// Synapse class name
        synapse: String,
    },

    /// Invalid circuit configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Reason for invalid configuration
        reason: String,
    },

    /// Simulation step failed
    #[error("Simulation step {step} failed: {reason}")]
    SimulationStep {
        /// Step index that failed
        step: usize,
        /// Reason for failure
        reason: String,
    },
}

impl RuntimeError {
    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }

    /// Create an unknown parameter error
    pub fn unknown_parameter(owner: impl Into<String>, key: impl Into<String>) -> Self {
        Self::UnknownParameter {
            owner: owner.into(),
            key: key.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// Create an unsupported source error
    pub fn unsupported_source(device: DeviceId, synapse: impl Into<String>) -> Self {
        Self::UnsupportedSource {
            device,
            synapse: synapse.into(),
        }
    }

    /// Create a simulation step error
    pub fn simulation_step(step: usize, reason: impl Into<String>) -> Self {
        Self::SimulationStep {
            step,
            reason: reason.into(),
        }
    }
}

/// Reject values that are not strictly positive.
pub(crate) fn ensure_positive(parameter: &str, value: f64) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(RuntimeError::invalid_parameter(parameter, value.to_string(), "> 0.0"))
    }
}

/// Reject negative or NaN values.
pub(crate) fn ensure_non_negative(parameter: &str, value: f64) -> Result<()> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(RuntimeError::invalid_parameter(parameter, value.to_string(), ">= 0.0"))
    }
}

/// Reject infinite or NaN values.
pub(crate) fn ensure_finite(parameter: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RuntimeError::invalid_parameter(parameter, value.to_string(), "a finite value"))
    }
}
