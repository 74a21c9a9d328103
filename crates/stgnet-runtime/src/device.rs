//! Device capability shared by neurons and input generators
//!
//! Everything the scheduler steps is a [`Device`]: either a [`LifNeuron`] or an
//! external input source implementing [`InputDevice`]. Devices are identified by
//! a [`DeviceId`] handed out by the simulator and never reused.

use crate::{
    error::Result,
    neuron::{LifNeuron, Sources},
};
use std::fmt;

/// Stable handle of a registered device
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceId(pub u32);

impl DeviceId {
    /// Create a new device ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of signal a device publishes each step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputKind {
    /// Binary spike events
    Spikes,
    /// Real-valued injected current
    Current,
}

/// Value a device publishes for the current step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Output {
    /// Whether the device spiked
    Spikes(bool),
    /// Injected current
    Current(f64),
}

impl Output {
    /// Tag of this output
    pub fn kind(&self) -> OutputKind {
        match self {
            Output::Spikes(_) => OutputKind::Spikes,
            Output::Current(_) => OutputKind::Current,
        }
    }

    /// Numeric value pushed through delay lines: 0/1 for spikes, the current otherwise
    pub fn value(&self) -> f64 {
        match *self {
            Output::Spikes(true) => 1.0,
            Output::Spikes(false) => 0.0,
            Output::Current(i) => i,
        }
    }
}

/// Lifecycle required of any external input source.
///
/// Stochastic sources draw their whole trajectory in [`InputDevice::initialize`],
/// so stepping never consumes randomness.
pub trait InputDevice: fmt::Debug {
    /// Kind of signal this device publishes; fixed for the device's lifetime
    fn kind(&self) -> OutputKind;

    /// Prepare for a run of `steps` samples at resolution `dt` (ms)
    fn initialize(&mut self, steps: usize, dt: f64) -> Result<()>;

    /// Publish the value for step `step`
    fn advance(&mut self, step: usize);

    /// Currently published value
    fn output(&self) -> Output;
}

/// Snapshot of a source device as seen by a neuron during one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Probe {
    /// Published output
    pub output: Output,
    /// Membrane potential at the current step, neurons only
    pub potential: Option<f64>,
}

/// A registrable entity owned by the simulator
#[derive(Debug)]
pub enum Device {
    /// Leaky integrate-and-fire unit
    Neuron(LifNeuron),
    /// External input source
    Input {
        /// Handle assigned by the simulator
        id: DeviceId,
        /// The source itself
        source: Box<dyn InputDevice>,
    },
}

impl Device {
    /// Wrap an input source under a simulator-issued handle
    pub fn input(id: DeviceId, source: impl InputDevice + 'static) -> Self {
        Device::Input {
            id,
            source: Box::new(source),
        }
    }

    /// Handle of this device
    pub fn id(&self) -> DeviceId {
        match self {
            Device::Neuron(n) => n.id(),
            Device::Input { id, .. } => *id,
        }
    }

    /// Kind of signal this device publishes
    pub fn kind(&self) -> OutputKind {
        match self {
            Device::Neuron(_) => OutputKind::Spikes,
            Device::Input { source, .. } => source.kind(),
        }
    }

    /// Currently published value
    pub fn output(&self) -> Output {
        match self {
            Device::Neuron(n) => Output::Spikes(n.spiking()),
            Device::Input { source, .. } => source.output(),
        }
    }

    /// Borrow the neuron, if this device is one
    pub fn as_neuron(&self) -> Option<&LifNeuron> {
        match self {
            Device::Neuron(n) => Some(n),
            Device::Input { .. } => None,
        }
    }

    /// Mutably borrow the neuron, if this device is one
    pub fn as_neuron_mut(&mut self) -> Option<&mut LifNeuron> {
        match self {
            Device::Neuron(n) => Some(n),
            Device::Input { .. } => None,
        }
    }

    /// Allocate per-run state
    pub fn initialize(&mut self, steps: usize, dt: f64) -> Result<()> {
        match self {
            Device::Neuron(n) => n.initialize(steps, dt),
            Device::Input { source, .. } => source.initialize(steps, dt),
        }
    }

    /// Advance one step; neurons integrate from `step` to `step + 1`
    pub(crate) fn step(&mut self, step: usize, sources: &impl Sources) -> Result<()> {
        match self {
            Device::Neuron(n) => n.step(step, sources),
            Device::Input { source, .. } => {
                source.advance(step);
                Ok(())
            }
        }
    }

    pub(crate) fn probe(&self, step: usize) -> Probe {
        match self {
            Device::Neuron(n) => n.probe(step),
            Device::Input { .. } => Probe {
                output: self.output(),
                potential: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id() {
        let id = DeviceId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(id.to_string(), "7");
        assert!(DeviceId::new(1) < DeviceId::new(2));
    }

    #[test]
    fn test_output_values() {
        assert_eq!(Output::Spikes(true).value(), 1.0);
        assert_eq!(Output::Spikes(false).value(), 0.0);
        assert_eq!(Output::Current(-2.5).value(), -2.5);
        assert_eq!(Output::Current(1.0).kind(), OutputKind::Current);
        assert_eq!(Output::Spikes(false).kind(), OutputKind::Spikes);
    }
}
