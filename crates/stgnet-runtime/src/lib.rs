//! Simulation engine for small spiking circuits
//!
//! This crate advances leaky integrate-and-fire neurons and their input devices
//! in lockstep with a fixed time step. Neurons receive input through static,
//! facilitating, depressing and plastic (Hebbian, competitive, STDP) chemical
//! synapses with transmission delays, and through gap junctions.
//!
//! ```no_run
//! use stgnet_runtime::{LifParams, PoissonGenerator, Simulator, SynapseSpec};
//!
//! # fn main() -> stgnet_runtime::Result<()> {
//! let mut sim = Simulator::new(0.1)?;
//! let drive = sim.add_input(PoissonGenerator::new(50.0)?.with_seed(1));
//! let cell = sim.add_neuron(LifParams::default())?;
//! sim.connect(&[drive], &[cell], &[vec![SynapseSpec::fixed(5.0, 1.0)]])?;
//!
//! let result = sim.run(1000.0)?;
//! println!("{} Hz", result.firing_rate(cell));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod delay;
pub mod device;
pub mod error;
pub mod input;
pub mod neuron;
pub mod params;
pub mod simulation;
pub mod synapse;
pub mod trace;

// Re-export essential types
pub use device::{Device, DeviceId, InputDevice, Output, OutputKind};
pub use error::{Result, RuntimeError};
pub use input::{CurrentInjector, GaussianGenerator, PoissonGenerator, SpikeTrain, Window};
pub use neuron::{LifNeuron, NeuronState, SpikeEvent};
pub use params::{
    CompetitiveParams, DepressingParams, FacilitatingParams, GapParams, HebbianParams, LifParams,
    StaticParams, StdpParams,
};
pub use simulation::{SimulationResult, Simulator};
pub use synapse::{Synapse, SynapseClass, SynapseHandle, SynapseSpec};

/// Runtime crate version for compatibility checking
pub const RUNTIME_VERSION: u32 = 1;

/// Default simulation time step (ms)
pub const DEFAULT_DT_MS: f64 = 0.1;
