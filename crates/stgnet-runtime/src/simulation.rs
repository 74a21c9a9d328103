//! Simulation engine: device registry, wiring and the run loop

use crate::{
    device::{Device, DeviceId, InputDevice, Probe},
    error::{ensure_finite, ensure_positive, Result, RuntimeError},
    neuron::{check_source, LifNeuron, SourceInfo, SpikeEvent},
    params::LifParams,
    synapse::{Synapse, SynapseHandle, SynapseSpec},
    DEFAULT_DT_MS,
};
use std::{cmp::Ordering, collections::HashMap};

/// Result of one run
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Spikes of all neurons, ordered by time then registration order
    pub spikes: Vec<SpikeEvent>,
    /// Requested duration (ms)
    pub duration_ms: f64,
    /// Step size (ms)
    pub dt: f64,
    /// Number of samples per trace
    pub steps: usize,
    /// Total spike count
    pub total_spikes: usize,
}

impl SimulationResult {
    /// Get spikes for a specific neuron
    pub fn spikes_for_neuron(&self, neuron: DeviceId) -> Vec<&SpikeEvent> {
        self.spikes.iter().filter(|s| s.sender == neuron).collect()
    }

    /// Get firing rate for a neuron (Hz)
    pub fn firing_rate(&self, neuron: DeviceId) -> f64 {
        let duration_s = self.duration_ms / 1e3;
        self.spikes_for_neuron(neuron).len() as f64 / duration_s
    }

    /// Export spikes to simple format (time_ms, sender)
    pub fn export_spikes(&self) -> Vec<(f64, u32)> {
        self.spikes
            .iter()
            .map(|s| (s.time_ms, s.sender.raw()))
            .collect()
    }
}

/// Owns every device and advances them in lockstep
#[derive(Debug)]
pub struct Simulator {
    dt: f64,
    next_id: u32,
    devices: Vec<Device>,
    index: HashMap<DeviceId, usize>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT_MS,
            next_id: 0,
            devices: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl Simulator {
    /// Create an empty simulator with time step `dt` (ms)
    pub fn new(dt: f64) -> Result<Self> {
        ensure_finite("dt", dt)?;
        ensure_positive("dt", dt)?;
        Ok(Self {
            dt,
            ..Default::default()
        })
    }

    /// Time step (ms)
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Reserve a fresh device handle
    pub fn next_device_id(&mut self) -> DeviceId {
        let id = DeviceId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a device to the step order.
    ///
    /// Registering a handle that is already present leaves the registry unchanged.
    pub fn register(&mut self, device: Device) -> DeviceId {
        let id = device.id();
        if self.index.contains_key(&id) {
            log::warn!("Device {} is already registered; ignoring", id);
            return id;
        }
        self.next_id = self.next_id.max(id.raw() + 1);
        self.index.insert(id, self.devices.len());
        self.devices.push(device);
        log::debug!("Registered device {} at slot {}", id, self.devices.len() - 1);
        id
    }

    /// Create and register a neuron
    pub fn add_neuron(&mut self, params: LifParams) -> Result<DeviceId> {
        params.validate()?;
        let id = self.next_device_id();
        let neuron = LifNeuron::new(id, params)?;
        Ok(self.register(Device::Neuron(neuron)))
    }

    /// Create and register `count` neurons sharing `params`
    pub fn add_population(&mut self, count: usize, params: &LifParams) -> Result<Vec<DeviceId>> {
        (0..count).map(|_| self.add_neuron(params.clone())).collect()
    }

    /// Register an input source
    pub fn add_input(&mut self, source: impl InputDevice + 'static) -> DeviceId {
        let id = self.next_device_id();
        self.register(Device::input(id, source))
    }

    /// Number of registered devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Whether no device is registered
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Devices in step order
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Look up a device
    pub fn device(&self, id: DeviceId) -> Result<&Device> {
        self.index
            .get(&id)
            .and_then(|&slot| self.devices.get(slot))
            .ok_or(RuntimeError::DeviceNotFound { device: id })
    }

    fn device_mut(&mut self, id: DeviceId) -> Result<&mut Device> {
        let slot = *self
            .index
            .get(&id)
            .ok_or(RuntimeError::DeviceNotFound { device: id })?;
        self.devices
            .get_mut(slot)
            .ok_or(RuntimeError::DeviceNotFound { device: id })
    }

    /// Look up a neuron
    pub fn neuron(&self, id: DeviceId) -> Result<&LifNeuron> {
        self.device(id)?
            .as_neuron()
            .ok_or(RuntimeError::NotANeuron { device: id })
    }

    /// Look up a neuron for modification
    pub fn neuron_mut(&mut self, id: DeviceId) -> Result<&mut LifNeuron> {
        self.device_mut(id)?
            .as_neuron_mut()
            .ok_or(RuntimeError::NotANeuron { device: id })
    }

    /// Neurons in step order
    pub fn neurons(&self) -> impl Iterator<Item = &LifNeuron> + '_ {
        self.devices.iter().filter_map(Device::as_neuron)
    }

    /// Synapse behind a handle returned by [`Simulator::connect`]
    pub fn synapse(&self, handle: SynapseHandle) -> Result<&Synapse> {
        self.neuron(handle.target)?
            .synapse(handle.class, handle.slot)
            .ok_or_else(|| {
                RuntimeError::invalid_config(format!(
                    "neuron {} has no {} synapse in slot {}",
                    handle.target, handle.class, handle.slot
                ))
            })
    }

    fn source_info(&self, id: DeviceId) -> Result<SourceInfo> {
        let device = self.device(id)?;
        Ok(SourceInfo {
            id,
            kind: device.kind(),
            is_neuron: device.as_neuron().is_some(),
        })
    }

    /// Wire a source population onto a target population.
    ///
    /// `specs` has one row per target and one column per source. The returned
    /// matrix has the same shape, with `None` where a spec has zero weight.
    /// Nothing is wired unless every pair is valid.
    pub fn connect(
        &mut self,
        sources: &[DeviceId],
        targets: &[DeviceId],
        specs: &[Vec<SynapseSpec>],
    ) -> Result<Vec<Vec<Option<SynapseHandle>>>> {
        if specs.len() != targets.len() {
            return Err(RuntimeError::dimension_mismatch(
                "synapse spec rows (targets)",
                targets.len(),
                specs.len(),
            ));
        }
        if let Some(row) = specs.iter().find(|row| row.len() != sources.len()) {
            return Err(RuntimeError::dimension_mismatch(
                "synapse spec columns (sources)",
                sources.len(),
                row.len(),
            ));
        }

        let infos = sources
            .iter()
            .map(|&id| self.source_info(id))
            .collect::<Result<Vec<_>>>()?;
        for (&target, row) in targets.iter().zip(specs) {
            self.neuron(target)?;
            for (info, spec) in infos.iter().zip(row) {
                if spec.connects() {
                    check_source(*info, spec)?;
                    Synapse::from_spec(spec)?;
                }
            }
        }

        let mut handles = Vec::with_capacity(targets.len());
        for (&target, row) in targets.iter().zip(specs) {
            let neuron = self.neuron_mut(target)?;
            let created = infos
                .iter()
                .zip(row)
                .map(|(info, spec)| neuron.connect(*info, spec))
                .collect::<Result<Vec<_>>>()?;
            handles.push(created);
        }
        Ok(handles)
    }

    /// Wire a single source onto a single target
    pub fn connect_one(
        &mut self,
        source: DeviceId,
        target: DeviceId,
        spec: SynapseSpec,
    ) -> Result<Option<SynapseHandle>> {
        let mut handles = self.connect(&[source], &[target], &[vec![spec]])?;
        Ok(handles.pop().and_then(|mut row| row.pop()).flatten())
    }

    /// Run for `duration_ms`.
    ///
    /// Every device is initialized for `floor(duration / dt)` samples, then the
    /// devices are stepped in registration order for every sample but the last.
    pub fn run(&mut self, duration_ms: f64) -> Result<SimulationResult> {
        ensure_finite("duration_ms", duration_ms)?;
        ensure_positive("duration_ms", duration_ms)?;
        let dt = self.dt;
        let steps = (duration_ms / dt) as usize;
        if steps == 0 {
            return Err(RuntimeError::invalid_parameter(
                "duration_ms",
                duration_ms.to_string(),
                format!(">= dt ({}ms)", dt),
            ));
        }

        log::info!(
            "Starting simulation: {}ms with {}ms timestep ({} steps, {} devices)",
            duration_ms,
            dt,
            steps,
            self.devices.len()
        );

        for device in &mut self.devices {
            device.initialize(steps, dt)?;
        }

        let last = steps - 1;
        for it in 0..last {
            step_devices(&mut self.devices, &self.index, it)?;

            if it % (last / 10).max(1) == 0 {
                let progress = (it as f64 / last as f64) * 100.0;
                log::debug!("Simulation progress: {:.1}%", progress);
            }
        }

        let mut spikes: Vec<SpikeEvent> = self
            .neurons()
            .flat_map(|n| n.spikes().iter().copied())
            .collect();
        spikes.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
        let total_spikes = spikes.len();

        log::info!("Simulation completed: {} spikes in {} steps", total_spikes, steps);

        Ok(SimulationResult {
            spikes,
            duration_ms,
            dt,
            steps,
            total_spikes,
        })
    }
}

/// Advance every device from `it` to `it + 1`, in slot order.
///
/// Devices stepped earlier in the pass are seen with their freshly published
/// state, later ones with the state of the previous step.
fn step_devices(devices: &mut [Device], index: &HashMap<DeviceId, usize>, it: usize) -> Result<()> {
    for slot in 0..devices.len() {
        let (before, rest) = devices.split_at_mut(slot);
        let Some((current, after)) = rest.split_first_mut() else {
            continue;
        };
        let lookup = |id: DeviceId| -> Option<Probe> {
            let other = *index.get(&id)?;
            let device = match other.cmp(&slot) {
                Ordering::Less => before.get(other),
                Ordering::Greater => after.get(other - slot - 1),
                Ordering::Equal => None,
            };
            device.map(|d| d.probe(it))
        };
        current.step(it, &lookup)?;
    }
    Ok(())
}
