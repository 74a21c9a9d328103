//! Leaky integrate-and-fire neuron with conductance synapses
//!
//! A [`LifNeuron`] owns its per-run state arrays and an inbound connection table
//! bucketed by [`SynapseClass`]. Each step it first collects the drive of every
//! inbound connection, then applies the refractory/threshold transition for the
//! current sample and finally integrates the next sample with forward Euler.

use crate::{
    delay::{delay_steps, DelayLine},
    device::{DeviceId, Output, OutputKind, Probe},
    error::{Result, RuntimeError},
    params::LifParams,
    synapse::{Synapse, SynapseClass, SynapseHandle, SynapseSpec, SynapticInput},
};

/// A spike emitted by a neuron
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpikeEvent {
    /// Emission time (ms)
    pub time_ms: f64,
    /// Emitting neuron
    pub sender: DeviceId,
}

/// What a neuron needs to know about a device it is being connected to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceInfo {
    /// Source handle
    pub id: DeviceId,
    /// Kind of signal the source publishes
    pub kind: OutputKind,
    /// Whether the source has a membrane potential
    pub is_neuron: bool,
}

/// Read access to the devices feeding a neuron
pub(crate) trait Sources {
    /// Snapshot of a source device for the current step
    fn probe(&self, id: DeviceId) -> Option<Probe>;
}

impl<F> Sources for F
where
    F: Fn(DeviceId) -> Option<Probe>,
{
    fn probe(&self, id: DeviceId) -> Option<Probe> {
        self(id)
    }
}

/// Reject sources whose output cannot drive the synapse class of `spec`.
///
/// Current-valued sources cannot drive plastic synapses and only neurons can be
/// gap-coupled.
pub(crate) fn check_source(source: SourceInfo, spec: &SynapseSpec) -> Result<()> {
    let class = spec.class();
    let supported = match class {
        SynapseClass::Chemical => true,
        SynapseClass::Plastic => source.kind == OutputKind::Spikes,
        SynapseClass::Gap => source.is_neuron,
    };
    if supported {
        Ok(())
    } else {
        Err(RuntimeError::unsupported_source(
            source.id,
            format!("{} ({})", class, spec.ctype()),
        ))
    }
}

/// An inbound edge: source, synapse model and its delay line
#[derive(Debug, Clone)]
pub struct Connection {
    source: DeviceId,
    synapse: Synapse,
    line: DelayLine,
}

impl Connection {
    fn new(source: DeviceId, synapse: Synapse) -> Self {
        Self {
            source,
            synapse,
            line: DelayLine::default(),
        }
    }

    /// Device feeding this connection
    pub fn source(&self) -> DeviceId {
        self.source
    }

    /// Synapse model
    pub fn synapse(&self) -> &Synapse {
        &self.synapse
    }
}

/// Inbound connections by class, in connection order
#[derive(Debug, Clone, Default)]
pub struct InboundTable {
    chemical: Vec<Connection>,
    gap: Vec<Connection>,
    plastic: Vec<Connection>,
}

impl InboundTable {
    /// Connections of one class
    pub fn bucket(&self, class: SynapseClass) -> &[Connection] {
        match class {
            SynapseClass::Chemical => &self.chemical,
            SynapseClass::Gap => &self.gap,
            SynapseClass::Plastic => &self.plastic,
        }
    }

    fn bucket_mut(&mut self, class: SynapseClass) -> &mut Vec<Connection> {
        match class {
            SynapseClass::Chemical => &mut self.chemical,
            SynapseClass::Gap => &mut self.gap,
            SynapseClass::Plastic => &mut self.plastic,
        }
    }

    /// Total number of inbound connections
    pub fn len(&self) -> usize {
        self.chemical.len() + self.gap.len() + self.plastic.len()
    }

    /// Whether the neuron has no inputs
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Summed input of one step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Drive {
    excitatory: f64,
    inhibitory: f64,
    current: f64,
    gap: f64,
}

/// Per-run state of a neuron; every array has one entry per sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeuronState {
    /// Membrane potential (mV)
    pub v: Vec<f64>,
    /// Potential increment of the Euler step that produced each sample
    pub dv: Vec<f64>,
    /// Excitatory conductance (nS)
    pub ge: Vec<f64>,
    /// Inhibitory conductance (nS)
    pub gi: Vec<f64>,
    /// Adaptation variable
    pub w: Vec<f64>,
    /// Spike flag per stepped sample
    pub states: Vec<bool>,
    /// Running mean potential, relaxed toward the whole potential trace
    pub mean_v: Vec<f64>,
    /// Spike flag of the latest step
    pub spike: bool,
    /// Remaining refractory steps
    pub refractory: f64,
    /// Running instantaneous rate estimate
    pub rate: f64,
    /// Emitted spikes in time order
    pub spikes: Vec<SpikeEvent>,
    /// Step size of the current run (ms)
    pub dt: f64,
}

impl NeuronState {
    fn new(params: &LifParams, steps: usize, dt: f64) -> Self {
        let mut v = vec![0.0; steps];
        if let Some(first) = v.first_mut() {
            *first = params.v_init;
        }
        Self {
            v,
            dv: vec![0.0; steps],
            ge: vec![0.0; steps],
            gi: vec![0.0; steps],
            w: vec![0.0; steps],
            states: vec![false; steps],
            mean_v: vec![params.v_init; steps],
            spike: false,
            refractory: 0.0,
            rate: 0.0,
            spikes: Vec::new(),
            dt,
        }
    }

    /// Number of samples of the current run
    pub fn len(&self) -> usize {
        self.v.len()
    }

    /// Whether the neuron has not been initialized for a run
    pub fn is_empty(&self) -> bool {
        self.v.is_empty()
    }
}

/// Leaky integrate-and-fire unit
#[derive(Debug, Clone)]
pub struct LifNeuron {
    id: DeviceId,
    params: LifParams,
    state: NeuronState,
    inputs: InboundTable,
}

impl LifNeuron {
    /// Create a neuron under a simulator-issued handle
    pub fn new(id: DeviceId, params: LifParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            id,
            params,
            state: NeuronState::default(),
            inputs: InboundTable::default(),
        })
    }

    /// Handle of this neuron
    pub fn id(&self) -> DeviceId {
        self.id
    }

    /// Parameters
    pub fn params(&self) -> &LifParams {
        &self.params
    }

    /// Override parameters by configuration key.
    ///
    /// Unknown keys and invalid values are rejected without changing anything.
    pub fn update_params(&mut self, pairs: &[(&str, f64)]) -> Result<()> {
        let mut next = self.params.clone();
        next.apply(pairs)?;
        next.validate()?;
        self.params = next;
        Ok(())
    }

    /// State of the current run
    pub fn state(&self) -> &NeuronState {
        &self.state
    }

    /// Inbound connections
    pub fn inputs(&self) -> &InboundTable {
        &self.inputs
    }

    /// Synapse in a given bucket slot
    pub fn synapse(&self, class: SynapseClass, slot: usize) -> Option<&Synapse> {
        self.inputs.bucket(class).get(slot).map(Connection::synapse)
    }

    /// Whether the neuron spiked on its latest step
    pub fn spiking(&self) -> bool {
        self.state.spike
    }

    /// Membrane potential trace
    pub fn potential(&self) -> &[f64] {
        &self.state.v
    }

    /// Per-step potential increment trace
    pub fn potential_delta(&self) -> &[f64] {
        &self.state.dv
    }

    /// Running mean potential
    pub fn mean_potential(&self) -> &[f64] {
        &self.state.mean_v
    }

    /// Per-step spike flags
    pub fn spike_states(&self) -> &[bool] {
        &self.state.states
    }

    /// Excitatory conductance trace
    pub fn excitatory_conductance(&self) -> &[f64] {
        &self.state.ge
    }

    /// Inhibitory conductance trace
    pub fn inhibitory_conductance(&self) -> &[f64] {
        &self.state.gi
    }

    /// Adaptation trace
    pub fn adaptation(&self) -> &[f64] {
        &self.state.w
    }

    /// Emitted spikes
    pub fn spikes(&self) -> &[SpikeEvent] {
        &self.state.spikes
    }

    /// Emission times of all spikes (ms)
    pub fn spike_times(&self) -> Vec<f64> {
        self.state.spikes.iter().map(|s| s.time_ms).collect()
    }

    /// Running instantaneous rate estimate
    pub fn rate(&self) -> f64 {
        self.state.rate
    }

    /// Add an inbound connection described by `spec`.
    ///
    /// Returns `None` when the synapse weight is zero.
    pub fn connect(&mut self, source: SourceInfo, spec: &SynapseSpec) -> Result<Option<SynapseHandle>> {
        if !spec.connects() {
            return Ok(None);
        }

        check_source(source, spec)?;
        let class = spec.class();
        let synapse = Synapse::from_spec(spec)?;
        let bucket = self.inputs.bucket_mut(class);
        bucket.push(Connection::new(source.id, synapse));

        let handle = SynapseHandle {
            target: self.id,
            class,
            slot: bucket.len() - 1,
        };
        log::debug!(
            "Connected device {} -> neuron {} ({} synapse, slot {})",
            source.id,
            self.id,
            spec.ctype(),
            handle.slot
        );
        Ok(Some(handle))
    }

    /// Allocate fresh state arrays and zero the delay lines for a run of `steps` samples
    pub fn initialize(&mut self, steps: usize, dt: f64) -> Result<()> {
        if steps == 0 {
            return Err(RuntimeError::invalid_parameter("steps", "0", ">= 1"));
        }
        self.state = NeuronState::new(&self.params, steps, dt);

        for class in [SynapseClass::Chemical, SynapseClass::Plastic] {
            for conn in self.inputs.bucket_mut(class) {
                let delay = conn.synapse.delay().unwrap_or(0.0);
                // Anything held past the end of the run never arrives
                let held = delay_steps(delay, dt).min(steps);
                if delay > 0.0 && held == 0 {
                    log::warn!(
                        "Delay {}ms from device {} to neuron {} is shorter than dt={}ms and rounds to zero",
                        delay,
                        conn.source,
                        self.id,
                        dt
                    );
                }
                if conn.line.capacity() == held + 1 {
                    conn.line.clear();
                } else {
                    conn.line = DelayLine::new(held);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn probe(&self, step: usize) -> Probe {
        Probe {
            output: Output::Spikes(self.state.spike),
            potential: self.state.v.get(step).copied(),
        }
    }

    /// Sum the drive of every inbound connection for step `it`
    fn load_inputs(&mut self, it: usize, sources: &impl Sources) -> Result<Drive> {
        let own = self.probe(it);
        let Self {
            id,
            params,
            state,
            inputs,
        } = self;
        let lookup = |source: DeviceId| -> Result<Probe> {
            if source == *id {
                Ok(own)
            } else {
                sources
                    .probe(source)
                    .ok_or(RuntimeError::DeviceNotFound { device: source })
            }
        };

        let dt = state.dt;
        let post_spike = if state.spike { 1.0 } else { 0.0 };
        let mut drive = Drive::default();

        for conn in inputs.chemical.iter_mut() {
            let output = lookup(conn.source)?.output;
            let sample = conn.line.push(output.value());
            match output {
                Output::Spikes(_) => {
                    let weight = conn.synapse.update(&SynapticInput {
                        spike: sample,
                        pre_spike: output.value(),
                        post_spike,
                        dt,
                    });
                    if weight > 0.0 {
                        drive.excitatory += sample * weight;
                    } else {
                        drive.inhibitory += sample * weight;
                    }
                }
                Output::Current(_) => {
                    drive.current += sample * conn.synapse.weight();
                }
            }
        }

        for conn in inputs.gap.iter_mut() {
            let other = lookup(conn.source)?.potential.ok_or_else(|| {
                RuntimeError::simulation_step(
                    it,
                    format!("gap junction source {} has no membrane potential", conn.source),
                )
            })?;
            let weight = conn.synapse.update(&SynapticInput {
                dt,
                ..SynapticInput::default()
            });
            drive.gap -= weight * (state.v[it] - other) / params.g_l;
        }

        for conn in inputs.plastic.iter_mut() {
            match lookup(conn.source)?.output {
                Output::Spikes(fired) => {
                    let pre_spike = if fired { 1.0 } else { 0.0 };
                    let spike_in = conn.line.push(pre_spike);
                    let weight = conn.synapse.update(&SynapticInput {
                        spike: spike_in,
                        pre_spike,
                        post_spike,
                        dt,
                    });
                    if weight > 0.0 {
                        drive.excitatory += spike_in * weight;
                    } else {
                        drive.inhibitory += spike_in * weight;
                    }
                }
                Output::Current(_) => {
                    return Err(RuntimeError::simulation_step(
                        it,
                        format!("plastic synapse fed by current source {}", conn.source),
                    ));
                }
            }
        }

        Ok(drive)
    }

    /// Advance from sample `it` to sample `it + 1`
    pub(crate) fn step(&mut self, it: usize, sources: &impl Sources) -> Result<()> {
        if it + 1 >= self.state.len() {
            return Err(RuntimeError::simulation_step(
                it,
                format!("neuron {} has {} samples", self.id, self.state.len()),
            ));
        }

        let drive = self.load_inputs(it, sources)?;
        let p = &self.params;
        let s = &mut self.state;
        let dt = s.dt;

        s.spike = false;
        if s.refractory > 0.0 {
            s.v[it] = p.v_reset;
            s.refractory -= 1.0;
        } else if s.v[it] >= p.v_th {
            s.v[it] = p.v_reset;
            s.refractory = p.tref / dt;
            s.spike = true;
            let event = SpikeEvent {
                time_ms: it as f64 * dt,
                sender: self.id,
            };
            log::trace!("Neuron {} spiked at {}ms", self.id, event.time_ms);
            s.spikes.push(event);
        }
        s.states[it] = s.spike;
        let spike = if s.spike { 1.0 } else { 0.0 };

        s.ge[it + 1] = s.ge[it] - (dt / p.tau_syn_e) * s.ge[it] + p.ge_bar * drive.excitatory;
        s.gi[it + 1] = s.gi[it] - (dt / p.tau_syn_i) * s.gi[it] + p.gi_bar * drive.inhibitory.abs();

        let v = s.v[it];
        let dv_reg = -(v - p.e_l);
        let dv_inj = p.delta_t * ((v - p.v_rh) / p.delta_t).exp();
        let dv_syn = -(s.ge[it + 1] / p.g_l) * (v - p.ve) - (s.gi[it + 1] / p.g_l) * (v - p.vi);
        let dv_cur = drive.current / p.g_l;
        s.dv[it + 1] = (dv_reg + dv_inj + dv_syn + dv_cur + drive.gap) * (dt / p.tau_m);

        s.w[it + 1] =
            s.w[it] + (-s.w[it] + p.a * (v - p.e_l) + p.b * p.tau_w * spike) * (dt / p.tau_w);

        s.v[it + 1] = v + s.dv[it + 1] - s.w[it] / p.g_l;

        if !s.spikes.is_empty() {
            s.rate += (-s.rate / p.tau_rt + spike) * dt;
        }
        let relax = dt / p.v_tau;
        for (mean, &sample) in s.mean_v.iter_mut().zip(s.v.iter()) {
            *mean += (-*mean + sample) * relax;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_sources(_: DeviceId) -> Option<Probe> {
        None
    }

    fn quiet_params() -> LifParams {
        LifParams::from_pairs(&[("a", 0.0), ("b", 0.0)]).unwrap()
    }

    fn run_alone(neuron: &mut LifNeuron, steps: usize) {
        neuron.initialize(steps, 0.1).unwrap();
        for it in 0..steps - 1 {
            neuron.step(it, &no_sources).unwrap();
        }
    }

    #[test]
    fn test_initialize_sets_initial_state() {
        let mut neuron = LifNeuron::new(DeviceId::new(0), LifParams::default()).unwrap();
        neuron.initialize(10, 0.1).unwrap();
        let state = neuron.state();
        assert_eq!(state.len(), 10);
        assert_eq!(state.v[0], -70.0);
        assert!(state.v[1..].iter().all(|&v| v == 0.0));
        assert_eq!(state.mean_v[5], -70.0);
        assert!(!neuron.spiking());
        assert!(neuron.initialize(0, 0.1).is_err());
    }

    #[test]
    fn test_mean_potential_relaxes_over_whole_trace() {
        let params = LifParams::from_pairs(&[("a", 0.0), ("b", 0.0), ("V_init", -60.0)]).unwrap();
        let mut neuron = LifNeuron::new(DeviceId::new(0), params).unwrap();
        let steps = 10;
        neuron.initialize(steps, 0.1).unwrap();
        let relax = 0.1 / neuron.params().v_tau;

        let mut expected = vec![-60.0; steps];
        for it in 0..4 {
            neuron.step(it, &no_sources).unwrap();
            let v = neuron.potential().to_vec();
            for (mean, &sample) in expected.iter_mut().zip(&v) {
                *mean += (-*mean + sample) * relax;
            }
            assert_eq!(neuron.mean_potential(), expected.as_slice(), "step {}", it);
        }

        let mean = neuron.mean_potential();
        // Sample 0 holds its initial value, so its mean never moves
        assert_eq!(mean[0], -60.0);
        // Sample 1 was written on the first step and pulled toward it from then on
        let v1 = neuron.potential()[1];
        assert!(v1 < -60.0);
        assert!(mean[1] < -60.0 && mean[1] > v1);
        // Unwritten samples are still zero and drag their means toward it
        let untouched = -60.0 * (1.0 - relax).powi(4);
        assert!((mean[9] - untouched).abs() < 1e-9);
        assert!(mean[9] > -60.0 && mean[9] < 0.0);
    }

    #[test]
    fn test_isolated_decay_is_monotonic() {
        let params = LifParams::from_pairs(&[("a", 0.0), ("b", 0.0), ("V_init", -60.0)]).unwrap();
        let mut neuron = LifNeuron::new(DeviceId::new(0), params).unwrap();
        run_alone(&mut neuron, 2000);

        let v = neuron.potential();
        for pair in v.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
        assert!(v[v.len() - 1] > -70.0);
        assert!(v[v.len() - 1] < -69.9);
        assert!(neuron.spikes().is_empty());
    }

    #[test]
    fn test_threshold_crossing_spikes_and_resets() {
        let params = LifParams::from_pairs(&[("V_init", -30.0), ("tref", 1.0)]).unwrap();
        let mut neuron = LifNeuron::new(DeviceId::new(3), params).unwrap();
        neuron.initialize(30, 0.1).unwrap();

        neuron.step(0, &no_sources).unwrap();
        assert!(neuron.spiking());
        assert_eq!(neuron.potential()[0], -55.0);
        assert_eq!(
            neuron.spikes(),
            &[SpikeEvent {
                time_ms: 0.0,
                sender: DeviceId::new(3)
            }]
        );
        assert!(neuron.state().states[0]);

        // tref / dt = 10 refractory steps pinned to the reset potential
        for it in 1..=10 {
            neuron.step(it, &no_sources).unwrap();
            assert!(!neuron.spiking());
            assert_eq!(neuron.potential()[it], -55.0);
        }
        assert_eq!(neuron.state().refractory, 0.0);
    }

    #[test]
    fn test_adaptation_jumps_on_spike() {
        let params = LifParams::from_pairs(&[("V_init", -30.0)]).unwrap();
        let mut neuron = LifNeuron::new(DeviceId::new(0), params).unwrap();
        neuron.initialize(5, 0.1).unwrap();
        neuron.step(0, &no_sources).unwrap();
        // w[1] = 0 + (0 + 0 + b * tau_w) * dt / tau_w = b * dt
        assert!((neuron.adaptation()[1] - 0.3).abs() < 1e-12);
        // rate starts once a spike exists
        assert!((neuron.rate() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_step_past_end_fails() {
        let mut neuron = LifNeuron::new(DeviceId::new(0), quiet_params()).unwrap();
        neuron.initialize(3, 0.1).unwrap();
        assert!(neuron.step(1, &no_sources).is_ok());
        assert!(matches!(
            neuron.step(2, &no_sources),
            Err(RuntimeError::SimulationStep { step: 2, .. })
        ));
    }

    #[test]
    fn test_initialize_zeroes_and_caps_delay_lines() {
        let source = DeviceId::new(0);
        let info = SourceInfo {
            id: source,
            kind: OutputKind::Spikes,
            is_neuron: false,
        };
        let mut neuron = LifNeuron::new(DeviceId::new(1), quiet_params()).unwrap();
        neuron.connect(info, &SynapseSpec::fixed(1.0, 0.5)).unwrap();
        neuron.connect(info, &SynapseSpec::fixed(1.0, 1e9)).unwrap();
        neuron.initialize(8, 0.1).unwrap();

        let firing = |id: DeviceId| {
            (id == source).then_some(Probe {
                output: Output::Spikes(true),
                potential: None,
            })
        };
        neuron.step(0, &firing).unwrap();

        let lines: Vec<&DelayLine> = neuron.inputs.chemical.iter().map(|c| &c.line).collect();
        assert_eq!(lines[0].capacity(), 6);
        assert_eq!(lines[1].capacity(), 9);

        // Pending samples from the previous run are dropped
        neuron.initialize(8, 0.1).unwrap();
        let mut line = neuron.inputs.chemical[0].line.clone();
        assert_eq!(line.capacity(), 6);
        assert!((0..6).all(|_| line.push(0.0) == 0.0));
    }

    #[test]
    fn test_connect_rules() {
        let mut neuron = LifNeuron::new(DeviceId::new(1), quiet_params()).unwrap();
        let current = SourceInfo {
            id: DeviceId::new(0),
            kind: OutputKind::Current,
            is_neuron: false,
        };
        let spikes = SourceInfo {
            id: DeviceId::new(2),
            kind: OutputKind::Spikes,
            is_neuron: false,
        };

        let stdp = SynapseSpec::from_pairs("STDP", &[]).unwrap();
        assert!(matches!(
            neuron.connect(current, &stdp),
            Err(RuntimeError::UnsupportedSource { .. })
        ));
        assert!(matches!(
            neuron.connect(spikes, &SynapseSpec::gap(1.0)),
            Err(RuntimeError::UnsupportedSource { .. })
        ));

        assert_eq!(neuron.connect(spikes, &SynapseSpec::none()).unwrap(), None);

        let handle = neuron.connect(current, &SynapseSpec::fixed(2.0, 0.0)).unwrap().unwrap();
        assert_eq!(handle.class, SynapseClass::Chemical);
        assert_eq!(handle.slot, 0);
        let handle = neuron.connect(spikes, &stdp).unwrap().unwrap();
        assert_eq!(handle.class, SynapseClass::Plastic);
        assert_eq!(neuron.inputs().len(), 2);
        assert!(neuron.synapse(SynapseClass::Plastic, 0).is_some());
    }

    #[test]
    fn test_current_source_drives_potential() {
        let source = DeviceId::new(0);
        let mut neuron = LifNeuron::new(DeviceId::new(1), quiet_params()).unwrap();
        let info = SourceInfo {
            id: source,
            kind: OutputKind::Current,
            is_neuron: false,
        };
        neuron.connect(info, &SynapseSpec::fixed(1.0, 0.0)).unwrap();
        neuron.initialize(3, 0.1).unwrap();

        let probe = |id: DeviceId| {
            (id == source).then_some(Probe {
                output: Output::Current(40.0),
                potential: None,
            })
        };
        neuron.step(0, &probe).unwrap();

        let mut reference = LifNeuron::new(DeviceId::new(2), quiet_params()).unwrap();
        reference.initialize(3, 0.1).unwrap();
        reference.step(0, &no_sources).unwrap();

        // I / g_L * dt / tau_m = 40 / 2 * 0.1 / 20
        let extra = neuron.potential()[1] - reference.potential()[1];
        assert!((extra - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_missing_source_fails() {
        let mut neuron = LifNeuron::new(DeviceId::new(1), quiet_params()).unwrap();
        let info = SourceInfo {
            id: DeviceId::new(9),
            kind: OutputKind::Spikes,
            is_neuron: true,
        };
        neuron.connect(info, &SynapseSpec::fixed(1.0, 0.0)).unwrap();
        neuron.initialize(3, 0.1).unwrap();
        assert!(matches!(
            neuron.step(0, &no_sources),
            Err(RuntimeError::DeviceNotFound { .. })
        ));
    }

    #[test]
    fn test_self_gap_coupling_is_null() {
        let id = DeviceId::new(0);
        let mut coupled = LifNeuron::new(id, quiet_params()).unwrap();
        let info = SourceInfo {
            id,
            kind: OutputKind::Spikes,
            is_neuron: true,
        };
        coupled.connect(info, &SynapseSpec::gap(3.0)).unwrap();
        let mut plain = LifNeuron::new(id, quiet_params()).unwrap();

        run_alone(&mut coupled, 100);
        run_alone(&mut plain, 100);
        assert_eq!(coupled.potential(), plain.potential());
    }

    #[test]
    fn test_update_params() {
        let mut neuron = LifNeuron::new(DeviceId::new(0), LifParams::default()).unwrap();
        neuron.update_params(&[("V_th", -50.0)]).unwrap();
        assert_eq!(neuron.params().v_th, -50.0);

        assert!(neuron.update_params(&[("V_th", -45.0), ("Vth", 1.0)]).is_err());
        assert_eq!(neuron.params().v_th, -50.0);

        assert!(neuron.update_params(&[("g_L", -1.0)]).is_err());
        assert_eq!(neuron.params().g_l, 2.0);
    }
}
