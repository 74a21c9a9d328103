//! Fixed-capacity delay line for synaptic transmission

/// Number of whole steps a signal is held back for a transmission delay.
///
/// Truncates toward zero, so a delay shorter than one step is immediate.
pub fn delay_steps(delay_ms: f64, dt: f64) -> usize {
    (delay_ms / dt) as usize
}

/// Circular buffer holding the last `capacity` samples of a source.
///
/// Pushing a sample returns the one pushed `capacity - 1` pushes earlier, so a
/// line built for `d` delay steps has capacity `d + 1` and a line of capacity 1
/// passes samples straight through. The line starts filled with zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayLine {
    slots: Vec<f64>,
    cursor: usize,
}

impl DelayLine {
    /// Line delaying by `steps` pushes
    pub fn new(steps: usize) -> Self {
        Self {
            slots: vec![0.0; steps + 1],
            cursor: 0,
        }
    }

    /// Buffer length (`delay steps + 1`)
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Insert the newest sample and return the delayed one
    pub fn push(&mut self, sample: f64) -> f64 {
        self.slots[self.cursor] = sample;
        self.cursor = (self.cursor + 1) % self.slots.len();
        self.slots[self.cursor]
    }

    /// Refill with zeros
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = 0.0);
        self.cursor = 0;
    }
}

impl Default for DelayLine {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_delay_passes_through() {
        let mut line = DelayLine::new(0);
        assert_eq!(line.capacity(), 1);
        assert_eq!(line.push(1.0), 1.0);
        assert_eq!(line.push(0.0), 0.0);
        assert_eq!(line.push(3.5), 3.5);
    }

    #[test]
    fn test_delay_by_three() {
        let mut line = DelayLine::new(3);
        let input = [1.0, 0.0, 2.0, 0.0, 0.0, 4.0, 0.0, 0.0, 0.0];
        let output: Vec<f64> = input.iter().map(|&x| line.push(x)).collect();
        assert_eq!(output, vec![0.0, 0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 0.0, 4.0]);
    }

    #[test]
    fn test_capacity_from_delay() {
        assert_eq!(DelayLine::new(delay_steps(5.0, 0.1)).capacity(), 51);
        assert_eq!(DelayLine::new(delay_steps(0.05, 0.1)).capacity(), 1);
        assert_eq!(DelayLine::new(delay_steps(1.0, 1.0)).capacity(), 2);
    }

    #[test]
    fn test_clear() {
        let mut line = DelayLine::new(1);
        line.push(1.0);
        line.clear();
        assert_eq!(line.push(0.0), 0.0);
        assert_eq!(line.push(0.0), 0.0);
    }
}
