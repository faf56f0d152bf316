/// Frame-stepped progress from 0 to 1.
///
/// Completion is decided by the number of steps taken, not by comparing an
/// accumulated float against 1, so a step of 0.02 completes on exactly the
/// 50th advance and reports exactly `1.0` there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepProgress {
    step: f32,
    taken: u32,
    total: u32,
}

impl StepProgress {
    pub fn new(step: f32) -> Self {
        debug_assert!(step > 0.0, "progress step must be positive");
        Self {
            step,
            taken: 0,
            total: steps_to_complete(step),
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Number of advances taken since the last reset.
    pub fn steps_taken(&self) -> u32 {
        self.taken
    }

    /// Number of advances needed to reach 1.
    pub fn steps_total(&self) -> u32 {
        self.total
    }

    pub fn value(&self) -> f32 {
        if self.is_complete() {
            1.0
        } else {
            self.taken as f32 * self.step
        }
    }

    pub fn is_complete(&self) -> bool {
        self.taken >= self.total
    }

    /// Take one step and return the new value. Saturates at 1.
    pub fn advance(&mut self) -> f32 {
        if !self.is_complete() {
            self.taken += 1;
        }
        self.value()
    }

    pub fn reset(&mut self) {
        self.taken = 0;
    }
}

/// Steps of size `step` needed to cover `[0, 1]`, i.e. `ceil(1 / step)`,
/// tolerant of the rounding in steps like 0.02 that are not exact in binary.
pub fn steps_to_complete(step: f32) -> u32 {
    let exact = 1.0 / step as f64;
    let nearest = exact.round();
    let steps = if (exact - nearest).abs() < 1e-4 {
        nearest
    } else {
        exact.ceil()
    };
    (steps as u32).max(1)
}
