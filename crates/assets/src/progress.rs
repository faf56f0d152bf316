/// Counts of asset loads for the loading screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingProgress {
    total: u32,
    loaded: u32,
    failed: u32,
}

impl LoadingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `count` more items to wait for.
    pub fn start(&mut self, count: u32) {
        self.total += count;
    }

    pub fn item_loaded(&mut self) {
        if self.settled() < self.total {
            self.loaded += 1;
        }
    }

    pub fn item_failed(&mut self) {
        if self.settled() < self.total {
            self.failed += 1;
        }
    }

    pub fn loaded(&self) -> u32 {
        self.loaded
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    fn settled(&self) -> u32 {
        self.loaded + self.failed
    }

    /// Share of settled items, 0..=100. Nothing registered counts as done.
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            return 100.0;
        }
        self.settled() as f32 / self.total as f32 * 100.0
    }

    pub fn is_done(&self) -> bool {
        self.settled() >= self.total
    }
}
