/// Step and ceiling of the synthetic progress estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSettings {
    step: u8,
    cap: u8,
}

impl ProgressSettings {
    /// The cap is kept below 100 so only a real response can complete the bar.
    pub fn new(step: u8, cap: u8) -> Self {
        Self {
            step: step.max(1),
            cap: cap.min(99),
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn cap(&self) -> u8 {
        self.cap
    }
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self::new(10, 90)
    }
}

/// Client-side estimate shown while a request is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    percent: u8,
    running: bool,
    settings: ProgressSettings,
}

impl Progress {
    pub fn new(settings: ProgressSettings) -> Self {
        Self {
            percent: 0,
            running: false,
            settings,
        }
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub(crate) fn start(&mut self) {
        self.percent = 0;
        self.running = true;
    }

    /// Returns whether the displayed value changed.
    pub(crate) fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let next = self
            .percent
            .saturating_add(self.settings.step)
            .min(self.settings.cap)
            .max(self.percent);
        let changed = next != self.percent;
        self.percent = next;
        changed
    }

    pub(crate) fn complete(&mut self) {
        self.running = false;
        self.percent = 100;
    }

    pub(crate) fn fail(&mut self) {
        self.running = false;
        self.percent = 0;
    }
}
