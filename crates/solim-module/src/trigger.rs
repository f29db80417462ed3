//! Edge detection for the random expander's trigger inputs.

use solim_core::RandomTrigger;

use crate::frame::RandomColumnFrame;

/// Voltage a high trigger must fall below before it can fire again.
pub const TRIGGER_LOW_THRESHOLD: f32 = 0.1;
/// Voltage a low trigger must rise above to fire.
pub const TRIGGER_HIGH_THRESHOLD: f32 = 1.0;

/// Actions of the four random-expander inputs, in port order.
const ACTIONS: [RandomTrigger; 4] = [
    RandomTrigger::Move,
    RandomTrigger::One,
    RandomTrigger::All,
    RandomTrigger::Reset,
];

/// Hysteresis state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchmittState {
    /// Below the low threshold, or never above the high one.
    Low,
    /// Above the high threshold.
    High,
    /// No sample seen yet.
    #[default]
    Uninitialized,
}

/// Schmitt trigger with hysteresis.
///
/// The first sample only sets the state, so a gate that is already high when
/// the module starts does not fire.
///
/// ```rust
/// use solim_module::SchmittTrigger;
///
/// let mut trigger = SchmittTrigger::default();
/// assert!(!trigger.process(0.0));
/// assert!(trigger.process(5.0));
/// assert!(!trigger.process(0.5)); // still high: above the low threshold
/// assert!(!trigger.process(0.0));
/// assert!(trigger.process(5.0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SchmittTrigger {
    state: SchmittState,
    low_threshold: f32,
    high_threshold: f32,
}

impl SchmittTrigger {
    /// Create a trigger with the given thresholds.
    pub const fn new(low_threshold: f32, high_threshold: f32) -> Self {
        Self {
            state: SchmittState::Uninitialized,
            low_threshold,
            high_threshold,
        }
    }

    /// Feed one sample. Returns true on a low-to-high transition.
    pub fn process(&mut self, input: f32) -> bool {
        match self.state {
            SchmittState::Uninitialized => {
                self.state = if input >= self.high_threshold {
                    SchmittState::High
                } else {
                    SchmittState::Low
                };
            }
            SchmittState::High => {
                if input < self.low_threshold {
                    self.state = SchmittState::Low;
                }
            }
            SchmittState::Low => {
                if input > self.high_threshold {
                    self.state = SchmittState::High;
                    return true;
                }
            }
        }
        false
    }

    /// Current state.
    pub fn state(&self) -> SchmittState {
        self.state
    }

    /// Forget the last sample.
    pub fn reset(&mut self) {
        self.state = SchmittState::Uninitialized;
    }
}

impl Default for SchmittTrigger {
    fn default() -> Self {
        Self::new(TRIGGER_LOW_THRESHOLD, TRIGGER_HIGH_THRESHOLD)
    }
}

/// Rank used when several actions fire on one column before the core runs.
///
/// Reset beats All beats One beats Move.
pub fn priority(trigger: RandomTrigger) -> u8 {
    match trigger {
        RandomTrigger::None => 0,
        RandomTrigger::Move => 1,
        RandomTrigger::One => 2,
        RandomTrigger::All => 3,
        RandomTrigger::Reset => 4,
    }
}

/// The higher-priority of two triggers.
#[inline]
pub fn strongest(a: RandomTrigger, b: RandomTrigger) -> RandomTrigger {
    if priority(b) > priority(a) { b } else { a }
}

/// The four action inputs of one random-expander column, with the edge seen
/// since the last core tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnTriggers {
    move_trigger: SchmittTrigger,
    one_trigger: SchmittTrigger,
    all_trigger: SchmittTrigger,
    reset_trigger: SchmittTrigger,
    latched: RandomTrigger,
}

impl ColumnTriggers {
    /// Feed one sample of all four inputs and latch the strongest edge.
    pub fn process(&mut self, frame: &RandomColumnFrame) {
        let edges = [
            self.move_trigger.process(frame.move_trigger),
            self.one_trigger.process(frame.one_trigger),
            self.all_trigger.process(frame.all_trigger),
            self.reset_trigger.process(frame.reset_trigger),
        ];
        for (fired, trigger) in edges.into_iter().zip(ACTIONS) {
            if fired {
                self.latched = strongest(self.latched, trigger);
            }
        }
    }

    /// The latched action, if any.
    #[inline]
    pub fn latched(&self) -> RandomTrigger {
        self.latched
    }

    /// Hand the latched action to the core and clear the latch.
    #[inline]
    pub fn take(&mut self) -> RandomTrigger {
        core::mem::take(&mut self.latched)
    }

    /// Clear the latch and all edge state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
