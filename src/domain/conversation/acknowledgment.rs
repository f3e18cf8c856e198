//! Acknowledgment phrases for the first reply.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

const ACKNOWLEDGMENTS: &[&str] = &[
    "Thanks for letting me know about the {symptom}.",
    "I'm sorry you're not feeling well.",
    "Got it: {symptom}.",
    "Thanks for sharing that. Let's figure out the best next step.",
];

/// Chooses one of `len` phrases.
pub trait PhrasePicker: Send + Sync + std::fmt::Debug {
    /// Returns an index below `len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

/// Random choice from a seedable generator.
#[derive(Debug)]
pub struct RandomPicker {
    rng: Mutex<StdRng>,
}

impl RandomPicker {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl PhrasePicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..len),
            Err(_) => 0,
        }
    }
}

/// Always picks the same index (modulo `len`).
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPicker(pub usize);

impl PhrasePicker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        self.0 % len
    }
}

/// Renders an acknowledgment for the given symptom.
pub fn acknowledgment(picker: &dyn PhrasePicker, symptom: &str) -> String {
    let template = ACKNOWLEDGMENTS[picker.pick(ACKNOWLEDGMENTS.len())];
    let symptom = symptom.trim().to_lowercase();
    if symptom.is_empty() {
        return ACKNOWLEDGMENTS[1].to_string();
    }
    template.replace("{symptom}", &symptom)
}
