//! Progress steps shown while a build is outstanding.
//!
//! The generation API gives no real progress signal, so a build exposes a
//! fixed, finite sequence of steps. The presentation layer pulls them at
//! its own pace; once consumed they are gone.

use std::iter::FusedIterator;

/// One displayable step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressEvent {
    pub text: &'static str,
    /// Percentage shown on the progress bar
    pub percent: u8,
}

const STEPS: &[ProgressEvent] = &[
    ProgressEvent { text: "Establishing Neural Link...", percent: 15 },
    ProgressEvent { text: "Parsing Requirements...", percent: 25 },
    ProgressEvent { text: "Drafting HTML Structure...", percent: 40 },
    ProgressEvent { text: "Injecting Tailwind Classes...", percent: 55 },
    ProgressEvent { text: "Compiling JavaScript Logic...", percent: 70 },
    ProgressEvent { text: "Polishing UI Elements...", percent: 85 },
    ProgressEvent { text: "Finalizing Sandbox...", percent: 95 },
];

/// Lazy sequence of progress steps for a single build.
///
/// Not `Clone`: a build's steps can be consumed only once.
#[derive(Debug)]
pub struct ProgressSteps {
    next: usize,
}

impl ProgressSteps {
    pub(crate) fn new() -> Self {
        Self { next: 0 }
    }
}

impl Iterator for ProgressSteps {
    type Item = ProgressEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let step = STEPS.get(self.next).copied();
        if step.is_some() {
            self.next += 1;
        }
        step
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = STEPS.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProgressSteps {}
impl FusedIterator for ProgressSteps {}
