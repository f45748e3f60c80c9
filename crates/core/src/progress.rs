//! Coarse-grained progress state machine for one workflow run.
//!
//! A run moves `pending → in_progress (steps 0..3) → completed | failed`.
//! Failure at any step records a human-readable message and leaves the last
//! attempted step clearly marked — no ambiguous partial state.

use serde::{Deserialize, Serialize};

/// Display labels for the four execution steps, in order.
pub const STEP_LABELS: [&str; 4] = [
    "Preparing workflow",
    "Sending request",
    "Executing remotely",
    "Processing results",
];

/// Total number of execution steps; fixed for every run.
pub const TOTAL_STEPS: usize = STEP_LABELS.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

/// Progress of one run through the four-step sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionProgress {
    pub current_step: usize,
    pub total_steps: usize,
    pub status: ExecutionStatus,
    /// The active step's label while in progress, or the failure message
    /// once failed.
    pub step_details: String,
}

impl Default for ExecutionProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionProgress {
    pub fn new() -> Self {
        ExecutionProgress {
            current_step: 0,
            total_steps: TOTAL_STEPS,
            status: ExecutionStatus::Pending,
            step_details: String::new(),
        }
    }

    /// Enter step `step` (0-based). Out-of-range steps clamp to the last
    /// step rather than panic; the step count is fixed.
    pub fn start_step(&mut self, step: usize) {
        self.current_step = step.min(TOTAL_STEPS - 1);
        self.status = ExecutionStatus::InProgress;
        self.step_details = STEP_LABELS[self.current_step].to_string();
    }

    /// Mark the run completed after the final step.
    pub fn complete(&mut self) {
        self.current_step = TOTAL_STEPS;
        self.status = ExecutionStatus::Completed;
        self.step_details = "Workflow completed".to_string();
    }

    /// Mark the run failed at the current step with a human-readable message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = ExecutionStatus::Failed;
        self.step_details = message.into();
    }

    /// Back to `pending` with all step state cleared ("start new workflow").
    pub fn reset(&mut self) {
        *self = ExecutionProgress::new();
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            ExecutionStatus::Completed | ExecutionStatus::Failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_run_walks_exactly_four_steps() {
        let mut p = ExecutionProgress::new();
        assert_eq!(p.status, ExecutionStatus::Pending);

        for step in 0..TOTAL_STEPS {
            p.start_step(step);
            assert_eq!(p.status, ExecutionStatus::InProgress);
            assert_eq!(p.current_step, step);
            assert_eq!(p.step_details, STEP_LABELS[step]);
        }

        p.complete();
        assert_eq!(p.status, ExecutionStatus::Completed);
        assert_eq!(p.current_step, TOTAL_STEPS);
        assert!(p.is_terminal());
    }

    #[test]
    fn failure_pins_the_failing_step() {
        let mut p = ExecutionProgress::new();
        p.start_step(2);
        p.fail("upstream returned 502 Bad Gateway");

        assert_eq!(p.status, ExecutionStatus::Failed);
        assert_eq!(p.current_step, 2);
        assert_eq!(p.step_details, "upstream returned 502 Bad Gateway");
        assert!(p.is_terminal());
    }

    #[test]
    fn reset_returns_to_pending() {
        let mut p = ExecutionProgress::new();
        p.start_step(1);
        p.fail("boom");
        p.reset();

        assert_eq!(p, ExecutionProgress::new());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let p = ExecutionProgress::new();
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("currentStep").is_some());
        assert!(json.get("totalSteps").is_some());
        assert_eq!(json["status"], "pending");
    }
}
