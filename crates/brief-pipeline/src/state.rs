//! Per-run state machines
//!
//! Each branch moves `not_started -> deriving -> fetching -> done`, and the
//! orchestrator moves `branches_pending -> branches_complete -> synthesizing
//! -> done`. `failed` is terminal. Nothing here outlives a single run.

use crate::{PipelineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// A state in one of the run state machines
pub trait RunState: Copy + Eq + fmt::Debug + fmt::Display {
    /// The failure state of this machine
    const FAILED: Self;

    /// Whether moving from `self` to `next` is legal
    fn can_transition_to(self, next: Self) -> bool;

    /// Whether no further transition is possible
    fn is_terminal(self) -> bool;
}

/// Progress of one enrichment branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchState {
    NotStarted,
    /// Waiting on the language model for a keyword or ticker
    Deriving,
    /// Waiting on the search or market data gateway
    Fetching,
    Done,
    Failed,
}

impl BranchState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Deriving => "deriving",
            Self::Fetching => "fetching",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl RunState for BranchState {
    const FAILED: Self = Self::Failed;

    fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::Deriving)
                | (Self::Deriving, Self::Fetching)
                | (Self::Fetching, Self::Done)
                | (Self::Deriving | Self::Fetching, Self::Failed)
        )
    }

    fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for BranchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    BranchesPending,
    BranchesComplete,
    Synthesizing,
    Done,
    Failed,
}

impl PipelineState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BranchesPending => "branches_pending",
            Self::BranchesComplete => "branches_complete",
            Self::Synthesizing => "synthesizing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl RunState for PipelineState {
    const FAILED: Self = Self::Failed;

    fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::BranchesPending, Self::BranchesComplete)
            | (Self::BranchesComplete, Self::Synthesizing)
            | (Self::Synthesizing, Self::Done) => true,
            (from, Self::Failed) => !from.is_terminal(),
            _ => false,
        }
    }

    fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state machine that remembers every state it has been in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLog<S> {
    name: &'static str,
    history: Vec<S>,
}

impl<S: RunState> StateLog<S> {
    /// Start a machine named `name` in `initial`
    pub fn new(name: &'static str, initial: S) -> Self {
        Self {
            name,
            history: vec![initial],
        }
    }

    /// Current state
    pub fn current(&self) -> S {
        // history always holds the initial state
        self.history[self.history.len() - 1]
    }

    /// Every state visited, oldest first
    pub fn history(&self) -> &[S] {
        &self.history
    }

    /// Move to `next`, rejecting illegal transitions
    pub fn advance(&mut self, next: S) -> Result<()> {
        let current = self.current();
        if !current.can_transition_to(next) {
            return Err(PipelineError::InvalidTransition(format!(
                "{}: {current} -> {next}",
                self.name
            )));
        }

        debug!(machine = self.name, from = %current, to = %next, "state transition");
        self.history.push(next);
        Ok(())
    }

    /// Move to the failure state if that is still legal
    ///
    /// Returns whether the transition happened.
    pub fn fail(&mut self) -> bool {
        self.advance(S::FAILED).is_ok()
    }
}

/// States recorded during one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTrace {
    pub(crate) pipeline: StateLog<PipelineState>,
    pub(crate) web: StateLog<BranchState>,
    pub(crate) market: StateLog<BranchState>,
}

impl RunTrace {
    pub(crate) fn new() -> Self {
        Self {
            pipeline: StateLog::new("pipeline", PipelineState::BranchesPending),
            web: StateLog::new("web_branch", BranchState::NotStarted),
            market: StateLog::new("market_branch", BranchState::NotStarted),
        }
    }

    /// Orchestrator states
    pub fn pipeline(&self) -> &StateLog<PipelineState> {
        &self.pipeline
    }

    /// Web branch states
    pub fn web(&self) -> &StateLog<BranchState> {
        &self.web
    }

    /// Market branch states
    pub fn market(&self) -> &StateLog<BranchState> {
        &self.market
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_happy_path() {
        let mut log = StateLog::new("web_branch", BranchState::NotStarted);
        log.advance(BranchState::Deriving).unwrap();
        log.advance(BranchState::Fetching).unwrap();
        log.advance(BranchState::Done).unwrap();

        assert_eq!(log.current(), BranchState::Done);
        assert_eq!(log.history().len(), 4);
        assert!(log.current().is_terminal());
    }

    #[test]
    fn test_branch_illegal_transitions() {
        let mut log = StateLog::new("market_branch", BranchState::NotStarted);
        let err = log.advance(BranchState::Fetching).unwrap_err();
        assert_eq!(
            err,
            PipelineError::InvalidTransition("market_branch: not_started -> fetching".to_string())
        );

        assert!(!log.fail(), "failed is only reachable once work has started");
        assert_eq!(log.current(), BranchState::NotStarted);
    }

    #[test]
    fn test_branch_failure_from_fetching() {
        let mut log = StateLog::new("market_branch", BranchState::NotStarted);
        log.advance(BranchState::Deriving).unwrap();
        log.advance(BranchState::Fetching).unwrap();
        assert!(log.fail());
        assert_eq!(log.current(), BranchState::Failed);
        assert!(log.advance(BranchState::Done).is_err());
    }

    #[test]
    fn test_pipeline_transitions() {
        use PipelineState::*;

        assert!(BranchesPending.can_transition_to(BranchesComplete));
        assert!(BranchesComplete.can_transition_to(Synthesizing));
        assert!(Synthesizing.can_transition_to(Done));
        assert!(!BranchesPending.can_transition_to(Synthesizing));
        assert!(!Done.can_transition_to(Synthesizing));

        for state in [BranchesPending, BranchesComplete, Synthesizing] {
            assert!(state.can_transition_to(Failed));
        }
        assert!(!Done.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Failed));
    }

    #[test]
    fn test_run_trace_starts_pending() {
        let trace = RunTrace::new();
        assert_eq!(trace.pipeline().current(), PipelineState::BranchesPending);
        assert_eq!(trace.web().current(), BranchState::NotStarted);
        assert_eq!(trace.market().current(), BranchState::NotStarted);
    }

    #[test]
    fn test_state_names() {
        assert_eq!(BranchState::NotStarted.to_string(), "not_started");
        assert_eq!(PipelineState::BranchesComplete.to_string(), "branches_complete");
        assert_eq!(
            serde_json::to_string(&PipelineState::Synthesizing).unwrap(),
            "\"synthesizing\""
        );
    }
}
