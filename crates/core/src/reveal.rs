//! Click/skip pacing for revealing a batch, as an explicit state machine.
//!
//! The presenter pulls [`Cue`]s with [`RevealSequence::next_cue`] and renders
//! each one, waiting between them unless `instant` is set. When the queue
//! runs dry in [`RevealPhase::AwaitingAdvance`] the presenter waits for a
//! click and calls [`RevealSequence::advance`]; [`RevealSequence::skip`] is
//! the cancellation signal. No timing lives here.

use crate::{DrawBatch, Tier};
use std::collections::VecDeque;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Idle,
    AwaitingAdvance,
    Presenting,
    Skipping,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    Gate,
    Highlight { slot: usize },
    ShowTier { slot: usize, tier: Tier },
    /// High tiers show the quote before the name.
    ShowQuote { slot: usize },
    ShowItem { slot: usize },
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue {
    pub step: RevealStep,
    pub instant: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevealError {
    #[error("cannot {action} while {phase:?}")]
    InvalidPhase {
        action: &'static str,
        phase: RevealPhase,
    },
}

#[derive(Debug, Clone)]
struct SlotPlan {
    stages: &'static [Tier],
    stop_auto_skip: bool,
    staged_quote: bool,
}

#[derive(Debug, Clone)]
pub struct RevealSequence {
    slots: Vec<SlotPlan>,
    phase: RevealPhase,
    next_slot: Option<usize>,
    pending: VecDeque<RevealStep>,
    skip_all: bool,
}

impl RevealSequence {
    pub fn new(batch: &DrawBatch) -> Self {
        let slots = batch
            .results
            .iter()
            .map(|result| SlotPlan {
                stages: result.promotion.map(|path| path.stages()).unwrap_or(&[]),
                stop_auto_skip: result.stop_auto_skip,
                staged_quote: result.true_tier >= Tier::MidUpper,
            })
            .collect();
        Self {
            slots,
            phase: RevealPhase::Idle,
            next_slot: None,
            pending: VecDeque::new(),
            skip_all: false,
        }
    }

    /// With `skip_all` a skip runs to the end instead of pausing on
    /// high-value slots.
    pub fn with_skip_all(mut self, skip_all: bool) -> Self {
        self.skip_all = skip_all;
        self
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == RevealPhase::Done
    }

    pub fn start(&mut self) -> Result<(), RevealError> {
        self.expect_phase("start", &[RevealPhase::Idle])?;
        self.phase = RevealPhase::Presenting;
        self.pending.push_back(RevealStep::Gate);
        if !self.slots.is_empty() {
            self.pending.push_back(RevealStep::Highlight { slot: 0 });
            self.next_slot = Some(0);
        }
        Ok(())
    }

    pub fn advance(&mut self) -> Result<(), RevealError> {
        self.expect_phase("advance", &[RevealPhase::AwaitingAdvance])?;
        self.phase = RevealPhase::Presenting;
        if let Some(slot) = self.next_slot {
            self.queue_reveal(slot);
        }
        Ok(())
    }

    pub fn skip(&mut self) -> Result<(), RevealError> {
        self.expect_phase(
            "skip",
            &[
                RevealPhase::AwaitingAdvance,
                RevealPhase::Presenting,
                RevealPhase::Skipping,
            ],
        )?;
        let awaiting = self.phase == RevealPhase::AwaitingAdvance;
        self.phase = RevealPhase::Skipping;
        if awaiting {
            if let Some(slot) = self.next_slot {
                self.queue_reveal(slot);
            }
        }
        Ok(())
    }

    /// Next cue to render. `None` means wait for input (or that the
    /// sequence is idle or done).
    pub fn next_cue(&mut self) -> Option<Cue> {
        loop {
            if let Some(step) = self.pending.pop_front() {
                return Some(Cue {
                    step,
                    instant: self.phase == RevealPhase::Skipping,
                });
            }
            match self.phase {
                RevealPhase::Idle | RevealPhase::AwaitingAdvance | RevealPhase::Done => {
                    return None
                }
                RevealPhase::Presenting | RevealPhase::Skipping => {
                    let skipping = self.phase == RevealPhase::Skipping;
                    match self.next_slot {
                        Some(slot) if skipping => self.queue_reveal(slot),
                        Some(_) => {
                            self.phase = RevealPhase::AwaitingAdvance;
                            return None;
                        }
                        None => {
                            self.phase = RevealPhase::Done;
                            return Some(Cue {
                                step: RevealStep::Finished,
                                instant: skipping,
                            });
                        }
                    }
                }
            }
        }
    }

    fn queue_reveal(&mut self, slot: usize) {
        let Some(plan) = self.slots.get(slot) else {
            self.next_slot = None;
            return;
        };
        if self.phase == RevealPhase::Skipping && plan.stop_auto_skip && !self.skip_all {
            self.phase = RevealPhase::Presenting;
        }
        for &tier in plan.stages {
            self.pending.push_back(RevealStep::ShowTier { slot, tier });
        }
        if plan.staged_quote {
            self.pending.push_back(RevealStep::ShowQuote { slot });
        }
        self.pending.push_back(RevealStep::ShowItem { slot });
        let next = slot + 1;
        if next < self.slots.len() {
            self.pending.push_back(RevealStep::Highlight { slot: next });
            self.next_slot = Some(next);
        } else {
            self.next_slot = None;
        }
    }

    fn expect_phase(
        &self,
        action: &'static str,
        allowed: &[RevealPhase],
    ) -> Result<(), RevealError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(RevealError::InvalidPhase {
                action,
                phase: self.phase,
            })
        }
    }
}
