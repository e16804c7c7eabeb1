//! Presentation-agnostic state for the setup and remove dialogs.

use crate::screen::SubmitOutcome;

/// Stages of the two-step PIN setup dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    Initial,
    Confirm,
    Success,
}

/// What a setup submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    /// First entry recorded; ask the user to repeat it.
    AwaitingConfirmation,
    /// Confirmation differed; back to the start.
    Mismatch,
    /// Both entries agreed. The caller persists the digits.
    Completed(String),
}

/// Two-step confirmation flow for configuring a new PIN.
///
/// Nothing is persisted here; the flow only decides when an entry has been
/// confirmed and hands the accepted digits back.
#[derive(Debug)]
pub struct SetupFlow {
    stage: SetupStage,
    pending: String,
    mismatch: bool,
}

impl Default for SetupFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupFlow {
    pub fn new() -> Self {
        Self {
            stage: SetupStage::Initial,
            pending: String::new(),
            mismatch: false,
        }
    }

    pub fn stage(&self) -> SetupStage {
        self.stage
    }

    /// True after a failed confirmation, until the next first entry.
    pub fn had_mismatch(&self) -> bool {
        self.mismatch
    }

    pub fn submit(&mut self, pin: &str) -> SetupOutcome {
        match self.stage {
            SetupStage::Initial => {
                self.pending = pin.to_string();
                self.stage = SetupStage::Confirm;
                self.mismatch = false;
                SetupOutcome::AwaitingConfirmation
            }
            SetupStage::Confirm => {
                if pin == self.pending {
                    self.stage = SetupStage::Success;
                    SetupOutcome::Completed(self.pending.clone())
                } else {
                    self.pending.clear();
                    self.stage = SetupStage::Initial;
                    self.mismatch = true;
                    SetupOutcome::Mismatch
                }
            }
            SetupStage::Success => SetupOutcome::Completed(self.pending.clone()),
        }
    }
}

/// Stages of the PIN removal dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveStage {
    Initial,
    Success,
}

/// Removal dialog state. Verification itself runs through the lock screen's
/// removal path so wrong entries spend attempts like any other submission.
#[derive(Debug)]
pub struct RemoveFlow {
    stage: RemoveStage,
}

impl Default for RemoveFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoveFlow {
    pub fn new() -> Self {
        Self {
            stage: RemoveStage::Initial,
        }
    }

    pub fn stage(&self) -> RemoveStage {
        self.stage
    }

    /// Advance the dialog based on what the lock screen reported.
    pub fn note_outcome(&mut self, outcome: &SubmitOutcome) {
        if matches!(outcome, SubmitOutcome::Removed) {
            self.stage = RemoveStage::Success;
        }
    }
}
