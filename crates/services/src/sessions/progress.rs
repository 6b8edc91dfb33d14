use vocab_core::model::QuizMode;

/// Where the session state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No pool or no mode chosen yet.
    #[default]
    Idle,
    /// `position < total`.
    Active,
    /// Every item has been answered; only restart leaves this phase.
    Finished,
}

/// Aggregated view of session progress, published after every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub phase: SessionPhase,
    pub mode: Option<QuizMode>,
    pub position: usize,
    pub total: usize,
    pub session_correct: usize,
}

impl SessionProgress {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    /// Items answered so far, never above `total`.
    #[must_use]
    pub fn answered(&self) -> usize {
        self.position.min(self.total)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.position)
    }

    /// Session score as a rounded percentage of the pool size.
    #[must_use]
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.session_correct * 100 + self.total / 2) / self.total
    }
}
