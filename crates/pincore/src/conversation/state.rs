use std::fmt;

/// Where a user's latest interaction stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FlowState {
    #[default]
    Idle,
    AwaitingClassification,
    AwaitingExtraction,
    PresentingOptions,
    Downloading,
    Delivered,
    Failed,
}

impl FlowState {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowState::Idle => "idle",
            FlowState::AwaitingClassification => "awaiting_classification",
            FlowState::AwaitingExtraction => "awaiting_extraction",
            FlowState::PresentingOptions => "presenting_options",
            FlowState::Downloading => "downloading",
            FlowState::Delivered => "delivered",
            FlowState::Failed => "failed",
        }
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
