//! Pipeline steps and their legal transitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The active step. Single source of truth for which UI is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Step {
    Input,
    Analyzing,
    AnalysisResult,
    Preferences,
    Generating,
    Preview,
}

impl Step {
    /// Check whether moving from `self` to `to` is allowed.
    ///
    /// Forward edges follow the flow; backward edges exist only for failure
    /// recovery, so ANALYSIS_RESULT is re-entered only when generation fails. Returning to [`Step::Input`] for a fresh run is handled by
    /// `Pipeline::reset`, not by this table.
    pub fn can_transition_to(self, to: Self) -> bool {
        use Step::{AnalysisResult, Analyzing, Generating, Input, Preferences, Preview};

        matches!(
            (self, to),
            (Input, Analyzing)
                | (Analyzing, AnalysisResult | Input)
                | (AnalysisResult, Preferences | Generating)
                | (Preferences, Generating)
                | (Generating, Preview | Preferences | AnalysisResult)
        )
    }

    /// Whether the step is waiting on the backend.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Analyzing | Self::Generating)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Input => "INPUT",
            Self::Analyzing => "ANALYZING",
            Self::AnalysisResult => "ANALYSIS_RESULT",
            Self::Preferences => "PREFERENCES",
            Self::Generating => "GENERATING",
            Self::Preview => "PREVIEW",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Step; 6] = [
        Step::Input,
        Step::Analyzing,
        Step::AnalysisResult,
        Step::Preferences,
        Step::Generating,
        Step::Preview,
    ];

    #[test]
    fn test_happy_paths() {
        assert!(Step::Input.can_transition_to(Step::Analyzing));
        assert!(Step::Analyzing.can_transition_to(Step::AnalysisResult));
        assert!(Step::AnalysisResult.can_transition_to(Step::Preferences));
        assert!(Step::AnalysisResult.can_transition_to(Step::Generating));
        assert!(Step::Preferences.can_transition_to(Step::Generating));
        assert!(Step::Generating.can_transition_to(Step::Preview));
    }

    #[test]
    fn test_preview_is_terminal() {
        for to in ALL {
            assert!(!Step::Preview.can_transition_to(to), "PREVIEW -> {to}");
        }
    }

    #[test]
    fn test_analysis_result_only_from_analyzing_or_failure() {
        let sources: Vec<_> =
            ALL.into_iter().filter(|s| s.can_transition_to(Step::AnalysisResult)).collect();
        assert_eq!(sources, vec![Step::Analyzing, Step::Generating]);
    }

    #[test]
    fn test_preferences_cannot_step_back_without_failure() {
        assert!(!Step::Preferences.can_transition_to(Step::AnalysisResult));
        assert!(!Step::Preferences.can_transition_to(Step::Input));
    }

    #[test]
    fn test_preview_only_from_generating() {
        let sources: Vec<_> =
            ALL.into_iter().filter(|s| s.can_transition_to(Step::Preview)).collect();
        assert_eq!(sources, vec![Step::Generating]);
    }

    #[test]
    fn test_no_skipping_forward() {
        assert!(!Step::Input.can_transition_to(Step::Generating));
        assert!(!Step::Analyzing.can_transition_to(Step::Preview));
        assert!(!Step::Input.can_transition_to(Step::Input));
    }

    #[test]
    fn test_display() {
        assert_eq!(Step::AnalysisResult.to_string(), "ANALYSIS_RESULT");
    }
}
