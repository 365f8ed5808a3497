use serde::{Deserialize, Serialize};

/// The two independent recommendation strategies
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    History,
    Preference,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::History => write!(f, "history"),
            Strategy::Preference => write!(f, "preference"),
        }
    }
}

/// One strategy's view of the user's taste
///
/// Targets and importance weights are aligned with the normalization table's
/// feature order. A zero importance weight excludes that feature from
/// scoring for this profile. Produced fresh per run, never mutated after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub strategy: Strategy,
    /// Normalized target value per feature
    pub targets: Vec<f64>,
    /// Importance weight per feature; 0.0 means ignored
    pub weights: Vec<f64>,
}

impl Profile {
    pub fn new(strategy: Strategy, targets: Vec<f64>, weights: Vec<f64>) -> Self {
        debug_assert_eq!(targets.len(), weights.len());
        Self {
            strategy,
            targets,
            weights,
        }
    }

    /// Number of features with non-zero importance
    pub fn active_features(&self) -> usize {
        self.weights.iter().filter(|w| **w > 0.0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_serialization() {
        assert_eq!(
            serde_json::to_string(&Strategy::History).unwrap(),
            "\"history\""
        );
        assert_eq!(
            serde_json::to_string(&Strategy::Preference).unwrap(),
            "\"preference\""
        );
    }

    #[test]
    fn test_active_features() {
        let profile = Profile::new(Strategy::Preference, vec![0.5, 0.0, 1.0], vec![1.0, 0.0, 2.0]);
        assert_eq!(profile.active_features(), 2);
    }
}
