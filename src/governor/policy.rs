use serde::{Deserialize, Serialize};

use crate::posture::{self, PostureScore, PostureTriad, REFERENCE_POSTURE};

fn default_dominance_ceiling() -> f64 {
    1.0
}

fn default_support_floor() -> f64 {
    0.85
}

fn default_max_target_distance() -> f64 {
    0.5
}

fn default_seeking_threshold() -> f64 {
    1.0
}

fn default_coherence_floor() -> f64 {
    0.9
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyThresholds {
    /// A component above this value counts as dominant and needs
    /// support from its paired component.
    #[serde(default = "default_dominance_ceiling")]
    pub dominance_ceiling: f64,
    /// Minimum paired-component value under a dominant component.
    #[serde(default = "default_support_floor")]
    pub support_floor: f64,
    /// Maximum Euclidean distance from the adaptive target, inclusive.
    #[serde(default = "default_max_target_distance")]
    pub max_target_distance: f64,
    /// An input component above this value counts as actively sought.
    #[serde(default = "default_seeking_threshold")]
    pub seeking_threshold: f64,
    /// Minimum output component when the same component was sought.
    #[serde(default = "default_coherence_floor")]
    pub coherence_floor: f64,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            dominance_ceiling: default_dominance_ceiling(),
            support_floor: default_support_floor(),
            max_target_distance: default_max_target_distance(),
            seeking_threshold: default_seeking_threshold(),
            coherence_floor: default_coherence_floor(),
        }
    }
}

/// Verdict of one policy evaluation.
///
/// Every rejection carries the deviation used as the learning signal.
/// Hard-bound rejections measure deviation from `REFERENCE_POSTURE`;
/// the other three measure it from the adaptive target, matching the
/// observed behavior of the system this one replaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyOutcome {
    Accepted,
    RejectedHardBound { deviation: PostureTriad },
    RejectedTension { deviation: PostureTriad },
    RejectedProximity { deviation: PostureTriad, distance: f64 },
    RejectedCoherence { deviation: PostureTriad },
}

impl PolicyOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn deviation(&self) -> Option<PostureTriad> {
        match self {
            Self::Accepted => None,
            Self::RejectedHardBound { deviation }
            | Self::RejectedTension { deviation }
            | Self::RejectedProximity { deviation, .. }
            | Self::RejectedCoherence { deviation } => Some(*deviation),
        }
    }

    pub fn failure_reason(&self, candidate: &PostureTriad) -> Option<String> {
        match self {
            Self::Accepted => None,
            Self::RejectedHardBound { .. } => Some(format!(
                "out of harmonic band: [{:.2}, {:.2}, {:.2}]",
                candidate.care, candidate.autonomy, candidate.accuracy
            )),
            Self::RejectedTension { .. } => Some(format!(
                "geometric tension violated: [{:.2}, {:.2}, {:.2}]",
                candidate.care, candidate.autonomy, candidate.accuracy
            )),
            Self::RejectedProximity { distance, .. } => {
                Some(format!("too far from target ({distance:.2})"))
            }
            Self::RejectedCoherence { .. } => {
                Some("semantic coherence with the request failed".to_string())
            }
        }
    }
}

/// Layered acceptance checks over a candidate posture, applied in
/// fixed order with early exit on the first failure. Each check is a
/// pure function of its arguments.
#[derive(Debug, Clone, Default)]
pub struct AcceptancePolicy {
    thresholds: PolicyThresholds,
}

impl AcceptancePolicy {
    pub fn new(thresholds: PolicyThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &PolicyThresholds {
        &self.thresholds
    }

    pub fn evaluate(
        &self,
        candidate: &PostureScore,
        target: &PostureTriad,
        input: &PostureScore,
    ) -> PolicyOutcome {
        let v = candidate.triad();

        if !posture::in_harmonic_band(&v) {
            return PolicyOutcome::RejectedHardBound {
                deviation: v - REFERENCE_POSTURE,
            };
        }

        if !self.tension_holds(&v) {
            return PolicyOutcome::RejectedTension {
                deviation: v - *target,
            };
        }

        let distance = v.distance_to(target);
        if distance > self.thresholds.max_target_distance {
            return PolicyOutcome::RejectedProximity {
                deviation: v - *target,
                distance,
            };
        }

        if !self.coherence_holds(&v, &input.triad()) {
            return PolicyOutcome::RejectedCoherence {
                deviation: v - *target,
            };
        }

        PolicyOutcome::Accepted
    }

    /// No component may dominate without support from its paired
    /// component: autonomy needs accuracy, accuracy needs care, care
    /// needs autonomy.
    pub fn tension_holds(&self, v: &PostureTriad) -> bool {
        let t = &self.thresholds;

        if v.autonomy > t.dominance_ceiling && v.accuracy < t.support_floor {
            return false;
        }
        if v.accuracy > t.dominance_ceiling && v.care < t.support_floor {
            return false;
        }
        if v.care > t.dominance_ceiling && v.autonomy < t.support_floor {
            return false;
        }

        true
    }

    /// Cross-check against the input posture, not the target: a
    /// component the requester actively sought must not collapse in
    /// the response.
    pub fn coherence_holds(&self, output: &PostureTriad, input: &PostureTriad) -> bool {
        let t = &self.thresholds;

        if input.accuracy > t.seeking_threshold && output.accuracy < t.coherence_floor {
            return false;
        }
        if input.care > t.seeking_threshold && output.care < t.coherence_floor {
            return false;
        }

        true
    }
}
