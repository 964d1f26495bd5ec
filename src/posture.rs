use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// Lower edge of the harmonic band, inclusive.
pub const BAND_FLOOR: f64 = 0.8;
/// Upper edge of the harmonic band, inclusive.
pub const BAND_CEILING: f64 = 1.2;

/// The well-known origin for hard-bound deviation measurement.
/// Read-only for the lifetime of the process.
pub const REFERENCE_POSTURE: PostureTriad = PostureTriad {
    care: 1.0,
    autonomy: 1.0,
    accuracy: 1.0,
};

/// Three-component relational posture vector.
///
/// Components are finite reals; the type itself enforces no range.
/// Range containment is a policy concern, not a construction concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PostureTriad {
    pub care: f64,
    pub autonomy: f64,
    pub accuracy: f64,
}

impl PostureTriad {
    pub const fn new(care: f64, autonomy: f64, accuracy: f64) -> Self {
        Self {
            care,
            autonomy,
            accuracy,
        }
    }

    pub fn norm(&self) -> f64 {
        (self.care * self.care + self.autonomy * self.autonomy + self.accuracy * self.accuracy)
            .sqrt()
    }

    pub fn distance_to(&self, other: &PostureTriad) -> f64 {
        (*self - *other).norm()
    }

    pub fn is_finite(&self) -> bool {
        self.care.is_finite() && self.autonomy.is_finite() && self.accuracy.is_finite()
    }
}

impl Sub for PostureTriad {
    type Output = PostureTriad;

    fn sub(self, rhs: PostureTriad) -> PostureTriad {
        PostureTriad {
            care: self.care - rhs.care,
            autonomy: self.autonomy - rhs.autonomy,
            accuracy: self.accuracy - rhs.accuracy,
        }
    }
}

/// A scored message: posture components plus the scorer's rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostureScore {
    #[serde(flatten)]
    pub triad: PostureTriad,
    pub rationale: String,
}

impl PostureScore {
    pub fn new(care: f64, autonomy: f64, accuracy: f64, rationale: impl Into<String>) -> Self {
        Self {
            triad: PostureTriad::new(care, autonomy, accuracy),
            rationale: rationale.into(),
        }
    }

    pub fn triad(&self) -> PostureTriad {
        self.triad
    }
}

/// Componentwise containment within the fixed band around the reference
/// posture. NaN components fail containment.
pub fn in_harmonic_band(triad: &PostureTriad) -> bool {
    let within = |component: f64| (BAND_FLOOR..=BAND_CEILING).contains(&component);
    within(triad.care) && within(triad.autonomy) && within(triad.accuracy)
}
