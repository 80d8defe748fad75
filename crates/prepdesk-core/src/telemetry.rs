//! Delivery telemetry accumulation and the derived delivery scalar.
//!
//! Samples stream in while a question is current and are folded into one
//! [`TelemetrySample`] per question. Accumulation is best-effort: updates
//! may race submission reads for the same question (see `session`), and a
//! sample arriving after the cursor has moved lands on the new current
//! question. Accepted feedback-latency limitation, not a bug.

use serde::{Deserialize, Serialize};

/// Weights of the delivery composite. Must sum to 1.0.
const PACE_WEIGHT: f64 = 0.30;
const FILLER_WEIGHT: f64 = 0.30;
const EYE_WEIGHT: f64 = 0.25;
const ENGAGEMENT_WEIGHT: f64 = 0.15;

/// Accumulated delivery signals for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Words-per-minute observations, full history (no decay, no window).
    pub pace_readings: Vec<f64>,
    /// Monotonically increasing filler-word count.
    pub filler_count: u32,
    /// Eye-contact percentages (0–100), full history.
    pub eye_contact_samples: Vec<f64>,
    /// Running mean of `eye_contact_samples`, recomputed on each sample.
    pub eye_contact_duration: f64,
    /// Facial engagement in [0, 1]. Last write wins, not averaged.
    pub engagement_score: f64,
}

impl Default for TelemetrySample {
    fn default() -> Self {
        Self {
            pace_readings: Vec::new(),
            filler_count: 0,
            eye_contact_samples: Vec::new(),
            eye_contact_duration: 0.0,
            engagement_score: 0.5,
        }
    }
}

/// A partial telemetry update: any subset of the fields may be present.
/// Missing fields are simply not applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleUpdate {
    /// A words-per-minute observation.
    #[serde(default)]
    pub pace: Option<f64>,
    /// Increment to the filler-word count.
    #[serde(default)]
    pub filler_increment: Option<u32>,
    /// An eye-contact percentage observation (0–100).
    #[serde(default)]
    pub eye_contact: Option<f64>,
    /// Facial engagement value, clamped into [0, 1] on write.
    #[serde(default)]
    pub engagement: Option<f64>,
}

impl SampleUpdate {
    /// Returns `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        self.pace.is_none()
            && self.filler_increment.is_none()
            && self.eye_contact.is_none()
            && self.engagement.is_none()
    }
}

impl TelemetrySample {
    /// Fold a partial update into the sample. Never fails.
    pub fn apply(&mut self, update: &SampleUpdate) {
        if let Some(pace) = update.pace {
            self.pace_readings.push(pace);
        }
        if let Some(inc) = update.filler_increment {
            self.filler_count = self.filler_count.saturating_add(inc);
        }
        if let Some(eye) = update.eye_contact {
            self.eye_contact_samples.push(eye);
            self.eye_contact_duration = self.eye_contact_samples.iter().sum::<f64>()
                / self.eye_contact_samples.len() as f64;
        }
        if let Some(engagement) = update.engagement {
            self.engagement_score = engagement.clamp(0.0, 1.0);
        }
    }

    /// Mean pace across all readings; 0.0 when none were recorded.
    pub fn avg_pace(&self) -> f64 {
        if self.pace_readings.is_empty() {
            0.0
        } else {
            self.pace_readings.iter().sum::<f64>() / self.pace_readings.len() as f64
        }
    }

    /// Reduce the sample to the delivery scalar in [0, 1].
    ///
    /// Pace peaks at 135 WPM with a linear falloff and a 0.2 floor; at or
    /// beyond the 60/200 clamp points the norm is pinned to 0.2. Ten or
    /// more fillers zero the filler component.
    pub fn delivery_score(&self) -> f64 {
        let avg_pace = self.avg_pace();
        let pace_norm = if avg_pace <= 60.0 || avg_pace >= 200.0 {
            0.2
        } else {
            (1.0 - (avg_pace - 135.0).abs() / 75.0).max(0.2)
        };
        let filler_norm = (1.0 - (f64::from(self.filler_count) / 10.0).min(1.0)).max(0.0);
        let eye_norm = self.eye_contact_duration / 100.0;

        PACE_WEIGHT * pace_norm
            + FILLER_WEIGHT * filler_norm
            + EYE_WEIGHT * eye_norm
            + ENGAGEMENT_WEIGHT * self.engagement_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_with_pace(pace: f64) -> TelemetrySample {
        let mut s = TelemetrySample::default();
        s.apply(&SampleUpdate {
            pace: Some(pace),
            ..Default::default()
        });
        s
    }

    #[test]
    fn pace_norm_boundaries() {
        // Extract the pace component by zeroing everything else out.
        let norm = |pace: f64| {
            let mut s = sample_with_pace(pace);
            s.engagement_score = 0.0;
            s.filler_count = 10; // filler_norm = 0
            (s.delivery_score() / PACE_WEIGHT * 1e9).round() / 1e9
        };
        assert_eq!(norm(135.0), 1.0);
        assert_eq!(norm(60.0), 0.2);
        assert_eq!(norm(200.0), 0.2);
        assert_eq!(norm(30.0), 0.2);
        assert_eq!(norm(0.0), 0.2);
    }

    #[test]
    fn default_sample_reduces_to_known_value() {
        // pace 0 -> 0.2, fillers 0 -> 1.0, eye 0 -> 0, engagement 0.5
        let score = TelemetrySample::default().delivery_score();
        assert!((score - 0.435).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn delivery_score_bounded_for_valid_inputs() {
        let mut s = TelemetrySample::default();
        for pace in [0.0, 30.0, 135.0, 260.0] {
            s.apply(&SampleUpdate {
                pace: Some(pace),
                filler_increment: Some(3),
                eye_contact: Some(100.0),
                engagement: Some(1.0),
                ..Default::default()
            });
            let score = s.delivery_score();
            assert!((0.0..=1.0).contains(&score), "out of range: {score}");
        }
    }

    #[test]
    fn eye_contact_is_a_running_mean() {
        let mut s = TelemetrySample::default();
        for eye in [80.0, 60.0, 70.0] {
            s.apply(&SampleUpdate {
                eye_contact: Some(eye),
                ..Default::default()
            });
        }
        assert!((s.eye_contact_duration - 70.0).abs() < 1e-9);
    }

    #[test]
    fn engagement_last_write_wins_and_clamps() {
        let mut s = TelemetrySample::default();
        s.apply(&SampleUpdate {
            engagement: Some(0.9),
            ..Default::default()
        });
        s.apply(&SampleUpdate {
            engagement: Some(1.7),
            ..Default::default()
        });
        assert_eq!(s.engagement_score, 1.0);
        s.apply(&SampleUpdate {
            engagement: Some(0.2),
            ..Default::default()
        });
        assert_eq!(s.engagement_score, 0.2);
    }

    #[test]
    fn filler_count_is_monotone() {
        let mut s = TelemetrySample::default();
        s.apply(&SampleUpdate {
            filler_increment: Some(4),
            ..Default::default()
        });
        s.apply(&SampleUpdate {
            filler_increment: Some(3),
            ..Default::default()
        });
        assert_eq!(s.filler_count, 7);
    }

    #[test]
    fn empty_update_is_a_noop() {
        let mut s = TelemetrySample::default();
        let before = s.clone();
        assert!(SampleUpdate::default().is_empty());
        s.apply(&SampleUpdate::default());
        assert_eq!(s.pace_readings, before.pace_readings);
        assert_eq!(s.filler_count, before.filler_count);
        assert_eq!(s.engagement_score, before.engagement_score);
    }
}
