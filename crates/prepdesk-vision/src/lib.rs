//! prepdesk-vision — Lightweight heuristic video anomaly scanning.
//!
//! Stateless and entirely separate from the interview session engine: a
//! scan takes a stored video path, samples per-frame measurements through
//! a [`probe::FrameProbe`], and scores face-count, motion, brightness and
//! blur heuristics against fixed thresholds. Deepfake and lip-sync
//! detection require heavier models and stay reserved (always false).

pub mod probe;

use std::path::Path;

use serde::{Deserialize, Serialize};

use probe::{FrameProbe, ProbeError};

/// Mean frame-difference below this suggests a static or replayed feed.
const MOTION_FLOOR: f64 = 5.0;
/// Mean brightness below this counts as too dim.
const BRIGHTNESS_FLOOR: f64 = 40.0;
/// Laplacian variance below this counts as too blurry.
const BLUR_FLOOR: f64 = 20.0;

const MULTI_FACE_PENALTY: f64 = 40.0;
const LIVENESS_PENALTY: f64 = 30.0;
const QUALITY_PENALTY: f64 = 20.0;

/// Boolean anomaly indicators.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyFlags {
    pub multi_face: bool,
    /// Reserved; real deepfake detection needs heavier models.
    pub deepfake_risk: bool,
    pub liveness_issues: bool,
    pub low_quality: bool,
    /// Reserved.
    pub lip_sync_issues: bool,
}

/// Result of one video scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutcome {
    /// Anomaly score in [0, 100]; higher is more suspicious.
    pub anomaly_score: f64,
    pub flags: AnomalyFlags,
    pub summary: String,
}

impl ScanOutcome {
    fn invalid_recording(summary: &str) -> Self {
        ScanOutcome {
            anomaly_score: 100.0,
            flags: AnomalyFlags {
                liveness_issues: true,
                low_quality: true,
                ..Default::default()
            },
            summary: summary.to_string(),
        }
    }
}

/// Scan a stored video for quality and anomaly indicators.
///
/// Never fails: probe errors degrade to a maximum-score outcome with an
/// explanatory summary, because an unreadable recording is itself the
/// anomaly being reported.
pub fn scan(path: &Path, probe: &dyn FrameProbe) -> ScanOutcome {
    let frames = match probe.sample(path) {
        Ok(frames) => frames,
        Err(ProbeError::NotFound(_)) => {
            tracing::warn!(video = %path.display(), "video file not found");
            return ScanOutcome::invalid_recording(
                "Video file not found on server; treating as invalid/low-quality recording.",
            );
        }
        Err(ProbeError::Unreadable(reason)) => {
            tracing::warn!(video = %path.display(), %reason, "video unreadable");
            return ScanOutcome::invalid_recording("Unable to open video file for analysis.");
        }
    };

    if frames.is_empty() {
        return ScanOutcome {
            anomaly_score: 80.0,
            flags: AnomalyFlags {
                liveness_issues: true,
                low_quality: true,
                ..Default::default()
            },
            summary: "No reliable face detections in the recording; candidate may be \
                      off-camera or camera quality is too low."
                .to_string(),
        };
    }

    let max_faces = frames.iter().map(|f| f.faces).max().unwrap_or(0);
    let motions: Vec<f64> = frames.iter().filter_map(|f| f.motion).collect();
    let avg_motion = mean(&motions);
    let avg_brightness = mean(&frames.iter().map(|f| f.brightness).collect::<Vec<_>>());
    let avg_blur = mean(&frames.iter().map(|f| f.blur).collect::<Vec<_>>());

    let multi_face = max_faces >= 2;
    let liveness_issues = avg_motion < MOTION_FLOOR;
    let low_quality = avg_brightness < BRIGHTNESS_FLOOR || avg_blur < BLUR_FLOOR;

    let mut score = 0.0;
    if multi_face {
        score += MULTI_FACE_PENALTY;
    }
    if liveness_issues {
        score += LIVENESS_PENALTY;
    }
    if low_quality {
        score += QUALITY_PENALTY;
    }
    let anomaly_score = score.min(100.0);

    let mut problems = Vec::new();
    if multi_face {
        problems.push("multiple faces detected (possible collaboration)");
    }
    if liveness_issues {
        problems.push("low liveness / limited natural movement");
    }
    if low_quality {
        problems.push("low video quality (blur/lighting issues)");
    }

    let summary = if problems.is_empty() {
        "No significant anomalies detected. Single face detected consistently with \
         natural movement and acceptable video quality."
            .to_string()
    } else {
        format!("Anomaly indicators: {}.", problems.join("; "))
    };

    ScanOutcome {
        anomaly_score,
        flags: AnomalyFlags {
            multi_face,
            deepfake_risk: false,
            liveness_issues,
            low_quality,
            lip_sync_issues: false,
        },
        summary,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
