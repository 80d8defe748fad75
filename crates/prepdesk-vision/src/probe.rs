//! The frame probe seam.
//!
//! Actual decoding and face detection belong to an external collaborator;
//! the scanner only consumes per-frame measurements. [`SidecarProbe`]
//! ships as the stub implementation for tests and local CLI use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Measurements sampled from one analyzed frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameStats {
    /// Number of faces detected in the frame.
    pub faces: u32,
    /// Mean absolute difference against the previous sampled frame.
    /// None for the first sampled frame.
    #[serde(default)]
    pub motion: Option<f64>,
    /// Mean grayscale brightness (0–255).
    pub brightness: f64,
    /// Laplacian variance; low values indicate blur.
    pub blur: f64,
}

/// Failures when sampling frames from a stored video.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("video file not found: {0}")]
    NotFound(PathBuf),

    #[error("unable to open video for analysis: {0}")]
    Unreadable(String),
}

/// Samples per-frame measurements from a stored video file.
pub trait FrameProbe: Send + Sync {
    fn sample(&self, path: &Path) -> Result<Vec<FrameStats>, ProbeError>;
}

/// Stub probe that reads pre-sampled stats from `<video>.probe.json`
/// next to the video file.
#[derive(Debug, Default)]
pub struct SidecarProbe;

impl FrameProbe for SidecarProbe {
    fn sample(&self, path: &Path) -> Result<Vec<FrameStats>, ProbeError> {
        if !path.exists() {
            return Err(ProbeError::NotFound(path.to_path_buf()));
        }
        let mut sidecar = path.as_os_str().to_os_string();
        sidecar.push(".probe.json");
        let content = std::fs::read_to_string(PathBuf::from(&sidecar))
            .map_err(|e| ProbeError::Unreadable(format!("missing probe sidecar: {e}")))?;
        serde_json::from_str(&content)
            .map_err(|e| ProbeError::Unreadable(format!("invalid probe sidecar: {e}")))
    }
}
