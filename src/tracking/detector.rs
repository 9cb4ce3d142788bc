//! Hand landmark detection via a MediaPipe subprocess.
//!
//! The actual inference is an external capability: a small Python helper
//! (`hand_detect.py`) runs the MediaPipe hand landmarker and speaks a
//! line-oriented protocol over stdin/stdout. Per frame the Rust side
//! writes a 12-byte little-endian (width, height, channels) header plus
//! the raw BGR pixels, and reads back one JSON line listing the detected
//! hands.

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdout, Command, Stdio};

use anyhow::{bail, Context, Result};
use opencv::core::Mat;
use opencv::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::landmark::{HandLandmarks, Landmark, LANDMARK_COUNT};

/// Settings for the external hand landmarker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// At most this many hands are tracked
    pub max_hands: u32,
    /// Minimum confidence for initial detection
    pub detection_confidence: f32,
    /// Minimum confidence for continued tracking
    pub tracking_confidence: f32,
    /// Path to the helper script
    pub script: PathBuf,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_hands: 1,
            detection_confidence: 0.7,
            tracking_confidence: 0.7,
            script: PathBuf::from("hand_detect.py"),
        }
    }
}

#[derive(Deserialize, Debug)]
struct LandmarkWire {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandWire {
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkWire>,
}

#[derive(Deserialize, Debug)]
struct FrameWire {
    hands: Vec<HandWire>,
    #[serde(default)]
    error: Option<String>,
}

/// Driver for the MediaPipe hand landmarker subprocess
pub struct HandDetector {
    process: Child,
    stdout: BufReader<ChildStdout>,
    min_score: f32,
}

impl HandDetector {
    /// Start the helper and wait for its READY handshake.
    ///
    /// Prefers a project-local `.venv` interpreter when one exists, so the
    /// MediaPipe install does not have to be system wide.
    pub fn spawn(config: &DetectorConfig) -> Result<Self> {
        if !config.script.exists() {
            bail!("hand detection script not found at {:?}", config.script);
        }

        let venv_python = PathBuf::from(".venv/bin/python");
        let python = if venv_python.exists() {
            venv_python
        } else {
            PathBuf::from("python3")
        };

        let mut process = Command::new(&python)
            .arg(&config.script)
            .arg("--max-hands")
            .arg(config.max_hands.to_string())
            .arg("--detection-confidence")
            .arg(config.detection_confidence.to_string())
            .arg("--tracking-confidence")
            .arg(config.tracking_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("failed to start hand detector via {:?}", python))?;

        let stdout = process
            .stdout
            .take()
            .context("hand detector has no stdout")?;
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        stdout
            .read_line(&mut ready)
            .context("failed to read hand detector handshake")?;
        if ready.trim() != "READY" {
            bail!("hand detector did not signal READY, got: {ready:?}");
        }

        info!("hand landmark detector ready");

        Ok(Self {
            process,
            stdout,
            min_score: config.detection_confidence,
        })
    }

    /// Run detection on one BGR frame.
    ///
    /// Returns the first hand whose score clears the confidence threshold,
    /// or `None` when no hand is visible.
    pub fn detect(&mut self, frame: &Mat) -> Result<Option<HandLandmarks>> {
        if frame.empty() {
            return Ok(None);
        }

        let width = frame.cols() as u32;
        let height = frame.rows() as u32;
        let channels = frame.channels() as u32;
        let data = frame.data_bytes()?;

        let stdin = self
            .process
            .stdin
            .as_mut()
            .context("hand detector has no stdin")?;
        stdin.write_all(&width.to_le_bytes())?;
        stdin.write_all(&height.to_le_bytes())?;
        stdin.write_all(&channels.to_le_bytes())?;
        stdin.write_all(data)?;
        stdin.flush()?;

        let mut line = String::new();
        self.stdout
            .read_line(&mut line)
            .context("failed to read hand detector response")?;

        parse_detection(&line, self.min_score)
    }
}

impl Drop for HandDetector {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

/// Parse one response line into the best qualifying hand
fn parse_detection(line: &str, min_score: f32) -> Result<Option<HandLandmarks>> {
    let frame: FrameWire = serde_json::from_str(line)
        .with_context(|| format!("malformed hand detector response: {line:?}"))?;

    if let Some(error) = frame.error {
        warn!(error, "hand detector reported an error");
        return Ok(None);
    }

    for hand in frame.hands {
        if hand.score < min_score {
            debug!(score = hand.score, "hand below confidence threshold");
            continue;
        }
        if hand.landmarks.len() != LANDMARK_COUNT {
            warn!(
                got = hand.landmarks.len(),
                "expected {LANDMARK_COUNT} landmarks"
            );
            continue;
        }

        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (slot, wire) in landmarks.iter_mut().zip(&hand.landmarks) {
            *slot = Landmark {
                x: wire.x,
                y: wire.y,
                z: wire.z,
            };
        }

        return Ok(Some(HandLandmarks {
            landmarks,
            confidence: hand.score,
            handedness: hand.handedness,
        }));
    }

    Ok(None)
}
