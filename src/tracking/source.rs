//! The hand signal source: webcam capture, landmark detection and
//! direction publishing, on a dedicated thread.
//!
//! The loop is free-running and never synchronizes with the game tick.
//! The only shared state is a bounded direction channel (newest signal is
//! dropped when the game lags) and the shutdown flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{bail, Context, Result};
use opencv::prelude::*;
use opencv::{core, highgui, imgproc, videoio};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info};

use super::classifier;
use super::detector::{DetectorConfig, HandDetector};
use crate::game::Direction;

/// Capacity of the direction signal channel. Two slots ride out a slow
/// tick without letting stale gestures pile up.
pub const SIGNAL_CAPACITY: usize = 2;

const PREVIEW_WINDOW: &str = "Hand Tracking";

/// Settings for the capture side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Camera device index
    pub camera_index: i32,
    /// Show the tracking preview window
    pub show_preview: bool,
    pub detector: DetectorConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            show_preview: true,
            detector: DetectorConfig::default(),
        }
    }
}

/// Owns the camera, the detector and the producing end of the signal
/// channel
pub struct HandSignalSource {
    camera: videoio::VideoCapture,
    detector: HandDetector,
    tx: mpsc::Sender<Direction>,
    shutdown: Arc<AtomicBool>,
    show_preview: bool,
    last_published: Option<Direction>,
}

impl HandSignalSource {
    /// Open the camera and start the detector subprocess.
    ///
    /// All fallible setup happens here, on the caller's thread, so a
    /// missing camera or detector is fatal at startup rather than a
    /// silent dead capture loop.
    pub fn open(
        config: &TrackerConfig,
        shutdown: Arc<AtomicBool>,
    ) -> Result<(Self, mpsc::Receiver<Direction>)> {
        let camera = videoio::VideoCapture::new(config.camera_index, videoio::CAP_ANY)
            .with_context(|| format!("failed to open camera {}", config.camera_index))?;
        if !camera.is_opened()? {
            bail!("camera {} could not be opened", config.camera_index);
        }

        let detector = HandDetector::spawn(&config.detector)?;
        let (tx, rx) = mpsc::channel(SIGNAL_CAPACITY);

        Ok((
            Self {
                camera,
                detector,
                tx,
                shutdown,
                show_preview: config.show_preview,
                last_published: None,
            },
            rx,
        ))
    }

    /// Run the capture loop on its own thread until the shutdown flag is
    /// set
    pub fn spawn(self) -> JoinHandle<()> {
        thread::spawn(move || {
            if let Err(err) = self.run() {
                error!("hand tracking loop failed: {err:#}");
            }
        })
    }

    fn run(mut self) -> Result<()> {
        info!("hand tracking started");
        let mut frame = core::Mat::default();

        while !self.shutdown.load(Ordering::Relaxed) {
            let grabbed = match self.camera.read(&mut frame) {
                Ok(grabbed) => grabbed,
                Err(err) => {
                    debug!("camera read failed: {err}");
                    false
                }
            };
            if !grabbed || frame.empty() {
                // not fatal, retry on the next iteration
                continue;
            }

            // mirror so moving the hand left moves the cursor left
            let mut mirrored = core::Mat::default();
            core::flip(&frame, &mut mirrored, 1)?;

            let mut tip = None;
            if let Some(hand) = self.detector.detect(&mirrored)? {
                let (x, y) = hand.index_fingertip();
                tip = Some((x, y));

                if let Some(direction) = classifier::classify(x, y) {
                    if offer(&self.tx, direction) {
                        self.last_published = Some(direction);
                        debug!(direction = direction.as_str(), "direction signal published");
                    }
                }
            }

            if self.show_preview {
                self.draw_preview(&mirrored, tip)?;
            }
        }

        self.release()
    }

    /// Debug visualization: tracked fingertip, threshold gridlines and the
    /// last published direction on a black canvas
    fn draw_preview(&self, frame: &core::Mat, tip: Option<(f32, f32)>) -> Result<()> {
        let (width, height) = (frame.cols(), frame.rows());
        let mut canvas = core::Mat::zeros(height, width, frame.typ())?.to_mat()?;

        let green = core::Scalar::new(0.0, 255.0, 0.0, 0.0);
        let gray = core::Scalar::new(64.0, 64.0, 64.0, 0.0);
        let white = core::Scalar::new(255.0, 255.0, 255.0, 0.0);

        if let Some((x, y)) = tip {
            let center = core::Point::new((x * width as f32) as i32, (y * height as f32) as i32);
            imgproc::circle(&mut canvas, center, 5, green, imgproc::FILLED, imgproc::LINE_8, 0)?;
        }

        let left = (classifier::LEFT_THRESHOLD * width as f32) as i32;
        let right = (classifier::RIGHT_THRESHOLD * width as f32) as i32;
        let up = (classifier::UP_THRESHOLD * height as f32) as i32;
        let down = (classifier::DOWN_THRESHOLD * height as f32) as i32;

        for x in [left, right] {
            imgproc::line(
                &mut canvas,
                core::Point::new(x, 0),
                core::Point::new(x, height),
                gray,
                1,
                imgproc::LINE_8,
                0,
            )?;
        }
        for y in [up, down] {
            imgproc::line(
                &mut canvas,
                core::Point::new(0, y),
                core::Point::new(width, y),
                gray,
                1,
                imgproc::LINE_8,
                0,
            )?;
        }

        if let Some(direction) = self.last_published {
            imgproc::put_text(
                &mut canvas,
                &format!("Direction: {}", direction.as_str()),
                core::Point::new(10, 30),
                imgproc::FONT_HERSHEY_SIMPLEX,
                1.0,
                white,
                2,
                imgproc::LINE_8,
                false,
            )?;
        }

        highgui::imshow(PREVIEW_WINDOW, &canvas)?;
        // pump the highgui event loop; keys here are ignored, the game
        // loop owns all input
        highgui::wait_key(1)?;

        Ok(())
    }

    fn release(mut self) -> Result<()> {
        self.camera
            .release()
            .context("failed to release the camera")?;
        if self.show_preview {
            let _ = highgui::destroy_all_windows();
        }
        info!("hand tracking stopped");
        Ok(())
    }
}

/// Publish a direction without ever blocking the capture loop.
///
/// Returns false when the signal was dropped: a full channel means the
/// game has not drained its input yet, and the freshest gesture loses.
fn offer(tx: &mpsc::Sender<Direction>, direction: Direction) -> bool {
    match tx.try_send(direction) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => false,
        Err(TrySendError::Closed(_)) => false,
    }
}
