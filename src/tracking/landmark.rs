//! Hand landmark types, following the MediaPipe 21-point hand convention.

/// Number of landmarks per detected hand
pub const LANDMARK_COUNT: usize = 21;

/// Index of the index fingertip, the point used for steering
pub const INDEX_FINGER_TIP: usize = 8;

/// A single landmark in normalized image coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    /// X, 0.0 to 1.0 across the image width
    pub x: f32,
    /// Y, 0.0 to 1.0 across the image height
    pub y: f32,
    /// Depth relative to the wrist
    pub z: f32,
}

/// One detected hand with all 21 landmarks
#[derive(Clone, Debug)]
pub struct HandLandmarks {
    pub landmarks: [Landmark; LANDMARK_COUNT],
    /// Detector confidence, 0.0 to 1.0
    pub confidence: f32,
    /// "Left" or "Right"
    pub handedness: String,
}

impl HandLandmarks {
    /// Index fingertip position, clamped into the unit square.
    ///
    /// The detector can report landmarks slightly outside the frame when
    /// the finger leaves the field of view; the classifier expects [0,1].
    pub fn index_fingertip(&self) -> (f32, f32) {
        let tip = self.landmarks[INDEX_FINGER_TIP];
        (tip.x.clamp(0.0, 1.0), tip.y.clamp(0.0, 1.0))
    }
}
