//! Expressive state owned by one avatar instance.
//!
//! Callers never touch the fields directly; every mutation goes through a
//! setter that clamps or tolerates bad input instead of rejecting it. The
//! emotion tag is stored verbatim so the caption always echoes what the
//! caller last set, even for tags the eyebrow pose does not know.

use serde::{Deserialize, Serialize};

/// Emotion tags with a dedicated eyebrow pose. Anything else renders like
/// neutral.
pub const KNOWN_EMOTIONS: [&str; 5] = ["neutral", "happy", "nervous", "thinking", "confident"];

/// The mutable tuple that parameterizes one frame's drawing.
#[derive(Debug, Clone)]
pub struct ExpressiveState {
    talking: bool,
    mouth_amplitude: f32,
    emotion: String,
    gaze: (f32, f32),
}

impl Default for ExpressiveState {
    fn default() -> Self {
        Self {
            talking: false,
            mouth_amplitude: 0.0,
            emotion: "neutral".to_string(),
            gaze: (0.0, 0.0),
        }
    }
}

impl ExpressiveState {
    pub fn set_talking(&mut self, talking: bool) {
        self.talking = talking;
    }

    /// Instantaneous loudness/openness driving mouth size while talking.
    /// Clamped to [0, 1] before storing.
    pub fn set_mouth_amplitude(&mut self, v: f32) {
        self.mouth_amplitude = v.clamp(0.0, 1.0);
    }

    /// Stores the tag verbatim. Unrecognized tags are not an error; they
    /// just pose the eyebrows like neutral.
    pub fn set_emotion(&mut self, tag: impl Into<String>) {
        self.emotion = tag.into();
    }

    /// Pupil drift away from center, each component clamped to [-1, 1].
    /// The renderer scales this into pixels, keeping the pupil inside the
    /// sclera.
    pub fn set_gaze(&mut self, x: f32, y: f32) {
        self.gaze = (x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0));
    }

    pub fn talking(&self) -> bool {
        self.talking
    }

    pub fn mouth_amplitude(&self) -> f32 {
        self.mouth_amplitude
    }

    pub fn emotion(&self) -> &str {
        &self.emotion
    }

    pub fn gaze(&self) -> (f32, f32) {
        self.gaze
    }

    /// Serializable copy of the state for diagnostics and the preview tool.
    pub fn snapshot(&self, frame: u64) -> StateSnapshot {
        StateSnapshot {
            talking: self.talking,
            mouth_amplitude: self.mouth_amplitude,
            emotion: self.emotion.clone(),
            gaze_x: self.gaze.0,
            gaze_y: self.gaze.1,
            frame,
        }
    }
}

/// Point-in-time view of the expressive state plus the frame counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub talking: bool,
    pub mouth_amplitude: f32,
    pub emotion: String,
    pub gaze_x: f32,
    pub gaze_y: f32,
    pub frame: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amplitude_clamped_to_unit_interval() {
        let mut state = ExpressiveState::default();

        state.set_mouth_amplitude(2.5);
        assert_eq!(state.mouth_amplitude(), 1.0);

        state.set_mouth_amplitude(-0.3);
        assert_eq!(state.mouth_amplitude(), 0.0);

        state.set_mouth_amplitude(0.42);
        assert_eq!(state.mouth_amplitude(), 0.42);
    }

    #[test]
    fn emotion_stored_verbatim_even_when_unknown() {
        let mut state = ExpressiveState::default();
        state.set_emotion("unknown-tag");
        assert_eq!(state.emotion(), "unknown-tag");
    }

    #[test]
    fn gaze_clamped_per_component() {
        let mut state = ExpressiveState::default();
        state.set_gaze(3.0, -7.0);
        assert_eq!(state.gaze(), (1.0, -1.0));

        state.set_gaze(-0.5, 0.25);
        assert_eq!(state.gaze(), (-0.5, 0.25));
    }

    #[test]
    fn snapshot_reflects_current_fields() {
        let mut state = ExpressiveState::default();
        state.set_talking(true);
        state.set_mouth_amplitude(0.8);
        state.set_emotion("happy");
        state.set_gaze(0.1, -0.2);

        let snap = state.snapshot(42);
        assert!(snap.talking);
        assert_eq!(snap.mouth_amplitude, 0.8);
        assert_eq!(snap.emotion, "happy");
        assert_eq!(snap.frame, 42);
    }
}
