//! Pure state-to-geometry mappings for one frame of the face.
//!
//! Everything here is a function of the expressive state and the frame
//! counter, in pixel units. The renderer calls these; tests pin the exact
//! values.

/// Vertical eyebrow offset for an emotion tag, in pixels. Negative raises
/// the brows. Unrecognized tags pose like neutral.
pub fn eyebrow_offset(emotion: &str) -> f32 {
    match emotion {
        "happy" => -4.0,
        "nervous" => 6.0,
        "thinking" => -2.0,
        "confident" => -6.0,
        _ => 0.0,
    }
}

/// Outer mouth aperture in pixels. While talking the aperture is driven by
/// amplitude; at rest it sits at a small fixed opening.
pub fn mouth_aperture(talking: bool, amplitude: f32) -> f32 {
    if talking {
        10.0 + amplitude * 22.0
    } else {
        6.0
    }
}

/// Height of the inner (darker) mouth ellipse for a given outer aperture.
pub fn inner_mouth_height(aperture: f32) -> f32 {
    (aperture - 6.0).max(4.0)
}

/// Vertical drop of the inner mouth ellipse below the lip center, so the
/// cavity appears to recede as the aperture grows.
pub fn inner_mouth_drop(aperture: f32) -> f32 {
    (aperture * 0.3).max(3.0)
}

/// Horizontal pupil wobble for the given frame. The amplitude couples to
/// the talking flag so the character reads as more animated while
/// speaking, independent of any caller-driven gaze offset.
pub fn pupil_wobble(frame: u64, talking: bool) -> f32 {
    let amplitude = if talking { 2.0 } else { 0.6 };
    ((frame as f64 * 0.08).sin() as f32) * amplitude
}
