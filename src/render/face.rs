//! The frame painter: one call renders the whole face from a state
//! snapshot plus the frame counter.
//!
//! Layer order matters and mirrors the layout the caption/eyebrow anchors
//! assume: background wash, head disc, neck, torso silhouette, hair, eyes,
//! mouth, eyebrows, caption. All geometry hangs off the head center at
//! (w/2, h/2 - 40).

use tiny_skia::{
    Color, FillRule, GradientStop, LinearGradient, Paint, PathBuilder, Pixmap, Point,
    RadialGradient, Rect, SpreadMode, Stroke, Transform,
};

use crate::avatar::expression;
use crate::avatar::state::ExpressiveState;
use crate::render::caption;

pub const HEAD_RADIUS: f32 = 72.0;

const EYE_SPACING: f32 = 26.0;
const EYE_RAISE: f32 = 18.0;
const SCLERA_RX: f32 = 14.0;
const SCLERA_RY: f32 = 10.0;
const EYELID_HALF_WIDTH: f32 = 12.0;
const PUPIL_RADIUS: f32 = 5.0;
const GAZE_SCALE_X: f32 = 6.0;
const GAZE_SCALE_Y: f32 = 3.0;
const MOUTH_DROP: f32 = 26.0;
const MOUTH_RX: f32 = 22.0;
const INNER_MOUTH_RX: f32 = 14.0;
const BROW_RAISE: f32 = 34.0;

const SKIN_LIGHT: (u8, u8, u8) = (255, 217, 182);
const SKIN_SHADE: (u8, u8, u8) = (240, 160, 96);
const NECK: (u8, u8, u8) = (230, 176, 135);
const TORSO: (u8, u8, u8) = (102, 126, 234);
const HAIR: (u8, u8, u8) = (64, 43, 74);
const LIP: (u8, u8, u8) = (90, 46, 46);
const INNER_MOUTH: (u8, u8, u8) = (52, 21, 21);
const CAPTION: (u8, u8, u8) = (68, 68, 68);

/// Render one complete frame of the avatar.
pub fn draw_frame(pixmap: &mut Pixmap, state: &ExpressiveState, blinking: bool, frame: u64) {
    let w = pixmap.width() as f32;
    let h = pixmap.height() as f32;
    pixmap.fill(Color::TRANSPARENT);
    draw_background(pixmap, w, h);

    let center_x = w / 2.0;
    let center_y = h / 2.0 - 40.0;

    draw_head(pixmap, center_x, center_y);
    draw_neck(pixmap, center_x, center_y);
    draw_torso(pixmap, center_x, center_y);
    draw_hair(pixmap, center_x, center_y);

    let eye_y = center_y - EYE_RAISE;
    draw_eye(pixmap, center_x - EYE_SPACING, eye_y, state, blinking, frame);
    draw_eye(pixmap, center_x + EYE_SPACING, eye_y, state, blinking, frame);

    let aperture = expression::mouth_aperture(state.talking(), state.mouth_amplitude());
    draw_mouth(pixmap, center_x, center_y + MOUTH_DROP, aperture);

    draw_eyebrows(pixmap, center_x, center_y - BROW_RAISE, state.emotion());

    caption::draw_caption(
        pixmap,
        &state.emotion().to_uppercase(),
        center_x,
        center_y + HEAD_RADIUS + 100.0,
        CAPTION,
    );
}

fn solid(rgb: (u8, u8, u8), alpha: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgb.0, rgb.1, rgb.2, alpha);
    paint.anti_alias = true;
    paint
}

fn fill_ellipse(pixmap: &mut Pixmap, cx: f32, cy: f32, rx: f32, ry: f32, paint: &Paint) {
    if let Some(rect) = Rect::from_xywh(cx - rx, cy - ry, rx * 2.0, ry * 2.0) {
        if let Some(path) = PathBuilder::from_oval(rect) {
            pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
        }
    }
}

fn fill_circle(pixmap: &mut Pixmap, cx: f32, cy: f32, r: f32, paint: &Paint) {
    if let Some(path) = PathBuilder::from_circle(cx, cy, r) {
        pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
    }
}

/// Soft vertical wash behind the figure.
fn draw_background(pixmap: &mut Pixmap, w: f32, h: f32) {
    let stops = vec![
        GradientStop::new(0.0, Color::from_rgba8(102, 126, 234, 15)),
        GradientStop::new(1.0, Color::from_rgba8(240, 147, 251, 8)),
    ];
    let Some(shader) = LinearGradient::new(
        Point::from_xy(0.0, 0.0),
        Point::from_xy(0.0, h),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    ) else {
        return;
    };
    let mut paint = Paint::default();
    paint.shader = shader;
    if let Some(rect) = Rect::from_xywh(0.0, 0.0, w, h) {
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

/// Radially shaded disc, lit from the upper left.
fn draw_head(pixmap: &mut Pixmap, cx: f32, cy: f32) {
    let stops = vec![
        GradientStop::new(0.0, Color::from_rgba8(SKIN_LIGHT.0, SKIN_LIGHT.1, SKIN_LIGHT.2, 255)),
        GradientStop::new(1.0, Color::from_rgba8(SKIN_SHADE.0, SKIN_SHADE.1, SKIN_SHADE.2, 255)),
    ];
    let paint = match RadialGradient::new(
        Point::from_xy(cx - 20.0, cy - 20.0),
        Point::from_xy(cx, cy),
        HEAD_RADIUS,
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    ) {
        Some(shader) => {
            let mut paint = Paint::default();
            paint.shader = shader;
            paint.anti_alias = true;
            paint
        }
        None => solid(SKIN_SHADE, 255),
    };
    fill_circle(pixmap, cx, cy, HEAD_RADIUS, &paint);
}

fn draw_neck(pixmap: &mut Pixmap, cx: f32, cy: f32) {
    if let Some(rect) = Rect::from_xywh(cx - 22.0, cy + HEAD_RADIUS - 10.0, 44.0, 26.0) {
        pixmap.fill_rect(rect, &solid(NECK, 255), Transform::identity(), None);
    }
}

/// Shoulders-and-chest silhouette: a single quadratic arc closed across
/// the shoulder line.
fn draw_torso(pixmap: &mut Pixmap, cx: f32, cy: f32) {
    let shoulder_y = cy + HEAD_RADIUS + 16.0;
    let mut pb = PathBuilder::new();
    pb.move_to(cx - 90.0, shoulder_y);
    pb.quad_to(cx, cy + HEAD_RADIUS + 120.0, cx + 90.0, shoulder_y);
    pb.close();
    if let Some(path) = pb.finish() {
        pixmap.fill_path(
            &path,
            &solid(TORSO, 255),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}

/// Upper half of an ellipse sitting across the brow line.
fn draw_hair(pixmap: &mut Pixmap, cx: f32, cy: f32) {
    // Cubic circle-arc approximation constant.
    const KAPPA: f32 = 0.552_284_8;
    let (hy, rx, ry) = (cy - 18.0, HEAD_RADIUS * 0.95, HEAD_RADIUS * 0.6);
    let mut pb = PathBuilder::new();
    pb.move_to(cx - rx, hy);
    pb.cubic_to(
        cx - rx,
        hy - ry * KAPPA,
        cx - rx * KAPPA,
        hy - ry,
        cx,
        hy - ry,
    );
    pb.cubic_to(
        cx + rx * KAPPA,
        hy - ry,
        cx + rx,
        hy - ry * KAPPA,
        cx + rx,
        hy,
    );
    pb.close();
    if let Some(path) = pb.finish() {
        pixmap.fill_path(
            &path,
            &solid(HAIR, 255),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}

/// One eye. While blinking only the closed lid is drawn; otherwise the
/// pupil sits at anchor + scaled gaze + the talking-coupled wobble, with a
/// specular highlight up-and-left of it.
fn draw_eye(
    pixmap: &mut Pixmap,
    x: f32,
    y: f32,
    state: &ExpressiveState,
    blinking: bool,
    frame: u64,
) {
    fill_ellipse(pixmap, x, y, SCLERA_RX, SCLERA_RY, &solid((255, 255, 255), 255));

    if blinking {
        let mut pb = PathBuilder::new();
        pb.move_to(x - EYELID_HALF_WIDTH, y);
        pb.line_to(x + EYELID_HALF_WIDTH, y);
        if let Some(path) = pb.finish() {
            let stroke = Stroke {
                width: 3.0,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &solid(HAIR, 255), &stroke, Transform::identity(), None);
        }
        return;
    }

    let (gaze_x, gaze_y) = state.gaze();
    let px = x + gaze_x * GAZE_SCALE_X + expression::pupil_wobble(frame, state.talking());
    let py = y + gaze_y * GAZE_SCALE_Y;

    fill_circle(pixmap, px, py, PUPIL_RADIUS, &solid((17, 17, 17), 255));
    fill_circle(pixmap, px - 2.0, py - 2.0, 1.6, &solid((255, 255, 255), 178));
}

/// Outer lips plus the darker cavity that recedes as the aperture grows.
fn draw_mouth(pixmap: &mut Pixmap, cx: f32, y: f32, aperture: f32) {
    fill_ellipse(pixmap, cx, y, MOUTH_RX, aperture, &solid(LIP, 255));
    fill_ellipse(
        pixmap,
        cx,
        y + expression::inner_mouth_drop(aperture),
        INNER_MOUTH_RX,
        expression::inner_mouth_height(aperture),
        &solid(INNER_MOUTH, 255),
    );
}

/// Two mirrored quadratic strokes, shifted vertically by the emotion pose.
fn draw_eyebrows(pixmap: &mut Pixmap, cx: f32, y: f32, emotion: &str) {
    let offset = expression::eyebrow_offset(emotion);
    let y = y + offset;

    let mut pb = PathBuilder::new();
    pb.move_to(cx - 34.0, y);
    pb.quad_to(cx - 20.0, y - 4.0, cx - 6.0, y);
    pb.move_to(cx + 34.0, y);
    pb.quad_to(cx + 20.0, y - 4.0, cx + 6.0, y);

    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width: 4.0,
            line_cap: tiny_skia::LineCap::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &solid(HAIR, 255), &stroke, Transform::identity(), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pixmap() -> Pixmap {
        Pixmap::new(200, 240).unwrap()
    }

    fn channel(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let px = pixmap.pixel(x, y).unwrap();
        (px.red(), px.green(), px.blue(), px.alpha())
    }

    #[test]
    fn head_center_is_skin_toned() {
        let mut pixmap = test_pixmap();
        draw_frame(&mut pixmap, &ExpressiveState::default(), false, 1);

        // Head center: (100, 80) for a 200x240 surface.
        let (r, _g, b, a) = channel(&pixmap, 100, 80);
        assert_eq!(a, 255);
        assert!(r > 200, "expected a warm skin tone, red was {}", r);
        assert!(b < r, "skin should be warmer than blue, {} vs {}", b, r);
    }

    #[test]
    fn open_eye_shows_pupil_blink_hides_it() {
        let state = ExpressiveState::default();

        // Just above the left eye center (74, 62): inside the pupil when
        // open, plain sclera when the lid line covers only the center row.
        let mut open = test_pixmap();
        draw_frame(&mut open, &state, false, 1);
        let (r_open, ..) = channel(&open, 74, 59);
        assert!(r_open < 100, "pupil should be dark, red was {}", r_open);

        let mut closed = test_pixmap();
        draw_frame(&mut closed, &state, true, 1);
        let (r_closed, ..) = channel(&closed, 74, 59);
        assert!(r_closed > 200, "sclera should show while blinking, red was {}", r_closed);
    }

    #[test]
    fn gaze_moves_the_pupil() {
        let mut left = ExpressiveState::default();
        left.set_gaze(-1.0, 0.0);
        let mut looking_left = test_pixmap();
        draw_frame(&mut looking_left, &left, false, 1);

        // Pupil center shifted 6px left of the eye anchor.
        let (r, ..) = channel(&looking_left, 68, 62);
        assert!(r < 100, "pupil should sit left of anchor, red was {}", r);
        let (r_anchor_right, ..) = channel(&looking_left, 78, 62);
        assert!(r_anchor_right > 200, "right side of sclera should be bare");
    }

    #[test]
    fn talking_widens_the_mouth() {
        let mut talking = ExpressiveState::default();
        talking.set_talking(true);
        talking.set_mouth_amplitude(1.0);

        // 14px above the mouth center: inside a 32px-tall open mouth,
        // outside a 6px resting one.
        let mut loud = test_pixmap();
        draw_frame(&mut loud, &talking, false, 1);
        let (_, _, b_loud, a_loud) = channel(&loud, 100, 92);
        assert_eq!(a_loud, 255);
        assert!(b_loud < 100, "open mouth should cover this pixel");

        let mut quiet = test_pixmap();
        draw_frame(&mut quiet, &ExpressiveState::default(), false, 1);
        let (r_quiet, ..) = channel(&quiet, 100, 92);
        assert!(r_quiet > 200, "resting mouth should leave skin here, red was {}", r_quiet);
    }

    #[test]
    fn unknown_emotion_draws_like_neutral_brows() {
        let mut neutral = test_pixmap();
        draw_frame(&mut neutral, &ExpressiveState::default(), false, 1);

        // Only the caption text could differ between the two tags, and it
        // renders far below the brow band checked here.
        let mut unknown_state = ExpressiveState::default();
        unknown_state.set_emotion("mystified");
        let mut unknown = test_pixmap();
        draw_frame(&mut unknown, &unknown_state, false, 1);

        let brow_band_equal = (30..170).all(|x| {
            (40..56).all(|y| neutral.pixel(x, y).unwrap() == unknown.pixel(x, y).unwrap())
        });
        assert!(brow_band_equal, "unknown tag must not move the eyebrows");
    }

    #[test]
    fn caption_band_carries_dark_text() {
        let mut pixmap = Pixmap::new(360, 420).unwrap();
        let mut state = ExpressiveState::default();
        state.set_emotion("happy");
        draw_frame(&mut pixmap, &state, false, 1);

        // Caption baseline: h/2 - 40 + 72 + 100 = 342.
        let mut dark_pixels = 0;
        for y in 330..344 {
            for x in 0..360 {
                let px = pixmap.pixel(x, y).unwrap();
                if px.alpha() > 0 && px.red() < 120 && px.green() < 120 && px.blue() < 120 {
                    dark_pixels += 1;
                }
            }
        }
        assert!(dark_pixels > 20, "caption glyphs missing, found {} dark pixels", dark_pixels);
    }
}
