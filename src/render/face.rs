//! Circular timer face geometry
//!
//! Pure mapping from the countdown numbers to drawable primitives. The
//! rendering surface draws whatever comes out of here; nothing in this
//! module holds state between calls.

use std::f64::consts::PI;

use serde::Serialize;

use crate::state::Phase;

/// Radius of the progress ring, in face units
pub const FACE_RADIUS: f64 = 120.0;
/// Center of the face on both axes
pub const FACE_CENTER: f64 = 150.0;
/// Width and height of the face canvas
pub const FACE_SIZE: f64 = 300.0;
/// Stroke width of the background ring and progress arc
pub const RING_STROKE_WIDTH: f64 = 8.0;
/// Color of the background ring
pub const RING_COLOR: &str = "#E5E7EB";

const MAJOR_MARK_COLOR: &str = "#374151";
const MINOR_MARK_COLOR: &str = "#9CA3AF";

/// Progress and glow colors for one phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub progress: &'static str,
    pub glow: &'static str,
}

/// Alert palette for work intervals
pub const WORK_PALETTE: Palette = Palette {
    progress: "#EF4444",
    glow: "#F87171",
};

/// Calm palette for breaks
pub const BREAK_PALETTE: Palette = Palette {
    progress: "#10B981",
    glow: "#34D399",
};

/// One radial tick mark on the clock face
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickMark {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: &'static str,
    pub stroke_width: f64,
    /// Minute label anchored inside the mark; major marks only
    pub label: Option<MarkLabel>,
}

/// Anchor point and text of a minute label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Everything the rendering surface needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerFace {
    /// Fraction of the current interval already elapsed, in [0, 1]
    pub progress: f64,
    pub circumference: f64,
    /// Dash offset of the progress arc; circumference at 0% progress
    pub dash_offset: f64,
    pub marks: Vec<TickMark>,
    pub minutes_label: String,
    pub seconds_label: String,
    pub palette: Palette,
    /// Pulse the arc while the countdown is live
    pub glow: bool,
}

/// Render the face for the given countdown numbers.
///
/// Callers guarantee `remaining_seconds <= total_duration_seconds` and a
/// positive total; a zero total is still mapped to 0% progress instead
/// of dividing by zero.
pub fn render_face(
    remaining_seconds: u64,
    total_duration_seconds: u64,
    phase: Phase,
    is_running: bool,
) -> TimerFace {
    let progress = if total_duration_seconds == 0 {
        0.0
    } else {
        let elapsed = total_duration_seconds.saturating_sub(remaining_seconds);
        (elapsed as f64 / total_duration_seconds as f64).clamp(0.0, 1.0)
    };

    let circumference = 2.0 * PI * FACE_RADIUS;
    let palette = match phase {
        Phase::Work => WORK_PALETTE,
        Phase::Break => BREAK_PALETTE,
    };

    TimerFace {
        progress,
        circumference,
        dash_offset: circumference * (1.0 - progress),
        marks: clock_marks(total_duration_seconds),
        minutes_label: format!("{:02}", remaining_seconds / 60),
        seconds_label: format!("{:02}", remaining_seconds % 60),
        palette,
        glow: is_running,
    }
}

/// Tick marks laid out as a 60-minute clock face.
///
/// Labels sit every 5 minutes when the face's effective maximum is at
/// most 30 minutes, every 10 otherwise; the face never shrinks below a
/// full hour.
fn clock_marks(total_duration_seconds: u64) -> Vec<TickMark> {
    let effective_max = (total_duration_seconds / 60).max(60);
    let interval = if effective_max <= 30 { 5 } else { 10 };

    let mut marks = Vec::with_capacity(60);

    for minute in (0..effective_max).step_by(interval as usize) {
        let (sin, cos) = minute_angle(minute);
        let label_radius = FACE_RADIUS - 35.0;
        marks.push(TickMark {
            x1: FACE_CENTER + (FACE_RADIUS - 10.0) * cos,
            y1: FACE_CENTER + (FACE_RADIUS - 10.0) * sin,
            x2: FACE_CENTER + (FACE_RADIUS - 20.0) * cos,
            y2: FACE_CENTER + (FACE_RADIUS - 20.0) * sin,
            stroke: MAJOR_MARK_COLOR,
            stroke_width: 2.0,
            label: Some(MarkLabel {
                x: FACE_CENTER + label_radius * cos,
                y: FACE_CENTER + label_radius * sin,
                text: minute.to_string(),
            }),
        });
    }

    for minute in 0..60 {
        if minute % interval == 0 {
            continue;
        }
        let (sin, cos) = minute_angle(minute);
        marks.push(TickMark {
            x1: FACE_CENTER + (FACE_RADIUS - 10.0) * cos,
            y1: FACE_CENTER + (FACE_RADIUS - 10.0) * sin,
            x2: FACE_CENTER + (FACE_RADIUS - 15.0) * cos,
            y2: FACE_CENTER + (FACE_RADIUS - 15.0) * sin,
            stroke: MINOR_MARK_COLOR,
            stroke_width: 1.0,
            label: None,
        });
    }

    marks
}

/// Sine and cosine of a minute position, 12 o'clock first.
fn minute_angle(minute: u64) -> (f64, f64) {
    let degrees = (minute as f64 / 60.0) * 360.0 - 90.0;
    let radians = degrees * PI / 180.0;
    (radians.sin(), radians.cos())
}
