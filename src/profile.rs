//! Six-waypoint depth/time synthesis.
//!
//! Turns the two summary scalars into a plottable piecewise-linear trace:
//! descend over the first fifth of the dive, hold the bottom, start the
//! ascent, pause at the shallow stop, surface on the final label. A display
//! and estimation aid only; the deco rules never read it.

use crate::models::DiveProfile;

/// Number of waypoints in a synthesized trace.
const WAYPOINTS: usize = 6;

/// Depth of the precautionary shallow stop near the end of the dive (metres).
const SHALLOW_STOP_M: f64 = 5.0;

/// Synthesize the discretized trace for a dive summary.
///
/// Always produces exactly [`WAYPOINTS`] depth/time pairs, starting and
/// ending at the surface, with the final label encoding `duration` minutes.
/// A zero-length dive collapses every label to `00:00`.
pub fn synthesize(max_depth: f64, duration: f64) -> DiveProfile {
    let interval = if duration > 0.0 {
        duration / (WAYPOINTS - 1) as f64
    } else {
        0.0
    };
    let shallow_stop = SHALLOW_STOP_M.min(max_depth);

    let waypoints = [
        (0.0, 0.0),
        (interval, max_depth),
        (interval * 3.0, max_depth),
        (interval * 4.0, max_depth),
        (interval * 5.0, shallow_stop),
        (duration, 0.0),
    ];

    let mut depth_data = Vec::with_capacity(WAYPOINTS);
    let mut time_data = Vec::with_capacity(WAYPOINTS);
    for (time, depth) in waypoints {
        time_data.push(format_mm_ss(time));
        depth_data.push(depth);
    }

    DiveProfile {
        depth_data,
        time_data,
    }
}

/// Render fractional minutes as a zero-padded `mm:ss` label.
fn format_mm_ss(minutes: f64) -> String {
    let mut whole = minutes.floor() as u32;
    let mut seconds = ((minutes - minutes.floor()) * 60.0).round() as u32;
    if seconds == 60 {
        whole += 1;
        seconds = 0;
    }
    format!("{whole:02}:{seconds:02}")
}
