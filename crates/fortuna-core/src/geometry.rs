//! Sector geometry for the wheel.
//!
//! Sectors are derived, never stored: a wheel with `n` participants is
//! divided into `n` equal angular slices, and sector `i` corresponds 1:1
//! to the participant at index `i` in the snapshot taken at spin time.
//!
//! The renderer draws sectors starting at the pointer reference (the
//! fixed on-screen indicator at 12 o'clock, which is -90 degrees in the
//! SVG coordinate frame), so sector 0 sits under the pointer before any
//! rotation has been applied. All functions here are pure.

/// One full turn of the wheel, in degrees.
pub const FULL_TURN_DEGREES: f64 = 360.0;

/// Angular position of the pointer in the renderer's coordinate frame
/// (12 o'clock). Sector boundaries are laid out starting from here.
pub const POINTER_OFFSET_DEGREES: f64 = -90.0;

/// Return the angular width of one sector for a wheel of `sector_count`
/// participants. A wheel with no participants has no sectors, so the
/// width is 0.
#[allow(clippy::cast_precision_loss)] // realistic sector counts are tiny
pub fn sector_angle_degrees(sector_count: usize) -> f64 {
    if sector_count == 0 {
        0.0
    } else {
        FULL_TURN_DEGREES / sector_count as f64
    }
}

/// Wrap any real angle into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN_DEGREES);
    // rem_euclid of a tiny negative value can round to exactly 360.0.
    if wrapped >= FULL_TURN_DEGREES {
        0.0
    } else {
        wrapped
    }
}

/// Return the index of the sector containing `angle_from_pointer`, an
/// angle measured clockwise from the pointer reference (0 = pointer).
///
/// Idempotent modulo 360: adding any whole number of turns to the angle
/// does not change the result. Returns `None` when the wheel has no
/// sectors. Floating-point rounding at an exact sector boundary is
/// clamped into `[0, sector_count - 1]`.
pub fn sector_index_at(angle_from_pointer: f64, sector_count: usize) -> Option<usize> {
    if sector_count == 0 {
        return None;
    }
    let sector_angle = sector_angle_degrees(sector_count);
    let normalized = normalize_degrees(angle_from_pointer);
    // normalized / sector_angle lies in [0, sector_count), so the floor
    // fits in usize; the min() guards boundary rounding.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (normalized / sector_angle).floor() as usize;
    Some(index.min(sector_count.saturating_sub(1)))
}

/// Return the index of the sector sitting under the pointer after the
/// wheel has turned by `cumulative_rotation` degrees (clockwise).
///
/// Inverts the rotation: the sector under the pointer now is the sector
/// that was originally drawn at `pointer - rotation`, re-based into the
/// sector-boundary convention (boundaries start at the pointer).
pub fn sector_under_pointer(cumulative_rotation: f64, sector_count: usize) -> Option<usize> {
    let final_angle = normalize_degrees(cumulative_rotation);
    let original_position = normalize_degrees(POINTER_OFFSET_DEGREES - final_angle);
    let angle_from_pointer = normalize_degrees(original_position - POINTER_OFFSET_DEGREES);
    sector_index_at(angle_from_pointer, sector_count)
}
