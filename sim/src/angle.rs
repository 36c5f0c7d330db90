//! Fixed-point turn-unit math.
//!
//! - A full turn is `0x10000`; angles are stored as `i16` and wrap naturally.
//! - `sins(a)` follows the X axis and `coss(a)` the Z axis, so a facing angle
//!   of 0 points down +Z and 0x4000 points down +X.
//! - Differences are always taken with `wrapping_sub` on `i16` so comparisons
//!   stay correct across the +/-0x8000 seam.
//!
//! The sine table is built once per process on first use.

use std::f32::consts::PI;
use std::sync::OnceLock;

/// Number of entries in the sine lookup table (one per 16 turn units).
const TABLE_SIZE: usize = 0x1000;

static SINE_TABLE: OnceLock<Box<[f32; TABLE_SIZE]>> = OnceLock::new();

fn sine_table() -> &'static [f32; TABLE_SIZE] {
    SINE_TABLE.get_or_init(|| {
        let mut table = Box::new([0.0f32; TABLE_SIZE]);
        for (i, v) in table.iter_mut().enumerate() {
            *v = (i as f32 * 2.0 * PI / TABLE_SIZE as f32).sin();
        }
        table
    })
}

/// Build the shared lookup tables. Safe to call any number of times.
pub fn warm_tables() {
    let _ = sine_table();
}

/// Whether the shared lookup tables have been built yet.
pub fn tables_ready() -> bool {
    SINE_TABLE.get().is_some()
}

#[inline]
pub fn sins(angle: i16) -> f32 {
    sine_table()[((angle as u16) >> 4) as usize]
}

#[inline]
pub fn coss(angle: i16) -> f32 {
    sins(angle.wrapping_add(0x4000))
}

/// Angle of the vector (`x`, `y`) measured from the `y` axis toward the `x` axis.
///
/// Called as `atan2s(z, x)` this gives the facing angle that points along
/// (`x`, `z`), consistent with [`sins`]/[`coss`].
#[inline]
pub fn atan2s(y: f32, x: f32) -> i16 {
    if x == 0.0 && y == 0.0 {
        return 0;
    }
    let radians = x.atan2(y);
    radians_to_turn(radians)
}

#[inline]
pub fn radians_to_turn(radians: f32) -> i16 {
    let units = (radians / PI * 32768.0).round() as i64;
    (units as u16) as i16
}

#[inline]
pub fn turn_to_radians(angle: i16) -> f32 {
    angle as f32 / 32768.0 * PI
}

/// Signed shortest difference `a - b` in turn units.
#[inline]
pub fn angle_diff(a: i16, b: i16) -> i16 {
    a.wrapping_sub(b)
}

/// Host-side euler degrees to turn units. The sign flips to match the
/// handedness of the turn-unit rotation convention.
#[inline]
pub fn degrees_to_turn(degrees: f32) -> i16 {
    ((-degrees / 180.0 * 32768.0) as i32) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_and_cosine_hit_the_cardinal_points() {
        assert!(sins(0).abs() < 1e-6);
        assert!((sins(0x4000) - 1.0).abs() < 1e-6);
        assert!((coss(0) - 1.0).abs() < 1e-6);
        assert!((coss(-0x8000) + 1.0).abs() < 1e-6);
        assert!(tables_ready());
    }

    #[test]
    fn atan2s_matches_sins_coss_convention() {
        // Facing down +X.
        assert_eq!(atan2s(0.0, 1.0), 0x4000);
        // Facing down +Z.
        assert_eq!(atan2s(1.0, 0.0), 0);
        // Facing down -Z wraps to the half-turn.
        assert_eq!(atan2s(-1.0, 0.0) as u16, 0x8000);
        assert_eq!(atan2s(0.0, -1.0), -0x4000);
    }

    #[test]
    fn angle_diff_wraps_across_the_seam() {
        assert_eq!(angle_diff(0x7000, -0x7000), -0x2000);
        assert_eq!(angle_diff(-0x7000, 0x7000), 0x2000);
    }

    #[test]
    fn radian_conversions_agree() {
        assert!((turn_to_radians(0x4000) - PI / 2.0).abs() < 1e-6);
        assert_eq!(radians_to_turn(PI / 2.0), 0x4000);
        assert_eq!(degrees_to_turn(90.0), -0x4000);
    }
}
