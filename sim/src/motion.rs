// NOTE: Small "move toward" helpers shared by the action handlers.
//
// Keep this file focused on scalar/angle approach math; geometry lives in
// `collision` and per-action behavior in `action`.

/// Move `current` toward `target` by at most `inc` going up or `dec` going down.
/// Never overshoots.
#[inline]
pub fn approach_f32(current: f32, target: f32, inc: f32, dec: f32) -> f32 {
    if current < target {
        (current + inc).min(target)
    } else {
        (current - dec).max(target)
    }
}

/// Symmetric form of [`approach_f32`].
#[inline]
pub fn approach_f32_symmetric(current: f32, target: f32, step: f32) -> f32 {
    approach_f32(current, target, step, step)
}

/// Turn `current` toward `target` by at most `step` turn units, taking the
/// short way around.
#[inline]
pub fn approach_angle(current: i16, target: i16, step: i16) -> i16 {
    let diff = target.wrapping_sub(current);
    let step = step.max(0);
    if diff > 0 {
        if diff > step {
            current.wrapping_add(step)
        } else {
            target
        }
    } else if diff < -step {
        current.wrapping_sub(step)
    } else {
        target
    }
}
