//! Aim vectors for both sides
//!
//! Enemies shoot straight at where the player is now. The player's shots lead
//! the target by adding its current velocity to the aim. That is not a true
//! intercept solution and can make bullets faster than the nominal speed.

use glam::Vec2;

/// Velocity of magnitude `speed` pointing from `from` to `to`.
///
/// None when the two points coincide (no direction).
pub fn aim_vector(from: Vec2, to: Vec2, speed: f32) -> Option<Vec2> {
    (to - from).try_normalize().map(|dir| dir * speed)
}

/// Aim at `target_pos` and add the target's velocity
pub fn lead_aim(from: Vec2, target_pos: Vec2, target_vel: Vec2, speed: f32) -> Option<Vec2> {
    aim_vector(from, target_pos, speed).map(|aim| aim + target_vel)
}
