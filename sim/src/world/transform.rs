use crate::{
    angle::{coss, degrees_to_turn, sins},
    collision::{Mat3, Vec3},
};

/// Host-facing pose of a movable or placed mesh: position plus euler angles in degrees
/// (pitch, yaw, roll).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransformInput {
    pub position: [f32; 3],
    pub euler_rotation: [f32; 3],
}

/// Pose in turn units plus the per-tick deltas derived from the previous pose.
///
/// Velocities are recomputed on every update as `new - old`; they are never integrated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectTransform {
    pub position: Vec3,
    /// Pitch, yaw, roll.
    pub angle: [i16; 3],
    pub velocity: Vec3,
    pub angle_velocity: [i16; 3],
}

impl ObjectTransform {
    pub fn new(input: &TransformInput) -> Self {
        Self {
            position: Vec3::from(input.position),
            angle: input.euler_rotation.map(degrees_to_turn),
            velocity: Vec3::zeros(),
            angle_velocity: [0; 3],
        }
    }

    /// Move to `input`, recording the change since the last pose.
    pub fn update(&mut self, input: &TransformInput) {
        let position = Vec3::from(input.position);
        let angle = input.euler_rotation.map(degrees_to_turn);

        self.velocity = position - self.position;
        for i in 0..3 {
            self.angle_velocity[i] = angle[i].wrapping_sub(self.angle[i]);
        }
        self.position = position;
        self.angle = angle;
    }

    /// Rotation applying roll, then pitch, then yaw.
    pub fn rotation(&self) -> Mat3 {
        let (sx, cx) = (sins(self.angle[0]), coss(self.angle[0]));
        let (sy, cy) = (sins(self.angle[1]), coss(self.angle[1]));
        let (sz, cz) = (sins(self.angle[2]), coss(self.angle[2]));

        Mat3::new(
            cy * cz + sx * sy * sz,
            -cy * sz + sx * sy * cz,
            cx * sy,
            cx * sz,
            cx * cz,
            -sx,
            -sy * cz + sx * cy * sz,
            sy * sz + sx * cy * cz,
            cx * cy,
        )
    }

    /// Where a point riding this transform ends up after the last update.
    ///
    /// The point is taken relative to the previous position, turned by the yaw
    /// delta, and re-anchored at the current position.
    pub fn carry(&self, point: Vec3) -> Vec3 {
        let previous = self.position - self.velocity;
        let rel = point - previous;

        let yaw = self.angle_velocity[1];
        if yaw == 0 {
            return self.position + rel;
        }

        let (s, c) = (sins(yaw), coss(yaw));
        let rotated = Vec3::new(rel.x * c + rel.z * s, rel.y, rel.z * c - rel.x * s);
        self.position + rotated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(pos: [f32; 3], rot: [f32; 3]) -> TransformInput {
        TransformInput {
            position: pos,
            euler_rotation: rot,
        }
    }

    #[test]
    fn update_derives_velocity_from_the_previous_pose() {
        let mut t = ObjectTransform::new(&input([0.0, 0.0, 0.0], [0.0, 0.0, 0.0]));
        t.update(&input([3.0, -1.0, 2.0], [0.0, 90.0, 0.0]));
        assert_eq!(t.velocity, Vec3::new(3.0, -1.0, 2.0));
        assert_eq!(t.angle_velocity, [0, -0x4000, 0]);

        // Holding still zeroes the deltas again.
        t.update(&input([3.0, -1.0, 2.0], [0.0, 90.0, 0.0]));
        assert_eq!(t.velocity, Vec3::zeros());
        assert_eq!(t.angle_velocity, [0, 0, 0]);
    }

    #[test]
    fn yaw_rotation_agrees_with_facing_convention() {
        // A quarter turn of yaw maps +Z onto +X, the same way facing 0 -> 0x4000 does.
        let mut t = ObjectTransform::new(&input([0.0; 3], [0.0; 3]));
        t.angle = [0, 0x4000, 0];
        let out = t.rotation() * Vec3::new(0.0, 0.0, 100.0);
        assert!((out.x - 100.0).abs() < 1e-3);
        assert!(out.z.abs() < 1e-3);
    }

    #[test]
    fn carry_follows_translation_and_yaw() {
        let mut t = ObjectTransform::new(&input([0.0; 3], [0.0; 3]));
        t.update(&input([10.0, 5.0, 0.0], [0.0; 3]));
        assert_eq!(t.carry(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(11.0, 7.0, 3.0));

        let mut t = ObjectTransform::new(&input([0.0; 3], [0.0; 3]));
        t.angle_velocity = [0, 0x4000, 0];
        let out = t.carry(Vec3::new(0.0, 0.0, 100.0));
        assert!((out.x - 100.0).abs() < 1e-3);
        assert!(out.z.abs() < 1e-3);
    }
}
