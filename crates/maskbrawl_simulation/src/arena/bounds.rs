//! Круглая арена: проверка и clamp позиций

use bevy::prelude::*;

/// Resource: границы арены (круг в плоскости XZ)
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    pub center: Vec3,
    pub radius: f32,
}

impl ArenaBounds {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// На границе или дальше
    pub fn is_out_of_bounds(&self, position: Vec3) -> bool {
        self.center.distance(position) >= self.radius
    }

    /// Позиция внутри круга — без изменений, иначе точка на окружности
    /// в том же направлении от центра
    pub fn clamp_position_in_bounds(&self, position: Vec3) -> Vec3 {
        if !self.is_out_of_bounds(position) {
            return position;
        }
        self.center + (position - self.center).clamp_length_max(self.radius)
    }

    /// Половина арены: true — "верхняя" (z > center.z)
    pub fn is_on_top_side(&self, position: Vec3) -> bool {
        position.z > self.center.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_position_unchanged() {
        let bounds = ArenaBounds::new(Vec3::ZERO, 8.0);
        let position = Vec3::new(3.0, 0.0, -2.0);

        assert!(!bounds.is_out_of_bounds(position));
        assert_eq!(bounds.clamp_position_in_bounds(position), position);
    }

    #[test]
    fn test_outside_position_clamped_to_circle() {
        let bounds = ArenaBounds::new(Vec3::new(1.0, 0.0, 1.0), 5.0);
        let position = Vec3::new(11.0, 0.0, 1.0);

        let clamped = bounds.clamp_position_in_bounds(position);

        assert!((clamped - Vec3::new(6.0, 0.0, 1.0)).length() < 1e-5);
        assert!(clamped.distance(bounds.center) <= bounds.radius + 1e-5);
    }

    #[test]
    fn test_sides_split_at_center_z() {
        let bounds = ArenaBounds::new(Vec3::new(0.0, 0.0, 2.0), 8.0);

        assert!(bounds.is_on_top_side(Vec3::new(0.0, 0.0, 2.5)));
        assert!(!bounds.is_on_top_side(Vec3::new(0.0, 0.0, 2.0)));
        assert!(!bounds.is_on_top_side(Vec3::new(5.0, 0.0, -1.0)));
    }
}
