//! Movement intent компонент

use bevy::prelude::*;

/// Намерение движения бойца (Move(vector) для презентации)
///
/// Заполняется player input или AI, применяется movement системой.
/// `blend` — сглаженный MoveX/MoveY для walk blend tree (и направление рывка).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementIntent {
    /// Желаемое направление (XZ плоскость, не обязательно normalized)
    pub direction: Vec3,
    /// Сглаженный blend: x = MoveX, y = MoveY (ось Z мира)
    pub blend: Vec2,
}

impl MovementIntent {
    pub fn planar_direction(&self) -> Vec3 {
        Vec3::new(self.direction.x, 0.0, self.direction.z).normalize_or_zero()
    }

    /// Сгладить blend к текущему направлению (lerp factor = speed × dt)
    pub fn smooth_blend(&mut self, speed: f32, delta: f32) {
        let target = Vec2::new(self.direction.x, self.direction.z);
        let t = (speed * delta).clamp(0.0, 1.0);
        self.blend = self.blend.lerp(target, t);
    }

    /// Направление рывка = текущий blend в мировых координатах
    pub fn dash_direction(&self) -> Vec3 {
        Vec3::new(self.blend.x, 0.0, self.blend.y)
    }

    /// Сброс blend (hurt reaction обнуляет MoveX/MoveY)
    pub fn reset_blend(&mut self) {
        self.blend = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_converges_to_direction() {
        let mut intent = MovementIntent {
            direction: Vec3::new(1.0, 0.0, 0.0),
            ..default()
        };

        for _ in 0..200 {
            intent.smooth_blend(10.0, 1.0 / 64.0);
        }

        assert!((intent.blend.x - 1.0).abs() < 0.01);
        assert!(intent.blend.y.abs() < 0.01);
        assert!((intent.dash_direction() - Vec3::X).length() < 0.01);
    }

    #[test]
    fn test_planar_direction_drops_vertical() {
        let intent = MovementIntent {
            direction: Vec3::new(0.0, 5.0, 2.0),
            ..default()
        };
        assert_eq!(intent.planar_direction(), Vec3::Z);
    }
}
