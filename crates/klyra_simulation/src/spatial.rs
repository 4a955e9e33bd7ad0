//! Spatial queries (контракт с host physics)
//!
//! Core не владеет коллизиями: host реализует `SpatialQuery` поверх своего
//! physics world и кладёт его в `SpatialQueries` resource. По умолчанию:
//! плоская земля без коллайдеров (headless симуляция, тесты).

use bevy::prelude::*;

/// Host collision queries
pub trait SpatialQuery: Send + Sync {
    /// Все entity с коллайдерами, пересекающими сферу (порядок не гарантирован)
    fn overlap_sphere(&self, center: Vec3, radius: f32, out: &mut Vec<Entity>);

    /// Есть ли попадание луча в пределах `max_distance` (ground check)
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool;

    /// Высота земли под точкой (для встроенного kinematic motor)
    fn ground_height(&self, _position: Vec3) -> Option<f32> {
        None
    }
}

/// Бесконечная горизонтальная плоскость на заданной высоте
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatGround {
    pub height: f32,
}

impl SpatialQuery for FlatGround {
    fn overlap_sphere(&self, _center: Vec3, _radius: f32, _out: &mut Vec<Entity>) {}

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool {
        // Плоскость ловит только лучи вниз
        if direction.y >= 0.0 {
            return false;
        }
        let distance = (origin.y - self.height) / -direction.y;
        (0.0..=max_distance).contains(&distance)
    }

    fn ground_height(&self, _position: Vec3) -> Option<f32> {
        Some(self.height)
    }
}

/// Resource: активная реализация spatial queries
#[derive(Resource)]
pub struct SpatialQueries(pub Box<dyn SpatialQuery>);

impl Default for SpatialQueries {
    fn default() -> Self {
        Self(Box::new(FlatGround::default()))
    }
}

impl SpatialQueries {
    pub fn new(query: impl SpatialQuery + 'static) -> Self {
        Self(Box::new(query))
    }
}

impl std::ops::Deref for SpatialQueries {
    type Target = dyn SpatialQuery;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
