//! Внешние сервисы, которые симуляция потребляет (line-of-sight, навигация).
//!
//! Хост (движок, редактор, тесты) подставляет свою реализацию через resource.
//! В комплекте: простые headless реализации без физики и navmesh.

use bevy::math::bounding::{Aabb3d, BoundingSphere, RayCast3d};
use bevy::prelude::*;
use rand::RngCore;

use super::geometry::random_point_in_disc;

/// Line-of-sight запрос: видит ли origin цель в пределах max_distance
///
/// Cast идёт из origin в сторону target; успех только если первым попадается
/// сама цель (любое препятствие ближе цели блокирует обзор).
pub trait LineOfSight: Send + Sync {
    fn can_see(&self, origin: Vec3, target: Vec3, max_distance: f32) -> bool;
}

/// Навигация: поиск достижимой точки рядом с center
pub trait Navigation: Send + Sync {
    fn find_reachable_point(&self, center: Vec3, radius: f32, rng: &mut dyn RngCore) -> Option<Vec3>;
}

/// Пустой мир: препятствий нет, видно всё в радиусе
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSight;

impl LineOfSight for OpenSight {
    fn can_see(&self, origin: Vec3, target: Vec3, max_distance: f32) -> bool {
        origin.distance(target) <= max_distance
    }
}

/// Статическое препятствие для line-of-sight
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Obstacle {
    Sphere { center: Vec3, radius: f32 },
    /// Axis-aligned box (стены, колонны)
    Box { center: Vec3, half_size: Vec3 },
}

impl Obstacle {
    fn hit_distance(&self, ray: &RayCast3d) -> Option<f32> {
        match *self {
            Obstacle::Sphere { center, radius } => {
                ray.sphere_intersection_at(&BoundingSphere::new(center, radius))
            }
            Obstacle::Box { center, half_size } => {
                ray.aabb_intersection_at(&Aabb3d::new(center, half_size))
            }
        }
    }
}

/// Набор препятствий + analytic ray cast
#[derive(Debug, Clone, Default)]
pub struct ObstacleField {
    pub obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self { obstacles }
    }

    pub fn with(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }
}

impl LineOfSight for ObstacleField {
    fn can_see(&self, origin: Vec3, target: Vec3, max_distance: f32) -> bool {
        let offset = target - origin;
        let distance = offset.length();

        if distance > max_distance {
            return false;
        }

        // Цель вплотную: кастовать нечего
        let Ok(direction) = Dir3::new(offset) else {
            return true;
        };

        let ray = RayCast3d::new(origin, direction, max_distance);
        !self
            .obstacles
            .iter()
            .filter_map(|obstacle| obstacle.hit_distance(&ray))
            .any(|hit| hit < distance)
    }
}

/// Плоская навигация: случайная точка в круге, опционально внутри walkable rect (XZ)
#[derive(Debug, Clone, Default)]
pub struct FlatNavigation {
    /// Walkable область по XZ (None: весь мир проходим)
    pub walkable: Option<Rect>,
}

impl FlatNavigation {
    /// Сколько раз пробуем сэмплить точку прежде чем сдаться
    pub const MAX_ATTEMPTS: usize = 8;

    pub fn bounded(walkable: Rect) -> Self {
        Self { walkable: Some(walkable) }
    }

    fn is_walkable(&self, point: Vec3) -> bool {
        self.walkable
            .map(|rect| rect.contains(Vec2::new(point.x, point.z)))
            .unwrap_or(true)
    }
}

impl Navigation for FlatNavigation {
    fn find_reachable_point(&self, center: Vec3, radius: f32, rng: &mut dyn RngCore) -> Option<Vec3> {
        (0..Self::MAX_ATTEMPTS)
            .map(|_| random_point_in_disc(rng, center, radius))
            .find(|point| self.is_walkable(*point))
    }
}

/// Resource: активная реализация line-of-sight
#[derive(Resource)]
pub struct SightService(pub Box<dyn LineOfSight>);

impl Default for SightService {
    fn default() -> Self {
        Self(Box::new(OpenSight))
    }
}

impl SightService {
    pub fn new(sight: impl LineOfSight + 'static) -> Self {
        Self(Box::new(sight))
    }
}

/// Resource: активная реализация навигации
#[derive(Resource)]
pub struct NavigationService(pub Box<dyn Navigation>);

impl Default for NavigationService {
    fn default() -> Self {
        Self(Box::new(FlatNavigation::default()))
    }
}

impl NavigationService {
    pub fn new(navigation: impl Navigation + 'static) -> Self {
        Self(Box::new(navigation))
    }
}
