//! Геометрические утилиты: distance checks, шаги интерполяции, сэмплинг точек.
//!
//! Всё здесь: чистые функции без ECS, используются и AI, и лифтом.

use bevy::prelude::*;
use rand::Rng;

/// Горизонтальное направление from → to (y обнулён)
///
/// `None` если точки совпадают по XZ (смотреть некуда).
pub fn planar_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let mut direction = to - from;
    direction.y = 0.0;
    direction.try_normalize()
}

/// Сдвиг точки к target не больше чем на `max_step` (без overshoot)
pub fn move_towards(current: Vec3, target: Vec3, max_step: f32) -> Vec3 {
    let offset = target - current;
    let distance = offset.length();

    if distance <= max_step || distance <= f32::EPSILON {
        target
    } else {
        current + offset / distance * max_step
    }
}

/// Скалярный вариант `move_towards` (позиция кабины по Y)
pub fn step_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_step {
        target
    } else {
        current + max_step.copysign(diff)
    }
}

/// Lerp с clamp(t) в [0, 1]
pub fn lerp_clamped(current: f32, target: f32, t: f32) -> f32 {
    current + (target - current) * t.clamp(0.0, 1.0)
}

/// |a - b| < tolerance (строго, как во всех порогах симуляции)
pub fn approx_eq(a: f32, b: f32, tolerance: f32) -> bool {
    (a - b).abs() < tolerance
}

/// Равномерная случайная точка в горизонтальном круге вокруг center
pub fn random_point_in_disc<R: Rng + ?Sized>(rng: &mut R, center: Vec3, radius: f32) -> Vec3 {
    if radius <= 0.0 {
        return center;
    }

    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    // sqrt: чтобы точки не кучковались у центра
    let distance = rng.gen::<f32>().sqrt() * radius;

    center + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// Случайное значение в [min, max]; вырожденный интервал → min
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        min
    } else {
        rng.gen_range(min..=max)
    }
}
