//! Ray intersection tests

use crate::bounds::Aabb;
use crate::ray::Ray;

/// Ray-AABB intersection using the slab method
///
/// Returns the distance along the ray to the first intersection in front of
/// the origin, or `None`. A ray starting inside the box reports the exit
/// distance.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    if !ray.is_valid() {
        return None;
    }

    let inv_dir = ray.inverse_direction();

    let (t1, t2) = slab(ray.origin.x, inv_dir.x, aabb.min.x, aabb.max.x)?;
    let (t3, t4) = slab(ray.origin.y, inv_dir.y, aabb.min.y, aabb.max.y)?;
    let (t5, t6) = slab(ray.origin.z, inv_dir.z, aabb.min.z, aabb.max.z)?;

    let tmin = t1.max(t3).max(t5);
    let tmax = t2.min(t4).min(t6);

    // Behind the origin, or no overlap between slabs
    if tmax < 0.0 || tmin > tmax {
        None
    } else {
        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

/// Entry/exit distances for one axis. An axis-parallel ray outside the slab
/// can never hit the box.
#[inline]
fn slab(origin: f32, inv_dir: f32, min: f32, max: f32) -> Option<(f32, f32)> {
    if inv_dir.is_infinite() {
        return if origin < min || origin > max {
            None
        } else {
            Some((f32::NEG_INFINITY, f32::INFINITY))
        };
    }
    let a = (min - origin) * inv_dir;
    let b = (max - origin) * inv_dir;
    Some((a.min(b), a.max(b)))
}
