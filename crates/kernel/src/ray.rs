use glam::Vec3;

/// A shot: origin plus unit direction, limited to `max_distance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub max_distance: f32,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3, max_distance: f32) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            max_distance,
        }
    }
}

/// Axis-aligned box used as a target's hit volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Slab test against the outside faces. Returns the entry distance along
    /// the ray. `None` if the box is missed, encloses the origin, or lies
    /// entirely past `ray.max_distance`.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        if ray.direction == Vec3::ZERO {
            return None;
        }
        let inv = Vec3::new(
            safe_recip(ray.direction.x),
            safe_recip(ray.direction.y),
            safe_recip(ray.direction.z),
        );
        let t1 = (self.min - ray.origin) * inv;
        let t2 = (self.max - ray.origin) * inv;

        let near = t1.min(t2);
        let far = t1.max(t2);
        let t_enter = near.max_element();
        let t_exit = far.min_element();

        // Negated so a NaN slab distance reads as a miss. A negative entry
        // means the origin is inside; only back faces lie ahead.
        if !(t_exit >= t_enter && t_enter >= 0.0) {
            return None;
        }
        (t_enter <= ray.max_distance).then_some(t_enter)
    }
}

fn safe_recip(v: f32) -> f32 {
    if v != 0.0 { 1.0 / v } else { f32::INFINITY }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(center: Vec3) -> Aabb {
        Aabb::from_center_half_extents(center, Vec3::splat(0.5))
    }

    #[test]
    fn hit_dead_ahead() {
        let b = unit_box_at(Vec3::new(0.0, 0.0, -10.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 100.0);
        let t = b.intersect(&ray).unwrap();
        assert!((t - 9.5).abs() < 1e-5);
    }

    #[test]
    fn miss_to_the_side() {
        let b = unit_box_at(Vec3::new(3.0, 0.0, -10.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 100.0);
        assert!(b.intersect(&ray).is_none());
    }

    #[test]
    fn box_behind_origin_is_missed() {
        let b = unit_box_at(Vec3::new(0.0, 0.0, 10.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 100.0);
        assert!(b.intersect(&ray).is_none());
    }

    #[test]
    fn out_of_range_is_missed() {
        let b = unit_box_at(Vec3::new(0.0, 0.0, -150.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z, 100.0);
        assert!(b.intersect(&ray).is_none());
    }

    #[test]
    fn enclosing_box_is_passed_through() {
        let b = unit_box_at(Vec3::ZERO);
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 100.0);
        assert!(b.contains(ray.origin));
        assert!(b.intersect(&ray).is_none());
    }

    #[test]
    fn origin_on_front_face_hits_at_zero() {
        let b = unit_box_at(Vec3::new(0.5, 0.0, 0.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 100.0);
        assert_eq!(b.intersect(&ray), Some(0.0));
    }

    #[test]
    fn diagonal_ray_hits() {
        let b = unit_box_at(Vec3::new(5.0, 0.0, -5.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1.0, 0.0, -1.0), 100.0);
        let t = b.intersect(&ray).unwrap();
        let p = ray.origin + ray.direction * t;
        assert!(p.x > 4.4 && p.x < 5.6);
    }

    #[test]
    fn zero_direction_never_hits() {
        let b = unit_box_at(Vec3::ZERO);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 100.0);
        assert!(b.intersect(&ray).is_none());
    }
}
