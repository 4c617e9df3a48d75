use crate::config::GameConfig;
use crate::ray::{Aabb, Ray};
use crate::rng::SpawnRng;
use gallery_common::{Rgb, TargetId};
use glam::Vec3;

/// A hittable box in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub position: Vec3,
    pub half_extents: Vec3,
    pub color: Rgb,
}

impl Target {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }
}

/// Result of a ray cast against the pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub target: TargetId,
    pub distance: f32,
}

/// The live target set.
///
/// Kept in spawn order; a replacement is appended after its predecessor is
/// removed, so the pool size is constant between hits.
#[derive(Debug, Clone)]
pub struct TargetPool {
    targets: Vec<Target>,
    rng: SpawnRng,
    half_extent: f32,
    height: f32,
    target_half_extents: Vec3,
}

impl TargetPool {
    /// Create a pool with `config.target_count` targets placed from `seed`.
    pub fn new(config: &GameConfig, seed: u64) -> Self {
        let mut pool = Self {
            targets: Vec::with_capacity(config.target_count),
            rng: SpawnRng::new(seed),
            half_extent: config.arena_half_extent,
            height: config.target_height,
            target_half_extents: config.target_half_extents,
        };
        for _ in 0..config.target_count {
            pool.spawn();
        }
        pool
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Place one new target at a random spot and return it.
    pub fn spawn(&mut self) -> &Target {
        let x = self.rng.centered(self.half_extent);
        let z = self.rng.centered(self.half_extent);
        let color = Rgb::from_u32(self.rng.next_u64() as u32);
        let target = Target {
            id: TargetId::new(),
            position: Vec3::new(x, self.height, z),
            half_extents: self.target_half_extents,
            color,
        };
        tracing::debug!(
            "spawned target {} at ({:.1}, {:.1}, {:.1})",
            target.id.short(),
            x,
            self.height,
            z
        );
        self.targets.push(target);
        &self.targets[self.targets.len() - 1]
    }

    /// Remove a target. Returns it if it was live.
    pub fn remove(&mut self, id: TargetId) -> Option<Target> {
        let idx = self.targets.iter().position(|t| t.id == id)?;
        Some(self.targets.remove(idx))
    }

    /// Remove `id` and spawn its replacement in one step.
    pub fn replace(&mut self, id: TargetId) -> Option<(Target, &Target)> {
        let removed = self.remove(id)?;
        let spawned = self.spawn();
        Some((removed, spawned))
    }

    /// Nearest target along the ray, if any. Ties go to the earlier target.
    pub fn cast(&self, ray: &Ray) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        for target in &self.targets {
            let Some(distance) = target.bounds().intersect(ray) else {
                continue;
            };
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(Hit {
                    target: target.id,
                    distance,
                });
            }
        }
        best
    }

    #[cfg(test)]
    pub(crate) fn insert_at(&mut self, position: Vec3) -> TargetId {
        let target = Target {
            id: TargetId::new(),
            position,
            half_extents: self.target_half_extents,
            color: Rgb(0xff0000),
        };
        let id = target.id;
        self.targets.push(target);
        id
    }
}
