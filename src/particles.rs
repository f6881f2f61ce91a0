use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::PointInstance;

pub const PARTICLE_COUNT: usize = 200;
pub const PARTICLE_HALF_EXTENT: f32 = 7.5;
pub const PARTICLE_SIZE: f32 = 0.03;

pub const STAR_COUNT: usize = 1000;
pub const STAR_RADIUS: f32 = 50.0;
pub const STAR_DEPTH: f32 = 50.0;
pub const STAR_SIZE_FACTOR: f32 = 4.0;

/// Immutable point buffer; only the owning node's transform changes after construction
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<Vec3>,
    pub sizes: Vec<f32>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat `[x, y, z, x, y, z, ...]` layout
    pub fn coordinates(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| p.to_array()).collect()
    }

    pub fn instances(&self) -> Vec<PointInstance> {
        self.positions
            .iter()
            .zip(&self.sizes)
            .map(|(p, s)| PointInstance::new(*p, *s))
            .collect()
    }
}

/// Uniformly scattered cube of points around the hero mesh
#[derive(Debug, Clone, Copy)]
pub struct ParticleFieldBuilder {
    pub count: usize,
    pub half_extent: f32,
}

impl Default for ParticleFieldBuilder {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            half_extent: PARTICLE_HALF_EXTENT,
        }
    }
}

impl ParticleFieldBuilder {
    pub fn build<R: Rng>(&self, rng: &mut R) -> PointCloud {
        let span = 2.0 * self.half_extent;
        let mut coordinate = || (rng.gen::<f32>() - 0.5) * span;

        let positions: Vec<Vec3> = (0..self.count)
            .map(|_| {
                let x = coordinate();
                let y = coordinate();
                let z = coordinate();
                Vec3::new(x, y, z)
            })
            .collect();

        log::debug!("Particle field built: {} points", positions.len());

        PointCloud {
            sizes: vec![PARTICLE_SIZE; positions.len()],
            positions,
        }
    }

    /// Reproducible field for a given seed
    pub fn build_seeded(&self, seed: u64) -> PointCloud {
        self.build(&mut StdRng::seed_from_u64(seed))
    }
}

/// Spherical shell of background stars
#[derive(Debug, Clone, Copy)]
pub struct StarFieldBuilder {
    pub count: usize,
    pub radius: f32,
    pub depth: f32,
    pub factor: f32,
}

impl Default for StarFieldBuilder {
    fn default() -> Self {
        Self {
            count: STAR_COUNT,
            radius: STAR_RADIUS,
            depth: STAR_DEPTH,
            factor: STAR_SIZE_FACTOR,
        }
    }
}

impl StarFieldBuilder {
    /// The shell radius starts at `radius + depth` and shrinks by a random share of
    /// `depth / count` per star, so every star lies between `radius` and `radius + depth`
    pub fn build<R: Rng>(&self, rng: &mut R) -> PointCloud {
        let mut positions = Vec::with_capacity(self.count);
        let mut sizes = Vec::with_capacity(self.count);
        let mut r = self.radius + self.depth;
        let increment = self.depth / self.count.max(1) as f32;

        for _ in 0..self.count {
            r -= increment * rng.gen::<f32>();
            let polar = (1.0 - 2.0 * rng.gen::<f32>()).clamp(-1.0, 1.0).acos();
            let azimuth = rng.gen::<f32>() * TAU;

            positions.push(Vec3::new(
                r * polar.sin() * azimuth.sin(),
                r * polar.cos(),
                r * polar.sin() * azimuth.cos(),
            ));
            sizes.push((0.5 + 0.5 * rng.gen::<f32>()) * self.factor);
        }

        log::debug!("Star field built: {} stars", positions.len());

        PointCloud { positions, sizes }
    }
}
