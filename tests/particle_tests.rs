use hero_scene::particles::{
    ParticleFieldBuilder, StarFieldBuilder, PARTICLE_COUNT, PARTICLE_HALF_EXTENT, STAR_COUNT,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(test)]
mod particle_tests {
    use super::*;

    #[test]
    fn test_field_has_two_hundred_points() {
        let cloud = ParticleFieldBuilder::default().build_seeded(0);
        assert_eq!(cloud.len(), PARTICLE_COUNT);
        assert_eq!(cloud.coordinates().len(), 600);
    }

    #[test]
    fn test_coordinates_within_extent_for_many_seeds() {
        for seed in 0..256u64 {
            let cloud = ParticleFieldBuilder::default().build_seeded(seed);
            for c in cloud.coordinates() {
                assert!(
                    (-PARTICLE_HALF_EXTENT..=PARTICLE_HALF_EXTENT).contains(&c),
                    "seed {} produced {}",
                    seed,
                    c
                );
            }
        }
    }

    #[test]
    fn test_thread_rng_within_extent() {
        let cloud = ParticleFieldBuilder::default().build(&mut rand::thread_rng());
        assert!(cloud
            .coordinates()
            .iter()
            .all(|c| c.abs() <= PARTICLE_HALF_EXTENT));
    }

    #[test]
    fn test_same_seed_same_field() {
        let a = ParticleFieldBuilder::default().build_seeded(99);
        let b = ParticleFieldBuilder::default().build_seeded(99);
        let c = ParticleFieldBuilder::default().build_seeded(100);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_field_spreads_over_the_cube() {
        let cloud = ParticleFieldBuilder::default().build_seeded(5);
        let coordinates = cloud.coordinates();
        let mean = coordinates.iter().sum::<f32>() / coordinates.len() as f32;
        assert!(mean.abs() < 1.0);
        assert!(coordinates.iter().any(|c| *c > 5.0));
        assert!(coordinates.iter().any(|c| *c < -5.0));
    }

    #[test]
    fn test_star_shell_bounds() {
        let builder = StarFieldBuilder::default();
        let stars = builder.build(&mut StdRng::seed_from_u64(8));
        assert_eq!(stars.len(), STAR_COUNT);

        for p in &stars.positions {
            let r = p.length();
            assert!(r >= builder.radius - 1e-3 && r <= builder.radius + builder.depth + 1e-3);
        }
        for size in &stars.sizes {
            assert!(*size >= 0.5 * builder.factor && *size <= builder.factor);
        }
    }
}
