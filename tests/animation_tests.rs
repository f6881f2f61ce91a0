use hero_scene::animation::{pose_at, AnimationDriver, CORE_RATE};
use hero_scene::{build_hero_scene, NodeTag, SceneGraph, SceneOptions};

fn scene() -> SceneGraph {
    build_hero_scene(&SceneOptions {
        particle_seed: Some(17),
        ..SceneOptions::default()
    })
}

fn sample_times() -> Vec<f32> {
    let mut times = vec![0.0, 1e-3, 0.016, 0.5, 1.0, 10.0, 59.99, 3600.0];
    times.extend((0..200).map(|i| i as f32 * 0.37));
    times
}

#[cfg(test)]
mod animation_tests {
    use super::*;

    #[test]
    fn test_mesh_and_wireframe_bit_identical() {
        let mut graph = scene();
        let mut driver = AnimationDriver::new();

        for t in sample_times() {
            driver.apply(&mut graph, t);
            let mesh = graph.rotation(NodeTag::MainMesh).unwrap();
            let wire = graph.rotation(NodeTag::WireframeOverlay).unwrap();
            assert_eq!(mesh.x.to_bits(), wire.x.to_bits(), "x differs at t={}", t);
            assert_eq!(mesh.y.to_bits(), wire.y.to_bits(), "y differs at t={}", t);
        }
    }

    #[test]
    fn test_rotation_formulas() {
        let mut graph = scene();
        let mut driver = AnimationDriver::new();

        for t in sample_times() {
            driver.apply(&mut graph, t);
            let tol = 1e-5 * t.max(1.0);

            let mesh = graph.rotation(NodeTag::MainMesh).unwrap();
            assert!((mesh.x - 0.10 * t).abs() <= tol);
            assert!((mesh.y - 0.15 * t).abs() <= tol);

            let particles = graph.rotation(NodeTag::Particles).unwrap();
            assert!((particles.x - 0.01 * t).abs() <= tol);
            assert!((particles.y - 0.02 * t).abs() <= tol);

            let rings = graph.rotation(NodeTag::Rings).unwrap();
            assert!((rings.x - 0.05 * t).abs() <= tol);
            assert!((rings.y - 0.03 * t).abs() <= tol);
        }
    }

    #[test]
    fn test_zero_time_is_rest_pose() {
        let mut graph = scene();
        AnimationDriver::new().apply(&mut graph, 0.0);

        for tag in [
            NodeTag::MainMesh,
            NodeTag::WireframeOverlay,
            NodeTag::Particles,
            NodeTag::Rings,
        ] {
            let rotation = graph.rotation(tag).unwrap();
            assert_eq!((rotation.x, rotation.y), (0.0, 0.0), "{:?}", tag);
        }
    }

    #[test]
    fn test_ten_seconds() {
        let mut graph = scene();
        AnimationDriver::new().apply(&mut graph, 10.0);

        let mesh = graph.rotation(NodeTag::MainMesh).unwrap();
        assert!((mesh.x - 1.0).abs() < 1e-6);
        assert!((mesh.y - 1.5).abs() < 1e-6);
        assert_eq!(mesh, graph.rotation(NodeTag::WireframeOverlay).unwrap());
    }

    #[test]
    fn test_static_nodes_untouched() {
        let reference = scene();
        let mut graph = scene();
        AnimationDriver::new().apply(&mut graph, 42.0);

        for tag in [
            NodeTag::InnerGlow,
            NodeTag::OuterRing,
            NodeTag::MiddleRing,
            NodeTag::InnerRing,
            NodeTag::Stars,
        ] {
            assert_eq!(graph.rotation(tag), reference.rotation(tag), "{:?}", tag);
        }
        assert_eq!(graph.lights(), reference.lights());
        assert_eq!(graph.lens(), reference.lens());
    }

    #[test]
    fn test_ring_tilts_compose_under_group() {
        let mut graph = scene();
        AnimationDriver::new().apply(&mut graph, 5.0);

        let group = graph.world_matrix(NodeTag::Rings).unwrap();
        let local = graph.node(NodeTag::MiddleRing).unwrap().transform.matrix();
        let world = graph.world_matrix(NodeTag::MiddleRing).unwrap();
        assert!(world.abs_diff_eq(group * local, 1e-6));
    }

    #[test]
    fn test_driver_matches_pure_pose() {
        let mut graph = scene();
        let mut driver = AnimationDriver::new();
        driver.apply(&mut graph, 7.25);

        let pose = pose_at(7.25);
        let mesh = graph.rotation(NodeTag::MainMesh).unwrap();
        assert_eq!((mesh.x, mesh.y), pose.core);
        assert_eq!(pose.core, CORE_RATE.at(7.25));
    }

    #[test]
    fn test_rotation_not_wrapped() {
        let mut graph = scene();
        AnimationDriver::new().apply(&mut graph, 1000.0);
        let mesh = graph.rotation(NodeTag::MainMesh).unwrap();
        assert!(mesh.y > 100.0);
    }
}
