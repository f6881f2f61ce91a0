//! Per-frame rotation formulas for the hero scene
//!
//! Every animated value is a linear function of the elapsed time `t`, so the pose for
//! a frame depends on nothing but `t`. Rotations are not wrapped to `[0, 2π)`.

use crate::scene::{NodeTag, SceneGraph};

/// Angular rates in radians per second about local x and y
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationRate {
    pub x: f32,
    pub y: f32,
}

impl RotationRate {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn at(&self, t: f32) -> (f32, f32) {
        (self.x * t, self.y * t)
    }
}

pub const CORE_RATE: RotationRate = RotationRate::new(0.10, 0.15);
pub const PARTICLE_RATE: RotationRate = RotationRate::new(0.01, 0.02);
pub const RING_RATE: RotationRate = RotationRate::new(0.05, 0.03);
pub const TWINKLE_SPEED: f32 = 0.5;

/// Nodes written each frame. Mesh and overlay share one rate so their rotations
/// are computed by the same expression and stay bit-identical.
pub const ANIMATED: [(NodeTag, RotationRate); 4] = [
    (NodeTag::MainMesh, CORE_RATE),
    (NodeTag::WireframeOverlay, CORE_RATE),
    (NodeTag::Particles, PARTICLE_RATE),
    (NodeTag::Rings, RING_RATE),
];

/// Full set of animated values for one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatedPose {
    pub core: (f32, f32),
    pub particles: (f32, f32),
    pub rings: (f32, f32),
    pub twinkle_phase: f32,
}

/// Pure pose for elapsed time `t`
pub fn pose_at(t: f32) -> AnimatedPose {
    AnimatedPose {
        core: CORE_RATE.at(t),
        particles: PARTICLE_RATE.at(t),
        rings: RING_RATE.at(t),
        twinkle_phase: TWINKLE_SPEED * t,
    }
}

/// The only writer of node transforms in a mounted scene
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationDriver {
    last_time: Option<f32>,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write every animated value for time `t` into the graph, all before returning
    pub fn apply(&mut self, scene: &mut SceneGraph, t: f32) {
        for (tag, rate) in ANIMATED {
            let (x, y) = rate.at(t);
            scene.set_rotation(tag, x, y);
        }
        scene.set_twinkle_phase(NodeTag::Stars, TWINKLE_SPEED * t);

        if let Some(last) = self.last_time {
            if t < last {
                log::warn!("Animation time went backwards: {} -> {}", last, t);
            }
        }
        self.last_time = Some(t);
    }

    pub fn last_time(&self) -> Option<f32> {
        self.last_time
    }
}
