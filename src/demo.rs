use std::path::Path;

use glam::Vec3;

use crate::camera::{Camera, Projection};
use crate::config::Config;
use crate::error::SceneGraphError;
use crate::orbit::{Animation, Orbit, OrbitPlane};
use crate::scene_graph::{MeshObject, NodeId, SceneGraph};
use crate::texture::Texture;

const SUN_COLOR: [u8; 3] = [255, 200, 40];
const PLANET_COLOR: [u8; 3] = [60, 120, 255];
const MOON_COLOR: [u8; 3] = [160, 160, 160];

const MOON_ORBIT_RADIUS: f32 = 10.0;
const MOON_ORBIT_SPEED: f32 = 1.4;
const MOON_SCALE: f32 = 0.2;
const MOON_TILT: f32 = 0.03;

pub struct Body {
    pub node: NodeId,
    pub animation: Animation,
}

/// A sun with three planets, each carrying two moons.
pub struct SolarSystem {
    pub scene: SceneGraph,
    pub root: NodeId,
    pub camera: Camera,
    pub projection: Projection,
    bodies: Vec<Body>,
    segments: u32,
    elapsed: f32,
}

struct BodyTextures {
    sun: Option<Texture>,
    planet: Option<Texture>,
    moon: Option<Texture>,
}

impl BodyTextures {
    fn load(config: &Config) -> Self {
        Self {
            sun: load_optional_texture(config.textures.sun.as_deref()),
            planet: load_optional_texture(config.textures.planet.as_deref()),
            moon: load_optional_texture(config.textures.moon.as_deref()),
        }
    }
}

fn load_optional_texture(path: Option<&Path>) -> Option<Texture> {
    let path = path?;
    match Texture::load_ppm(path) {
        Ok(texture) => Some(texture),
        Err(err) => {
            log::warn!("Falling back to flat color: {}", err);
            None
        }
    }
}

impl SolarSystem {
    pub fn new(config: &Config) -> Result<Self, SceneGraphError> {
        let textures = BodyTextures::load(config);
        let segments = config.sphere_segments;
        let mut scene = SceneGraph::new();

        let sun = spawn(&mut scene, "Sun", segments, SUN_COLOR, &textures.sun);
        let mut system = Self {
            scene,
            root: sun,
            camera: Camera::new(config.camera.eye),
            projection: config.projection(),
            bodies: vec![Body {
                node: sun,
                animation: Animation::Spin {
                    speed: 0.3,
                    axis: Vec3::Y,
                },
            }],
            segments,
            elapsed: 0.0,
        };

        let planets = [
            (
                "Earth",
                Animation::Orbit(Orbit {
                    radius: 10.0,
                    speed: 0.6,
                    angle: 0.0,
                    plane: OrbitPlane::XZ,
                    scale: 0.5,
                    tilt: 0.02,
                    tilt_axis: Vec3::Y,
                }),
            ),
            (
                "Earth2",
                Animation::Anchored {
                    scale: 0.7,
                    translation: Vec3::new(-8.0, 0.0, -8.0),
                    tilt: -0.02,
                    tilt_axis: Vec3::Y,
                },
            ),
            (
                "Earth3",
                Animation::Orbit(Orbit {
                    radius: 15.0,
                    speed: -1.4,
                    angle: 0.0,
                    plane: OrbitPlane::XZ,
                    scale: 0.9,
                    tilt: -0.02,
                    tilt_axis: Vec3::Y,
                }),
            ),
        ];

        for (index, (name, animation)) in planets.into_iter().enumerate() {
            let planet = system.add_body(name, sun, PLANET_COLOR, &textures.planet, animation)?;

            let moons = [(OrbitPlane::XZ, Vec3::Y), (OrbitPlane::YZ, Vec3::Z)];
            for (moon_index, (plane, tilt_axis)) in moons.into_iter().enumerate() {
                let moon_name = format!("Moon{}", index * 2 + moon_index + 1);
                let animation = Animation::Orbit(Orbit {
                    radius: MOON_ORBIT_RADIUS,
                    speed: MOON_ORBIT_SPEED,
                    angle: 0.0,
                    plane,
                    scale: MOON_SCALE,
                    tilt: MOON_TILT,
                    tilt_axis,
                });
                system.add_body(&moon_name, planet, MOON_COLOR, &textures.moon, animation)?;
            }
        }

        log::info!("Built solar system with {} bodies", system.scene.len());

        Ok(system)
    }

    fn add_body(
        &mut self,
        name: &str,
        parent: NodeId,
        color: [u8; 3],
        texture: &Option<Texture>,
        animation: Animation,
    ) -> Result<NodeId, SceneGraphError> {
        let node = spawn(&mut self.scene, name, self.segments, color, texture);
        self.scene.add_child(parent, node)?;
        self.bodies.push(Body { node, animation });
        Ok(node)
    }

    /// Advances every body's animation by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> Result<(), SceneGraphError> {
        self.elapsed += dt;

        for body in &mut self.bodies {
            let transform = self.scene.local_transform_mut(body.node)?;
            body.animation.advance(transform, dt);
        }

        Ok(())
    }

    pub fn body(&self, name: &str) -> Option<NodeId> {
        self.scene.find_by_name(name)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

fn spawn(
    scene: &mut SceneGraph,
    name: &str,
    segments: u32,
    color: [u8; 3],
    texture: &Option<Texture>,
) -> NodeId {
    let mut object = MeshObject::sphere(name, segments).with_color(color);
    if let Some(texture) = texture {
        object.set_texture(texture.clone());
    }
    scene.create_node(name, Some(Box::new(object)))
}
