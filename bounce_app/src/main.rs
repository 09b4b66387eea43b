//! Bouncing-bodies demo
//!
//! Headless exercise of the engine core: a handful of balls bounce
//! around inside a walled viewport, pushed apart by collision
//! responses. Drawing goes to a renderer that logs its primitive calls
//! instead of touching a backend.
//!
//! Run with an optional config path: `bounce_demo [engine.toml]`

use std::collections::HashMap;
use std::error::Error;

use log::{debug, info};
use stage2d::prelude::*;

/// Renderer that logs primitives instead of rasterizing them
#[derive(Default)]
struct LogRenderer {
    depth: usize,
    calls: usize,
}

impl Renderer for LogRenderer {
    fn save(&mut self) {
        self.depth += 1;
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        debug!("translate ({dx:.1}, {dy:.1})");
    }

    fn set_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        debug!("set_color ({r:.2}, {g:.2}, {b:.2}, {a:.2})");
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.calls += 1;
        debug!("fill_rect ({x:.1}, {y:.1}) {width:.1}x{height:.1}");
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.calls += 1;
        debug!("stroke_rect ({x:.1}, {y:.1}) {width:.1}x{height:.1}");
    }
}

/// Ball sprite: draws its bounds and counts the hits it receives
struct BallSprite {
    size: f32,
}

impl Renderable for BallSprite {
    fn draw(&self, renderer: &mut dyn Renderer, _viewport: &Viewport) {
        renderer.set_color(0.9, 0.4, 0.2, 1.0);
        renderer.stroke_rect(0.0, 0.0, self.size, self.size);
    }

    fn on_collision(&mut self, response: &CollisionResponse) -> bool {
        debug!(
            "ball hit by {:?}, pushed ({:.2}, {:.2})",
            response.other,
            response.x(),
            response.y()
        );
        true
    }
}

fn spawn_walls(world: &mut World) -> Result<(), SceneError> {
    let root = world.graph.root();
    let width = world.viewport.width();
    let height = world.viewport.height();
    let walls = [
        (0.0, -32.0, width, 32.0),
        (0.0, height, width, 32.0),
        (-32.0, 0.0, 32.0, height),
        (width, 0.0, 32.0, height),
    ];
    for (x, y, w, h) in walls {
        let mut body = Body::from_shape(Rect::new(0.0, 0.0, w, h));
        body.collision_type = CollisionType::WORLD_SHAPE;
        body.is_static = true;
        let key = world
            .graph
            .spawn(Node::new(x, y, w, h).with_name("wall").with_body(body));
        world.graph.add_child(root, key)?;
    }
    Ok(())
}

fn spawn_balls(world: &mut World, count: usize) -> Result<Vec<NodeKey>, SceneError> {
    let root = world.graph.root();
    let mut keys = Vec::with_capacity(count);
    for i in 0..count {
        let size = 24.0;
        let x = 60.0 + (i as f32) * 90.0;
        let y = 80.0 + (i as f32 % 3.0) * 120.0;
        let mut body = Body::from_shape(Ellipse::circle(size / 2.0, size / 2.0, size / 2.0));
        body.collision_type = CollisionType::NPC_OBJECT;
        let key = world.graph.spawn(
            Node::new(x, y, size, size)
                .with_name(format!("ball-{i}"))
                .with_z(1.0)
                .with_body(body)
                .with_behavior(BallSprite { size }),
        );
        world.graph.add_child(root, key)?;
        keys.push(key);
    }
    Ok(keys)
}

fn main() -> Result<(), Box<dyn Error>> {
    stage2d::foundation::logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from_file(&path)?,
        None => EngineConfig::default(),
    };
    info!(
        "bounce demo: {}x{} viewport, {}-unit cells",
        config.viewport.width,
        config.viewport.height,
        1u32 << config.broadphase.cell_shift
    );

    let mut world = World::new(config);
    spawn_walls(&mut world)?;
    let balls = spawn_balls(&mut world, 6)?;

    let mut velocities: HashMap<NodeKey, Vec2> = HashMap::new();
    for (i, key) in balls.iter().enumerate() {
        let angle = (i as f32) * 1.1;
        velocities.insert(*key, Vec2::new(angle.cos(), angle.sin()) * 140.0);
    }

    let mut renderer = LogRenderer::default();
    let dt = 1.0 / 60.0;
    let frames = 600;
    let mut total_hits = 0usize;

    for frame in 0..frames {
        // integrate
        for (key, vel) in &velocities {
            if let Some(node) = world.graph.node_mut(*key) {
                node.pos += *vel * dt;
            }
        }
        world.update(dt);
        world.invalidate();

        // resolve: push out along the response and reflect velocity
        for key in &balls {
            for response in world.collide(*key, true) {
                total_hits += 1;
                if let Some(node) = world.graph.node_mut(*key) {
                    node.pos.x += response.x();
                    node.pos.y += response.y();
                }
                if let Some(vel) = velocities.get_mut(key) {
                    let n = response.normal;
                    let along = vel.dot(&n);
                    if along < 0.0 {
                        *vel -= n * (2.0 * along);
                    }
                }
            }
        }

        world.draw(&mut renderer);
        if frame % 120 == 0 {
            info!(
                "frame {frame}: {} buckets, {} draw calls, {total_hits} hits so far",
                world.broadphase().bucket_count(),
                renderer.calls
            );
        }
    }

    info!(
        "done after {frames} frames: {total_hits} collisions, avg fps {:.1}",
        world.timer().average_fps()
    );
    Ok(())
}
