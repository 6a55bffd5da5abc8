#![allow(dead_code)]

use sparse_ecs::prelude::*;

pub const AGENTS_SMALL: usize = 10_000;
pub const AGENTS_MED: usize = 100_000;

#[derive(Clone, Copy)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy)]
pub struct Health {
    pub hp: f32,
}

pub fn make_world() -> Registry {
    let mut registry = Registry::new();
    registry.register_component::<Position>();
    registry.register_component::<Velocity>();
    registry.register_component::<Health>();
    registry
}

pub fn populate(registry: &mut Registry, count: usize) {
    for i in 0..count {
        let entity = registry.create().id();

        let fx = (i % 1000) as f32 * 0.001;
        let fy = ((i / 1000) % 1000) as f32 * 0.001;

        registry.add_component(entity, Position { x: fx, y: fy });
        registry.add_component(
            entity,
            Velocity {
                x: fx * 0.5 + 0.01,
                y: fy * 0.5 + 0.02,
            },
        );
        registry.add_component(entity, Health { hp: 100.0 });
    }
}
