//! # sparse_ecs
//!
//! Sparse-set Entity-Component-System core for high-throughput simulations.
//!
//! ## Design Goals
//! - Contiguous per-type component storage for cache-friendly iteration
//! - O(1) add/remove/lookup through paged sparse indices
//! - Deferred entity destruction for a stable world between frames
//! - Version-cached views that rebuild only on structural change
//!
//! ## Usage sketch
//! ```
//! use sparse_ecs::prelude::*;
//!
//! struct Position { x: f32, y: f32 }
//! struct Velocity { x: f32, y: f32 }
//!
//! let mut registry = Registry::new();
//! registry.register_component::<Position>();
//! registry.register_component::<Velocity>();
//!
//! let entity = {
//!     let mut e = registry.create();
//!     e.add(Position { x: 0.0, y: 0.0 });
//!     e.add(Velocity { x: 1.0, y: 2.0 });
//!     e.id()
//! };
//!
//! registry.view::<(Position, Velocity)>().each(|_, (p, v)| {
//!     p.x += v.x;
//!     p.y += v.y;
//! });
//!
//! registry.destroy(entity);
//! registry.update();
//! ```

#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub mod engine;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (Public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use engine::registry::Registry;

pub use engine::entity::Entity;

pub use engine::pool::{ComponentPool, TypeErasedPool};

pub use engine::view::{View, ViewTuple};

pub use engine::component::{component_id_of, signature_of};

pub use engine::types::{
    ComponentID, EntityID, Index, Signature, INVALID_INDEX, MAX_COMPONENTS, MAX_ENTITIES, NONE,
    PAGE_SIZE,
};

// ─────────────────────────────────────────────────────────────────────────────
// Prelude
// ─────────────────────────────────────────────────────────────────────────────

/// Commonly used ECS types.
///
/// Import with:
/// ```rust
/// use sparse_ecs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        component_id_of, ComponentID, Entity, EntityID, Registry, Signature, NONE,
    };
}
