//! # Component Identity
//!
//! This module assigns stable [`ComponentID`] values to Rust component types.
//!
//! ## Purpose
//! Signatures and pool tables index by a dense small integer per component
//! type. The mapping is **process-wide**: the counter is global, so every
//! registry in the process agrees on the ID of a given type and signature
//! bit layouts are interchangeable between registries.
//!
//! ## Design
//! - A relaxed atomic counter hands out the next free ID.
//! - A `TypeId -> ComponentID` table, created on first use, makes the
//!   assignment stable for the lifetime of the process.
//! - IDs are assigned at **first reference** to a type, not at registration;
//!   registering a pool and querying an ID are independent operations.
//!
//! ## Invariants
//! - A type's ID never changes once assigned.
//! - IDs are dense: the `n`-th distinct type referenced gets ID `n - 1`.
//!
//! ## Concurrency
//! The table is behind an `RwLock` for concurrent reads and serialized
//! first-use writes; concurrent first-use registration from multiple threads
//! is safe because the counter only grows.

use std::{
    any::TypeId,
    collections::HashMap,
    sync::atomic::{AtomicU32, Ordering},
    sync::{OnceLock, PoisonError, RwLock},
};

use crate::engine::types::{signature_bit, ComponentID, Signature};

static NEXT_COMPONENT_ID: AtomicU32 = AtomicU32::new(0);

static COMPONENT_IDS: OnceLock<RwLock<HashMap<TypeId, ComponentID>>> = OnceLock::new();

fn component_ids() -> &'static RwLock<HashMap<TypeId, ComponentID>> {
    COMPONENT_IDS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Returns the process-wide [`ComponentID`] for type `C`, assigning the next
/// free ID on first reference.
///
/// ## Behavior
/// - The fast path is a shared read of the ID table.
/// - On first use the type is inserted under the write lock; the entry API
///   makes a racing double-insert collapse to a single assignment.
///
/// ## Notes
/// The returned ID is not range-checked here; it is validated against
/// `MAX_COMPONENTS` wherever it meets a signature or a pool table.
pub fn component_id_of<C: 'static>() -> ComponentID {
    let ids = component_ids();

    if let Some(&id) = ids
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&TypeId::of::<C>())
    {
        return id;
    }

    let mut ids = ids.write().unwrap_or_else(PoisonError::into_inner);
    *ids.entry(TypeId::of::<C>())
        .or_insert_with(|| NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Returns the signature containing exactly the bit of component type `C`.
///
/// ## Panics
/// Panics when the ID of `C` exceeds `MAX_COMPONENTS` (see [`signature_bit`]).
#[inline]
pub fn signature_of<C: 'static>() -> Signature {
    signature_bit(component_id_of::<C>())
}
