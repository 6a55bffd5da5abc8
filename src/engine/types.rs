//! Core ECS Types, Identifiers, and Capacity Constants
//!
//! This module defines the **fundamental types, sentinels, and compile-time
//! capacities** used throughout the ECS. These definitions form the semantic
//! backbone of the system and are shared across component storage, entity
//! management, and view iteration.
//!
//! ## Design Philosophy
//!
//! The ECS is designed around:
//!
//! - **Dense storage**: components live in contiguous vectors,
//! - **Bitmask signatures**: each entity's component set is a single `u64`,
//! - **Stable numeric identifiers**: entities and component types are small
//!   copyable integers,
//! - **Sentinels instead of wrappers**: absence is encoded as [`NONE`] /
//!   [`INVALID_INDEX`] rather than an option in hot paths.
//!
//! ## Entity Representation
//!
//! An [`EntityID`] is a bare `u32` in `[0, MAX_ENTITIES)`. It carries no
//! generation counter; liveness is tracked by the registry's index table,
//! and destroyed IDs are recycled in FIFO order.
//!
//! ## Components and Signatures
//!
//! Component types are identified by dense [`ComponentID`] values assigned
//! at first use. A [`Signature`] has bit `i` set iff the entity owns the
//! component whose ID is `i`, which caps [`MAX_COMPONENTS`] at the signature
//! width.
//!
//! ## Sparse Pages
//!
//! Component pools map entity IDs to dense indices through fixed-size pages
//! of [`PAGE_SIZE`] slots, allocated lazily on first touch. [`PAGE_SIZE`]
//! must be a power of two so the in-page offset is a mask; this is enforced
//! statically below.

/// Opaque identifier for an entity. Plain `u32`, no generation bits.
pub type EntityID = u32;

/// Dense identifier for a component type, assigned at first use.
pub type ComponentID = u32;

/// Bitmask of owned component types; bit `i` corresponds to `ComponentID` `i`.
pub type Signature = u64;

/// Offset into a pool's dense arrays.
pub type Index = u32;

/// Sentinel entity: "no entity". Returned by `create()` on exhaustion.
pub const NONE: EntityID = EntityID::MAX;

/// Sentinel dense index: "not present in this pool".
pub const INVALID_INDEX: Index = Index::MAX;

/// Upper bound on simultaneously live entities.
pub const MAX_ENTITIES: usize = 1_000_000;

/// Upper bound on registered component types.
pub const MAX_COMPONENTS: ComponentID = 64;

/// Entities per sparse page. Must be a power of two.
pub const PAGE_SIZE: usize = 4096;

/// Number of sparse page slots a pool holds.
pub const MAX_PAGES: usize = (MAX_ENTITIES + PAGE_SIZE - 1) / PAGE_SIZE;

const _: [(); 1] = [(); (MAX_COMPONENTS as usize <= Signature::BITS as usize) as usize];
const _: [(); 1] = [(); PAGE_SIZE.is_power_of_two() as usize];
const _: [(); 1] = [(); ((MAX_ENTITIES as u64) < INVALID_INDEX as u64) as usize];
const _: [(); 1] = [(); ((MAX_ENTITIES as u64) < NONE as u64) as usize];

/// Returns the signature bit for `component_id`.
///
/// ## Panics
/// Logs and panics when `component_id >= MAX_COMPONENTS`: the bit would not
/// fit the signature word, which means the component-ID space is exhausted.
#[inline]
pub fn signature_bit(component_id: ComponentID) -> Signature {
    if component_id >= MAX_COMPONENTS {
        log::error!(
            "component id {component_id} does not fit the signature (MAX_COMPONENTS = {MAX_COMPONENTS})"
        );
        panic!("component id space exhausted");
    }
    1 << component_id
}

/// Returns `true` if `signature` contains every bit of `required`.
#[inline]
pub fn contains_all(signature: Signature, required: Signature) -> bool {
    signature & required == required
}
