//! # Registry
//!
//! Entity lifecycle, signature tracking, and view ownership.
//!
//! ## Purpose
//! The registry is the single entry point of the ECS. It allocates and
//! recycles entity IDs, routes component operations to the pools while
//! keeping each entity's signature bitmask in sync, applies deferred
//! destruction in bulk, and owns the cached views.
//!
//! ## Entity lifecycle
//! IDs come from a FIFO of available IDs seeded with the full
//! `[0, MAX_ENTITIES)` range. `destroy` only schedules; the pending queue is
//! applied by [`Registry::update`], which is the **only** point at which
//! entity slots are recycled. Systems therefore observe a stable world
//! between `update` calls, and destroying from inside an iteration pass is
//! a matter of collecting IDs and submitting them before the next `update`.
//!
//! ## Invariants
//! - `alive[indices[e]] == e` for every live `e`, and `indices[alive[i]] == i`.
//! - `signatures[e]` has bit `id(C)` set iff pool-of-`C` contains `e`;
//!   signature bits change only in [`Registry::add_component`] and
//!   [`Registry::remove_component`].
//! - `available` holds exactly the IDs that are neither live nor pending
//!   destruction.
//!
//! ## Concurrency
//! A registry is single-threaded: no internal locking, no shared mutable
//! state beyond the process-wide component-ID counter. Two threads may own
//! two registries; one registry must not be entered concurrently. Read-only
//! parallelism over [`Registry::alive`] and the dense pool slices is the
//! caller's business.

use std::any::Any;
use std::collections::{HashMap, VecDeque};

use crate::engine::component::component_id_of;
use crate::engine::entity::Entity;
use crate::engine::manager::ComponentManager;
use crate::engine::types::{
    signature_bit, EntityID, Index, Signature, INVALID_INDEX, MAX_ENTITIES, NONE,
};
use crate::engine::view::{View, ViewKey, ViewState, ViewTuple};

/// Owner of all entities, component pools, and cached views.
pub struct Registry {
    components: ComponentManager,
    alive: Vec<EntityID>,
    indices: Vec<Index>,
    signatures: Vec<Signature>,
    available: VecDeque<EntityID>,
    pending_destroy: Vec<EntityID>,
    views: HashMap<ViewKey, Box<dyn Any + Send + Sync>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates an empty registry with the full ID range available.
    pub fn new() -> Self {
        Self {
            components: ComponentManager::new(),
            alive: Vec::new(),
            indices: vec![INVALID_INDEX; MAX_ENTITIES],
            signatures: vec![0; MAX_ENTITIES],
            available: (0..MAX_ENTITIES as EntityID).collect(),
            pending_destroy: Vec::new(),
            views: HashMap::new(),
        }
    }

    /// Installs a pool for component type `C`. Idempotent.
    ///
    /// ## Panics
    /// Fatal when the ID space is exhausted (`id(C) >= MAX_COMPONENTS`).
    pub fn register_component<C: 'static + Send + Sync>(&mut self) {
        self.components.register::<C>();
    }

    /// Creates an entity and returns a handle to it.
    ///
    /// ## Behavior
    /// Dequeues the oldest available ID. When none is left, logs a warning
    /// and returns a handle wrapping [`NONE`]; every operation through such
    /// a handle is a no-op and `valid()` reports `false`.
    pub fn create(&mut self) -> Entity<'_> {
        let Some(entity) = self.available.pop_front() else {
            log::warn!("entity limit reached (MAX_ENTITIES = {MAX_ENTITIES})");
            return Entity::new(NONE, self);
        };

        self.indices[entity as usize] = self.alive.len() as Index;
        self.alive.push(entity);

        Entity::new(entity, self)
    }

    /// Wraps an existing ID in a handle. The ID is not checked; a handle to
    /// a dead entity simply reports `valid() == false`.
    pub fn entity(&mut self, entity: EntityID) -> Entity<'_> {
        Entity::new(entity, self)
    }

    /// Schedules `entity` for destruction at the next [`update`](Self::update).
    ///
    /// Submitting the same entity twice is harmless: the applier checks
    /// liveness per entry, so an ID is recycled at most once per update.
    pub fn destroy(&mut self, entity: EntityID) {
        if self.valid(entity) {
            self.pending_destroy.push(entity);
        }
    }

    /// Applies all pending destructions.
    ///
    /// ## Behavior
    /// For each scheduled entity that is still live: swap-and-pop it out of
    /// the alive list, clear its index and signature, remove it from every
    /// pool, and return its ID to the back of the available FIFO. This is
    /// the only point at which IDs are recycled.
    pub fn update(&mut self) {
        for i in 0..self.pending_destroy.len() {
            let entity = self.pending_destroy[i];
            let index = self.indices[entity as usize];
            if index == INVALID_INDEX {
                continue;
            }

            let last = self.alive.len() - 1;
            let moved = self.alive[last];
            self.alive[index as usize] = moved;
            self.indices[moved as usize] = index;
            self.alive.pop();

            self.indices[entity as usize] = INVALID_INDEX;
            self.signatures[entity as usize] = 0;

            self.components.destroy(entity);
            self.available.push_back(entity);
        }
        self.pending_destroy.clear();
    }

    /// Destroys every live entity immediately.
    ///
    /// Pools end up empty and all IDs return to the available FIFO; the
    /// view cache is kept and will rebuild on next access.
    pub fn reset(&mut self) {
        self.pending_destroy.extend(self.alive.iter().copied());
        self.update();
    }

    /// Returns `true` if `entity` is currently live.
    ///
    /// An out-of-range ID (including [`NONE`]) logs a warning and reports
    /// `false`.
    pub fn valid(&self, entity: EntityID) -> bool {
        if entity as usize >= MAX_ENTITIES {
            log::warn!("entity {entity} out of range");
            return false;
        }
        self.indices[entity as usize] != INVALID_INDEX
    }

    /// Attaches `component` to `entity` and sets its signature bit.
    ///
    /// No-op when `entity` is not live. If `entity` already owns a `C`, the
    /// stored value is overwritten in place: its dense position is kept and
    /// the pool version does not change.
    pub fn add_component<C: 'static + Send + Sync>(&mut self, entity: EntityID, component: C) {
        if !self.valid(entity) {
            return;
        }
        self.components.add(entity, component);
        self.signatures[entity as usize] |= signature_bit(component_id_of::<C>());
    }

    /// Detaches `C` from `entity` and clears its signature bit.
    ///
    /// No-op when `entity` is not live or does not own a `C`.
    pub fn remove_component<C: 'static + Send + Sync>(&mut self, entity: EntityID) {
        if !self.valid(entity) {
            return;
        }
        self.components.remove::<C>(entity);
        self.signatures[entity as usize] &= !signature_bit(component_id_of::<C>());
    }

    /// Returns the `C` of `entity`, or `None` when the entity is not live or
    /// does not own one.
    pub fn get_component<C: 'static + Send + Sync>(&self, entity: EntityID) -> Option<&C> {
        if !self.valid(entity) {
            return None;
        }
        self.components.get::<C>(entity)
    }

    /// Mutable variant of [`get_component`](Self::get_component).
    pub fn get_component_mut<C: 'static + Send + Sync>(
        &mut self,
        entity: EntityID,
    ) -> Option<&mut C> {
        if !self.valid(entity) {
            return None;
        }
        self.components.get_mut::<C>(entity)
    }

    /// Returns `true` if `entity` is live and owns a `C`.
    pub fn has_component<C: 'static + Send + Sync>(&self, entity: EntityID) -> bool {
        if !self.valid(entity) {
            return false;
        }
        self.components.pool::<C>().contains(entity)
    }

    /// Empties pool-of-`C` for every entity at once.
    ///
    /// Signature bits are **not** rewritten; signatures change only through
    /// [`add_component`](Self::add_component) and
    /// [`remove_component`](Self::remove_component). Use `remove_component`
    /// when per-entity bookkeeping matters.
    pub fn clear<C: 'static + Send + Sync>(&mut self) {
        self.components.clear::<C>();
    }

    /// Live entity IDs, dense, in liveness order.
    pub fn alive(&self) -> &[EntityID] {
        &self.alive
    }

    /// Signature table, indexed by entity ID. Non-live entries are `0`.
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// Dense entity list of pool-of-`C`, parallel to
    /// [`components`](Self::components).
    pub fn entities<C: 'static + Send + Sync>(&self) -> &[EntityID] {
        self.components.pool::<C>().entities()
    }

    /// Dense component storage of pool-of-`C`.
    pub fn components<C: 'static + Send + Sync>(&self) -> &[C] {
        self.components.pool::<C>().components()
    }

    /// Structural version counter of pool-of-`C`.
    pub fn version<C: 'static + Send + Sync>(&self) -> u64 {
        self.components.pool::<C>().version()
    }

    /// Returns the cached view for the component tuple `T`, creating it on
    /// first request. The view instance lives as long as the registry; the
    /// returned handle borrows the registry until iteration is done.
    ///
    /// ## Panics
    /// Fatal when `T` repeats a component type: the iteration callback would
    /// receive two mutable references into the same pool.
    pub fn view<T: ViewTuple>(&mut self) -> View<'_, T> {
        let order = T::component_ids();
        for (i, id) in order.iter().enumerate() {
            if order[..i].contains(id) {
                log::error!("view tuple repeats component id {id}");
                panic!("duplicate component type in view tuple");
            }
        }

        let key = ViewKey {
            signature: T::signature(),
            order,
        };

        let state = self
            .views
            .entry(key)
            .or_insert_with(|| Box::new(ViewState::<T>::new()));
        let Some(state) = state.downcast_mut::<ViewState<T>>() else {
            log::error!("view cache entry does not match the requested tuple");
            panic!("view cache type mismatch");
        };

        View::new(state, &mut self.components, &self.signatures)
    }
}
