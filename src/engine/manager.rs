use crate::engine::component::component_id_of;
use crate::engine::pool::{ComponentPool, TypeErasedPool};
use crate::engine::types::{ComponentID, EntityID, MAX_COMPONENTS};

/// Owner of every component pool, indexed by [`ComponentID`].
///
/// ## Purpose
/// Routes typed component operations to the pool of the requested type and
/// provides the one cross-pool operation the registry needs: removing a
/// destroyed entity from every pool it might occupy.
///
/// ## Invariants
/// - Slot `i` of the pool table is `Some` iff component ID `i` has been
///   registered, and then holds a `ComponentPool` of the registered type.
///
/// Pool lookup for an unregistered type is a programmer error and fatal; see
/// [`ComponentManager::pool`].
pub struct ComponentManager {
    pools: Vec<Option<Box<dyn TypeErasedPool>>>,
}

impl ComponentManager {
    pub(crate) fn new() -> Self {
        Self { pools: Vec::new() }
    }

    /// Installs a pool for component type `C`. Idempotent.
    ///
    /// ## Panics
    /// Logs and panics when the ID assigned to `C` is `>= MAX_COMPONENTS`:
    /// the type could never participate in a signature.
    pub(crate) fn register<C: 'static + Send + Sync>(&mut self) {
        let id = component_id_of::<C>();
        if id >= MAX_COMPONENTS {
            log::error!("component limit reached (MAX_COMPONENTS = {MAX_COMPONENTS})");
            panic!("component id space exhausted");
        }

        let slot = id as usize;
        if slot >= self.pools.len() {
            self.pools.resize_with(slot + 1, || None);
        }
        if self.pools[slot].is_none() {
            self.pools[slot] = Some(Box::new(ComponentPool::<C>::new()));
        }
    }

    fn missing_pool(id: ComponentID) -> ! {
        log::error!("component {id} not registered; call register_component first");
        panic!("component type not registered");
    }

    /// Returns the pool for `C`.
    ///
    /// ## Panics
    /// Logs and panics when no pool is installed for `C`; using a component
    /// type without registering it first is a programmer error.
    pub(crate) fn pool<C: 'static + Send + Sync>(&self) -> &ComponentPool<C> {
        let id = component_id_of::<C>();
        let erased = match self.pools.get(id as usize) {
            Some(Some(erased)) => erased,
            _ => Self::missing_pool(id),
        };
        match erased.as_any().downcast_ref::<ComponentPool<C>>() {
            Some(pool) => pool,
            None => Self::missing_pool(id),
        }
    }

    /// Mutable variant of [`pool`](Self::pool); same fatal policy.
    pub(crate) fn pool_mut<C: 'static + Send + Sync>(&mut self) -> &mut ComponentPool<C> {
        let id = component_id_of::<C>();
        let erased = match self.pools.get_mut(id as usize) {
            Some(Some(erased)) => erased,
            _ => Self::missing_pool(id),
        };
        match erased.as_any_mut().downcast_mut::<ComponentPool<C>>() {
            Some(pool) => pool,
            None => Self::missing_pool(id),
        }
    }

    pub(crate) fn add<C: 'static + Send + Sync>(&mut self, entity: EntityID, component: C) {
        self.pool_mut::<C>().add(entity, component);
    }

    pub(crate) fn remove<C: 'static + Send + Sync>(&mut self, entity: EntityID) {
        self.pool_mut::<C>().remove(entity);
    }

    pub(crate) fn get<C: 'static + Send + Sync>(&self, entity: EntityID) -> Option<&C> {
        self.pool::<C>().get(entity)
    }

    pub(crate) fn get_mut<C: 'static + Send + Sync>(&mut self, entity: EntityID) -> Option<&mut C> {
        self.pool_mut::<C>().get_mut(entity)
    }

    pub(crate) fn clear<C: 'static + Send + Sync>(&mut self) {
        self.pool_mut::<C>().clear();
    }

    /// Removes `entity` from every registered pool.
    pub(crate) fn destroy(&mut self, entity: EntityID) {
        for pool in self.pools.iter_mut().flatten() {
            pool.remove(entity);
        }
    }
}
