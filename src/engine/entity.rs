use crate::engine::registry::Registry;
use crate::engine::types::EntityID;

/// Convenience handle pairing an [`EntityID`] with the registry that issued
/// it.
///
/// ## Purpose
/// Forwards the per-entity operations to the registry so call sites read as
/// `entity.add(Position { .. })` instead of threading the ID through
/// registry calls.
///
/// ## Notes
/// The handle borrows the registry mutably and is meant to be short-lived;
/// keep the raw [`id`](Entity::id) for long-term storage and re-wrap it with
/// `Registry::entity` when needed. A handle whose entity has been destroyed
/// is not dangling: `valid()` reports `false` and `get` returns `None`.
pub struct Entity<'r> {
    id: EntityID,
    registry: &'r mut Registry,
}

impl<'r> Entity<'r> {
    pub(crate) fn new(id: EntityID, registry: &'r mut Registry) -> Self {
        Self { id, registry }
    }

    /// The wrapped entity ID.
    #[inline]
    pub fn id(&self) -> EntityID {
        self.id
    }

    /// Returns `true` if the entity is currently live.
    pub fn valid(&self) -> bool {
        self.registry.valid(self.id)
    }

    /// Attaches `component`, overwriting in place if already owned.
    pub fn add<C: 'static + Send + Sync>(&mut self, component: C) {
        self.registry.add_component(self.id, component);
    }

    /// Detaches component type `C`; no-op if not owned.
    pub fn remove<C: 'static + Send + Sync>(&mut self) {
        self.registry.remove_component::<C>(self.id);
    }

    /// Returns the entity's `C`, if live and owned.
    pub fn get<C: 'static + Send + Sync>(&self) -> Option<&C> {
        self.registry.get_component::<C>(self.id)
    }

    /// Mutable variant of [`get`](Self::get).
    pub fn get_mut<C: 'static + Send + Sync>(&mut self) -> Option<&mut C> {
        self.registry.get_component_mut::<C>(self.id)
    }

    /// Returns `true` if the entity is live and owns a `C`.
    pub fn has<C: 'static + Send + Sync>(&self) -> bool {
        self.registry.has_component::<C>(self.id)
    }

    /// Schedules the entity for destruction at the registry's next `update`.
    pub fn destroy(self) {
        self.registry.destroy(self.id);
    }
}
