//! # Cached Views
//!
//! A view is a cached projection of the entities that own a fixed tuple of
//! component types.
//!
//! ## Purpose
//! Iterating "all entities with Position and Velocity" should not rescan the
//! world every frame. A view samples the version counter of every
//! participating pool; while the sampled vector matches the stored one, the
//! cached entity list is reused untouched. Any structural pool change
//! (insert, remove, clear) bumps a version and forces a rebuild on the next
//! access.
//!
//! ## Rebuild algorithm
//! 1. Sample the versions of all participating pools; on equality with the
//!    stored sample, return (cache hit).
//! 2. Pick the pool with the fewest entities as the **driver**.
//! 3. For each entity in the driver, keep it iff its signature contains the
//!    view's signature; record its dense index in every pool.
//! 4. Store the sampled versions.
//!
//! The cache holds dense indices, not pointers; component references are
//! resolved against the pools' current storage when iteration starts. An
//! in-place component overwrite therefore neither invalidates the cache nor
//! stales anything it returns.
//!
//! ## Access model
//! [`View`] borrows the registry's pools mutably for its lifetime, so the
//! borrow checker rules out pool mutation from inside [`View::each`]. To
//! destroy entities discovered during iteration, collect their IDs and
//! submit them to `Registry::destroy` afterwards; destruction is deferred to
//! `Registry::update` either way.

use crate::engine::component::component_id_of;
use crate::engine::manager::ComponentManager;
use crate::engine::types::{
    contains_all, signature_bit, ComponentID, EntityID, Index, Signature, INVALID_INDEX,
};

/// Identity of a view: signature plus the ordered component tuple.
///
/// Two tuples with the same component set but different order are distinct
/// views; the order fixes the callback argument layout.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(crate) struct ViewKey {
    pub(crate) signature: Signature,
    pub(crate) order: Vec<ComponentID>,
}

/// An ordered tuple of component types a view can iterate.
///
/// Implemented for tuples of arity 1 through 4. All tuple elements must be
/// distinct types; a duplicated element would alias mutable component
/// references and is rejected when the view is created.
pub trait ViewTuple: 'static {
    /// Dense index per participating pool, in tuple order.
    type Indices: Copy + Send + Sync + 'static;

    /// Sampled pool versions, in tuple order.
    type Versions: Copy + PartialEq + Send + Sync + 'static;

    /// Base pointers into the pools' dense storage, in tuple order.
    type Ptrs: Copy;

    /// Mutable component references handed to the iteration callback.
    type Refs<'a>;

    /// Component IDs in tuple order.
    fn component_ids() -> Vec<ComponentID>;

    /// OR of the tuple's signature bits.
    fn signature() -> Signature;

    /// Version sample that can never match a live pool, forcing the first
    /// access to rebuild.
    fn initial_versions() -> Self::Versions;

    /// Samples the current version of every participating pool.
    fn versions(components: &ComponentManager) -> Self::Versions;

    /// Dense entity list of the smallest participating pool.
    fn driver(components: &ComponentManager) -> &[EntityID];

    /// Dense index of `entity` in every pool, or `None` if any pool lacks it.
    fn indices_of(components: &ComponentManager, entity: EntityID) -> Option<Self::Indices>;

    /// Base pointers of the pools' dense storage, valid until the next
    /// structural change.
    fn base_ptrs(components: &mut ComponentManager) -> Self::Ptrs;

    /// Resolves one cached row into component references.
    ///
    /// # Safety
    /// `ptrs` must come from [`base_ptrs`](Self::base_ptrs) with no pool
    /// mutation since, `indices` must be in bounds of each pool's dense
    /// storage, and the tuple's component types must be pairwise distinct so
    /// the produced references cannot alias.
    unsafe fn deref<'a>(ptrs: Self::Ptrs, indices: Self::Indices) -> Self::Refs<'a>;
}

pub(crate) struct ViewState<T: ViewTuple> {
    versions: T::Versions,
    cache: Vec<(EntityID, T::Indices)>,
    rebuilds: u64,
}

impl<T: ViewTuple> ViewState<T> {
    pub(crate) fn new() -> Self {
        Self {
            versions: T::initial_versions(),
            cache: Vec::new(),
            rebuilds: 0,
        }
    }
}

/// Iteration handle over the entities owning the component tuple `T`.
///
/// The cached entity list lives in the registry and survives between
/// borrows; this handle refreshes it lazily and resolves component
/// references on demand.
pub struct View<'r, T: ViewTuple> {
    state: &'r mut ViewState<T>,
    components: &'r mut ComponentManager,
    signatures: &'r [Signature],
}

impl<'r, T: ViewTuple> View<'r, T> {
    pub(crate) fn new(
        state: &'r mut ViewState<T>,
        components: &'r mut ComponentManager,
        signatures: &'r [Signature],
    ) -> Self {
        Self {
            state,
            components,
            signatures,
        }
    }

    fn refresh(&mut self) {
        let sampled = T::versions(self.components);
        if sampled == self.state.versions {
            return;
        }

        let required = T::signature();
        let driver = T::driver(&*self.components);

        self.state.cache.clear();
        self.state.cache.reserve(driver.len());

        for &entity in driver {
            if !contains_all(self.signatures[entity as usize], required) {
                continue;
            }
            if let Some(indices) = T::indices_of(&*self.components, entity) {
                self.state.cache.push((entity, indices));
            }
        }

        self.state.versions = sampled;
        self.state.rebuilds += 1;
    }

    /// Invokes `f` once per matching entity with mutable references to its
    /// components, refreshing the cache first if any pool changed shape.
    ///
    /// Iteration order follows the driver pool's dense order at rebuild
    /// time; callers must not rely on any particular permutation.
    pub fn each<F>(&mut self, mut f: F)
    where
        F: for<'a> FnMut(EntityID, T::Refs<'a>),
    {
        self.refresh();

        let ptrs = T::base_ptrs(self.components);
        for &(entity, indices) in &self.state.cache {
            // SAFETY: refresh() resolved the indices against the current
            // dense storage, the pools cannot change shape while this View
            // holds the manager borrow, and tuple types are pairwise
            // distinct (checked at view creation).
            let refs = unsafe { T::deref(ptrs, indices) };
            f(entity, refs);
        }
    }

    /// Returns the matching entity IDs, refreshing the cache first.
    pub fn entities(&mut self) -> Vec<EntityID> {
        self.refresh();
        self.state.cache.iter().map(|&(entity, _)| entity).collect()
    }

    /// Number of cache rebuilds this view has performed.
    pub fn rebuild_count(&self) -> u64 {
        self.state.rebuilds
    }
}

macro_rules! impl_view_tuple {
    ($len:literal; $(($c:ident, $idx:tt)),+) => {
        impl<$($c: 'static + Send + Sync),+> ViewTuple for ($($c,)+) {
            type Indices = [Index; $len];
            type Versions = [u64; $len];
            type Ptrs = ($(*mut $c,)+);
            type Refs<'a> = ($(&'a mut $c,)+);

            fn component_ids() -> Vec<ComponentID> {
                vec![$(component_id_of::<$c>()),+]
            }

            fn signature() -> Signature {
                0 $(| signature_bit(component_id_of::<$c>()))+
            }

            fn initial_versions() -> Self::Versions {
                [u64::MAX; $len]
            }

            fn versions(components: &ComponentManager) -> Self::Versions {
                [$(components.pool::<$c>().version()),+]
            }

            fn driver(components: &ComponentManager) -> &[EntityID] {
                let candidates: [&[EntityID]; $len] = [$(components.pool::<$c>().entities()),+];
                let mut smallest = candidates[0];
                for entities in candidates {
                    if entities.len() < smallest.len() {
                        smallest = entities;
                    }
                }
                smallest
            }

            fn indices_of(components: &ComponentManager, entity: EntityID) -> Option<Self::Indices> {
                Some([$({
                    let index = components.pool::<$c>().index_of(entity);
                    if index == INVALID_INDEX {
                        return None;
                    }
                    index
                }),+])
            }

            fn base_ptrs(components: &mut ComponentManager) -> Self::Ptrs {
                ($(components.pool_mut::<$c>().components_ptr(),)+)
            }

            unsafe fn deref<'a>(ptrs: Self::Ptrs, indices: Self::Indices) -> Self::Refs<'a> {
                // SAFETY: forwarded to the caller; see the trait contract.
                unsafe { ($(&mut *ptrs.$idx.add(indices[$idx] as usize),)+) }
            }
        }
    };
}

impl_view_tuple!(1; (C0, 0));
impl_view_tuple!(2; (C0, 0), (C1, 1));
impl_view_tuple!(3; (C0, 0), (C1, 1), (C2, 2));
impl_view_tuple!(4; (C0, 0), (C1, 1), (C2, 2), (C3, 3));
