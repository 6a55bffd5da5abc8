use sparse_ecs::prelude::*;

#[derive(Clone, Copy)]
struct A(u32);

#[derive(Clone, Copy)]
struct B(u32);

#[derive(Clone, Copy)]
struct C(u32);

#[derive(Clone, Copy)]
struct D(u32);

struct XorShift(u64);

impl XorShift {
    fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}

fn world() -> Registry {
    let mut registry = Registry::new();
    registry.register_component::<A>();
    registry.register_component::<B>();
    registry.register_component::<C>();
    registry.register_component::<D>();
    registry
}

#[test]
fn view_filters_by_signature() {
    let mut registry = world();

    let e0 = registry.create().id();
    let e1 = registry.create().id();
    registry.add_component(e0, A(0));
    registry.add_component(e1, A(1));
    registry.add_component(e0, B(0));

    let mut both = registry.view::<(A, B)>().entities();
    both.sort_unstable();
    assert_eq!(both, vec![e0]);

    let mut only_a = registry.view::<(A,)>().entities();
    only_a.sort_unstable();
    assert_eq!(only_a, vec![e0, e1]);
}

#[test]
fn cache_hits_while_pools_are_unchanged() {
    let mut registry = world();

    let e0 = registry.create().id();
    let e1 = registry.create().id();
    registry.add_component(e0, A(0));
    registry.add_component(e1, A(1));
    registry.add_component(e0, B(0));

    let mut view = registry.view::<(A, B)>();
    view.each(|_, _| {});
    assert_eq!(view.rebuild_count(), 1);

    // No pool changed shape, so the second pass reuses the cache.
    view.each(|_, _| {});
    view.each(|_, _| {});
    assert_eq!(view.rebuild_count(), 1);
}

#[test]
fn cache_rebuilds_after_membership_change() {
    let mut registry = world();

    let e0 = registry.create().id();
    let e1 = registry.create().id();
    registry.add_component(e0, A(0));
    registry.add_component(e1, A(1));
    registry.add_component(e0, B(0));

    {
        let mut view = registry.view::<(A, B)>();
        assert_eq!(view.entities(), vec![e0]);
        assert_eq!(view.rebuild_count(), 1);
    }

    registry.add_component(e1, B(1));

    let mut view = registry.view::<(A, B)>();
    let mut visited = view.entities();
    visited.sort_unstable();
    assert_eq!(visited, vec![e0, e1]);
    assert_eq!(view.rebuild_count(), 2);
}

#[test]
fn overwrite_in_place_does_not_invalidate_the_cache() {
    let mut registry = world();

    let entity = registry.create().id();
    registry.add_component(entity, A(1));
    registry.add_component(entity, B(2));

    {
        let mut view = registry.view::<(A, B)>();
        view.each(|_, _| {});
        assert_eq!(view.rebuild_count(), 1);
    }

    // Same membership, new value: no structural change, no rebuild, and the
    // iteration sees the current value.
    registry.add_component(entity, A(99));

    let mut view = registry.view::<(A, B)>();
    let mut seen = 0;
    view.each(|_, (a, _)| seen = a.0);
    assert_eq!(seen, 99);
    assert_eq!(view.rebuild_count(), 1);
}

#[test]
fn each_grants_mutable_access() {
    let mut registry = world();

    for i in 0..10 {
        let entity = registry.create().id();
        registry.add_component(entity, A(i));
        registry.add_component(entity, B(0));
    }

    registry.view::<(A, B)>().each(|_, (a, b)| {
        b.0 = a.0 * 2;
    });

    for (i, b) in registry.components::<B>().iter().enumerate() {
        let a = registry.components::<A>()[i].0;
        assert_eq!(b.0, a * 2);
    }
}

#[test]
fn destroyed_entities_leave_views_after_update() {
    let mut registry = world();

    let e0 = registry.create().id();
    let e1 = registry.create().id();
    registry.add_component(e0, A(0));
    registry.add_component(e1, A(1));

    // Collect-then-destroy: views stay stable during iteration, the queue
    // is applied at update().
    let doomed = registry.view::<(A,)>().entities();
    for entity in doomed {
        registry.destroy(entity);
    }
    registry.update();

    assert!(registry.view::<(A,)>().entities().is_empty());
}

#[test]
fn wider_tuples_visit_the_intersection() {
    let mut registry = world();

    let mut expected = Vec::new();
    for i in 0..50u32 {
        let entity = registry.create().id();
        registry.add_component(entity, A(i));
        if i % 2 == 0 {
            registry.add_component(entity, B(i));
        }
        if i % 3 == 0 {
            registry.add_component(entity, C(i));
        }
        if i % 5 == 0 {
            registry.add_component(entity, D(i));
        }
        if i % 2 == 0 && i % 3 == 0 && i % 5 == 0 {
            expected.push(entity);
        }
    }

    let mut visited = Vec::new();
    registry.view::<(A, B, C, D)>().each(|entity, (a, b, c, d)| {
        assert_eq!(a.0, b.0);
        assert_eq!(b.0, c.0);
        assert_eq!(c.0, d.0);
        visited.push(entity);
    });
    visited.sort_unstable();
    assert_eq!(visited, expected);
}

#[test]
fn view_is_sound_and_complete_under_random_membership() {
    let mut registry = world();
    let mut rng = XorShift::new(0xC0FFEE);

    let required = signature_bits(&[component_id_of::<A>(), component_id_of::<B>()]);

    for _ in 0..500 {
        let entity = registry.create().id();
        if rng.next() % 2 == 0 {
            registry.add_component(entity, A(entity));
        }
        if rng.next() % 3 == 0 {
            registry.add_component(entity, B(entity));
        }
        if rng.next() % 7 == 0 {
            registry.destroy(entity);
        }
    }
    registry.update();

    let mut expected: Vec<EntityID> = registry
        .alive()
        .iter()
        .copied()
        .filter(|&entity| registry.signatures()[entity as usize] & required == required)
        .collect();
    expected.sort_unstable();

    let mut visited = Vec::new();
    registry.view::<(A, B)>().each(|entity, (a, b)| {
        // Values point at the live components of exactly this entity.
        assert_eq!(a.0, entity);
        assert_eq!(b.0, entity);
        visited.push(entity);
    });
    visited.sort_unstable();

    assert_eq!(visited, expected);
}

#[test]
fn removal_updates_views() {
    let mut registry = world();

    let e0 = registry.create().id();
    let e1 = registry.create().id();
    registry.add_component(e0, A(0));
    registry.add_component(e1, A(1));
    registry.add_component(e0, B(0));
    registry.add_component(e1, B(1));

    assert_eq!(registry.view::<(A, B)>().entities().len(), 2);

    registry.remove_component::<B>(e0);

    assert_eq!(registry.view::<(A, B)>().entities(), vec![e1]);
}

#[test]
fn clear_forces_rebuild_to_empty() {
    let mut registry = world();

    for i in 0..5 {
        let entity = registry.create().id();
        registry.add_component(entity, A(i));
    }
    assert_eq!(registry.view::<(A,)>().entities().len(), 5);

    registry.clear::<A>();

    assert!(registry.view::<(A,)>().entities().is_empty());
}

fn signature_bits(ids: &[ComponentID]) -> Signature {
    ids.iter().fold(0, |acc, &id| acc | (1 << id))
}
