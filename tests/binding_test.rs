use parallax_ngin::error::EngineError;
use parallax_ngin::resources::mesh::BindState;
use parallax_ngin::resources::shader::{UniformBlock, UniformCache, UniformSlot, UniformTag};

#[test]
fn should_start_unarmed() {
    let state = BindState::default();
    assert!(!state.is_armed());
}

#[test]
fn should_fire_only_after_arming() {
    let mut state = BindState::default();
    assert!(matches!(state.fire(), Err(EngineError::NotArmed)));

    state.arm();
    assert!(state.is_armed());
    state.fire().unwrap();
}

#[test]
fn should_consume_the_armed_state_on_fire() {
    let mut state = BindState::default();
    state.arm();
    state.fire().unwrap();

    // A second draw without re-arming is a defect.
    assert!(!state.is_armed());
    assert!(matches!(state.fire(), Err(EngineError::NotArmed)));
}

#[test]
fn should_allow_re_arming_without_firing() {
    let mut state = BindState::default();
    state.arm();
    state.arm();
    assert!(state.is_armed());
    state.fire().unwrap();
}

#[test]
fn should_look_up_cached_single_uniforms() {
    let mut cache = UniformCache::new();
    let slot = UniformSlot {
        block: UniformBlock::Camera,
        offset: 64,
        size: 64,
    };
    cache.cache_single(UniformTag::Projection, slot);

    assert_eq!(cache.single(UniformTag::Projection).unwrap(), slot);
}

#[test]
fn should_fail_on_uncached_single_uniforms() {
    let cache = UniformCache::new();
    assert!(matches!(
        cache.single(UniformTag::Model),
        Err(EngineError::UnknownUniform(UniformTag::Model))
    ));
}

#[test]
fn should_keep_multi_uniform_locations_in_caching_order() {
    let mut cache = UniformCache::new();
    for offset in [0, 64, 128] {
        cache.cache_multi(
            UniformTag::Model,
            UniformSlot {
                block: UniformBlock::Draw,
                offset,
                size: 64,
            },
        );
    }

    for (index, offset) in [0u64, 64, 128].into_iter().enumerate() {
        let slot = cache.multi(UniformTag::Model, index).unwrap();
        assert_eq!(slot.offset, offset);
    }
}

#[test]
fn should_fail_on_out_of_range_multi_index() {
    let mut cache = UniformCache::new();
    cache.cache_multi(
        UniformTag::Model,
        UniformSlot {
            block: UniformBlock::Draw,
            offset: 0,
            size: 64,
        },
    );

    assert!(matches!(
        cache.multi(UniformTag::Model, 1),
        Err(EngineError::UnknownUniform(UniformTag::Model))
    ));
    assert!(matches!(
        cache.multi(UniformTag::View, 0),
        Err(EngineError::UnknownUniform(UniformTag::View))
    ));
}

#[test]
fn should_keep_single_and_multi_namespaces_separate() {
    let mut cache = UniformCache::new();
    cache.cache_multi(
        UniformTag::Model,
        UniformSlot {
            block: UniformBlock::Draw,
            offset: 0,
            size: 64,
        },
    );

    // A multi entry does not satisfy a single lookup.
    assert!(cache.single(UniformTag::Model).is_err());
}
