use proptest::prelude::*;
use unicred_admin_registry::{
    Address, AdminRegistry, MemoryRegistryStore, RegistryCall, RegistryError, RegistryState,
};

// Property-based tests for the registry's authorization rules.
// Callers and arguments are arbitrary 32-byte identities.

fn arbitrary_address() -> impl Strategy<Value = Address> {
    prop::array::uniform32(any::<u8>()).prop_map(Address::new)
}

fn arbitrary_call() -> impl Strategy<Value = RegistryCall> {
    prop_oneof![
        (arbitrary_address(), arbitrary_address()).prop_map(|(platform_admin, college_admin)| {
            RegistryCall::Initialize {
                platform_admin,
                college_admin,
            }
        }),
        arbitrary_address().prop_map(|new_admin| RegistryCall::UpdateCollegeAdmin { new_admin }),
        Just(RegistryCall::GetPlatformAdmin),
        Just(RegistryCall::GetCollegeAdmin),
    ]
}

proptest! {
    #[test]
    fn only_creator_can_initialize(
        creator in arbitrary_address(),
        caller in arbitrary_address(),
        platform in arbitrary_address(),
        college in arbitrary_address(),
    ) {
        prop_assume!(caller != creator);
        let registry = AdminRegistry::new(MemoryRegistryStore::new(creator)).unwrap();

        let result = registry.initialize(&caller, platform, college);
        prop_assert!(
            matches!(result, Err(RegistryError::Unauthorized { .. })),
            "expected Unauthorized"
        );
        prop_assert_eq!(registry.snapshot(), RegistryState::Uninitialized);
    }
}

proptest! {
    #[test]
    fn only_platform_admin_can_update(
        creator in arbitrary_address(),
        platform in arbitrary_address(),
        college in arbitrary_address(),
        caller in arbitrary_address(),
        new_admin in arbitrary_address(),
    ) {
        prop_assume!(caller != platform);
        let registry = AdminRegistry::new(MemoryRegistryStore::new(creator)).unwrap();
        registry.initialize(&creator, platform, college).unwrap();

        let result = registry.update_college_admin(&caller, new_admin);
        prop_assert!(
            matches!(result, Err(RegistryError::Unauthorized { .. })),
            "expected Unauthorized"
        );
        prop_assert_eq!(registry.get_college_admin().unwrap(), college);
    }
}

proptest! {
    #[test]
    fn platform_admin_never_changes_after_initialize(
        creator in arbitrary_address(),
        platform in arbitrary_address(),
        college in arbitrary_address(),
        calls in prop::collection::vec(
            (proptest::option::of(arbitrary_address()), arbitrary_call()),
            1..32,
        ),
    ) {
        let registry = AdminRegistry::new(MemoryRegistryStore::new(creator)).unwrap();
        registry.initialize(&creator, platform, college).unwrap();

        for (caller, call) in calls {
            // `None` means the call comes from the platform admin itself.
            let caller = caller.unwrap_or(platform);
            let _ = registry.dispatch(&caller, &call);
            prop_assert_eq!(registry.get_platform_admin().unwrap(), platform);
            prop_assert!(registry.snapshot().is_active());
        }
    }
}

proptest! {
    #[test]
    fn reads_before_initialize_always_fail(
        creator in arbitrary_address(),
        caller in arbitrary_address(),
    ) {
        let registry = AdminRegistry::new(MemoryRegistryStore::new(creator)).unwrap();
        for call in [RegistryCall::GetPlatformAdmin, RegistryCall::GetCollegeAdmin] {
            prop_assert!(matches!(
                registry.dispatch(&caller, &call),
                Err(RegistryError::NotInitialized)
            ));
        }
    }
}
