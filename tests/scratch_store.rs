// std
use std::sync::Arc;
// self
use pkce_login::store::{MemoryScratch, ScratchKey, ScratchStore};

#[test]
fn scratch_pair_round_trips_and_clears_together() {
	let scratch = MemoryScratch::default();

	scratch.put(ScratchKey::CodeVerifier, "verifier-1").expect("Put should succeed.");
	scratch.put(ScratchKey::State, "state-1").expect("Put should succeed.");

	assert_eq!(
		scratch.get(ScratchKey::CodeVerifier).expect("Get should succeed.").as_deref(),
		Some("verifier-1"),
	);
	assert_eq!(
		scratch.get(ScratchKey::State).expect("Get should succeed.").as_deref(),
		Some("state-1"),
	);

	scratch.clear().expect("Clear should succeed.");

	assert_eq!(scratch.get(ScratchKey::CodeVerifier).expect("Get should succeed."), None);
	assert_eq!(scratch.get(ScratchKey::State).expect("Get should succeed."), None);
}

#[test]
fn puts_overwrite_instead_of_merging() {
	let scratch = MemoryScratch::default();

	scratch.put(ScratchKey::State, "state-old").expect("Put should succeed.");
	scratch.put(ScratchKey::State, "state-new").expect("Put should succeed.");

	assert_eq!(
		scratch.get(ScratchKey::State).expect("Get should succeed.").as_deref(),
		Some("state-new"),
	);
}

#[test]
fn store_works_behind_a_trait_object() {
	let scratch: Arc<dyn ScratchStore> = Arc::new(MemoryScratch::default());

	scratch.put(ScratchKey::State, "state-dyn").expect("Put should succeed.");

	assert_eq!(
		scratch.get(ScratchKey::State).expect("Get should succeed.").as_deref(),
		Some("state-dyn"),
	);

	// Clearing an already-empty store is fine.
	scratch.clear().expect("Clear should succeed.");
	scratch.clear().expect("Repeated clear should succeed.");
}
