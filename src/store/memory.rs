//! Thread-safe in-memory [`ScratchStore`] for tests and non-browser hosts.

// self
use crate::{
	_prelude::*,
	store::{ScratchKey, ScratchStore, StoreError},
};

/// In-process scratch storage backed by a locked map.
#[derive(Clone, Debug, Default)]
pub struct MemoryScratch(Arc<RwLock<HashMap<ScratchKey, String>>>);
impl ScratchStore for MemoryScratch {
	fn put(&self, key: ScratchKey, value: &str) -> Result<(), StoreError> {
		self.0.write().insert(key, value.to_owned());

		Ok(())
	}

	fn get(&self, key: ScratchKey) -> Result<Option<String>, StoreError> {
		Ok(self.0.read().get(&key).cloned())
	}

	fn clear(&self) -> Result<(), StoreError> {
		self.0.write().clear();

		Ok(())
	}
}
