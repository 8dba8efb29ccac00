use tracing::instrument;

use crate::{
    config::RegistryConfig,
    error::PosetError,
    handle::{HandleAllocator, PosetHandle},
    poset::Poset,
};

/// Owner of every live poset, addressed by [`PosetHandle`].
///
/// The methods named after the engine calls (`new_poset`, `delete`, `size`,
/// `insert`, `remove`, `add`, `del`, `test`, `clear`) never fail loudly: a
/// refused call returns `false` (or `0`) and logs the reason at `warn`.
/// For typed errors, borrow the poset with [`Registry::get`] or
/// [`Registry::get_mut`] and call its methods directly.
#[derive(Debug, Default)]
pub struct Registry {
    posets: HandleAllocator<Poset>,
    element_capacity: usize,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: &RegistryConfig) -> Self {
        Self {
            posets: HandleAllocator::with_capacity(config.slot_capacity),
            element_capacity: config.element_capacity,
        }
    }

    #[must_use]
    pub fn is_live(&self, handle: PosetHandle) -> bool {
        self.posets.is_live(handle)
    }

    /// # Errors
    ///
    /// [`PosetError::HandleNotFound`] if the handle is not live.
    pub fn get(&self, handle: PosetHandle) -> Result<&Poset, PosetError> {
        self.posets
            .get(handle)
            .ok_or(PosetError::HandleNotFound(handle))
    }

    /// # Errors
    ///
    /// [`PosetError::HandleNotFound`] if the handle is not live.
    pub fn get_mut(&mut self, handle: PosetHandle) -> Result<&mut Poset, PosetError> {
        self.posets
            .get_mut(handle)
            .ok_or(PosetError::HandleNotFound(handle))
    }

    pub fn live_handles(&self) -> impl Iterator<Item = PosetHandle> + '_ {
        self.posets.handles()
    }

    /// Number of live posets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.posets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posets.is_empty()
    }

    /// Creates an empty poset, reusing the most recently deleted handle if
    /// there is one.
    #[instrument(level = "debug", skip(self))]
    pub fn new_poset(&mut self) -> PosetHandle {
        let handle = self
            .posets
            .allocate(Poset::with_capacity(self.element_capacity));
        tracing::debug!(%handle, "poset created");
        handle
    }

    /// Discards the poset and frees its handle for reuse.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, handle: PosetHandle) {
        let outcome = self
            .posets
            .free(handle)
            .map(drop)
            .ok_or(PosetError::HandleNotFound(handle));
        report(outcome, "poset deleted");
    }

    /// Number of elements, or `0` if the poset does not exist.
    #[instrument(level = "debug", skip(self))]
    pub fn size(&self, handle: PosetHandle) -> usize {
        match self.get(handle) {
            Ok(poset) => {
                tracing::debug!(size = poset.len(), "poset size");
                poset.len()
            }
            Err(err) => {
                tracing::warn!(%err, "size refused");
                0
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, handle: PosetHandle, name: &str) -> bool {
        let outcome = self
            .get_mut(handle)
            .and_then(|poset| poset.insert(name))
            .map(drop);
        report(outcome, "element inserted")
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, handle: PosetHandle, name: &str) -> bool {
        let outcome = self
            .get_mut(handle)
            .and_then(|poset| poset.remove(name))
            .map(drop);
        report(outcome, "element removed")
    }

    /// Adds `lesser <= greater`; see [`Poset::add_relation`].
    #[instrument(level = "debug", skip(self))]
    pub fn add(&mut self, handle: PosetHandle, lesser: &str, greater: &str) -> bool {
        let outcome = self
            .get_mut(handle)
            .and_then(|poset| poset.add_relation(lesser, greater));
        report(outcome, "relation added")
    }

    /// Deletes the covering pair `lesser <= greater`; see
    /// [`Poset::remove_relation`].
    #[instrument(level = "debug", skip(self))]
    pub fn del(&mut self, handle: PosetHandle, lesser: &str, greater: &str) -> bool {
        let outcome = self
            .get_mut(handle)
            .and_then(|poset| poset.remove_relation(lesser, greater));
        report(outcome, "relation deleted")
    }

    /// Whether `lesser <= greater` holds in the poset.
    #[instrument(level = "debug", skip(self))]
    pub fn test(&self, handle: PosetHandle, lesser: &str, greater: &str) -> bool {
        let outcome = self.get(handle).and_then(|poset| {
            for name in [lesser, greater] {
                if name.is_empty() {
                    return Err(PosetError::InvalidArgument);
                }
                if !poset.contains(name) {
                    return Err(PosetError::NameNotFound(name.to_owned()));
                }
            }
            Ok(poset.test(lesser, greater))
        });
        match outcome {
            Ok(holds) => {
                tracing::debug!(holds, "relation tested");
                holds
            }
            Err(err) => {
                tracing::warn!(%err, "test refused");
                false
            }
        }
    }

    /// Empties the poset but keeps its handle.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self, handle: PosetHandle) {
        let outcome = self.get_mut(handle).map(Poset::clear);
        report(outcome, "poset cleared");
    }
}

fn report(outcome: Result<(), PosetError>, done: &str) -> bool {
    match outcome {
        Ok(()) => {
            tracing::debug!("{done}");
            true
        }
        Err(err) => {
            tracing::warn!(%err, "call refused");
            false
        }
    }
}
