/// What to do with an `Item` whose `server_id` the catalog doesn't
/// recognize (spec.md §7, `CodecError.UnknownItemId`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownItemPolicy {
    /// Replace with `server_id = 0`, keep the original id in the warning.
    Placeholder,
    /// Omit the item entirely, still warn.
    Skip,
    /// Fail the load fatally.
    Error,
}

/// Hard stop thresholds an external caller can set before a load runs
/// away on a hostile or corrupt file. Checked as the loader walks tiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryGuard {
    pub max_tiles: Option<usize>,
    pub max_bytes: Option<usize>,
}

impl MemoryGuard {
    pub fn check_tile_count(&self, count: usize) -> Result<(), crate::CodecError> {
        if let Some(max) = self.max_tiles {
            if count > max {
                return Err(crate::CodecError::MemoryGuardTrip("tile count exceeded"));
            }
        }
        Ok(())
    }

    pub fn check_byte_len(&self, len: usize) -> Result<(), crate::CodecError> {
        if let Some(max) = self.max_bytes {
            if len > max {
                return Err(crate::CodecError::MemoryGuardTrip("input exceeded byte limit"));
            }
        }
        Ok(())
    }
}

/// Explicit configuration threaded through a load, replacing the source's
/// monkey-patched loader callbacks (spec.md §9). The warning sink and item
/// catalog are threaded separately as generic parameters rather than
/// stored here, since both are borrowed collaborators with their own
/// lifetimes.
#[derive(Debug, Clone, Copy)]
pub struct LoaderConfig {
    pub unknown_item_policy: UnknownItemPolicy,
    pub allow_unsupported_versions: bool,
    pub memory_guard: MemoryGuard,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            unknown_item_policy: UnknownItemPolicy::Placeholder,
            allow_unsupported_versions: false,
            memory_guard: MemoryGuard::default(),
        }
    }
}
