use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::error::UnpackError;
use crate::formatters;
use crate::unpacker::Renderer;
use crate::value::short_type_name;

type FormatFn = dyn Fn(&dyn Any, &mut Renderer<'_>) -> Result<String, UnpackError> + Send + Sync;

/// A formatter bound to one concrete type.
pub struct Formatter {
    type_name: &'static str,
    format: Box<FormatFn>,
}

impl Formatter {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn format(&self, value: &dyn Any, renderer: &mut Renderer<'_>) -> Result<String, UnpackError> {
        (self.format)(value, renderer)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Exact-type formatter table. Built once at startup, then shared read-only
/// (usually behind an `Arc`). Lookups never walk to related types: a miss
/// means the reflective path renders the value.
#[derive(Debug, Default)]
pub struct Registry {
    formatters: HashMap<TypeId, Formatter>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in game formatters.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        formatters::register_defaults(&mut registry);
        registry
    }

    /// Registers `format` for values whose concrete type is exactly `T`.
    /// A later registration for the same type replaces the earlier one.
    pub fn register<T, F>(&mut self, format: F)
    where
        T: Any,
        F: Fn(&T, &mut Renderer<'_>) -> Result<String, UnpackError> + Send + Sync + 'static,
    {
        let type_name = short_type_name(std::any::type_name::<T>());
        let format = erase(move |value, renderer| match value.downcast_ref::<T>() {
            Some(value) => format(value, renderer),
            None => Err(UnpackError::formatter(type_name, "value has a different type")),
        });
        self.formatters
            .insert(TypeId::of::<T>(), Formatter { type_name, format });
    }

    pub fn resolve(&self, value: &dyn Any) -> Option<&Formatter> {
        self.formatters.get(&value.type_id())
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    /// Names of all covered types, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.formatters.values().map(|f| f.type_name).collect();
        names.sort_unstable();
        names
    }
}

fn erase<F>(format: F) -> Box<FormatFn>
where
    F: Fn(&dyn Any, &mut Renderer<'_>) -> Result<String, UnpackError> + Send + Sync + 'static,
{
    Box::new(format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{BlockPos, ChunkPos};

    fn format_chunk(pos: &ChunkPos, _: &mut Renderer<'_>) -> Result<String, UnpackError> {
        Ok(format!("chunk {} {}", pos.x, pos.z))
    }

    #[test]
    fn test_resolve_exact_type() {
        let mut registry = Registry::new();
        registry.register(format_chunk);

        let chunk = ChunkPos { x: 1, z: 2 };
        let block = BlockPos { x: 1, y: 2, z: 3 };
        assert!(registry.resolve(&chunk).is_some());
        assert!(registry.resolve(&block).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_defaults_cover_game_types() {
        let registry = Registry::with_defaults();
        let names = registry.names();
        for expected in ["BlockPos", "BlockState", "ItemStack", "NbtCompound", "CustomPayload"] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_resolve_through_dyn_inspect() {
        use crate::value::Inspect;

        let registry = Registry::with_defaults();
        let pos: Box<dyn Inspect> = Box::new(BlockPos { x: 0, y: 0, z: 0 });
        let formatter = registry
            .resolve(pos.as_ref().as_any())
            .expect("BlockPos is registered");
        assert_eq!(formatter.type_name(), "BlockPos");
    }
}
