//! Built-in formatters for well-known game shapes.
//!
//! Each one only produces better-labelled output than the reflective
//! fallback would; removing any of them never breaks rendering.

mod entity;
mod item;
mod nbt;
mod payload;
mod world;

pub use entity::format_attribute_entry;
pub use item::{format_item_stack, format_slot};
pub use nbt::{format_nbt_compound, format_nbt_element};
pub use payload::format_custom_payload;
pub use world::{format_block_pos, format_block_state, format_chunk_pos, format_vec3d};

use crate::registry::Registry;

pub fn register_defaults(registry: &mut Registry) {
    registry.register(format_block_pos);
    registry.register(format_vec3d);
    registry.register(format_chunk_pos);
    registry.register(format_block_state);
    registry.register(format_nbt_compound);
    registry.register(format_nbt_element);
    registry.register(format_item_stack);
    registry.register(format_attribute_entry);
    registry.register(format_custom_payload);
}
