// Game data shapes that packets carry. The hook layer converts the game's
// own objects into these before handing them to the logger.

pub mod block;
pub mod entity;
pub mod item;
pub mod nbt;
pub mod payload;
pub mod position;

pub use block::BlockState;
pub use entity::{AttributeEntry, AttributeModifier, ModifierOperation};
pub use item::{ItemComponent, ItemStack};
pub use nbt::{NbtCompound, NbtElement};
pub use payload::CustomPayload;
pub use position::{BlockPos, ChunkPos, Vec3d};
