use crate::error::UnpackError;
use crate::game::{NbtCompound, NbtElement};
use crate::unpacker::Renderer;

pub fn format_nbt_compound(nbt: &NbtCompound, _: &mut Renderer<'_>) -> Result<String, UnpackError> {
    Ok(nbt.to_snbt())
}

pub fn format_nbt_element(nbt: &NbtElement, _: &mut Renderer<'_>) -> Result<String, UnpackError> {
    Ok(nbt.to_snbt())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::game::{NbtCompound, NbtElement};
    use crate::registry::Registry;
    use crate::unpacker::{Limits, Unpacker};
    use crate::value::Value;

    fn chest() -> NbtCompound {
        NbtCompound::new()
            .with("id", NbtElement::String("minecraft:chest".to_string()))
            .with("Lock", NbtElement::String(String::new()))
    }

    #[test]
    fn test_compound_renders_as_snbt() {
        let out = Unpacker::default().unpack(&Value::object(chest()));
        assert_eq!(out, "{id:\"minecraft:chest\",Lock:\"\"}");
    }

    #[test]
    fn test_reflective_fallback_without_formatter() {
        let unpacker = Unpacker::new(Arc::new(Registry::new()), Limits::default());
        let out = unpacker.unpack(&Value::object(chest()));
        assert_eq!(out, "{id:\"minecraft:chest\",Lock:\"\"}");

        let out = unpacker.unpack(&Value::object(NbtElement::Byte(1)));
        assert_eq!(out, "{type:\"BYTE\",value:1}");
    }
}
