use crate::error::UnpackError;
use crate::game::AttributeEntry;
use crate::unpacker::{format_float, quote, Renderer};

/// `{attribute:"minecraft:generic.max_health",baseValue:20.0,modifiers:{...}}`
/// with modifiers keyed by id. Entries without modifiers leave the key out.
pub fn format_attribute_entry(
    entry: &AttributeEntry,
    _: &mut Renderer<'_>,
) -> Result<String, UnpackError> {
    let mut out = format!(
        "{{attribute:{},baseValue:{}",
        quote(&entry.attribute),
        format_float(entry.base)
    );
    if !entry.modifiers.is_empty() {
        let modifiers: Vec<String> = entry
            .modifiers
            .iter()
            .map(|m| {
                format!(
                    "{}:{{value:{},operation:{}}}",
                    quote(&m.id),
                    format_float(m.value),
                    quote(m.operation.name())
                )
            })
            .collect();
        out.push_str(&format!(",modifiers:{{{}}}", modifiers.join(",")));
    }
    out.push('}');
    Ok(out)
}
