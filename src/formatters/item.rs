use crate::error::UnpackError;
use crate::game::{ItemComponent, ItemStack};
use crate::unpacker::{format_float, quote, Renderer};
use crate::value::Value;

/// Item stack in the game's command syntax:
/// `{id:"minecraft:diamond_sword",count:1,components:{...}}`.
pub fn format_item_stack(stack: &ItemStack, renderer: &mut Renderer<'_>) -> Result<String, UnpackError> {
    if stack.is_empty() {
        return Ok("{id:\"minecraft:air\",count:0}".to_string());
    }

    let mut out = format!("{{id:{},count:{}", quote(&stack.item), stack.count);
    let components: Vec<String> = stack
        .components
        .iter()
        .filter_map(|c| format_component(c, renderer))
        .collect();
    if !components.is_empty() {
        out.push_str(&format!(",components:{{{}}}", components.join(",")));
    }
    out.push('}');
    Ok(out)
}

/// Container slot entry, `{item:{...},slot:3}`. Empty stacks yield `None`.
pub fn format_slot(stack: &ItemStack, slot: usize, renderer: &mut Renderer<'_>) -> Option<String> {
    if stack.is_empty() {
        return None;
    }
    let item = render_nested(stack, renderer);
    Some(format!("{{item:{},slot:{}}}", item, slot))
}

// Nested stacks go back through the renderer so shulker-in-bundle chains
// stay within the depth limit.
fn render_nested(stack: &ItemStack, renderer: &mut Renderer<'_>) -> String {
    renderer.render(&Value::object(stack.clone()))
}

// Returns None for components that carry nothing worth printing
// (zero damage, empty lists).
fn format_component(component: &ItemComponent, renderer: &mut Renderer<'_>) -> Option<String> {
    let body = match component {
        ItemComponent::CustomName(name) | ItemComponent::ItemName(name) => quote(name),
        ItemComponent::Damage(damage) => {
            if *damage <= 0 {
                return None;
            }
            damage.to_string()
        }
        ItemComponent::MaxDamage(max) => max.to_string(),
        ItemComponent::Enchantments(levels) | ItemComponent::StoredEnchantments(levels) => {
            if levels.is_empty() {
                return None;
            }
            let levels: Vec<String> = levels
                .iter()
                .map(|(id, level)| format!("{}:{}", quote(id), level))
                .collect();
            format!("{{levels:{{{}}}}}", levels.join(","))
        }
        ItemComponent::Lore(lines) => {
            if lines.is_empty() {
                return None;
            }
            format!("[{}]", quoted_list(lines))
        }
        ItemComponent::Unbreakable => "{}".to_string(),
        ItemComponent::CustomModelData(floats) => {
            let floats: Vec<String> = floats.iter().map(|f| format_float(*f as f64)).collect();
            format!("{{floats:[{}]}}", floats.join(","))
        }
        ItemComponent::PotionContents(potion) => match potion {
            Some(potion) => format!("{{potion:{}}}", quote(potion)),
            None => "{}".to_string(),
        },
        ItemComponent::DyedColor(rgb) => format!("{{rgb:{}}}", rgb),
        ItemComponent::CustomData(nbt) => {
            if nbt.is_empty() {
                return None;
            }
            nbt.to_snbt()
        }
        ItemComponent::AttributeModifiers(entries) => {
            if entries.is_empty() {
                return None;
            }
            let modifiers: Vec<String> = entries
                .iter()
                .map(|(attribute, modifier)| {
                    format!(
                        "{{type:{},id:{},amount:{},operation:{}}}",
                        quote(attribute),
                        quote(&modifier.id),
                        format_float(modifier.value),
                        quote(modifier.operation.name())
                    )
                })
                .collect();
            format!("{{modifiers:[{}]}}", modifiers.join(","))
        }
        ItemComponent::Container(items) => {
            let slots: Vec<String> = items
                .iter()
                .enumerate()
                .filter_map(|(slot, item)| format_slot(item, slot, renderer))
                .collect();
            format!("[{}]", slots.join(","))
        }
        ItemComponent::BundleContents(items) => {
            if items.is_empty() {
                return None;
            }
            let items: Vec<String> = items
                .iter()
                .map(|item| render_nested(item, renderer))
                .collect();
            format!("[{}]", items.join(","))
        }
        ItemComponent::WrittenBookContent {
            title,
            author,
            generation,
        } => format!(
            "{{title:{},author:{},generation:{}}}",
            quote(title),
            quote(author),
            generation
        ),
        ItemComponent::WritableBookContent(pages) => {
            if pages.is_empty() {
                return None;
            }
            format!("{{pages:[{}]}}", quoted_list(pages))
        }
        ItemComponent::Other { value, .. } => renderer.render(value),
    };
    Some(format!("{}:{}", quote(component.id()), body))
}

fn quoted_list(items: &[String]) -> String {
    items.iter().map(|s| quote(s)).collect::<Vec<_>>().join(",")
}
