use crate::error::UnpackError;
use crate::game::entity::AttributeModifier;
use crate::game::nbt::NbtCompound;
use crate::value::{Field, Inspect, Value};

pub const AIR: &str = "minecraft:air";

/// Data component attached to an item stack.
#[derive(Debug, Clone)]
pub enum ItemComponent {
    CustomName(String),
    ItemName(String),
    Damage(i32),
    MaxDamage(i32),
    /// Enchantment id and level.
    Enchantments(Vec<(String, u32)>),
    StoredEnchantments(Vec<(String, u32)>),
    Lore(Vec<String>),
    Unbreakable,
    CustomModelData(Vec<f32>),
    PotionContents(Option<String>),
    DyedColor(i32),
    CustomData(NbtCompound),
    /// Attribute id and the modifier applied to it.
    AttributeModifiers(Vec<(String, AttributeModifier)>),
    Container(Vec<ItemStack>),
    BundleContents(Vec<ItemStack>),
    WrittenBookContent {
        title: String,
        author: String,
        generation: i32,
    },
    WritableBookContent(Vec<String>),
    /// Any component without a dedicated variant.
    Other { id: String, value: Value },
}

impl ItemComponent {
    /// Namespaced component type id.
    pub fn id(&self) -> &str {
        match self {
            ItemComponent::CustomName(_) => "minecraft:custom_name",
            ItemComponent::ItemName(_) => "minecraft:item_name",
            ItemComponent::Damage(_) => "minecraft:damage",
            ItemComponent::MaxDamage(_) => "minecraft:max_damage",
            ItemComponent::Enchantments(_) => "minecraft:enchantments",
            ItemComponent::StoredEnchantments(_) => "minecraft:stored_enchantments",
            ItemComponent::Lore(_) => "minecraft:lore",
            ItemComponent::Unbreakable => "minecraft:unbreakable",
            ItemComponent::CustomModelData(_) => "minecraft:custom_model_data",
            ItemComponent::PotionContents(_) => "minecraft:potion_contents",
            ItemComponent::DyedColor(_) => "minecraft:dyed_color",
            ItemComponent::CustomData(_) => "minecraft:custom_data",
            ItemComponent::AttributeModifiers(_) => "minecraft:attribute_modifiers",
            ItemComponent::Container(_) => "minecraft:container",
            ItemComponent::BundleContents(_) => "minecraft:bundle_contents",
            ItemComponent::WrittenBookContent { .. } => "minecraft:written_book_content",
            ItemComponent::WritableBookContent(_) => "minecraft:writable_book_content",
            ItemComponent::Other { id, .. } => id,
        }
    }

    /// Plain value view used when no formatter is registered for item stacks.
    pub fn to_value(&self) -> Value {
        match self {
            ItemComponent::CustomName(s) | ItemComponent::ItemName(s) => Value::from(s.as_str()),
            ItemComponent::Damage(n) | ItemComponent::MaxDamage(n) | ItemComponent::DyedColor(n) => {
                Value::from(*n)
            }
            ItemComponent::Enchantments(levels) | ItemComponent::StoredEnchantments(levels) => {
                Value::map(levels.iter().map(|(id, level)| (id.as_str(), *level)))
            }
            ItemComponent::Lore(lines) | ItemComponent::WritableBookContent(lines) => {
                Value::seq(lines.iter().map(String::as_str))
            }
            ItemComponent::Unbreakable => Value::Map(Vec::new()),
            ItemComponent::CustomModelData(floats) => Value::seq(floats.iter().copied()),
            ItemComponent::PotionContents(potion) => Value::from(potion.clone()),
            ItemComponent::CustomData(nbt) => Value::from(nbt),
            ItemComponent::AttributeModifiers(entries) => Value::seq(
                entries
                    .iter()
                    .map(|(attribute, modifier)| {
                        Value::map(vec![
                            ("type", Value::from(attribute.as_str())),
                            ("modifier", Value::object(modifier.clone())),
                        ])
                    }),
            ),
            ItemComponent::Container(items) | ItemComponent::BundleContents(items) => {
                Value::seq(items.iter().map(|item| Value::object(item.clone())))
            }
            ItemComponent::WrittenBookContent {
                title,
                author,
                generation,
            } => Value::map(vec![
                ("title", Value::from(title.as_str())),
                ("author", Value::from(author.as_str())),
                ("generation", Value::from(*generation)),
            ]),
            ItemComponent::Other { value, .. } => value.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ItemStack {
    pub item: String,
    pub count: i32,
    pub components: Vec<ItemComponent>,
}

impl Default for ItemStack {
    fn default() -> Self {
        Self::empty()
    }
}

impl ItemStack {
    pub fn new(item: impl Into<String>, count: i32) -> Self {
        Self {
            item: item.into(),
            count,
            components: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(AIR, 0)
    }

    pub fn with(mut self, component: ItemComponent) -> Self {
        self.components.push(component);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.count <= 0 || self.item == AIR
    }
}

impl Inspect for ItemStack {
    fn fields(&self) -> Result<Vec<Field>, UnpackError> {
        let components = self.components.iter().map(|c| (c.id(), c.to_value()));
        Ok(vec![
            Field::new("item", self.item.as_str()),
            Field::new("count", self.count),
            Field::new("components", Value::map(components)),
        ])
    }
}
