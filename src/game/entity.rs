use crate::error::UnpackError;
use crate::value::{Field, Inspect, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierOperation {
    AddValue,
    AddMultipliedBase,
    AddMultipliedTotal,
}

impl ModifierOperation {
    /// Constant name as the game spells it.
    pub fn name(self) -> &'static str {
        match self {
            ModifierOperation::AddValue => "ADD_VALUE",
            ModifierOperation::AddMultipliedBase => "ADD_MULTIPLIED_BASE",
            ModifierOperation::AddMultipliedTotal => "ADD_MULTIPLIED_TOTAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeModifier {
    pub id: String,
    pub value: f64,
    pub operation: ModifierOperation,
}

impl AttributeModifier {
    pub fn new(id: impl Into<String>, value: f64, operation: ModifierOperation) -> Self {
        Self {
            id: id.into(),
            value,
            operation,
        }
    }
}

impl Inspect for AttributeModifier {
    fn fields(&self) -> Result<Vec<Field>, UnpackError> {
        Ok(vec![
            Field::new("id", self.id.as_str()),
            Field::new("value", self.value),
            Field::new("operation", Value::enumeration(self.operation.name())),
        ])
    }
}

/// One attribute of an entity: base value plus the modifiers applied to it,
/// keyed by modifier id.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeEntry {
    pub attribute: String,
    pub base: f64,
    pub modifiers: Vec<AttributeModifier>,
}

impl AttributeEntry {
    pub fn new(attribute: impl Into<String>, base: f64) -> Self {
        Self {
            attribute: attribute.into(),
            base,
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: AttributeModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }
}

impl Inspect for AttributeEntry {
    fn fields(&self) -> Result<Vec<Field>, UnpackError> {
        let modifiers = self
            .modifiers
            .iter()
            .map(|m| (m.id.as_str(), Value::object(m.clone())));
        Ok(vec![
            Field::new("attribute", self.attribute.as_str()),
            Field::new("base", self.base),
            Field::new("modifiers", Value::map(modifiers)),
        ])
    }
}
