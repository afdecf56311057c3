use crate::error::UnpackError;
use crate::value::{Field, Inspect, Value};

/// A block with its state properties, e.g. `minecraft:oak_stairs[facing=north]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockState {
    pub block: String,
    /// Property name to value name, in the block's declared property order.
    pub properties: Vec<(String, String)>,
}

impl BlockState {
    pub fn new(block: impl Into<String>) -> Self {
        Self {
            block: block.into(),
            properties: Vec::new(),
        }
    }

    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push((property.into(), value.into()));
        self
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl Inspect for BlockState {
    fn fields(&self) -> Result<Vec<Field>, UnpackError> {
        let properties = self
            .properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()));
        Ok(vec![
            Field::new("block", self.block.as_str()),
            Field::new("properties", Value::map(properties)),
        ])
    }
}
