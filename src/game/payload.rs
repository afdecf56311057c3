use crate::error::UnpackError;
use crate::value::{Field, Inspect, Value};

pub const BRAND_CHANNEL: &str = "minecraft:brand";

/// Plugin-channel payload of a custom payload packet.
#[derive(Debug, Clone)]
pub enum CustomPayload {
    /// Server or client brand string.
    Brand(String),
    /// Undecoded bytes on an unknown channel.
    Raw { channel: String, data: Vec<u8> },
    /// Payload the game already decoded into an object.
    Decoded { channel: String, payload: Value },
}

impl CustomPayload {
    pub fn channel(&self) -> &str {
        match self {
            CustomPayload::Brand(_) => BRAND_CHANNEL,
            CustomPayload::Raw { channel, .. } | CustomPayload::Decoded { channel, .. } => channel,
        }
    }

    /// Name of the payload kind; for decoded payloads, the decoded object's
    /// type name.
    pub fn payload_type(&self) -> String {
        match self {
            CustomPayload::Brand(_) => "Brand".to_string(),
            CustomPayload::Raw { .. } => "Raw".to_string(),
            CustomPayload::Decoded { payload, .. } => match payload {
                Value::Object(obj) => obj.type_name().to_string(),
                _ => "Decoded".to_string(),
            },
        }
    }

    pub fn data(&self) -> Value {
        match self {
            CustomPayload::Brand(brand) => Value::from(brand.as_str()),
            CustomPayload::Raw { data, .. } => Value::bytes(data.clone()),
            CustomPayload::Decoded { payload, .. } => payload.clone(),
        }
    }
}

impl Inspect for CustomPayload {
    fn fields(&self) -> Result<Vec<Field>, UnpackError> {
        Ok(vec![
            Field::new("channel", self.channel()),
            Field::new("data", self.data()),
        ])
    }
}
