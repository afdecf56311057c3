use std::fmt;

use crate::error::UnpackError;
use crate::value::{Field, Inspect, Value};

/// A single NBT tag.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtElement {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    List(Vec<NbtElement>),
    Compound(NbtCompound),
    ByteArray(Vec<i8>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl NbtElement {
    pub fn tag_name(&self) -> &'static str {
        match self {
            NbtElement::Byte(_) => "BYTE",
            NbtElement::Short(_) => "SHORT",
            NbtElement::Int(_) => "INT",
            NbtElement::Long(_) => "LONG",
            NbtElement::Float(_) => "FLOAT",
            NbtElement::Double(_) => "DOUBLE",
            NbtElement::String(_) => "STRING",
            NbtElement::List(_) => "LIST",
            NbtElement::Compound(_) => "COMPOUND",
            NbtElement::ByteArray(_) => "BYTE_ARRAY",
            NbtElement::IntArray(_) => "INT_ARRAY",
            NbtElement::LongArray(_) => "LONG_ARRAY",
        }
    }

    /// Stringified NBT (SNBT), the same text the game's `asString` prints.
    pub fn to_snbt(&self) -> String {
        let mut out = String::new();
        self.write_snbt(&mut out);
        out
    }

    fn write_snbt(&self, out: &mut String) {
        match self {
            NbtElement::Byte(v) => out.push_str(&format!("{}b", v)),
            NbtElement::Short(v) => out.push_str(&format!("{}s", v)),
            NbtElement::Int(v) => out.push_str(&v.to_string()),
            NbtElement::Long(v) => out.push_str(&format!("{}L", v)),
            NbtElement::Float(v) => out.push_str(&format!("{:?}f", v)),
            NbtElement::Double(v) => out.push_str(&format!("{:?}d", v)),
            NbtElement::String(s) => out.push_str(&quote_snbt(s)),
            NbtElement::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.write_snbt(out);
                }
                out.push(']');
            }
            NbtElement::Compound(compound) => compound.write_snbt(out),
            NbtElement::ByteArray(values) => write_typed_array(out, 'B', values, "b"),
            NbtElement::IntArray(values) => write_typed_array(out, 'I', values, ""),
            NbtElement::LongArray(values) => write_typed_array(out, 'L', values, "L"),
        }
    }
}

impl fmt::Display for NbtElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_snbt())
    }
}

/// Compound tag. Keys keep insertion order so output is reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NbtCompound {
    entries: Vec<(String, NbtElement)>,
}

impl NbtCompound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`; a replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: NbtElement) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: NbtElement) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&NbtElement> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NbtElement)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_snbt(&self) -> String {
        let mut out = String::new();
        self.write_snbt(&mut out);
        out
    }

    fn write_snbt(&self, out: &mut String) {
        out.push('{');
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            if is_simple_key(key) {
                out.push_str(key);
            } else {
                out.push_str(&quote_snbt(key));
            }
            out.push(':');
            value.write_snbt(out);
        }
        out.push('}');
    }
}

impl fmt::Display for NbtCompound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_snbt())
    }
}

impl From<&NbtElement> for Value {
    fn from(element: &NbtElement) -> Self {
        match element {
            NbtElement::Byte(v) => Value::from(*v),
            NbtElement::Short(v) => Value::from(*v),
            NbtElement::Int(v) => Value::from(*v),
            NbtElement::Long(v) => Value::from(*v),
            NbtElement::Float(v) => Value::from(*v),
            NbtElement::Double(v) => Value::from(*v),
            NbtElement::String(s) => Value::from(s.as_str()),
            NbtElement::List(items) => Value::seq(items.iter()),
            NbtElement::Compound(compound) => Value::from(compound),
            NbtElement::ByteArray(values) => Value::bytes(values.iter().map(|b| *b as u8).collect::<Vec<_>>()),
            NbtElement::IntArray(values) => Value::seq(values.iter().copied()),
            NbtElement::LongArray(values) => Value::seq(values.iter().copied()),
        }
    }
}

impl From<&NbtCompound> for Value {
    fn from(compound: &NbtCompound) -> Self {
        Value::map(compound.iter())
    }
}

impl Inspect for NbtCompound {
    fn fields(&self) -> Result<Vec<Field>, UnpackError> {
        Ok(self
            .iter()
            .map(|(key, value)| Field::new(key.to_string(), value))
            .collect())
    }
}

impl Inspect for NbtElement {
    fn fields(&self) -> Result<Vec<Field>, UnpackError> {
        Ok(vec![
            Field::new("type", Value::enumeration(self.tag_name())),
            Field::new("value", self),
        ])
    }
}

fn is_simple_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}

fn quote_snbt(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn write_typed_array<T: fmt::Display>(out: &mut String, prefix: char, values: &[T], suffix: &str) {
    out.push('[');
    out.push(prefix);
    out.push(';');
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format!("{}{}", v, suffix));
    }
    out.push(']');
}
