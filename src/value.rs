// Dynamic value model handed to the unpacker by the packet hooks.

use std::any::Any;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::UnpackError;

/// A value to be rendered. Scalars and containers are owned; compound
/// structured values are shared through `Object` so that graphs (including
/// self-referencing ones) can be expressed.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Uuid(Uuid),
    /// Raw byte buffer, rendered as hex when short.
    Bytes(Vec<u8>),
    /// Arrays, lists and sets.
    Seq(Vec<Value>),
    /// Keyed collection in iteration order.
    Map(Vec<(Value, Value)>),
    /// `None` renders as `empty`, not `null`.
    Optional(Option<Box<Value>>),
    /// Symbolic constant name of an enumeration.
    Enum(String),
    Object(Arc<dyn Inspect>),
}

impl Value {
    pub fn object<T: Inspect + 'static>(value: T) -> Self {
        Value::Object(Arc::new(value))
    }

    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        Value::Bytes(data.into())
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Value::Enum(name.into())
    }

    pub fn seq<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }

    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::UInt(n) => f.debug_tuple("UInt").field(n).finish(),
            Value::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Uuid(u) => f.debug_tuple("Uuid").field(u).finish(),
            Value::Bytes(b) => write!(f, "Bytes(len={})", b.len()),
            Value::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Value::Optional(inner) => f.debug_tuple("Optional").field(inner).finish(),
            Value::Enum(name) => f.debug_tuple("Enum").field(name).finish(),
            Value::Object(obj) => write!(f, "Object({})", obj.type_name()),
        }
    }
}

/// Upcast helper so registry lookups can see the concrete type behind a
/// `dyn Inspect`.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Field enumeration for structured values.
///
/// `fields` lists instance fields in declaration order. Types that embed a
/// "base" struct append the base's fields after their own, the same order a
/// class hierarchy walk from subclass to superclass produces.
pub trait Inspect: AsAny + Send + Sync {
    /// Type label used for logging and packet filtering.
    fn type_name(&self) -> &str {
        short_type_name(std::any::type_name::<Self>())
    }

    fn fields(&self) -> Result<Vec<Field>, UnpackError>;
}

/// One named field. An `Err` value marks a field that could not be read;
/// the serializer skips it.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: Cow<'static, str>,
    pub value: Result<Value, UnpackError>,
}

impl Field {
    pub fn new(name: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: Ok(value.into()),
        }
    }

    pub fn unreadable(name: impl Into<Cow<'static, str>>, error: UnpackError) -> Self {
        Self {
            name: name.into(),
            value: Err(error),
        }
    }
}

/// Strips module paths and generic arguments: `a::b::Foo<c::Bar>` -> `Foo`.
pub fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Identity key of a compound value: the address of its data.
pub(crate) fn identity(obj: &dyn Inspect) -> usize {
    obj as *const dyn Inspect as *const () as usize
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::UInt(v as u64)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::seq(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        Value::Optional(v.map(|inner| Box::new(inner.into())))
    }
}

impl<K: Into<Value>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(v: BTreeMap<K, V>) -> Self {
        Value::map(v)
    }
}

impl<T: Inspect + 'static> From<Arc<T>> for Value {
    fn from(v: Arc<T>) -> Self {
        Value::Object(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::seq(items),
            serde_json::Value::Object(map) => Value::map(map),
        }
    }
}
