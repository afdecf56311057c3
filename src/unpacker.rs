// Deep unpacking: renders any `Value` graph into compact JSON-like text.

use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::UnpackError;
use crate::registry::Registry;
use crate::value::{identity, Inspect, Value};

pub const NULL: &str = "null";
pub const EMPTY: &str = "empty";
pub const ELLIPSIS: &str = "...";
pub const CIRCULAR: &str = "<circular>";

/// Bounds applied to every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Nodes deeper than this render as `...`.
    pub max_depth: usize,
    /// Sequences and maps larger than this render as a count.
    pub max_collection_size: usize,
    /// Byte buffers up to this length render as hex, longer ones as `byte[n]`.
    pub max_inline_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 5,
            max_collection_size: 100,
            max_inline_bytes: 64,
        }
    }
}

/// State of one top-level render. Never shared between calls.
#[derive(Debug)]
pub struct RenderContext {
    depth: usize,
    visited: HashSet<NodeKey>,
    limits: Limits,
}

// A struct and its first field share an address, so the type is part of the
// key.
type NodeKey = (usize, TypeId);

impl RenderContext {
    pub fn new(limits: Limits) -> Self {
        Self {
            depth: 0,
            visited: HashSet::new(),
            limits,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Marks `id` as being rendered. Returns false if it already is, i.e.
    /// the value is one of its own ancestors.
    fn enter(&mut self, id: NodeKey) -> bool {
        self.visited.insert(id)
    }

    fn leave(&mut self, id: NodeKey) {
        self.visited.remove(&id);
    }
}

/// Handle given to registered formatters so they can render nested values
/// one level deeper, sharing the depth and cycle bookkeeping of the caller.
pub struct Renderer<'a> {
    unpacker: &'a Unpacker,
    ctx: &'a mut RenderContext,
}

impl Renderer<'_> {
    pub fn render(&mut self, value: &Value) -> String {
        self.unpacker.child(value, self.ctx)
    }

    pub fn render_object(&mut self, obj: &dyn Inspect) -> String {
        self.ctx.depth += 1;
        let out = if self.ctx.depth > self.ctx.limits.max_depth {
            ELLIPSIS.to_string()
        } else {
            self.unpacker.render_object(obj, self.ctx)
        };
        self.ctx.depth -= 1;
        out
    }

    pub fn depth(&self) -> usize {
        self.ctx.depth
    }

    pub fn limits(&self) -> &Limits {
        &self.ctx.limits
    }
}

/// Registry dispatch plus the reflective fallback. Cheap to clone; the
/// registry is shared.
#[derive(Debug, Clone)]
pub struct Unpacker {
    registry: Arc<Registry>,
    limits: Limits,
}

impl Default for Unpacker {
    fn default() -> Self {
        Self::new(Arc::new(Registry::with_defaults()), Limits::default())
    }
}

impl Unpacker {
    pub fn new(registry: Arc<Registry>, limits: Limits) -> Self {
        Self { registry, limits }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Same registry, different bounds.
    pub fn with_limits(&self, limits: Limits) -> Self {
        Self::new(Arc::clone(&self.registry), limits)
    }

    pub fn unpack(&self, value: &Value) -> String {
        let mut ctx = RenderContext::new(self.limits);
        self.render(value, &mut ctx)
    }

    /// Renders a top-level object such as a packet.
    pub fn unpack_object(&self, obj: &dyn Inspect) -> String {
        let mut ctx = RenderContext::new(self.limits);
        self.render_object(obj, &mut ctx)
    }

    fn render(&self, value: &Value, ctx: &mut RenderContext) -> String {
        if value.is_null() {
            return NULL.to_string();
        }
        if ctx.depth > ctx.limits.max_depth {
            return ELLIPSIS.to_string();
        }

        match value {
            Value::Null => NULL.to_string(),
            Value::Object(obj) => self.render_object(obj.as_ref(), ctx),
            Value::Bytes(bytes) => render_bytes(bytes, &ctx.limits),
            Value::Seq(items) => self.render_seq(items, ctx),
            Value::Map(entries) => self.render_map(entries, ctx),
            Value::Optional(Some(inner)) => self.child(inner, ctx),
            Value::Optional(None) => EMPTY.to_string(),
            Value::Enum(name) => quote(name),
            Value::Str(s) => quote(s),
            Value::Uuid(uuid) => quote(&uuid.to_string()),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::UInt(n) => n.to_string(),
            Value::Float(n) => format_float(*n),
        }
    }

    fn child(&self, value: &Value, ctx: &mut RenderContext) -> String {
        ctx.depth += 1;
        let out = self.render(value, ctx);
        ctx.depth -= 1;
        out
    }

    fn render_object(&self, obj: &dyn Inspect, ctx: &mut RenderContext) -> String {
        let id = (identity(obj), obj.as_any().type_id());
        if !ctx.enter(id) {
            return CIRCULAR.to_string();
        }
        let depth = ctx.depth;
        let out = match panic::catch_unwind(AssertUnwindSafe(|| self.describe(obj, ctx))) {
            Ok(Ok(out)) => out,
            Ok(Err(e)) => error_marker(&e),
            Err(payload) => {
                ctx.depth = depth;
                let e = UnpackError::Other(format!(
                    "{} panicked: {}",
                    obj.type_name(),
                    panic_message(payload.as_ref())
                ));
                debug!("{}", e);
                error_marker(&e)
            }
        };
        ctx.leave(id);
        out
    }

    fn describe(&self, obj: &dyn Inspect, ctx: &mut RenderContext) -> Result<String, UnpackError> {
        if let Some(formatter) = self.registry.resolve(obj.as_any()) {
            let mut renderer = Renderer { unpacker: self, ctx };
            return formatter.format(obj.as_any(), &mut renderer);
        }

        let fields = obj.fields()?;
        let mut parts = Vec::with_capacity(fields.len());
        for field in fields {
            match field.value {
                Ok(value) => {
                    let rendered = self.child(&value, ctx);
                    parts.push(format!("{}:{}", field.name, rendered));
                }
                Err(e) => {
                    debug!("Skipping field {}.{}: {}", obj.type_name(), field.name, e);
                }
            }
        }
        Ok(format!("{{{}}}", parts.join(",")))
    }

    fn render_seq(&self, items: &[Value], ctx: &mut RenderContext) -> String {
        if items.is_empty() {
            return "[]".to_string();
        }
        if items.len() > ctx.limits.max_collection_size {
            return format!("[{} items, truncated]", items.len());
        }
        let parts: Vec<String> = items.iter().map(|item| self.child(item, ctx)).collect();
        format!("[{}]", parts.join(","))
    }

    fn render_map(&self, entries: &[(Value, Value)], ctx: &mut RenderContext) -> String {
        if entries.is_empty() {
            return "{}".to_string();
        }
        if entries.len() > ctx.limits.max_collection_size {
            return format!("{{{} entries, truncated}}", entries.len());
        }
        let parts: Vec<String> = entries
            .iter()
            .map(|(key, value)| {
                let key = self.child(key, ctx);
                let value = self.child(value, ctx);
                format!("{}:{}", key, value)
            })
            .collect();
        format!("{{{}}}", parts.join(","))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

fn render_bytes(bytes: &[u8], limits: &Limits) -> String {
    if bytes.is_empty() {
        return "[]".to_string();
    }
    if bytes.len() > limits.max_inline_bytes {
        return format!("byte[{}]", bytes.len());
    }
    format!("[{}]", hex_list(bytes))
}

/// Comma-separated uppercase hex: `00,FF,10`.
pub fn hex_list(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(",")
}

/// Floats always keep a fractional part (`1.0`, not `1`).
pub fn format_float(n: f64) -> String {
    format!("{:?}", n)
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape(s))
}

pub fn error_marker(error: &UnpackError) -> String {
    format!("{{error:{}}}", quote(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Field;
    use std::sync::Weak;

    fn plain() -> Unpacker {
        Unpacker::new(Arc::new(Registry::new()), Limits::default())
    }

    struct Point {
        x: i32,
        y: i32,
        z: i32,
    }

    impl Inspect for Point {
        fn fields(&self) -> Result<Vec<Field>, UnpackError> {
            Ok(vec![
                Field::new("x", self.x),
                Field::new("y", self.y),
                Field::new("z", self.z),
            ])
        }
    }

    struct Node {
        name: &'static str,
        me: Weak<Node>,
    }

    impl Inspect for Node {
        fn fields(&self) -> Result<Vec<Field>, UnpackError> {
            let me = self
                .me
                .upgrade()
                .map(Value::from)
                .unwrap_or(Value::Null);
            Ok(vec![Field::new("name", self.name), Field::new("next", me)])
        }
    }

    struct Pair {
        left: Value,
        right: Value,
    }

    impl Inspect for Pair {
        fn fields(&self) -> Result<Vec<Field>, UnpackError> {
            Ok(vec![
                Field::new("left", self.left.clone()),
                Field::new("right", self.right.clone()),
            ])
        }
    }

    struct Chain(usize);

    impl Inspect for Chain {
        fn fields(&self) -> Result<Vec<Field>, UnpackError> {
            let child = if self.0 == 0 {
                Value::Null
            } else {
                Value::object(Chain(self.0 - 1))
            };
            Ok(vec![Field::new("child", child)])
        }
    }

    struct Broken;

    impl Inspect for Broken {
        fn fields(&self) -> Result<Vec<Field>, UnpackError> {
            Err(UnpackError::Unavailable("boom".to_string()))
        }
    }

    struct Guarded;

    impl Inspect for Guarded {
        fn fields(&self) -> Result<Vec<Field>, UnpackError> {
            Ok(vec![
                Field::new("open", 1),
                Field::unreadable("secret", UnpackError::field("secret", "access denied")),
                Field::new("after", true),
            ])
        }
    }

    #[test]
    fn test_simple_struct() {
        let out = plain().unpack(&Value::object(Point { x: 1, y: 2, z: 3 }));
        assert_eq!(out, "{x:1,y:2,z:3}");
    }

    #[test]
    fn test_deterministic() {
        let value = Value::map(vec![
            ("b", Value::seq(vec![1, 2, 3])),
            ("a", Value::object(Point { x: -1, y: 0, z: 1 })),
        ]);
        let unpacker = plain();
        assert_eq!(unpacker.unpack(&value), unpacker.unpack(&value));
        assert_eq!(
            unpacker.unpack(&value),
            "{\"b\":[1,2,3],\"a\":{x:-1,y:0,z:1}}"
        );
    }

    #[test]
    fn test_bytes_hex() {
        let value = Value::bytes(vec![0u8, 255, 16, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(plain().unpack(&value), "[00,FF,10,01,02,03,04,05,06,07]");
    }

    #[test]
    fn test_large_bytes_placeholder() {
        let value = Value::bytes(vec![0u8; 65]);
        assert_eq!(plain().unpack(&value), "byte[65]");
        let value = Value::bytes(vec![0u8; 64]);
        assert!(plain().unpack(&value).starts_with("[00,00"));
    }

    #[test]
    fn test_empty_containers() {
        let unpacker = plain();
        assert_eq!(unpacker.unpack(&Value::Map(Vec::new())), "{}");
        assert_eq!(unpacker.unpack(&Value::Seq(Vec::new())), "[]");
        assert_eq!(unpacker.unpack(&Value::Bytes(Vec::new())), "[]");
    }

    #[test]
    fn test_collection_truncation() {
        let unpacker = plain();
        let seq = Value::seq(0..101);
        assert_eq!(unpacker.unpack(&seq), "[101 items, truncated]");
        let map = Value::map((0..150).map(|i| (i, i)));
        assert_eq!(unpacker.unpack(&map), "{150 entries, truncated}");
        let exact = Value::seq(0..100);
        assert!(unpacker.unpack(&exact).ends_with(",99]"));
    }

    #[test]
    fn test_self_reference() {
        let node = Arc::new_cyclic(|me| Node {
            name: "root",
            me: me.clone(),
        });
        let out = plain().unpack(&Value::Object(node));
        assert_eq!(out, "{name:\"root\",next:<circular>}");
    }

    #[test]
    fn test_shared_siblings_are_not_circular() {
        let shared: Arc<dyn Inspect> = Arc::new(Point { x: 1, y: 1, z: 1 });
        let pair = Pair {
            left: Value::Object(Arc::clone(&shared)),
            right: Value::Object(shared),
        };
        let out = plain().unpack(&Value::object(pair));
        assert_eq!(out, "{left:{x:1,y:1,z:1},right:{x:1,y:1,z:1}}");
    }

    #[test]
    fn test_depth_limit() {
        let out = plain().unpack(&Value::object(Chain(10)));
        let expected = format!("{}...{}", "{child:".repeat(6), "}".repeat(6));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_null_beats_depth_limit() {
        let out = plain().unpack(&Value::object(Chain(5)));
        assert!(out.ends_with("{child:null}}}}}}"));
    }

    #[test]
    fn test_error_is_contained() {
        let pair = Pair {
            left: Value::object(Broken),
            right: Value::from(7),
        };
        let out = plain().unpack(&Value::object(pair));
        assert_eq!(out, "{left:{error:\"boom\"},right:7}");
    }

    #[test]
    fn test_unreadable_field_is_skipped() {
        let out = plain().unpack(&Value::object(Guarded));
        assert_eq!(out, "{open:1,after:true}");
    }

    #[test]
    fn test_scalars() {
        let unpacker = plain();
        assert_eq!(unpacker.unpack(&Value::Null), "null");
        assert_eq!(unpacker.unpack(&Value::from(1.0f64)), "1.0");
        assert_eq!(unpacker.unpack(&Value::from(-0.25f32)), "-0.25");
        assert_eq!(unpacker.unpack(&Value::from(u64::MAX)), "18446744073709551615");
        assert_eq!(unpacker.unpack(&Value::enumeration("PICKUP")), "\"PICKUP\"");
        assert_eq!(unpacker.unpack(&Value::from(None::<i32>)), "empty");
        assert_eq!(unpacker.unpack(&Value::from(Some(3))), "3");
        assert_eq!(
            unpacker.unpack(&Value::from("a\"b\\c\nd\re\tf")),
            "\"a\\\"b\\\\c\\nd\\re\\tf\""
        );
    }

    #[test]
    fn test_uuid_is_quoted() {
        let uuid = uuid::Uuid::nil();
        assert_eq!(
            plain().unpack(&Value::from(uuid)),
            "\"00000000-0000-0000-0000-000000000000\""
        );
    }

    #[test]
    fn test_registered_formatter_recurses() {
        fn format_pair(pair: &Pair, r: &mut Renderer<'_>) -> Result<String, UnpackError> {
            Ok(format!("<{}|{}>", r.render(&pair.left), r.render(&pair.right)))
        }

        let mut registry = Registry::new();
        registry.register(format_pair);
        let unpacker = Unpacker::new(Arc::new(registry), Limits::default());

        let pair = Pair {
            left: Value::object(Point { x: 1, y: 2, z: 3 }),
            right: Value::from("r"),
        };
        assert_eq!(
            unpacker.unpack(&Value::object(pair)),
            "<{x:1,y:2,z:3}|\"r\">"
        );
    }

    #[test]
    fn test_formatter_error_is_contained() {
        fn refuse(_: &Point, _: &mut Renderer<'_>) -> Result<String, UnpackError> {
            Err(UnpackError::formatter("Point", "unsupported"))
        }

        let mut registry = Registry::new();
        registry.register(refuse);
        let unpacker = Unpacker::new(Arc::new(registry), Limits::default());
        let out = unpacker.unpack(&Value::seq(vec![
            Value::object(Point { x: 0, y: 0, z: 0 }),
            Value::from(1),
        ]));
        assert_eq!(out, "[{error:\"Point: unsupported\"},1]");
    }

    #[test]
    fn test_custom_limits() {
        let limits = Limits {
            max_depth: 1,
            max_collection_size: 2,
            max_inline_bytes: 2,
        };
        let unpacker = Unpacker::new(Arc::new(Registry::new()), limits);
        assert_eq!(unpacker.unpack(&Value::seq(vec![1, 2, 3])), "[3 items, truncated]");
        assert_eq!(unpacker.unpack(&Value::bytes(vec![1u8, 2, 3])), "byte[3]");
        assert_eq!(
            unpacker.unpack(&Value::seq(vec![Value::seq(vec![1])])),
            "[[...]]"
        );
    }

    #[test]
    fn test_unpack_object_top_level() {
        let point = Point { x: 4, y: 5, z: 6 };
        assert_eq!(plain().unpack_object(&point), "{x:4,y:5,z:6}");
    }

    struct Wrapper {
        pos: crate::game::BlockPos,
    }

    impl Inspect for Wrapper {
        fn fields(&self) -> Result<Vec<Field>, UnpackError> {
            Ok(vec![Field::new("pos", Value::object(self.pos))])
        }
    }

    fn format_wrapper(w: &Wrapper, r: &mut Renderer<'_>) -> Result<String, UnpackError> {
        Ok(format!("{{pos:{}}}", r.render_object(&w.pos)))
    }

    #[test]
    fn test_embedded_first_field_is_not_circular() {
        let mut registry = Registry::with_defaults();
        registry.register(format_wrapper);
        let unpacker = Unpacker::new(Arc::new(registry), Limits::default());

        let wrapper = Wrapper {
            pos: crate::game::BlockPos::new(1, 2, 3),
        };
        assert_eq!(
            unpacker.unpack(&Value::object(wrapper)),
            "{pos:{x:1,y:2,z:3}}"
        );
    }

    struct Exploding;

    impl Inspect for Exploding {
        fn fields(&self) -> Result<Vec<Field>, UnpackError> {
            panic!("chunk not loaded")
        }
    }

    #[test]
    fn test_panicking_fields_are_contained() {
        let pair = Pair {
            left: Value::object(Exploding),
            right: Value::from(7),
        };
        assert_eq!(
            plain().unpack(&Value::object(pair)),
            "{left:{error:\"Exploding panicked: chunk not loaded\"},right:7}"
        );
    }

    #[test]
    fn test_panic_does_not_skew_depth() {
        let limits = Limits {
            max_depth: 2,
            ..Limits::default()
        };
        let unpacker = Unpacker::new(Arc::new(Registry::new()), limits);
        let value = Value::seq(vec![
            Value::object(Exploding),
            Value::object(Chain(0)),
        ]);
        assert_eq!(
            unpacker.unpack(&value),
            "[{error:\"Exploding panicked: chunk not loaded\"},{child:null}]"
        );
    }
}
