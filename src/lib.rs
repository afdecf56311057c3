// Library module declarations
pub mod config;
pub mod error;
pub mod filter;
pub mod formatters;
pub mod game;
pub mod packet_logger;
pub mod registry;
pub mod session;
pub mod session_log;
pub mod sink;
pub mod unpacker;
pub mod value;

pub use config::{LoggerConfig, OutputMode, Settings, SharedConfig};
pub use error::{SinkError, UnpackError};
pub use filter::PacketFilter;
pub use packet_logger::PacketLogger;
pub use registry::{Formatter, Registry};
pub use sink::{ChatSurface, Direction, LogEntry, TerminalSurface};
pub use unpacker::{Limits, Renderer, Unpacker};
pub use value::{Field, Inspect, Value};
