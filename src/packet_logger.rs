use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info};

use crate::config::{LoggerConfig, OutputMode, SharedConfig};
use crate::registry::Registry;
use crate::sink::{ChatSink, ChatSurface, Direction, FileSink, LogEntry, Router};
use crate::unpacker::Unpacker;
use crate::value::{Inspect, Value};

/// Entry point for the packet hooks. Safe to call from the network thread
/// and the game thread at the same time.
pub struct PacketLogger {
    config: SharedConfig,
    unpacker: Unpacker,
    router: Router,
    was_enabled: AtomicBool,
}

impl PacketLogger {
    pub fn new(config: SharedConfig, registry: Arc<Registry>, router: Router) -> Self {
        let limits = config.snapshot().limits;
        Self {
            config,
            unpacker: Unpacker::new(registry, limits),
            router,
            was_enabled: AtomicBool::new(false),
        }
    }

    /// Built-in formatters, the given chat surface and a file sink.
    pub fn with_surface(config: SharedConfig, surface: impl ChatSurface + 'static) -> Self {
        Self::new(
            config,
            Arc::new(Registry::with_defaults()),
            Router::new(ChatSink::new(surface), FileSink::new()),
        )
    }

    pub fn log_inbound(&self, packet: &dyn Inspect) {
        self.log_packet(Direction::Inbound, packet);
    }

    pub fn log_outbound(&self, packet: &dyn Inspect) {
        self.log_packet(Direction::Outbound, packet);
    }

    /// Logs a packet under its own type name.
    pub fn log_packet(&self, direction: Direction, packet: &dyn Inspect) {
        let type_name = packet.type_name();
        self.dispatch(direction, type_name, |unpacker| unpacker.unpack_object(packet));
    }

    /// Logs an arbitrary value under an explicit type name.
    pub fn log(&self, direction: Direction, type_name: &str, value: &Value) {
        self.dispatch(direction, type_name, |unpacker| unpacker.unpack(value));
    }

    fn dispatch<F>(&self, direction: Direction, type_name: &str, render: F)
    where
        F: FnOnce(&Unpacker) -> String,
    {
        let config = self.config.snapshot();
        if !self.check_enabled(&config) {
            return;
        }
        if !config.filter().should_log(direction, type_name) {
            return;
        }

        let text = if config.deep_logging {
            render(&self.unpacker.with_limits(config.limits))
        } else {
            "{}".to_string()
        };
        let entry = LogEntry::new(direction, type_name, text);
        self.router
            .route(config.output_mode, &entry, &config.log_dir, config.chat_preview_chars);
    }

    // An off -> on edge in file mode starts a new session file.
    fn check_enabled(&self, config: &LoggerConfig) -> bool {
        let was_enabled = self.was_enabled.swap(config.logging_enabled, Ordering::SeqCst);
        if config.logging_enabled && !was_enabled && config.output_mode == OutputMode::File {
            self.router.file().invalidate();
            info!("Packet logging enabled");
        }
        config.logging_enabled
    }

    /// Joined a world or server; `target` names the next log file even if
    /// file mode is only switched on later.
    pub fn on_join(&self, target: Option<&str>) {
        if self.config.snapshot().output_mode == OutputMode::File {
            self.router.file().on_join(target);
        } else {
            self.router.file().set_target(target);
        }
    }

    pub fn on_leave(&self) {
        if self.config.snapshot().output_mode == OutputMode::File {
            if let Err(e) = self.router.file().on_leave() {
                error!("Error closing log file: {}", e);
            }
        } else {
            self.router.file().set_target(None);
            self.router.file().invalidate();
        }
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn unpacker(&self) -> &Unpacker {
        &self.unpacker
    }
}
