use std::sync::Mutex;

use slog::Drain;
use slog::Fuse;
use slog_async::Async;
use slog_json::Json;

pub use slog::{debug, error, info, o, trace, warn, Logger};

/// Creates the root logger: an async JSON drain to stderr carrying the
/// build metadata. With the `env_logging` feature the drain is also
/// filtered through `RUST_LOG` and installed as the global
/// `slog-scope` logger.
pub fn initialize_logger() -> slog::Logger {
    let drain = Mutex::new(Json::default(std::io::stderr())).map(Fuse);
    let drain = Async::new(drain).build().fuse();

    #[cfg(feature = "env_logging")]
    let drain = slog_envlogger::new(drain).fuse();

    let logger = Logger::root(
        drain,
        o!("version" => info::VERSION, "revision" => info::REVISION, "build_timestamp" => info::BUILD_TIMESTAMP),
    );

    #[cfg(feature = "env_logging")]
    slog_scope::set_global_logger(logger.clone()).cancel_reset();

    logger
}
