//! Build metadata baked into the recommendations backend, reported by
//! the root logger and the health check.

/// The crate version at build time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The VCS revision the binary was built from, if the build set it.
pub const REVISION: Option<&str> = option_env!("BACKEND_REVISION");

/// The time the binary was built, if the build set it.
pub const BUILD_TIMESTAMP: Option<&str> = option_env!("BUILD_TIMESTAMP");
