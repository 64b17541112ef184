/// Application name
pub const APP_NAME: &str = "minicluster";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Separator between an identity and a key in `ID:key=value` overrides
pub const OVERRIDE_IDENTITY_SEPARATOR: char = ':';

/// Host used by adapters when none is configured
pub const DEFAULT_HOST: &str = "127.0.0.1";
