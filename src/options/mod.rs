//! Process-wide configuration options
//!
//! The registry is shared behind a `parking_lot::RwLock`: the interactive
//! thread is the only writer, readers see writes immediately.

mod builtins;
mod registry;
mod value;

use std::sync::Arc;

use parking_lot::RwLock;

pub use builtins::declare_builtins;
pub use registry::{OptionInfo, OptionRegistry, Scope};
pub use value::{OptionType, OptionValue};

/// Shared handle to the option registry
pub type SharedOptions = Arc<RwLock<OptionRegistry>>;

/// Registry with the built-in options declared
pub fn shared_with_builtins() -> SharedOptions {
    let mut registry = OptionRegistry::new();
    declare_builtins(&mut registry);
    Arc::new(RwLock::new(registry))
}
