pub mod default_keys;
pub mod keys;
mod settings;

pub use default_keys::default_bindings;
pub use keys::{parse_key_notation, KeyCombo, KeyParseError, KeySequence};
pub use settings::{Config, EXAMPLE_CONFIG};
