use super::registry::OptionRegistry;

/// Declare the options consumed by the meta views themselves
pub fn declare_builtins(registry: &mut OptionRegistry) {
    registry.declare("default_width", 20i64, "default column width", true);
    registry.declare("visibility", 0i64, "visibility level (0=low, 1=high)", true);
    registry.declare(
        "show_repeat_counts",
        true,
        "append repeat counts to collapsed status messages",
        false,
    );
    registry.declare("color_error", "red", "color of error status rows", false);
    registry.declare("color_warning", "yellow", "color of warning status rows", false);
    registry.declare("color_key_col", "cyan", "color of key field rows", false);
    registry.declare("color_hidden_col", "darkgray", "color of hidden field rows", false);
}
