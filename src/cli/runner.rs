use crate::cli::ViewArgs;
use crate::options::{Cadence, DisplayOptions, GapPolicy};

/// Apply `show`/`export` flags on top of the configured display options.
/// Flags that were not given leave the configured value alone.
pub fn display_options(view: &ViewArgs, base: &DisplayOptions) -> DisplayOptions {
    let mut options = base.clone();

    if view.annual {
        options.cadence = Cadence::Annual;
    }
    if let Some(scale) = view.scale {
        options.scale = scale;
    }
    if !view.metrics.is_empty() {
        options.select_only(view.metrics.iter().map(String::as_str));
    }
    if view.zero_fill {
        options.gaps = GapPolicy::Zero;
    }

    options
}
