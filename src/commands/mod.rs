mod analyze;
mod palette;

pub use analyze::run_analyze;
pub use palette::run_palette;
