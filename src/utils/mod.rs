pub mod table;
pub mod errors;
pub mod ticks;

pub use table::candle_table;
pub use errors::{extract_clean_error, St13Error};
pub use ticks::{format_price_label, log_axis_ticks, price_range};
