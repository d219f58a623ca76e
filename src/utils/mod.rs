pub mod format;

pub use format::{format_money, format_percent, format_price, or_placeholder, present, PLACEHOLDER};
