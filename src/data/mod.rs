pub mod loader;
pub mod raw;

pub use loader::load_csv;
pub use raw::RawTradeRow;
