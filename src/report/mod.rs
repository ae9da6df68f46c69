pub mod assembler;
pub mod export;

pub use assembler::{Diagnostics, Report};
pub use export::{
    pretty_print_table, summary_table, weekly_table, write_closed_trades_csv, write_json,
    write_weekly_csv,
};
