pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{dim, error, header, info, overdue, section, success, summary_row, warn};
pub use table::{customers_table, overdue_table, policies_table, upcoming_table};
pub use theme::{theme, Theme};
