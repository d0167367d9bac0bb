pub mod metric;
pub mod record;
pub mod row;
pub mod user;

pub use metric::*;
pub use record::*;
pub use row::*;
pub use user::*;
