pub mod executor;
pub mod shaper;

pub use executor::QueryExecutor;
pub use shaper::{shape, ResultSet, Row, NULL_DISPLAY};
