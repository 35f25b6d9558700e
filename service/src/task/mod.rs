//! Background [`Task`]s definitions.

pub mod background;
pub mod watch_low_stock;

pub use common::Handler as Task;

pub use self::{background::Background, watch_low_stock::WatchLowStock};
