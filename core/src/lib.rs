pub use calendar::*;
pub use error::*;
pub use identity::*;
pub use reveal::*;
pub use store::*;
pub use unlock::*;
pub use verse::*;

mod calendar;
mod error;
mod identity;
mod reveal;
mod store;
mod unlock;
mod verse;

/// Index of a calendar cell, and of the verse shown behind it.
pub type Day = u8;

/// Number of cells in the calendar grid.
pub const GRID_DAYS: Day = 28;
