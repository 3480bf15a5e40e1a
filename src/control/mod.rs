pub mod pid;
pub mod pilot;

pub use pid::*;
pub use pilot::*;
