pub mod physics;
pub mod rules;
pub mod slingshot_env;

pub use physics::*;
pub use rules::*;
pub use slingshot_env::*;
