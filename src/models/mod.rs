pub mod avatar;
pub mod plan;
pub mod user;

pub use avatar::*;
pub use plan::*;
pub use user::*;
