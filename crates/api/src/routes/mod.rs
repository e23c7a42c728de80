pub mod home;
pub mod weather;

pub use home::*;
pub use weather::*;
