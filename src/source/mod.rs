pub mod synthetic;
pub mod traits;
