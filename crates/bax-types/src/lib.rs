pub mod domain;
pub mod errors;
pub mod noise;

pub use domain::*;
pub use errors::*;
pub use noise::*;
