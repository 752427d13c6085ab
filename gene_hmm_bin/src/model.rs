pub mod error;
pub mod hmm;
pub mod params;
pub mod state;

pub use crate::model::error::Error;
pub type Result<T> = std::result::Result<T, Error>;
