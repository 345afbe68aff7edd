#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod progress;
pub mod reward;
pub mod shuffle;
pub mod time;
pub mod weakness;

pub use error::Error;
pub use time::Clock;
