// Application layer - the operations a front end calls and the text it shows.

pub mod error;
pub mod reporting;
mod service;

pub use error::*;
pub use service::*;
