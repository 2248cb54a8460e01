pub mod error;
pub mod schema;

pub use error::*;
pub use schema::*;
