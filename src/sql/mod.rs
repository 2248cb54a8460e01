pub mod extractor;
pub mod parser;
pub mod session;

pub use session::Session;
