// Application layer - contracts and their stock implementations
// (parsing, formatting, conversion) assembled into services.

pub mod currencies;
pub mod error;
pub mod exchange;
pub mod formatter;
pub mod parser;
pub mod registry;
pub mod service;
pub mod validation;

pub use currencies::*;
pub use error::*;
pub use exchange::*;
pub use formatter::*;
pub use parser::*;
pub use registry::*;
pub use service::*;
pub use validation::*;
