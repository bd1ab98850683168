pub mod cli;
pub mod error;
pub mod model;
pub mod queries;
pub mod schema;
pub mod seed;
pub mod store;

pub use cli::{Cli, Commands};
pub use error::{Error, Result};
pub use seed::{SeedConfig, SeedReport, Seeder};
pub use store::Store;
