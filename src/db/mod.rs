mod record;
pub mod schema;
pub mod seed;
mod store;

pub use record::*;
pub use store::*;
