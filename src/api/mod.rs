pub mod advocates;
pub mod routes;
mod server;

pub use advocates::{fetch_advocates, AdvocateQuery, FetchError, FETCH_FAILED_MESSAGE};
pub use server::*;
