pub mod actions;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod limit_order;
pub mod middlewares;
pub mod order;
pub mod params;
pub mod request;
pub mod rpc;
pub mod server;
pub mod types;

pub use errors::{ActionError, AppError};
