pub mod client;
pub mod policy;
pub mod stockwise;

pub use client::OptimizedApiClient;
pub use policy::{CachePolicy, CacheRule};
pub use stockwise::StockwiseApi;
