// =====================================================================================
// API CLIENT CELL - CACHED, DE-DUPLICATED ACCESS TO THE STOCKWISE BACKEND
// =====================================================================================
//
// Every backend call goes through `OptimizedApiClient`, which:
// - answers cacheable GETs from the shared `CacheManager`
// - collapses concurrent identical requests into one network call
// - times each call through the shared `PerformanceMonitor`
//
// `StockwiseApi` layers typed endpoint methods on top.
//
// =====================================================================================

pub mod models;
pub mod services;

pub use models::{RequestBody, RequestOptions};
pub use services::{CachePolicy, CacheRule, OptimizedApiClient, StockwiseApi};
