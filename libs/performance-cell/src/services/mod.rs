pub mod cache;
pub mod monitor;

pub use cache::CacheManager;
pub use monitor::PerformanceMonitor;
