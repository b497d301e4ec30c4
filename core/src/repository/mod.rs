pub mod file;
pub mod memory;
pub mod remote;
pub mod traits;

// Re-export
pub use file::FileSeriesProvider;
pub use memory::InMemorySeriesProvider;
pub use remote::VendorDownloader;
pub use traits::HistoricalSeriesProvider;
