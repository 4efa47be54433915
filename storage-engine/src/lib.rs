mod disk_posters;
mod moka_cache;

pub use disk_posters::DiskPosterStore;
pub use moka_cache::MokaRecordStore;
