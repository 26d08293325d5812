mod clients;
mod storage;

pub use clients::images::{measure_image, HttpImageFetcher, ImageFetcher};
pub use storage::fs_store::FileSystemStore;
