//! Configuration loading for the attendance store.
//!
//! Settings live in `store.yaml`; initial records and events optionally live
//! in `seed.yaml` next to it.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/default").unwrap();
//! println!("Week starts on {:?}", loader.config().week_start);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::StoreConfig;
