//! teyvat-stats: the data-access layer of a Genshin Impact player statistics
//! showcase.
//!
//! The rendering layer constructs one [`DataSource`] from a [`BackendConfig`]
//! and reads characters and the account snapshot through it. Three backends
//! exist: the hosted table API, the JSON document bundled at build time, and
//! JSON files in a local directory.

pub mod bundled;
pub mod local;
pub mod model;
pub mod remote;
pub mod source;

pub use bundled::BundledSource;
pub use local::LocalSource;
pub use model::{Account, Character, Document, Stats, Weapon};
pub use remote::{RemoteConfig, RemoteSource};
pub use source::{BackendConfig, DataSource, StatSource};
