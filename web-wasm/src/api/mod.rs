//! バックエンドAPI（fetch）

pub mod fetch;

pub use fetch::FetchBackend;
