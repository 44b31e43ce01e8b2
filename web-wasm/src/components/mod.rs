//! UIコンポーネント

pub mod progress_bar;
