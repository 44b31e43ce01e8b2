//! comment-classify
//!
//! 分類バックエンドに対する同期処理をCLIから実行するための部品
//! （HTTPバックエンド・端末表示・設定・スナップショット）

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod snapshot;
pub mod terminal;
