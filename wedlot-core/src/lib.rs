//! wedlot core - name pool, winner ledger and announcements for the
//! wedding lottery.
//!
//! Storage goes through the [`storage::KvStore`] trait so the stores can run
//! on SQLite or in memory; announcements go through [`announce::Announcer`].

pub mod admin;
pub mod announce;
pub mod config;
pub mod error;
pub mod storage;
pub mod types;

pub use admin::NameEditor;
pub use announce::{AnnounceOutcome, Announcer};
pub use config::AppConfig;
pub use error::{Result, SpeechError, WedlotError};
pub use storage::{KvStore, MemoryStore, NameStore, SqliteStore, WinnerStore};
pub use types::{DataSource, NamePool, WinnerLedger, DEFAULT_NAMES};
