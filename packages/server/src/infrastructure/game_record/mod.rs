//! 対局記録の保存先の実装
//!
//! - `inmemory`: プロセス内に保持する実装（永続化は外部のデータストアに任せる）

pub mod inmemory;

pub use inmemory::InMemoryGameRecordStore;
