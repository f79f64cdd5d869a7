//! Data models for Stockroom

pub mod borrow_record;
pub mod connection;
pub mod item;
pub mod user;

// Re-export commonly used types
pub use borrow_record::{BorrowRecord, BorrowRecordQuery, CreateBorrowRecord};
pub use connection::{ConnectionState, ConnectionStatus};
pub use item::{InventoryItem, ItemQuery};
pub use user::{User, UserQuery};
