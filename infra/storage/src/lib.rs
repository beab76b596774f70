//! A sandboxed storage engine for local application data.
//!
//! The crate provides a secure abstraction over the filesystem with built-in
//! protections against common I/O pitfalls. All examples use temporary
//! directories to avoid writing to the real filesystem.
//!
//! # Core Features
//!
//! - **Sandbox security**: strict path traversal protection using physical path canonicalization.
//! - **Atomic writes**: an "atomic swap" pattern (unique temp write + `fsync` + `rename`) prevents data corruption during crashes.
//! - **Transparent compression**: integrated LZ4 block compression that is invisible to the consumer.
//! - **Namespacing**: logical data partitioning into per-feature directories with enumeration support.
//! - **Self-healing**: orphaned temporary files are cleaned up during initialization.
//!
//! # Architectural Overview
//!
//! 1.  **[`Storage`]**: the primary thread-safe handle and entry point.
//! 2.  **[`NamespacedStorage`]**: a scoped view for grouped data.
//! 3.  **[`StorageBuilder`]**: a type-safe fluent builder for configuration.
//!
//! # Examples
//!
//! ```rust
//! use mymeds_storage::{Storage, Compression, StorageError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), StorageError> {
//!     // Use a temp directory for examples/tests
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("data");
//!     let storage = Storage::builder()
//!         .root(&root)
//!         .create(true)
//!         .compression(Compression::Lz4)
//!         .connect()
//!         .await?;
//!
//!     // Write data atomically
//!     storage.write("config.bin", b"important data").await?;
//!
//!     // Read data (automatically decompressed)
//!     let data = storage.read("config.bin").await?;
//!     assert_eq!(data, b"important data");
//!
//!     Ok(())
//! }
//! ```
//!
//! ```rust
//! # use mymeds_storage::{Storage, StorageError};
//! # #[tokio::main]
//! # async fn main() -> Result<(), StorageError> {
//! # let tmp = tempfile::tempdir().unwrap();
//! # let root = tmp.path().join("data");
//! # let storage = Storage::builder().root(&root).connect().await?;
//! let vaults = storage.namespace("vaults")?;
//!
//! vaults.write("abc123", b"sealed record").await?;
//!
//! if vaults.exists("abc123")? {
//!     let meta = vaults.metadata("abc123").await?;
//!     println!("Size on disk: {} bytes", meta.len());
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod engine;
mod error;
mod maintenance;
mod namespace;
mod security;

pub use builder::StorageBuilder;
pub use engine::{Compression, Storage};
pub use error::{StorageError, StorageErrorExt};
pub use namespace::NamespacedStorage;
