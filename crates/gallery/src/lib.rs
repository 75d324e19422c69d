//! Genboard Gallery
//!
//! State manager behind the image and text galleries.
//!
//! ## Architecture
//!
//! **Components:**
//! - `store`: persistence port, collection adapter and in-memory backend
//! - `file_store` / `redis_store`: durable backends for the port
//! - `gateway`: remote generation functions behind a trait
//! - `lifecycle`: per-image loading/error bookkeeping
//! - `session`: single-flight generation controller that owns a collection
//! - `events`: change notifications for the presentation layer
//! - `export`: download files for artifacts
//!
//! **Data Flow:**
//! 1. Presentation calls `GenerationSession::generate`
//! 2. Session validates the prompt and raises its in-flight flag
//! 3. Gateway invokes the remote function once
//! 4. Session prepends the artifact and persists the collection
//! 5. Presentation reports image load/failure back to the session

pub mod events;
pub mod export;
pub mod file_store;
pub mod gateway;
pub mod kind;
pub mod lifecycle;
pub mod redis_store;
pub mod session;
pub mod store;

pub use events::SessionEvent;
pub use export::{ContentFetcher, ExportedFile};
pub use file_store::FileStore;
pub use gateway::{FunctionClient, GatewayFailure, GenerationGateway};
pub use kind::{ArtifactKind, ImageKind, TextKind};
pub use lifecycle::{ContentState, LifecycleTracker};
pub use redis_store::RedisStore;
pub use session::GenerationSession;
pub use store::{CollectionStore, KeyValueStore, MemoryStore};
