//! Client-side synchronization engine for a DovahCloud media library.
//!
//! Keeps local copies of the server's files, tags and playlists consistent
//! with user actions, and reports every outcome through a notification
//! queue.
//!
//! # Architecture
//!
//! ## Components
//!
//! - **Session**: probes, signs in and signs out ([`SessionManager`])
//! - **Store**: collection loads and file mutations ([`ResourceStore`])
//! - **Playlists**: selection, item edits, confirmed deletes ([`PlaylistController`])
//! - **Uploads**: multipart submission and merge ([`UploadCoordinator`])
//! - **Reload rules**: which criteria changes reload which collection ([`reload`])
//! - **Library**: wires the above over one shared state ([`Library`])
//!
//! ## Ordering
//!
//! Every collection load takes a ticket. Under the default
//! [`StaleResponsePolicy::DiscardStale`] a response is applied only if no
//! newer load of the same collection was issued meanwhile. Logout starts a
//! new epoch, after which no earlier response is applied.
//!
//! # Example
//!
//! ```no_run
//! use dovah_sync::{Library, LibraryConfig};
//! use dovah_types::Credentials;
//!
//! # async fn run() -> dovah_sync::SyncResult<()> {
//! let library = Library::connect(LibraryConfig::from_env()?)?;
//! library.start().await;
//! library.login(&Credentials::new("ana", "secret")).await?;
//! library.set_search("holiday").await?;
//! for file in library.visible_files().await {
//!     println!("{} ({})", file.name, file.mime_type);
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
pub mod filter;
mod library;
pub mod notifications;
mod playlists;
pub mod reload;
mod session;
mod shared;
pub mod state;
mod store;
mod upload;

pub use config::{LibraryConfig, StaleResponsePolicy};
pub use error::{SyncError, SyncResult};
pub use filter::LibraryStats;
pub use library::Library;
pub use notifications::{messages, NotificationQueue, Template};
pub use playlists::PlaylistController;
pub use reload::{Collection, ReloadPlan, Trigger};
pub use session::SessionManager;
pub use state::{LoadTicket, ResourceState};
pub use store::{LoadOutcome, ResourceStore};
pub use upload::UploadCoordinator;
