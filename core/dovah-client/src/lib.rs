//! HTTP client for the DovahCloud library API.
//!
//! Wraps the backend's JSON and multipart endpoints behind the
//! [`LibraryApi`] trait. Credentials travel in an explicit
//! [`CredentialContext`] handed to every call, and non-2xx responses become
//! [`ClientError::Status`] carrying the server's error body.
//!
//! # Example
//!
//! ```no_run
//! use dovah_client::{ClientConfig, CredentialContext, HttpClient, LibraryApi};
//!
//! # async fn run() -> dovah_client::ClientResult<()> {
//! let client = HttpClient::new(&ClientConfig::default())?;
//! let ctx = CredentialContext::new();
//! let session = client.session(&ctx).await?;
//! println!("authenticated: {}", session.is_authenticated());
//! # Ok(())
//! # }
//! ```

mod api;
mod config;
mod credentials;
mod error;
mod http;
mod upload;

pub use api::LibraryApi;
pub use config::{ClientConfig, API_URL_ENV, TIMEOUT_ENV};
pub use credentials::CredentialContext;
pub use error::{ClientError, ClientResult, ErrorBody};
pub use http::HttpClient;
pub use upload::UploadFile;

pub use reqwest::Url;
