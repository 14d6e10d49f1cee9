//
// etherpad-client
// Distributed under terms of the GNU GPLv3 license.
//

//! etherpad-client is a tiny crate for interacting with the [Etherpad-Lite][etherpad]
//! HTTP API from Rust.
//!
//! # Overview
//!
//! Every remote call of the API (groups, authors, sessions, pads, text, chat)
//! is exposed as one client method. Parameters are serialized into the JSON
//! blob the server expects, read-only calls go over GET and mutating calls
//! over POST, and the `{code, message, data}` response envelope is decoded
//! into typed models with nonzero codes mapped to typed errors.
//!
//! # Using the Client
//! ```rust,no_run
//! use etherpad_client::{Client, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Define a host URL to connect to
//!     let url = "http://localhost:9001";
//!
//!     // Create Etherpad API client
//!     let client = Client::new(url, "api-key")?;
//!
//!     // Create a pad with some initial text
//!     client.create_pad("my-pad", Some("Initial text")).await?;
//!
//!     // Read the text back, the server appends a trailing newline
//!     let text = client.get_text("my-pad", None).await?;
//!     println!("{}", text.text);
//!     Ok(())
//! }
//! ```
//!
//! For details, see:
//! * [Client][Client] for the implementation of the Etherpad API client.
//! * [CLI][cli] for a full example of use.
//!
//! [etherpad]: https://etherpad.org/doc/v1.2.1/#index_http_api
//! [cli]: src/main.rs

mod client;
mod error;
pub mod model;

pub use client::{Client, RequestObserver, DEFAULT_API_VERSION};
pub use error::{Error, Result};
