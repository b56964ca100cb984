//! Chat Widget
//!
//! A form-driven chat widget: messages are rendered optimistically into a
//! scrolling panel, sent to the page's endpoint as a single asynchronous
//! exchange, and the form falls back to a native submission when that
//! exchange fails.
//!
//! # Architecture
//!
//! - **Widget**: submit lifecycle, typing indicator and panel rendering
//! - **Transport**: one form-encoded POST per message, JSON reply
//! - **Theme**: one-shot light/dark resolution from stored or platform preference
//! - **Host**: the page contract, with an in-memory page and a terminal front end
//!
//! # Modules
//!
//! - [`widget`]: the chat widget
//! - [`transport`]: HTTP exchange with the chat endpoint
//! - [`theme`]: theme resolution and preference stores
//! - [`dom`]: page contract consumed by the widget
//! - [`headless`]: in-memory page
//! - [`render`]: message and indicator markup
//! - [`terminal`]: terminal front end

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod dom;
pub mod headless;
pub mod message;
pub mod render;
pub mod terminal;
pub mod theme;
pub mod transport;
pub mod widget;

pub use dom::{ChatHost, DocumentRoot, HostEvent, InputControl};
pub use message::{Message, MessageRole};
pub use theme::{ThemeMode, resolve_theme};
pub use transport::{ChatReply, HttpTransport, Transport, TransportError};
pub use widget::{ChatWidget, SubmitOutcome, WidgetSettings};
