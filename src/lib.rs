//! # specred
//!
//! Reading and writing of spectroscopic reduction files, and evaluation of the
//! configuration parameters they carry.
//!
//! ## Crate Structure
//!
//! - **`reduction_file`**: locating the `data` and `setup` blocks of a reduction file,
//!   interpreting them, separating out the configuration lines, and writing new files.
//! - **`params`**: parsing `[section]` / `key = value` configuration text and coercing
//!   its values into typed parameters.
//! - **`messages`**: the [`MessageSink`](messages::MessageSink) trait through which
//!   parsing reports progress and problems to its caller.
//! - **`log_capture`**: an in-memory sink that records messages, used for inspection
//!   and in tests.
//! - **`error`**: the [`RdxError`](error::RdxError) enum shared by the whole crate.
//! - **`settings`** / **`logging`**: Figment-based settings and tracing setup for the
//!   command-line front end.
//! - **`validation`**: small validation helpers.

pub mod error;
pub mod log_capture;
pub mod logging;
pub mod messages;
pub mod params;
pub mod reduction_file;
pub mod settings;
pub mod validation;

pub use error::{RdxError, RdxResult};
pub use messages::{MessageSink, TracingSink};
pub use reduction_file::{parse_reduction_file, ParseOptions, ReductionFile};
