// Library root
// ------------
// The binary (`main.rs`) parses arguments and hands them to `cli::run`.
//
// Module responsibilities:
// - `api`: the blocking WebPurify client, request dispatch and one method
//   per remote operation.
// - `envelope`: decoding of the `{"rsp": ...}` response envelope into a
//   success payload or a service error.
// - `error`: the library's error type.
// - `cli`: clap command table, output rendering and logging setup.
pub mod api;
pub mod cli;
pub mod envelope;
pub mod error;

pub use api::{Endpoints, ImageStatus, WebPurifyClient};
pub use envelope::{interpret, Envelope, Payload};
pub use error::{Error, ModerationServiceError, Result};
