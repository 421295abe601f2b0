//! Wallpaper generation against a remote image-synthesis endpoint.
//!
//! `Generator` turns a style id into a `RequestSpec`, and `RequestExecutor`
//! sends it through a `Transport` with the retry policy from `crate::retry`.
//! The result is all-or-nothing: decoded bytes or a typed `GenerateError`.

mod artifact;
mod error;
mod executor;
mod generator;
mod request;
mod response;
mod styles;
#[cfg(test)]
mod testing;
mod transport;

pub use artifact::{Artifact, MIME_TYPE};
pub use error::GenerateError;
pub use executor::RequestExecutor;
pub use generator::{Generator, GeneratorSettings};
pub use request::RequestSpec;
pub use response::parse_reply;
pub use styles::{find_style, Style, STYLES};
pub use transport::{CurlTransport, HttpReply, Transport};
