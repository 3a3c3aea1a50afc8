//! Response subsystem.
//!
//! # Data Flow
//! ```text
//! RawResponse
//!     → handler.rs validate (MIME type, error statuses)
//!     → handler.rs decode (codec.rs, charset from content type)
//!     → QueryResponse or SolrError::{MimeMismatch, Remote}
//! ```

pub mod codec;
pub mod handler;

pub use codec::{JsonCodec, QueryResponse, ResponseCodec};
pub use handler::ResponseHandler;
