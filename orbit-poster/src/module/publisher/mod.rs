//! Page post publishing
//!
//! One multipart upload per run. There is no idempotency key: if the
//! acknowledgement is lost after the post was accepted, the next trigger
//! may create a duplicate.

mod types;
pub use types::{GraphErrorBody, GraphResponse, PublishReceipt};

mod client;
pub use client::{PostSink, Publisher};
