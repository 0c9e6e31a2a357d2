//! Orchestration for the route, hazard and chat workflows.
//!
//! Each workflow is an explicit state record ([`RouteQuery`],
//! [`HazardSubmission`], [`Conversation`]) that owns its inputs, its
//! in-flight flag and its Result/Error slot. A round-trip is split into a
//! synchronous `submit` that validates and transitions state, the transport
//! call, and a `complete` that applies the response. The `*_with` helpers run
//! all three for callers that simply await.

pub mod conversation;
pub mod hazard;
pub mod outcome;
pub mod preview;
pub mod route;
pub mod transport;

pub use conversation::{ChatPhase, Conversation};
pub use hazard::{HazardSubmission, ImageAsset};
pub use outcome::Outcome;
pub use preview::{Preview, PreviewError, PreviewJob};
pub use route::RouteQuery;
pub use transport::{Endpoint, HttpTransport, MultipartPayload, RequestPayload, Transport};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
