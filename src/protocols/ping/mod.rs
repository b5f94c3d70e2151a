//! Ping protocol implementation.
//!
//! The agent's liveness probe, served over gRPC as
//! `com.fyorlando.cms.PingService/Ping`:
//! - Client sends: `PingReq { str }`
//! - Server responds: `PongResp { body: "Hello " + str }`
//!
//! ## Use Cases
//!
//! 1. **Health checks**: the CMS server and operators can verify an agent
//!    is up and reachable without touching any other state.
//!
//! 2. **Round-trip checks**: the payload comes back verbatim behind the
//!    greeting, so callers can tell their own reply apart from others.
//!
//! ## Protocol Format
//!
//! ```text
//! Request:  PingReq  { str: "world" }
//! Response: PongResp { body: "Hello world" }
//!
//! Request:  PingReq  { str: "" }
//! Response: PongResp { body: "Hello " }
//! ```

pub mod handler;

/// Types and stubs generated from `proto/ping.proto`.
pub mod pb {
    tonic::include_proto!("com.fyorlando.cms");
}

pub use handler::PingHandler;
pub use pb::ping_service_server::PingServiceServer;
