//! Protocol implementations.
//!
//! Each protocol module carries its generated wire types and the handler
//! registered with the gRPC server.
//!
//! - `ping`: liveness probe answering `Hello <text>`

pub mod ping;
