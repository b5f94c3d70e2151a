//! Ping request handler.

use tonic::{Request, Response, Status};
use tracing::info;

use super::pb::ping_service_server::PingService;
use super::pb::{PingReq, PongResp};

/// Prepended to every payload.
const GREETING: &str = "Hello ";

/// Build the reply body for a ping payload.
///
/// The payload is copied verbatim: no trimming, no escaping.
pub fn greet(text: &str) -> String {
    let mut body = String::with_capacity(GREETING.len() + text.len());
    body.push_str(GREETING);
    body.push_str(text);
    body
}

/// Stateless `PingService` implementation.
///
/// Holds no data, so tonic can run any number of calls against it at once.
#[derive(Debug, Default, Clone, Copy)]
pub struct PingHandler;

#[tonic::async_trait]
impl PingService for PingHandler {
    async fn ping(&self, request: Request<PingReq>) -> Result<Response<PongResp>, Status> {
        let req = request.into_inner();
        info!(text = %req.str, "ping");

        Ok(Response::new(PongResp {
            body: greet(&req.str),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greet() {
        assert_eq!(greet("world"), "Hello world");
    }

    #[test]
    fn test_greet_empty() {
        assert_eq!(greet(""), "Hello ");
    }

    #[test]
    fn test_greet_verbatim() {
        assert_eq!(greet("  padded  "), "Hello   padded  ");
        assert_eq!(greet("line\r\nbreak\0"), "Hello line\r\nbreak\0");
        assert_eq!(greet("<b>&amp;</b>"), "Hello <b>&amp;</b>");
        assert_eq!(greet("héllo wörld ✓ 🦀"), "Hello héllo wörld ✓ 🦀");
    }

    #[test]
    fn test_greet_repeatable() {
        let first = greet("same");
        for _ in 0..10 {
            assert_eq!(greet("same"), first);
        }
    }

    #[tokio::test]
    async fn test_handler_ping() {
        let handler = PingHandler;
        let response = handler
            .ping(Request::new(PingReq {
                str: "world".to_string(),
            }))
            .await;

        let pong = tokio_test::assert_ok!(response).into_inner();
        assert_eq!(pong.body, "Hello world");
    }

    #[tokio::test]
    async fn test_handler_never_fails() {
        let handler = PingHandler;
        let large = "x".repeat(64 * 1024);
        for text in ["", " ", "\u{7f}\u{1b}[0m", "ünïcödé", large.as_str()] {
            let response = handler
                .ping(Request::new(PingReq {
                    str: text.to_string(),
                }))
                .await;
            let pong = tokio_test::assert_ok!(response).into_inner();
            assert_eq!(pong.body, format!("Hello {text}"));
        }
    }
}
