//! Generation-guarded request lifecycle.
//!
//! Every start hands out a [`Ticket`]. Only the ticket of the most recent start
//! may settle; any other completion is discarded without touching state.

use api_types::ErrorBody;
use tracing::debug;

use crate::error::RequestError;

/// Identifies one started request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Lifecycle {
    generation: u64,
    in_flight: Option<u64>,
    error: Option<String>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request, superseding whatever was in flight. Clears the
    /// previous error.
    pub fn start(&mut self) -> Ticket {
        self.generation += 1;
        if let Some(previous) = self.in_flight.replace(self.generation) {
            debug!(previous, current = self.generation, "request superseded");
        }
        self.error = None;
        Ticket(self.generation)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.in_flight == Some(ticket.0)
    }

    /// Settles the request behind `ticket`.
    ///
    /// Returns `None` when the completion must be ignored: the ticket was
    /// superseded, or the request reports its own cancellation. Otherwise the
    /// lifecycle leaves the loading state and the outcome is handed back with
    /// errors already turned into operator text.
    pub fn settle<T>(
        &mut self,
        ticket: Ticket,
        outcome: Result<T, RequestError>,
    ) -> Option<Result<T, String>> {
        if !self.is_current(ticket) {
            debug!(stale = ticket.0, current = self.generation, "discarding stale completion");
            return None;
        }
        if matches!(outcome, Err(RequestError::Cancelled)) {
            return None;
        }
        self.in_flight = None;
        match outcome {
            Ok(value) => Some(Ok(value)),
            Err(err) => {
                let message = err.user_message().unwrap_or_default();
                self.error = Some(message.clone());
                Some(Err(message))
            }
        }
    }

    /// Abandons the in-flight request; its completion will be discarded.
    pub fn cancel(&mut self) {
        if let Some(generation) = self.in_flight.take() {
            debug!(generation, "request cancelled");
        }
        self.generation += 1;
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Text for a non-2xx response.
///
/// The structured `message` (a list joined with `", "`) wins, then the raw
/// body text, then `HTTP <status>`.
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(ErrorBody {
        message: Some(message),
    }) = serde_json::from_str::<ErrorBody>(body)
    {
        let joined = message.joined();
        if !joined.trim().is_empty() {
            return joined;
        }
    }
    let raw = body.trim();
    if raw.is_empty() {
        format!("HTTP {status}")
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superseded_ticket_is_discarded() {
        let mut lifecycle = Lifecycle::new();
        let first = lifecycle.start();
        let second = lifecycle.start();

        assert_eq!(lifecycle.settle(second, Ok::<_, RequestError>(2)), Some(Ok(2)));
        assert_eq!(lifecycle.settle(first, Ok::<_, RequestError>(1)), None);
        assert!(!lifecycle.is_loading());
    }

    #[test]
    fn cancellation_mutates_nothing() {
        let mut lifecycle = Lifecycle::new();
        let ticket = lifecycle.start();
        assert_eq!(lifecycle.settle::<()>(ticket, Err(RequestError::Cancelled)), None);
        assert!(lifecycle.is_loading());
        assert_eq!(lifecycle.error(), None);

        lifecycle.cancel();
        assert!(!lifecycle.is_loading());
        assert_eq!(lifecycle.settle(ticket, Ok::<_, RequestError>(())), None);
    }

    #[test]
    fn failure_is_recorded_until_next_start() {
        let mut lifecycle = Lifecycle::new();
        let ticket = lifecycle.start();
        let outcome = lifecycle.settle::<()>(ticket, Err(RequestError::Transport("timed out".into())));
        assert_eq!(outcome, Some(Err("server unreachable: timed out".to_string())));
        assert_eq!(lifecycle.error(), Some("server unreachable: timed out"));

        lifecycle.start();
        assert_eq!(lifecycle.error(), None);
        assert!(lifecycle.is_loading());
    }

    #[test]
    fn error_message_extraction_order() {
        assert_eq!(error_message(400, r#"{"message":"bad group"}"#), "bad group");
        assert_eq!(
            error_message(400, r#"{"message":["name is empty","code is empty"]}"#),
            "name is empty, code is empty"
        );
        assert_eq!(error_message(502, "Bad Gateway\n"), "Bad Gateway");
        assert_eq!(error_message(404, ""), "HTTP 404");
        assert_eq!(error_message(500, r#"{"error":"boom"}"#), r#"{"error":"boom"}"#);
        assert_eq!(error_message(409, r#"{"message":409}"#), "409");
    }
}
