//! Quote submission boundary
//!
//! Delivery of a quote request (outbound email, CRM webhook) happens outside
//! this service. The core's obligation ends at producing a well-formed
//! [`QuoteRequest`] and handing it to a submitter.

use crate::domain::aggregates::QuoteRequest;
use crate::Result;

pub trait QuoteSubmitter: Send + Sync {
    fn submit(&self, request: &QuoteRequest) -> Result<()>;
}

/// Default submitter: records the request in the service log. Stands in for
/// the outbound mail/contact API in development deployments.
#[derive(Default)]
pub struct LoggingSubmitter;

impl QuoteSubmitter for LoggingSubmitter {
    fn submit(&self, request: &QuoteRequest) -> Result<()> {
        tracing::info!(
            reference = %request.reference(),
            contact = %request.contact().email,
            lines = request.line_items().len(),
            total = %request.total_value(),
            "quote request submitted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{Cart, ContactInfo};

    #[test]
    fn test_logging_submitter_accepts_request() {
        let contact = ContactInfo {
            name: "Ada Buyer".into(),
            email: "ada@example.com".into(),
            company: None,
            phone: None,
        };
        let request = QuoteRequest::build(&Cart::new("USD"), contact, "hello").unwrap();
        assert!(LoggingSubmitter.submit(&request).is_ok());
    }
}
