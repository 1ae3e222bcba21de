//! Single-invocation adapter.
//!
//! Each invocation carries one query request and gets one response. There is
//! no credential check here: the platform delivering the invocation is
//! responsible for authorizing it. The handler is meant to be kept warm and
//! reused, so only the first successful invocation pays for initialization.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::classifier::{ErrorDetail, FailureKind, finalize};
use crate::error::LifecycleError;
use crate::lifecycle::Lifecycle;
use crate::pipeline::QueryRequest;
use crate::response::QueryResponse;

/// Handles invocation events against a shared [`Lifecycle`].
#[derive(Clone)]
pub struct InvocationHandler {
    lifecycle: Arc<Lifecycle>,
}

impl InvocationHandler {
    #[must_use]
    pub fn new(lifecycle: Arc<Lifecycle>) -> Self {
        Self { lifecycle }
    }

    #[must_use]
    pub fn lifecycle(&self) -> &Arc<Lifecycle> {
        &self.lifecycle
    }

    /// Runs one invocation event.
    ///
    /// Operations that would stream their result are answered with a single
    /// `INTERNAL` error instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway could not be initialized for this
    /// invocation. The next invocation retries.
    pub async fn handle(&self, event: QueryRequest) -> Result<QueryResponse, LifecycleError> {
        let gateway = self.lifecycle.ensure_ready().await?;
        let request_id = Uuid::new_v4().to_string();

        debug!(request_id = %request_id, "Handling invocation");
        Ok(gateway
            .execute(event, &request_id)
            .await
            .into_query_response())
    }

    /// Runs one invocation given as raw JSON and always produces a response.
    ///
    /// Undecodable events are answered with `BAD_REQUEST`; initialization
    /// failures with a generic `INTERNAL` error.
    pub async fn handle_json(&self, raw: &str) -> QueryResponse {
        let event: QueryRequest = match serde_json::from_str(raw) {
            Ok(event) => event,
            Err(e) => {
                debug!(error = %e, "Rejecting malformed invocation event");
                let detail = ErrorDetail::new(
                    FailureKind::BadUserInput,
                    format!("Invalid invocation event: {e}"),
                );
                return QueryResponse::from_errors(vec![finalize(detail)]);
            }
        };

        match self.handle(event).await {
            Ok(response) => response,
            Err(e) => {
                let detail = ErrorDetail::new(FailureKind::InternalServerError, e.to_string());
                QueryResponse::from_errors(vec![finalize(detail)])
            }
        }
    }
}
