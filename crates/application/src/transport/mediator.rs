//! Runs requests through the processor and runner and publishes the
//! lifecycle of each one.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::Utc;
use meridian_domain::{RequestData, TransportRequest, TransportResponse};
use parking_lot::Mutex;

use super::TransportEvent;
use super::events::{EventBus, TransportEvents};
use crate::ports::{
    CancellationReceiver, CancellationToken, RequestProcessor, RequestRunner, TransportError,
};

const NO_RESULT_MESSAGE: &str = "The request did not produce a response";

/// Object-safe view of a mediator, held by the workspace controller.
pub trait TransportDispatch: Send + Sync {
    /// Starts sending `draft` under `id`. Returns false if `id` is already
    /// in flight.
    fn send(&self, id: &str, draft: RequestData) -> bool;

    /// Aborts the request with `id`. Returns false if it is not in flight.
    fn abort(&self, id: &str) -> bool;

    /// Aborts every in-flight request. Returns how many were aborted.
    fn abort_all(&self) -> usize;
}

#[derive(Debug)]
struct InFlight {
    sequence: u64,
    token: CancellationToken,
}

type InFlightTable = Arc<Mutex<HashMap<String, InFlight>>>;

/// Mediates the transport of requests keyed by editor id.
///
/// Every accepted send ends with exactly one [`TransportEvent::Response`]
/// for its id, even when the runner fails, produces nothing or the
/// request is aborted.
pub struct TransportMediator<P, R> {
    processor: Arc<P>,
    runner: Arc<R>,
    events: EventBus,
    in_flight: InFlightTable,
    sequence: AtomicU64,
}

impl<P, R> TransportMediator<P, R>
where
    P: RequestProcessor,
    R: RequestRunner,
{
    /// Creates a mediator over the given collaborators.
    #[must_use]
    pub fn new(processor: Arc<P>, runner: Arc<R>) -> Self {
        Self {
            processor,
            runner,
            events: EventBus::default(),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            sequence: AtomicU64::new(0),
        }
    }

    /// Subscribes to lifecycle events.
    #[must_use]
    pub fn subscribe(&self) -> TransportEvents {
        self.events.subscribe()
    }

    /// Number of requests currently in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Returns true if `id` is in flight.
    #[must_use]
    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.lock().contains_key(id)
    }

    fn start(&self, id: &str, draft: RequestData) -> bool {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let cancel = {
            let mut table = self.in_flight.lock();
            if table.contains_key(id) {
                tracing::debug!(id = %id, "Request already in flight");
                return false;
            }
            let (token, receiver) = CancellationToken::new();
            table.insert(id.to_string(), InFlight { sequence, token });
            receiver
        };

        self.events.emit(&TransportEvent::Requested { id: id.to_string() });
        tracing::debug!(id = %id, url = %draft.url, "Sending request");

        let run = RunContext {
            id: id.to_string(),
            sequence,
            processor: Arc::clone(&self.processor),
            runner: Arc::clone(&self.runner),
            events: self.events.clone(),
            in_flight: Arc::clone(&self.in_flight),
        };
        tokio::spawn(run.execute(draft, cancel));
        true
    }

    fn cancel(&self, id: &str) -> bool {
        let found = self.in_flight.lock().get(id).map(|f| f.token.cancel()).is_some();
        if found {
            tracing::debug!(id = %id, "Aborting request");
            let runner = Arc::clone(&self.runner);
            let id = id.to_string();
            tokio::spawn(async move { runner.abort(&id).await });
        }
        found
    }
}

impl<P, R> TransportDispatch for TransportMediator<P, R>
where
    P: RequestProcessor,
    R: RequestRunner,
{
    fn send(&self, id: &str, draft: RequestData) -> bool {
        self.start(id, draft)
    }

    fn abort(&self, id: &str) -> bool {
        self.cancel(id)
    }

    fn abort_all(&self) -> usize {
        let ids: Vec<String> = self.in_flight.lock().keys().cloned().collect();
        ids.iter().filter(|id| self.cancel(id)).count()
    }
}

struct RunContext<P, R> {
    id: String,
    sequence: u64,
    processor: Arc<P>,
    runner: Arc<R>,
    events: EventBus,
    in_flight: InFlightTable,
}

impl<P, R> RunContext<P, R>
where
    P: RequestProcessor,
    R: RequestRunner,
{
    async fn execute(self, draft: RequestData, mut cancel: CancellationReceiver) {
        let processed = tokio::select! {
            result = self.processor.process(draft) => result,
            () = cancel.cancelled() => Err(TransportError::Aborted),
        };

        let (request, response) = match processed {
            Ok(request) => {
                self.events.emit(&TransportEvent::Ready {
                    id: self.id.clone(),
                    request: Box::new(request.clone()),
                });
                let (sent, response) = self.run(&request, &mut cancel).await;
                (Some(sent), response)
            }
            Err(error) => {
                tracing::warn!(id = %self.id, error = %error, "Request was not prepared");
                (None, TransportResponse::error(error.to_string()))
            }
        };

        {
            let mut table = self.in_flight.lock();
            if table.get(&self.id).is_some_and(|f| f.sequence == self.sequence) {
                table.remove(&self.id);
            }
        }

        self.events.emit(&TransportEvent::Response {
            id: self.id,
            request,
            response,
        });
    }

    async fn run(
        &self,
        request: &RequestData,
        cancel: &mut CancellationReceiver,
    ) -> (TransportRequest, TransportResponse) {
        let started_at = Utc::now();
        let clock = Instant::now();

        let outcome = tokio::select! {
            result = self.runner.run(&self.id, request) => result,
            () = cancel.cancelled() => Err(TransportError::Aborted),
        };

        let sent = TransportRequest {
            url: request.url.clone(),
            method: request.method,
            headers: request.headers.clone(),
            payload: request.payload.clone(),
            started_at,
            ended_at: Some(Utc::now()),
        };

        let response = match outcome {
            Ok(Some(response)) => response,
            Ok(None) => {
                tracing::warn!(id = %self.id, "Runner returned no result");
                let mut response = TransportResponse::error(NO_RESULT_MESSAGE);
                response.loading_time = clock.elapsed();
                response
            }
            Err(error) => {
                tracing::warn!(id = %self.id, error = %error, "Transport failed");
                let mut response = TransportResponse::error(error.to_string());
                response.loading_time = clock.elapsed();
                response
            }
        };
        (sent, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::PassthroughProcessor;
    use meridian_domain::HttpMethod;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[derive(Default)]
    struct ScriptedRunner {
        delays: HashMap<String, Duration>,
        empty: Vec<String>,
        failing: Vec<String>,
        aborted: Mutex<Vec<String>>,
    }

    impl RequestRunner for ScriptedRunner {
        async fn run(
            &self,
            id: &str,
            request: &RequestData,
        ) -> Result<Option<TransportResponse>, TransportError> {
            let delay = self.delays.get(id).copied().unwrap_or_default();
            tokio::time::sleep(delay).await;
            if self.failing.iter().any(|f| f == id) {
                return Err(TransportError::Connection("refused".to_string()));
            }
            if self.empty.iter().any(|e| e == id) {
                return Ok(None);
            }
            Ok(Some(
                TransportResponse::new(200, "OK", delay).with_payload(request.url.clone()),
            ))
        }

        async fn abort(&self, id: &str) {
            self.aborted.lock().push(id.to_string());
        }
    }

    struct FailingProcessor;

    impl RequestProcessor for FailingProcessor {
        async fn process(&self, _request: RequestData) -> Result<RequestData, TransportError> {
            Err(TransportError::Processing("unknown variable".to_string()))
        }
    }

    struct UpperProcessor;

    impl RequestProcessor for UpperProcessor {
        async fn process(&self, mut request: RequestData) -> Result<RequestData, TransportError> {
            request.url = request.url.to_uppercase();
            Ok(request)
        }
    }

    fn mediator(runner: ScriptedRunner) -> TransportMediator<PassthroughProcessor, ScriptedRunner> {
        TransportMediator::new(Arc::new(PassthroughProcessor), Arc::new(runner))
    }

    fn draft(url: &str) -> RequestData {
        RequestData::new(HttpMethod::Get, url)
    }

    async fn next_response(
        events: &mut TransportEvents,
    ) -> (String, Option<TransportRequest>, TransportResponse) {
        loop {
            if let TransportEvent::Response {
                id,
                request,
                response,
            } = events.recv().await.expect("event channel closed")
            {
                return (id, request, response);
            }
        }
    }

    #[tokio::test]
    async fn test_lifecycle_events_in_order() {
        let mediator = mediator(ScriptedRunner::default());
        let mut events = mediator.subscribe();

        assert!(mediator.send("r1", draft("https://a.dev")));

        assert_eq!(
            events.recv().await.unwrap(),
            TransportEvent::Requested { id: "r1".into() }
        );
        let ready = events.recv().await.unwrap();
        assert!(matches!(ready, TransportEvent::Ready { ref id, .. } if id == "r1"));
        let (id, request, response) = next_response(&mut events).await;
        assert_eq!(id, "r1");
        assert_eq!(request.unwrap().url, "https://a.dev");
        assert_eq!(response.status, 200);
        assert_eq!(mediator.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_responses_route_by_id_in_completion_order() {
        let mut runner = ScriptedRunner::default();
        runner.delays.insert("slow".into(), Duration::from_millis(300));
        runner.delays.insert("fast".into(), Duration::from_millis(10));
        let mediator = mediator(runner);
        let mut events = mediator.subscribe();

        assert!(mediator.send("slow", draft("https://slow.dev")));
        assert!(mediator.send("fast", draft("https://fast.dev")));

        let (first, _, first_response) = next_response(&mut events).await;
        let (second, _, second_response) = next_response(&mut events).await;
        assert_eq!(first, "fast");
        assert_eq!(first_response.payload.as_deref(), Some("https://fast.dev"));
        assert_eq!(second, "slow");
        assert_eq!(second_response.payload.as_deref(), Some("https://slow.dev"));
    }

    #[tokio::test]
    async fn test_no_result_becomes_error_response() {
        let mut runner = ScriptedRunner::default();
        runner.empty.push("r1".into());
        let mediator = mediator(runner);
        let mut events = mediator.subscribe();

        mediator.send("r1", draft("https://a.dev"));
        let (_, request, response) = next_response(&mut events).await;
        assert!(request.is_some());
        assert!(response.error);
        assert_eq!(response.status, 0);
        assert_eq!(response.message.as_deref(), Some(NO_RESULT_MESSAGE));
    }

    #[tokio::test]
    async fn test_runner_failure_becomes_error_response() {
        let mut runner = ScriptedRunner::default();
        runner.failing.push("r1".into());
        let mediator = mediator(runner);
        let mut events = mediator.subscribe();

        mediator.send("r1", draft("https://a.dev"));
        let (_, _, response) = next_response(&mut events).await;
        assert!(response.error);
        assert_eq!(response.message.as_deref(), Some("Connection failed: refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_emits_error_response_and_notifies_runner() {
        let mut runner = ScriptedRunner::default();
        runner.delays.insert("r1".into(), Duration::from_secs(60));
        let runner = Arc::new(runner);
        let mediator = TransportMediator::new(Arc::new(PassthroughProcessor), Arc::clone(&runner));
        let mut events = mediator.subscribe();

        mediator.send("r1", draft("https://a.dev"));
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(mediator.abort("r1"));

        let (id, _, response) = next_response(&mut events).await;
        assert_eq!(id, "r1");
        assert!(response.error);
        assert_eq!(response.message.as_deref(), Some("Request aborted"));
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(*runner.aborted.lock(), vec!["r1".to_string()]);
        assert!(!mediator.is_in_flight("r1"));
    }

    #[tokio::test]
    async fn test_abort_unknown_id_is_noop() {
        let mediator = mediator(ScriptedRunner::default());
        assert!(!mediator.abort("missing"));
        assert_eq!(mediator.abort_all(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_send_is_rejected() {
        let mut runner = ScriptedRunner::default();
        runner.delays.insert("r1".into(), Duration::from_secs(1));
        let mediator = mediator(runner);

        assert!(mediator.send("r1", draft("https://a.dev")));
        assert!(!mediator.send("r1", draft("https://a.dev")));
        assert_eq!(mediator.in_flight(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abort_all_cancels_everything() {
        let mut runner = ScriptedRunner::default();
        runner.delays.insert("a".into(), Duration::from_secs(5));
        runner.delays.insert("b".into(), Duration::from_secs(5));
        let mediator = mediator(runner);
        let mut events = mediator.subscribe();

        mediator.send("a", draft("https://a.dev"));
        mediator.send("b", draft("https://b.dev"));
        assert_eq!(mediator.abort_all(), 2);

        let (_, _, first) = next_response(&mut events).await;
        let (_, _, second) = next_response(&mut events).await;
        assert!(first.error && second.error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_subscriber_receives_every_response() {
        let mediator = mediator(ScriptedRunner::default());
        let mut events = mediator.subscribe();

        for i in 0..80 {
            assert!(mediator.send(&format!("r{i}"), draft("https://a.dev")));
        }
        while mediator.in_flight() > 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        let mut responses = Vec::new();
        while let Some(event) = events.try_recv() {
            if event.is_response() {
                responses.push(event.id().to_string());
            }
        }
        responses.sort();
        let mut expected: Vec<String> = (0..80).map(|i| format!("r{i}")).collect();
        expected.sort();
        assert_eq!(responses, expected);
    }

    #[tokio::test]
    async fn test_processing_failure_skips_runner() {
        let mediator = TransportMediator::new(
            Arc::new(FailingProcessor),
            Arc::new(ScriptedRunner::default()),
        );
        let mut events = mediator.subscribe();

        mediator.send("r1", draft("https://a.dev"));
        let mut saw_ready = false;
        let response = loop {
            match events.recv().await.unwrap() {
                TransportEvent::Ready { .. } => saw_ready = true,
                TransportEvent::Response {
                    request, response, ..
                } => {
                    assert!(request.is_none());
                    break response;
                }
                TransportEvent::Requested { .. } => {}
            }
        };
        assert!(!saw_ready);
        assert!(response.error);
    }

    #[tokio::test]
    async fn test_ready_carries_processed_request() {
        let mediator =
            TransportMediator::new(Arc::new(UpperProcessor), Arc::new(ScriptedRunner::default()));
        let mut events = mediator.subscribe();

        mediator.send("r1", draft("https://a.dev"));
        let (_, request, response) = next_response(&mut events).await;
        assert_eq!(request.unwrap().url, "HTTPS://A.DEV");
        assert_eq!(response.payload.as_deref(), Some("HTTPS://A.DEV"));
    }
}
