//! Fetch Count use case
//!
//! Asks every configured relay the same question in parallel and counts
//! distinct contributors across all answers.
//!
//! # Concurrency
//!
//! One task per endpoint does the socket I/O and forwards
//! [`EndpointEvent`]s over a channel. A single driver loop owns the
//! [`Tally`] and applies those events one at a time, so the contributor set
//! needs no lock. Each endpoint task owns its connection and closes it
//! exactly once, either on its own (timeout, error) or when the driver
//! cancels its token after EOSE.

use crate::config::FetchParams;
use crate::ports::count_sink::{CountSink, NoSink};
use crate::ports::fetch_logger::{FetchEvent, FetchLogger, NoFetchLogger};
use crate::ports::progress::{FetchProgressNotifier, NoProgress};
use crate::ports::relay_connector::{RelayConnection, RelayConnector};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tally_domain::{
    ClientMessage, DomainError, Effect, Endpoint, EndpointEvent, FetchReport, Filter, QueryTarget,
    Tally,
};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Upper bound on a close handshake once an endpoint is done.
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Errors that can occur while preparing a fetch
#[derive(Error, Debug)]
pub enum FetchCountError {
    #[error("Invalid target: {0}")]
    InvalidTarget(#[from] DomainError),
}

/// Input for the FetchCount use case
#[derive(Debug, Clone)]
pub struct FetchCountInput {
    /// Subject plus the endpoints to ask
    pub target: QueryTarget,
    /// Label, kinds, and timeout
    pub params: FetchParams,
}

impl FetchCountInput {
    pub fn new(
        subject: impl Into<String>,
        endpoints: Vec<Endpoint>,
    ) -> Result<Self, FetchCountError> {
        Ok(Self {
            target: QueryTarget::new(subject, endpoints)?,
            params: FetchParams::default(),
        })
    }

    pub fn with_params(mut self, params: FetchParams) -> Self {
        self.params = params;
        self
    }

    /// The REQ frame every endpoint receives
    pub fn request(&self) -> ClientMessage {
        ClientMessage::req(
            self.params.label.clone(),
            Filter::new(self.params.kinds.clone(), self.target.subject()),
        )
    }
}

/// Use case for counting distinct contributors across relays
pub struct FetchCountUseCase<C: RelayConnector + 'static> {
    connector: Arc<C>,
    sink: Arc<dyn CountSink>,
    logger: Arc<dyn FetchLogger>,
}

impl<C: RelayConnector + 'static> FetchCountUseCase<C> {
    pub fn new(connector: Arc<C>) -> Self {
        Self {
            connector,
            sink: Arc::new(NoSink),
            logger: Arc::new(NoFetchLogger),
        }
    }

    /// Where published counts go
    pub fn with_sink(mut self, sink: Arc<dyn CountSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn FetchLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: FetchCountInput) -> FetchReport {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks.
    ///
    /// Endpoint failures never surface as errors: they end up as
    /// [`DoneReason`](tally_domain::DoneReason)s in the report.
    pub async fn execute_with_progress(
        &self,
        input: FetchCountInput,
        progress: &dyn FetchProgressNotifier,
    ) -> FetchReport {
        let request = input.request().encode();
        let FetchCountInput { target, params } = input;
        let mut tally = Tally::new(&target, params.label.clone());

        info!(
            subject = %target.subject(),
            endpoints = target.endpoints().len(),
            "Starting fetch"
        );
        progress.on_fetch_start(target.subject(), target.endpoints());
        self.logger.log(FetchEvent::new(
            "fetch_start",
            json!({
                "subject": target.subject(),
                "label": params.label.as_str(),
                "kinds": params.kinds,
                "endpoints": target.endpoints(),
                "timeout_ms": u64::try_from(params.timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        ));

        if tally.is_complete() {
            debug!("No endpoints configured, nothing to fetch");
            return self.finish(&tally, progress);
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut tokens = Vec::with_capacity(target.endpoints().len());
        let mut join_set = JoinSet::new();

        for (idx, endpoint) in target.endpoints().iter().enumerate() {
            let token = CancellationToken::new();
            tokens.push(token.clone());

            let connector = Arc::clone(&self.connector);
            let endpoint = endpoint.clone();
            let request = request.clone();
            let tx = tx.clone();
            let timeout = params.timeout;

            join_set.spawn(async move {
                run_endpoint(connector.as_ref(), idx, &endpoint, &request, timeout, token, tx).await;
            });
        }
        // Only the endpoint tasks hold senders now; the channel closes when
        // all of them have exited.
        drop(tx);

        while !tally.is_complete() {
            let Some((idx, event)) = rx.recv().await else {
                break;
            };
            self.dispatch(&mut tally, &tokens, idx, event, progress);
        }

        if !tally.is_complete() {
            // Every task has exited without reporting a final event, which
            // only happens if one panicked.
            warn!("Endpoint tasks ended early, marking remaining endpoints done");
            for idx in 0..tally.endpoint_count() {
                let event = EndpointEvent::Error("endpoint task ended".to_string());
                self.dispatch(&mut tally, &tokens, idx, event, progress);
            }
        }

        for token in &tokens {
            token.cancel();
        }
        while let Some(result) = join_set.join_next().await {
            if let Err(e) = result {
                warn!("Endpoint task join error: {}", e);
            }
        }

        self.finish(&tally, progress)
    }

    /// Apply one event and carry out its effects
    fn dispatch(
        &self,
        tally: &mut Tally,
        tokens: &[CancellationToken],
        idx: usize,
        event: EndpointEvent,
        progress: &dyn FetchProgressNotifier,
    ) {
        let Some(endpoint) = tally.tracker(idx).map(|t| t.endpoint().clone()) else {
            return;
        };
        let count_before = tally.count();
        let done_before = tally.done_count();
        let opened = matches!(event, EndpointEvent::Opened);

        trace!(endpoint = %endpoint, ?event, "Endpoint event");
        let effects = tally.apply(idx, event);

        if opened {
            debug!(endpoint = %endpoint, "Subscription sent");
            progress.on_endpoint_opened(&endpoint);
            self.logger.log(FetchEvent::new(
                "endpoint_opened",
                json!({ "endpoint": endpoint }),
            ));
        }

        if tally.count() > count_before {
            self.logger.log(FetchEvent::new(
                "contributor_added",
                json!({ "endpoint": endpoint, "count": tally.count() }),
            ));
        }

        if tally.done_count() > done_before
            && let Some(tracker) = tally.tracker(idx)
            && let Some(reason) = tracker.done_reason()
        {
            if reason.is_complete() {
                info!(
                    endpoint = %endpoint,
                    events = tracker.events(),
                    contributed = tracker.contributed(),
                    "Endpoint finished"
                );
            } else {
                warn!(
                    endpoint = %endpoint,
                    reason = %reason,
                    detail = tracker.detail().unwrap_or(""),
                    "Endpoint gave up"
                );
            }
            progress.on_endpoint_done(&endpoint, reason);
            self.logger.log(FetchEvent::new(
                "endpoint_done",
                json!({
                    "endpoint": endpoint,
                    "reason": reason,
                    "events": tracker.events(),
                    "contributed": tracker.contributed(),
                    "detail": tracker.detail(),
                }),
            ));
        }

        for effect in effects {
            match effect {
                Effect::Close(i) => {
                    if let Some(token) = tokens.get(i) {
                        token.cancel();
                    }
                }
                Effect::Publish(count) => {
                    debug!(count, "Publishing count");
                    self.sink.publish(count);
                    progress.on_count_published(count);
                    self.logger.log(FetchEvent::new(
                        "count_published",
                        json!({ "count": count }),
                    ));
                }
            }
        }
    }

    fn finish(&self, tally: &Tally, progress: &dyn FetchProgressNotifier) -> FetchReport {
        let report = tally.report();
        info!(
            count = report.count,
            completed = report.completed(),
            failed = report.failed(),
            "Fetch complete"
        );
        progress.on_fetch_complete(&report);
        self.logger.log(FetchEvent::new(
            "fetch_complete",
            json!({
                "count": report.count,
                "published": report.published,
                "completed": report.completed(),
                "failed": report.failed(),
            }),
        ));
        report
    }
}

type EventSender = mpsc::UnboundedSender<(usize, EndpointEvent)>;

/// Drive one endpoint from connect to close.
///
/// The whole lifetime, connect included, is bounded by `timeout`. Sends
/// exactly one final event (`ConnectFailed`, `Error`, `Closed`, or
/// `TimedOut`) unless the driver cancels first.
async fn run_endpoint<C: RelayConnector + ?Sized>(
    connector: &C,
    idx: usize,
    endpoint: &Endpoint,
    request: &str,
    timeout: Duration,
    token: CancellationToken,
    tx: EventSender,
) {
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    let connected = tokio::select! {
        result = connector.connect(endpoint) => result,
        _ = &mut deadline => {
            let _ = tx.send((idx, EndpointEvent::TimedOut));
            return;
        }
    };

    let mut conn = match connected {
        Ok(conn) => conn,
        Err(e) => {
            let _ = tx.send((idx, EndpointEvent::ConnectFailed(e.to_string())));
            return;
        }
    };

    let sent = tokio::select! {
        result = conn.send(request) => result,
        _ = &mut deadline => {
            let _ = tx.send((idx, EndpointEvent::TimedOut));
            close_once(endpoint, conn).await;
            return;
        }
    };
    if let Err(e) = sent {
        let _ = tx.send((idx, EndpointEvent::Error(e.to_string())));
        close_once(endpoint, conn).await;
        return;
    }
    let _ = tx.send((idx, EndpointEvent::Opened));

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = &mut deadline => {
                let _ = tx.send((idx, EndpointEvent::TimedOut));
                break;
            }
            frame = conn.recv() => match frame {
                Some(Ok(text)) => {
                    let _ = tx.send((idx, EndpointEvent::Message(text)));
                }
                Some(Err(e)) => {
                    let _ = tx.send((idx, EndpointEvent::Error(e.to_string())));
                    break;
                }
                None => {
                    let _ = tx.send((idx, EndpointEvent::Closed));
                    break;
                }
            }
        }
    }

    close_once(endpoint, conn).await;
}

/// Consume the connection so it cannot be closed twice
async fn close_once(endpoint: &Endpoint, mut conn: Box<dyn RelayConnection>) {
    if tokio::time::timeout(CLOSE_GRACE, conn.close()).await.is_err() {
        debug!(endpoint = %endpoint, "Close handshake timed out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::relay_connector::ConnectorError;
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tally_domain::DoneReason;
    use tokio::time::Instant;

    // ==================== Test Mocks ====================

    /// What a connection does after its scripted frames run out
    #[derive(Clone)]
    enum After {
        Hang,
        Close,
        Fail,
    }

    #[derive(Clone)]
    struct Script {
        refuse: bool,
        delay: Duration,
        frames: Vec<String>,
        after: After,
    }

    impl Script {
        fn frames(frames: Vec<String>) -> Self {
            Self {
                refuse: false,
                delay: Duration::ZERO,
                frames,
                after: After::Hang,
            }
        }

        fn silent() -> Self {
            Self::frames(vec![])
        }

        fn refused() -> Self {
            Self {
                refuse: true,
                ..Self::silent()
            }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn then(mut self, after: After) -> Self {
            self.after = after;
            self
        }
    }

    struct MockConnection {
        delay: Duration,
        frames: VecDeque<String>,
        after: After,
        sent: Arc<Mutex<Vec<String>>>,
        closes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RelayConnection for MockConnection {
        async fn send(&mut self, text: &str) -> Result<(), ConnectorError> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }

        async fn recv(&mut self) -> Option<Result<String, ConnectorError>> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
                self.delay = Duration::ZERO;
            }
            if let Some(frame) = self.frames.pop_front() {
                return Some(Ok(frame));
            }
            match self.after {
                After::Hang => std::future::pending().await,
                After::Close => None,
                After::Fail => Some(Err(ConnectorError::ReceiveFailed("reset".into()))),
            }
        }

        async fn close(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct MockConnector {
        scripts: HashMap<String, Script>,
        sent: Arc<Mutex<Vec<String>>>,
        closes: HashMap<String, Arc<AtomicUsize>>,
    }

    impl MockConnector {
        fn with(mut self, url: &str, script: Script) -> Self {
            self.scripts.insert(url.to_string(), script);
            self.closes
                .insert(url.to_string(), Arc::new(AtomicUsize::new(0)));
            self
        }

        fn closes(&self, url: &str) -> usize {
            self.closes[url].load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RelayConnector for MockConnector {
        async fn connect(
            &self,
            endpoint: &Endpoint,
        ) -> Result<Box<dyn RelayConnection>, ConnectorError> {
            let script = self
                .scripts
                .get(endpoint.as_str())
                .cloned()
                .ok_or_else(|| ConnectorError::InvalidEndpoint(endpoint.to_string()))?;
            if script.refuse {
                return Err(ConnectorError::ConnectFailed("refused".into()));
            }
            Ok(Box::new(MockConnection {
                delay: script.delay,
                frames: script.frames.into(),
                after: script.after,
                sent: Arc::clone(&self.sent),
                closes: Arc::clone(&self.closes[endpoint.as_str()]),
            }))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        values: Mutex<Vec<usize>>,
    }

    impl RecordingSink {
        fn values(&self) -> Vec<usize> {
            self.values.lock().unwrap().clone()
        }
    }

    impl CountSink for RecordingSink {
        fn publish(&self, count: usize) {
            self.values.lock().unwrap().push(count);
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        types: Mutex<Vec<&'static str>>,
        payloads: Mutex<Vec<serde_json::Value>>,
    }

    impl FetchLogger for RecordingLogger {
        fn log(&self, event: FetchEvent) {
            self.types.lock().unwrap().push(event.event_type);
            self.payloads.lock().unwrap().push(event.payload);
        }
    }

    // ==================== Helpers ====================

    const R1: &str = "wss://one.example";
    const R2: &str = "wss://two.example";

    fn event(author: &str) -> String {
        format!(r#"["EVENT","followers",{{"pubkey":"{author}","kind":3}}]"#)
    }

    fn eose() -> String {
        r#"["EOSE","followers"]"#.to_string()
    }

    fn input(urls: &[&str]) -> FetchCountInput {
        FetchCountInput::new("subject", urls.iter().map(|u| Endpoint::new(*u)).collect()).unwrap()
    }

    fn run(
        connector: MockConnector,
    ) -> (Arc<MockConnector>, Arc<RecordingSink>, FetchCountUseCase<MockConnector>) {
        let connector = Arc::new(connector);
        let sink = Arc::new(RecordingSink::default());
        let use_case = FetchCountUseCase::new(Arc::clone(&connector)).with_sink(sink.clone());
        (connector, sink, use_case)
    }

    // ==================== Scenarios ====================

    #[tokio::test(start_paused = true)]
    async fn scenario_a_counts_progress_as_relays_finish() {
        let (connector, sink, use_case) = run(MockConnector::default()
            .with(R1, Script::frames(vec![event("a"), event("b"), eose()]))
            .with(
                R2,
                Script::frames(vec![event("b"), event("c"), eose()])
                    .delayed(Duration::from_secs(1)),
            ));

        let report = use_case.execute(input(&[R1, R2])).await;

        assert_eq!(sink.values(), vec![2, 3]);
        assert_eq!(report.count, 3);
        assert_eq!(report.published, Some(3));
        assert_eq!(report.completed(), 2);
        assert_eq!(connector.closes(R1), 1);
        assert_eq!(connector.closes(R2), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_b_failed_relay_is_tolerated() {
        let (_connector, sink, use_case) = run(MockConnector::default()
            .with(R1, Script::refused())
            .with(R2, Script::frames(vec![event("x"), eose()])));

        let report = use_case.execute(input(&[R1, R2])).await;

        assert_eq!(sink.values().last(), Some(&1));
        assert!(sink.values().iter().all(|&v| v == 1));
        assert_eq!(report.published, Some(1));
        assert_eq!(report.endpoints[0].outcome, Some(DoneReason::ConnectFailed));
        assert_eq!(
            report.endpoints[1].outcome,
            Some(DoneReason::EndOfStoredEvents)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_c_silent_relays_time_out_without_publishing() {
        let (connector, sink, use_case) = run(MockConnector::default()
            .with(R1, Script::silent())
            .with(R2, Script::silent()));

        let start = Instant::now();
        let params = FetchParams::default();
        let report = use_case
            .execute(input(&[R1, R2]).with_params(params.clone()))
            .await;
        let elapsed = start.elapsed();

        assert!(sink.values().is_empty());
        assert_eq!(report.published, None);
        assert!(
            report
                .endpoints
                .iter()
                .all(|e| e.outcome == Some(DoneReason::TimedOut))
        );
        assert!(elapsed >= params.timeout);
        assert!(elapsed <= params.timeout + CLOSE_GRACE);
        assert_eq!(connector.closes(R1), 1);
        assert_eq!(connector.closes(R2), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_d_foreign_label_ignored() {
        let (_connector, sink, use_case) = run(MockConnector::default().with(
            R1,
            Script::frames(vec![
                r#"["EVENT","someone-else",{"pubkey":"z"}]"#.to_string(),
                eose(),
            ]),
        ));

        let report = use_case.execute(input(&[R1])).await;

        assert_eq!(report.count, 0);
        assert!(sink.values().is_empty());
        assert_eq!(report.endpoints[0].events, 0);
    }

    // ==================== Edge cases ====================

    #[tokio::test(start_paused = true)]
    async fn test_timeout_bounds_every_endpoint_behavior() {
        let (_connector, _sink, use_case) = run(MockConnector::default()
            .with(R1, Script::frames(vec![event("a")]))
            .with(R2, Script::silent().delayed(Duration::from_secs(60))));

        let start = Instant::now();
        let report = use_case
            .execute(input(&[R1, R2]).with_params(FetchParams::default().with_timeout_seconds(3)))
            .await;

        assert!(start.elapsed() <= Duration::from_secs(3) + CLOSE_GRACE);
        assert_eq!(report.count, 1);
        assert_eq!(report.published, Some(1));
        assert_eq!(report.failed(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remote_close_and_error_end_endpoint() {
        let (_connector, sink, use_case) = run(MockConnector::default()
            .with(R1, Script::frames(vec![event("a")]).then(After::Close))
            .with(R2, Script::frames(vec![event("b")]).then(After::Fail)));

        let start = Instant::now();
        let report = use_case.execute(input(&[R1, R2])).await;

        assert!(start.elapsed() < FetchParams::default().timeout);
        assert_eq!(report.endpoints[0].outcome, Some(DoneReason::Closed));
        assert_eq!(
            report.endpoints[1].outcome,
            Some(DoneReason::ConnectionError)
        );
        assert_eq!(sink.values().last(), Some(&2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicates_within_one_relay_collapse() {
        let (_connector, sink, use_case) = run(MockConnector::default().with(
            R1,
            Script::frames(vec![event("a"), event("a"), event("a"), eose()]),
        ));

        let report = use_case.execute(input(&[R1])).await;

        assert_eq!(report.count, 1);
        assert_eq!(report.endpoints[0].events, 3);
        assert_eq!(report.endpoints[0].contributed, 1);
        assert_eq!(sink.values(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_frames_are_skipped() {
        let (_connector, _sink, use_case) = run(MockConnector::default().with(
            R1,
            Script::frames(vec![
                "garbage".to_string(),
                r#"["EVENT","followers",{"kind":3}]"#.to_string(),
                event("ok"),
                eose(),
            ]),
        ));

        let report = use_case.execute(input(&[R1])).await;
        assert_eq!(report.count, 1);
        assert_eq!(
            report.endpoints[0].outcome,
            Some(DoneReason::EndOfStoredEvents)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_sends_one_req_per_endpoint() {
        let (connector, _sink, use_case) = run(MockConnector::default()
            .with(R1, Script::frames(vec![eose()]))
            .with(R2, Script::frames(vec![eose()])));

        use_case.execute(input(&[R1, R2])).await;

        let sent = connector.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 2);
        for frame in sent {
            let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
            assert_eq!(
                value,
                json!(["REQ", "followers", {"kinds": [3], "#p": ["subject"]}])
            );
        }
    }

    #[tokio::test]
    async fn test_zero_endpoints_is_a_noop() {
        let (_connector, sink, use_case) = run(MockConnector::default());
        let report = use_case.execute(input(&[])).await;
        assert!(report.endpoints.is_empty());
        assert_eq!(report.published, None);
        assert!(sink.values().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_logger_records_lifecycle() {
        let connector = Arc::new(
            MockConnector::default().with(R1, Script::frames(vec![event("a"), eose()])),
        );
        let logger = Arc::new(RecordingLogger::default());
        let use_case = FetchCountUseCase::new(connector).with_logger(logger.clone());

        use_case.execute(input(&[R1])).await;

        let types = logger.types.lock().unwrap().clone();
        assert_eq!(
            types,
            vec![
                "fetch_start",
                "endpoint_opened",
                "contributor_added",
                "endpoint_done",
                "count_published",
                "fetch_complete",
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_start_reports_timeout_in_millis() {
        let logger = Arc::new(RecordingLogger::default());
        let use_case =
            FetchCountUseCase::new(Arc::new(MockConnector::default())).with_logger(logger.clone());

        use_case.execute(input(&[])).await;
        let huge = input(&[]).with_params(FetchParams::default().with_timeout(Duration::MAX));
        use_case.execute(huge).await;

        let payloads = logger.payloads.lock().unwrap().clone();
        let starts: Vec<_> = payloads
            .iter()
            .filter(|p| p.get("timeout_ms").is_some())
            .collect();
        assert_eq!(starts.len(), 2);
        assert_eq!(starts[0]["timeout_ms"], 10_000);
        // Saturates instead of wrapping
        assert_eq!(starts[1]["timeout_ms"], u64::MAX);
    }

    #[test]
    fn test_blank_subject_rejected() {
        let err = FetchCountInput::new("  ", vec![Endpoint::new(R1)]).unwrap_err();
        assert!(matches!(
            err,
            FetchCountError::InvalidTarget(DomainError::EmptySubject)
        ));
    }
}
