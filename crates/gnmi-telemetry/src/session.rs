//! Subscription session.
//!
//! A [`GnmiClient`] owns one counter and at most one long-lived Subscribe
//! stream. `register_once` runs a private ONCE call to completion and returns
//! its outcome. `register_stream` starts a background receive task on first
//! use and layers every further subscription onto the same stream; results
//! are delivered through the success and failure handlers.
//!
//! All mutation of the stream writer, cancellation token and receive task
//! happens under one session lock. The receive task takes that lock only for
//! its terminal section, never around a read, so `close()` can always
//! interrupt a blocked read.

use crate::counter::Counter;
use crate::decode::check_response;
use crate::error::{DecodeError, SessionError, SessionResult};
use crate::pbr::PBR_TAG;
use crate::request::{build_subscribe_request, describe_subscribe_request, RpcArgs, StreamMode};
use crate::transport::{CallMetadata, ResponseStream, SubscribeTransport};
use futures::StreamExt;
use parking_lot::{Mutex, RwLock};
use sonic_gnmi_proto::gnmi::{SubscribeRequest, SubscribeResponse};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tonic::{Code, Status};
use tracing::{debug, error, info, warn};

/// Depth of the request queue of a long-lived stream.
const REQUEST_QUEUE_DEPTH: usize = 16;

/// Invoked with the terminal status when a stream fails.
pub type RpcFailedHandler = Arc<dyn Fn(Status) + Send + Sync>;

/// Invoked with the whole counter after every accepted record.
pub type RpcSuccessHandler<C> = Arc<dyn Fn(&C) + Send + Sync>;

/// Lifecycle of the long-lived stream of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No stream was ever started.
    Idle,
    /// A receive task was started and `close()` has not been called. The
    /// stream itself may already have ended.
    StreamActive,
    /// `close()` tore the stream down. Behaves like `Idle`.
    Closed,
}

struct StreamState {
    writer: Option<mpsc::Sender<SubscribeRequest>>,
    cancel: Option<CancellationToken>,
    receive_task: Option<JoinHandle<()>>,
    final_status: Option<Status>,
    phase: SessionState,
    /// Bumped for every receive task started. A task only touches the
    /// writer and terminal status while it is still the current one.
    generation: u64,
}

struct Shared<C: Counter> {
    transport: Arc<dyn SubscribeTransport>,
    counter: Arc<Mutex<C>>,
    on_rpc_failed: RwLock<Option<RpcFailedHandler>>,
    on_rpc_success: RwLock<Option<RpcSuccessHandler<C>>>,
    stream: tokio::sync::Mutex<StreamState>,
}

/// gNMI subscription client bound to one counter.
pub struct GnmiClient<C: Counter> {
    shared: Arc<Shared<C>>,
    shutdown: CancellationToken,
}

impl<C: Counter> GnmiClient<C> {
    /// Creates an idle session.
    pub fn new(transport: Arc<dyn SubscribeTransport>, counter: C) -> Self {
        Self {
            shared: Arc::new(Shared {
                transport,
                counter: Arc::new(Mutex::new(counter)),
                on_rpc_failed: RwLock::new(None),
                on_rpc_success: RwLock::new(None),
                stream: tokio::sync::Mutex::new(StreamState {
                    writer: None,
                    cancel: None,
                    receive_task: None,
                    final_status: None,
                    phase: SessionState::Idle,
                    generation: 0,
                }),
            }),
            shutdown: CancellationToken::new(),
        }
    }

    /// Sets the handler called when the stream ends with a non-OK status.
    ///
    /// Not called for the cancellation caused by `close()`.
    pub fn set_rpc_failed_handler<F>(&self, handler: F)
    where
        F: Fn(Status) + Send + Sync + 'static,
    {
        *self.shared.on_rpc_failed.write() = Some(Arc::new(handler));
    }

    /// Sets the handler called after every record appended in stream mode.
    ///
    /// Runs on the receive task with the counter locked. It must not lock
    /// the counter itself.
    pub fn set_rpc_success_handler<F>(&self, handler: F)
    where
        F: Fn(&C) + Send + Sync + 'static,
    {
        *self.shared.on_rpc_success.write() = Some(Arc::new(handler));
    }

    /// Shared handle to the bound counter.
    pub fn counter(&self) -> Arc<Mutex<C>> {
        Arc::clone(&self.shared.counter)
    }

    /// Snapshot of the records accumulated so far.
    pub fn stats(&self) -> Vec<C::Stat> {
        self.shared.counter.lock().stats().to_vec()
    }

    /// Current lifecycle state of the session stream.
    pub async fn state(&self) -> SessionState {
        self.shared.stream.lock().await.phase
    }

    /// Validates the session and builds the request. No I/O.
    fn prepare(
        &self,
        call: &CallMetadata,
        args: &RpcArgs,
        mode: StreamMode,
    ) -> SessionResult<SubscribeRequest> {
        let paths = {
            let counter = self.shared.counter.lock();
            if counter.tag() != PBR_TAG {
                error!(tag = counter.tag(), "Unsupported counter bound to the gNMI client");
                return Err(SessionError::client_type(format!(
                    "unsupported counter tag '{}'",
                    counter.tag()
                )));
            }
            counter.subscription_paths()
        };

        if !call.has_credentials() {
            error!("Username or password missing from the client context");
            return Err(SessionError::client_type("missing username or password"));
        }

        let args = RpcArgs {
            mode,
            ..args.clone()
        };
        let request = build_subscribe_request(&args, &paths)
            .map_err(|e| SessionError::client_type(format!("cannot build subscribe request: {e}")))?;
        debug!("{}", describe_subscribe_request(&request));
        Ok(request)
    }

    /// Runs one ONCE subscription to completion.
    ///
    /// Every decodable response is accumulated into the counter. Responses
    /// that fail to decode are logged and skipped. Returns `Ok` when the RPC
    /// finished with an OK status.
    pub async fn register_once(&self, call: &CallMetadata, args: &RpcArgs) -> SessionResult<()> {
        let request = self.prepare(call, args, StreamMode::Once)?;

        let (writer, requests) = mpsc::channel(1);
        writer
            .try_send(request)
            .map_err(|_| SessionError::WritesFailed)?;

        let deadline = call.timeout.map(|t| Instant::now() + t);
        let cancel = self.shutdown.child_token();
        let status = match self.shared.transport.subscribe(call, requests).await {
            Err(status) => status,
            Ok(mut responses) => loop {
                match read_next(&mut responses, deadline, &cancel).await {
                    Ok(response) => {
                        accept_response(&mut *self.shared.counter.lock(), &response);
                    }
                    Err(status) => break status,
                }
            },
        };
        drop(writer);

        if status.code() == Code::Ok {
            info!("Subscribe once finished");
            Ok(())
        } else {
            error!(code = ?status.code(), message = status.message(), "Subscribe once failed");
            Err(SessionError::RpcFailure(status))
        }
    }

    /// Adds this counter's subscriptions to the session stream.
    ///
    /// Starts the stream and its receive task if none is running. Returns
    /// `WritesFailed` when the request cannot be queued and `RpcFailure`
    /// with the recorded terminal status when the stream already ended.
    pub async fn register_stream(&self, call: &CallMetadata, args: &RpcArgs) -> SessionResult<()> {
        let request = self.prepare(call, args, StreamMode::Stream)?;

        let mut state = self.shared.stream.lock().await;
        if state.receive_task.is_none() {
            let cancel = self.shutdown.child_token();
            let (writer, requests) = mpsc::channel(REQUEST_QUEUE_DEPTH);
            state.generation += 1;
            let task = tokio::spawn(receive_loop(
                Arc::clone(&self.shared),
                call.clone(),
                requests,
                cancel.clone(),
                state.generation,
            ));
            state.writer = Some(writer);
            state.cancel = Some(cancel);
            state.receive_task = Some(task);
            state.final_status = None;
            state.phase = SessionState::StreamActive;
            info!("Started subscribe stream");
        }

        let Some(writer) = state.writer.as_ref() else {
            let status = state
                .final_status
                .clone()
                .unwrap_or_else(|| Status::aborted("subscribe stream already closed"));
            warn!(code = ?status.code(), "Subscribe stream already torn down");
            return Err(SessionError::RpcFailure(status));
        };
        writer.try_send(request).map_err(|e| {
            error!(error = %e, "Failed to write subscribe request");
            SessionError::WritesFailed
        })
    }

    /// Tears down the long-lived stream and waits for the receive task.
    ///
    /// Idempotent. Returns `Ok` on an idle session.
    pub async fn close(&self) -> SessionResult<()> {
        let task = {
            let mut state = self.shared.stream.lock().await;
            if let Some(cancel) = state.cancel.take() {
                cancel.cancel();
            }
            state.writer = None;
            state.receive_task.take()
        };

        let Some(task) = task else {
            return Ok(());
        };
        if let Err(e) = task.await {
            if e.is_panic() {
                error!("Subscribe receive task panicked");
            }
        }

        // A register_stream that ran while we waited owns the slot now.
        let mut state = self.shared.stream.lock().await;
        if state.receive_task.is_none() {
            state.phase = SessionState::Closed;
        }
        info!("Subscribe stream closed");
        Ok(())
    }
}

impl<C: Counter> Drop for GnmiClient<C> {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Reads the next response. Stream end, cancellation and the deadline all
/// surface as the terminal status.
async fn read_next(
    responses: &mut ResponseStream,
    deadline: Option<Instant>,
    cancel: &CancellationToken,
) -> Result<SubscribeResponse, Status> {
    let expired = async {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        _ = cancel.cancelled() => Err(Status::cancelled("subscribe cancelled by client")),
        _ = expired => Err(Status::deadline_exceeded("subscribe deadline exceeded")),
        next = responses.next() => match next {
            Some(result) => result,
            None => Err(Status::new(Code::Ok, "")),
        },
    }
}

/// Decodes one response into the counter. Returns true when a record was
/// appended.
fn accept_response<C: Counter>(counter: &mut C, response: &SubscribeResponse) -> bool {
    match check_response(response, &*counter) {
        Ok(stat) => {
            counter.accumulate(stat);
            true
        }
        Err(DecodeError::NoNotification) => false,
        Err(e) if e.is_fault() => {
            error!(error = %e, "Failed to decode subscribe response");
            false
        }
        Err(e) => {
            warn!(error = %e, "Skipping subscribe response");
            false
        }
    }
}

fn deliver<C: Counter>(shared: &Shared<C>, response: &SubscribeResponse) {
    let handler = shared.on_rpc_success.read().clone();
    let mut counter = shared.counter.lock();
    if accept_response(&mut *counter, response) {
        if let Some(handler) = handler {
            handler(&*counter);
        }
    }
}

async fn receive_loop<C: Counter>(
    shared: Arc<Shared<C>>,
    call: CallMetadata,
    requests: mpsc::Receiver<SubscribeRequest>,
    cancel: CancellationToken,
    generation: u64,
) {
    let deadline = call.timeout.map(|t| Instant::now() + t);
    let opened = tokio::select! {
        _ = cancel.cancelled() => Err(Status::cancelled("subscribe cancelled by client")),
        opened = shared.transport.subscribe(&call, requests) => opened,
    };

    let status = match opened {
        Err(status) => status,
        Ok(mut responses) => loop {
            match read_next(&mut responses, deadline, &cancel).await {
                Ok(response) => deliver(&shared, &response),
                Err(status) => break status,
            }
        },
    };

    let mut state = shared.stream.lock().await;
    if state.generation == generation {
        state.writer = None;
        state.final_status = Some(status.clone());
    }
    match status.code() {
        Code::Ok => info!("Subscribe stream finished"),
        Code::Cancelled => info!("Subscribe stream cancelled"),
        code => {
            error!(?code, message = status.message(), "Subscribe stream failed");
            let handler = shared.on_rpc_failed.read().clone();
            if let Some(handler) = handler {
                handler(status);
            }
        }
    }
    drop(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::FlatMap;
    use crate::error::{DecodeResult, ErrorCode, SessionResultExt};
    use crate::pbr::{PbrBasic, PbrKey};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Transport that must never be reached.
    #[derive(Default)]
    struct CountingTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SubscribeTransport for CountingTransport {
        async fn subscribe(
            &self,
            _call: &CallMetadata,
            _requests: mpsc::Receiver<SubscribeRequest>,
        ) -> Result<ResponseStream, Status> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Status::unavailable("no target"))
        }
    }

    struct OtherCounter;

    impl Counter for OtherCounter {
        type Stat = u64;

        fn tag(&self) -> &str {
            "qos"
        }
        fn path_origin(&self) -> &str {
            "origin"
        }
        fn subscription_paths(&self) -> Vec<String> {
            vec!["/qos".to_string()]
        }
        fn from_map(&self, _map: &FlatMap) -> DecodeResult<u64> {
            Ok(0)
        }
        fn accumulate(&mut self, _stat: u64) {}
        fn stats(&self) -> &[u64] {
            &[]
        }
    }

    fn pbr_client(transport: Arc<CountingTransport>) -> GnmiClient<PbrBasic> {
        GnmiClient::new(transport, PbrBasic::new(vec![PbrKey::new("P", "R")]))
    }

    #[tokio::test]
    async fn test_wrong_counter_tag_rejected() {
        let transport = Arc::new(CountingTransport::default());
        let client = GnmiClient::new(transport.clone(), OtherCounter);
        let call = CallMetadata::new("admin", "admin");

        let once = client.register_once(&call, &RpcArgs::default()).await;
        assert_eq!(once.to_code(), ErrorCode::ClientTypeFailure);
        let stream = client.register_stream(&call, &RpcArgs::default()).await;
        assert_eq!(stream.to_code(), ErrorCode::ClientTypeFailure);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert_eq!(client.state().await, SessionState::Idle);
    }

    #[tokio::test]
    async fn test_missing_password_rejected() {
        let transport = Arc::new(CountingTransport::default());
        let client = pbr_client(transport.clone());
        let call = CallMetadata::new("admin", "");

        let result = client.register_stream(&call, &RpcArgs::default()).await;
        assert!(matches!(result, Err(SessionError::ClientTypeFailure { .. })));
        assert!(result.unwrap_err().status().is_none());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unsupported_encoding_rejected() {
        let transport = Arc::new(CountingTransport::default());
        let client = pbr_client(transport.clone());
        let args = RpcArgs {
            encoding: sonic_gnmi_proto::gnmi::Encoding::Ascii,
            ..Default::default()
        };

        let result = client
            .register_once(&CallMetadata::new("admin", "admin"), &args)
            .await;
        assert_eq!(result.to_code(), ErrorCode::ClientTypeFailure);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_once_open_failure_is_rpc_failure() {
        let transport = Arc::new(CountingTransport::default());
        let client = pbr_client(transport.clone());

        let err = client
            .register_once(&CallMetadata::new("admin", "admin"), &RpcArgs::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_code(), ErrorCode::RpcFailure);
        assert_eq!(err.status().map(Status::code), Some(Code::Unavailable));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.state().await, SessionState::Idle);
    }

    #[tokio::test]
    async fn test_close_idle_session() {
        let client = pbr_client(Arc::new(CountingTransport::default()));
        assert!(client.close().await.is_ok());
        assert!(client.close().await.is_ok());
        assert_eq!(client.state().await, SessionState::Idle);
    }

    #[tokio::test]
    async fn test_stream_open_failure_reported_to_handler() {
        let transport = Arc::new(CountingTransport::default());
        let client = pbr_client(transport.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();
        client.set_rpc_failed_handler(move |status| {
            let _ = tx.send(status.code());
        });

        let call = CallMetadata::new("admin", "admin");
        client
            .register_stream(&call, &RpcArgs::default())
            .await
            .unwrap();
        assert_eq!(rx.recv().await, Some(Code::Unavailable));

        let err = client
            .register_stream(&call, &RpcArgs::default())
            .await
            .unwrap_err();
        assert_eq!(err.status().map(Status::code), Some(Code::Unavailable));
        assert_eq!(client.state().await, SessionState::StreamActive);

        client.close().await.unwrap();
        assert_eq!(client.state().await, SessionState::Closed);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }
}
