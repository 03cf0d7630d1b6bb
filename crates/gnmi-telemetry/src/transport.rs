//! Subscribe RPC transport.
//!
//! The session never talks to tonic directly. It hands a request channel and
//! call metadata to a [`SubscribeTransport`] and gets a response stream back.

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use sonic_gnmi_proto::gnmi::{SubscribeRequest, SubscribeResponse};
use sonic_gnmi_proto::GNmiClient;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::metadata::MetadataValue;
use tonic::transport::Channel;
use tonic::{Request, Status};

/// Responses of one Subscribe call.
pub type ResponseStream = BoxStream<'static, Result<SubscribeResponse, Status>>;

/// Per-call context attached to every Subscribe call.
#[derive(Clone, Default)]
pub struct CallMetadata {
    pub username: String,
    pub password: String,
    /// Deadline for the whole call. `None` means no deadline.
    pub timeout: Option<Duration>,
}

impl CallMetadata {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// True when both credentials are present.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl std::fmt::Debug for CallMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallMetadata")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Opens bidirectional Subscribe calls.
#[async_trait]
pub trait SubscribeTransport: Send + Sync {
    /// Starts a Subscribe call that sends everything received on `requests`.
    ///
    /// Dropping the sender half of `requests` half-closes the call.
    async fn subscribe(
        &self,
        call: &CallMetadata,
        requests: mpsc::Receiver<SubscribeRequest>,
    ) -> Result<ResponseStream, Status>;
}

/// [`SubscribeTransport`] over a tonic channel.
#[derive(Debug, Clone)]
pub struct TonicTransport {
    channel: Channel,
}

impl TonicTransport {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }
}

fn metadata_value(field: &str, value: &str) -> Result<MetadataValue<tonic::metadata::Ascii>, Status> {
    if !value.is_ascii() {
        return Err(Status::invalid_argument(format!(
            "{field} is not valid ASCII metadata"
        )));
    }
    MetadataValue::try_from(value)
        .map_err(|_| Status::invalid_argument(format!("{field} is not valid ASCII metadata")))
}

#[async_trait]
impl SubscribeTransport for TonicTransport {
    async fn subscribe(
        &self,
        call: &CallMetadata,
        requests: mpsc::Receiver<SubscribeRequest>,
    ) -> Result<ResponseStream, Status> {
        let mut request = Request::new(ReceiverStream::new(requests));
        request
            .metadata_mut()
            .insert("username", metadata_value("username", &call.username)?);
        request
            .metadata_mut()
            .insert("password", metadata_value("password", &call.password)?);
        if let Some(timeout) = call.timeout {
            request.set_timeout(timeout);
        }

        let mut client = GNmiClient::new(self.channel.clone());
        let response = client.subscribe(request).await?;
        Ok(response.into_inner().boxed())
    }
}
