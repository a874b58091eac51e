//! Panel-facing request server.
//!
//! Requests are queued and served one at a time: the shared slot is a
//! single-writer handoff area, so a full round trip must finish (or time
//! out) before the next one touches it. Each request carries its own
//! correlation ID and reply channel, so overlapping panel ticks cannot
//! race each other's responses.

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use logsieve_protocol::{ClearResponse, DumpResponse, PanelRequest};

use crate::error::BridgeError;
use crate::relay::Relay;

/// A response matched to one [`PanelRequest`].
#[derive(Debug)]
pub enum BridgeResponse {
    Logs(DumpResponse),
    Cleared(ClearResponse),
}

struct Envelope {
    id: String,
    request: PanelRequest,
    reply: oneshot::Sender<BridgeResponse>,
}

/// Cloneable handle the panel holds to reach the bridge.
#[derive(Clone)]
pub struct BridgeHandle {
    tx: mpsc::Sender<Envelope>,
}

impl BridgeHandle {
    pub async fn get_logs(&self) -> Result<DumpResponse, BridgeError> {
        match self.request(PanelRequest::GetLogs).await? {
            BridgeResponse::Logs(resp) => Ok(resp),
            BridgeResponse::Cleared(_) => Err(BridgeError::MismatchedResponse),
        }
    }

    pub async fn clear_logs(&self) -> Result<ClearResponse, BridgeError> {
        match self.request(PanelRequest::ClearLogs).await? {
            BridgeResponse::Cleared(resp) => Ok(resp),
            BridgeResponse::Logs(_) => Err(BridgeError::MismatchedResponse),
        }
    }

    async fn request(&self, request: PanelRequest) -> Result<BridgeResponse, BridgeError> {
        let id = uuid::Uuid::new_v4().to_string();
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                id: id.clone(),
                request,
                reply,
            })
            .await
            .map_err(|_| BridgeError::Unreachable)?;
        debug!(request = %id, ?request, "bridge request queued");
        rx.await.map_err(|_| BridgeError::Unreachable)
    }
}

/// Spawns the serving task for a relay.
pub fn spawn(relay: Relay, cancel: CancellationToken) -> (BridgeHandle, tokio::task::JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<Envelope>(64);
    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                envelope = rx.recv() => {
                    let Some(envelope) = envelope else { break };
                    let response = match envelope.request {
                        PanelRequest::GetLogs => BridgeResponse::Logs(relay.get_logs().await),
                        PanelRequest::ClearLogs => {
                            BridgeResponse::Cleared(relay.clear_logs().await)
                        }
                    };
                    debug!(request = %envelope.id, "bridge request served");
                    // A caller that went away discards its response
                    // harmlessly.
                    let _ = envelope.reply.send(response);
                }
            }
        }
    });
    (BridgeHandle { tx }, task)
}
