//! Transport wrapper that keeps at most one request open at a time.
//!
//! rmcp dispatches every incoming request on its own task and writes responses as they complete.
//! `SequentialTransport` withholds the next inbound message until the response to the open
//! request has been written, so requests are answered in arrival order.

use rmcp::RoleServer;
use rmcp::model::{JsonRpcMessage, RequestId};
use rmcp::service::{RxJsonRpcMessage, TxJsonRpcMessage};
use rmcp::transport::Transport;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

type OpenRequest = Arc<Mutex<Option<(RequestId, OwnedSemaphorePermit)>>>;

pub struct SequentialTransport<T> {
    inner: T,
    turn: Arc<Semaphore>,
    open: OpenRequest,
}

impl<T> SequentialTransport<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            turn: Arc::new(Semaphore::new(1)),
            open: Arc::new(Mutex::new(None)),
        }
    }
}

impl<T> Transport<RoleServer> for SequentialTransport<T>
where
    T: Transport<RoleServer>,
{
    type Error = T::Error;

    fn send(
        &mut self,
        item: TxJsonRpcMessage<RoleServer>,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'static {
        let answered = match &item {
            JsonRpcMessage::Response(response) => Some(response.id.clone()),
            JsonRpcMessage::Error(error) => Some(error.id.clone()),
            _ => None,
        };
        let open = Arc::clone(&self.open);
        let send = self.inner.send(item);
        async move {
            let result = send.await;
            // Released even when the write failed; the peer is gone either way.
            if let Some(id) = answered {
                release(&open, &id);
            }
            result
        }
    }

    async fn receive(&mut self) -> Option<RxJsonRpcMessage<RoleServer>> {
        // Taken before reading so a cancelled receive never swallows a message.
        let permit = Arc::clone(&self.turn).acquire_owned().await.ok()?;
        let message = self.inner.receive().await?;
        if let JsonRpcMessage::Request(request) = &message {
            trace!(id = %request.id, "request opened");
            *self.open.lock().unwrap_or_else(PoisonError::into_inner) =
                Some((request.id.clone(), permit));
        }
        Some(message)
    }

    async fn close(&mut self) -> Result<(), Self::Error> {
        self.turn.close();
        self.inner.close().await
    }
}

fn release(open: &Mutex<Option<(RequestId, OwnedSemaphorePermit)>>, id: &RequestId) {
    let mut open = open.lock().unwrap_or_else(PoisonError::into_inner);
    if open.as_ref().is_some_and(|(pending, _)| pending == id) {
        trace!(%id, "request answered");
        *open = None;
    }
}

#[cfg(test)]
mod tests {
    use super::SequentialTransport;
    use rmcp::model::{JsonRpcMessage, NumberOrString, ServerJsonRpcMessage, ServerResult};
    use rmcp::transport::Transport;
    use rmcp::transport::async_rw::AsyncRwTransport;
    use serde_json::json;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader};

    fn response(id: i64) -> ServerJsonRpcMessage {
        JsonRpcMessage::response(ServerResult::empty(()), NumberOrString::Number(id))
    }

    #[tokio::test]
    async fn next_message_waits_for_open_request_to_be_answered() {
        let (client_io, server_io) = tokio::io::duplex(4096);
        let (server_read, server_write) = tokio::io::split(server_io);
        let (client_read, mut client_write) = tokio::io::split(client_io);
        let mut transport =
            SequentialTransport::new(AsyncRwTransport::new_server(server_read, server_write));

        for id in [1, 2] {
            let line = json!({"jsonrpc": "2.0", "id": id, "method": "ping"}).to_string();
            client_write
                .write_all(format!("{line}\n").as_bytes())
                .await
                .expect("write request");
        }
        client_write.flush().await.expect("flush");

        let first = transport.receive().await.expect("first request");
        assert!(matches!(first, JsonRpcMessage::Request(_)));

        let held = tokio::time::timeout(Duration::from_millis(200), transport.receive()).await;
        assert!(held.is_err(), "second request surfaced before the first was answered");

        transport.send(response(1)).await.expect("send response");
        let second = tokio::time::timeout(Duration::from_secs(5), transport.receive())
            .await
            .expect("second request released")
            .expect("second request");
        assert!(matches!(second, JsonRpcMessage::Request(_)));

        let mut lines = BufReader::new(client_read).lines();
        let written = lines.next_line().await.expect("read").expect("response line");
        let written: serde_json::Value = serde_json::from_str(&written).expect("json");
        assert_eq!(written["id"], 1);
    }

    #[tokio::test]
    async fn answer_to_another_id_keeps_request_open() {
        let (client_io, server_io) = tokio::io::duplex(4096);
        let (server_read, server_write) = tokio::io::split(server_io);
        let (_client_read, mut client_write) = tokio::io::split(client_io);
        let mut transport =
            SequentialTransport::new(AsyncRwTransport::new_server(server_read, server_write));

        for id in [1, 2] {
            let line = json!({"jsonrpc": "2.0", "id": id, "method": "ping"}).to_string();
            client_write
                .write_all(format!("{line}\n").as_bytes())
                .await
                .expect("write request");
        }
        client_write.flush().await.expect("flush");

        transport.receive().await.expect("first request");
        transport.send(response(9)).await.expect("send response");
        let held = tokio::time::timeout(Duration::from_millis(200), transport.receive()).await;
        assert!(held.is_err());
    }
}
