//! Client for the generation backend
//!
//! Jobs are enqueued over HTTP; results arrive on a per-client WebSocket
//! channel. Text frames carry execution progress keyed by prompt id, with a
//! null node as the completion sentinel. Binary frames carry finished images
//! while the output node is executing.

use futures::StreamExt;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::generation::graph::OUTPUT_NODE;

/// Bytes of framing metadata preceding the PNG payload in binary frames
const BINARY_HEADER_LEN: usize = 8;

const ENQUEUE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct QueueResponse {
    prompt_id: String,
}

#[derive(Debug, Deserialize)]
struct StreamMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// What a frame did to the stream
#[derive(Debug, PartialEq)]
enum StreamEvent {
    Continue,
    Complete,
}

/// Protocol state while consuming one job's result channel: tracks the
/// executing node for the matching prompt id and accumulates the images the
/// output node emits.
struct StreamState {
    prompt_id: String,
    current_node: String,
    images: Vec<Vec<u8>>,
}

impl StreamState {
    fn new(prompt_id: String) -> Self {
        Self {
            prompt_id,
            current_node: String::new(),
            images: Vec::new(),
        }
    }

    fn handle_frame(&mut self, frame: Message) -> Result<StreamEvent> {
        match frame {
            Message::Text(text) => {
                let Ok(msg) = serde_json::from_str::<StreamMessage>(&text) else {
                    return Ok(StreamEvent::Continue);
                };
                if msg.kind != "executing" {
                    return Ok(StreamEvent::Continue);
                }
                if msg.data.get("prompt_id").and_then(Value::as_str)
                    != Some(self.prompt_id.as_str())
                {
                    return Ok(StreamEvent::Continue);
                }
                match msg.data.get("node").and_then(Value::as_str) {
                    Some(node) => {
                        self.current_node = node.to_string();
                        Ok(StreamEvent::Continue)
                    }
                    // Null node: execution complete
                    None => Ok(StreamEvent::Complete),
                }
            }
            Message::Binary(data) => {
                if self.current_node == OUTPUT_NODE && data.len() > BINARY_HEADER_LEN {
                    self.images.push(data[BINARY_HEADER_LEN..].to_vec());
                }
                Ok(StreamEvent::Continue)
            }
            Message::Close(_) => Err(Error::Backend(
                "WebSocket closed before execution completed".to_string(),
            )),
            _ => Ok(StreamEvent::Continue),
        }
    }

    fn into_images(self) -> Vec<Vec<u8>> {
        self.images
    }
}

/// Relay client: one HTTP client plus a process-lifetime correlation id
pub struct RelayClient {
    http: reqwest::Client,
    server_address: String,
    client_id: Uuid,
    timeout: Duration,
}

impl RelayClient {
    pub fn new(server_address: String, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(ENQUEUE_TIMEOUT)
            .build()
            .map_err(|e| Error::Backend(format!("HTTP client init failed: {e}")))?;

        Ok(Self {
            http,
            server_address,
            client_id: Uuid::new_v4(),
            timeout,
        })
    }

    /// Submit a prepared job graph and collect every image the backend
    /// streams back, bounded by the configured timeout.
    pub async fn run(&self, graph: &Value) -> Result<Vec<Vec<u8>>> {
        tokio::time::timeout(self.timeout, self.run_inner(graph))
            .await
            .map_err(|_| {
                Error::Backend(format!(
                    "Generation timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
    }

    async fn run_inner(&self, graph: &Value) -> Result<Vec<Vec<u8>>> {
        // Connect before enqueueing so no progress message is missed
        let ws_url = format!("ws://{}/ws?clientId={}", self.server_address, self.client_id);
        let (mut ws, _) = connect_async(ws_url.as_str())
            .await
            .map_err(|e| Error::Backend(format!("WebSocket connect failed: {e}")))?;

        let prompt_id = self.queue_prompt(graph).await?;
        debug!(%prompt_id, "job enqueued");

        let mut stream = StreamState::new(prompt_id);
        while let Some(frame) = ws.next().await {
            let frame =
                frame.map_err(|e| Error::Backend(format!("WebSocket stream failed: {e}")))?;
            if stream.handle_frame(frame)? == StreamEvent::Complete {
                let images = stream.into_images();
                debug!(count = images.len(), "result stream finished");
                return Ok(images);
            }
        }

        // Stream ended without the completion sentinel
        Err(Error::Backend(
            "WebSocket closed before execution completed".to_string(),
        ))
    }

    async fn queue_prompt(&self, graph: &Value) -> Result<String> {
        let url = format!("http://{}/prompt", self.server_address);
        let body = serde_json::json!({
            "prompt": graph,
            "client_id": self.client_id,
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Backend(format!("Enqueue failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Backend(format!(
                "Enqueue rejected with status {}",
                response.status()
            )));
        }

        let queued: QueueResponse = response
            .json()
            .await
            .map_err(|e| Error::Backend(format!("Malformed enqueue response: {e}")))?;
        Ok(queued.prompt_id)
    }
}
