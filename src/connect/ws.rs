// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Thetis-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Thetis and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Websocket transport for the compile session.
//!
//! Wire surface kept deliberately small: one `session/open` hello carrying
//! the document identity, then a read loop that only watches for the
//! server's out-of-band restart notice. Everything else on the wire belongs
//! to the compile server and is ignored here.

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::{ConnectError, RestartNotice, SessionTransport};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const OPEN_METHOD: &str = "session/open";
const SERVER_RESTARTED_METHOD: &str = "serverRestarted";

#[derive(Debug, Serialize)]
struct ClientHello<'a> {
    method: &'a str,
    uri: &'a str,
}

#[derive(Debug, Deserialize)]
struct ServerNotice {
    method: String,
}

fn is_restart_notice(text: &str) -> bool {
    serde_json::from_str::<ServerNotice>(text)
        .map(|notice| notice.method == SERVER_RESTARTED_METHOD)
        .unwrap_or(false)
}

/// Transport on `tokio-tungstenite`, one socket per open session.
#[derive(Debug)]
pub struct WsTransport {
    endpoint: String,
    writer: Option<SplitSink<WsStream, Message>>,
    reader: Option<JoinHandle<()>>,
}

impl WsTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), writer: None, reader: None }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SessionTransport for WsTransport {
    async fn open(&mut self, identity: &str, notice: RestartNotice) -> Result<(), ConnectError> {
        let (socket, _) = connect_async(self.endpoint.as_str())
            .await
            .map_err(|err| ConnectError::transport(err.to_string()))?;
        let (mut writer, mut reader) = socket.split();

        let hello = ClientHello { method: OPEN_METHOD, uri: identity };
        let hello = serde_json::to_string(&hello)
            .map_err(|err| ConnectError::transport(err.to_string()))?;
        writer
            .send(Message::Text(hello))
            .await
            .map_err(|err| ConnectError::transport(err.to_string()))?;

        let handle = tokio::spawn(async move {
            while let Some(message) = reader.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        if is_restart_notice(&text) {
                            notice.raise();
                        }
                    }
                    Ok(Message::Close(_)) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        });

        self.writer = Some(writer);
        self.reader = Some(handle);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ConnectError> {
        // Best effort: a dead peer must not keep teardown from completing.
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.send(Message::Close(None)).await;
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        Ok(())
    }
}
