// Copyright 2025 HEM Sp. z o.o.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::select;
use tokio::sync::mpsc;

use crate::command::Command;
use crate::connection::{Connection, ConnectionEvent, ConnectionEvents, ConnectionFactory, ConnectionState};
use crate::errors::ConnectionError;
use crate::service::{spawn_service, ServiceHandle, StopHandle};

pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_secs(2);

/// Longest line accepted from vMix, terminator included. A longer line fails the connection.
pub const MAX_LINE_LEN: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpConnectionOptions {
    /// Delay between connection attempts. `None` gives up after the first failure or close.
    pub reconnect_interval: Option<Duration>,
}

impl Default for TcpConnectionOptions {
    fn default() -> Self {
        Self { reconnect_interval: Some(DEFAULT_RECONNECT_INTERVAL) }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TcpConnector {
    options: TcpConnectionOptions,
}

impl TcpConnector {
    pub fn new(options: TcpConnectionOptions) -> Self {
        Self { options }
    }
}

impl ConnectionFactory for TcpConnector {
    fn connect(&self, host: &str, port: u16) -> (Box<dyn Connection>, ConnectionEvents) {
        let (connection, events) = TcpConnection::open(host, port, self.options.clone());
        (Box::new(connection), events)
    }
}

struct Shared {
    writer: tokio::sync::Mutex<Option<OwnedWriteHalf>>,
    connected: AtomicBool,
}

impl Shared {
    async fn clear(&self) {
        self.connected.store(false, Ordering::SeqCst);
        if let Some(mut writer) = self.writer.lock().await.take() {
            let _ = writer.shutdown().await;
        }
    }
}

/// Line oriented TCP client with automatic reconnect.
///
/// Must be opened from within a Tokio runtime. Dropping the connection stops the socket task.
pub struct TcpConnection {
    shared: Arc<Shared>,
    task: Mutex<Option<ServiceHandle>>,
}

impl TcpConnection {
    pub fn open(host: &str, port: u16, options: TcpConnectionOptions) -> (Self, ConnectionEvents) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            writer: tokio::sync::Mutex::new(None),
            connected: AtomicBool::new(false),
        });
        let host = host.to_string();
        let task_shared = shared.clone();
        let task = spawn_service(move |stop| run_socket(host, port, options, task_shared, events_tx, stop));
        let connection = Self { shared, task: Mutex::new(Some(task)) };
        (connection, events_rx)
    }
}

#[async_trait]
impl Connection for TcpConnection {
    async fn send(&self, command: &Command) -> Result<(), ConnectionError> {
        let mut writer = self.shared.writer.lock().await;
        let Some(writer) = writer.as_mut() else {
            return Err(ConnectionError::NotConnected);
        };
        writer.write_all(command.to_wire().as_bytes()).await?;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }

    async fn disconnect(&self) {
        let task = self.task.lock().ok().and_then(|mut task| task.take());
        if let Some(task) = task {
            if let Err(e) = task.shutdown().await {
                warn!("Socket task ended abnormally: {}", e);
            }
        }
        self.shared.clear().await;
    }
}

enum ReadOutcome {
    Stopped,
    Closed,
    Failed(std::io::Error),
}

async fn run_socket(
    host: String,
    port: u16,
    options: TcpConnectionOptions,
    shared: Arc<Shared>,
    events: mpsc::UnboundedSender<ConnectionEvent>,
    mut stop: StopHandle,
) {
    loop {
        if events.is_closed() {
            break;
        }
        let _ = events.send(ConnectionEvent::StatusChanged {
            state: ConnectionState::Connecting,
            message: None,
        });

        let attempt = select! {
            biased;
            _ = stop.signaled() => break,
            res = TcpStream::connect((host.as_str(), port)) => res,
        };

        match attempt {
            Ok(stream) => {
                info!("Connected to {}:{}", host, port);
                let (read_half, write_half) = stream.into_split();
                *shared.writer.lock().await = Some(write_half);
                shared.connected.store(true, Ordering::SeqCst);
                let _ = events.send(ConnectionEvent::Connected);

                let outcome = read_lines(read_half, &events, &mut stop).await;
                shared.clear().await;
                let message = match outcome {
                    ReadOutcome::Stopped => break,
                    ReadOutcome::Closed => "Connection closed".to_string(),
                    ReadOutcome::Failed(e) => {
                        let _ = events.send(ConnectionEvent::Error(e.to_string()));
                        e.to_string()
                    }
                };
                info!("Disconnected from {}:{}: {}", host, port, message);
                let _ = events.send(ConnectionEvent::StatusChanged {
                    state: ConnectionState::Disconnected,
                    message: Some(message),
                });
            }
            Err(e) => {
                debug!("Connection to {}:{} failed: {}", host, port, e);
                let _ = events.send(ConnectionEvent::Error(e.to_string()));
            }
        }

        let Some(interval) = options.reconnect_interval else {
            break;
        };
        select! {
            biased;
            _ = stop.signaled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    shared.clear().await;
    debug!("Socket task for {}:{} stopped", host, port);
}

async fn read_lines(
    read_half: OwnedReadHalf,
    events: &mpsc::UnboundedSender<ConnectionEvent>,
    stop: &mut StopHandle,
) -> ReadOutcome {
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let mut limited = (&mut reader).take(MAX_LINE_LEN as u64);
        let read = select! {
            biased;
            _ = stop.signaled() => return ReadOutcome::Stopped,
            res = limited.read_until(b'\n', &mut buf) => res,
        };
        match read {
            Ok(0) => return ReadOutcome::Closed,
            Ok(n) if n == MAX_LINE_LEN && buf.last() != Some(&b'\n') => {
                warn!("Line exceeds {} bytes, dropping connection", MAX_LINE_LEN);
                return ReadOutcome::Failed(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("line exceeds {} bytes", MAX_LINE_LEN),
                ));
            }
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf).into_owned();
                if events.send(ConnectionEvent::Data(line)).is_err() {
                    return ReadOutcome::Stopped;
                }
            }
            Err(e) => return ReadOutcome::Failed(e),
        }
    }
}
