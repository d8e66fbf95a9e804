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

//! Transport seam between the adapter and vMix.
//!
//! A [`ConnectionFactory`] opens a [`Connection`] together with the stream of
//! [`ConnectionEvent`]s it produces. The adapter owns at most one connection at a time.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::command::Command;
use crate::errors::ConnectionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Connecting or disconnected. Reaching the connected state is reported by
    /// [`ConnectionEvent::Connected`] alone.
    StatusChanged {
        state: ConnectionState,
        message: Option<String>,
    },
    Error(String),
    /// The socket is open and ready for writes.
    Connected,
    /// One received line, terminator included.
    Data(String),
}

pub type ConnectionEvents = mpsc::UnboundedReceiver<ConnectionEvent>;

#[async_trait]
pub trait Connection: Send + Sync {
    /// Write one command line. Fails with [`ConnectionError::NotConnected`] while the socket is down.
    async fn send(&self, command: &Command) -> Result<(), ConnectionError>;

    fn is_connected(&self) -> bool;

    /// Close the socket and stop any reconnect attempts. No events are emitted afterwards.
    async fn disconnect(&self);
}

pub trait ConnectionFactory: Send + Sync + 'static {
    /// Start connecting to `host:port`. Progress is reported on the returned event stream.
    fn connect(&self, host: &str, port: u16) -> (Box<dyn Connection>, ConnectionEvents);
}
