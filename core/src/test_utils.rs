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

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::command::Command;
use crate::connection::{Connection, ConnectionEvent, ConnectionEvents, ConnectionFactory};
use crate::errors::ConnectionError;
use crate::feedback::FeedbackKind;
use crate::host::{HostListener, InstanceStatus};

#[derive(Default)]
struct Counters {
    alive: AtomicUsize,
    max_alive: AtomicUsize,
    disconnects: AtomicUsize,
}

pub struct MockConnection {
    connected: AtomicBool,
    closed: AtomicBool,
    sent: Mutex<Vec<String>>,
    counters: Arc<Counters>,
}

impl MockConnection {
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Wire form of every command written while connected.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

struct MockConnectionRef(Arc<MockConnection>);

#[async_trait]
impl Connection for MockConnectionRef {
    async fn send(&self, command: &Command) -> Result<(), ConnectionError> {
        if !self.0.connected.load(Ordering::SeqCst) {
            return Err(ConnectionError::NotConnected);
        }
        self.0.sent.lock().unwrap().push(command.to_wire());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.0.connected.load(Ordering::SeqCst)
    }

    async fn disconnect(&self) {
        self.0.connected.store(false, Ordering::SeqCst);
        if !self.0.closed.swap(true, Ordering::SeqCst) {
            self.0.counters.alive.fetch_sub(1, Ordering::SeqCst);
            self.0.counters.disconnects.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Connection factory that records every connect and hands out in-memory connections.
#[derive(Default)]
pub struct MockConnector {
    counters: Arc<Counters>,
    connects: Mutex<Vec<String>>,
    connections: Mutex<Vec<Arc<MockConnection>>>,
    senders: Mutex<Vec<mpsc::UnboundedSender<ConnectionEvent>>>,
}

impl MockConnector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn connects(&self) -> Vec<String> {
        self.connects.lock().unwrap().clone()
    }

    pub fn disconnects(&self) -> usize {
        self.counters.disconnects.load(Ordering::SeqCst)
    }

    pub fn alive(&self) -> usize {
        self.counters.alive.load(Ordering::SeqCst)
    }

    pub fn max_alive(&self) -> usize {
        self.counters.max_alive.load(Ordering::SeqCst)
    }

    pub fn connection(&self, index: usize) -> Arc<MockConnection> {
        self.connections.lock().unwrap()[index].clone()
    }

    /// Push an event into the stream of the `index`-th connection. Ignored once the adapter dropped it.
    pub fn emit(&self, index: usize, event: ConnectionEvent) {
        let _ = self.senders.lock().unwrap()[index].send(event);
    }
}

impl ConnectionFactory for MockConnector {
    fn connect(&self, host: &str, port: u16) -> (Box<dyn Connection>, ConnectionEvents) {
        self.connects.lock().unwrap().push(format!("{}:{}", host, port));
        let alive = self.counters.alive.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_alive.fetch_max(alive, Ordering::SeqCst);

        let connection = Arc::new(MockConnection {
            connected: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            sent: Mutex::new(Vec::new()),
            counters: self.counters.clone(),
        });
        self.connections.lock().unwrap().push(connection.clone());

        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().unwrap().push(tx);
        (Box::new(MockConnectionRef(connection)), rx)
    }
}

#[derive(Default)]
pub struct RecordingListener {
    statuses: Mutex<Vec<(InstanceStatus, Option<String>)>>,
    invalidations: Mutex<Vec<Vec<FeedbackKind>>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn statuses(&self) -> Vec<(InstanceStatus, Option<String>)> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn invalidations(&self) -> Vec<Vec<FeedbackKind>> {
        self.invalidations.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostListener for RecordingListener {
    async fn on_status(&self, status: InstanceStatus, message: Option<String>) {
        self.statuses.lock().unwrap().push((status, message));
    }

    async fn on_feedbacks_invalidated(&self, kinds: Vec<FeedbackKind>) {
        self.invalidations.lock().unwrap().push(kinds);
    }
}
