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

//! Instance lifecycle: owns the single vMix connection, tracks tally, and dispatches actions.

use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::action::ActionRequest;
use crate::command::{Command, CommandEncoder};
use crate::config::AdapterConfig;
use crate::connection::{Connection, ConnectionEvent, ConnectionEvents, ConnectionFactory, ConnectionState};
use crate::errors::EncodingError;
use crate::feedback::{self, FeedbackKind, FeedbackRequest, FeedbackStyle};
use crate::host::{HostListener, InstanceStatus};
use crate::tally::TallyState;

/// What happened to an encoded action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Sent(Command),
    /// Encoded fine but not written because the socket is down.
    Dropped(Command),
}

pub struct Adapter<F: ConnectionFactory, L: HostListener> {
    factory: Arc<F>,
    listener: Arc<L>,
    config: AdapterConfig,
    connection: Option<Box<dyn Connection>>,
    events: Option<ConnectionEvents>,
    state: ConnectionState,
    tally: TallyState,
}

impl<F: ConnectionFactory, L: HostListener> Adapter<F, L> {
    pub fn new(factory: Arc<F>, listener: Arc<L>, config: AdapterConfig) -> Self {
        Self {
            factory,
            listener,
            config,
            connection: None,
            events: None,
            state: ConnectionState::Disconnected,
            tally: TallyState::new(),
        }
    }

    /// Open the first connection using the configuration given at construction.
    pub async fn init(&mut self) {
        self.reconnect().await;
    }

    /// Apply new settings. The previous connection is fully closed before a new one is opened.
    pub async fn update_config(&mut self, config: AdapterConfig) {
        info!("Applying configuration {}", config.address());
        self.config = config;
        self.reconnect().await;
    }

    async fn reconnect(&mut self) {
        self.teardown().await;

        if !self.config.has_host() {
            warn!("No host configured; staying disconnected");
            self.listener
                .on_status(InstanceStatus::Warning, Some("No host configured".to_string()))
                .await;
            return;
        }

        debug!("Connecting to {}", self.config.address());
        let (connection, events) = self.factory.connect(&self.config.host, self.config.port);
        self.connection = Some(connection);
        self.events = Some(events);
        self.state = ConnectionState::Connecting;
    }

    async fn teardown(&mut self) {
        // drop the receiver first so nothing from the old socket is processed afterwards
        self.events = None;
        if let Some(connection) = self.connection.take() {
            debug!("Closing connection");
            connection.disconnect().await;
        }
        self.state = ConnectionState::Disconnected;
    }

    /// Wait for the next event of the current connection.
    ///
    /// Pends forever while there is no connection, which keeps it usable as a `select!` branch.
    pub async fn next_event(&mut self) -> ConnectionEvent {
        loop {
            let Some(events) = self.events.as_mut() else {
                return std::future::pending().await;
            };
            match events.recv().await {
                Some(event) => return event,
                None => {
                    debug!("Connection event stream ended");
                    self.events = None;
                }
            }
        }
    }

    pub async fn handle_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected => {
                self.state = ConnectionState::Connected;
                self.listener.on_status(InstanceStatus::Ok, None).await;
                self.send(Command::subscribe_tally()).await;
            }
            ConnectionEvent::StatusChanged { state, message } => {
                self.state = state;
                let status = match state {
                    ConnectionState::Connected => InstanceStatus::Ok,
                    ConnectionState::Connecting => InstanceStatus::Unknown,
                    ConnectionState::Disconnected => InstanceStatus::Error,
                };
                self.listener.on_status(status, message).await;
            }
            ConnectionEvent::Error(message) => {
                error!("Network error: {}", message);
                self.listener.on_status(InstanceStatus::Error, Some(message)).await;
            }
            ConnectionEvent::Data(line) => self.on_data(&line).await,
        }
    }

    async fn on_data(&mut self, line: &str) {
        match self.tally.apply_update(line) {
            Some(changes) => {
                debug!("Tally for {} inputs, {} changed", self.tally.len(), changes.len());
                for change in &changes {
                    debug!("Input {} tally {:?} -> {:?}", change.input, change.previous, change.current);
                }
                self.listener
                    .on_feedbacks_invalidated(vec![FeedbackKind::InputPreview, FeedbackKind::InputLive])
                    .await;
            }
            None => debug!("Ignoring {:?}", line.trim_end()),
        }
    }

    /// Encode and send an action. Encoding failures are returned; transport failures are logged.
    pub async fn run_action(&mut self, request: &ActionRequest) -> Result<ActionOutcome, EncodingError> {
        let command = request
            .validate(self.config.input_addressing)
            .and_then(|()| CommandEncoder::encode_request(request))
            .inspect_err(|e| {
                error!("Cannot run action {}: {}", request.kind, e);
            })?;
        Ok(self.send(command).await)
    }

    async fn send(&self, command: Command) -> ActionOutcome {
        let Some(connection) = self.connection.as_ref().filter(|c| c.is_connected()) else {
            warn!("Socket not connected, dropping {}", command);
            return ActionOutcome::Dropped(command);
        };
        match connection.send(&command).await {
            Ok(()) => {
                debug!("Sent {}", command);
                ActionOutcome::Sent(command)
            }
            Err(e) => {
                warn!("{}, dropping {}", e, command);
                ActionOutcome::Dropped(command)
            }
        }
    }

    pub fn feedback(&self, request: &FeedbackRequest) -> Option<FeedbackStyle> {
        feedback::evaluate(&self.tally, request)
    }

    pub fn tally(&self) -> &TallyState {
        &self.tally
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Close the connection. The adapter can be revived with [`Adapter::update_config`].
    pub async fn destroy(&mut self) {
        self.teardown().await;
        info!("Adapter destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InputAddressing, DEFAULT_PORT};
    use crate::test_utils::{MockConnector, RecordingListener};

    fn build(config: AdapterConfig) -> (Adapter<MockConnector, RecordingListener>, Arc<MockConnector>, Arc<RecordingListener>) {
        let connector = MockConnector::new();
        let listener = RecordingListener::new();
        let adapter = Adapter::new(connector.clone(), listener.clone(), config);
        (adapter, connector, listener)
    }

    #[tokio::test]
    async fn reapplying_config_replaces_the_connection() {
        let (mut adapter, connector, _listener) = build(AdapterConfig::default());
        adapter.init().await;
        assert_eq!(connector.alive(), 1);

        adapter.update_config(AdapterConfig::default()).await;
        assert_eq!(connector.connects(), vec!["127.0.0.1:8099".to_string(); 2]);
        assert_eq!(connector.disconnects(), 1);
        assert_eq!(connector.alive(), 1);
        assert_eq!(connector.max_alive(), 1);
    }

    #[tokio::test]
    async fn blank_host_reports_warning_without_connecting() {
        let (mut adapter, connector, listener) = build(AdapterConfig::new("", DEFAULT_PORT));
        adapter.init().await;
        assert!(connector.connects().is_empty());
        assert_eq!(
            listener.statuses(),
            vec![(InstanceStatus::Warning, Some("No host configured".to_string()))]
        );
    }

    #[tokio::test]
    async fn subscribes_to_tally_on_every_connect() {
        let (mut adapter, connector, listener) = build(AdapterConfig::default());
        adapter.init().await;
        connector.connection(0).set_connected(true);
        adapter.handle_event(ConnectionEvent::Connected).await;
        adapter.handle_event(ConnectionEvent::Connected).await;

        assert_eq!(connector.connection(0).sent(), vec!["SUBSCRIBE TALLY\r\n".to_string(); 2]);
        assert_eq!(adapter.state(), ConnectionState::Connected);
        assert_eq!(listener.statuses()[0], (InstanceStatus::Ok, None));
    }

    #[tokio::test]
    async fn tally_line_updates_state_and_invalidates_feedbacks() {
        let (mut adapter, connector, listener) = build(AdapterConfig::default());
        adapter.init().await;
        connector.emit(0, ConnectionEvent::Data("TALLY OK 0120\r\n".to_string()));
        let event = adapter.next_event().await;
        adapter.handle_event(event).await;

        assert!(adapter.tally().is_live(2));
        assert!(adapter.tally().is_previewed(3));
        assert_eq!(
            listener.invalidations(),
            vec![vec![FeedbackKind::InputPreview, FeedbackKind::InputLive]]
        );
        let style = adapter.feedback(&FeedbackRequest::new(FeedbackKind::InputLive, 2));
        assert!(style.is_some());
        assert_eq!(adapter.feedback(&FeedbackRequest::new(FeedbackKind::InputLive, 3)), None);
    }

    #[tokio::test]
    async fn other_lines_do_not_invalidate_feedbacks() {
        let (mut adapter, _connector, listener) = build(AdapterConfig::default());
        adapter.init().await;
        adapter.handle_event(ConnectionEvent::Data("FUNCTION OK Completed\r\n".to_string())).await;
        assert!(listener.invalidations().is_empty());
        assert!(adapter.tally().is_empty());
    }

    #[tokio::test]
    async fn network_error_sets_error_status() {
        let (mut adapter, _connector, listener) = build(AdapterConfig::default());
        adapter.init().await;
        adapter.handle_event(ConnectionEvent::Error("Connection refused".to_string())).await;
        assert_eq!(
            listener.statuses(),
            vec![(InstanceStatus::Error, Some("Connection refused".to_string()))]
        );
    }

    #[tokio::test]
    async fn action_while_disconnected_is_dropped() {
        let (mut adapter, connector, _listener) = build(AdapterConfig::default());
        adapter.init().await;
        let request = ActionRequest::new("prwNext");
        let outcome = adapter.run_action(&request).await.unwrap();
        assert_eq!(outcome, ActionOutcome::Dropped(CommandEncoder::encode_request(&request).unwrap()));
        assert!(connector.connection(0).sent().is_empty());
    }

    #[tokio::test]
    async fn action_is_written_when_connected() {
        let (mut adapter, connector, _listener) = build(AdapterConfig::default());
        adapter.init().await;
        connector.connection(0).set_connected(true);
        let request = ActionRequest::new("pgmSel").with_option("pgmId", "4");
        let outcome = adapter.run_action(&request).await.unwrap();
        assert!(matches!(outcome, ActionOutcome::Sent(_)));
        assert_eq!(connector.connection(0).sent(), vec!["FUNCTION CutDirect Input=4\r\n".to_string()]);
    }

    #[tokio::test]
    async fn title_reference_is_rejected_in_id_mode() {
        let (mut adapter, connector, _listener) = build(AdapterConfig::default());
        adapter.init().await;
        connector.connection(0).set_connected(true);
        let request = ActionRequest::new("prwSel").with_option("prwId", "Camera 1");
        let result = adapter.run_action(&request).await;
        assert_eq!(
            result,
            Err(EncodingError::InvalidValue { option: "prwId", value: "Camera 1".to_string() })
        );
        assert!(connector.connection(0).sent().is_empty());

        let titles = AdapterConfig::default().with_input_addressing(InputAddressing::Title);
        adapter.update_config(titles).await;
        connector.connection(1).set_connected(true);
        let outcome = adapter.run_action(&request).await.unwrap();
        assert!(matches!(outcome, ActionOutcome::Sent(_)));
        assert_eq!(connector.connection(1).sent(), vec!["FUNCTION PreviewInput Input=Camera 1\r\n".to_string()]);
    }

    #[tokio::test]
    async fn single_ok_status_per_connect() {
        let (mut adapter, _connector, listener) = build(AdapterConfig::default());
        adapter.init().await;
        adapter
            .handle_event(ConnectionEvent::StatusChanged { state: ConnectionState::Connecting, message: None })
            .await;
        adapter.handle_event(ConnectionEvent::Connected).await;
        assert_eq!(
            listener.statuses(),
            vec![(InstanceStatus::Unknown, None), (InstanceStatus::Ok, None)]
        );
    }

    #[tokio::test]
    async fn unsupported_action_is_an_error() {
        let (mut adapter, connector, _listener) = build(AdapterConfig::default());
        adapter.init().await;
        connector.connection(0).set_connected(true);
        let result = adapter.run_action(&ActionRequest::new("fadeToBlack")).await;
        assert_eq!(result, Err(EncodingError::UnsupportedAction("fadeToBlack".to_string())));
        assert!(connector.connection(0).sent().is_empty());
    }

    #[tokio::test]
    async fn events_from_replaced_connection_are_not_processed() {
        let (mut adapter, connector, listener) = build(AdapterConfig::default());
        adapter.init().await;
        adapter.update_config(AdapterConfig::new("10.0.0.2", DEFAULT_PORT)).await;
        connector.emit(0, ConnectionEvent::Data("TALLY OK 1\r\n".to_string()));
        connector.emit(1, ConnectionEvent::Data("TALLY OK 2\r\n".to_string()));

        let event = adapter.next_event().await;
        adapter.handle_event(event).await;
        assert!(adapter.tally().is_previewed(1));
        assert_eq!(listener.invalidations().len(), 1);
    }

    #[tokio::test]
    async fn destroy_closes_the_connection() {
        let (mut adapter, connector, _listener) = build(AdapterConfig::default());
        adapter.init().await;
        adapter.destroy().await;
        assert_eq!(connector.alive(), 0);
        assert_eq!(adapter.state(), ConnectionState::Disconnected);
    }
}
