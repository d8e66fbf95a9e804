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

use log::{debug, info};
use tokio::select;
use tokio::sync::{mpsc, oneshot};

use crate::action::ActionRequest;
use crate::adapter::{ActionOutcome, Adapter};
use crate::config::AdapterConfig;
use crate::connection::{ConnectionFactory, ConnectionState};
use crate::errors::{AdapterError, EncodingError};
use crate::feedback::{FeedbackRequest, FeedbackStyle};
use crate::host::HostListener;
use crate::service::{spawn_service, ServiceHandle};
use crate::tally::TallyState;

const REQUEST_QUEUE: usize = 32;

enum AdapterRequest {
    RunAction {
        request: ActionRequest,
        reply: oneshot::Sender<Result<ActionOutcome, EncodingError>>,
    },
    UpdateConfig {
        config: AdapterConfig,
        reply: oneshot::Sender<()>,
    },
    Feedback {
        request: FeedbackRequest,
        reply: oneshot::Sender<Option<FeedbackStyle>>,
    },
    Tally {
        reply: oneshot::Sender<TallyState>,
    },
    State {
        reply: oneshot::Sender<ConnectionState>,
    },
    Config {
        reply: oneshot::Sender<AdapterConfig>,
    },
}

/// Handle to an adapter running on its own task.
///
/// Host requests and connection events are processed one at a time, so a configuration change
/// never interleaves with tally handling of the connection it replaces.
pub struct AdapterHandle {
    requests: mpsc::Sender<AdapterRequest>,
    service: ServiceHandle,
}

impl AdapterHandle {
    async fn call<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> AdapterRequest,
    ) -> Result<T, AdapterError> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send(make(reply))
            .await
            .map_err(|_| AdapterError::ServiceStopped)?;
        response.await.map_err(|_| AdapterError::ServiceStopped)
    }

    pub async fn run_action(&self, request: ActionRequest) -> Result<ActionOutcome, AdapterError> {
        let outcome = self.call(|reply| AdapterRequest::RunAction { request, reply }).await?;
        Ok(outcome?)
    }

    /// Resolves once the old connection is closed and the new one has been started.
    pub async fn update_config(&self, config: AdapterConfig) -> Result<(), AdapterError> {
        self.call(|reply| AdapterRequest::UpdateConfig { config, reply }).await
    }

    pub async fn feedback(&self, request: FeedbackRequest) -> Result<Option<FeedbackStyle>, AdapterError> {
        self.call(|reply| AdapterRequest::Feedback { request, reply }).await
    }

    pub async fn tally(&self) -> Result<TallyState, AdapterError> {
        self.call(|reply| AdapterRequest::Tally { reply }).await
    }

    pub async fn state(&self) -> Result<ConnectionState, AdapterError> {
        self.call(|reply| AdapterRequest::State { reply }).await
    }

    /// The configuration currently applied.
    pub async fn config(&self) -> Result<AdapterConfig, AdapterError> {
        self.call(|reply| AdapterRequest::Config { reply }).await
    }

    /// Stop the event loop and close the connection.
    pub async fn shutdown(self) -> Result<(), tokio::task::JoinError> {
        self.service.shutdown().await
    }
}

/// Initialize `adapter` and drive it on a background task.
pub fn spawn_adapter<F, L>(mut adapter: Adapter<F, L>) -> AdapterHandle
where
    F: ConnectionFactory,
    L: HostListener,
{
    let (requests, mut requests_rx) = mpsc::channel(REQUEST_QUEUE);
    let service = spawn_service(move |mut stop| async move {
        adapter.init().await;
        loop {
            select! {
                biased;
                _ = stop.signaled() => {
                    info!("Adapter shutdown requested");
                    break;
                }
                request = requests_rx.recv() => match request {
                    Some(request) => handle_request(&mut adapter, request).await,
                    None => {
                        info!("All adapter handles dropped; stopping");
                        break;
                    }
                },
                event = adapter.next_event() => adapter.handle_event(event).await,
            }
        }
        adapter.destroy().await;
    });
    AdapterHandle { requests, service }
}

async fn handle_request<F, L>(adapter: &mut Adapter<F, L>, request: AdapterRequest)
where
    F: ConnectionFactory,
    L: HostListener,
{
    // a dropped reply only means the caller stopped waiting
    match request {
        AdapterRequest::RunAction { request, reply } => {
            let _ = reply.send(adapter.run_action(&request).await);
        }
        AdapterRequest::UpdateConfig { config, reply } => {
            adapter.update_config(config).await;
            let _ = reply.send(());
        }
        AdapterRequest::Feedback { request, reply } => {
            let _ = reply.send(adapter.feedback(&request));
        }
        AdapterRequest::Tally { reply } => {
            let _ = reply.send(adapter.tally().clone());
        }
        AdapterRequest::State { reply } => {
            debug!("Connection state {:?}", adapter.state());
            let _ = reply.send(adapter.state());
        }
        AdapterRequest::Config { reply } => {
            let _ = reply.send(adapter.config().clone());
        }
    }
}
