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

use async_trait::async_trait;
use log::{error, info, warn};
use serde::Serialize;
use tokio::sync::mpsc;
use vmix_core::{FeedbackKind, HostListener, InstanceStatus};

/// Unsolicited notification written to stdout.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BridgeEvent {
    Status { status: &'static str, message: Option<String> },
    FeedbacksInvalidated { feedbacks: Vec<&'static str> },
}

fn status_id(status: InstanceStatus) -> &'static str {
    match status {
        InstanceStatus::Ok => "ok",
        InstanceStatus::Warning => "warning",
        InstanceStatus::Error => "error",
        InstanceStatus::Unknown => "unknown",
    }
}

/// Logs adapter callbacks and forwards them to the stdout writer.
pub struct StdoutHostListener {
    events: mpsc::UnboundedSender<BridgeEvent>,
}

impl StdoutHostListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BridgeEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { events }, rx)
    }
}

#[async_trait]
impl HostListener for StdoutHostListener {
    async fn on_status(&self, status: InstanceStatus, message: Option<String>) {
        match status {
            InstanceStatus::Ok => info!("Status ok"),
            InstanceStatus::Warning => warn!("Status warning: {}", message.as_deref().unwrap_or_default()),
            InstanceStatus::Error => error!("Status error: {}", message.as_deref().unwrap_or_default()),
            InstanceStatus::Unknown => info!("Status unknown: {}", message.as_deref().unwrap_or_default()),
        }
        let _ = self.events.send(BridgeEvent::Status { status: status_id(status), message });
    }

    async fn on_feedbacks_invalidated(&self, kinds: Vec<FeedbackKind>) {
        let feedbacks = kinds.iter().map(FeedbackKind::id).collect();
        let _ = self.events.send(BridgeEvent::FeedbacksInvalidated { feedbacks });
    }
}
