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

use crate::feedback::FeedbackKind;

/// Instance status reported to the control surface host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceStatus {
    Ok,
    Warning,
    Error,
    Unknown,
}

/// Callbacks into the host application.
#[async_trait]
pub trait HostListener: Send + Sync + 'static {
    async fn on_status(&self, status: InstanceStatus, message: Option<String>);

    /// The host should re-evaluate every feedback of the given kinds.
    async fn on_feedbacks_invalidated(&self, kinds: Vec<FeedbackKind>);
}

pub struct NoopHostListener;

#[async_trait]
impl HostListener for NoopHostListener {
    async fn on_status(&self, _status: InstanceStatus, _message: Option<String>) {}

    async fn on_feedbacks_invalidated(&self, _kinds: Vec<FeedbackKind>) {}
}

impl NoopHostListener {
    pub fn new() -> Self {
        Self {}
    }
}
