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

use std::future::Future;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Lets a background task observe a stop request.
///
/// Both the socket task of a TCP connection and the adapter event loop select on
/// [`StopHandle::signaled`] next to their I/O.
pub struct StopHandle {
    shutdown_rx: oneshot::Receiver<()>,
}

impl StopHandle {
    fn new(shutdown_rx: oneshot::Receiver<()>) -> Self {
        Self { shutdown_rx }
    }

    /// Resolves once shutdown was requested or the owning [`ServiceHandle`] was dropped.
    ///
    /// # Example
    /// ```rust
    /// use vmix_core::spawn_service;
    ///
    /// async fn run_service() {
    ///     let service_handle = spawn_service(move |mut stop_handle| async move {
    ///         stop_handle.signaled().await;
    ///     });
    ///     service_handle.shutdown().await.unwrap();
    /// }
    /// ```
    pub async fn signaled(&mut self) {
        (&mut self.shutdown_rx).await.unwrap_or_default();
    }
}

/// Handle for a background task that supports cooperative shutdown.
pub struct ServiceHandle {
    join: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ServiceHandle {
    pub fn new(join: JoinHandle<()>, shutdown_tx: oneshot::Sender<()>) -> Self {
        Self { join, shutdown_tx: Some(shutdown_tx) }
    }

    /// Signal the task without waiting for it.
    pub fn request_shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    pub async fn await_join(self) -> Result<(), tokio::task::JoinError> {
        self.join.await
    }

    /// Signal the task and wait until it has returned.
    pub async fn shutdown(mut self) -> Result<(), tokio::task::JoinError> {
        self.request_shutdown();
        self.await_join().await
    }
}

/// Spawn `f` on the Tokio runtime, handing it the [`StopHandle`] paired with the returned
/// [`ServiceHandle`].
pub fn spawn_service<Fut, Func>(f: Func) -> ServiceHandle
where
    Fut: Future<Output = ()> + Send + 'static,
    Func: FnOnce(StopHandle) -> Fut + Send + 'static,
{
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let stop = StopHandle::new(shutdown_rx);
    let join = tokio::spawn(async move {
        f(stop).await;
    });
    ServiceHandle::new(join, shutdown_tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn shutdown_wakes_the_task() {
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = stopped.clone();
        let handle = spawn_service(move |mut stop| async move {
            stop.signaled().await;
            flag.store(true, Ordering::SeqCst);
        });
        handle.shutdown().await.unwrap();
        assert!(stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn dropping_the_handle_counts_as_a_stop_request() {
        let (done_tx, done_rx) = oneshot::channel();
        let handle = spawn_service(move |mut stop| async move {
            stop.signaled().await;
            let _ = done_tx.send(());
        });
        drop(handle);
        tokio::time::timeout(std::time::Duration::from_secs(1), done_rx)
            .await
            .unwrap()
            .unwrap();
    }
}
