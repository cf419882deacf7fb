// src/watch/watcher.rs

use std::sync::Arc;

use notify::{Config, Event, RecommendedWatcher, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::version::VersionStore;
use crate::watch::bridge::{DirectoryWatcher, WatchBridge};
use crate::watch::events::translate;

/// Handle for the background watch loop.
///
/// The loop owns the `notify` watcher, so it keeps running until the handle
/// is shut down, dropped, or the cancellation token is cancelled elsewhere.
pub struct BridgeHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for BridgeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeHandle")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl BridgeHandle {
    pub fn new(cancel: CancellationToken, task: JoinHandle<()>) -> Self {
        Self {
            cancel,
            task: Some(task),
        }
    }

    /// True once the loop has exited (cancelled or channel closed).
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Ask the loop to stop without waiting for it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!("watch bridge task ended abnormally: {err}");
            }
        }
    }
}

impl Drop for BridgeHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Subscribe every directory under the store's root and start the event loop.
///
/// All subscriptions exist before this returns, so any directory created
/// afterwards inside the tree is seen. Must be called from within a Tokio
/// runtime.
pub fn spawn_bridge(store: Arc<VersionStore>, cancel: CancellationToken) -> Result<BridgeHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            // Only fails once the loop is gone, and then nobody is listening.
            let _ = event_tx.send(res);
        },
        Config::default(),
    )?;

    let root = store.root().to_path_buf();
    let mut bridge = WatchBridge::new(store, watcher);
    let subscribed = bridge.subscribe_tree();
    info!("file watcher started on {:?} ({subscribed} directories)", root);

    let task = tokio::spawn(run_bridge(bridge, event_rx, cancel.clone()));
    Ok(BridgeHandle::new(cancel, task))
}

/// Event loop: one notification at a time, in delivery order, until
/// cancelled or the notification channel closes.
///
/// Errors from the notification source are logged and never end the loop.
pub async fn run_bridge<W>(
    mut bridge: WatchBridge<W>,
    mut event_rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    cancel: CancellationToken,
) where
    W: DirectoryWatcher + 'static,
{
    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                info!("watch bridge cancelled");
                break;
            }
            msg = event_rx.recv() => match msg {
                Some(Ok(event)) => {
                    debug!(?event, "received notify event");
                    for fs_event in translate(event) {
                        bridge.handle(fs_event);
                    }
                }
                Some(Err(err)) => error!("error: {err}"),
                None => {
                    info!("notify event channel closed; exiting");
                    break;
                }
            },
        }
    }
    debug!("watcher event loop finished");
}
