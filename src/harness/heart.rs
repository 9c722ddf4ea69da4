//! Structures to keep the process alive until some event occurs

use futures::{
    channel::mpsc::{channel, Receiver, Sender},
    future,
    pin_mut,
    prelude::*,
    select,
};
use std::fmt;
use tokio::signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tracing::{debug, error, warn};

/// Reason why the heart stopped beating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeathReason {
    /// Internal kill signal has been sent
    Killed(String),
    /// SIGINT, SIGTERM or other process-external cause
    Terminated,
}

impl fmt::Display for DeathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeathReason::Killed(reason) => write!(f, "Killed ({})", reason),
            DeathReason::Terminated => write!(f, "Terminated due to external signal"),
        }
    }
}

/// Lifecycle management struct that can be used to keep the application alive
pub struct Heart {
    rx: Receiver<String>,
}

impl Heart {
    /// Creates a new heart and linked stone
    pub fn new() -> (Self, HeartStone) {
        let (tx, rx) = channel(2);
        (Self { rx }, HeartStone { remote: tx })
    }

    /// Future that waits until the heart dies for the returned reason
    ///
    /// Dropping all [`HeartStones`](HeartStone) does not kill the heart, it then only dies from external signals.
    pub async fn death(&mut self) -> DeathReason {
        let termination = Heart::termination_signal().fuse();
        pin_mut!(termination);

        debug!("Heart starts beating");

        select! {
            reason = self.rx.next() => match reason {
                Some(reason) => return DeathReason::Killed(reason),
                None => debug!("All heart stones have been dropped"),
            },
            () = termination => return DeathReason::Terminated,
        };

        termination.await;
        DeathReason::Terminated
    }

    async fn termination_signal() {
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm_stream) => {
                let sigterm = sigterm_stream.recv().fuse();
                let ctrl_c = ctrl_c().fuse();

                pin_mut!(sigterm, ctrl_c);

                select! {
                    _ = sigterm => {},
                    _ = ctrl_c => {},
                };
            }
            Err(error) => {
                warn!(%error, "Unable to listen for SIGTERM, only reacting to interrupts");

                if let Err(error) = ctrl_c().await {
                    error!(%error, "Unable to listen for interrupts");
                    future::pending::<()>().await;
                }
            }
        }
    }
}

/// Remote controller for the heart
#[derive(Clone)]
pub struct HeartStone {
    remote: Sender<String>,
}

impl HeartStone {
    /// Kill the associated heart
    pub async fn kill(&mut self, reason: String) {
        if let Err(e) = self.remote.send(reason).await {
            error!("Failed to interact with Heart: {}", e);
        }
    }
}
