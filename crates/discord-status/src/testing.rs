use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::{
    core::Shutdowner,
    domain::{
        ShutdownKind, SignalHandler,
        error::{ChannelError, DeliveryError},
        gateway::{ChannelHandle, ChannelResolver, Gateway, SessionEvent},
        models::StatusMessage,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendBehavior {
    Deliver,
    Fail,
    Hang,
}

/// In-memory gateway that records every send attempt.
pub struct FakeGateway {
    channel_id: String,
    behavior: SendBehavior,
    events: Mutex<Option<mpsc::Receiver<SessionEvent>>>,
    attempts: Arc<Mutex<Vec<StatusMessage>>>,
    resolves: AtomicUsize,
    shutdowns: AtomicUsize,
}

impl FakeGateway {
    pub fn new(channel_id: &str, behavior: SendBehavior) -> (mpsc::Sender<SessionEvent>, Self) {
        let (tx, rx) = mpsc::channel(8);
        let gateway = Self {
            channel_id: channel_id.to_string(),
            behavior,
            events: Mutex::new(Some(rx)),
            attempts: Arc::new(Mutex::new(Vec::new())),
            resolves: AtomicUsize::new(0),
            shutdowns: AtomicUsize::new(0),
        };
        (tx, gateway)
    }

    pub fn attempts(&self) -> Vec<StatusMessage> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn resolves(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    pub async fn wait_for_attempts(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.attempts().len() < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("send attempts did not arrive in time");
    }
}

struct FakeChannel {
    behavior: SendBehavior,
    attempts: Arc<Mutex<Vec<StatusMessage>>>,
}

#[async_trait]
impl ChannelHandle for FakeChannel {
    async fn send(&self, message: &StatusMessage) -> Result<(), DeliveryError> {
        self.attempts.lock().unwrap().push(message.clone());

        match self.behavior {
            SendBehavior::Deliver => Ok(()),
            SendBehavior::Fail => Err(DeliveryError("missing permissions".into())),
            SendBehavior::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl ChannelResolver for FakeGateway {
    async fn resolve_channel(&self, id: &str) -> Result<Arc<dyn ChannelHandle>, ChannelError> {
        self.resolves.fetch_add(1, Ordering::SeqCst);

        if id != self.channel_id {
            return Err(ChannelError::NotFound {
                id: id.to_string(),
                reason: "unknown channel".into(),
            });
        }

        Ok(Arc::new(FakeChannel {
            behavior: self.behavior,
            attempts: self.attempts.clone(),
        }))
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn connect(&self) -> anyhow::Result<mpsc::Receiver<SessionEvent>> {
        self.events
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| anyhow::anyhow!("already connected"))
    }
}

#[async_trait]
impl Shutdowner for FakeGateway {
    async fn shutdown(&self) -> anyhow::Result<()> {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakeSignal(oneshot::Receiver<ShutdownKind>);

impl FakeSignal {
    pub fn new() -> (oneshot::Sender<ShutdownKind>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self(rx))
    }
}

#[async_trait]
impl SignalHandler for FakeSignal {
    async fn wait_for_shutdown(self) -> ShutdownKind {
        match self.0.await {
            Ok(kind) => kind,
            Err(_) => std::future::pending().await,
        }
    }
}
