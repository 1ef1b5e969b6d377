//! Persistence and channel lookup collaborators.
//!
//! Handlers only ever write through [`Backend`]; they never read back what they stored.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::channel::{Channel, ChannelType};
use crate::errors::BackendError;
use crate::types::{Msg, MsgStatus};

#[async_trait]
pub trait Backend: Send + Sync {
    async fn write_msg(&self, msg: &Msg) -> Result<(), BackendError>;
    async fn write_msg_status(&self, status: &MsgStatus) -> Result<(), BackendError>;
}

pub type SharedBackend = Arc<dyn Backend>;

/// Backend that keeps everything in process. Used by tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    msgs: Arc<Mutex<Vec<Msg>>>,
    statuses: Arc<Mutex<Vec<MsgStatus>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent write fail with [`BackendError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn msgs(&self) -> Vec<Msg> {
        self.msgs.lock().await.clone()
    }

    pub async fn statuses(&self) -> Vec<MsgStatus> {
        self.statuses.lock().await.clone()
    }

    fn check_available(&self) -> Result<(), BackendError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("in-memory backend disabled".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn write_msg(&self, msg: &Msg) -> Result<(), BackendError> {
        self.check_available()?;
        self.msgs.lock().await.push(msg.clone());
        Ok(())
    }

    async fn write_msg_status(&self, status: &MsgStatus) -> Result<(), BackendError> {
        self.check_available()?;
        self.statuses.lock().await.push(status.clone());
        Ok(())
    }
}

/// Channel configuration lookup used by the dispatcher.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    async fn get_channel(
        &self,
        channel_type: &ChannelType,
        uuid: Uuid,
    ) -> Result<Option<Channel>, BackendError>;
}

pub type SharedChannelStore = Arc<dyn ChannelStore>;

#[derive(Debug, Clone, Default)]
pub struct InMemoryChannelStore {
    channels: Arc<RwLock<HashMap<Uuid, Channel>>>,
}

impl InMemoryChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_channels(channels: impl IntoIterator<Item = Channel>) -> Self {
        let map = channels.into_iter().map(|c| (c.uuid, c)).collect();
        Self {
            channels: Arc::new(RwLock::new(map)),
        }
    }

    pub async fn insert(&self, channel: Channel) {
        self.channels.write().await.insert(channel.uuid, channel);
    }

    pub async fn len(&self) -> usize {
        self.channels.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.channels.read().await.is_empty()
    }
}

#[async_trait]
impl ChannelStore for InMemoryChannelStore {
    async fn get_channel(
        &self,
        channel_type: &ChannelType,
        uuid: Uuid,
    ) -> Result<Option<Channel>, BackendError> {
        let guard = self.channels.read().await;
        Ok(guard
            .get(&uuid)
            .filter(|channel| &channel.channel_type == channel_type)
            .cloned())
    }
}
