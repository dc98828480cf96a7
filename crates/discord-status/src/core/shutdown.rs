use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

#[async_trait]
pub trait Shutdowner: Send + Sync {
    async fn shutdown(&self) -> anyhow::Result<()>;
}

/// Lets exactly one caller through, however many race for it.
#[derive(Debug, Default)]
pub struct OnceGuard(AtomicBool);

impl OnceGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` for the first caller only.
    pub fn try_enter(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }
}
