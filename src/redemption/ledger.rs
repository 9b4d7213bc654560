use std::sync::Arc;
use log::{debug, info};
use crate::error::Result;
use crate::redemption::models::{CodeKind, CodeRecord};
use crate::storage::{MutexQueue, Storage};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsedCodes {
    pub shift: Vec<CodeRecord>,
    pub vip: Vec<CodeRecord>,
}

impl UsedCodes {
    pub fn of(&self, kind: CodeKind) -> &[CodeRecord] {
        match kind {
            CodeKind::Shift => &self.shift,
            CodeKind::Vip => &self.vip,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadCodes {
    pub shift: Vec<String>,
    pub vip: Vec<String>,
}

impl BadCodes {
    pub fn of(&self, kind: CodeKind) -> &[String] {
        match kind {
            CodeKind::Shift => &self.shift,
            CodeKind::Vip => &self.vip,
        }
    }
}

/// Persisted lists of redeemed and permanently rejected codes.
///
/// Appends are read-modify-write, so they run under their own queue on top of
/// the storage queue. A code never sits in both lists of the same kind.
pub struct CodeLedger {
    storage: Arc<Storage>,
    lock: MutexQueue,
}

impl CodeLedger {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self {
            storage,
            lock: MutexQueue::new(),
        }
    }

    pub async fn used(&self, kind: CodeKind) -> Result<Vec<CodeRecord>> {
        self.storage.get_or(kind.used_key(), Vec::new()).await
    }

    pub async fn bad(&self, kind: CodeKind) -> Result<Vec<String>> {
        self.storage.get_or(kind.bad_key(), Vec::new()).await
    }

    pub async fn used_codes(&self) -> Result<UsedCodes> {
        Ok(UsedCodes {
            shift: self.used(CodeKind::Shift).await?,
            vip: self.used(CodeKind::Vip).await?,
        })
    }

    pub async fn bad_codes(&self) -> Result<BadCodes> {
        Ok(BadCodes {
            shift: self.bad(CodeKind::Shift).await?,
            vip: self.bad(CodeKind::Vip).await?,
        })
    }

    /// Prior redemption of `code`; for SHiFT codes only on the same platform.
    pub async fn find_used(&self, kind: CodeKind, code: &str, platform: Option<&str>) -> Result<Option<CodeRecord>> {
        Ok(self
            .used(kind)
            .await?
            .into_iter()
            .find(|record| record.code == code && (kind == CodeKind::Vip || record.platform.as_deref() == platform)))
    }

    pub async fn is_bad(&self, kind: CodeKind, code: &str) -> Result<bool> {
        Ok(self.bad(kind).await?.iter().any(|bad| bad == code))
    }

    pub async fn add_used(&self, kind: CodeKind, record: CodeRecord) -> Result<()> {
        let _release = self.lock.acquire().await;

        let mut used = self.used(kind).await?;
        if used.iter().any(|r| r.code == record.code && r.platform == record.platform) {
            debug!("{} code {} already in the used list", kind, record.code);
            return Ok(());
        }

        let mut bad = self.bad(kind).await?;
        if bad.iter().any(|b| *b == record.code) {
            bad.retain(|b| *b != record.code);
            self.storage.set(kind.bad_key(), &bad).await?;
        }

        info!("Recording {} code {} as redeemed", kind, record.code);
        used.push(record);
        self.storage.set(kind.used_key(), &used).await
    }

    pub async fn add_bad(&self, kind: CodeKind, code: &str) -> Result<()> {
        let _release = self.lock.acquire().await;

        let used = self.used(kind).await?;
        if used.iter().any(|r| r.code == code) {
            debug!("Not marking redeemed {} code {} as bad", kind, code);
            return Ok(());
        }

        let mut bad = self.bad(kind).await?;
        if bad.iter().any(|b| b == code) {
            return Ok(());
        }
        info!("Recording {} code {} as invalid", kind, code);
        bad.push(code.to_string());
        self.storage.set(kind.bad_key(), &bad).await
    }

    pub async fn reset(&self) -> Result<()> {
        let _release = self.lock.acquire().await;
        for kind in [CodeKind::Shift, CodeKind::Vip] {
            self.storage.set(kind.used_key(), &Vec::<CodeRecord>::new()).await?;
            self.storage.set(kind.bad_key(), &Vec::<String>::new()).await?;
        }
        info!("Cleared code history");
        Ok(())
    }
}
