//! Hallmark anchoring of payroll runs.
//!
//! A hallmark is an opaque token that lets a third party verify that a
//! paystub was issued. Minting sits behind [`HallmarkMinter`] so another
//! anchoring service can replace the local one.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::config::HallmarkConfig;
use crate::error::PayrollResult;
use crate::models::PaystubRecord;

/// Mints hallmark tokens for payroll runs.
#[async_trait]
pub trait HallmarkMinter: Send + Sync {
    /// Mints a token for `paystub`, or `None` when anchoring is off.
    ///
    /// # Errors
    ///
    /// `HallmarkUnavailable` when the anchoring service cannot be reached.
    async fn mint(&self, paystub: &PaystubRecord) -> PayrollResult<Option<String>>;
}

/// Mints `{PREFIX}-{unix millis}-{9 random characters}` tokens in process.
#[derive(Debug, Clone)]
pub struct LocalHallmarkMinter {
    prefix: String,
}

impl LocalHallmarkMinter {
    /// Creates a minter with the given token prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim().to_ascii_uppercase(),
        }
    }
}

#[async_trait]
impl HallmarkMinter for LocalHallmarkMinter {
    async fn mint(&self, _paystub: &PaystubRecord) -> PayrollResult<Option<String>> {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .to_ascii_uppercase()
            .chars()
            .take(9)
            .collect();
        Ok(Some(format!(
            "{}-{}-{}",
            self.prefix,
            Utc::now().timestamp_millis(),
            suffix
        )))
    }
}

/// Leaves every run unanchored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledHallmarkMinter;

#[async_trait]
impl HallmarkMinter for DisabledHallmarkMinter {
    async fn mint(&self, _paystub: &PaystubRecord) -> PayrollResult<Option<String>> {
        Ok(None)
    }
}

/// Picks the minter the hallmark settings ask for.
pub fn minter_from_config(config: &HallmarkConfig) -> Arc<dyn HallmarkMinter> {
    if config.enabled {
        Arc::new(LocalHallmarkMinter::new(config.prefix.clone()))
    } else {
        Arc::new(DisabledHallmarkMinter)
    }
}
