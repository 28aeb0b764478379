use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use finback_core::{Entity, ForecastId, TenantId};

use crate::config::ForecastConfig;
use crate::result::ForecastResult;

/// A forecast as stored by callers: identity, inputs, and the latest result.
///
/// Retraining replaces `config`, `result`, and `last_trained_at`, and bumps
/// `version`; `id` and `tenant_id` never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub id: ForecastId,
    pub tenant_id: TenantId,
    pub config: ForecastConfig,
    pub result: ForecastResult,
    pub last_trained_at: DateTime<Utc>,
    pub version: u64,
}

impl Entity for Forecast {
    type Id = ForecastId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
