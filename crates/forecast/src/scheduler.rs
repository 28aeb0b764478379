//! Tenant gate in front of job execution.

use tracing::warn;

use finback_core::TenantId;

use crate::error::ForecastError;
use crate::job::AnalyticsJob;

/// Which tenants a scheduler serves.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum TenantScope {
    /// Shared worker: every tenant.
    #[default]
    Shared,
    /// Worker pinned to a single tenant.
    Pinned(TenantId),
}

impl TenantScope {
    pub fn admits(self, tenant_id: TenantId) -> bool {
        match self {
            TenantScope::Shared => true,
            TenantScope::Pinned(pinned) => pinned == tenant_id,
        }
    }
}

pub trait JobScheduler: Send + Sync + 'static {
    fn scope(&self) -> TenantScope;

    /// Reject a tenant up front, before any of its data is read.
    fn admit(&self, tenant_id: TenantId) -> Result<(), ForecastError> {
        let scope = self.scope();
        if scope.admits(tenant_id) {
            return Ok(());
        }
        warn!(tenant = %tenant_id, ?scope, "tenant outside scheduler scope");
        Err(ForecastError::TenantScopeViolation)
    }

    fn run<J: AnalyticsJob>(&self, job: J) -> Result<J::Output, ForecastError> {
        self.admit(job.tenant_id())?;
        job.run()
    }
}

/// Runs jobs inline on the caller's thread.
#[derive(Debug, Default, Copy, Clone)]
pub struct LocalScheduler {
    scope: TenantScope,
}

impl LocalScheduler {
    pub fn new(scope: TenantScope) -> Self {
        Self { scope }
    }

    pub fn pinned_to(tenant_id: TenantId) -> Self {
        Self::new(TenantScope::Pinned(tenant_id))
    }
}

impl JobScheduler for LocalScheduler {
    fn scope(&self) -> TenantScope {
        self.scope
    }
}
