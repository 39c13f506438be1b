//! Export quota gate
//!
//! Exports are a membership perk with a daily allowance. The allowance
//! check runs before every submission because the quota is shared across
//! devices and decremented server-side; a cached value could let a second
//! tab submit past zero.

use tracing::debug;

use crate::app::client::SearchApi;
use crate::app::models::FieldFilter;
use crate::constants::export;
use crate::errors::ApiResult;

/// Outcome of the pre-export allowance check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportDecision {
    /// Submission may proceed; `remaining` rows are still allowed today
    Proceed { remaining: i64, batch_ceiling: u32 },
    /// Not entitled to export at all; prompt a membership upgrade
    RequireUpgrade,
    /// Entitled, but today's allowance is used up
    QuotaExhausted,
}

/// Classify a raw allowance value from the backend
///
/// Negative means the account has no export entitlement, zero means the
/// daily allowance is spent, positive is the remaining row budget.
pub fn evaluate(available_limit: i64) -> ExportDecision {
    if available_limit < 0 {
        ExportDecision::RequireUpgrade
    } else if available_limit == 0 {
        ExportDecision::QuotaExhausted
    } else {
        ExportDecision::Proceed {
            remaining: available_limit,
            batch_ceiling: export::BATCH_CEILING,
        }
    }
}

/// Check today's allowance and classify it
pub async fn check(api: &dyn SearchApi) -> ApiResult<ExportDecision> {
    let available_limit = api.export_limit_today().await?;
    let decision = evaluate(available_limit);
    debug!(available_limit, ?decision, "export allowance checked");
    Ok(decision)
}

/// Check the allowance and submit the export when permitted
///
/// Returns the decision either way; the job is only submitted on
/// [`ExportDecision::Proceed`].
pub async fn submit(
    api: &dyn SearchApi,
    keyword: &str,
    filters: &[FieldFilter],
) -> ApiResult<ExportDecision> {
    let decision = check(api).await?;
    if matches!(decision, ExportDecision::Proceed { .. }) {
        api.submit_export(keyword, filters).await?;
    }
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_allowance_requires_upgrade() {
        assert_eq!(evaluate(-1), ExportDecision::RequireUpgrade);
        assert_eq!(evaluate(i64::MIN), ExportDecision::RequireUpgrade);
    }

    #[test]
    fn test_zero_allowance_is_exhausted() {
        assert_eq!(evaluate(0), ExportDecision::QuotaExhausted);
    }

    #[test]
    fn test_positive_allowance_proceeds_with_remaining() {
        assert_eq!(
            evaluate(7),
            ExportDecision::Proceed {
                remaining: 7,
                batch_ceiling: export::BATCH_CEILING,
            }
        );
    }
}
