//! Rule-set checking — evaluates an engage message's rules against one
//! visitor, enriching the context with geolocation only when needed.

use std::sync::Arc;

use tracing::debug;

use crate::error::PipelineError;
use crate::geo::GeoLocator;
use crate::pipeline::rules::Rule;
use crate::pipeline::types::{BrowserInfo, VisitorContext};

/// Checks a whole rule set with AND semantics.
pub struct RuleSetChecker {
    geo: Arc<dyn GeoLocator>,
}

impl RuleSetChecker {
    pub fn new(geo: Arc<dyn GeoLocator>) -> Self {
        Self { geo }
    }

    /// Evaluate every rule; all must pass.
    ///
    /// The geolocation round trip runs only when some rule targets
    /// city/country, so rule sets without location rules never touch the
    /// network. An enrichment failure propagates as an explicit error,
    /// never as "did not pass". Evaluation short-circuits on the first
    /// failing rule; the result is unaffected.
    pub async fn check_all(
        &self,
        rules: &[Rule],
        browser_info: &BrowserInfo,
        number_of_visits: u32,
        remote_address: &str,
    ) -> Result<bool, PipelineError> {
        let mut ctx = VisitorContext::new(browser_info, number_of_visits);

        if rules.iter().any(|r| r.kind.needs_location()) {
            let location = self.geo.locate(remote_address).await?;
            ctx = ctx.with_location(location);
        }

        for rule in rules {
            if !rule.evaluate(&ctx)? {
                debug!(
                    kind = ?rule.kind,
                    condition = ?rule.condition,
                    "Rule failed, visitor does not match"
                );
                return Ok(false);
            }
        }

        Ok(true)
    }
}
