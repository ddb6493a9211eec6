//! Engagement orchestrator — fans candidate engage messages out against one
//! visitor and fires every match exactly once.
//!
//! Per-candidate pipelines run concurrently and are isolated: a failure in
//! one candidate's user lookup, rule check, or creation never aborts its
//! siblings. The "mark engaged" write is ordered strictly after a successful
//! creation, so a customer is never marked without a conversation existing.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::error::{Error, PipelineError};
use crate::geo::GeoLocator;
use crate::pipeline::checker::RuleSetChecker;
use crate::pipeline::creator::ConversationCreator;
use crate::pipeline::types::{BrowserInfo, EngagePair};
use crate::store::models::{Customer, EngageData, EngageMessage, Integration, IntegrationKind};
use crate::store::{EngageMessageFilter, EngageStore};

pub struct EngageOrchestrator {
    store: Arc<dyn EngageStore>,
    checker: RuleSetChecker,
    creator: ConversationCreator,
}

impl EngageOrchestrator {
    pub fn new(store: Arc<dyn EngageStore>, geo: Arc<dyn GeoLocator>) -> Self {
        Self {
            checker: RuleSetChecker::new(geo),
            creator: ConversationCreator::new(store.clone()),
            store,
        }
    }

    /// Evaluate all live visitor-auto engage messages for this brand against
    /// one visitor and fire every match.
    ///
    /// Returns the successfully created conversation/message pairs. An empty
    /// result is normal (nothing live, nothing matched, or the widget hides
    /// its conversation list); only integration resolution failure is a
    /// whole-call error.
    pub async fn trigger(
        &self,
        brand_code: &str,
        customer: &Customer,
        integration: &Integration,
        browser_info: &BrowserInfo,
        remote_address: &str,
    ) -> Result<Vec<EngagePair>, Error> {
        let (brand, resolved) = self
            .store
            .find_integration(brand_code, IntegrationKind::Messenger)
            .await?;

        if resolved
            .messenger_data
            .as_ref()
            .is_some_and(|d| d.hide_conversation_list)
        {
            debug!(brand = %brand.code, "Conversation list hidden, no engage messages fire");
            return Ok(Vec::new());
        }

        let candidates = self
            .store
            .find_engage_messages(&EngageMessageFilter::visitor_auto(brand.id, customer))
            .await?;

        debug!(
            count = candidates.len(),
            brand = %brand.code,
            customer_id = %customer.id,
            "Evaluating engage message candidates"
        );

        let pipelines = candidates.iter().map(|message| {
            self.run_candidate(message, customer, integration, browser_info, remote_address)
        });
        let results = join_all(pipelines).await;

        let mut pairs = Vec::new();
        for (message, result) in candidates.iter().zip(results) {
            match result {
                Ok(Some(pair)) => pairs.push(pair),
                Ok(None) => {}
                Err(e) => warn!(
                    message_id = %message.id,
                    customer_id = %customer.id,
                    error = %e,
                    "Engage candidate pipeline failed"
                ),
            }
        }

        Ok(pairs)
    }

    /// One candidate's pipeline: resolve user → check rules → create →
    /// mark engaged.
    async fn run_candidate(
        &self,
        message: &EngageMessage,
        customer: &Customer,
        integration: &Integration,
        browser_info: &BrowserInfo,
        remote_address: &str,
    ) -> Result<Option<EngagePair>, PipelineError> {
        let user = self
            .store
            .find_user(message.from_user_id)
            .await
            .map_err(PipelineError::User)?;

        let passed = self
            .checker
            .check_all(
                &message.rules,
                browser_info,
                customer.session_count,
                remote_address,
            )
            .await?;

        if !passed {
            return Ok(None);
        }

        let engage_data = EngageData {
            message_id: message.id,
            from_user_id: message.from_user_id,
            kind: message.kind,
            content: message.content.clone(),
        };

        let pair = self
            .creator
            .create(customer, integration, &user, &engage_data)
            .await?;

        // Strictly after successful creation. A failure here means the
        // customer may be engaged again on their next visit; that is the
        // at-least-once side of the ordering guarantee.
        if let Err(e) = self
            .store
            .mark_customer_engaged(message.id, customer.id)
            .await
        {
            error!(
                message_id = %message.id,
                customer_id = %customer.id,
                error = %e,
                "Conversation created but engaged mark failed"
            );
        }

        info!(
            message_id = %message.id,
            customer_id = %customer.id,
            conversation_id = %pair.conversation.id,
            "Engage message fired"
        );

        Ok(Some(pair))
    }
}
