//! Conversation creation — renders the engage content and writes the
//! conversation + initiating message pair.
//!
//! The two writes are strictly ordered and not atomic: a message-creation
//! failure after the conversation write is surfaced as a distinct
//! `PartialCreate` error so the caller can retry or reap the orphan.

use std::sync::Arc;

use tracing::debug;

use crate::error::PipelineError;
use crate::pipeline::types::EngagePair;
use crate::store::models::{Customer, EngageData, Integration, NewConversation, NewMessage, User};
use crate::store::EngageStore;
use crate::template;

pub struct ConversationCreator {
    store: Arc<dyn EngageStore>,
}

impl ConversationCreator {
    pub fn new(store: Arc<dyn EngageStore>) -> Self {
        Self { store }
    }

    /// Substitute → create conversation → create message.
    pub async fn create(
        &self,
        customer: &Customer,
        integration: &Integration,
        user: &User,
        engage_data: &EngageData,
    ) -> Result<EngagePair, PipelineError> {
        let content = template::render(&engage_data.content, customer, user);

        let conversation = self
            .store
            .create_conversation(NewConversation {
                user_id: user.id,
                customer_id: customer.id,
                integration_id: integration.id,
                content: content.clone(),
            })
            .await
            .map_err(PipelineError::Create)?;

        let message = self
            .store
            .create_message(NewMessage {
                conversation_id: conversation.id,
                user_id: user.id,
                customer_id: customer.id,
                content,
                engage_data: Some(engage_data.clone()),
            })
            .await
            .map_err(|source| PipelineError::PartialCreate {
                conversation_id: conversation.id,
                source,
            })?;

        debug!(
            conversation_id = %conversation.id,
            message_id = %message.id,
            customer_id = %customer.id,
            "Created engage conversation"
        );

        Ok(EngagePair {
            conversation,
            message,
        })
    }
}
