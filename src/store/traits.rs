//! Storage collaborator interface — lookup and create/update operations the
//! engagement pipeline depends on. Backed by the platform's document store
//! in production and by [`super::MemoryStore`] in tests and demos.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::models::{
    Brand, Conversation, Customer, EngageKind, EngageMessage, EngageMethod, Integration,
    IntegrationKind, Message, NewConversation, NewMessage, User,
};

/// Query shape for candidate engage messages.
#[derive(Debug, Clone)]
pub struct EngageMessageFilter {
    pub brand_id: Uuid,
    pub kind: EngageKind,
    pub method: EngageMethod,
    pub is_live: bool,
    /// Exclude messages that already engaged this customer.
    pub exclude_customer_id: Uuid,
}

impl EngageMessageFilter {
    /// Live, visitor-auto, messenger-method messages not yet fired for
    /// this customer.
    pub fn visitor_auto(brand_id: Uuid, customer: &Customer) -> Self {
        Self {
            brand_id,
            kind: EngageKind::VisitorAuto,
            method: EngageMethod::Messenger,
            is_live: true,
            exclude_customer_id: customer.id,
        }
    }

    pub fn matches(&self, message: &EngageMessage) -> bool {
        message.brand_id == self.brand_id
            && message.kind == self.kind
            && message.method == self.method
            && message.is_live == self.is_live
            && !message.engaged_customer_ids.contains(&self.exclude_customer_id)
    }
}

/// Backend-agnostic storage trait for the engagement pipeline.
#[async_trait]
pub trait EngageStore: Send + Sync {
    /// Resolve a brand by code together with its integration of the given
    /// kind. `NotFound` when either half is missing.
    async fn find_integration(
        &self,
        brand_code: &str,
        kind: IntegrationKind,
    ) -> Result<(Brand, Integration), StoreError>;

    /// Candidate engage messages matching the filter.
    async fn find_engage_messages(
        &self,
        filter: &EngageMessageFilter,
    ) -> Result<Vec<EngageMessage>, StoreError>;

    /// Resolve a team member by id.
    async fn find_user(&self, id: Uuid) -> Result<User, StoreError>;

    /// Create a conversation record.
    async fn create_conversation(
        &self,
        fields: NewConversation,
    ) -> Result<Conversation, StoreError>;

    /// Create a message record.
    async fn create_message(&self, fields: NewMessage) -> Result<Message, StoreError>;

    /// Append a customer id to a message's engaged set.
    ///
    /// Append-only set semantics: the write must be idempotent under
    /// concurrent identical appends.
    async fn mark_customer_engaged(
        &self,
        message_id: Uuid,
        customer_id: Uuid,
    ) -> Result<(), StoreError>;
}
