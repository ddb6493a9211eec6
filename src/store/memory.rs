//! In-memory storage backend — reference implementation of [`EngageStore`]
//! for tests and the demo binary.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::models::{
    Brand, Conversation, EngageMessage, Integration, IntegrationKind, Message, NewConversation,
    NewMessage, User,
};
use crate::store::traits::{EngageMessageFilter, EngageStore};

#[derive(Default)]
struct Collections {
    brands: Vec<Brand>,
    integrations: Vec<Integration>,
    users: Vec<User>,
    engage_messages: Vec<EngageMessage>,
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
}

/// In-memory document store guarded by a single lock.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Seeding ─────────────────────────────────────────────────────

    pub async fn insert_brand(&self, brand: Brand) {
        self.inner.write().await.brands.push(brand);
    }

    pub async fn insert_integration(&self, integration: Integration) {
        self.inner.write().await.integrations.push(integration);
    }

    pub async fn insert_user(&self, user: User) {
        self.inner.write().await.users.push(user);
    }

    pub async fn insert_engage_message(&self, message: EngageMessage) {
        self.inner.write().await.engage_messages.push(message);
    }

    // ── Inspection (tests, demo output) ─────────────────────────────

    pub async fn conversations(&self) -> Vec<Conversation> {
        self.inner.read().await.conversations.clone()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.inner.read().await.messages.clone()
    }

    pub async fn engage_message(&self, id: Uuid) -> Option<EngageMessage> {
        self.inner
            .read()
            .await
            .engage_messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }
}

#[async_trait]
impl EngageStore for MemoryStore {
    async fn find_integration(
        &self,
        brand_code: &str,
        kind: IntegrationKind,
    ) -> Result<(Brand, Integration), StoreError> {
        let inner = self.inner.read().await;

        let brand = inner
            .brands
            .iter()
            .find(|b| b.code == brand_code)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "brand",
                id: brand_code.to_string(),
            })?;

        let integration = inner
            .integrations
            .iter()
            .find(|i| i.brand_id == brand.id && i.kind == kind)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "integration",
                id: brand_code.to_string(),
            })?;

        Ok((brand, integration))
    }

    async fn find_engage_messages(
        &self,
        filter: &EngageMessageFilter,
    ) -> Result<Vec<EngageMessage>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .engage_messages
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect())
    }

    async fn find_user(&self, id: Uuid) -> Result<User, StoreError> {
        self.inner
            .read()
            .await
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "user",
                id: id.to_string(),
            })
    }

    async fn create_conversation(
        &self,
        fields: NewConversation,
    ) -> Result<Conversation, StoreError> {
        let conversation = Conversation {
            id: Uuid::new_v4(),
            user_id: fields.user_id,
            customer_id: fields.customer_id,
            integration_id: fields.integration_id,
            content: fields.content,
            created_at: Utc::now(),
        };
        self.inner
            .write()
            .await
            .conversations
            .push(conversation.clone());
        Ok(conversation)
    }

    async fn create_message(&self, fields: NewMessage) -> Result<Message, StoreError> {
        let message = Message {
            id: Uuid::new_v4(),
            conversation_id: fields.conversation_id,
            user_id: fields.user_id,
            customer_id: fields.customer_id,
            content: fields.content,
            engage_data: fields.engage_data,
            created_at: Utc::now(),
        };
        self.inner.write().await.messages.push(message.clone());
        Ok(message)
    }

    async fn mark_customer_engaged(
        &self,
        message_id: Uuid,
        customer_id: Uuid,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let message = inner
            .engage_messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or(StoreError::NotFound {
                entity: "engage message",
                id: message_id.to_string(),
            })?;

        // Set semantics: duplicate appends are absorbed.
        if !message.engaged_customer_ids.contains(&customer_id) {
            message.engaged_customer_ids.push(customer_id);
        }
        Ok(())
    }
}
