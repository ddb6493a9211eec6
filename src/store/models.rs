//! Storage entities consumed and produced by the engagement pipeline.
//!
//! These mirror the document store's shapes at the interface boundary; the
//! store itself (schema, persistence) lives behind [`super::EngageStore`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::rules::Rule;

/// Integration channel type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntegrationKind {
    Messenger,
    Form,
}

/// How an engage message is configured to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EngageKind {
    /// Fires automatically for site visitors matching its rules.
    VisitorAuto,
    /// Fires automatically for known customers.
    Auto,
    /// Sent by hand.
    Manual,
}

/// Delivery channel of an engage message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EngageMethod {
    Messenger,
    Email,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

/// Messenger widget configuration attached to an integration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessengerData {
    /// When set, the widget shows no conversation list and no engage
    /// message may fire.
    #[serde(default)]
    pub hide_conversation_list: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub kind: IntegrationKind,
    pub messenger_data: Option<MessengerData>,
}

/// A configured auto-trigger template with targeting rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngageMessage {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub from_user_id: Uuid,
    pub kind: EngageKind,
    pub method: EngageMethod,
    pub is_live: bool,
    /// Template text with `{{customer.*}}` / `{{user.*}}` placeholders.
    pub content: String,
    pub rules: Vec<Rule>,
    /// Customers this message has already fired for. Append-only set.
    #[serde(default)]
    pub engaged_customer_ids: Vec<Uuid>,
}

/// Site visitor, read-only input to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    /// Number of messenger sessions this visitor has opened.
    pub session_count: u32,
}

/// Team member owning an engage message, resolved by `from_user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub position: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub customer_id: Uuid,
    pub integration_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub customer_id: Uuid,
    pub content: String,
    /// Present when this message originated from an auto-engagement, so
    /// downstream delivery knows which template fired.
    pub engage_data: Option<EngageData>,
    pub created_at: DateTime<Utc>,
}

/// Provenance metadata carried on auto-engagement messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngageData {
    /// The engage message template that fired.
    pub message_id: Uuid,
    pub from_user_id: Uuid,
    pub kind: EngageKind,
    /// The raw (unrendered) template content.
    pub content: String,
}

/// Fields for a new conversation record.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub user_id: Uuid,
    pub customer_id: Uuid,
    pub integration_id: Uuid,
    pub content: String,
}

/// Fields for a new message record.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub customer_id: Uuid,
    pub content: String,
    pub engage_data: Option<EngageData>,
}
