use std::sync::Arc;

use uuid::Uuid;

use auto_engage::config::GeoConfig;
use auto_engage::geo::{GeoLocator, IpInfoLocator, StubGeoLocator};
use auto_engage::pipeline::rules::{Rule, RuleCondition, RuleKind, RuleValue};
use auto_engage::pipeline::types::BrowserInfo;
use auto_engage::pipeline::EngageOrchestrator;
use auto_engage::store::models::{
    Brand, Customer, EngageKind, EngageMessage, EngageMethod, Integration, IntegrationKind,
    MessengerData, User,
};
use auto_engage::store::MemoryStore;

/// Demo round: seeds an in-memory store with one brand, two engage messages
/// (one matching the demo visitor) and runs a single trigger.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Stub location by default; AUTO_ENGAGE_LIVE_GEO=1 exercises the live
    // ipinfo lookup instead.
    let geo: Arc<dyn GeoLocator> = if std::env::var("AUTO_ENGAGE_LIVE_GEO").as_deref() == Ok("1") {
        Arc::new(IpInfoLocator::new(GeoConfig {
            resolve_public_ip: true,
            ..GeoConfig::default()
        })?)
    } else {
        Arc::new(StubGeoLocator::default())
    };

    let store = Arc::new(MemoryStore::new());

    let brand = Brand {
        id: Uuid::new_v4(),
        code: "main-site".into(),
        name: "Main site".into(),
    };
    let integration = Integration {
        id: Uuid::new_v4(),
        brand_id: brand.id,
        kind: IntegrationKind::Messenger,
        messenger_data: Some(MessengerData::default()),
    };
    let owner = User {
        id: Uuid::new_v4(),
        full_name: "Alice Smith".into(),
        position: "Support Lead".into(),
        email: "alice@company.example".into(),
    };

    store.insert_brand(brand.clone()).await;
    store.insert_integration(integration.clone()).await;
    store.insert_user(owner.clone()).await;

    store
        .insert_engage_message(EngageMessage {
            id: Uuid::new_v4(),
            brand_id: brand.id,
            from_user_id: owner.id,
            kind: EngageKind::VisitorAuto,
            method: EngageMethod::Messenger,
            is_live: true,
            content: "Hi {{customer.name}}, I'm {{user.fullName}} — need a hand with pricing?"
                .into(),
            rules: vec![
                Rule::new(
                    RuleKind::CurrentPageUrl,
                    RuleCondition::EndsWith,
                    Some(RuleValue::Text("/pricing".into())),
                )?,
                Rule::new(
                    RuleKind::NumberOfVisits,
                    RuleCondition::GreaterThan,
                    Some(RuleValue::Number(1.0)),
                )?,
            ],
            engaged_customer_ids: Vec::new(),
        })
        .await;

    store
        .insert_engage_message(EngageMessage {
            id: Uuid::new_v4(),
            brand_id: brand.id,
            from_user_id: owner.id,
            kind: EngageKind::VisitorAuto,
            method: EngageMethod::Messenger,
            is_live: true,
            content: "Sain baina uu, {{customer.name}}!".into(),
            rules: vec![Rule::new(
                RuleKind::BrowserLanguage,
                RuleCondition::Is,
                Some(RuleValue::Text("mn".into())),
            )?],
            engaged_customer_ids: Vec::new(),
        })
        .await;

    let visitor = Customer {
        id: Uuid::new_v4(),
        name: "Bat-Erdene".into(),
        email: "bat@visitor.example".into(),
        session_count: 3,
    };
    let browser_info = BrowserInfo {
        language: Some("en".into()),
        url: Some("https://shop.example/pricing".into()),
    };

    let orchestrator = EngageOrchestrator::new(store.clone(), geo);
    let pairs = orchestrator
        .trigger("main-site", &visitor, &integration, &browser_info, "203.0.113.7")
        .await?;

    println!("{} engage message(s) fired", pairs.len());
    for pair in &pairs {
        println!(
            "conversation {} -> \"{}\"",
            pair.conversation.id, pair.message.content
        );
    }

    Ok(())
}
