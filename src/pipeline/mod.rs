//! The decision-and-action pipeline: rule evaluation, rule-set checking,
//! conversation creation, and the fan-out orchestrator.

pub mod checker;
pub mod creator;
pub mod orchestrator;
pub mod rules;
pub mod types;

pub use checker::RuleSetChecker;
pub use creator::ConversationCreator;
pub use orchestrator::EngageOrchestrator;
