//! Targeting rules — one rule is a (field, condition, value) predicate
//! evaluated against a visitor-context snapshot.
//!
//! Kinds and conditions are closed enums; a kind × condition × value
//! combination that cannot be evaluated is a [`RuleError`], never a silent
//! pass or a crash. Evaluation itself is pure and synchronous.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;
use crate::pipeline::types::VisitorContext;

/// Which visitor-context field a rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    BrowserLanguage,
    CurrentPageUrl,
    City,
    Country,
    NumberOfVisits,
}

impl RuleKind {
    /// City/country rules require the geolocation round trip.
    pub fn needs_location(self) -> bool {
        matches!(self, Self::City | Self::Country)
    }

    fn is_text(self) -> bool {
        !matches!(self, Self::NumberOfVisits)
    }
}

/// Comparison operator applied to the targeted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleCondition {
    Is,
    IsNot,
    IsUnknown,
    HasAnyValue,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
}

impl RuleCondition {
    /// Presence checks carry no comparison value.
    fn requires_value(self) -> bool {
        !matches!(self, Self::IsUnknown | Self::HasAnyValue)
    }
}

/// Comparison value — configured as either a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Number(f64),
    Text(String),
}

/// One targeting predicate, owned by an engage message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub kind: RuleKind,
    pub condition: RuleCondition,
    #[serde(default)]
    pub value: Option<RuleValue>,
}

/// The field value a rule resolves from the context.
enum Field<'a> {
    Text(Option<&'a str>),
    Count(u32),
}

impl Field<'_> {
    /// Presence semantics: absent or empty text is unset, and a visit
    /// count of zero is unset.
    fn is_set(&self) -> bool {
        match self {
            Field::Text(value) => value.is_some_and(|s| !s.is_empty()),
            Field::Count(n) => *n > 0,
        }
    }
}

impl Rule {
    /// Validating constructor. Rules built elsewhere (e.g. deserialized from
    /// stored configuration) are re-validated at evaluation time.
    pub fn new(
        kind: RuleKind,
        condition: RuleCondition,
        value: Option<RuleValue>,
    ) -> Result<Self, RuleError> {
        let rule = Self {
            kind,
            condition,
            value,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Reject combinations that cannot be evaluated.
    pub fn validate(&self) -> Result<(), RuleError> {
        if self.condition.requires_value() && self.value.is_none() {
            return Err(RuleError::MissingValue {
                condition: self.condition,
            });
        }

        match self.condition {
            RuleCondition::StartsWith | RuleCondition::EndsWith => {
                if !self.kind.is_text() {
                    return Err(RuleError::InvalidCombination {
                        kind: self.kind,
                        condition: self.condition,
                    });
                }
                if !matches!(self.value, Some(RuleValue::Text(_))) {
                    return Err(RuleError::ValueType {
                        condition: self.condition,
                        expected: "string",
                    });
                }
            }
            RuleCondition::GreaterThan | RuleCondition::LessThan => {
                let expected_number = !self.kind.is_text();
                match (&self.value, expected_number) {
                    (Some(RuleValue::Number(_)), true) | (Some(RuleValue::Text(_)), false) => {}
                    (_, true) => {
                        return Err(RuleError::ValueType {
                            condition: self.condition,
                            expected: "number",
                        });
                    }
                    (_, false) => {
                        return Err(RuleError::ValueType {
                            condition: self.condition,
                            expected: "string",
                        });
                    }
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Evaluate this rule against a context snapshot.
    pub fn evaluate(&self, ctx: &VisitorContext) -> Result<bool, RuleError> {
        self.validate()?;

        let field = match self.kind {
            RuleKind::BrowserLanguage => Field::Text(ctx.browser_language.as_deref()),
            RuleKind::CurrentPageUrl => Field::Text(ctx.current_page_url.as_deref()),
            RuleKind::City => Field::Text(ctx.city.as_deref()),
            RuleKind::Country => Field::Text(ctx.country.as_deref()),
            RuleKind::NumberOfVisits => Field::Count(ctx.number_of_visits),
        };

        match self.condition {
            RuleCondition::Is => Ok(self.equals(&field)?),
            RuleCondition::IsNot => Ok(!self.equals(&field)?),
            RuleCondition::IsUnknown => Ok(!field.is_set()),
            RuleCondition::HasAnyValue => Ok(field.is_set()),
            RuleCondition::StartsWith => {
                let (text, prefix) = self.text_operands(&field)?;
                Ok(text.starts_with(prefix))
            }
            RuleCondition::EndsWith => {
                let (text, suffix) = self.text_operands(&field)?;
                Ok(text.ends_with(suffix))
            }
            RuleCondition::GreaterThan => {
                Ok(self.compare(&field)? == Some(Ordering::Greater))
            }
            RuleCondition::LessThan => Ok(self.compare(&field)? == Some(Ordering::Less)),
        }
    }

    fn value(&self) -> Result<&RuleValue, RuleError> {
        self.value.as_ref().ok_or(RuleError::MissingValue {
            condition: self.condition,
        })
    }

    /// Type-aware equality: text compares to text, counts to numbers; a
    /// cross-type comparison is simply unequal.
    fn equals(&self, field: &Field<'_>) -> Result<bool, RuleError> {
        Ok(match (field, self.value()?) {
            (Field::Text(Some(s)), RuleValue::Text(v)) => *s == v.as_str(),
            (Field::Count(n), RuleValue::Number(v)) => f64::from(*n) == *v,
            _ => false,
        })
    }

    /// Both ordering conditions fail on an unresolved field: an absent
    /// value is never greater or less than anything.
    fn compare(&self, field: &Field<'_>) -> Result<Option<Ordering>, RuleError> {
        Ok(match (field, self.value()?) {
            (Field::Count(n), RuleValue::Number(v)) => f64::from(*n).partial_cmp(v),
            (Field::Text(Some(s)), RuleValue::Text(v)) => Some((*s).cmp(v.as_str())),
            (Field::Text(None), _) => None,
            _ => {
                return Err(RuleError::ValueType {
                    condition: self.condition,
                    expected: if self.kind.is_text() { "string" } else { "number" },
                });
            }
        })
    }

    fn text_operands<'a>(&'a self, field: &Field<'a>) -> Result<(&'a str, &'a str), RuleError> {
        let text = match field {
            Field::Text(Some(s)) => *s,
            Field::Text(None) => {
                return Err(RuleError::UnresolvedField {
                    kind: self.kind,
                    condition: self.condition,
                });
            }
            Field::Count(_) => {
                return Err(RuleError::InvalidCombination {
                    kind: self.kind,
                    condition: self.condition,
                });
            }
        };
        match self.value()? {
            RuleValue::Text(v) => Ok((text, v.as_str())),
            RuleValue::Number(_) => Err(RuleError::ValueType {
                condition: self.condition,
                expected: "string",
            }),
        }
    }
}
