//! RBAC rule definitions
//!
//! Rules are persisted in a positional layout (`ptype`, `v0`..`v5`) shared by
//! every rule shape. In memory they are the tagged [`RuleKind`] so that each
//! shape carries exactly the fields it needs.

use crate::utils::error::{ArmoryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of positional value columns in the rule table
pub const FIELD_COUNT: usize = 6;

/// Longest value a rule field may hold; matches the width of `v0`..`v5`
pub const MAX_FIELD_LEN: usize = 255;

/// Wildcard accepted in the object and action fields of permission rules
pub const WILDCARD: &str = "*";

/// Persisted rule type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleType {
    /// `g` rows: subject holds role
    Grouping,
    /// `p` rows: subject may perform action on object
    Permission,
}

impl RuleType {
    /// Tag stored in the `ptype` column
    pub fn as_ptype(&self) -> &'static str {
        match self {
            RuleType::Grouping => "g",
            RuleType::Permission => "p",
        }
    }

    /// Parse a `ptype` column value
    pub fn from_ptype(ptype: &str) -> Option<Self> {
        match ptype {
            "g" => Some(RuleType::Grouping),
            "p" => Some(RuleType::Permission),
            _ => None,
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ptype())
    }
}

/// A single authorization fact
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleKind {
    /// `subject` holds `role`; `subject` may itself be a role
    Grouping { subject: String, role: String },
    /// `subject` (a user or a role) may perform `action` on `object`
    Permission {
        subject: String,
        object: String,
        action: String,
    },
}

impl RuleKind {
    pub fn grouping(subject: impl Into<String>, role: impl Into<String>) -> Self {
        RuleKind::Grouping {
            subject: subject.into(),
            role: role.into(),
        }
    }

    pub fn permission(
        subject: impl Into<String>,
        object: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        RuleKind::Permission {
            subject: subject.into(),
            object: object.into(),
            action: action.into(),
        }
    }

    pub fn rule_type(&self) -> RuleType {
        match self {
            RuleKind::Grouping { .. } => RuleType::Grouping,
            RuleKind::Permission { .. } => RuleType::Permission,
        }
    }

    pub fn subject(&self) -> &str {
        match self {
            RuleKind::Grouping { subject, .. } | RuleKind::Permission { subject, .. } => subject,
        }
    }

    /// Positional values as stored in `v0`..`v5`, unused columns empty
    pub fn to_values(&self) -> [String; FIELD_COUNT] {
        let mut values: [String; FIELD_COUNT] = Default::default();
        match self {
            RuleKind::Grouping { subject, role } => {
                values[0] = subject.clone();
                values[1] = role.clone();
            }
            RuleKind::Permission {
                subject,
                object,
                action,
            } => {
                values[0] = subject.clone();
                values[1] = object.clone();
                values[2] = action.clone();
            }
        }
        values
    }

    /// Rebuild a rule from its stored tag and positional values
    pub fn from_values(rule_type: RuleType, values: &[String]) -> Result<Self> {
        let field = |idx: usize| -> Result<String> {
            match values.get(idx) {
                Some(value) if !value.is_empty() => Ok(value.clone()),
                _ => Err(ArmoryError::policy_load(format!(
                    "malformed {} rule: field v{} is empty",
                    rule_type, idx
                ))),
            }
        };

        match rule_type {
            RuleType::Grouping => Ok(RuleKind::Grouping {
                subject: field(0)?,
                role: field(1)?,
            }),
            RuleType::Permission => Ok(RuleKind::Permission {
                subject: field(0)?,
                object: field(1)?,
                action: field(2)?,
            }),
        }
    }

    /// Filter matching exactly this rule's natural key
    pub fn exact_filter(&self) -> RuleFilter {
        let mut filter = RuleFilter::new().rule_type(self.rule_type());
        for (idx, value) in self.to_values().into_iter().enumerate() {
            filter.values[idx] = Some(value);
        }
        filter
    }

    /// Reject rules with empty required fields, over-long fields, or a role
    /// granted to itself
    pub fn validate(&self) -> Result<()> {
        let values = self.to_values();
        let required = match self.rule_type() {
            RuleType::Grouping => 2,
            RuleType::Permission => 3,
        };
        if let Some(idx) = values[..required].iter().position(|v| v.trim().is_empty()) {
            return Err(ArmoryError::validation(format!(
                "{} rule field v{} must not be empty",
                self.rule_type(),
                idx
            )));
        }
        if let Some(idx) = values
            .iter()
            .position(|v| v.chars().count() > MAX_FIELD_LEN)
        {
            return Err(ArmoryError::validation(format!(
                "{} rule field v{} exceeds {} characters",
                self.rule_type(),
                idx,
                MAX_FIELD_LEN
            )));
        }
        if let RuleKind::Grouping { subject, role } = self {
            if subject == role {
                return Err(ArmoryError::validation(format!(
                    "'{}' cannot be granted to itself",
                    role
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Grouping { subject, role } => write!(f, "g, {}, {}", subject, role),
            RuleKind::Permission {
                subject,
                object,
                action,
            } => write!(f, "p, {}, {}, {}", subject, object, action),
        }
    }
}

/// Partial-tuple filter over stored rules
///
/// `None` fields match anything; `Some` fields require equality.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFilter {
    pub rule_type: Option<RuleType>,
    pub values: [Option<String>; FIELD_COUNT],
}

impl RuleFilter {
    /// Filter matching every rule
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule_type(mut self, rule_type: RuleType) -> Self {
        self.rule_type = Some(rule_type);
        self
    }

    /// Require positional field `idx` to equal `value`
    ///
    /// Indexes past the last column are ignored.
    pub fn field(mut self, idx: usize, value: impl Into<String>) -> Self {
        if idx < FIELD_COUNT {
            self.values[idx] = Some(value.into());
        }
        self
    }

    /// Every role assignment of `subject`
    pub fn groupings_of(subject: impl Into<String>) -> Self {
        Self::new().rule_type(RuleType::Grouping).field(0, subject)
    }

    /// Every holder of `role`
    pub fn holders_of(role: impl Into<String>) -> Self {
        Self::new().rule_type(RuleType::Grouping).field(1, role)
    }

    /// The assignment `subject -> role`
    pub fn assignment(subject: impl Into<String>, role: impl Into<String>) -> Self {
        Self::groupings_of(subject).field(1, role)
    }

    /// Whether `rule` satisfies this filter
    pub fn matches(&self, rule: &RuleKind) -> bool {
        if self.rule_type.is_some_and(|t| t != rule.rule_type()) {
            return false;
        }
        let values = rule.to_values();
        self.values
            .iter()
            .zip(values.iter())
            .all(|(wanted, actual)| wanted.as_ref().is_none_or(|w| w == actual))
    }
}
