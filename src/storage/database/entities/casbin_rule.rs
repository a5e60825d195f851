use crate::auth::rbac::{FIELD_COUNT, RuleKind, RuleType};
use crate::utils::error::{ArmoryError, Result as ArmoryResult};
use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};

/// Policy rule database model
///
/// One row per rule in the positional `ptype, v0..v5` layout; unused value
/// columns hold the empty string so the natural-key unique index covers them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "casbin_rule")]
pub struct Model {
    /// Row ID
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Rule type tag (`g` grouping, `p` permission)
    pub ptype: String,

    pub v0: String,
    pub v1: String,
    pub v2: String,
    pub v3: String,
    pub v4: String,
    pub v5: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Positional values in column order
    pub fn values(&self) -> [String; FIELD_COUNT] {
        [
            self.v0.clone(),
            self.v1.clone(),
            self.v2.clone(),
            self.v3.clone(),
            self.v4.clone(),
            self.v5.clone(),
        ]
    }

    /// Convert a stored row into a typed rule
    pub fn to_rule(&self) -> ArmoryResult<RuleKind> {
        let rule_type = RuleType::from_ptype(&self.ptype).ok_or_else(|| {
            ArmoryError::policy_load(format!(
                "unknown ptype '{}' in rule row {}",
                self.ptype, self.id
            ))
        })?;
        RuleKind::from_values(rule_type, &self.values())
    }

    /// Convert a typed rule into an insertable active model
    pub fn from_rule(rule: &RuleKind) -> ActiveModel {
        let [v0, v1, v2, v3, v4, v5] = rule.to_values();
        ActiveModel {
            id: NotSet,
            ptype: Set(rule.rule_type().as_ptype().to_string()),
            v0: Set(v0),
            v1: Set(v1),
            v2: Set(v2),
            v3: Set(v3),
            v4: Set(v4),
            v5: Set(v5),
        }
    }
}

/// Column holding positional value `idx`
pub fn value_column(idx: usize) -> Option<Column> {
    match idx {
        0 => Some(Column::V0),
        1 => Some(Column::V1),
        2 => Some(Column::V2),
        3 => Some(Column::V3),
        4 => Some(Column::V4),
        5 => Some(Column::V5),
        _ => None,
    }
}
