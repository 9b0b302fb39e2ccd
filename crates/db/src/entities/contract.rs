//! `SeaORM` Entity for contract table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "contract")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub reference: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::contract_schedule::Entity")]
    ContractSchedule,
    #[sea_orm(has_one = "super::contract_financial::Entity")]
    ContractFinancial,
}

impl Related<super::contract_schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContractSchedule.def()
    }
}

impl Related<super::contract_financial::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContractFinancial.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
