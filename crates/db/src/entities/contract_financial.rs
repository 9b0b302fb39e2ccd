//! `SeaORM` Entity for contract_financial table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "contract_financial")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub contract_id: i64,
    pub active: bool,
    pub recovery_status_id: i32,
    pub doubtful: bool,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub payment: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub capital_arrears: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub interest_arrears: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub capital_provisioned: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub capital_provisioned_bdp: Decimal,
    pub financial_schedule_end_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::contract::Entity",
        from = "Column::ContractId",
        to = "super::contract::Column::Id"
    )]
    Contract,
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
