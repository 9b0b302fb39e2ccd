//! `SeaORM` Entity for contract_schedule table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Installment type id of rental rows.
pub const RENTAL_INSTALLMENT_TYPE: i32 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "contract_schedule")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub contract_id: i64,
    pub contract_installment_type_id: i32,
    pub monthly_date: Date,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub capital: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub interest: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub capital_paid: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub interest_paid: Decimal,
    pub daily_entry_issued: bool,
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
