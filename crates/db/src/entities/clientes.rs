//! `SeaORM` Entity for clientes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "clientes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub nome: String,
    pub codigo_xp: Option<String>,
    pub codigo_mb: Option<String>,
    pub modelo: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub repasse: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub net_xp: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub net_xp_global: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub net_mb: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub net_total: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::cross_sell::Entity")]
    CrossSell,
}

impl Related<super::cross_sell::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CrossSell.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
