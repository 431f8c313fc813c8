//! `SeaORM` Entity for bonus_missoes table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bonus_missoes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Uuid,
    /// `YYYY-MM`.
    pub mes: String,
    pub nome_missao: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub valor_bonus: Decimal,
    /// `XP` or `MB`.
    pub origem: String,
    /// True if `valor_bonus` is already net of retention.
    pub liquido_assessor: bool,
    pub ativo: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
