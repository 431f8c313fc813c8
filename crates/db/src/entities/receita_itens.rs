//! `SeaORM` Entity for receita_itens table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "receita_itens")]
pub struct Model {
    /// Unique monotonic key used for page boundaries.
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Uuid,
    /// `YYYY-MM`.
    pub data_ref: String,
    pub cliente_codigo: Option<String>,
    pub cliente_nome: Option<String>,
    pub origem: Option<String>,
    pub familia: Option<String>,
    pub produto: Option<String>,
    pub categoria: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub valor_bruto: Decimal,
    #[sea_orm(column_type = "Decimal(Some((7, 4)))")]
    pub imposto_pct: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub valor_liquido: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub comissao_bruta: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub comissao_liquida: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub comissao_escritorio: Decimal,
    pub modelo: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
