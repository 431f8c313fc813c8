//! Cross-sell repository.

use std::collections::BTreeMap;

use assessoria_core::cross_sell::{CrossSellProduct, CrossSellStatus, ProductStatus};
use assessoria_shared::{AdvisorId, AppError, AppResult, ClientId};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Serialize;

use super::client::ClientRepository;
use crate::entities::cross_sell;
use crate::error::db_error;

/// Statuses of one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientCrossSell {
    /// Client the statuses belong to.
    pub client_id: ClientId,
    /// Product statuses.
    pub status: CrossSellStatus,
}

/// Cross-sell repository.
#[derive(Debug, Clone, Copy)]
pub struct CrossSellRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C> CrossSellRepository<'a, C>
where
    C: ConnectionTrait,
{
    /// Creates a cross-sell repository on `conn`.
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Every record of the advisor.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored status is invalid.
    pub async fn list(&self, user_id: AdvisorId) -> AppResult<Vec<ClientCrossSell>> {
        cross_sell::Entity::find()
            .filter(cross_sell::Column::UserId.eq(user_id.0))
            .order_by_asc(cross_sell::Column::Id)
            .all(self.conn)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(to_client_cross_sell)
            .collect()
    }

    /// Statuses of one client, if recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored status is invalid.
    pub async fn get(
        &self,
        user_id: AdvisorId,
        client_id: ClientId,
    ) -> AppResult<Option<CrossSellStatus>> {
        let record = cross_sell::Entity::find()
            .filter(cross_sell::Column::UserId.eq(user_id.0))
            .filter(cross_sell::Column::ClienteId.eq(client_id.0))
            .one(self.conn)
            .await
            .map_err(db_error)?;

        record
            .map(|r| to_client_cross_sell(r).map(|c| c.status))
            .transpose()
    }

    /// Inserts or replaces the statuses of a client.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the client is not visible to the advisor.
    pub async fn upsert(
        &self,
        user_id: AdvisorId,
        client_id: ClientId,
        status: &CrossSellStatus,
    ) -> AppResult<CrossSellStatus> {
        if !ClientRepository::new(self.conn)
            .exists(user_id, client_id)
            .await?
        {
            return Err(AppError::NotFound(format!("client {client_id}")));
        }

        let model = cross_sell::ActiveModel {
            cliente_id: Set(client_id.0),
            user_id: Set(user_id.0),
            fee_based: Set(status.fee_based.as_str().to_string()),
            financial_planning: Set(status.financial_planning.as_str().to_string()),
            mb: Set(status.mb.as_str().to_string()),
            offshore: Set(status.offshore.as_str().to_string()),
            produto_estruturado: Set(status.produto_estruturado.as_str().to_string()),
            asset: Set(status.asset.as_str().to_string()),
            seguro_vida: Set(status.seguro_vida.as_str().to_string()),
            consorcio: Set(status.consorcio.as_str().to_string()),
            wealth: Set(status.wealth.as_str().to_string()),
            ..Default::default()
        };

        let saved = cross_sell::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([cross_sell::Column::ClienteId, cross_sell::Column::UserId])
                    .update_columns([
                        cross_sell::Column::FeeBased,
                        cross_sell::Column::FinancialPlanning,
                        cross_sell::Column::Mb,
                        cross_sell::Column::Offshore,
                        cross_sell::Column::ProdutoEstruturado,
                        cross_sell::Column::Asset,
                        cross_sell::Column::SeguroVida,
                        cross_sell::Column::Consorcio,
                        cross_sell::Column::Wealth,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.conn)
            .await
            .map_err(db_error)?;

        to_client_cross_sell(saved).map(|c| c.status)
    }

    /// Applies a partial `{column: status}` map to a client.
    ///
    /// Every key and value is validated before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an unknown product or status.
    pub async fn apply_updates(
        &self,
        user_id: AdvisorId,
        client_id: ClientId,
        updates: &BTreeMap<String, String>,
    ) -> AppResult<CrossSellStatus> {
        let mut status = self.get(user_id, client_id).await?.unwrap_or_default();
        status
            .apply_updates(updates)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.upsert(user_id, client_id, &status).await
    }

    /// Removes the record of a client.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there was nothing to delete.
    pub async fn delete(&self, user_id: AdvisorId, client_id: ClientId) -> AppResult<()> {
        let result = cross_sell::Entity::delete_many()
            .filter(cross_sell::Column::UserId.eq(user_id.0))
            .filter(cross_sell::Column::ClienteId.eq(client_id.0))
            .exec(self.conn)
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("cross-sell for client {client_id}")));
        }
        Ok(())
    }
}

fn to_client_cross_sell(model: cross_sell::Model) -> AppResult<ClientCrossSell> {
    let columns = [
        (CrossSellProduct::FeeBased, &model.fee_based),
        (CrossSellProduct::FinancialPlanning, &model.financial_planning),
        (CrossSellProduct::Mb, &model.mb),
        (CrossSellProduct::Offshore, &model.offshore),
        (CrossSellProduct::ProdutoEstruturado, &model.produto_estruturado),
        (CrossSellProduct::Asset, &model.asset),
        (CrossSellProduct::SeguroVida, &model.seguro_vida),
        (CrossSellProduct::Consorcio, &model.consorcio),
        (CrossSellProduct::Wealth, &model.wealth),
    ];

    let mut status = CrossSellStatus::default();
    for (product, value) in columns {
        let parsed = ProductStatus::parse_for(product, value)
            .map_err(|e| AppError::DataIntegrity(format!("record {}: {e}", model.id)))?;
        status.set(product, parsed);
    }

    Ok(ClientCrossSell {
        client_id: ClientId::from_uuid(model.cliente_id),
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn record(fee_based: &str, wealth: &str) -> cross_sell::Model {
        let now = chrono::Utc::now().into();
        cross_sell::Model {
            id: 7,
            cliente_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            fee_based: fee_based.to_string(),
            financial_planning: String::new(),
            mb: String::new(),
            offshore: String::new(),
            produto_estruturado: String::new(),
            asset: String::new(),
            seguro_vida: String::new(),
            consorcio: String::new(),
            wealth: wealth.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_stored_columns_map_to_status() {
        let converted = to_client_cross_sell(record("Booked", "Presented")).unwrap();
        assert_eq!(converted.status.fee_based, ProductStatus::Booked);
        assert_eq!(converted.status.wealth, ProductStatus::Presented);
        assert_eq!(converted.status.mb, ProductStatus::Blank);
    }

    #[test]
    fn test_corrupt_stored_value_is_integrity_error() {
        let err = to_client_cross_sell(record("Sim", "")).unwrap_err();
        assert!(matches!(err, AppError::DataIntegrity(_)));
    }
}
