//! Client repository.
//!
//! Clients are imported elsewhere; this service only reads them.

use assessoria_core::revenue::{ClientModel, ClientPosition};
use assessoria_shared::types::{PageRequest, PageResponse};
use assessoria_shared::{AdvisorId, AppResult, ClientId};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::entities::clientes;
use crate::error::db_error;

/// Client repository.
#[derive(Debug, Clone, Copy)]
pub struct ClientRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C> ClientRepository<'a, C>
where
    C: ConnectionTrait,
{
    /// Creates a client repository on `conn`.
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Every client of the advisor, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_positions(&self, user_id: AdvisorId) -> AppResult<Vec<ClientPosition>> {
        let clients = clientes::Entity::find()
            .filter(clientes::Column::UserId.eq(user_id.0))
            .order_by_asc(clientes::Column::Nome)
            .order_by_asc(clientes::Column::Id)
            .all(self.conn)
            .await
            .map_err(db_error)?;

        Ok(clients.into_iter().map(to_position).collect())
    }

    /// One page of clients, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_page(
        &self,
        user_id: AdvisorId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ClientPosition>> {
        let query = clientes::Entity::find().filter(clientes::Column::UserId.eq(user_id.0));

        let total = query.clone().count(self.conn).await.map_err(db_error)?;
        // `id` breaks ties between equal names so pages never overlap.
        let clients = query
            .order_by_asc(clientes::Column::Nome)
            .order_by_asc(clientes::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(self.conn)
            .await
            .map_err(db_error)?;

        Ok(PageResponse::new(
            clients.into_iter().map(to_position).collect(),
            page,
            total,
        ))
    }

    /// Whether the advisor can see `client_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn exists(&self, user_id: AdvisorId, client_id: ClientId) -> AppResult<bool> {
        let count = clientes::Entity::find_by_id(client_id.0)
            .filter(clientes::Column::UserId.eq(user_id.0))
            .count(self.conn)
            .await
            .map_err(db_error)?;
        Ok(count > 0)
    }
}

fn to_position(model: clientes::Model) -> ClientPosition {
    ClientPosition {
        id: ClientId::from_uuid(model.id),
        name: model.nome,
        code_xp: model.codigo_xp,
        code_mb: model.codigo_mb,
        model: ClientModel::parse_lenient(model.modelo.as_deref()),
        pass_through: model.repasse,
        net_total: model.net_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_to_position_defaults_unknown_model() {
        let now = chrono::Utc::now().into();
        let model = clientes::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            nome: "Maria".to_string(),
            codigo_xp: Some("XP-123".to_string()),
            codigo_mb: None,
            modelo: Some("desconhecido".to_string()),
            repasse: dec!(35),
            net_xp: dec!(1000),
            net_xp_global: dec!(0),
            net_mb: dec!(500),
            net_total: dec!(1500),
            created_at: now,
            updated_at: now,
        };

        let position = to_position(model);
        assert_eq!(position.model, ClientModel::Tradicional);
        assert_eq!(position.pass_through, dec!(35));
        assert_eq!(position.net_total, dec!(1500));
    }
}
