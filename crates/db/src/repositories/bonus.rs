//! Bonus mission repository.

use assessoria_core::bonus::{
    BonusMission, CreateMissionInput, PayoutChannel, TaxTreatment, UpdateMissionInput,
};
use assessoria_shared::{AdvisorId, AppError, AppResult, YearMonth};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::bonus_missoes;
use crate::error::db_error;

/// Bonus mission repository.
#[derive(Debug, Clone, Copy)]
pub struct BonusRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C> BonusRepository<'a, C>
where
    C: ConnectionTrait,
{
    /// Creates a bonus repository on `conn`.
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Missions of one month, in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_month(
        &self,
        user_id: AdvisorId,
        month: YearMonth,
    ) -> AppResult<Vec<BonusMission>> {
        bonus_missoes::Entity::find()
            .filter(bonus_missoes::Column::UserId.eq(user_id.0))
            .filter(bonus_missoes::Column::Mes.eq(month.to_string()))
            .order_by_asc(bonus_missoes::Column::Id)
            .all(self.conn)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(to_mission)
            .collect()
    }

    /// Creates a mission.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input and `Conflict` if a mission with
    /// the same name already exists that month.
    pub async fn create(
        &self,
        user_id: AdvisorId,
        input: CreateMissionInput,
    ) -> AppResult<BonusMission> {
        let input = input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let model = bonus_missoes::ActiveModel {
            user_id: Set(user_id.0),
            mes: Set(input.month.to_string()),
            nome_missao: Set(input.name),
            valor_bonus: Set(input.amount),
            origem: Set(input.channel.as_str().to_string()),
            liquido_assessor: Set(input.is_net),
            ativo: Set(input.active),
            ..Default::default()
        };

        let saved = model.insert(self.conn).await.map_err(db_error)?;
        to_mission(saved)
    }

    /// Changes the given fields of a mission.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the mission does not exist for the advisor.
    pub async fn update(
        &self,
        user_id: AdvisorId,
        id: i32,
        input: UpdateMissionInput,
    ) -> AppResult<BonusMission> {
        let input = input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let existing = self.find(user_id, id).await?;
        if input.is_empty() {
            return to_mission(existing);
        }

        let mut model = existing.into_active_model();
        if let Some(name) = input.name {
            model.nome_missao = Set(name);
        }
        if let Some(amount) = input.amount {
            model.valor_bonus = Set(amount);
        }
        if let Some(channel) = input.channel {
            model.origem = Set(channel.as_str().to_string());
        }
        if let Some(is_net) = input.is_net {
            model.liquido_assessor = Set(is_net);
        }
        if let Some(active) = input.active {
            model.ativo = Set(active);
        }

        let saved = model.update(self.conn).await.map_err(db_error)?;
        to_mission(saved)
    }

    /// Activates or deactivates a mission.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the mission does not exist for the advisor.
    pub async fn set_active(
        &self,
        user_id: AdvisorId,
        id: i32,
        active: bool,
    ) -> AppResult<BonusMission> {
        self.update(
            user_id,
            id,
            UpdateMissionInput {
                active: Some(active),
                ..Default::default()
            },
        )
        .await
    }

    /// Deletes a mission.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing was deleted.
    pub async fn delete(&self, user_id: AdvisorId, id: i32) -> AppResult<()> {
        let result = bonus_missoes::Entity::delete_many()
            .filter(bonus_missoes::Column::Id.eq(id))
            .filter(bonus_missoes::Column::UserId.eq(user_id.0))
            .exec(self.conn)
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("bonus mission {id}")));
        }
        Ok(())
    }

    async fn find(&self, user_id: AdvisorId, id: i32) -> AppResult<bonus_missoes::Model> {
        bonus_missoes::Entity::find_by_id(id)
            .filter(bonus_missoes::Column::UserId.eq(user_id.0))
            .one(self.conn)
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::NotFound(format!("bonus mission {id}")))
    }
}

fn to_mission(model: bonus_missoes::Model) -> AppResult<BonusMission> {
    let integrity = |e: String| AppError::DataIntegrity(format!("bonus mission {}: {e}", model.id));
    let month = model.mes.parse().map_err(|e| integrity(format!("{e}")))?;
    let channel: PayoutChannel = model.origem.parse().map_err(|e| integrity(format!("{e}")))?;

    Ok(BonusMission {
        id: model.id,
        user_id: AdvisorId::from_uuid(model.user_id),
        month,
        name: model.nome_missao,
        amount: model.valor_bonus,
        channel,
        tax_treatment: TaxTreatment::from_net_flag(model.liquido_assessor),
        active: model.ativo,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn stored(origem: &str, liquido: bool) -> bonus_missoes::Model {
        let now = chrono::Utc::now().into();
        bonus_missoes::Model {
            id: 3,
            user_id: Uuid::new_v4(),
            mes: "2025-02".to_string(),
            nome_missao: "Previdência".to_string(),
            valor_bonus: dec!(1000),
            origem: origem.to_string(),
            liquido_assessor: liquido,
            ativo: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_to_mission_maps_flags() {
        let mission = to_mission(stored("MB", false)).unwrap();
        assert_eq!(mission.channel, PayoutChannel::Mb);
        assert_eq!(mission.tax_treatment, TaxTreatment::Gross);
        assert_eq!(mission.month.to_string(), "2025-02");
    }

    #[test]
    fn test_to_mission_rejects_unknown_channel() {
        assert!(matches!(
            to_mission(stored("BTG", true)),
            Err(AppError::DataIntegrity(_))
        ));
    }
}
