//! Monthly goal repository.

use assessoria_core::goals::{MonthlyGoal, validate_target};
use assessoria_shared::{AdvisorId, AppError, AppResult, YearMonth};
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::metas_mensais;
use crate::error::db_error;

/// Monthly goal repository.
#[derive(Debug, Clone, Copy)]
pub struct GoalRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C> GoalRepository<'a, C>
where
    C: ConnectionTrait,
{
    /// Creates a goal repository on `conn`.
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Goal of one month, if set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, user_id: AdvisorId, month: YearMonth) -> AppResult<Option<MonthlyGoal>> {
        metas_mensais::Entity::find()
            .filter(metas_mensais::Column::UserId.eq(user_id.0))
            .filter(metas_mensais::Column::Mes.eq(month.to_string()))
            .one(self.conn)
            .await
            .map_err(db_error)?
            .map(to_goal)
            .transpose()
    }

    /// Goals of the advisor, newest month first, optionally for one month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        user_id: AdvisorId,
        month: Option<YearMonth>,
    ) -> AppResult<Vec<MonthlyGoal>> {
        let mut query =
            metas_mensais::Entity::find().filter(metas_mensais::Column::UserId.eq(user_id.0));
        if let Some(month) = month {
            query = query.filter(metas_mensais::Column::Mes.eq(month.to_string()));
        }

        query
            .order_by_desc(metas_mensais::Column::Mes)
            .all(self.conn)
            .await
            .map_err(db_error)?
            .into_iter()
            .map(to_goal)
            .collect()
    }

    /// Sets the goal of a month.
    ///
    /// A single `INSERT .. ON CONFLICT (user_id, mes) DO UPDATE`, so
    /// concurrent submissions converge on one row.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a negative or oversized target.
    pub async fn upsert(
        &self,
        user_id: AdvisorId,
        month: YearMonth,
        target: Decimal,
    ) -> AppResult<MonthlyGoal> {
        let target = validate_target(target).map_err(|e| AppError::Validation(e.to_string()))?;

        let model = metas_mensais::ActiveModel {
            user_id: Set(user_id.0),
            mes: Set(month.to_string()),
            meta_receita: Set(target),
            ..Default::default()
        };

        let saved = metas_mensais::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([metas_mensais::Column::UserId, metas_mensais::Column::Mes])
                    .update_column(metas_mensais::Column::MetaReceita)
                    .to_owned(),
            )
            .exec_with_returning(self.conn)
            .await
            .map_err(db_error)?;

        tracing::debug!(user_id = %user_id, month = %month, target = %target, "goal saved");
        to_goal(saved)
    }
}

fn to_goal(model: metas_mensais::Model) -> AppResult<MonthlyGoal> {
    let month = model
        .mes
        .parse()
        .map_err(|e| AppError::DataIntegrity(format!("goal {}: {e}", model.id)))?;
    Ok(MonthlyGoal {
        user_id: AdvisorId::from_uuid(model.user_id),
        month,
        target: model.meta_receita,
    })
}
