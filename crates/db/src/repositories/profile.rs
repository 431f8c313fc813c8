//! Profile repository.

use assessoria_shared::{AdvisorId, AppError, AppResult};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, Set};
use serde::Deserialize;

use crate::entities::profiles;
use crate::error::db_error;

/// Longest accepted display name.
pub const MAX_NAME_LEN: usize = 200;
/// Longest accepted advisor code.
pub const MAX_CODE_LEN: usize = 50;

/// Editable profile fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileInput {
    /// Display name.
    pub nome: Option<String>,
    /// Advisor code at the custody house.
    pub codigo_xp: Option<String>,
}

impl UpdateProfileInput {
    /// Trims the fields and checks their lengths.
    ///
    /// A blank `codigo_xp` clears the code; a blank `nome` is rejected.
    pub fn validate(self) -> AppResult<Self> {
        let nome = match self.nome.map(|n| n.trim().to_string()) {
            Some(n) if n.is_empty() => {
                return Err(AppError::Validation("nome must not be empty".to_string()));
            }
            Some(n) if n.chars().count() > MAX_NAME_LEN => {
                return Err(AppError::Validation(format!(
                    "nome must be at most {MAX_NAME_LEN} characters"
                )));
            }
            other => other,
        };

        let codigo_xp = self.codigo_xp.map(|c| c.trim().to_string());
        if codigo_xp
            .as_ref()
            .is_some_and(|c| c.chars().count() > MAX_CODE_LEN)
        {
            return Err(AppError::Validation(format!(
                "codigo_xp must be at most {MAX_CODE_LEN} characters"
            )));
        }

        Ok(Self { nome, codigo_xp })
    }
}

/// Profile repository.
#[derive(Debug, Clone, Copy)]
pub struct ProfileRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C> ProfileRepository<'a, C>
where
    C: ConnectionTrait,
{
    /// Creates a profile repository on `conn`.
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Profile of the advisor.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the sign-up trigger has not created it.
    pub async fn get(&self, user_id: AdvisorId) -> AppResult<profiles::Model> {
        profiles::Entity::find_by_id(user_id.0)
            .one(self.conn)
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::NotFound(format!("profile {user_id}")))
    }

    /// Updates the editable fields.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input and `NotFound` for a missing profile.
    pub async fn update(
        &self,
        user_id: AdvisorId,
        input: UpdateProfileInput,
    ) -> AppResult<profiles::Model> {
        let input = input.validate()?;
        let existing = self.get(user_id).await?;
        if input.nome.is_none() && input.codigo_xp.is_none() {
            return Ok(existing);
        }

        let mut model = existing.into_active_model();
        if let Some(nome) = input.nome {
            model.nome = Set(Some(nome));
        }
        if let Some(codigo) = input.codigo_xp {
            model.codigo_xp = Set((!codigo.is_empty()).then_some(codigo));
        }

        model.update(self.conn).await.map_err(db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_and_clears_code() {
        let input = UpdateProfileInput {
            nome: Some("  Ana Souza ".to_string()),
            codigo_xp: Some("   ".to_string()),
        }
        .validate()
        .unwrap();
        assert_eq!(input.nome.as_deref(), Some("Ana Souza"));
        assert_eq!(input.codigo_xp.as_deref(), Some(""));
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let input = UpdateProfileInput {
            nome: Some("  ".to_string()),
            codigo_xp: None,
        };
        assert!(matches!(input.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_long_code() {
        let input = UpdateProfileInput {
            nome: None,
            codigo_xp: Some("9".repeat(MAX_CODE_LEN + 1)),
        };
        assert!(input.validate().is_err());
    }
}
