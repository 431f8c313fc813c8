//! `SeaORM` entity definitions.

pub mod bonus_missoes;
pub mod clientes;
pub mod cross_sell;
pub mod metas_mensais;
pub mod profiles;
pub mod receita_itens;

pub mod prelude {
    //! Entity re-exports.
    pub use super::bonus_missoes::Entity as BonusMissoes;
    pub use super::clientes::Entity as Clientes;
    pub use super::cross_sell::Entity as CrossSell;
    pub use super::metas_mensais::Entity as MetasMensais;
    pub use super::profiles::Entity as Profiles;
    pub use super::receita_itens::Entity as ReceitaItens;
}
