//! Application tables and their check constraints.
//!
//! `metas_mensais` is created without its `(user_id, mes)` constraint; rows
//! written before it existed are deduplicated by a later migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(FUNCTIONS_SQL).await?;
        db.execute_unprepared(PROFILES_SQL).await?;
        db.execute_unprepared(CLIENTES_SQL).await?;
        db.execute_unprepared(CROSS_SELL_SQL).await?;
        db.execute_unprepared(METAS_SQL).await?;
        db.execute_unprepared(BONUS_SQL).await?;
        db.execute_unprepared(RECEITA_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const FUNCTIONS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
";

const PROFILES_SQL: &str = r"
CREATE TABLE profiles (
    id UUID PRIMARY KEY REFERENCES auth.users(id) ON DELETE CASCADE,
    email VARCHAR(255) NOT NULL,
    nome VARCHAR(200),
    codigo_xp VARCHAR(50),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TRIGGER trg_profiles_updated_at
    BEFORE UPDATE ON profiles
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const CLIENTES_SQL: &str = r"
CREATE TABLE clientes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES auth.users(id) ON DELETE CASCADE,
    nome VARCHAR(200) NOT NULL,
    codigo_xp VARCHAR(50),
    codigo_mb VARCHAR(50),
    modelo VARCHAR(30) DEFAULT 'TRADICIONAL'
        CHECK (modelo IS NULL OR modelo IN ('TRADICIONAL', 'ASSET', 'FEE_BASED', 'FEE_BASED_SEM_RV')),
    repasse NUMERIC(5,2) NOT NULL DEFAULT 35 CHECK (repasse >= 0 AND repasse <= 100),
    net_xp NUMERIC(16,2) NOT NULL DEFAULT 0,
    net_xp_global NUMERIC(16,2) NOT NULL DEFAULT 0,
    net_mb NUMERIC(16,2) NOT NULL DEFAULT 0,
    net_total NUMERIC(16,2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_clientes_user ON clientes(user_id);

CREATE TRIGGER trg_clientes_updated_at
    BEFORE UPDATE ON clientes
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const CROSS_SELL_SQL: &str = r"
CREATE TABLE cross_sell (
    id SERIAL PRIMARY KEY,
    cliente_id UUID NOT NULL REFERENCES clientes(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES auth.users(id) ON DELETE CASCADE,
    fee_based VARCHAR(20) NOT NULL DEFAULT ''
        CHECK (fee_based IN ('', 'Presented', 'Booked')),
    financial_planning VARCHAR(20) NOT NULL DEFAULT ''
        CHECK (financial_planning IN ('', 'Presented', 'Booked')),
    mb VARCHAR(20) NOT NULL DEFAULT ''
        CHECK (mb IN ('', 'Presented', 'Booked')),
    offshore VARCHAR(20) NOT NULL DEFAULT ''
        CHECK (offshore IN ('', 'Presented', 'Booked')),
    produto_estruturado VARCHAR(20) NOT NULL DEFAULT ''
        CHECK (produto_estruturado IN ('', 'Presented', 'Booked')),
    asset VARCHAR(20) NOT NULL DEFAULT ''
        CHECK (asset IN ('', 'Presented', 'Booked')),
    seguro_vida VARCHAR(20) NOT NULL DEFAULT ''
        CHECK (seguro_vida IN ('', 'Presented', 'Booked')),
    consorcio VARCHAR(20) NOT NULL DEFAULT ''
        CHECK (consorcio IN ('', 'Presented', 'Booked')),
    wealth VARCHAR(20) NOT NULL DEFAULT ''
        CHECK (wealth IN ('', 'Presented', 'Booked')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT uq_cross_sell_cliente_user UNIQUE (cliente_id, user_id)
);

CREATE INDEX idx_cross_sell_user ON cross_sell(user_id);

CREATE TRIGGER trg_cross_sell_updated_at
    BEFORE UPDATE ON cross_sell
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const METAS_SQL: &str = r"
CREATE TABLE metas_mensais (
    id SERIAL PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES auth.users(id) ON DELETE CASCADE,
    mes VARCHAR(7) NOT NULL CHECK (mes ~ '^[0-9]{4}-(0[1-9]|1[0-2])$'),
    meta_receita NUMERIC(14,2) NOT NULL DEFAULT 0 CHECK (meta_receita >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_metas_user_mes ON metas_mensais(user_id, mes);

CREATE TRIGGER trg_metas_updated_at
    BEFORE UPDATE ON metas_mensais
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const BONUS_SQL: &str = r"
CREATE TABLE bonus_missoes (
    id SERIAL PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES auth.users(id) ON DELETE CASCADE,
    mes VARCHAR(7) NOT NULL CHECK (mes ~ '^[0-9]{4}-(0[1-9]|1[0-2])$'),
    nome_missao VARCHAR(200) NOT NULL CHECK (length(trim(nome_missao)) > 0),
    valor_bonus NUMERIC(14,2) NOT NULL DEFAULT 0 CHECK (valor_bonus >= 0),
    origem VARCHAR(2) NOT NULL DEFAULT 'XP' CHECK (origem IN ('XP', 'MB')),
    liquido_assessor BOOLEAN NOT NULL DEFAULT FALSE,
    ativo BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT uq_bonus_user_mes_nome UNIQUE (user_id, mes, nome_missao)
);

CREATE TRIGGER trg_bonus_updated_at
    BEFORE UPDATE ON bonus_missoes
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const RECEITA_SQL: &str = r"
CREATE TABLE receita_itens (
    id BIGSERIAL PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES auth.users(id) ON DELETE CASCADE,
    data_ref VARCHAR(7) NOT NULL CHECK (data_ref ~ '^[0-9]{4}-(0[1-9]|1[0-2])$'),
    cliente_codigo VARCHAR(50),
    cliente_nome VARCHAR(200),
    origem VARCHAR(50),
    familia VARCHAR(100),
    produto VARCHAR(200),
    categoria VARCHAR(100),
    valor_bruto NUMERIC(14,2) NOT NULL DEFAULT 0,
    imposto_pct NUMERIC(7,4) NOT NULL DEFAULT 0,
    valor_liquido NUMERIC(14,2) NOT NULL DEFAULT 0,
    comissao_bruta NUMERIC(14,2) NOT NULL DEFAULT 0,
    comissao_liquida NUMERIC(14,2) NOT NULL DEFAULT 0,
    comissao_escritorio NUMERIC(14,2) NOT NULL DEFAULT 0,
    modelo VARCHAR(30),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Keyset pages walk (user_id, data_ref) by id.
CREATE INDEX idx_receita_user_mes_id ON receita_itens(user_id, data_ref, id);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS receita_itens;
DROP TABLE IF EXISTS bonus_missoes;
DROP TABLE IF EXISTS metas_mensais;
DROP TABLE IF EXISTS cross_sell;
DROP TABLE IF EXISTS clientes;
DROP TABLE IF EXISTS profiles;
DROP FUNCTION IF EXISTS set_updated_at();
";
