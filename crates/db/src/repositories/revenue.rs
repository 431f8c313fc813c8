//! Revenue repository: keyset-paginated retrieval, direct aggregates and
//! the cross-check between them.
//!
//! Every figure shown to an advisor is computed twice when it matters:
//! once by accumulating keyset pages (`id > $after ORDER BY id`) and once by
//! a single `SUM` over the same filter. A disagreement is never hidden. It
//! is returned as a failed report, or as `AppError::DataIntegrity` through
//! [`ensure_consistent`].

use std::collections::BTreeMap;

use assessoria_core::reconciliation::{
    MethodTotals, PageSource, Paginated, PaginationError, PaginationOptions, ReconciliationCheck,
    ReconciliationReport, collect_pages,
};
use assessoria_core::revenue::{MonthlyRevenue, RevenueRow, monthly_series, revenue_by_client};
use assessoria_shared::types::MonthParseError;
use assessoria_shared::{AdvisorId, AppError, AppResult, YearMonth};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Serialize;

use crate::entities::receita_itens;
use crate::error::db_error;

/// Pattern for administrative adjustment families.
const ADMIN_FAMILY_PATTERN: &str = "%administrativo%";

/// Rows selected for a revenue computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevenueFilter {
    /// Owner of the rows.
    pub user_id: AdvisorId,
    /// First month, inclusive.
    pub from: YearMonth,
    /// Last month, inclusive.
    pub to: YearMonth,
    /// Drop families matching `%administrativo%` (NULL families are kept).
    pub exclude_admin: bool,
}

impl RevenueFilter {
    /// Office revenue of one month, administrative adjustments excluded.
    #[must_use]
    pub const fn office_month(user_id: AdvisorId, month: YearMonth) -> Self {
        Self {
            user_id,
            from: month,
            to: month,
            exclude_admin: true,
        }
    }

    /// Every row between `from` and `to`.
    #[must_use]
    pub const fn months(user_id: AdvisorId, from: YearMonth, to: YearMonth) -> Self {
        Self {
            user_id,
            from,
            to,
            exclude_admin: false,
        }
    }

    /// The same filter narrowed to one month.
    #[must_use]
    pub const fn only(self, month: YearMonth) -> Self {
        Self {
            from: month,
            to: month,
            ..self
        }
    }

    fn condition(&self) -> Condition {
        let mut condition = Condition::all().add(receita_itens::Column::UserId.eq(self.user_id.0));

        condition = if self.from == self.to {
            condition.add(receita_itens::Column::DataRef.eq(self.from.to_string()))
        } else {
            condition
                .add(receita_itens::Column::DataRef.gte(self.from.to_string()))
                .add(receita_itens::Column::DataRef.lte(self.to.to_string()))
        };

        if self.exclude_admin {
            condition = condition.add(
                Condition::any()
                    .add(receita_itens::Column::Familia.is_null())
                    .add(Expr::col(receita_itens::Column::Familia).not_ilike(ADMIN_FAMILY_PATTERN)),
            );
        }
        condition
    }
}

/// Keyset page source over `receita_itens`, keyed by `id`.
#[derive(Debug)]
pub struct RevenuePages<'a, C> {
    conn: &'a C,
    filter: RevenueFilter,
}

impl<'a, C> RevenuePages<'a, C> {
    /// Creates a page source for `filter`.
    #[must_use]
    pub const fn new(conn: &'a C, filter: RevenueFilter) -> Self {
        Self { conn, filter }
    }
}

#[async_trait]
impl<'a, C> PageSource for RevenuePages<'a, C>
where
    C: ConnectionTrait + Send + Sync,
{
    type Row = RevenueRow;
    type Key = i64;
    type Error = DbErr;

    async fn fetch_page(&self, after: Option<i64>, limit: u64) -> Result<Vec<RevenueRow>, DbErr> {
        let mut query = receita_itens::Entity::find().filter(self.filter.condition());
        if let Some(after) = after {
            query = query.filter(receita_itens::Column::Id.gt(after));
        }

        query
            .order_by_asc(receita_itens::Column::Id)
            .limit(limit)
            .all(self.conn)
            .await?
            .into_iter()
            .map(to_row)
            .collect()
    }

    fn key(&self, row: &RevenueRow) -> i64 {
        row.id
    }
}

fn to_row(model: receita_itens::Model) -> Result<RevenueRow, DbErr> {
    Ok(RevenueRow {
        id: model.id,
        month: parse_month(&model.data_ref)?,
        client_code: model.cliente_codigo,
        family: model.familia,
        office_commission: model.comissao_escritorio,
        net_value: model.valor_liquido,
    })
}

fn parse_month(value: &str) -> Result<YearMonth, DbErr> {
    value.parse().map_err(|e: MonthParseError| DbErr::Type(e.to_string()))
}

#[derive(Debug, FromQueryResult)]
struct TotalsRow {
    total: Option<Decimal>,
    records: i64,
}

#[derive(Debug, FromQueryResult)]
struct MonthTotalsRow {
    data_ref: String,
    total: Option<Decimal>,
    records: i64,
}

impl From<TotalsRow> for MethodTotals {
    fn from(row: TotalsRow) -> Self {
        Self {
            total: row.total.unwrap_or_default(),
            records: u64::try_from(row.records).unwrap_or_default(),
        }
    }
}

/// Twelve months of revenue plus the checks behind them.
#[derive(Debug, Clone, Serialize)]
pub struct RevenueSeries {
    /// Year covered.
    pub year: i32,
    /// January through December.
    pub months: Vec<MonthlyRevenue>,
    /// Per-month comparison of pages against the aggregate. Empty when
    /// pagination could not be used at all.
    pub checks: Vec<ReconciliationReport>,
    /// Months served from the unpaginated query.
    pub fallback_months: Vec<YearMonth>,
}

/// Revenue repository.
#[derive(Debug, Clone, Copy)]
pub struct RevenueRepository<'a, C> {
    conn: &'a C,
}

impl<'a, C> RevenueRepository<'a, C>
where
    C: ConnectionTrait + Send + Sync,
{
    /// Creates a revenue repository on `conn`.
    #[must_use]
    pub const fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Page source for `filter`.
    #[must_use]
    pub const fn pages(&self, filter: RevenueFilter) -> RevenuePages<'a, C> {
        RevenuePages::new(self.conn, filter)
    }

    /// Unpaginated `SUM(comissao_escritorio)` and `COUNT(*)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn direct_totals(&self, filter: &RevenueFilter) -> Result<MethodTotals, DbErr> {
        let row = receita_itens::Entity::find()
            .select_only()
            .column_as(
                Expr::col(receita_itens::Column::ComissaoEscritorio).sum(),
                "total",
            )
            .column_as(Expr::col(receita_itens::Column::Id).count(), "records")
            .filter(filter.condition())
            .into_model::<TotalsRow>()
            .one(self.conn)
            .await?;

        Ok(row.map(MethodTotals::from).unwrap_or_default())
    }

    /// Unpaginated totals grouped by month.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn direct_monthly_totals(
        &self,
        filter: &RevenueFilter,
    ) -> Result<BTreeMap<YearMonth, MethodTotals>, DbErr> {
        let rows = receita_itens::Entity::find()
            .select_only()
            .column(receita_itens::Column::DataRef)
            .column_as(
                Expr::col(receita_itens::Column::ComissaoEscritorio).sum(),
                "total",
            )
            .column_as(Expr::col(receita_itens::Column::Id).count(), "records")
            .filter(filter.condition())
            .group_by(receita_itens::Column::DataRef)
            .into_model::<MonthTotalsRow>()
            .all(self.conn)
            .await?;

        rows.into_iter()
            .map(|row| {
                let month = parse_month(&row.data_ref)?;
                let totals = MethodTotals::from(TotalsRow {
                    total: row.total,
                    records: row.records,
                });
                Ok((month, totals))
            })
            .collect()
    }

    /// Every matching row in one unpaginated query.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn direct_rows(&self, filter: &RevenueFilter) -> Result<Vec<RevenueRow>, DbErr> {
        receita_itens::Entity::find()
            .filter(filter.condition())
            .order_by_asc(receita_itens::Column::Id)
            .all(self.conn)
            .await?
            .into_iter()
            .map(to_row)
            .collect()
    }

    /// Office revenue of `month` for goal tracking.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn office_revenue(&self, user_id: AdvisorId, month: YearMonth) -> AppResult<Decimal> {
        self.direct_totals(&RevenueFilter::office_month(user_id, month))
            .await
            .map(|t| t.total)
            .map_err(db_error)
    }

    /// Cross-checks the office revenue of `month`.
    ///
    /// Returns the report whether it passed or not. Pagination that hits its
    /// page limit or sees keys out of order cannot be trusted and is
    /// reported as `DataIntegrity` instead.
    ///
    /// # Errors
    ///
    /// Returns `AppError::DataIntegrity` if pagination was incomplete and a
    /// database error if either query failed.
    pub async fn reconcile_month(
        &self,
        user_id: AdvisorId,
        month: YearMonth,
        expected: Option<Decimal>,
        tolerance: Decimal,
        options: PaginationOptions,
    ) -> AppResult<ReconciliationReport> {
        let filter = RevenueFilter::office_month(user_id, month);

        let direct = self.direct_totals(&filter).await.map_err(db_error)?;
        let paginated = collect_pages(&self.pages(filter), options)
            .await
            .map_err(pagination_error)?;
        if paginated.truncated {
            tracing::error!(
                user_id = %user_id,
                month = %month,
                pages = paginated.pages,
                "revenue pagination truncated"
            );
            return Err(AppError::DataIntegrity(format!(
                "pagination for {month} stopped after {} pages",
                paginated.pages
            )));
        }

        let report = ReconciliationCheck::evaluate_month(
            month,
            direct,
            page_totals(&paginated),
            expected,
            tolerance,
        );

        if report.passed() {
            tracing::info!(
                user_id = %user_id,
                month = %month,
                direct_total = %report.direct_total,
                paginated_total = %report.paginated_total,
                pages = paginated.pages,
                "revenue reconciliation passed"
            );
        } else {
            tracing::error!(
                user_id = %user_id,
                month = %month,
                direct_total = %report.direct_total,
                paginated_total = %report.paginated_total,
                direct_records = report.direct_records,
                paginated_records = report.paginated_records,
                expected_total = ?report.expected_total,
                pages = paginated.pages,
                "revenue reconciliation failed"
            );
        }

        Ok(report)
    }

    /// Monthly revenue for `year`.
    ///
    /// Rows come from keyset pages. Each month is compared with the direct
    /// aggregate, and a month that disagrees is recomputed from the
    /// unpaginated rows. If pagination itself is unusable the whole year is
    /// served that way.
    ///
    /// # Errors
    ///
    /// Returns an error if the database queries fail.
    pub async fn yearly_series(
        &self,
        user_id: AdvisorId,
        year: i32,
        tolerance: Decimal,
        options: PaginationOptions,
    ) -> AppResult<RevenueSeries> {
        let (from, to) = year_bounds(year)?;
        let filter = RevenueFilter::months(user_id, from, to);

        let Some(rows) = self.paged_rows(filter, options).await? else {
            let rows = self.direct_rows(&filter).await.map_err(db_error)?;
            return Ok(RevenueSeries {
                year,
                months: monthly_series(&rows, year),
                checks: Vec::new(),
                fallback_months: YearMonth::months_of_year(year),
            });
        };

        let direct = self.direct_monthly_totals(&filter).await.map_err(db_error)?;
        let mut months = monthly_series(&rows, year);
        let mut checks = Vec::with_capacity(months.len());
        let mut fallback_months = Vec::new();

        for slot in &mut months {
            let month = slot.month;
            let report = ReconciliationCheck::evaluate_month(
                month,
                direct.get(&month).copied().unwrap_or_default(),
                MethodTotals {
                    total: slot.office_total,
                    records: slot.rows,
                },
                None,
                tolerance,
            );

            if !report.passed() {
                tracing::warn!(
                    user_id = %user_id,
                    month = %month,
                    direct_total = %report.direct_total,
                    paginated_total = %report.paginated_total,
                    "paginated month drifted, serving direct aggregate"
                );
                let month_rows = self
                    .direct_rows(&filter.only(month))
                    .await
                    .map_err(db_error)?;
                if let Some(fixed) = monthly_series(&month_rows, year)
                    .into_iter()
                    .find(|m| m.month == month)
                {
                    *slot = fixed;
                }
                fallback_months.push(month);
            }
            checks.push(report);
        }

        Ok(RevenueSeries {
            year,
            months,
            checks,
            fallback_months,
        })
    }

    /// Year-to-date office revenue per canonical client code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database queries fail.
    pub async fn revenue_by_client_until(
        &self,
        user_id: AdvisorId,
        until: YearMonth,
        options: PaginationOptions,
    ) -> AppResult<BTreeMap<String, Decimal>> {
        let (from, _) = year_bounds(until.year())?;
        let filter = RevenueFilter::months(user_id, from, until);

        let rows = match self.paged_rows(filter, options).await? {
            Some(rows) => rows,
            None => self.direct_rows(&filter).await.map_err(db_error)?,
        };
        Ok(revenue_by_client(&rows))
    }

    /// Collects pages, or `None` if the pages cannot be trusted.
    async fn paged_rows(
        &self,
        filter: RevenueFilter,
        options: PaginationOptions,
    ) -> AppResult<Option<Vec<RevenueRow>>> {
        match collect_pages(&self.pages(filter), options).await {
            Ok(paginated) if !paginated.truncated => Ok(Some(paginated.rows)),
            Ok(paginated) => {
                tracing::warn!(
                    user_id = %filter.user_id,
                    pages = paginated.pages,
                    "pagination truncated, falling back to direct query"
                );
                Ok(None)
            }
            Err(PaginationError::UnstableOrdering { page, .. }) => {
                tracing::warn!(
                    user_id = %filter.user_id,
                    page,
                    "unstable pagination order, falling back to direct query"
                );
                Ok(None)
            }
            Err(err) => Err(pagination_error(err)),
        }
    }
}

/// Turns a failed report into an error.
///
/// # Errors
///
/// Returns `AppError::DataIntegrity` describing the differences.
pub fn ensure_consistent(report: &ReconciliationReport) -> AppResult<()> {
    if report.passed() {
        return Ok(());
    }

    let month = report
        .month
        .map_or_else(|| "period".to_string(), |m| m.to_string());
    let mut problems = Vec::new();
    if !report.methods_match {
        problems.push(format!(
            "paginated total {} differs from direct total {} by {}",
            report.paginated_total, report.direct_total, report.method_difference
        ));
    }
    if !report.records_match {
        problems.push(format!(
            "paginated rows {} differ from direct rows {}",
            report.paginated_records, report.direct_records
        ));
    }
    if !report.expected_match
        && let Some(expected) = report.expected_total
    {
        problems.push(format!(
            "direct total {} differs from expected {expected} by {}",
            report.direct_total, report.expected_difference
        ));
    }

    Err(AppError::DataIntegrity(format!(
        "revenue for {month} is inconsistent: {}",
        problems.join("; ")
    )))
}

fn page_totals(paginated: &Paginated<RevenueRow>) -> MethodTotals {
    MethodTotals {
        total: paginated.rows.iter().map(|r| r.office_commission).sum(),
        records: paginated.rows.len() as u64,
    }
}

fn year_bounds(year: i32) -> AppResult<(YearMonth, YearMonth)> {
    let from = YearMonth::new(year, 1).map_err(|e| AppError::Validation(e.to_string()))?;
    let to = YearMonth::new(year, 12).map_err(|e| AppError::Validation(e.to_string()))?;
    Ok((from, to))
}

fn pagination_error(err: PaginationError<DbErr>) -> AppError {
    match err {
        PaginationError::Source(e) => db_error(e),
        PaginationError::InvalidOptions => AppError::Validation(err.to_string()),
        PaginationError::UnstableOrdering { .. } => AppError::DataIntegrity(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn report(direct: Decimal, paginated: Decimal, records: (u64, u64)) -> ReconciliationReport {
        ReconciliationCheck::evaluate_month(
            YearMonth::new(2025, 2).unwrap(),
            MethodTotals {
                total: direct,
                records: records.0,
            },
            MethodTotals {
                total: paginated,
                records: records.1,
            },
            None,
            dec!(1.00),
        )
    }

    #[test]
    fn test_ensure_consistent_accepts_pass() {
        assert!(ensure_consistent(&report(dec!(32881.30), dec!(32881.30), (598, 598))).is_ok());
    }

    #[test]
    fn test_ensure_consistent_describes_drift() {
        let err = ensure_consistent(&report(dec!(32881.30), dec!(22473.90), (598, 408))).unwrap_err();
        let AppError::DataIntegrity(message) = err else {
            panic!("expected DataIntegrity");
        };
        assert!(message.contains("2025-02"));
        assert!(message.contains("22473.90"));
        assert!(message.contains("408"));
    }

    #[test]
    fn test_office_month_filter_excludes_admin() {
        let filter = RevenueFilter::office_month(AdvisorId::new(), YearMonth::new(2025, 2).unwrap());
        assert!(filter.exclude_admin);
        assert_eq!(filter.from, filter.to);
        assert!(!RevenueFilter::months(filter.user_id, filter.from, filter.to).exclude_admin);
    }

    #[test]
    fn test_year_bounds() {
        let (from, to) = year_bounds(2025).unwrap();
        assert_eq!(from.to_string(), "2025-01");
        assert_eq!(to.to_string(), "2025-12");
        assert!(year_bounds(0).is_err());
    }

    #[test]
    fn test_pagination_error_mapping() {
        let unstable: PaginationError<DbErr> = PaginationError::UnstableOrdering {
            page: 2,
            previous: "10".to_string(),
            current: "9".to_string(),
        };
        assert_eq!(pagination_error(unstable).status_code(), 422);
        assert_eq!(
            pagination_error(PaginationError::InvalidOptions).status_code(),
            400
        );
        assert_eq!(
            pagination_error(PaginationError::Source(DbErr::Custom("x".into()))).status_code(),
            500
        );
    }
}
