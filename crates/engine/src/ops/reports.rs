use chrono::NaiveDate;

use crate::{
    CategoryTotal, Currency, ExchangeRates, MoneyCents, PeriodReport, ReportPeriod, ResultEngine,
    reports,
};

use super::{Engine, ExpenseFilter};

impl Engine {
    /// Signed totals per category over the entries matching `filter`.
    pub async fn category_totals(
        &self,
        user_id: &str,
        filter: &ExpenseFilter,
    ) -> ResultEngine<Vec<CategoryTotal>> {
        let expenses = self.list_expenses(user_id, filter).await?;
        reports::category_totals(&expenses)
    }

    /// Income minus expenses over every entry of the user.
    pub async fn balance(&self, user_id: &str) -> ResultEngine<MoneyCents> {
        let expenses = self
            .list_expenses(user_id, &ExpenseFilter::default())
            .await?;
        reports::balance(&expenses)
    }

    /// Builds the chart series for `period`, converted to `currency`.
    pub async fn period_report(
        &self,
        user_id: &str,
        period: ReportPeriod,
        today: NaiveDate,
        rates: &ExchangeRates,
        currency: Currency,
    ) -> ResultEngine<PeriodReport> {
        let expenses = self
            .list_expenses(user_id, &ExpenseFilter::default())
            .await?;
        let goals = self.list_goals(user_id).await?;
        reports::period_report(period, today, &expenses, &goals, rates, currency)
    }
}
