//! Conversions between engine values and API views.

use api_types::{AmountView, transaction::TransactionKind};
use engine::{Currency, DisplayAmount, ExchangeRates, MoneyCents};

pub(crate) fn currency_in(currency: Option<api_types::Currency>) -> Currency {
    match currency.unwrap_or_default() {
        api_types::Currency::Zar => Currency::Zar,
        api_types::Currency::Usd => Currency::Usd,
        api_types::Currency::Eur => Currency::Eur,
        api_types::Currency::Gbp => Currency::Gbp,
        api_types::Currency::Jpy => Currency::Jpy,
    }
}

pub(crate) fn currency_out(currency: Currency) -> api_types::Currency {
    match currency {
        Currency::Zar => api_types::Currency::Zar,
        Currency::Usd => api_types::Currency::Usd,
        Currency::Eur => api_types::Currency::Eur,
        Currency::Gbp => api_types::Currency::Gbp,
        Currency::Jpy => api_types::Currency::Jpy,
    }
}

pub(crate) fn kind_in(kind: TransactionKind) -> engine::TransactionKind {
    match kind {
        TransactionKind::Income => engine::TransactionKind::Income,
        TransactionKind::Expense => engine::TransactionKind::Expense,
    }
}

pub(crate) fn kind_out(kind: engine::TransactionKind) -> TransactionKind {
    match kind {
        engine::TransactionKind::Income => TransactionKind::Income,
        engine::TransactionKind::Expense => TransactionKind::Expense,
    }
}

pub(crate) fn amount_view(amount: DisplayAmount) -> AmountView {
    AmountView {
        currency: currency_out(amount.currency),
        amount_minor: amount.amount.cents(),
        display: amount.to_string(),
    }
}

/// Renders a stored amount in `currency`.
pub(crate) fn render(rates: &ExchangeRates, amount: MoneyCents, currency: Currency) -> AmountView {
    amount_view(rates.convert(amount, currency))
}
