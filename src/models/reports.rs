// src/models/reports.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// ---
// Totais do período
// ---
// Cada total é a soma de um conjunto possivelmente vazio (vazio = 0).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    pub total_sales: Decimal,
    pub total_purchases: Decimal,
    pub total_expenses: Decimal,
    pub gross_income: Decimal,
}

impl ReportTotals {
    // Receita bruta = vendas - compras - despesas
    pub fn new(total_sales: Decimal, total_purchases: Decimal, total_expenses: Decimal) -> Self {
        let gross_income = total_sales - total_purchases - total_expenses;
        Self {
            total_sales,
            total_purchases,
            total_expenses,
            gross_income,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    #[test]
    fn gross_income_equals_sales_minus_purchases_minus_expenses() {
        let totals = ReportTotals::new(dec("150.00"), dec("40.00"), dec("10.50"));
        assert_eq!(totals.gross_income, dec("99.50"));
        assert_eq!(
            totals.gross_income,
            totals.total_sales - totals.total_purchases - totals.total_expenses
        );
    }

    #[test]
    fn empty_period_is_zero_not_an_error() {
        let totals = ReportTotals::new(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(totals.gross_income, Decimal::ZERO);
    }

    #[test]
    fn gross_income_can_be_negative() {
        let totals = ReportTotals::new(dec("10.00"), dec("25.00"), dec("5.00"));
        assert_eq!(totals.gross_income, dec("-20.00"));
    }
}
