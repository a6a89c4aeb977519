// src/services/report_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TransactionRepository,
    models::{
        auth::User,
        reports::ReportTotals,
        transactions::{TransactionFilter, TransactionKind},
    },
    services::access,
};

#[derive(Clone)]
pub struct ReportService {
    repo: TransactionRepository,
}

impl ReportService {
    pub fn new(repo: TransactionRepository) -> Self {
        Self { repo }
    }

    // Soma os três livros com o mesmo filtro (loja e intervalo de datas,
    // cada livro contra a SUA coluna de data) e deriva a receita bruta.
    // Conjunto vazio soma 0; nunca é erro.
    pub async fn totals(
        &self,
        user: &User,
        requested_client_id: Option<Uuid>,
        filter: TransactionFilter,
    ) -> Result<ReportTotals, AppError> {
        let client_id =
            access::effective_client_id(user.role, user.client_id, requested_client_id)?;

        let total_sales = self
            .repo
            .sum_amount(TransactionKind::Sale, client_id, &filter)
            .await?;
        let total_purchases = self
            .repo
            .sum_amount(TransactionKind::Purchase, client_id, &filter)
            .await?;
        let total_expenses = self
            .repo
            .sum_amount(TransactionKind::Expense, client_id, &filter)
            .await?;

        Ok(ReportTotals::new(
            total_sales,
            total_purchases,
            total_expenses,
        ))
    }
}
