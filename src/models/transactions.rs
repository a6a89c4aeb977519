// src/models/transactions.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::error::AppError;

// ---
// 1. Os três livros
// ---
// Vendas, compras e despesas têm a mesma estrutura; só mudam a tabela e a
// coluna de data. Este enum concentra esse mapeamento para que repositório,
// serviço e relatórios tratem os três de forma uniforme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Purchase,
    Expense,
}

impl TransactionKind {
    pub fn table(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "sales",
            TransactionKind::Purchase => "purchases",
            TransactionKind::Expense => "expenses",
        }
    }

    // Cada entidade tem a SUA coluna de data; não existe uma "data de
    // transação" compartilhada entre os três livros.
    pub fn date_column(&self) -> &'static str {
        match self {
            TransactionKind::Sale => "sales_date",
            TransactionKind::Purchase => "purchase_date",
            TransactionKind::Expense => "expense_date",
        }
    }
}

// ---
// 2. Forma de pagamento
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    BankTransfer,
    Pix,
    Cheque,
    Other,
}

// ---
// 3. O lançamento como sai do banco
// ---
// `entry_date` é um alias da coluna de data específica do livro e
// `store_name` vem achatado de um LEFT JOIN com `stores`.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: Uuid,
    pub client_id: Uuid,
    pub store_id: Option<Uuid>,
    pub store_name: Option<String>,
    pub reference_no: String,
    pub description: String,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub document_url: Option<String>,
    pub entry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha da listagem combinada /transactions, com o livro de origem marcado.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaggedTransaction {
    pub kind: TransactionKind,
    #[serde(flatten)]
    pub record: TransactionRecord,
}

// ---
// 4. Dados de escrita (já com o escopo do tenant resolvido pelo serviço)
// ---
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub client_id: Uuid,
    pub store_id: Option<Uuid>,
    pub reference_no: String,
    pub description: String,
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    pub document_url: Option<String>,
    pub entry_date: NaiveDate,
}

// Atualização parcial: None = mantém o valor atual
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub store_id: Option<Option<Uuid>>,
    pub reference_no: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub payment_method: Option<PaymentMethod>,
    pub document_url: Option<Option<String>>,
    pub entry_date: Option<NaiveDate>,
}

// ---
// 5. Filtros de listagem / agregação
// ---
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub store_id: Option<Uuid>,
    // Substring case-insensitive sobre reference_no OU description
    pub search: Option<String>,
    // Intervalo inclusivo sobre a coluna de data do livro
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// Parâmetros de query crus, como chegam na URL
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    // super_admin pode escolher o tenant; os demais são ignorados/negados
    pub client_id: Option<Uuid>,
    // UUID da loja ou o sentinela "all" (= sem filtro)
    pub store_id: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

// "all" (ou ausência) significa "sem filtro de loja"
pub fn parse_store_filter(raw: Option<&str>) -> Result<Option<Uuid>, AppError> {
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() || s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => Uuid::parse_str(s).map(Some).map_err(|_| {
            AppError::InvalidRequest("O parâmetro 'storeId' deve ser um UUID ou 'all'.".to_string())
        }),
    }
}

// ---
// 6. Paginação
// ---
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    // Normaliza: página mínima 1, tamanho entre 1 e MAX_PAGE_SIZE
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let page_size = page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Self { page, page_size }
    }

    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }

    pub fn offset(&self) -> i64 {
        ((self.page - 1) as i64) * self.page_size as i64
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_to_table_and_date_column() {
        assert_eq!(TransactionKind::Sale.table(), "sales");
        assert_eq!(TransactionKind::Sale.date_column(), "sales_date");
        assert_eq!(TransactionKind::Purchase.table(), "purchases");
        assert_eq!(TransactionKind::Purchase.date_column(), "purchase_date");
        assert_eq!(TransactionKind::Expense.table(), "expenses");
        assert_eq!(TransactionKind::Expense.date_column(), "expense_date");
    }

    #[test]
    fn store_filter_accepts_all_sentinel() {
        assert_eq!(parse_store_filter(None).unwrap(), None);
        assert_eq!(parse_store_filter(Some("all")).unwrap(), None);
        assert_eq!(parse_store_filter(Some("ALL")).unwrap(), None);
        assert_eq!(parse_store_filter(Some("")).unwrap(), None);
    }

    #[test]
    fn store_filter_parses_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(
            parse_store_filter(Some(&id.to_string())).unwrap(),
            Some(id)
        );
    }

    #[test]
    fn store_filter_rejects_garbage() {
        let err = parse_store_filter(Some("loja-1")).unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn pagination_normalizes_bounds() {
        let p = Pagination::new(None, None);
        assert_eq!((p.page, p.page_size), (1, DEFAULT_PAGE_SIZE));

        let p = Pagination::new(Some(0), Some(0));
        assert_eq!((p.page, p.page_size), (1, 1));

        let p = Pagination::new(Some(3), Some(1000));
        assert_eq!((p.page, p.page_size), (3, MAX_PAGE_SIZE));
        assert_eq!(p.offset(), 200);
    }
}
