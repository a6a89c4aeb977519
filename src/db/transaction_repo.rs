// src/db/transaction_repo.rs

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::transactions::{
        NewTransaction, Pagination, TransactionFilter, TransactionKind, TransactionRecord,
        TransactionUpdate,
    },
};

// Um repositório só para os três livros (vendas, compras, despesas): as
// tabelas são estruturalmente idênticas e o `TransactionKind` resolve a
// tabela e a coluna de data de cada uma.
#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

// SELECT base: achata o nome da loja via LEFT JOIN e dá um alias uniforme
// ("entry_date") à coluna de data específica do livro.
fn select_sql(kind: TransactionKind) -> String {
    format!(
        r#"
        SELECT
            t.id, t.client_id, t.store_id, s.name AS store_name,
            t.reference_no, t.description, t.amount, t.payment_method,
            t.document_url, t.{date} AS entry_date,
            t.created_at, t.updated_at
        FROM {table} t
        LEFT JOIN stores s ON s.id = t.store_id
        "#,
        date = kind.date_column(),
        table = kind.table(),
    )
}

// Filtros opcionais compartilhados por listagem, contagem e soma.
// Ausência de filtro = sem cláusula (no-op).
fn push_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    kind: TransactionKind,
    client_id: Uuid,
    filter: &TransactionFilter,
) {
    qb.push(" WHERE t.client_id = ").push_bind(client_id);

    if let Some(store_id) = filter.store_id {
        qb.push(" AND t.store_id = ").push_bind(store_id);
    }

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        qb.push(" AND (t.reference_no ILIKE ").push_bind(pattern.clone());
        qb.push(" OR t.description ILIKE ").push_bind(pattern);
        qb.push(")");
    }

    if let Some(start) = filter.start_date {
        qb.push(format!(" AND t.{} >= ", kind.date_column())).push_bind(start);
    }
    if let Some(end) = filter.end_date {
        qb.push(format!(" AND t.{} <= ", kind.date_column())).push_bind(end);
    }
}

// Converte violação do índice único (client_id, reference_no) em 409
fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(constraint) = db_err.constraint() {
                if constraint.ends_with("_client_reference_key") {
                    return AppError::ReferenceAlreadyExists;
                }
                return AppError::UniqueConstraintViolation(constraint.to_string());
            }
        }
    }
    e.into()
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Insere e devolve só o id; o serviço refaz a busca com JOIN para
    // devolver a linha já com o nome da loja achatado.
    pub async fn insert(
        &self,
        kind: TransactionKind,
        tx: &NewTransaction,
    ) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(&format!(
            r#"
            INSERT INTO {table} (
                client_id, store_id, reference_no, description,
                amount, payment_method, document_url, {date}
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
            table = kind.table(),
            date = kind.date_column(),
        ))
        .bind(tx.client_id)
        .bind(tx.store_id)
        .bind(&tx.reference_no)
        .bind(&tx.description)
        .bind(tx.amount)
        .bind(tx.payment_method)
        .bind(&tx.document_url)
        .bind(tx.entry_date)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(id)
    }

    // Busca sem filtro de tenant: quem decide o acesso é o serviço,
    // comparando o client_id da linha com o do principal.
    pub async fn find_by_id(
        &self,
        kind: TransactionKind,
        id: Uuid,
    ) -> Result<Option<TransactionRecord>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(select_sql(kind));
        qb.push(" WHERE t.id = ").push_bind(id);

        let record = qb
            .build_query_as::<TransactionRecord>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    // O número de referência é chave "humana" escopada no tenant
    pub async fn find_by_reference(
        &self,
        kind: TransactionKind,
        client_id: Uuid,
        reference_no: &str,
    ) -> Result<Option<TransactionRecord>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(select_sql(kind));
        qb.push(" WHERE t.client_id = ").push_bind(client_id);
        qb.push(" AND t.reference_no = ").push_bind(reference_no.to_owned());

        let record = qb
            .build_query_as::<TransactionRecord>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    // Listagem paginada, ordenada pela data do livro (decrescente)
    pub async fn list(
        &self,
        kind: TransactionKind,
        client_id: Uuid,
        filter: &TransactionFilter,
        pagination: Pagination,
    ) -> Result<Vec<TransactionRecord>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(select_sql(kind));
        push_filters(&mut qb, kind, client_id, filter);
        qb.push(format!(
            " ORDER BY t.{} DESC, t.created_at DESC",
            kind.date_column()
        ));
        qb.push(" LIMIT ").push_bind(pagination.limit());
        qb.push(" OFFSET ").push_bind(pagination.offset());

        let records = qb
            .build_query_as::<TransactionRecord>()
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    // Mesmo conjunto de filtros da listagem, sem LIMIT (usada pela
    // listagem combinada, que intercala os três livros em memória)
    pub async fn list_unpaginated(
        &self,
        kind: TransactionKind,
        client_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionRecord>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(select_sql(kind));
        push_filters(&mut qb, kind, client_id, filter);
        qb.push(format!(
            " ORDER BY t.{} DESC, t.created_at DESC",
            kind.date_column()
        ));

        let records = qb
            .build_query_as::<TransactionRecord>()
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    pub async fn count(
        &self,
        kind: TransactionKind,
        client_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<i64, AppError> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {} t", kind.table()));
        push_filters(&mut qb, kind, client_id, filter);

        let total: i64 = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total)
    }

    // Soma sobre conjunto possivelmente vazio: COALESCE garante 0
    pub async fn sum_amount(
        &self,
        kind: TransactionKind,
        client_id: Uuid,
        filter: &TransactionFilter,
    ) -> Result<Decimal, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT COALESCE(SUM(t.amount), 0) FROM {} t",
            kind.table()
        ));
        push_filters(&mut qb, kind, client_id, filter);

        let total: Decimal = qb.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(total)
    }

    // Atualização parcial: monta o SET só com os campos presentes.
    // Devolve o id atualizado (None = linha não existe).
    pub async fn update_by_id(
        &self,
        kind: TransactionKind,
        id: Uuid,
        update: &TransactionUpdate,
    ) -> Result<Option<Uuid>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "UPDATE {} t SET updated_at = now()",
            kind.table()
        ));
        Self::push_update_set(&mut qb, kind, update);
        qb.push(" WHERE t.id = ").push_bind(id);
        qb.push(" RETURNING t.id");

        let updated: Option<Uuid> = qb
            .build_query_scalar()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)?;
        Ok(updated)
    }

    pub async fn update_by_reference(
        &self,
        kind: TransactionKind,
        client_id: Uuid,
        reference_no: &str,
        update: &TransactionUpdate,
    ) -> Result<Option<Uuid>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "UPDATE {} t SET updated_at = now()",
            kind.table()
        ));
        Self::push_update_set(&mut qb, kind, update);
        qb.push(" WHERE t.client_id = ").push_bind(client_id);
        qb.push(" AND t.reference_no = ").push_bind(reference_no.to_owned());
        qb.push(" RETURNING t.id");

        let updated: Option<Uuid> = qb
            .build_query_scalar()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)?;
        Ok(updated)
    }

    fn push_update_set(
        qb: &mut QueryBuilder<'_, Postgres>,
        kind: TransactionKind,
        update: &TransactionUpdate,
    ) {
        if let Some(store_id) = &update.store_id {
            qb.push(", store_id = ").push_bind(*store_id);
        }
        if let Some(reference_no) = &update.reference_no {
            qb.push(", reference_no = ").push_bind(reference_no.clone());
        }
        if let Some(description) = &update.description {
            qb.push(", description = ").push_bind(description.clone());
        }
        if let Some(amount) = update.amount {
            qb.push(", amount = ").push_bind(amount);
        }
        if let Some(payment_method) = update.payment_method {
            qb.push(", payment_method = ").push_bind(payment_method);
        }
        if let Some(document_url) = &update.document_url {
            qb.push(", document_url = ").push_bind(document_url.clone());
        }
        if let Some(entry_date) = update.entry_date {
            qb.push(format!(", {} = ", kind.date_column())).push_bind(entry_date);
        }
    }

    // Deleção física, sem versionamento
    pub async fn delete_by_id(&self, kind: TransactionKind, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", kind.table()))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_by_reference(
        &self,
        kind: TransactionKind,
        client_id: Uuid,
        reference_no: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE client_id = $1 AND reference_no = $2",
            kind.table()
        ))
        .bind(client_id)
        .bind(reference_no)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn built_sql(kind: TransactionKind, filter: &TransactionFilter) -> String {
        let mut qb = QueryBuilder::<Postgres>::new(select_sql(kind));
        push_filters(&mut qb, kind, Uuid::new_v4(), filter);
        qb.sql().to_string()
    }

    // O intervalo de datas é inclusivo e aplicado à coluna de data do
    // PRÓPRIO livro; um vazamento de coluna de outro livro (ou um '<'
    // exclusivo) mudaria o resultado das somas por período.
    #[test]
    fn date_range_is_inclusive_on_the_kind_date_column() {
        let filter = TransactionFilter {
            store_id: None,
            search: None,
            start_date: Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
            end_date: Some(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()),
        };

        for kind in [
            TransactionKind::Sale,
            TransactionKind::Purchase,
            TransactionKind::Expense,
        ] {
            let sql = built_sql(kind, &filter);

            assert!(sql.contains(&format!("t.{} >= ", kind.date_column())), "{sql}");
            assert!(sql.contains(&format!("t.{} <= ", kind.date_column())), "{sql}");
            assert!(!sql.contains(" > "), "{sql}");
            assert!(!sql.contains(" < "), "{sql}");

            // Nenhuma cláusula aponta para a coluna de data de outro livro
            for other in ["sales_date", "purchase_date", "expense_date"] {
                if other != kind.date_column() {
                    assert!(!sql.contains(other), "{sql}");
                }
            }
        }
    }

    #[test]
    fn search_covers_reference_and_description_case_insensitively() {
        let filter = TransactionFilter {
            search: Some("nf".to_string()),
            ..Default::default()
        };

        let sql = built_sql(TransactionKind::Sale, &filter);
        assert!(sql.contains("t.reference_no ILIKE "), "{sql}");
        assert!(sql.contains(" OR t.description ILIKE "), "{sql}");
    }

    #[test]
    fn absent_filters_add_only_the_tenant_clause() {
        let sql = built_sql(TransactionKind::Expense, &TransactionFilter::default());

        assert!(sql.contains(" WHERE t.client_id = "), "{sql}");
        assert!(!sql.contains("ILIKE"), "{sql}");
        assert!(!sql.contains(">="), "{sql}");
        assert!(!sql.contains("<="), "{sql}");
        assert!(!sql.contains("store_id = "), "{sql}");
    }

    #[test]
    fn store_filter_adds_the_store_clause() {
        let filter = TransactionFilter {
            store_id: Some(Uuid::new_v4()),
            ..Default::default()
        };

        let sql = built_sql(TransactionKind::Purchase, &filter);
        assert!(sql.contains(" AND t.store_id = "), "{sql}");
    }
}
