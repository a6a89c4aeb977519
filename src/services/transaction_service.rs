// src/services/transaction_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{StoreRepository, TransactionRepository},
    models::{
        auth::User,
        transactions::{
            NewTransaction, Page, Pagination, TaggedTransaction, TransactionFilter,
            TransactionKind, TransactionRecord, TransactionUpdate,
        },
    },
    services::access,
};

// Regras de negócio dos três livros. Todo caminho passa pelo escopo de
// tenant antes de tocar no repositório.
#[derive(Clone)]
pub struct TransactionService {
    repo: TransactionRepository,
    store_repo: StoreRepository,
}

impl TransactionService {
    pub fn new(repo: TransactionRepository, store_repo: StoreRepository) -> Self {
        Self { repo, store_repo }
    }

    // Escrita que referencia loja: resolve a loja primeiro (404 se não
    // existe) e ela precisa pertencer ao tenant efetivo da operação.
    async fn ensure_store_in_client(
        &self,
        store_id: Uuid,
        client_id: Uuid,
    ) -> Result<(), AppError> {
        let store = self
            .store_repo
            .find_by_id(store_id)
            .await?
            .ok_or(AppError::StoreNotFound)?;

        if store.client_id != client_id {
            return Err(AppError::AccessDenied);
        }
        Ok(())
    }

    pub async fn create(
        &self,
        kind: TransactionKind,
        user: &User,
        requested_client_id: Option<Uuid>,
        mut data: NewTransaction,
    ) -> Result<TransactionRecord, AppError> {
        // O tenant vem do token; só super_admin pode escolher outro
        let client_id =
            access::effective_client_id(user.role, user.client_id, requested_client_id)?;
        data.client_id = client_id;

        if let Some(store_id) = data.store_id {
            self.ensure_store_in_client(store_id, client_id).await?;
        }

        let id = self.repo.insert(kind, &data).await?;

        // Refaz a busca para devolver a linha com o nome da loja achatado
        self.repo
            .find_by_id(kind, id)
            .await?
            .ok_or(AppError::RecordNotFound)
    }

    pub async fn get_by_id(
        &self,
        kind: TransactionKind,
        user: &User,
        id: Uuid,
    ) -> Result<TransactionRecord, AppError> {
        let record = self
            .repo
            .find_by_id(kind, id)
            .await?
            .ok_or(AppError::RecordNotFound)?;

        access::ensure_client_scope(user.role, user.client_id, record.client_id)?;
        Ok(record)
    }

    pub async fn get_by_reference(
        &self,
        kind: TransactionKind,
        user: &User,
        requested_client_id: Option<Uuid>,
        reference_no: &str,
    ) -> Result<TransactionRecord, AppError> {
        let client_id =
            access::effective_client_id(user.role, user.client_id, requested_client_id)?;

        self.repo
            .find_by_reference(kind, client_id, reference_no)
            .await?
            .ok_or(AppError::RecordNotFound)
    }

    pub async fn list(
        &self,
        kind: TransactionKind,
        user: &User,
        requested_client_id: Option<Uuid>,
        filter: TransactionFilter,
        pagination: Pagination,
    ) -> Result<Page<TransactionRecord>, AppError> {
        let client_id =
            access::effective_client_id(user.role, user.client_id, requested_client_id)?;

        let data = self.repo.list(kind, client_id, &filter, pagination).await?;
        let total = self.repo.count(kind, client_id, &filter).await?;

        Ok(Page {
            data,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
        })
    }

    // Listagem combinada: intercala os três livros pela data de cada um
    // (as colunas de data são independentes, então a ordenação cruzada só
    // pode acontecer depois do merge).
    pub async fn list_combined(
        &self,
        user: &User,
        requested_client_id: Option<Uuid>,
        filter: TransactionFilter,
        pagination: Pagination,
    ) -> Result<Page<TaggedTransaction>, AppError> {
        let client_id =
            access::effective_client_id(user.role, user.client_id, requested_client_id)?;

        let mut merged: Vec<TaggedTransaction> = Vec::new();
        for kind in [
            TransactionKind::Sale,
            TransactionKind::Purchase,
            TransactionKind::Expense,
        ] {
            let records = self.repo.list_unpaginated(kind, client_id, &filter).await?;
            merged.extend(
                records
                    .into_iter()
                    .map(|record| TaggedTransaction { kind, record }),
            );
        }

        merged.sort_by(|a, b| {
            b.record
                .entry_date
                .cmp(&a.record.entry_date)
                .then(b.record.created_at.cmp(&a.record.created_at))
        });

        let total = merged.len() as i64;
        let start = (pagination.offset() as usize).min(merged.len());
        let end = (start + pagination.limit() as usize).min(merged.len());
        let data = merged[start..end].to_vec();

        Ok(Page {
            data,
            total,
            page: pagination.page,
            page_size: pagination.page_size,
        })
    }

    pub async fn update_by_id(
        &self,
        kind: TransactionKind,
        user: &User,
        id: Uuid,
        update: TransactionUpdate,
    ) -> Result<TransactionRecord, AppError> {
        // O escopo é decidido pela linha existente, não pelo corpo
        let current = self.get_by_id(kind, user, id).await?;

        if let Some(Some(store_id)) = update.store_id {
            self.ensure_store_in_client(store_id, current.client_id).await?;
        }

        let updated_id = self
            .repo
            .update_by_id(kind, id, &update)
            .await?
            .ok_or(AppError::RecordNotFound)?;

        self.repo
            .find_by_id(kind, updated_id)
            .await?
            .ok_or(AppError::RecordNotFound)
    }

    pub async fn update_by_reference(
        &self,
        kind: TransactionKind,
        user: &User,
        requested_client_id: Option<Uuid>,
        reference_no: &str,
        update: TransactionUpdate,
    ) -> Result<TransactionRecord, AppError> {
        let client_id =
            access::effective_client_id(user.role, user.client_id, requested_client_id)?;

        if let Some(Some(store_id)) = update.store_id {
            self.ensure_store_in_client(store_id, client_id).await?;
        }

        let updated_id = self
            .repo
            .update_by_reference(kind, client_id, reference_no, &update)
            .await?
            .ok_or(AppError::RecordNotFound)?;

        self.repo
            .find_by_id(kind, updated_id)
            .await?
            .ok_or(AppError::RecordNotFound)
    }

    pub async fn delete_by_id(
        &self,
        kind: TransactionKind,
        user: &User,
        id: Uuid,
    ) -> Result<(), AppError> {
        // Garante 403 antes de 404 para linhas de outro tenant
        self.get_by_id(kind, user, id).await?;

        let deleted = self.repo.delete_by_id(kind, id).await?;
        if !deleted {
            return Err(AppError::RecordNotFound);
        }
        Ok(())
    }

    pub async fn delete_by_reference(
        &self,
        kind: TransactionKind,
        user: &User,
        requested_client_id: Option<Uuid>,
        reference_no: &str,
    ) -> Result<(), AppError> {
        let client_id =
            access::effective_client_id(user.role, user.client_id, requested_client_id)?;

        let deleted = self
            .repo
            .delete_by_reference(kind, client_id, reference_no)
            .await?;
        if !deleted {
            return Err(AppError::RecordNotFound);
        }
        Ok(())
    }
}
