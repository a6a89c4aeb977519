// src/services/storage.rs

use std::path::PathBuf;

use async_trait::async_trait;

use crate::common::error::AppError;

// ---
// Armazenamento de documentos (comprovantes anexados aos lançamentos)
// ---
// O serviço de objetos é um colaborador opaco: recebe (caminho, bytes,
// content-type) e devolve uma URL resolvível publicamente. A trait permite
// trocar a implementação nos testes sem depender de ambiente.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, AppError>;
}

// Implementação em disco local, servindo as URLs sob uma base configurada
pub struct LocalDiskStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalDiskStorage {
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl DocumentStorage for LocalDiskStorage {
    async fn put(
        &self,
        path: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, AppError> {
        let full_path = self.root.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow::anyhow!("Falha ao criar diretório de documentos: {}", e))?;
        }

        tokio::fs::write(&full_path, bytes)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao gravar documento: {}", e))?;

        Ok(format!("{}/{}", self.public_base_url, path))
    }
}

// Mantém só caracteres seguros no nome enviado pelo usuário
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "documento".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("nota fiscal.pdf"), "nota_fiscal.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_file_name(""), "documento");
    }

    #[tokio::test]
    async fn local_disk_storage_writes_and_returns_url() {
        let root = std::env::temp_dir().join(format!("livrocaixa-test-{}", Uuid::new_v4()));
        let storage = LocalDiskStorage::new(root.clone(), "http://localhost:3000/files/".into());

        let url = storage
            .put("tenant-a/recibo.pdf", b"conteudo", "application/pdf")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3000/files/tenant-a/recibo.pdf");

        let written = tokio::fs::read(root.join("tenant-a/recibo.pdf")).await.unwrap();
        assert_eq!(written, b"conteudo");

        tokio::fs::remove_dir_all(root).await.unwrap();
    }
}
