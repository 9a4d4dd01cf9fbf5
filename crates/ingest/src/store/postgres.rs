//! PostgreSQL implementation of the reader/writer seams.
//!
//! Expected schema (see `migrations/`):
//! - `documents(id BIGSERIAL PRIMARY KEY, source TEXT, content TEXT)`
//! - `chunks(document_id BIGINT REFERENCES documents(id), chunk_index INTEGER, text TEXT)`

use async_trait::async_trait;
use ragchunk_core::{ChunkRow, Document, DocumentId, NewDocument, PostgresConfig};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, Transaction};
use tracing::{debug, info, warn};

use super::{ChunkWriter, DocumentReader, StoreError};
use crate::error::IngestError;

const CURSOR_NAME: &str = "doc_stream_cursor";

/// Rows per `INSERT INTO documents` statement (two binds per row).
const DOCUMENT_INSERT_ROWS: usize = 1000;

pub fn connect_options(config: &PostgresConfig) -> PgConnectOptions {
    let mut opts = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .database(&config.database);
    if let Some(user) = &config.username {
        opts = opts.username(user);
    }
    if let Some(password) = &config.password {
        opts = opts.password(password);
    }
    opts
}

/// Open a pool that holds exactly one connection, so each handle owns a
/// dedicated session. The connection is established eagerly.
pub async fn connect(config: &PostgresConfig) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options(config))
        .await
        .map_err(StoreError::Connection)?;
    info!("PostgreSQL connected: {}:{}/{}", config.host, config.port, config.database);
    Ok(pool)
}

/// Apply the bundled schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), IngestError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    info!("Database migrations applied successfully");
    Ok(())
}

/// Insert documents in one transaction and return their assigned ids.
pub async fn insert_documents(
    pool: &PgPool,
    docs: &[NewDocument],
) -> Result<Vec<(DocumentId, String)>, StoreError> {
    if docs.is_empty() {
        return Ok(Vec::new());
    }

    let mut tx = pool.begin().await.map_err(StoreError::InsertDocuments)?;
    let mut inserted = Vec::with_capacity(docs.len());

    for batch in docs.chunks(DOCUMENT_INSERT_ROWS) {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO documents (source, content) ");
        qb.push_values(batch, |mut b, doc| {
            b.push_bind(&doc.source).push_bind(&doc.content);
        });
        qb.push(" RETURNING id, source");

        let rows = qb
            .build()
            .persistent(false)
            .fetch_all(&mut *tx)
            .await
            .map_err(StoreError::InsertDocuments)?;
        for row in rows {
            let id: DocumentId = row.try_get("id").map_err(StoreError::InsertDocuments)?;
            let source: String = row.try_get("source").map_err(StoreError::InsertDocuments)?;
            inserted.push((id, source));
        }
    }

    tx.commit().await.map_err(StoreError::InsertDocuments)?;
    Ok(inserted)
}

// ── Reader ──────────────────────────────────────────────────────────

/// Server-side cursor over `documents`, fetched `fetch_size` rows at a time.
///
/// The cursor lives inside a read transaction that is opened on the first
/// [`DocumentReader::next_page`] call and ended by [`DocumentReader::close`].
pub struct PgDocumentReader {
    pool: PgPool,
    cursor: Option<Transaction<'static, Postgres>>,
    fetch_size: usize,
    exhausted: bool,
}

impl PgDocumentReader {
    pub fn new(pool: PgPool, fetch_size: usize) -> Self {
        Self {
            pool,
            cursor: None,
            fetch_size: fetch_size.max(1),
            exhausted: false,
        }
    }

    pub async fn connect(config: &PostgresConfig, fetch_size: usize) -> Result<Self, StoreError> {
        Ok(Self::new(connect(config).await?, fetch_size))
    }

    async fn declare_cursor(&self) -> Result<Transaction<'static, Postgres>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::Read)?;
        let declare = declare_cursor_sql();
        sqlx::query(&declare)
            .persistent(false)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::Read)?;
        debug!(cursor = CURSOR_NAME, fetch_size = self.fetch_size, "declared document cursor");
        Ok(tx)
    }
}

fn declare_cursor_sql() -> String {
    format!(
        "DECLARE {CURSOR_NAME} NO SCROLL CURSOR FOR \
         SELECT id::BIGINT AS id, source, content FROM documents"
    )
}

fn fetch_page_sql(fetch_size: usize) -> String {
    format!("FETCH FORWARD {fetch_size} FROM {CURSOR_NAME}")
}

fn document_from_row(row: &PgRow) -> Result<Document, sqlx::Error> {
    Ok(Document {
        id: row.try_get("id")?,
        source: row.try_get("source")?,
        content: row.try_get("content")?,
    })
}

#[async_trait]
impl DocumentReader for PgDocumentReader {
    async fn next_page(&mut self) -> Result<Vec<Document>, StoreError> {
        if self.exhausted {
            return Ok(Vec::new());
        }

        let tx = match self.cursor.take() {
            Some(tx) => tx,
            None => self.declare_cursor().await?,
        };
        let tx = self.cursor.insert(tx);

        let fetch = fetch_page_sql(self.fetch_size);
        let rows = sqlx::query(&fetch)
            .persistent(false)
            .fetch_all(&mut **tx)
            .await
            .map_err(StoreError::Read)?;

        let docs = rows
            .iter()
            .map(document_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::Read)?;
        if docs.is_empty() {
            self.exhausted = true;
        }
        Ok(docs)
    }

    async fn close(&mut self) {
        if let Some(tx) = self.cursor.take() {
            // Read-only work; rolling back just drops the cursor.
            if let Err(e) = tx.rollback().await {
                warn!(error = %e, "failed to end read transaction");
            }
        }
        self.pool.close().await;
    }
}

// ── Writer ──────────────────────────────────────────────────────────

/// Writes chunk rows with multi-row inserts, one transaction per document.
pub struct PgChunkWriter {
    pool: PgPool,
    insert_rows: usize,
}

impl PgChunkWriter {
    pub fn new(pool: PgPool, insert_rows: usize) -> Self {
        Self {
            pool,
            insert_rows: insert_rows.max(1),
        }
    }

    pub async fn connect(config: &PostgresConfig, insert_rows: usize) -> Result<Self, StoreError> {
        Ok(Self::new(connect(config).await?, insert_rows))
    }
}

#[async_trait]
impl ChunkWriter for PgChunkWriter {
    async fn insert_chunks(&mut self, document_id: DocumentId, rows: &[ChunkRow]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }
        let write_err = move |source| StoreError::Write { document_id, source };

        let mut tx = self.pool.begin().await.map_err(write_err)?;
        for batch in rows.chunks(self.insert_rows) {
            let mut qb: QueryBuilder<Postgres> =
                QueryBuilder::new("INSERT INTO chunks (document_id, chunk_index, text) ");
            qb.push_values(batch, |mut b, row| {
                b.push_bind(row.document_id)
                    .push_bind(row.chunk_index)
                    .push_bind(&row.text);
            });
            qb.build()
                .persistent(false)
                .execute(&mut *tx)
                .await
                .map_err(write_err)?;
        }
        tx.commit().await.map_err(write_err)?;
        Ok(())
    }

    async fn close(&mut self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pg_config(username: Option<&str>) -> PostgresConfig {
        PostgresConfig {
            host: "db.internal".to_string(),
            port: 6543,
            database: "corpus".to_string(),
            username: username.map(str::to_string),
            password: Some("secret".to_string()),
        }
    }

    #[test]
    fn connect_options_carry_config() {
        let opts = connect_options(&pg_config(Some("rag")));
        assert_eq!(opts.get_host(), "db.internal");
        assert_eq!(opts.get_port(), 6543);
        assert_eq!(opts.get_database(), Some("corpus"));
        assert_eq!(opts.get_username(), "rag");
    }

    #[test]
    fn cursor_sql_streams_all_documents() {
        assert_eq!(
            declare_cursor_sql(),
            "DECLARE doc_stream_cursor NO SCROLL CURSOR FOR \
             SELECT id::BIGINT AS id, source, content FROM documents"
        );
        assert_eq!(fetch_page_sql(50), "FETCH FORWARD 50 FROM doc_stream_cursor");
    }

    #[tokio::test]
    async fn handles_clamp_batch_sizes_and_start_without_cursor() {
        let pool = PgPoolOptions::new().connect_lazy_with(connect_options(&pg_config(None)));
        let reader = PgDocumentReader::new(pool.clone(), 0);
        assert_eq!(reader.fetch_size, 1);
        assert!(reader.cursor.is_none());
        assert!(!reader.exhausted);

        let writer = PgChunkWriter::new(pool, 0);
        assert_eq!(writer.insert_rows, 1);
    }

    #[test]
    fn chunk_insert_sql_has_one_tuple_per_row() {
        let rows = ChunkRow::for_document(3, vec!["a".into(), "b".into()]);
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO chunks (document_id, chunk_index, text) ");
        qb.push_values(&rows, |mut b, row| {
            b.push_bind(row.document_id)
                .push_bind(row.chunk_index)
                .push_bind(&row.text);
        });
        assert_eq!(
            qb.sql(),
            "INSERT INTO chunks (document_id, chunk_index, text) VALUES ($1, $2, $3), ($4, $5, $6)"
        );
    }
}
