//! End-to-end run against a real PostgreSQL database.
//!
//! Skipped unless `RAGCHUNK_TEST_DATABASE_URL` points at a disposable
//! database: the test truncates `documents` and `chunks`.

use ragchunk_core::{ChunkingConfig, NewDocument};
use ragchunk_ingest::store::postgres::{insert_documents, run_migrations};
use ragchunk_ingest::store::{PgChunkWriter, PgDocumentReader};
use ragchunk_ingest::{create_chunks_for_all_documents, RunReport};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

fn test_url() -> Option<String> {
    std::env::var("RAGCHUNK_TEST_DATABASE_URL")
        .ok()
        .filter(|s| !s.is_empty())
}

async fn single_connection(url: &str) -> PgPool {
    PgPoolOptions::new()
        .max_connections(1)
        .connect(url)
        .await
        .unwrap()
}

#[tokio::test]
async fn chunks_round_trip_through_postgres() {
    let Some(url) = test_url() else {
        eprintln!("skipping: RAGCHUNK_TEST_DATABASE_URL not set");
        return;
    };

    let setup = single_connection(&url).await;
    run_migrations(&setup).await.unwrap();
    sqlx::query("TRUNCATE chunks, documents RESTART IDENTITY")
        .execute(&setup)
        .await
        .unwrap();

    let docs = vec![
        NewDocument::new("a.txt", "abcdefghijklmno"),
        NewDocument::new("b.md", "short"),
        NewDocument::new("c.txt", "   "),
    ];
    let inserted = insert_documents(&setup, &docs).await.unwrap();
    let sources: Vec<&str> = inserted.iter().map(|(_, s)| s.as_str()).collect();
    assert_eq!(sources, vec!["a.txt", "b.md", "c.txt"]);

    // One document per fetch and two rows per INSERT exercise both batch loops.
    let mut reader = PgDocumentReader::new(single_connection(&url).await, 1);
    let mut writer = PgChunkWriter::new(single_connection(&url).await, 2);
    let report = create_chunks_for_all_documents(
        &mut reader,
        &mut writer,
        &ChunkingConfig::with_window(10, 5),
    )
    .await
    .unwrap();
    assert_eq!(report, RunReport { documents: 3, chunks: 5 });

    let rows: Vec<(i64, i32, String)> = sqlx::query_as(
        "SELECT document_id, chunk_index, text FROM chunks ORDER BY document_id, chunk_index",
    )
    .fetch_all(&setup)
    .await
    .unwrap();

    let (a, b, c) = (inserted[0].0, inserted[1].0, inserted[2].0);
    assert_eq!(
        rows,
        vec![
            (a, 0, "abcdefghij".to_string()),
            (a, 1, "fghijklmno".to_string()),
            (a, 2, "klmno".to_string()),
            (b, 0, "short".to_string()),
            (c, 0, String::new()),
        ]
    );

    setup.close().await;
}
