//! Draft pages with a single text block each.

use std::time::Instant;

use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Words};
use serde_json::json;
use sqlx::{PgConnection, PgPool};

use super::models::{PageSeed, SEED_SLUG_PREFIX};

/// `seed-<index>-<words>`, lowercase and hyphenated so it passes slug validation.
fn slug_for(index: usize, words: &[String]) -> String {
    let tail = words
        .iter()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if tail.is_empty() {
        format!("{SEED_SLUG_PREFIX}{index}")
    } else {
        format!("{SEED_SLUG_PREFIX}{index}-{tail}")
    }
}

fn title_for(words: &[String]) -> String {
    let mut title = words.join(" ");
    if let Some(first) = title.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    title
}

pub fn generate_pages(start: usize, count: usize) -> Vec<PageSeed> {
    (start..start + count)
        .map(|index| {
            let words: Vec<String> = Words(2..5).fake();
            let body: String = Paragraph(2..4).fake();

            PageSeed {
                slug: slug_for(index, &words),
                title: title_for(&words),
                body,
            }
        })
        .collect()
}

/// Inserts `count` unpublished pages and one visible `text` block per page.
pub async fn seed_pages(db: &PgPool, count: usize) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    println!("📄 Seeding {count} draft pages...");

    // Continue numbering after pages from earlier runs.
    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pages WHERE slug LIKE $1")
        .bind(format!("{SEED_SLUG_PREFIX}%"))
        .fetch_one(db)
        .await?;

    let pages = generate_pages(existing as usize, count);

    let mut tx = db.begin().await?;
    let mut inserted = 0;
    for page in &pages {
        if insert_page(&mut *tx, page).await? {
            inserted += 1;
        }
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} pages in {:?}",
        inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

async fn insert_page(conn: &mut PgConnection, page: &PageSeed) -> anyhow::Result<bool> {
    let page_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO pages (slug, title, is_published)
         VALUES ($1, $2, FALSE)
         ON CONFLICT (slug) DO NOTHING
         RETURNING id",
    )
    .bind(&page.slug)
    .bind(&page.title)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(page_id) = page_id else {
        return Ok(false);
    };

    sqlx::query(
        "INSERT INTO page_blocks (page_id, block_type, content, sort_order, is_visible)
         VALUES ($1, 'text', $2, 0, TRUE)",
    )
    .bind(page_id)
    .bind(json!({ "text": page.body }))
    .execute(&mut *conn)
    .await?;

    Ok(true)
}

/// Deletes generated pages. Their blocks and revisions go with them.
pub async fn clear_pages(db: &PgPool) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM pages WHERE slug LIKE $1")
        .bind(format!("{SEED_SLUG_PREFIX}%"))
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}
