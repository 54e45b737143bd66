//! Database operations for the `questions` and `question_answers` tables.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A question joined with its optional answer sub-record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub business_profile_id: i64,
    pub external_id: String,
    pub author_name: String,
    pub text: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub answer_content: Option<String>,
    pub answered_at: Option<DateTime<Utc>>,
}

/// Returns a profile's answered questions, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_answered_questions(
    pool: &PgPool,
    business_profile_id: i64,
) -> Result<Vec<QuestionRow>, DbError> {
    let rows = sqlx::query_as::<_, QuestionRow>(
        "SELECT q.id, q.business_profile_id, q.external_id, q.author_name, q.text, \
                q.status, q.created_at, \
                a.content AS answer_content, a.answered_at \
         FROM questions q \
         LEFT JOIN question_answers a ON a.question_id = q.id \
         WHERE q.business_profile_id = $1 AND q.status = 'ANSWERED' \
         ORDER BY q.created_at DESC",
    )
    .bind(business_profile_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Creates a question in `UNANSWERED` status and returns its internal id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_question(
    pool: &PgPool,
    business_profile_id: i64,
    external_id: &str,
    author_name: &str,
    text: &str,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO questions (business_profile_id, external_id, author_name, text) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id",
    )
    .bind(business_profile_id)
    .bind(external_id)
    .bind(author_name)
    .bind(text)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Persists an answer and flips the question to `ANSWERED`, in one
/// transaction.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the question does not exist, or
/// [`DbError::Sqlx`] if either statement fails.
pub async fn answer_question(
    pool: &PgPool,
    question_id: i64,
    content: &str,
) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        "UPDATE questions SET status = 'ANSWERED', updated_at = NOW() WHERE id = $1",
    )
    .bind(question_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(DbError::NotFound);
    }

    sqlx::query(
        "INSERT INTO question_answers (question_id, content) \
         VALUES ($1, $2) \
         ON CONFLICT (question_id) DO UPDATE SET \
             content     = EXCLUDED.content, \
             answered_at = NOW()",
    )
    .bind(question_id)
    .bind(content)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}
