//! Postgres-backed contact store implementation.
//!
//! Persistent [`ContactStore`] over sqlx. The `contacts` table (see
//! `crates/infra/schema.sql`) uses a `BIGSERIAL` id, so id order and
//! creation order agree, which the algorithm's "oldest wins" tie-break
//! relies on. Soft-deleted rows (`deleted_at IS NOT NULL`) are filtered in
//! every query.
//!
//! ## Error Mapping
//!
//! Every sqlx failure is wrapped as `ContactStoreError::Backend` with the
//! operation name and the original error preserved as the source. Rows
//! that decode but violate a cluster invariant map to
//! `ContactStoreError::Inconsistent`.
//!
//! ## Thread Safety
//!
//! `PostgresContactStore` is `Send + Sync`; all operations go through the
//! sqlx connection pool.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use linkwise_core::{Contact, ContactId, LinkPrecedence};

use super::r#trait::{ContactStore, ContactStoreError, NewContact};

const SELECT_COLUMNS: &str =
    "id, email, phone_number, link_precedence, linked_id, created_at, updated_at, deleted_at";

/// Postgres implementation of [`ContactStore`].
#[derive(Debug, Clone)]
pub struct PostgresContactStore {
    pool: Arc<PgPool>,
}

impl PostgresContactStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[derive(Debug, FromRow)]
struct ContactRow {
    id: i64,
    email: Option<String>,
    phone_number: Option<String>,
    link_precedence: String,
    linked_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<ContactRow> for Contact {
    type Error = ContactStoreError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let link_precedence = match row.link_precedence.as_str() {
            "primary" => LinkPrecedence::Primary,
            "secondary" => LinkPrecedence::Secondary,
            other => {
                return Err(ContactStoreError::Inconsistent(format!(
                    "contact {} has unknown link_precedence `{other}`",
                    row.id
                )));
            }
        };

        Ok(Contact {
            id: ContactId(row.id),
            email: row.email,
            phone_number: row.phone_number,
            link_precedence,
            linked_id: row.linked_id.map(ContactId),
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

fn precedence_literal(p: LinkPrecedence) -> &'static str {
    match p {
        LinkPrecedence::Primary => "primary",
        LinkPrecedence::Secondary => "secondary",
    }
}

fn map_sqlx_error(op: &'static str, source: sqlx::Error) -> ContactStoreError {
    ContactStoreError::Backend { op, source }
}

fn rows_to_contacts(rows: Vec<ContactRow>) -> Result<Vec<Contact>, ContactStoreError> {
    rows.into_iter().map(Contact::try_from).collect()
}

#[async_trait]
impl ContactStore for PostgresContactStore {
    #[instrument(skip(self), fields(has_email = email.is_some(), has_phone = phone.is_some()), err)]
    async fn find_matching(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Vec<Contact>, ContactStoreError> {
        let sql = format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM contacts
            WHERE deleted_at IS NULL
              AND (($1::text IS NOT NULL AND email = $1)
                OR ($2::text IS NOT NULL AND phone_number = $2))
            ORDER BY created_at ASC, id ASC
            "#
        );

        let rows: Vec<ContactRow> = sqlx::query_as(&sql)
            .bind(email)
            .bind(phone)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_matching", e))?;

        rows_to_contacts(rows)
    }

    #[instrument(skip(self, new), fields(precedence = precedence_literal(new.link_precedence)), err)]
    async fn create(&self, new: NewContact) -> Result<Contact, ContactStoreError> {
        let sql = format!(
            r#"
            INSERT INTO contacts (email, phone_number, link_precedence, linked_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {SELECT_COLUMNS}
            "#
        );

        let row: ContactRow = sqlx::query_as(&sql)
            .bind(new.email.as_deref())
            .bind(new.phone_number.as_deref())
            .bind(precedence_literal(new.link_precedence))
            .bind(new.linked_id.map(|id| id.as_i64()))
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("create", e))?;

        Contact::try_from(row)
    }

    #[instrument(skip(self), fields(demoted = ids.len(), new_linked_id = %new_linked_id), err)]
    async fn demote_to_secondary(
        &self,
        ids: &[ContactId],
        new_linked_id: ContactId,
    ) -> Result<(), ContactStoreError> {
        let raw_ids: Vec<i64> = ids.iter().map(|id| id.as_i64()).collect();

        // One bulk update covers the demoted primaries and any of their
        // secondaries, so linked_id always points at the current primary.
        sqlx::query(
            r#"
            UPDATE contacts
            SET link_precedence = 'secondary',
                linked_id = $2,
                updated_at = now()
            WHERE id = ANY($1) OR linked_id = ANY($1)
            "#,
        )
        .bind(&raw_ids)
        .bind(new_linked_id.as_i64())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("demote_to_secondary", e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(primary_id = %primary_id), err)]
    async fn find_cluster(
        &self,
        primary_id: ContactId,
    ) -> Result<Vec<Contact>, ContactStoreError> {
        let sql = format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM contacts
            WHERE deleted_at IS NULL
              AND (id = $1 OR linked_id = $1)
            ORDER BY created_at ASC, id ASC
            "#
        );

        let rows: Vec<ContactRow> = sqlx::query_as(&sql)
            .bind(primary_id.as_i64())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_cluster", e))?;

        rows_to_contacts(rows)
    }
}
