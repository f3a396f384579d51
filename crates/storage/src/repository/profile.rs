use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NotificationCategory, is_valid_email};
use crate::services::fallback::{Resolver, ResolverChain};

fn non_blank(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Display names keyed by user id, resolved for a whole ranking at once.
pub type DisplayNames = ResolverChain<[Uuid], HashMap<Uuid, String>>;

fn name_map(rows: Vec<(Uuid, Option<String>)>) -> Option<HashMap<Uuid, String>> {
    let names: HashMap<Uuid, String> = rows
        .into_iter()
        .filter_map(|(id, name)| non_blank(name).map(|name| (id, name)))
        .collect();

    (!names.is_empty()).then_some(names)
}

/// RPC that reads public profiles regardless of row-level security.
pub struct DisplayNameViaRpc {
    pool: PgPool,
}

#[async_trait]
impl Resolver<[Uuid], HashMap<Uuid, String>> for DisplayNameViaRpc {
    fn name(&self) -> &'static str {
        "get_public_display_name"
    }

    async fn resolve(&self, user_ids: &[Uuid]) -> Result<Option<HashMap<Uuid, String>>> {
        let rows: Vec<(Uuid, Option<String>)> = sqlx::query_as(
            "SELECT t.id, get_public_display_name(t.id) FROM UNNEST($1::uuid[]) AS t(id)",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(name_map(rows))
    }
}

pub struct DisplayNameDirect {
    pool: PgPool,
}

#[async_trait]
impl Resolver<[Uuid], HashMap<Uuid, String>> for DisplayNameDirect {
    fn name(&self) -> &'static str {
        "user_profiles"
    }

    async fn resolve(&self, user_ids: &[Uuid]) -> Result<Option<HashMap<Uuid, String>>> {
        let rows: Vec<(Uuid, Option<String>)> =
            sqlx::query_as("SELECT id, display_name FROM user_profiles WHERE id = ANY($1)")
                .bind(user_ids)
                .fetch_all(&self.pool)
                .await?;

        Ok(name_map(rows))
    }
}

/// Last resort when filtered reads are denied but listing is allowed.
/// Reads the table once per lookup, however many ids are asked for.
pub struct DisplayNameScan {
    pool: PgPool,
}

#[async_trait]
impl Resolver<[Uuid], HashMap<Uuid, String>> for DisplayNameScan {
    fn name(&self) -> &'static str {
        "user_profiles_scan"
    }

    async fn resolve(&self, user_ids: &[Uuid]) -> Result<Option<HashMap<Uuid, String>>> {
        let wanted: HashSet<&Uuid> = user_ids.iter().collect();
        let rows: Vec<(Uuid, Option<String>)> =
            sqlx::query_as("SELECT id, display_name FROM user_profiles")
                .fetch_all(&self.pool)
                .await?;

        Ok(name_map(
            rows.into_iter()
                .filter(|(id, _)| wanted.contains(id))
                .collect(),
        ))
    }
}

/// RPC, then direct query, then full scan.
pub fn display_name_chain(pool: &PgPool) -> DisplayNames {
    ResolverChain::new()
        .with(DisplayNameViaRpc { pool: pool.clone() })
        .with(DisplayNameDirect { pool: pool.clone() })
        .with(DisplayNameScan { pool: pool.clone() })
}

struct RecipientsViaRpc {
    pool: PgPool,
}

#[async_trait]
impl Resolver<NotificationCategory, Vec<String>> for RecipientsViaRpc {
    fn name(&self) -> &'static str {
        "get_email_recipients"
    }

    async fn resolve(&self, category: &NotificationCategory) -> Result<Option<Vec<String>>> {
        let emails: Vec<Option<String>> =
            sqlx::query_scalar("SELECT email FROM get_email_recipients($1)")
                .bind(category.as_str())
                .fetch_all(&self.pool)
                .await?;

        Ok(Some(emails.into_iter().flatten().collect()))
    }
}

struct RecipientsDirect {
    pool: PgPool,
}

#[async_trait]
impl Resolver<NotificationCategory, Vec<String>> for RecipientsDirect {
    fn name(&self) -> &'static str {
        "user_profiles_recipients"
    }

    async fn resolve(&self, category: &NotificationCategory) -> Result<Option<Vec<String>>> {
        let filter = match category {
            NotificationCategory::Contest => "AND contest_notifications = true",
            NotificationCategory::General => "AND general_notifications = true",
            NotificationCategory::Essential => "",
        };

        let emails: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT email FROM user_profiles WHERE email IS NOT NULL {filter}"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(emails))
    }
}

pub struct ProfileRepository {
    recipients: ResolverChain<NotificationCategory, Vec<String>>,
}

impl ProfileRepository {
    pub fn new(pool: &PgPool) -> Self {
        let recipients = ResolverChain::new()
            .with(RecipientsViaRpc { pool: pool.clone() })
            .with(RecipientsDirect { pool: pool.clone() });

        Self { recipients }
    }

    /// Distinct, syntactically valid addresses for a mailing category.
    /// Unreadable profiles yield an empty list.
    pub async fn notification_recipients(&self, category: NotificationCategory) -> Vec<String> {
        let emails = self.recipients.resolve(&category).await.unwrap_or_else(|| {
            tracing::warn!(category = category.as_str(), "No recipient source was readable");
            Vec::new()
        });

        let mut seen = HashSet::new();
        emails
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| is_valid_email(e))
            .filter(|e| seen.insert(e.to_lowercase()))
            .collect()
    }
}
