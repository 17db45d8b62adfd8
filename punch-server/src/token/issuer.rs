//! Token issuance for member devices
//!
//! Issuing never touches the replay guard. It may create the member's ACTIVE
//! card; concurrent first issuances race on the `idx_cards_one_active` index
//! and the loser reads the winner's card.

use std::sync::Arc;

use shared::models::{CardActivity, CardProgress, IssuedToken};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::TokenSigner;
use crate::db::{cards, events, is_unique_violation, programs};
use crate::error::{LoyaltyError, LoyaltyResult};

#[derive(Debug, Clone)]
pub struct TokenIssuer {
    pool: SqlitePool,
    signer: Arc<TokenSigner>,
}

impl TokenIssuer {
    pub fn new(pool: SqlitePool, signer: Arc<TokenSigner>) -> Self {
        Self { pool, signer }
    }

    pub async fn issue(&self, tenant_id: &str, member_id: &str) -> LoyaltyResult<IssuedToken> {
        self.issue_at(tenant_id, member_id, now_millis()).await
    }

    /// Resolve (or create) the member's ACTIVE card and mint a fresh token for it
    pub async fn issue_at(
        &self,
        tenant_id: &str,
        member_id: &str,
        now: i64,
    ) -> LoyaltyResult<IssuedToken> {
        let card = self.resolve_card(tenant_id, member_id, now).await?;

        let jti = uuid::Uuid::new_v4().to_string();
        let token = self
            .signer
            .mint(tenant_id, member_id, card.card_id, &jti, now)?;

        tracing::debug!(
            tenant_id = %tenant_id,
            member_id = %member_id,
            card_id = card.card_id,
            jti = %jti,
            "Presentation token issued"
        );

        Ok(IssuedToken {
            card,
            token,
            ttl_secs: self.signer.ttl_secs(),
        })
    }

    /// The member's ACTIVE card, if any
    pub async fn current_card(
        &self,
        tenant_id: &str,
        member_id: &str,
    ) -> LoyaltyResult<Option<CardProgress>> {
        Ok(cards::find_active_progress(&self.pool, tenant_id, member_id).await?)
    }

    /// Every card the member has held, newest first
    pub async fn card_history(
        &self,
        tenant_id: &str,
        member_id: &str,
    ) -> LoyaltyResult<Vec<CardProgress>> {
        Ok(cards::list_for_member(&self.pool, tenant_id, member_id).await?)
    }

    /// Stamps and redemption recorded against one of the member's cards.
    /// `None` if the card is not the member's.
    pub async fn card_activity(
        &self,
        tenant_id: &str,
        member_id: &str,
        card_id: i64,
    ) -> LoyaltyResult<Option<CardActivity>> {
        let Some(card) = cards::find_progress(&self.pool, tenant_id, card_id)
            .await?
            .filter(|c| c.member_id == member_id)
        else {
            return Ok(None);
        };

        let stamps = events::stamps_for_card(&self.pool, tenant_id, card_id).await?;
        let redemption = events::redemption_for_card(&self.pool, tenant_id, card_id).await?;
        Ok(Some(CardActivity {
            card,
            stamps,
            redemption,
        }))
    }

    async fn resolve_card(
        &self,
        tenant_id: &str,
        member_id: &str,
        now: i64,
    ) -> LoyaltyResult<CardProgress> {
        if let Some(card) = cards::find_active_progress(&self.pool, tenant_id, member_id).await? {
            return Ok(card);
        }

        let program = programs::find_active(&self.pool, tenant_id)
            .await?
            .ok_or_else(|| LoyaltyError::NoActiveProgram {
                tenant_id: tenant_id.to_string(),
            })?;

        match cards::insert_active(&self.pool, tenant_id, member_id, program.id, now).await {
            Ok(card) => {
                tracing::info!(
                    tenant_id = %tenant_id,
                    member_id = %member_id,
                    card_id = card.id,
                    program_id = program.id,
                    "Card created"
                );
            }
            Err(e) if is_unique_violation(&e) => {
                tracing::debug!(
                    tenant_id = %tenant_id,
                    member_id = %member_id,
                    "Concurrent card creation lost, reading existing card"
                );
            }
            Err(e) => return Err(e.into()),
        }

        // Read back through the join so the bound program travels with the card
        cards::find_active_progress(&self.pool, tenant_id, member_id)
            .await?
            .ok_or_else(|| {
                // Only reachable if the card was redeemed between insert and read
                LoyaltyError::Storage(sqlx::Error::RowNotFound)
            })
    }
}
