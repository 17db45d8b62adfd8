use shared::util::now_millis;

use super::{RedeemOutcome, StaffContext, TransactionEngine, log_rejection};
use crate::db::events::EventActor;
use crate::db::{cards, events, programs, token_uses};
use crate::error::{LoyaltyError, LoyaltyResult};

impl TransactionEngine {
    /// Redeem a full card and, if the tenant still has an active program,
    /// replace it with a fresh ACTIVE card for the same member.
    pub async fn redeem(
        &self,
        staff: &StaffContext,
        raw_token: &str,
    ) -> LoyaltyResult<RedeemOutcome> {
        self.redeem_at(staff, raw_token, now_millis()).await
    }

    pub async fn redeem_at(
        &self,
        staff: &StaffContext,
        raw_token: &str,
        now: i64,
    ) -> LoyaltyResult<RedeemOutcome> {
        let result = self.try_redeem(staff, raw_token, now).await;
        if let Err(e) = &result {
            log_rejection("redeem", staff, e);
        }
        result
    }

    async fn try_redeem(
        &self,
        staff: &StaffContext,
        raw_token: &str,
        now: i64,
    ) -> LoyaltyResult<RedeemOutcome> {
        let token = self.authorize(staff, raw_token, now)?;
        let tenant_id = token.tenant_id.as_str();

        let mut tx = self.pool.begin().await?;

        if !token_uses::claim(&mut *tx, tenant_id, &token.jti, token.card_id, now).await? {
            return Err(LoyaltyError::TokenReplayed { jti: token.jti });
        }

        let card = cards::find_progress(&mut *tx, tenant_id, token.card_id)
            .await?
            .filter(|c| c.member_id == token.member_id)
            .ok_or(LoyaltyError::CardNotFound {
                card_id: token.card_id,
            })?;

        let not_eligible = LoyaltyError::CardNotEligible {
            card_id: card.card_id,
            stamp_count: card.stamp_count,
            stamps_required: card.stamps_required,
        };
        if !card.is_active() || !card.is_full() {
            return Err(not_eligible);
        }
        if !cards::mark_redeemed(&mut *tx, tenant_id, card.card_id, now).await? {
            return Err(not_eligible);
        }

        let actor = EventActor {
            staff_id: &staff.staff_id,
            branch_id: &staff.branch_id,
            jti: &token.jti,
        };
        events::insert_redemption(&mut *tx, tenant_id, card.card_id, actor, now).await?;

        // Same transactional view as the redemption itself
        let new_card = match programs::find_active(&mut *tx, tenant_id).await? {
            Some(program) => Some(
                cards::insert_active(&mut *tx, tenant_id, &token.member_id, program.id, now)
                    .await?,
            ),
            None => None,
        };

        tx.commit().await?;

        tracing::info!(
            tenant_id = %tenant_id,
            card_id = card.card_id,
            staff_id = %staff.staff_id,
            branch_id = %staff.branch_id,
            jti = %token.jti,
            new_card_id = ?new_card.as_ref().map(|c| c.id),
            "Card redeemed"
        );
        if new_card.is_none() {
            tracing::warn!(
                tenant_id = %tenant_id,
                member_id = %token.member_id,
                "No active program, redeemed card not replaced"
            );
        }

        Ok(RedeemOutcome {
            redeemed_card_id: card.card_id,
            new_card,
        })
    }
}
