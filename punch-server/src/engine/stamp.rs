use shared::models::StampResult;
use shared::util::now_millis;

use super::{StaffContext, TransactionEngine, log_rejection};
use crate::db::events::EventActor;
use crate::db::{cards, events, token_uses};
use crate::error::{LoyaltyError, LoyaltyResult};

impl TransactionEngine {
    /// Record one stamp against the card the token was issued for
    pub async fn stamp(&self, staff: &StaffContext, raw_token: &str) -> LoyaltyResult<StampResult> {
        self.stamp_at(staff, raw_token, now_millis()).await
    }

    pub async fn stamp_at(
        &self,
        staff: &StaffContext,
        raw_token: &str,
        now: i64,
    ) -> LoyaltyResult<StampResult> {
        let result = self.try_stamp(staff, raw_token, now).await;
        if let Err(e) = &result {
            log_rejection("stamp", staff, e);
        }
        result
    }

    async fn try_stamp(
        &self,
        staff: &StaffContext,
        raw_token: &str,
        now: i64,
    ) -> LoyaltyResult<StampResult> {
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

        if !card.is_active() {
            return Err(LoyaltyError::CardNotActive {
                card_id: card.card_id,
            });
        }
        if card.is_full() {
            return Err(LoyaltyError::CardFull {
                card_id: card.card_id,
                stamps_required: card.stamps_required,
            });
        }

        if self.cooldown_ms > 0 {
            let last = events::last_stamp_at(&mut *tx, card.card_id).await?;
            if let Some(last) = last {
                let elapsed = now - last;
                if elapsed < self.cooldown_ms {
                    return Err(LoyaltyError::RateLimited {
                        card_id: card.card_id,
                        retry_after_ms: (self.cooldown_ms - elapsed).clamp(1, self.cooldown_ms),
                    });
                }
            }
        }

        let stamp_count = cards::increment_stamp(&mut *tx, tenant_id, card.card_id)
            .await?
            .ok_or(LoyaltyError::CardNotActive {
                card_id: card.card_id,
            })?;

        let actor = EventActor {
            staff_id: &staff.staff_id,
            branch_id: &staff.branch_id,
            jti: &token.jti,
        };
        events::insert_stamp(&mut *tx, tenant_id, card.card_id, actor, now).await?;

        tx.commit().await?;

        tracing::info!(
            tenant_id = %tenant_id,
            card_id = card.card_id,
            staff_id = %staff.staff_id,
            branch_id = %staff.branch_id,
            jti = %token.jti,
            stamp_count,
            stamps_required = card.stamps_required,
            "Card stamped"
        );

        Ok(StampResult {
            card_id: card.card_id,
            stamp_count,
            stamps_required: card.stamps_required,
        })
    }
}
