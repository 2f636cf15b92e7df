//! Reward shop: templates priced in points, student purchases and parent
//! approval.
//!
//! Missing endpoints surface as `NotFound` like any other failure; nothing
//! here substitutes placeholder data.

use crate::models::reward::{
    NewRewardTemplate, PurchaseRequest, RejectPurchaseRequest, RewardPurchase,
    RewardPurchaseDto, RewardStats, RewardStatsDto, RewardTemplate, RewardTemplateDto,
    RewardTemplateRequest,
};
use crate::services::http::ApiClient;
use client_core::ApiError;
use urlencoding::encode;

const TEMPLATES_PATH: &str = "/api/rewards/templates";
const PURCHASES_PATH: &str = "/api/rewards/purchases";

fn template_url(id: &str) -> String {
    format!("{}/{}", TEMPLATES_PATH, encode(id))
}

fn purchase_url(id: &str) -> String {
    format!("{}/{}", PURCHASES_PATH, encode(id))
}

#[derive(Clone)]
pub struct RewardService {
    api: ApiClient,
}

impl RewardService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_all_templates(&self) -> Result<Vec<RewardTemplate>, ApiError> {
        let rewards: Vec<RewardTemplateDto> = self.api.get_list(TEMPLATES_PATH).await?;
        Ok(rewards.into_iter().map(RewardTemplate::from).collect())
    }

    pub async fn get_template(&self, id: &str) -> Result<RewardTemplate, ApiError> {
        let reward: RewardTemplateDto = self.api.get(&template_url(id)).await?;
        Ok(reward.into())
    }

    pub async fn create_template(
        &self,
        reward: &NewRewardTemplate,
    ) -> Result<RewardTemplate, ApiError> {
        let created: RewardTemplateDto = self
            .api
            .post(TEMPLATES_PATH, &RewardTemplateRequest::from(reward))
            .await?;
        let created = RewardTemplate::from(created);

        tracing::info!(reward_id = %created.id, point_cost = created.point_cost, "Reward created");
        self.api
            .notify_success(&format!("Reward \"{}\" created", created.name));
        Ok(created)
    }

    pub async fn update_template(
        &self,
        id: &str,
        reward: &NewRewardTemplate,
    ) -> Result<RewardTemplate, ApiError> {
        let updated: RewardTemplateDto = self
            .api
            .put(&template_url(id), &RewardTemplateRequest::from(reward))
            .await?;

        self.api.notify_success("Reward updated");
        Ok(updated.into())
    }

    pub async fn delete_template(&self, id: &str) -> Result<(), ApiError> {
        self.api.delete(&template_url(id)).await?;

        self.api.notify_success("Reward deleted");
        Ok(())
    }

    /// Spend the current student's points on a reward. The purchase waits
    /// for parent approval.
    pub async fn purchase(&self, reward_id: &str) -> Result<RewardPurchase, ApiError> {
        let purchase: RewardPurchaseDto = self
            .api
            .post(
                PURCHASES_PATH,
                &PurchaseRequest {
                    reward_id: reward_id.to_string(),
                },
            )
            .await?;
        let purchase = RewardPurchase::from(purchase);

        tracing::info!(
            purchase_id = %purchase.id,
            reward_id = %reward_id,
            points_spent = purchase.points_spent,
            "Reward purchased"
        );
        self.api.notify_success(&format!(
            "Reward requested for {} points",
            purchase.points_spent
        ));
        Ok(purchase)
    }

    pub async fn get_pending_purchases(&self) -> Result<Vec<RewardPurchase>, ApiError> {
        let pending: Vec<RewardPurchaseDto> = self
            .api
            .get_list(&format!("{}?status=pending", PURCHASES_PATH))
            .await?;
        Ok(pending.into_iter().map(RewardPurchase::from).collect())
    }

    pub async fn approve_purchase(&self, purchase_id: &str) -> Result<RewardPurchase, ApiError> {
        let approved: RewardPurchaseDto = self
            .api
            .post(&format!("{}/approve", purchase_url(purchase_id)), &serde_json::json!({}))
            .await?;

        self.api.notify_success("Reward approved");
        Ok(approved.into())
    }

    pub async fn reject_purchase(
        &self,
        purchase_id: &str,
        reason: Option<String>,
    ) -> Result<RewardPurchase, ApiError> {
        let rejected: RewardPurchaseDto = self
            .api
            .post(
                &format!("{}/reject", purchase_url(purchase_id)),
                &RejectPurchaseRequest { reason },
            )
            .await?;

        self.api
            .notify_success("Reward rejected and points refunded");
        Ok(rejected.into())
    }

    pub async fn get_stats(&self) -> Result<RewardStats, ApiError> {
        let stats: RewardStatsDto = self.api.get("/api/rewards/stats").await?;
        Ok(stats.into())
    }
}
