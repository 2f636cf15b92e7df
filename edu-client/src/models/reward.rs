use super::common::id_to_string;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardCategory {
    ScreenTime,
    Activity,
    Treat,
    Privilege,
    Other,
}

impl RewardCategory {
    pub fn from_id(id: i64) -> Self {
        match id {
            1 => RewardCategory::ScreenTime,
            2 => RewardCategory::Activity,
            3 => RewardCategory::Treat,
            4 => RewardCategory::Privilege,
            _ => RewardCategory::Other,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            RewardCategory::ScreenTime => 1,
            RewardCategory::Activity => 2,
            RewardCategory::Treat => 3,
            RewardCategory::Privilege => 4,
            RewardCategory::Other => 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewardTemplateDto {
    pub id: serde_json::Value,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: i64,
    pub point_cost: u32,
    #[serde(default)]
    pub stock: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: RewardCategory,
    pub point_cost: u32,
    /// `None` means unlimited.
    pub stock: Option<u32>,
}

impl From<RewardTemplateDto> for RewardTemplate {
    fn from(dto: RewardTemplateDto) -> Self {
        RewardTemplate {
            id: id_to_string(&dto.id),
            name: dto.name,
            description: dto.description.unwrap_or_default(),
            category: RewardCategory::from_id(dto.category_id),
            point_cost: dto.point_cost,
            stock: dto.stock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRewardTemplate {
    pub name: String,
    pub description: String,
    pub category: RewardCategory,
    pub point_cost: u32,
    pub stock: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewardTemplateRequest {
    pub name: String,
    pub description: String,
    pub category_id: i64,
    pub point_cost: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl From<&NewRewardTemplate> for RewardTemplateRequest {
    fn from(reward: &NewRewardTemplate) -> Self {
        RewardTemplateRequest {
            name: reward.name.clone(),
            description: reward.description.clone(),
            category_id: reward.category.id(),
            point_cost: reward.point_cost,
            stock: reward.stock,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Approved,
    Rejected,
}

impl PurchaseStatus {
    pub fn from_backend(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "approved" | "fulfilled" => PurchaseStatus::Approved,
            "rejected" | "denied" => PurchaseStatus::Rejected,
            _ => PurchaseStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewardPurchaseDto {
    pub id: serde_json::Value,
    pub reward_id: serde_json::Value,
    pub student_id: serde_json::Value,
    #[serde(default)]
    pub status: Option<String>,
    pub points_spent: u32,
    #[serde(default)]
    pub purchased_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reward_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardPurchase {
    pub id: String,
    pub reward_id: String,
    pub student_id: String,
    pub status: PurchaseStatus,
    pub points_spent: u32,
    pub purchased_at: Option<DateTime<Utc>>,
    pub reward_name: Option<String>,
}

impl From<RewardPurchaseDto> for RewardPurchase {
    fn from(dto: RewardPurchaseDto) -> Self {
        RewardPurchase {
            id: id_to_string(&dto.id),
            reward_id: id_to_string(&dto.reward_id),
            student_id: id_to_string(&dto.student_id),
            status: dto
                .status
                .as_deref()
                .map(PurchaseStatus::from_backend)
                .unwrap_or(PurchaseStatus::Pending),
            points_spent: dto.points_spent,
            purchased_at: dto.purchased_at,
            reward_name: dto.reward_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseRequest {
    pub reward_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RejectPurchaseRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewardStatsDto {
    #[serde(default)]
    pub total_rewards: u32,
    #[serde(default)]
    pub pending_purchases: u32,
    #[serde(default)]
    pub total_points_spent: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardStats {
    pub total_rewards: u32,
    pub pending_purchases: u32,
    pub points_spent: u64,
}

impl From<RewardStatsDto> for RewardStats {
    fn from(dto: RewardStatsDto) -> Self {
        RewardStats {
            total_rewards: dto.total_rewards,
            pending_purchases: dto.pending_purchases,
            points_spent: dto.total_points_spent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reward_mapping() {
        let dto: RewardTemplateDto = serde_json::from_value(json!({
            "id": 4,
            "name": "Extra cartoon",
            "category_id": 1,
            "point_cost": 50
        }))
        .unwrap();

        let reward = RewardTemplate::from(dto);
        assert_eq!(reward.category, RewardCategory::ScreenTime);
        assert_eq!(reward.stock, None);

        let value = serde_json::to_value(&reward).unwrap();
        assert_eq!(value["pointCost"], json!(50));
        assert_eq!(value["category"], json!("screen_time"));
    }

    #[test]
    fn test_purchase_status_defaults_to_pending() {
        let dto: RewardPurchaseDto = serde_json::from_value(json!({
            "id": 1,
            "reward_id": 4,
            "student_id": 9,
            "points_spent": 50
        }))
        .unwrap();
        assert_eq!(RewardPurchase::from(dto).status, PurchaseStatus::Pending);
        assert_eq!(
            PurchaseStatus::from_backend("APPROVED"),
            PurchaseStatus::Approved
        );
    }

    #[test]
    fn test_stats_field_rename() {
        let dto: RewardStatsDto =
            serde_json::from_value(json!({"total_rewards": 3, "total_points_spent": 120}))
                .unwrap();
        let stats = RewardStats::from(dto);
        assert_eq!(stats.points_spent, 120);
        assert_eq!(stats.pending_purchases, 0);
    }
}
