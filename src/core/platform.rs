//! Platform API client for the abuse protection service.
//!
//! This module defines the capabilities the detection engine needs from
//! the hosting content platform (activity listing, comment moderation,
//! view statistics, abuse reporting) and an HTTP implementation of them.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::PlatformConfig;

#[cfg(test)]
use mockall::automock;

/// Errors that can occur during platform API operations
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("API request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Kind of activity reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Comment,
    Upload,
    #[serde(other)]
    Other,
}

/// A recent activity on a monitored channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Activity ID
    pub id: String,
    /// When the platform says the activity was published
    pub published_at: DateTime<Utc>,
    /// Activity kind
    pub kind: ActivityKind,
    /// Free-text description (comment body for comment activities)
    #[serde(default)]
    pub description: String,
}

/// Moderation status applied to an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Published,
    HeldForReview,
    Rejected,
}

/// Abuse report filed against a video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbuseReport {
    /// Report ID
    pub id: Uuid,
    /// Primary reason code
    pub reason: String,
    /// Secondary reason code
    pub secondary_reason: String,
    /// Free-text comment attached to the report
    pub comment: String,
}

impl AbuseReport {
    /// Report for detected view botting, with the platform's fixed reason
    /// code pair.
    pub fn view_botting(comment: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            reason: "botting".to_string(),
            secondary_reason: "artificial_traffic_spam".to_string(),
            comment: comment.to_string(),
        }
    }
}

/// Capabilities the detection engine needs from the platform.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// List the most recent activities on a channel.
    async fn fetch_recent_activities(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<Activity>, PlatformError>;

    /// Set the moderation status of an activity.
    async fn set_moderation_status(
        &self,
        activity_id: &str,
        status: ModerationStatus,
    ) -> Result<(), PlatformError>;

    /// Current view count of a video.
    async fn fetch_view_count(&self, video_id: &str) -> Result<u64, PlatformError>;

    /// File an abuse report against a video.
    async fn file_abuse_report(
        &self,
        video_id: &str,
        report: &AbuseReport,
    ) -> Result<(), PlatformError>;
}

#[derive(Debug, Deserialize)]
struct ActivityListResponse {
    items: Vec<Activity>,
}

#[derive(Debug, Deserialize)]
struct ViewCountResponse {
    view_count: u64,
}

#[derive(Debug, Serialize)]
struct ModerationRequest<'a> {
    id: &'a str,
    moderation_status: ModerationStatus,
}

/// HTTP implementation of [`PlatformApi`]
pub struct HttpPlatformClient {
    /// HTTP client
    client: Client,
    /// API base URL
    base_url: String,
    /// API token
    api_token: String,
}

impl HttpPlatformClient {
    /// Create a new platform client instance
    pub fn new(config: &PlatformConfig) -> Result<Self, PlatformError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl PlatformApi for HttpPlatformClient {
    async fn fetch_recent_activities(
        &self,
        channel_id: &str,
        limit: u32,
    ) -> Result<Vec<Activity>, PlatformError> {
        let response = self
            .client
            .get(self.url("activities"))
            .query(&[("channel_id", channel_id), ("limit", &limit.to_string())])
            .header("Authorization", format!("Bearer {}", self.api_token))
            .send()
            .await?
            .error_for_status()?;

        let list: ActivityListResponse = response.json().await?;
        Ok(list.items)
    }

    async fn set_moderation_status(
        &self,
        activity_id: &str,
        status: ModerationStatus,
    ) -> Result<(), PlatformError> {
        self.client
            .post(self.url("comments/set_moderation_status"))
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&ModerationRequest {
                id: activity_id,
                moderation_status: status,
            })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    async fn fetch_view_count(&self, video_id: &str) -> Result<u64, PlatformError> {
        let response = self
            .client
            .get(self.url(&format!("videos/{}/statistics", video_id)))
            .header("Authorization", format!("Bearer {}", self.api_token))
            .send()
            .await?
            .error_for_status()?;

        let stats: ViewCountResponse = response.json().await?;
        Ok(stats.view_count)
    }

    async fn file_abuse_report(
        &self,
        video_id: &str,
        report: &AbuseReport,
    ) -> Result<(), PlatformError> {
        self.client
            .post(self.url(&format!("videos/{}/report_abuse", video_id)))
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(report)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_botting_report_carries_the_fixed_reason_pair() {
        let report = AbuseReport::view_botting("suspicious view activity");

        assert_eq!(report.reason, "botting");
        assert_eq!(report.secondary_reason, "artificial_traffic_spam");
    }

    #[test]
    fn activity_deserializes_from_wire_format() {
        let json = r#"{
            "id": "act-1",
            "published_at": "2024-05-01T12:00:00Z",
            "kind": "comment",
            "description": "nice video"
        }"#;

        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.kind, ActivityKind::Comment);
        assert_eq!(activity.description, "nice video");
    }

    #[test]
    fn unknown_activity_kinds_fall_back_to_other() {
        let json = r#"{
            "id": "act-2",
            "published_at": "2024-05-01T12:00:00Z",
            "kind": "playlist_item"
        }"#;

        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.kind, ActivityKind::Other);
    }
}
