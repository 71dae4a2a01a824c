use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use shared::{
    Club, CreateJoinRequestParams, DecideParams, Decision, ErrorResponse, Membership,
    MembershipQuery, MembershipRole, MembershipStats, SetRoleParams,
};

use crate::error::{CommandError, CommandResult};
use crate::store::Scope;

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// HTTP client for the backend's membership endpoints. Every call
/// carries the configured timeout; on failure the caller's local state
/// is left as-is.
#[derive(Debug, Clone)]
pub struct BackendClient {
    settings: Settings,
    client: reqwest::Client,
}

impl BackendClient {
    pub fn new(settings: Settings) -> CommandResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { settings, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.settings.base_url)
    }

    pub async fn create_join_request(
        &self,
        user_id: i64,
        club_id: i64,
    ) -> CommandResult<Membership> {
        let res = self
            .client
            .post(self.url("/memberships"))
            .json(&CreateJoinRequestParams { user_id, club_id })
            .send()
            .await?;
        Self::parse(res).await
    }

    pub async fn decide(
        &self,
        membership_id: i64,
        decision: Decision,
        decided_by: i64,
    ) -> CommandResult<Membership> {
        let res = self
            .client
            .post(self.url(&format!("/memberships/{membership_id}/decision")))
            .json(&DecideParams {
                decision,
                decided_by,
            })
            .send()
            .await?;
        Self::parse(res).await
    }

    pub async fn set_role(
        &self,
        membership_id: i64,
        role: MembershipRole,
    ) -> CommandResult<Membership> {
        let res = self
            .client
            .put(self.url(&format!("/memberships/{membership_id}/role")))
            .json(&SetRoleParams { role })
            .send()
            .await?;
        Self::parse(res).await
    }

    pub async fn remove_membership(&self, membership_id: i64) -> CommandResult<()> {
        let res = self
            .client
            .delete(self.url(&format!("/memberships/{membership_id}")))
            .send()
            .await?;
        Self::check(res).await?;
        Ok(())
    }

    pub async fn list_memberships(&self, scope: Scope) -> CommandResult<Vec<Membership>> {
        let query = match scope {
            Scope::User(user_id) => MembershipQuery {
                user_id: Some(user_id),
                ..Default::default()
            },
            Scope::Club(club_id) => MembershipQuery {
                club_id: Some(club_id),
                ..Default::default()
            },
        };
        let res = self
            .client
            .get(self.url("/memberships"))
            .query(&query)
            .send()
            .await?;
        Self::parse(res).await
    }

    pub async fn membership_stats(&self, club_id: i64) -> CommandResult<MembershipStats> {
        let res = self
            .client
            .get(self.url(&format!("/clubs/{club_id}/membership-stats")))
            .send()
            .await?;
        Self::parse(res).await
    }

    pub async fn list_clubs(&self) -> CommandResult<Vec<Club>> {
        let res = self.client.get(self.url("/clubs/list")).send().await?;
        Self::parse(res).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(res: reqwest::Response) -> CommandResult<T> {
        let res = Self::check(res).await?;
        Ok(res.json().await?)
    }

    /// Maps non-2xx responses onto the command error taxonomy, keeping
    /// the server's `message` when it sent one.
    async fn check(res: reqwest::Response) -> CommandResult<reqwest::Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let message = res
            .json::<ErrorResponse>()
            .await
            .map(|e| e.message)
            .unwrap_or_default();
        tracing::debug!(%status, %message, "backend rejected request");
        Err(match status {
            StatusCode::BAD_REQUEST => CommandError::Validation(message),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                CommandError::Authorization(message)
            }
            StatusCode::CONFLICT => CommandError::Conflict(message),
            _ => CommandError::Backend(message),
        })
    }
}
