//! Game Data Provider client: Riot account lookups and the Data Dragon
//! static mirror, condensed to the champion columns the registry caches.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use araminator_core::config::{RiotConfig, RiotRegion};
use araminator_core::{Champion, PlayerProfile};

#[derive(Debug, Error)]
pub enum RiotApiError {
    #[error("riot api request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("riot api returned status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("data dragon returned an empty version list")]
    NoVersions,
    #[error("champion entry `{id}` carries a non-numeric key `{key}`")]
    MalformedChampionKey { id: String, key: String },
}

pub struct RiotClient {
    client: Client,
    api_key: SecretString,
    region: RiotRegion,
    ddragon_base_url: String,
    max_retries: u32,
}

#[derive(Debug, Deserialize)]
struct AccountDto {
    puuid: String,
    #[serde(rename = "gameName")]
    game_name: String,
    #[serde(rename = "tagLine")]
    tag_line: String,
}

#[derive(Debug, Deserialize)]
struct ChampionFileDto {
    data: HashMap<String, ChampionDto>,
}

#[derive(Debug, Deserialize)]
struct ChampionDto {
    key: String,
    id: String,
    name: String,
}

impl RiotClient {
    pub fn new(config: &RiotConfig) -> Result<Self, RiotApiError> {
        let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            region: config.region,
            ddragon_base_url: config.ddragon_base_url.trim_end_matches('/').to_owned(),
            max_retries: config.max_retries,
        })
    }

    /// Account-v1 lookup by `Name#Tag`. A 404 means the riot id does not
    /// exist and is reported as `None`; any other non-success status is an
    /// error.
    pub async fn account_by_riot_id(
        &self,
        game_name: &str,
        tag_line: &str,
        region: Option<RiotRegion>,
    ) -> Result<Option<PlayerProfile>, RiotApiError> {
        let region = region.unwrap_or(self.region);
        let url = account_url(region, game_name, tag_line);

        let response = self
            .get_with_retries(&url, Some(self.api_key.expose_secret().to_owned()))
            .await?;

        match response.status() {
            StatusCode::OK => {
                let account: AccountDto = response.json().await?;
                Ok(Some(PlayerProfile {
                    game_name: account.game_name,
                    tag_line: account.tag_line,
                    puuid: account.puuid,
                }))
            }
            StatusCode::NOT_FOUND => Ok(None),
            status => Err(RiotApiError::Status { status: status.as_u16(), url }),
        }
    }

    pub async fn latest_version(&self) -> Result<String, RiotApiError> {
        let url = format!("{}/api/versions.json", self.ddragon_base_url);
        let response = self.get_with_retries(&url, None).await?;
        if !response.status().is_success() {
            return Err(RiotApiError::Status { status: response.status().as_u16(), url });
        }

        let versions: Vec<String> = response.json().await?;
        versions.into_iter().next().ok_or(RiotApiError::NoVersions)
    }

    /// Fetches the full champion file for the latest version and condenses it
    /// to the cached columns.
    pub async fn champions(&self) -> Result<Vec<Champion>, RiotApiError> {
        let version = self.latest_version().await?;
        let url =
            format!("{}/cdn/{}/data/en_US/champion.json", self.ddragon_base_url, version);
        let response = self.get_with_retries(&url, None).await?;
        if !response.status().is_success() {
            return Err(RiotApiError::Status { status: response.status().as_u16(), url });
        }

        let file: ChampionFileDto = response.json().await?;
        condense_champions(file)
    }

    async fn get_with_retries(
        &self,
        url: &str,
        riot_token: Option<String>,
    ) -> Result<reqwest::Response, RiotApiError> {
        let mut attempt = 0;
        loop {
            let mut request = self.client.get(url);
            if let Some(token) = &riot_token {
                request = request.header("X-Riot-Token", token);
            }

            match request.send().await {
                Ok(response) => return Ok(response),
                Err(error) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        error = %error,
                        "riot api request failed; retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(200 * u64::from(attempt))).await;
                }
                Err(error) => return Err(RiotApiError::Http(error)),
            }
        }
    }
}

fn account_url(region: RiotRegion, game_name: &str, tag_line: &str) -> String {
    format!(
        "https://{}.api.riotgames.com/riot/account/v1/accounts/by-riot-id/{}/{}",
        region.as_str(),
        game_name,
        tag_line.to_ascii_uppercase(),
    )
}

fn condense_champions(file: ChampionFileDto) -> Result<Vec<Champion>, RiotApiError> {
    let mut champions = Vec::with_capacity(file.data.len());
    for (_, entry) in file.data {
        let key = entry.key.parse::<i64>().map_err(|_| RiotApiError::MalformedChampionKey {
            id: entry.id.clone(),
            key: entry.key.clone(),
        })?;
        champions.push(Champion { key, id: entry.id, name: entry.name, emoji: None });
    }

    champions.sort_by_key(|champion| champion.key);
    Ok(champions)
}

#[cfg(test)]
mod tests {
    use araminator_core::config::RiotRegion;

    use super::{account_url, condense_champions, AccountDto, ChampionFileDto};

    #[test]
    fn account_url_routes_by_region_and_uppercases_the_tag() {
        let url = account_url(RiotRegion::Europe, "leblond", "euw");
        assert_eq!(
            url,
            "https://europe.api.riotgames.com/riot/account/v1/accounts/by-riot-id/leblond/EUW",
        );
    }

    #[test]
    fn account_payload_decodes_riot_field_names() {
        let account: AccountDto = serde_json::from_str(
            r#"{"puuid":"abc-123","gameName":"leblond","tagLine":"EUW"}"#,
        )
        .expect("decode account");

        assert_eq!(account.puuid, "abc-123");
        assert_eq!(account.game_name, "leblond");
        assert_eq!(account.tag_line, "EUW");
    }

    #[test]
    fn champion_file_condenses_to_cached_columns_sorted_by_key() {
        let file: ChampionFileDto = serde_json::from_str(
            r#"{
                "data": {
                    "Zed": {"key": "238", "id": "Zed", "name": "Zed"},
                    "Aatrox": {"key": "266", "id": "Aatrox", "name": "Aatrox"},
                    "Ahri": {"key": "103", "id": "Ahri", "name": "Ahri"}
                }
            }"#,
        )
        .expect("decode champion file");

        let champions = condense_champions(file).expect("condense");

        assert_eq!(champions.len(), 3);
        assert_eq!(champions[0].id, "Ahri");
        assert_eq!(champions[1].key, 238);
        assert_eq!(champions[2].name, "Aatrox");
        assert!(champions.iter().all(|champion| champion.emoji.is_none()));
    }

    #[test]
    fn malformed_champion_keys_are_rejected() {
        let file: ChampionFileDto = serde_json::from_str(
            r#"{"data": {"Bad": {"key": "not-a-number", "id": "Bad", "name": "Bad"}}}"#,
        )
        .expect("decode champion file");

        let error = condense_champions(file).expect_err("bad key");
        assert!(error.to_string().contains("non-numeric key"));
    }
}
