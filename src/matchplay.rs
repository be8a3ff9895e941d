//! Client for the [Matchplay Events](https://app.matchplay.events/) REST API.

use {
    reqwest::{
        StatusCode,
        header::{
            ACCEPT,
            CONTENT_TYPE,
        },
    },
    serde::de::DeserializeOwned,
    crate::prelude::*,
};

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error(transparent)] Reqwest(#[from] reqwest::Error),
    #[error("API base URL {0} cannot have path segments")]
    ApiBase(Url),
    #[error("unexpected response body from {url}: {source}")]
    Json {
        url: Url,
        source: serde_path_to_error::Error<serde_json::Error>,
        text: String,
    },
    #[error("{url} responded with {status}")]
    Status {
        url: Url,
        status: StatusCode,
        text: String,
    },
}

impl Error {
    /// The upstream response body, if the request got that far.
    pub(crate) fn response_text(&self) -> Option<&str> {
        match self {
            Self::Reqwest(_) | Self::ApiBase(_) => None,
            Self::Json { text, .. } | Self::Status { text, .. } => Some(text),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdInner {
    Number(serde_json::Number),
    String(String),
}

impl From<IdInner> for Id {
    fn from(inner: IdInner) -> Self {
        Self(match inner {
            IdInner::Number(n) => n.to_string(),
            IdInner::String(s) => s,
        })
    }
}

/// Matchplay sends numeric IDs, but we treat them as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "IdInner")]
pub(crate) struct Id(String);

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A participant's result as sent by Matchplay, normally a decimal string like `"1.00"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum Marker {
    Text(String),
    Other(serde_json::Value),
}

impl Marker {
    pub(crate) fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Other(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Game {
    pub(crate) arena_id: Option<Id>,
    #[serde(default)]
    pub(crate) player_ids: Vec<Id>,
    /// Parallel to `player_ids`. `None` until the game has been scored.
    #[serde(default)]
    pub(crate) result_points: Option<Vec<Option<Marker>>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Player {
    pub(crate) player_id: Id,
    pub(crate) name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Arena {
    pub(crate) arena_id: Id,
    pub(crate) name: String,
    pub(crate) status: String,
}

impl Arena {
    pub(crate) fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Tournament {
    pub(crate) players: Vec<Player>,
    pub(crate) arenas: Vec<Arena>,
}

pub(crate) struct Client {
    http_client: reqwest::Client,
    api_base: Url,
    api_token: String,
    tournament_id: Id,
}

impl Client {
    pub(crate) fn new(http_client: reqwest::Client, config: &Config) -> Self {
        Self {
            http_client,
            api_base: config.api_base.clone(),
            api_token: config.api_token.clone(),
            tournament_id: config.tournament_id.clone(),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::ApiBase(self.api_base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, query: &[(&str, &str)]) -> Result<T, Error> {
        log::debug!("GET {url}");
        let response = self.http_client.get(url.clone())
            .bearer_auth(&self.api_token)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .query(query)
            .send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            log::warn!("{url} responded with {status}");
            return Err(Error::Status { url, status, text })
        }
        match serde_path_to_error::deserialize::<_, Envelope<T>>(&mut serde_json::Deserializer::from_str(&text)) {
            Ok(Envelope { data }) => Ok(data),
            Err(source) => {
                log::warn!("unexpected response body from {url} at {}", source.path());
                Err(Error::Json { url, source, text })
            }
        }
    }

    pub(crate) async fn games(&self) -> Result<Vec<Game>, Error> {
        let tournament_id = self.tournament_id.to_string();
        let url = self.endpoint(&["tournaments", &tournament_id, "games"])?;
        self.get(url, &[]).await
    }

    pub(crate) async fn tournament(&self) -> Result<Tournament, Error> {
        let tournament_id = self.tournament_id.to_string();
        let url = self.endpoint(&["tournaments", &tournament_id])?;
        self.get(url, &[("includePlayers", "1"), ("includeArenas", "1")]).await
    }

    /// Fetches the game list and the tournament metadata. Fails if either request fails.
    pub(crate) async fn fetch(&self) -> Result<(Vec<Game>, Tournament), Error> {
        tokio::try_join!(self.games(), self.tournament())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(api_base: &str) -> Client {
        let config = Config {
            api_token: "secret".to_owned(),
            tournament_id: Id("177974".to_owned()),
            api_base: Url::parse(api_base).unwrap(),
            address: "127.0.0.1".parse().unwrap(),
            port: 5000,
        };
        Client::new(reqwest::Client::new(), &config)
    }

    fn decode<T: DeserializeOwned>(text: &str) -> Result<T, serde_path_to_error::Error<serde_json::Error>> {
        serde_path_to_error::deserialize::<_, Envelope<T>>(&mut serde_json::Deserializer::from_str(text)).map(|Envelope { data }| data)
    }

    #[test]
    fn endpoints() {
        let no_slash = client("https://app.matchplay.events/api");
        assert_eq!(no_slash.endpoint(&["tournaments", "177974", "games"]).unwrap().as_str(), "https://app.matchplay.events/api/tournaments/177974/games");
        let slash = client("https://app.matchplay.events/api/");
        assert_eq!(slash.endpoint(&["tournaments", "177974"]).unwrap().as_str(), "https://app.matchplay.events/api/tournaments/177974");
    }

    #[test]
    fn endpoint_on_cannot_be_a_base_url() {
        let mailto = client("mailto:someone@example.com");
        assert!(matches!(mailto.endpoint(&["tournaments"]), Err(Error::ApiBase(_))));
    }

    #[test]
    fn ids_accept_numbers_and_strings() {
        let ids = serde_json::from_str::<Vec<Id>>(r#"[9, "9", "abc"]"#).unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[2].to_string(), "abc");
    }

    #[test]
    fn decodes_games() {
        let games = decode::<Vec<Game>>(r#"{"data": [
            {"gameId": 1, "arenaId": 9, "playerIds": [1, 2], "resultPoints": ["1.00", "0.00"], "status": "completed"},
            {"gameId": 2, "arenaId": null, "playerIds": [3, 4], "resultPoints": null},
            {"gameId": 3, "arenaId": 9, "playerIds": [1, 3], "resultPoints": [null, null]}
        ]}"#).unwrap();
        assert_eq!(games.len(), 3);
        assert_eq!(games[0].arena_id.as_ref().map(Id::to_string).as_deref(), Some("9"));
        assert_eq!(games[0].result_points, Some(vec![Some(Marker::Text("1.00".to_owned())), Some(Marker::Text("0.00".to_owned()))]));
        assert!(games[1].arena_id.is_none());
        assert!(games[1].result_points.is_none());
        assert_eq!(games[2].result_points, Some(vec![None, None]));
    }

    #[test]
    fn decodes_non_string_markers() {
        let games = decode::<Vec<Game>>(r#"{"data": [
            {"arenaId": 9, "playerIds": [1, 2, 3], "resultPoints": [1, "0.00", 0.5]}
        ]}"#).unwrap();
        let markers = games[0].result_points.as_deref().unwrap();
        assert_eq!(markers[0], Some(Marker::Other(serde_json::json!(1))));
        assert_eq!(markers[1].as_ref().and_then(Marker::as_str), Some("0.00"));
        assert_eq!(markers[2].as_ref().and_then(Marker::as_str), None);
    }

    #[test]
    fn decodes_tournament() {
        let tournament = decode::<Tournament>(r#"{"data": {
            "tournamentId": 177974,
            "name": "League Night",
            "players": [{"playerId": 1, "name": "Ann"}, {"playerId": 2, "name": "Bo"}],
            "arenas": [{"arenaId": 9, "name": "Lane1", "status": "active"}, {"arenaId": 10, "name": "Lane2", "status": "inactive"}]
        }}"#).unwrap();
        assert_eq!(tournament.players.len(), 2);
        assert_eq!(tournament.players[1].name, "Bo");
        assert!(tournament.arenas[0].is_active());
        assert!(!tournament.arenas[1].is_active());
    }

    #[test]
    fn malformed_body_reports_path() {
        let err = decode::<Tournament>(r#"{"data": {"players": [{"playerId": 1, "name": 5}], "arenas": []}}"#).unwrap_err();
        assert_eq!(err.path().to_string(), "data.players[0].name");
    }
}
