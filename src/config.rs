use {
    std::{
        io,
        net::{
            IpAddr,
            Ipv4Addr,
        },
        path::{
            Path,
            PathBuf,
        },
    },
    tokio::fs,
    crate::{
        matchplay::Id,
        prelude::*,
    },
};
#[cfg(unix)] use xdg::BaseDirectories;

const FILE_NAME: &str = "matchplay-dashboard.json";

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("failed to read config file at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: io::Error,
    },
    #[error("invalid config file at {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_path_to_error::Error<serde_json::Error>,
    },
    #[cfg(unix)]
    #[error("missing config file")]
    Missing,
}

fn default_api_base() -> Url {
    Url::parse("https://app.matchplay.events/api").expect("hardcoded URL is valid")
}

fn default_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    5000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Config {
    /// Bearer token for the Matchplay Events API.
    pub(crate) api_token: String,
    pub(crate) tournament_id: Id,
    #[serde(default = "default_api_base")]
    pub(crate) api_base: Url,
    #[serde(default = "default_address")]
    pub(crate) address: IpAddr,
    #[serde(default = "default_port")]
    pub(crate) port: u16,
}

impl Config {
    /// Loads the config from `path` if given, otherwise from the platform default location.
    pub(crate) async fn load(path: Option<&Path>) -> Result<Self, Error> {
        if let Some(path) = path {
            return Self::read(path).await
        }
        #[cfg(unix)] {
            if let Some(config_path) = BaseDirectories::new().find_config_file(FILE_NAME) {
                Self::read(&config_path).await
            } else {
                Err(Error::Missing)
            }
        }
        #[cfg(not(unix))] {
            Self::read(&Path::new("cfg").join(FILE_NAME)).await
        }
    }

    async fn read(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).await.map_err(|source| Error::Io { path: path.to_owned(), source })?;
        Self::parse(&text).map_err(|source| Error::Json { path: path.to_owned(), source })
    }

    fn parse(text: &str) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
        serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_str(text))
    }
}
