use {
    rocket::{
        Build,
        Rocket,
        config::LogLevel,
        response::Responder,
    },
    crate::{
        matchplay,
        standings::{
            self,
            Dashboard,
        },
        prelude::*,
    },
};

const DASHBOARD_PAGE: &str = include_str!("../assets/dashboard.html");

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum TournamentDataError {
    #[error(transparent)] Matchplay(#[from] matchplay::Error),
}

impl<'r> Responder<'r, 'static> for TournamentDataError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        let status = Status::InternalServerError;
        log::error!("responded with {status} to request to {}", request.uri());
        log::error!("display: {self}");
        log::error!("debug: {self:?}");
        let Self::Matchplay(e) = &self;
        if let Some(text) = e.response_text() {
            log::error!("upstream response: {text}");
        }
        (status, Json(ErrorBody { error: self.to_string() })).respond_to(request)
    }
}

#[rocket::get("/")]
fn index() -> RawHtml<&'static str> {
    RawHtml(DASHBOARD_PAGE)
}

#[rocket::get("/api/tournament-data")]
async fn tournament_data(client: &State<matchplay::Client>) -> Result<Json<Dashboard>, TournamentDataError> {
    let (games, tournament) = client.fetch().await?;
    Ok(Json(standings::aggregate(&games, &tournament, chrono::Local::now().naive_local())))
}

#[rocket::catch(default)]
fn fallback_catcher(status: Status, request: &Request<'_>) -> (Status, Json<ErrorBody>) {
    log::warn!("responding with HTTP status code {} {} to request {request}", status.code, status.reason_lossy());
    (status, Json(ErrorBody { error: status.reason_lossy().to_owned() }))
}

pub(crate) fn rocket(config: &Config, client: matchplay::Client) -> Rocket<Build> {
    rocket::custom(rocket::Config::figment().merge(rocket::Config {
        address: config.address,
        port: config.port,
        log_level: LogLevel::Critical,
        ..rocket::Config::default()
    }))
    .mount("/", rocket::routes![
        index,
        tournament_data,
    ])
    .register("/", rocket::catchers![
        fallback_catcher,
    ])
    .manage(client)
}
