// API client module: a small blocking HTTP client for the Fiordispino
// catalog service. Flows in `ui` only see the `Catalog` trait, so they can
// run against an in-memory catalog in tests.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::values::{
    Email, GameDescription, GameTitle, Genre, Password, Pegi, ReleaseDate, Token, Username, Vote,
};

/// Failure of a call to the catalog service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not reach the catalog service: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status. `message` is the
    /// human-readable reason it gave.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected answer from the catalog service: {0}")]
    Unexpected(String),

    #[error("could not read box art {}: {source}", path.display())]
    BoxArt { path: PathBuf, source: io::Error },
}

impl ApiError {
    /// The service refused the credentials or session key, as opposed to
    /// failing for a reason of its own.
    pub fn is_refusal(&self) -> bool {
        matches!(self, ApiError::Rejected { status: 401 | 403, .. })
    }
}

/// A game as listed by the service.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub genres: Vec<u64>,
    pub pegi: u8,
    pub release_date: String,
    /// Average vote; the service sends either a number or a decimal string.
    #[serde(default, deserialize_with = "score")]
    pub global_rating: f64,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GenreRecord {
    pub id: u64,
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: u64,
    pub username: String,
    pub email: String,
}

/// The signed-in account, from `/user/me/`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_superuser: bool,
}

/// An item of the "games to play" list.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ToPlayRecord {
    pub id: u64,
    pub game: GameRecord,
}

/// An item of the "games played" list with the vote the user gave.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PlayedRecord {
    pub id: u64,
    pub game: GameRecord,
    pub rating: u8,
}

/// Data needed to create an account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: Username,
    pub email: Email,
    pub password: Password,
}

/// A game an admin is adding to the catalog.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub title: GameTitle,
    pub description: GameDescription,
    pub genres: Vec<u64>,
    pub pegi: Pegi,
    pub release_date: ReleaseDate,
    pub box_art: PathBuf,
}

/// Everything the application asks of the catalog service.
pub trait Catalog {
    fn login(&self, email: &Email, password: &Password) -> Result<Token, ApiError>;
    fn register(&self, registration: &Registration) -> Result<Token, ApiError>;
    fn me(&self, token: &Token) -> Result<Profile, ApiError>;

    fn games(&self) -> Result<Vec<GameRecord>, ApiError>;
    fn add_game(&self, token: &Token, game: &NewGame) -> Result<(), ApiError>;
    fn remove_game(&self, token: &Token, id: u64) -> Result<(), ApiError>;

    fn genres(&self) -> Result<Vec<GenreRecord>, ApiError>;
    fn add_genre(&self, token: &Token, genre: &Genre) -> Result<(), ApiError>;
    fn remove_genre(&self, token: &Token, id: u64) -> Result<(), ApiError>;

    fn users(&self, token: &Token) -> Result<Vec<UserRecord>, ApiError>;
    fn ban_user(&self, token: &Token, id: u64) -> Result<(), ApiError>;

    fn games_to_play(&self, token: &Token) -> Result<Vec<ToPlayRecord>, ApiError>;
    fn add_to_play(&self, token: &Token, game: u64) -> Result<(), ApiError>;
    fn remove_to_play(&self, token: &Token, id: u64) -> Result<(), ApiError>;

    fn games_played(&self, token: &Token) -> Result<Vec<PlayedRecord>, ApiError>;
    fn add_played(&self, token: &Token, game: u64, vote: Vote) -> Result<(), ApiError>;
    fn remove_played(&self, token: &Token, id: u64) -> Result<(), ApiError>;
}

/// Blocking client that holds a reqwest client and the base URL of the
/// catalog service, e.g. `http://localhost:8000/api/v1`.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    password2: &'a str,
}

#[derive(Deserialize)]
struct KeyResponse {
    key: String,
}

#[derive(Serialize)]
struct GenreRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct ListRequest {
    game: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<u8>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(request: RequestBuilder, token: Option<&Token>) -> RequestBuilder {
        match token {
            Some(token) => request.header(AUTHORIZATION, format!("Token {token}")),
            None => request,
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str, token: Option<&Token>) -> Result<T, ApiError> {
        tracing::debug!(path, "GET");
        let request = Self::authorized(self.client.get(self.url(path)), token);
        decoded(checked(request.send()?)?)
    }

    fn post<B: Serialize>(&self, path: &str, body: &B, token: Option<&Token>) -> Result<Response, ApiError> {
        tracing::debug!(path, "POST");
        let request = Self::authorized(self.client.post(self.url(path)), token);
        checked(request.json(body).send()?)
    }

    fn delete(&self, path: &str, token: &Token) -> Result<(), ApiError> {
        tracing::debug!(path, "DELETE");
        let request = Self::authorized(self.client.delete(self.url(path)), Some(token));
        checked(request.send()?)?;
        Ok(())
    }

    fn session_key(response: Response) -> Result<Token, ApiError> {
        let body: KeyResponse = decoded(response)?;
        Token::new(body.key).map_err(|err| ApiError::Unexpected(err.to_string()))
    }
}

impl Catalog for ApiClient {
    fn login(&self, email: &Email, password: &Password) -> Result<Token, ApiError> {
        let body = LoginRequest {
            email: email.as_str(),
            password: password.as_str(),
        };
        Self::session_key(self.post("auth/login/", &body, None)?)
    }

    fn register(&self, registration: &Registration) -> Result<Token, ApiError> {
        let body = RegisterRequest {
            username: registration.username.as_str(),
            email: registration.email.as_str(),
            password: registration.password.as_str(),
            password2: registration.password.as_str(),
        };
        Self::session_key(self.post("auth/registration/", &body, None)?)
    }

    fn me(&self, token: &Token) -> Result<Profile, ApiError> {
        self.get("user/me/", Some(token))
    }

    fn games(&self) -> Result<Vec<GameRecord>, ApiError> {
        self.get("game/", None)
    }

    fn add_game(&self, token: &Token, game: &NewGame) -> Result<(), ApiError> {
        let box_art = box_art_part(&game.box_art)?;
        let mut form = multipart::Form::new()
            .text("title", game.title.to_string())
            .text("description", game.description.to_string())
            .text("pegi", game.pegi.value().to_string())
            .text("release_date", game.release_date.to_string())
            .part("box_art", box_art);
        for genre in &game.genres {
            form = form.text("genres", genre.to_string());
        }

        tracing::debug!(title = %game.title, "POST game/");
        let request = Self::authorized(self.client.post(self.url("game/")), Some(token));
        checked(request.multipart(form).send()?)?;
        Ok(())
    }

    fn remove_game(&self, token: &Token, id: u64) -> Result<(), ApiError> {
        self.delete(&format!("game/{id}/"), token)
    }

    fn genres(&self) -> Result<Vec<GenreRecord>, ApiError> {
        self.get("genre/", None)
    }

    fn add_genre(&self, token: &Token, genre: &Genre) -> Result<(), ApiError> {
        self.post("genre/", &GenreRequest { name: genre.as_str() }, Some(token))?;
        Ok(())
    }

    fn remove_genre(&self, token: &Token, id: u64) -> Result<(), ApiError> {
        self.delete(&format!("genre/{id}/"), token)
    }

    fn users(&self, token: &Token) -> Result<Vec<UserRecord>, ApiError> {
        self.get("user/", Some(token))
    }

    fn ban_user(&self, token: &Token, id: u64) -> Result<(), ApiError> {
        self.delete(&format!("user/{id}/"), token)
    }

    fn games_to_play(&self, token: &Token) -> Result<Vec<ToPlayRecord>, ApiError> {
        self.get("games-to-play/", Some(token))
    }

    fn add_to_play(&self, token: &Token, game: u64) -> Result<(), ApiError> {
        self.post("games-to-play/", &ListRequest { game, rating: None }, Some(token))?;
        Ok(())
    }

    fn remove_to_play(&self, token: &Token, id: u64) -> Result<(), ApiError> {
        self.delete(&format!("games-to-play/{id}/"), token)
    }

    fn games_played(&self, token: &Token) -> Result<Vec<PlayedRecord>, ApiError> {
        self.get("games-played/", Some(token))
    }

    fn add_played(&self, token: &Token, game: u64, vote: Vote) -> Result<(), ApiError> {
        let body = ListRequest {
            game,
            rating: Some(vote.value()),
        };
        self.post("games-played/", &body, Some(token))?;
        Ok(())
    }

    fn remove_played(&self, token: &Token, id: u64) -> Result<(), ApiError> {
        self.delete(&format!("games-played/{id}/"), token)
    }
}

/// Turn a non-success response into `ApiError::Rejected`.
fn checked(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    tracing::debug!(status = status.as_u16(), %body, "request rejected");
    let message = server_message(&body)
        .unwrap_or_else(|| format!("Request failed: {status}"));
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// Read a JSON body. A body that arrived but does not parse is the
/// service's fault, not the network's.
fn decoded<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text()?;
    parse_body(&body)
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| {
        tracing::debug!(%body, "undecodable response");
        ApiError::Unexpected(err.to_string())
    })
}

/// The reason the service gave for refusing a request.
///
/// Errors come back as JSON objects: either `{"error": "..."}` or a map
/// of field names to messages, where a message may be wrapped in a list.
/// Non-JSON bodies are returned as they are.
pub fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    let Ok(serde_json::Value::Object(fields)) = serde_json::from_str::<serde_json::Value>(body) else {
        return Some(body.to_string());
    };
    let value = fields
        .get("error")
        .or_else(|| fields.values().next())?;
    let value = match value {
        serde_json::Value::Array(items) => items.first()?,
        other => other,
    };
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn box_art_part(path: &Path) -> Result<multipart::Part, ApiError> {
    let file = File::open(path).map_err(|source| ApiError::BoxArt {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("box_art")
        .to_string();
    let mime = match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };
    Ok(multipart::Part::reader(file).file_name(file_name).mime_str(mime)?)
}

fn score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Missing(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => text.trim().parse().map_err(de::Error::custom),
        Raw::Missing(()) => Ok(0.0),
    }
}
