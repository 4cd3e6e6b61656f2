//! Wire models for the `/Usuarios` backend.
//!
//! The backend speaks Spanish field names (`nombre`, `apellidos`,
//! `tipoUsuario`, `puntaje`); Rust-side fields are English and renamed on
//! the wire via serde.

use serde::{Deserialize, Serialize};

/// A user record as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellidos")]
    pub surname: String,
    /// Role label, echoed verbatim as the classification.
    #[serde(rename = "tipoUsuario")]
    pub role: String,
    /// Score in 0–100.
    #[serde(rename = "puntaje")]
    pub score: u8,
}

/// Payload for creating a user; the backend assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellidos")]
    pub surname: String,
    #[serde(rename = "tipoUsuario")]
    pub role: String,
    #[serde(rename = "puntaje")]
    pub score: u8,
}

/// Partial update payload. Unset fields are left out of the request body
/// and untouched by the local shallow merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "apellidos", skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    #[serde(rename = "tipoUsuario", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "puntaje", skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

impl UserPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_surname(mut self, surname: impl Into<String>) -> Self {
        self.surname = Some(surname.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_score(mut self, score: u8) -> Self {
        self.score = Some(score);
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.surname.is_none() && self.role.is_none() && self.score.is_none()
    }

    /// Shallow-merge the set fields over an existing record.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(surname) = &self.surname {
            user.surname = surname.clone();
        }
        if let Some(role) = &self.role {
            user.role = role.clone();
        }
        if let Some(score) = self.score {
            user.score = score;
        }
    }
}

/// Login payload for `POST /Usuarios/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "nombre")]
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Successful login response: the identity fields plus the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellidos")]
    pub surname: String,
    pub token: String,
}

impl LoginResponse {
    /// The identity part that gets persisted as the `user` blob.
    pub fn session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            name: self.name.clone(),
            surname: self.surname.clone(),
        }
    }
}

/// The authenticated identity held by the client; persisted without the
/// token, which lives under its own durable key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellidos")]
    pub surname: String,
}

impl SessionUser {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// Error payload shape the backend returns on failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Display color bucket derived from a user's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreColor {
    Green,
    Orange,
    Red,
}

impl ScoreColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreColor::Green => "green",
            ScoreColor::Orange => "orange",
            ScoreColor::Red => "red",
        }
    }
}

/// Bucket a score into its color. Lower bounds are inclusive: 60 and up is
/// green, 30 and up is orange, everything below is red.
pub fn score_color(score: u8) -> ScoreColor {
    if score >= 60 {
        ScoreColor::Green
    } else if score >= 30 {
        ScoreColor::Orange
    } else {
        ScoreColor::Red
    }
}

/// A cached user augmented with its derived classification view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedUser {
    #[serde(flatten)]
    pub user: User,
    /// Echo of the role field.
    #[serde(rename = "clasificacion")]
    pub classification: String,
    #[serde(rename = "puntajeColor")]
    pub color: ScoreColor,
}

impl From<User> for ClassifiedUser {
    fn from(user: User) -> Self {
        let classification = user.role.clone();
        let color = score_color(user.score);
        Self {
            user,
            classification,
            color,
        }
    }
}
