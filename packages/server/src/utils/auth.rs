use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use mafia_rules::ParticipantId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of a seat token.
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub group: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("failed to create token")]
    TokenCreation,
    #[error("invalid or expired token")]
    TokenValidation,
    #[error("authentication required")]
    MissingToken,
    #[error("token belongs to another group")]
    WrongGroup,
}

/// The participant a verified token speaks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub group_id: String,
    pub participant: ParticipantId,
}

/// Signs and checks the seat tokens handed out on join.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Keys that only live as long as this process.
    pub fn random() -> Self {
        let secret = format!("{}{}", Uuid::new_v4(), Uuid::new_v4());
        Self::from_secret(secret.as_bytes())
    }

    pub fn create_token(
        &self,
        group_id: &str,
        participant: ParticipantId,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: participant.0.to_string(),
            group: group_id.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|_| AuthError::TokenCreation)
    }

    /// Verifies the token and that it was issued for `group_id`.
    pub fn verify_token(&self, token: &str, group_id: &str) -> Result<Player, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|_| AuthError::TokenValidation)?
            .claims;
        if claims.group != group_id {
            return Err(AuthError::WrongGroup);
        }
        let id = claims
            .sub
            .parse::<u64>()
            .map_err(|_| AuthError::TokenValidation)?;
        Ok(Player {
            group_id: claims.group,
            participant: ParticipantId(id),
        })
    }
}
