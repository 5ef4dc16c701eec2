use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::entities::sea_orm_active_enums::RoleEnum;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: String,
    pub name: String,
    pub role: RoleEnum,
    pub department_category: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Signs an HS256 token valid for `expires_in` seconds.
    pub fn create_jwt(
        &self,
        user_id: &str,
        name: &str,
        role: RoleEnum,
        department_category: &str,
        expires_in: i64,
    ) -> anyhow::Result<String> {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            user_id: user_id.to_string(),
            name: name.to_string(),
            role,
            department_category: department_category.to_string(),
            iat: now,
            exp: now + expires_in,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    pub fn verify_jwt(&self, token: &str) -> anyhow::Result<TokenClaims> {
        let data = decode::<TokenClaims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let manager = JwtManager::new("test-secret");
        let token = manager
            .create_jwt("u-1", "Dana", RoleEnum::Admin, "IT", 60)
            .unwrap();

        let claims = manager.verify_jwt(&token).unwrap();
        assert_eq!(claims.user_id, "u-1");
        assert_eq!(claims.role, RoleEnum::Admin);
        assert_eq!(claims.department_category, "IT");
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = JwtManager::new("one")
            .create_jwt("u-1", "Dana", RoleEnum::Staff, "IT", 60)
            .unwrap();

        assert!(JwtManager::new("two").verify_jwt(&token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let manager = JwtManager::new("test-secret");
        // well past the default 60s leeway
        let token = manager
            .create_jwt("u-1", "Dana", RoleEnum::Staff, "IT", -600)
            .unwrap();

        assert!(manager.verify_jwt(&token).is_err());
    }
}
