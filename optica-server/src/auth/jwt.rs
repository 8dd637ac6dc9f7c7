//! Session token service
//!
//! HS256 tokens carrying the user id, email, role and linked employee.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::{Rol, Usuario};
use thiserror::Error;

const ISSUER: &str = "optica-server";
const AUDIENCE: &str = "optica-dashboard";

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
    pub issuer: String,
    pub audience: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiry_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiry_hours,
            issuer: ISSUER.to_string(),
            audience: AUDIENCE.to_string(),
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub correo: String,
    pub rol: Rol,
    pub idempleado: Option<i64>,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Token lifetime in seconds (also the cookie Max-Age)
    pub fn ttl_seconds(&self) -> i64 {
        self.config.expiry_hours * 3600
    }

    pub fn generate_token(&self, usuario: &Usuario) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.config.expiry_hours);

        let claims = Claims {
            sub: usuario.idusuario.to_string(),
            correo: usuario.correo.clone(),
            rol: usuario.rol,
            idempleado: usuario.idempleado,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

/// Authenticated caller, derived from validated claims
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub idusuario: i64,
    pub correo: String,
    pub rol: Rol,
    pub idempleado: Option<i64>,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let idusuario = claims
            .sub
            .parse()
            .map_err(|_| JwtError::InvalidToken(format!("bad subject: {}", claims.sub)))?;
        Ok(Self {
            idusuario,
            correo: claims.correo,
            rol: claims.rol,
            idempleado: claims.idempleado,
        })
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.rol.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn usuario(rol: Rol) -> Usuario {
        Usuario {
            idusuario: 42,
            correo: "matriz@optica.mx".into(),
            rol,
            idempleado: Some(3),
            activo: true,
            creado_en: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    fn service(secret: &str) -> JwtService {
        JwtService::new(JwtConfig::new(secret, 12))
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service("test-secret-with-enough-length-123456");
        let token = service.generate_token(&usuario(Rol::Matriz)).unwrap();

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.rol, Rol::Matriz);
        assert_eq!(claims.iss, ISSUER);

        let user = CurrentUser::try_from(claims).unwrap();
        assert_eq!(user.idusuario, 42);
        assert_eq!(user.idempleado, Some(3));
        assert!(user.is_admin());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service("secret-a-secret-a-secret-a-secret-a")
            .generate_token(&usuario(Rol::Asesor))
            .unwrap();
        let err = service("secret-b-secret-b-secret-b-secret-b")
            .validate_token(&token)
            .unwrap_err();
        assert!(matches!(err, JwtError::InvalidSignature));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new(JwtConfig::new("expiry-secret-expiry-secret-123", -1));
        let token = service.generate_token(&usuario(Rol::Asesor)).unwrap();
        assert!(matches!(
            service.validate_token(&token).unwrap_err(),
            JwtError::ExpiredToken
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let err = service("garbage-secret-garbage-secret-12")
            .validate_token("not.a.token")
            .unwrap_err();
        assert!(matches!(err, JwtError::InvalidToken(_)));
    }

    #[test]
    fn test_field_role_is_not_admin() {
        let service = service("field-role-secret-field-role-1234");
        let token = service.generate_token(&usuario(Rol::Optometrista)).unwrap();
        let user = CurrentUser::try_from(service.validate_token(&token).unwrap()).unwrap();
        assert!(!user.is_admin());
    }
}
