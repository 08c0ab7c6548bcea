//! HS256 bearer tokens via `jsonwebtoken`.
//!
//! Expiry is checked against the injected clock rather than the system
//! time, so the library's own `exp` validation is switched off.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{AccessTokenCodec, TokenError};
use crate::domain::{AccessToken, TokenSubject, Username};

/// Token lifetime, in minutes, used when none is configured.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 15;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenCodec {
    /// Build a codec from `secret`. The secret buffer is wiped once the keys
    /// are derived.
    pub fn new(secret: Zeroizing<String>, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl AccessTokenCodec for JwtTokenCodec {
    fn issue(
        &self,
        username: &Username,
        issued_at: DateTime<Utc>,
    ) -> Result<AccessToken, TokenError> {
        let claims = Claims {
            sub: username.as_ref().to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenSubject, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| TokenError::invalid(err.to_string()))?
            .claims;
        if claims.exp <= now.timestamp() {
            return Err(TokenError::expired());
        }
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenError::invalid("expiry out of range"))?;
        let username = Username::new(claims.sub)
            .map_err(|err| TokenError::invalid(format!("subject: {err}")))?;
        Ok(TokenSubject {
            username,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 9, 30, 0)
            .single()
            .expect("timestamp")
    }

    fn codec_with(secret: &str) -> JwtTokenCodec {
        JwtTokenCodec::new(
            Zeroizing::new(secret.to_owned()),
            Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
        )
    }

    #[fixture]
    fn codec() -> JwtTokenCodec {
        codec_with("test-secret-of-reasonable-length")
    }

    fn ada() -> Username {
        Username::new("ada").expect("username")
    }

    #[rstest]
    fn issued_token_verifies_to_subject(codec: JwtTokenCodec) {
        let token = codec.issue(&ada(), now()).expect("issue");

        let subject = codec
            .verify(token.as_str(), now() + Duration::minutes(5))
            .expect("verify");
        assert_eq!(subject.username, ada());
        assert_eq!(subject.expires_at, now() + Duration::minutes(15));
    }

    #[rstest]
    #[case(Duration::minutes(15))]
    #[case(Duration::hours(3))]
    fn token_expires_after_ttl(codec: JwtTokenCodec, #[case] elapsed: Duration) {
        let token = codec.issue(&ada(), now()).expect("issue");
        let error = codec
            .verify(token.as_str(), now() + elapsed)
            .expect_err("expired");
        assert_eq!(error, TokenError::expired());
    }

    #[rstest]
    fn foreign_signature_is_invalid(codec: JwtTokenCodec) {
        let token = codec_with("another-secret").issue(&ada(), now()).expect("issue");
        let error = codec.verify(token.as_str(), now()).expect_err("invalid");
        assert!(matches!(error, TokenError::Invalid { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("not.a.jwt")]
    fn garbage_is_invalid(codec: JwtTokenCodec, #[case] token: &str) {
        let error = codec.verify(token, now()).expect_err("invalid");
        assert!(matches!(error, TokenError::Invalid { .. }));
    }
}
