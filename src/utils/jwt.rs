use crate::config::AppConfig;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const ACCESS_TOKEN_TYPE: &str = "access";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型，目前只签发 "access"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// 令牌由外部登录系统签发，这里只负责校验；签发仅用于初始化管理员与测试
pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 生成 Access Token
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::encode_with_secret(
            user_id,
            role,
            ACCESS_TOKEN_TYPE,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
            &Self::get_secret(),
        )
    }

    // 使用指定密钥签发
    pub fn encode_with_secret(
        user_id: i64,
        role: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
        secret: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + expiry_duration;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let encoding_key = EncodingKey::from_secret(secret.as_ref());
        encode(&Header::default(), &claims, &encoding_key)
    }

    // 使用指定密钥验证 Access Token
    pub fn verify_access_token_with_secret(
        token: &str,
        secret: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let claims = decode::<Claims>(token, &decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)?;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_access_token_with_secret(token, &Self::get_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_access_token_round_trip() {
        let token = JwtUtils::encode_with_secret(
            42,
            "teacher",
            "access",
            chrono::Duration::minutes(5),
            SECRET,
        )
        .expect("token");
        let claims = JwtUtils::verify_access_token_with_secret(&token, SECRET).expect("claims");
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "teacher");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtUtils::encode_with_secret(
            1,
            "student",
            "access",
            chrono::Duration::minutes(5),
            SECRET,
        )
        .expect("token");
        assert!(JwtUtils::verify_access_token_with_secret(&token, "other").is_err());
    }

    #[test]
    fn test_non_access_token_rejected() {
        let token = JwtUtils::encode_with_secret(
            1,
            "student",
            "refresh",
            chrono::Duration::minutes(5),
            SECRET,
        )
        .expect("token");
        assert!(JwtUtils::verify_access_token_with_secret(&token, SECRET).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = JwtUtils::encode_with_secret(
            1,
            "student",
            "access",
            chrono::Duration::minutes(-10),
            SECRET,
        )
        .expect("token");
        assert!(JwtUtils::verify_access_token_with_secret(&token, SECRET).is_err());
    }
}
