/// Integration-level tests for the `shared` crate.
///
/// Each section tests one module; unit tests that are tightly coupled to
/// private helpers live inside the modules themselves (see `#[cfg(test)]`
/// blocks in `auth.rs` and `config.rs`).
// ---------------------------------------------------------------------------
// Token claims
// ---------------------------------------------------------------------------
#[cfg(test)]
mod claims_tests {
    use shared::types::*;

    fn sample_claims() -> TokenClaims {
        TokenClaims {
            sub: "ann@x.com".to_string(),
            user_id: 42,
            exp: 9_999_999_999,
            iat: 1_700_000_000,
        }
    }

    #[test]
    fn claims_serialize_and_deserialize_roundtrip() {
        let c = sample_claims();
        let json = serde_json::to_string(&c).unwrap();
        let back: TokenClaims = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sub, c.sub);
        assert_eq!(back.user_id, c.user_id);
        assert_eq!(back.exp, c.exp);
        assert_eq!(back.iat, c.iat);
    }

    #[test]
    fn claims_json_contains_expected_keys() {
        let json = serde_json::to_value(sample_claims()).unwrap();
        for key in &["sub", "user_id", "exp", "iat"] {
            assert!(json.get(key).is_some(), "missing key: {}", key);
        }
    }

    #[test]
    fn new_claims_expiry_is_iat_plus_ttl() {
        let c = TokenClaims::new(7, "bob@x.com", 1_000_000, 3_600);
        assert_eq!(c.iat, 1_000_000);
        assert_eq!(c.exp, 1_003_600);
        assert_eq!(c.sub, "bob@x.com");
        assert_eq!(c.user_id, 7);
    }
}

// ---------------------------------------------------------------------------
// Auth wire types
// ---------------------------------------------------------------------------

#[cfg(test)]
mod auth_tests {
    use shared::types::*;

    #[test]
    fn register_data_deserializes_from_json() {
        let json = r#"{"name":"Ann","email":"ann@x.com","password":"secret1"}"#;
        let d: RegisterData = serde_json::from_str(json).unwrap();
        assert_eq!(d.name, "Ann");
        assert_eq!(d.email, "ann@x.com");
    }

    #[test]
    fn login_data_deserializes_from_json() {
        let json = r#"{"email":"ann@x.com","password":"secret1"}"#;
        let d: LoginData = serde_json::from_str(json).unwrap();
        assert_eq!(d.email, "ann@x.com");
        assert_eq!(d.password, "secret1");
    }

    #[test]
    fn auth_success_serializes_token_and_user() {
        let r = AuthSuccess {
            token: "t.o.k".into(),
            user: PublicUser {
                id: 1,
                name: "Ann".into(),
                email: "ann@x.com".into(),
            },
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["token"], "t.o.k");
        assert_eq!(json["user"]["id"], 1);
        assert_eq!(json["user"]["name"], "Ann");
        assert_eq!(json["user"]["email"], "ann@x.com");
    }

    #[test]
    fn public_user_has_no_password_field() {
        let u = PublicUser {
            id: 1,
            name: "Ann".into(),
            email: "ann@x.com".into(),
        };
        let json = serde_json::to_value(&u).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn all_error_variants_have_non_empty_codes_and_messages() {
        let variants = [
            AuthError::Validation("bad input".into()),
            AuthError::EmailTaken,
            AuthError::InvalidCredentials,
            AuthError::InvalidToken,
            AuthError::UserNotFound,
            AuthError::DatabaseError,
            AuthError::InternalError,
        ];
        for e in &variants {
            assert!(!e.to_code().is_empty());
            assert!(!e.to_message().is_empty());
        }
    }

    #[test]
    fn auth_error_codes_are_unique() {
        let codes = [
            AuthError::Validation("x".into()).to_code(),
            AuthError::EmailTaken.to_code(),
            AuthError::InvalidCredentials.to_code(),
            AuthError::InvalidToken.to_code(),
            AuthError::UserNotFound.to_code(),
            AuthError::DatabaseError.to_code(),
            AuthError::InternalError.to_code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), unique.len(), "duplicate auth error codes");
    }

    #[test]
    fn auth_error_to_response_is_error_status() {
        let json = serde_json::to_value(AuthError::EmailTaken.to_response()).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "EMAIL_TAKEN");
    }

    #[test]
    fn stats_response_serializes_user_count() {
        let json = serde_json::to_value(StatsResponse { user_count: 3 }).unwrap();
        assert_eq!(json["user_count"], 3);
    }
}

// ---------------------------------------------------------------------------
// JSON error type
// ---------------------------------------------------------------------------

#[cfg(test)]
mod json_error_tests {
    use shared::types::*;

    #[test]
    fn error_response_new_sets_status_to_error() {
        let e = ErrorResponse::new("USER_NOT_FOUND", "resource missing");
        assert_eq!(e.status, "error");
        assert_eq!(e.code, "USER_NOT_FOUND");
        assert_eq!(e.message, "resource missing");
    }

    #[test]
    fn error_response_serializes_correctly() {
        let e = ErrorResponse::new("INVALID_TOKEN", "Invalid token");
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "INVALID_TOKEN");
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

#[cfg(test)]
mod config_tests {
    use shared::types::*;

    fn test_config() -> AppConfig {
        AppConfig {
            server: ServerConfig {
                bind: "127.0.0.1".into(),
                port: 3001,
                max_connections: 500,
            },
            database: DatabaseConfig {
                url: "dashboard.db".into(),
                pool_size: 5,
            },
            auth: AuthConfig {
                token_expiry_minutes: 60,
                jwt_secret: None,
            },
        }
    }

    #[test]
    fn server_addr_joins_bind_and_port() {
        assert_eq!(test_config().server.addr(), "127.0.0.1:3001");
    }

    #[test]
    fn token_expiry_secs_converts_minutes() {
        assert_eq!(test_config().auth.token_expiry_secs(), 3600);
    }

    #[test]
    fn config_deserializes_from_toml_with_defaults() {
        let toml_str = r#"
            [server]
            bind = "0.0.0.0"

            [database]
            url = "dashboard.db"

            [auth]
            jwt_secret = "0123456789abcdef0123456789abcdef"
        "#;
        let cfg: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.server.port, 3001);
        assert_eq!(cfg.server.max_connections, 1000);
        assert_eq!(cfg.database.pool_size, 5);
        // Default expiry is seven days.
        assert_eq!(cfg.auth.token_expiry_minutes, 7 * 24 * 60);
    }
}
