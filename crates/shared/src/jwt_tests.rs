use crate::auth::{Claims, Role, TOKEN_ISSUER};
use crate::config::JwtConfig;
use crate::jwt::{JwtError, JwtService};
use crate::types::UserId;
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

const SECRET: &str = "test-secret-key-for-testing";

fn service() -> JwtService {
    JwtService::new(&JwtConfig {
        secret: SECRET.to_string(),
        access_token_expiry_secs: 900,
    })
}

fn sign(claims: &Claims) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

#[test]
fn test_claims_window() {
    let user = UserId::new();
    let issued = Utc::now();

    let claims = Claims::new(user, Role::Accountant, issued, Duration::minutes(15));

    assert_eq!(claims.sub, user);
    assert_eq!(claims.iss, TOKEN_ISSUER);
    assert_eq!(claims.exp - claims.iat, 900);
}

#[test]
fn test_role_permissions() {
    assert!(Role::Admin.is_admin());
    assert!(Role::Admin.can_book());
    assert!(Role::Accountant.can_book());
    assert!(!Role::Accountant.is_admin());
    assert!(!Role::Manager.can_book());
    assert!(!Role::User.can_book());
}

#[test]
fn test_role_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Role::Accountant).unwrap(), "\"accountant\"");
    let role: Role = serde_json::from_str("\"manager\"").unwrap();
    assert_eq!(role, Role::Manager);
    assert!(serde_json::from_str::<Role>("\"owner\"").is_err());
}

#[test]
fn test_issue_then_verify() {
    let service = service();
    let user = UserId::new();

    let token = service.issue(user, Role::Admin).unwrap();
    let claims = service.verify(&token).unwrap();

    assert_eq!(claims.sub, user);
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(service.ttl(), Duration::seconds(900));
}

#[test]
fn test_garbage_rejected() {
    assert!(matches!(
        service().verify("invalid.token.here"),
        Err(JwtError::Rejected(_))
    ));
}

#[test]
fn test_other_secret_rejected() {
    let other = JwtService::new(&JwtConfig {
        secret: "another-secret".to_string(),
        access_token_expiry_secs: 900,
    });
    let token = other.issue(UserId::new(), Role::User).unwrap();

    assert!(matches!(service().verify(&token), Err(JwtError::Rejected(_))));
}

#[test]
fn test_foreign_issuer_rejected() {
    let mut claims = Claims::new(UserId::new(), Role::Admin, Utc::now(), Duration::minutes(5));
    claims.iss = "someone-else".to_string();

    assert!(matches!(service().verify(&sign(&claims)), Err(JwtError::Rejected(_))));
}

#[test]
fn test_expired_token() {
    let claims = Claims::new(
        UserId::new(),
        Role::User,
        Utc::now() - Duration::hours(3),
        Duration::hours(1),
    );

    assert!(matches!(service().verify(&sign(&claims)), Err(JwtError::Expired)));
}
