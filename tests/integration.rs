use serde_json::{Value, json};
use sftp_authorizer::auth::{AuthResponse, AuthResult, Authorizer, HomeDirectoryType, UserRegistry};
use sftp_authorizer::config::AuthorizerConfig;
use sftp_authorizer::handler::{AuthRequest, Handler};
use sftp_authorizer::middleware::RateLimiter;
use sftp_authorizer::policy::{DirectoryMap, PolicyDocument};
use std::sync::Arc;

const ROLE: &str = "arn:aws:iam::123456789012:role/sftp-user";

const CONFIG: &str = r#"
public_bucket = "pub"
subscribe_bucket = "sub"
user_role = "arn:aws:iam::123456789012:role/sftp-user"
server_id = "s-0123456789abcdef0"
"#;

// Helper to build the authorizer the binary would build
fn authorizer() -> Authorizer {
    let config = AuthorizerConfig::from_toml_str(CONFIG).unwrap();
    Authorizer::new(UserRegistry::from_config(&config).unwrap(), config.user_role)
}

fn handler() -> Handler {
    let config = AuthorizerConfig::from_toml_str(CONFIG).unwrap();
    let limiter = RateLimiter::new(config.rate_limit_max_attempts, config.rate_limit_window());
    let authorizer = Authorizer::new(
        UserRegistry::from_config(&config).unwrap(),
        config.user_role.clone(),
    );
    Handler::new(authorizer, config.server_id, limiter)
}

#[test]
fn test_alice_scenario() {
    let result = authorizer().authorize("alice", "Password01");
    let grant = result.grant().expect("alice should be authorized");

    assert_eq!(grant.role, ROLE);
    assert_eq!(grant.home_directory_type, HomeDirectoryType::Logical);

    let policy: Value = serde_json::from_str(&grant.policy).unwrap();
    assert_eq!(
        policy,
        json!({
            "Version": "2012-10-17",
            "Statement": [
                {
                    "Sid": "AllowListingOfFolder",
                    "Effect": "Allow",
                    "Action": ["s3:ListBucket"],
                    "Resource": ["arn:aws:s3:::pub", "arn:aws:s3:::sub"]
                },
                {
                    "Sid": "AllowObjectAccess",
                    "Effect": "Allow",
                    "Action": ["s3:GetObject", "s3:GetObjectVersion"],
                    "Resource": [
                        "arn:aws:s3:::pub/global/*",
                        "arn:aws:s3:::sub/historical/2018/indices/*",
                        "arn:aws:s3:::sub/historical/2019/indices/*",
                        "arn:aws:s3:::sub/historical/2019/equities/*"
                    ]
                }
            ]
        })
    );

    let details: Value = serde_json::from_str(&grant.home_directory_details).unwrap();
    assert_eq!(
        details,
        json!([
            {"Entry": "/public/research", "Target": "/pub"},
            {"Entry": "/subscribed/2018/indices", "Target": "/sub/historical/2018/indices"},
            {"Entry": "/subscribed/2019/indices", "Target": "/sub/historical/2019/indices"},
            {"Entry": "/subscribed/2019/equities", "Target": "/sub/historical/2019/equities"}
        ])
    );
}

#[test]
fn test_denials_share_one_shape() {
    let auth = authorizer();
    let wrong_password = AuthResponse::from(auth.authorize("alice", "wrong"));
    let unknown_user = AuthResponse::from(auth.authorize("carol", "anything"));

    assert_eq!(wrong_password, unknown_user);
    assert_eq!(serde_json::to_string(&wrong_password).unwrap(), "{}");
    assert_eq!(serde_json::to_string(&unknown_user).unwrap(), "{}");
}

#[test]
fn test_unknown_users_denied_for_any_password() {
    let auth = authorizer();
    for username in ["carol", "root", "alice ", " alice", "Alice"] {
        for password in ["", "Password01", "Password02", "anything"] {
            assert_eq!(auth.authorize(username, password), AuthResult::Denied);
        }
    }
}

#[test]
fn test_serialized_documents_round_trip() {
    let auth = authorizer();
    for (username, password) in [("alice", "Password01"), ("bryan", "Password02")] {
        let result = auth.authorize(username, password);
        let grant = result.grant().unwrap();
        let record = auth.registry().get(username).unwrap();

        let policy: PolicyDocument = serde_json::from_str(&grant.policy).unwrap();
        assert_eq!(&policy, record.policy());

        let map: DirectoryMap = serde_json::from_str(&grant.home_directory_details).unwrap();
        assert_eq!(&map, record.directory_map());
    }
}

#[test]
fn test_every_resource_stays_inside_configured_buckets() {
    let auth = authorizer();
    for (username, password) in [("alice", "Password01"), ("bryan", "Password02")] {
        let grant = auth.authorize(username, password).grant().cloned().unwrap();
        let policy: PolicyDocument = serde_json::from_str(&grant.policy).unwrap();
        for resource in policy.resources() {
            assert!(
                resource.starts_with("arn:aws:s3:::pub") || resource.starts_with("arn:aws:s3:::sub"),
                "{} escapes the configured buckets",
                resource
            );
        }
    }
}

#[test]
fn test_configured_credential_store_replaces_demo_users() {
    let digest = sftp_authorizer::auth::Credential::from_secret("carol-salt", "hunter2").digest_hex();
    let toml = format!(
        r#"{}
[[users]]
username = "carol"
salt = "carol-salt"
password_sha256 = "{}"
subscriptions = ["2019/credit"]
"#,
        CONFIG, digest
    );
    let config = AuthorizerConfig::from_toml_str(&toml).unwrap();
    let auth = Authorizer::new(UserRegistry::from_config(&config).unwrap(), config.user_role);

    assert_eq!(auth.authorize("alice", "Password01"), AuthResult::Denied);

    let result = auth.authorize("carol", "hunter2");
    let details: Value = serde_json::from_str(&result.grant().unwrap().home_directory_details).unwrap();
    assert_eq!(
        details,
        json!([
            {"Entry": "/public/research", "Target": "/pub"},
            {"Entry": "/subscribed/2019/credit", "Target": "/sub/historical/2019/credit"}
        ])
    );
}

#[tokio::test]
async fn test_handler_response_wire_format() {
    let h = handler();
    let request: AuthRequest = serde_json::from_value(json!({
        "username": "alice",
        "password": "Password01",
        "protocol": "SFTP",
        "serverId": "s-0123456789abcdef0",
        "sourceIp": "192.0.2.10"
    }))
    .unwrap();

    let value = serde_json::to_value(h.handle(&request).await).unwrap();
    let fields: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(fields.len(), 4);
    assert_eq!(value["Role"], ROLE);
    assert_eq!(value["HomeDirectoryType"], "LOGICAL");
    assert!(value["Policy"].is_string());
    assert!(value["HomeDirectoryDetails"].is_string());
}

#[tokio::test]
async fn test_concurrent_requests_share_one_handler() {
    let h = Arc::new(handler());
    let mut tasks = Vec::new();
    for i in 0..16 {
        let h = Arc::clone(&h);
        tasks.push(tokio::spawn(async move {
            let (user, pass) = if i % 2 == 0 {
                ("alice", "Password01")
            } else {
                ("bryan", "Password02")
            };
            (user, h.handle(&AuthRequest::new(user, pass)).await)
        }));
    }

    let mut alice_responses = Vec::new();
    for task in tasks {
        let (user, response) = task.await.unwrap();
        assert!(!response.is_empty());
        if user == "alice" {
            alice_responses.push(response);
        }
    }

    // Every alice grant is identical.
    assert_eq!(alice_responses.len(), 8);
    assert!(alice_responses.windows(2).all(|pair| pair[0] == pair[1]));
}
