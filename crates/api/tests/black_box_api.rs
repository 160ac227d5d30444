use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::{json, Value};

use stoa_api::config::AppConfig;
use stoa_auth::{AccessClaims, Role, UserClaims};
use stoa_core::{AccountId, CartItemId, ProductId};

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    /// Build the app (same router as prod) on an ephemeral port.
    async fn spawn_with(config: AppConfig) -> Self {
        let app = stoa_api::app::build_app(config);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        access_ttl_secs: 15 * 60,
        refresh_ttl_secs: 7 * 24 * 3600,
        // Low hash cost keeps registration fast under test.
        bcrypt_cost: Some(4),
        trust_forwarded_identity: false,
    }
}

/// Register an account and return the response body (`user`, `token`,
/// `refresh_token`).
async fn register(client: &reqwest::Client, base_url: &str, email: &str, role: &str) -> Value {
    let res = client
        .post(format!("{}/auth/register", base_url))
        .json(&json!({ "email": email, "password": "hunter2", "role": role }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED, "registering {email}");
    res.json().await.unwrap()
}

async fn create_company(
    client: &reqwest::Client,
    base_url: &str,
    token: &str,
    name: &str,
    join_code: &str,
) -> Value {
    let res = client
        .post(format!("{}/companies", base_url))
        .bearer_auth(token)
        .json(&json!({ "name": name, "join_code": join_code }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED, "creating company {name}");
    res.json().await.unwrap()
}

async fn join_by_code(client: &reqwest::Client, base_url: &str, token: &str, code: &str) -> Value {
    let res = client
        .post(format!("{}/companies/code/{}/customers", base_url, code))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK, "joining by code {code}");
    res.json().await.unwrap()
}

/// Re-mint an access token so its claims pick up the account's current
/// stored state (new organization, new associations).
async fn refreshed_token(client: &reqwest::Client, base_url: &str, session: &Value) -> String {
    let res = client
        .post(format!("{}/auth/refresh", base_url))
        .json(&json!({ "refresh_token": session["refresh_token"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK, "refreshing a session");
    let body: Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_public_and_resources_are_not() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/companies", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/orders", srv.base_url))
        .bearer_auth("not.a.token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_and_both_token_carriers_work() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let registered = register(&client, &srv.base_url, "a@x.com", "customer").await;
    assert_eq!(registered["user"]["email"], "a@x.com");
    assert_eq!(registered["user"]["role"], "customer");
    assert!(registered["user"].get("password_hash").is_none());

    // Wrong password is indistinguishable from an unknown account.
    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "a@x.com", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(format!("{}/auth/login", srv.base_url))
        .json(&json!({ "email": "A@X.COM", "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let login: Value = res.json().await.unwrap();
    let token = login["token"].as_str().unwrap();

    // Header carrier.
    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Cookie carrier.
    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .header("cookie", format!("token={}", token))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await.unwrap();
    assert_eq!(me["user"]["email"], "a@x.com");
}

#[tokio::test]
async fn login_refresh_logout_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let registered = register(&client, &srv.base_url, "a@x.com", "customer").await;
    let account_id = registered["user"]["id"].as_str().unwrap().to_string();
    let access = registered["token"].as_str().unwrap().to_string();
    let refresh = registered["refresh_token"].as_str().unwrap().to_string();

    // Refresh yields a fresh access token for the same identity.
    let res = client
        .post(format!("{}/auth/refresh", srv.base_url))
        .json(&json!({ "refresh_token": refresh }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let refreshed: Value = res.json().await.unwrap();
    let new_access = refreshed["token"].as_str().unwrap().to_string();

    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .bearer_auth(&new_access)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let me: Value = res.json().await.unwrap();
    assert_eq!(me["user"]["id"].as_str().unwrap(), account_id);

    // A missing refresh token is a validation error, not an auth error.
    let res = client
        .post(format!("{}/auth/refresh", srv.base_url))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Logout revokes the session.
    let res = client
        .post(format!("{}/auth/logout", srv.base_url))
        .json(&json!({ "refresh_token": refresh, "token": access }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Repeating the logout with the same refresh token is not-found.
    let res = client
        .post(format!("{}/auth/logout", srv.base_url))
        .json(&json!({ "refresh_token": refresh, "token": access }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The revoked access token fails the blacklist-aware endpoint.
    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .bearer_auth(&access)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // The refresh token is dead too.
    let res = client
        .post(format!("{}/auth/refresh", srv.base_url))
        .json(&json!({ "refresh_token": refresh }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn association_converges_from_both_paths() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let owner = register(&client, &srv.base_url, "owner@acme.com", "company").await;
    let owner_token = owner["token"].as_str().unwrap();
    let company = create_company(&client, &srv.base_url, owner_token, "Acme", "acme-42").await;
    let company_id = company["id"].as_str().unwrap();

    let customer = register(&client, &srv.base_url, "u@x.com", "customer").await;
    let customer_id = customer["user"]["id"].as_str().unwrap();
    let customer_token = customer["token"].as_str().unwrap();

    // Direct add by the owner.
    let res = client
        .post(format!("{}/companies/{}/customers", srv.base_url, company_id))
        .bearer_auth(owner_token)
        .json(&json!({ "account_id": customer_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let outcome: Value = res.json().await.unwrap();
    assert_eq!(outcome["newly_linked"], true);

    // The same customer joining by code afterwards changes nothing.
    let outcome = join_by_code(&client, &srv.base_url, customer_token, "acme-42").await;
    assert_eq!(outcome["newly_linked"], false);

    let res = client
        .get(format!("{}/companies/{}", srv.base_url, company_id))
        .bearer_auth(owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let company: Value = res.json().await.unwrap();
    let roster: Vec<_> = company["customers"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|id| id.as_str() == Some(customer_id))
        .collect();
    assert_eq!(roster.len(), 1, "exactly one roster entry");

    // The customer's side carries exactly one entry as well.
    let res = client
        .get(format!("{}/auth/me", srv.base_url))
        .bearer_auth(customer_token)
        .send()
        .await
        .unwrap();
    let me: Value = res.json().await.unwrap();
    assert_eq!(
        me["user"]["associate_company_ids"],
        json!([company_id]),
        "one associate entry"
    );

    // An unknown join code is not found; so is a malformed company id.
    let res = client
        .post(format!("{}/companies/code/no-such/customers", srv.base_url))
        .bearer_auth(customer_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .post(format!("{}/companies/zzz/customers", srv.base_url))
        .bearer_auth(owner_token)
        .json(&json!({ "account_id": customer_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn customer_orders_resolve_to_the_first_associated_company() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let owner1 = register(&client, &srv.base_url, "o1@x.com", "company").await;
    let c1 = create_company(
        &client,
        &srv.base_url,
        owner1["token"].as_str().unwrap(),
        "First",
        "first-1",
    )
    .await;

    let owner2 = register(&client, &srv.base_url, "o2@x.com", "company").await;
    create_company(
        &client,
        &srv.base_url,
        owner2["token"].as_str().unwrap(),
        "Second",
        "second-2",
    )
    .await;

    // Company scope is read from the token, so both owners re-mint theirs
    // now that their organizations exist.
    let owner1_token = refreshed_token(&client, &srv.base_url, &owner1).await;
    let owner2_token = refreshed_token(&client, &srv.base_url, &owner2).await;

    let customer = register(&client, &srv.base_url, "u@x.com", "customer").await;
    let customer_id = customer["user"]["id"].as_str().unwrap().to_string();
    let customer_token = customer["token"].as_str().unwrap();

    join_by_code(&client, &srv.base_url, customer_token, "first-1").await;
    join_by_code(&client, &srv.base_url, customer_token, "second-2").await;

    // Associations changed after login, so refresh claims first.
    let customer_token = refreshed_token(&client, &srv.base_url, &customer).await;

    // Declaring someone else as owner is a hard authorization failure.
    let res = client
        .post(format!("{}/orders", srv.base_url))
        .bearer_auth(&customer_token)
        .json(&json!({
            "owner": AccountId::new().to_string(),
            "lines": [{ "product_id": ProductId::new().to_string(), "quantity": 1, "unit_price": 100 }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "user id mismatch");

    let res = client
        .post(format!("{}/orders", srv.base_url))
        .bearer_auth(&customer_token)
        .json(&json!({
            "owner": customer_id,
            "lines": [{ "product_id": ProductId::new().to_string(), "quantity": 2, "unit_price": 100 }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let order: Value = res.json().await.unwrap();
    assert_eq!(order["company_id"], c1["id"], "first association wins");
    assert_eq!(order["status"], "pending");

    // The first company's owner sees the order; the second's does not.
    let res = client
        .get(format!("{}/orders", srv.base_url))
        .bearer_auth(owner1_token)
        .send()
        .await
        .unwrap();
    let listed: Value = res.json().await.unwrap();
    assert_eq!(listed["items"].as_array().unwrap().len(), 1);

    let res = client
        .get(format!("{}/orders", srv.base_url))
        .bearer_auth(owner2_token)
        .send()
        .await
        .unwrap();
    let listed: Value = res.json().await.unwrap();
    assert_eq!(listed["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn cart_merges_lines_and_addresses_them_by_item_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let customer = register(&client, &srv.base_url, "u@x.com", "customer").await;
    let token = customer["token"].as_str().unwrap();
    let product = ProductId::new().to_string();

    for quantity in [2, 3] {
        let res = client
            .post(format!("{}/cart", srv.base_url))
            .bearer_auth(token)
            .json(&json!({ "product_id": product, "quantity": quantity }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = client
        .get(format!("{}/cart", srv.base_url))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    let cart: Value = res.json().await.unwrap();
    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1, "two adds of one product merge");
    assert_eq!(items[0]["quantity"], 5);
    let item_id = items[0]["id"].as_str().unwrap();

    let res = client
        .put(format!("{}/cart/{}", srv.base_url, item_id))
        .bearer_auth(token)
        .json(&json!({ "quantity": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cart: Value = res.json().await.unwrap();
    assert_eq!(cart["items"][0]["quantity"], 7);

    // A fabricated line id is not found even though the product exists.
    let res = client
        .put(format!("{}/cart/{}", srv.base_url, CartItemId::new()))
        .bearer_auth(token)
        .json(&json!({ "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Carts are customer-only.
    let company = register(&client, &srv.base_url, "o@x.com", "company").await;
    let res = client
        .get(format!("{}/cart", srv.base_url))
        .bearer_auth(company["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(format!("{}/cart/{}", srv.base_url, item_id))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cart: Value = res.json().await.unwrap();
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn product_visibility_follows_association() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let owner = register(&client, &srv.base_url, "o1@x.com", "company").await;
    let owner_token = owner["token"].as_str().unwrap().to_string();
    create_company(&client, &srv.base_url, &owner_token, "Acme", "acme-42").await;

    // The company scope comes from the token, so re-mint after org creation.
    let owner_token = refreshed_token(&client, &srv.base_url, &owner).await;

    let res = client
        .post(format!("{}/products", srv.base_url))
        .bearer_auth(&owner_token)
        .json(&json!({ "name": "Widget", "price": 500 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let product: Value = res.json().await.unwrap();
    let product_id = product["id"].as_str().unwrap();

    // A rival company cannot tell the product exists.
    let rival = register(&client, &srv.base_url, "o2@x.com", "company").await;
    let res = client
        .get(format!("{}/products/{}", srv.base_url, product_id))
        .bearer_auth(rival["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // An associated customer can.
    let customer = register(&client, &srv.base_url, "u@x.com", "customer").await;
    join_by_code(
        &client,
        &srv.base_url,
        customer["token"].as_str().unwrap(),
        "acme-42",
    )
    .await;
    let member_token = refreshed_token(&client, &srv.base_url, &customer).await;
    let res = client
        .get(format!("{}/products/{}", srv.base_url, product_id))
        .bearer_auth(&member_token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn forwarded_identity_is_honored_only_in_trusted_mode() {
    let client = reqwest::Client::new();

    let admin_id = AccountId::new().to_string();

    // Default deployment: forwarded headers alone do not authenticate.
    let srv = TestServer::spawn().await;
    let res = client
        .get(format!("{}/companies", srv.base_url))
        .header("x-user-id", &admin_id)
        .header("x-user-role", "admin")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    drop(srv);

    // Trusted deployment: the same headers are the identity.
    let mut config = test_config();
    config.trust_forwarded_identity = true;
    let srv = TestServer::spawn_with(config).await;

    let res = client
        .get(format!("{}/companies", srv.base_url))
        .header("x-user-id", &admin_id)
        .header("x-user-role", "admin")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // An unknown forwarded role still fails loudly.
    let res = client
        .get(format!("{}/companies", srv.base_url))
        .header("x-user-id", &admin_id)
        .header("x-user-role", "superuser")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn foreign_and_expired_signatures_are_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let claims = AccessClaims {
        user: UserClaims {
            id: AccountId::new(),
            role: Role::Admin,
            company_id: None,
            associate_company_ids: None,
        },
        iat: Utc::now().timestamp(),
        exp: (Utc::now() + chrono::Duration::minutes(10)).timestamp(),
    };

    // Signed with somebody else's secret.
    let forged = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"other-secret"),
    )
    .unwrap();
    let res = client
        .get(format!("{}/companies", srv.base_url))
        .bearer_auth(forged)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Correct secret, but already expired.
    let expired_claims = AccessClaims {
        exp: (Utc::now() - chrono::Duration::minutes(10)).timestamp(),
        ..claims
    };
    let expired = jsonwebtoken::encode(
        &Header::default(),
        &expired_claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();
    let res = client
        .get(format!("{}/companies", srv.base_url))
        .bearer_auth(expired)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
