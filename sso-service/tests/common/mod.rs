use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::HashingCost;
use auth::PasswordHasher;
use auth::TokenIssuer;
use sso_service::domain::auth::errors::StorageError;
use sso_service::domain::auth::models::AppId;
use sso_service::domain::auth::models::AppSecret;
use sso_service::domain::auth::models::Application;
use sso_service::domain::auth::models::EmailAddress;
use sso_service::domain::auth::models::PasswordHash;
use sso_service::domain::auth::models::User;
use sso_service::domain::auth::models::UserId;
use sso_service::domain::auth::ports::AppProvider;
use sso_service::domain::auth::ports::UserProvider;
use sso_service::domain::auth::ports::UserSaver;
use sso_service::domain::auth::service::AuthService;
use sso_service::inbound::grpc::AuthGrpcService;
use sso_service::proto::auth_client::AuthClient;
use sso_service::proto::auth_server::AuthServer;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Channel;
use tonic::transport::Server;

pub const TOKEN_TTL_SECONDS: i64 = 3600;

/// Storage gateway kept in memory, with the same uniqueness rule as the
/// `users_email_key` constraint.
#[derive(Default)]
pub struct InMemoryStorage {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    last_user_id: i64,
    users: HashMap<String, User>,
    applications: HashMap<i32, Application>,
    admin_flags: HashMap<i64, bool>,
}

impl InMemoryStorage {
    pub fn add_application(&self, id: i32, name: &str, secret: &[u8]) {
        self.state.lock().unwrap().applications.insert(
            id,
            Application {
                id: AppId(id),
                name: name.to_string(),
                secret: AppSecret::new(secret.to_vec()),
            },
        );
    }

    pub fn set_admin(&self, user_id: i64, is_admin: bool) {
        self.state
            .lock()
            .unwrap()
            .admin_flags
            .insert(user_id, is_admin);
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }
}

#[async_trait]
impl UserSaver for InMemoryStorage {
    async fn save_user(
        &self,
        email: &EmailAddress,
        password_hash: &PasswordHash,
    ) -> Result<UserId, StorageError> {
        let mut state = self.state.lock().unwrap();

        if state.users.contains_key(email.as_str()) {
            return Err(StorageError::Conflict(email.to_string()));
        }

        state.last_user_id += 1;
        let id = UserId(state.last_user_id);
        state.users.insert(
            email.as_str().to_string(),
            User {
                id,
                email: email.clone(),
                password_hash: password_hash.clone(),
            },
        );

        Ok(id)
    }
}

#[async_trait]
impl UserProvider for InMemoryStorage {
    async fn find_user_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, StorageError> {
        Ok(self.state.lock().unwrap().users.get(email.as_str()).cloned())
    }

    async fn find_admin_flag(&self, user_id: UserId) -> Result<bool, StorageError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .admin_flags
            .get(&user_id.as_i64())
            .copied()
            .unwrap_or(false))
    }
}

#[async_trait]
impl AppProvider for InMemoryStorage {
    async fn find_application(&self, app_id: AppId) -> Result<Option<Application>, StorageError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .applications
            .get(&app_id.as_i32())
            .cloned())
    }
}

/// Test application serving the gRPC API on a random local port
pub struct TestApp {
    pub storage: Arc<InMemoryStorage>,
    pub client: AuthClient<Channel>,
}

impl TestApp {
    /// Spawn the gRPC server in a background task and connect a client to it
    pub async fn spawn() -> Self {
        let storage = Arc::new(InMemoryStorage::default());

        // Low Argon2 cost keeps the suite fast; the flow is identical.
        let password_hasher = PasswordHasher::with_cost(HashingCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password hasher");

        let service = Arc::new(AuthService::new(
            Arc::clone(&storage),
            Arc::clone(&storage),
            Arc::clone(&storage),
            password_hasher,
            TokenIssuer::new(chrono::Duration::seconds(TOKEN_TTL_SECONDS)),
            tracing::Span::none(),
        )
        .expect("Failed to build auth service"));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = format!(
            "http://{}",
            listener.local_addr().expect("Failed to read local address")
        );

        tokio::spawn(async move {
            Server::builder()
                .add_service(AuthServer::new(AuthGrpcService::new(service)))
                .serve_with_incoming(TcpListenerStream::new(listener))
                .await
                .expect("Server error");
        });

        let client = AuthClient::connect(address)
            .await
            .expect("Failed to connect gRPC client");

        Self {
            storage,
            client,
        }
    }
}
