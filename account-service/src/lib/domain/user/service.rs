use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::models::Role;
use crate::domain::user::models::SignUpInput;
use crate::domain::user::models::TokenNamespace;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::AccountServicePort;
use crate::user::ports::Mailer;
use crate::user::ports::TokenStore;
use crate::user::ports::UserRepository;
use crate::user::validation;

/// Domain service implementation for the account orchestrations.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<UR, TS, NM>
where
    UR: UserRepository,
    TS: TokenStore,
    NM: Mailer,
{
    repository: Arc<UR>,
    tokens: Arc<TS>,
    mailer: Arc<NM>,
    password_hasher: auth::PasswordHasher,
    client_url: String,
    token_ttl: Duration,
}

impl<UR, TS, NM> AccountService<UR, TS, NM>
where
    UR: UserRepository,
    TS: TokenStore,
    NM: Mailer,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `tokens` - Ephemeral single-use token store
    /// * `mailer` - Notification delivery implementation
    /// * `client_url` - Base URL the confirmation/reset links point at
    /// * `token_ttl` - Lifetime of confirmation and reset tokens
    pub fn new(
        repository: Arc<UR>,
        tokens: Arc<TS>,
        mailer: Arc<NM>,
        client_url: String,
        token_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            tokens,
            mailer,
            password_hasher: auth::PasswordHasher::new(),
            client_url: client_url.trim_end_matches('/').to_string(),
            token_ttl,
        }
    }

    fn confirmation_url(&self, token: &str) -> String {
        format!("{}/confirm/{}", self.client_url, token)
    }

    fn change_password_url(&self, token: &str) -> String {
        format!("{}/change-password/{}", self.client_url, token)
    }

    // Argon2 is CPU-bound; run it off the async dispatch path so other
    // requests keep being serviced while a hash is in flight.
    async fn hash_password(&self, password: String) -> Result<String, UserError> {
        let hasher = self.password_hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(UserError::from)
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, UserError> {
        let hasher = self.password_hasher;
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| UserError::Unknown(format!("Verification task failed: {}", e)))
    }

    async fn dispatch_link(&self, address: &str, url: String) {
        if let Err(e) = self.mailer.send(address, &url).await {
            // Delivery problems must not fail the enclosing operation;
            // the token stays valid and the flow can be retried.
            tracing::error!(address = %address, "Failed to dispatch notification: {}", e);
        }
    }
}

#[async_trait]
impl<UR, TS, NM> AccountServicePort for AccountService<UR, TS, NM>
where
    UR: UserRepository,
    TS: TokenStore,
    NM: Mailer,
{
    async fn sign_up(&self, input: SignUpInput) -> Result<User, UserError> {
        let valid = validation::validate_sign_up(input)?;

        let password_hash = self.hash_password(valid.password).await?;

        let user = User {
            id: UserId::new(),
            first_name: valid.first_name,
            last_name: valid.last_name,
            username: valid.username,
            email: valid.email,
            password_hash,
            confirmed: false,
            role: Role::User,
            created_at: Utc::now(),
        };

        let created = self.repository.create(user).await?;

        let token = self
            .tokens
            .issue(TokenNamespace::Confirm, &created.id, self.token_ttl)
            .await?;
        self.dispatch_link(created.email.as_str(), self.confirmation_url(&token))
            .await;

        tracing::info!(user_id = %created.id, "Account created, confirmation pending");

        Ok(created)
    }

    async fn sign_in(&self, login: &str, password: &str) -> Result<Option<User>, UserError> {
        let Some(user) = self.repository.find_by_login(login).await? else {
            return Ok(None);
        };

        let valid = self
            .verify_password(password.to_string(), user.password_hash.clone())
            .await?;
        if !valid {
            return Ok(None);
        }

        if !user.confirmed {
            return Ok(None);
        }

        Ok(Some(user))
    }

    async fn confirm_user(&self, token: &str) -> Result<bool, UserError> {
        let Some(user_id) = self.tokens.consume(TokenNamespace::Confirm, token).await? else {
            return Ok(false);
        };

        let Some(mut user) = self.repository.find_by_id(&user_id).await? else {
            // Token outlived its subject (account deleted in between).
            return Ok(false);
        };

        user.confirmed = true;
        self.repository.update(user).await?;

        tracing::info!(user_id = %user_id, "Account confirmed");

        Ok(true)
    }

    async fn forgot_password(&self, email: &str) -> Result<(), UserError> {
        // Unknown addresses get the same uniform success and no mail,
        // so the response never reveals whether an account exists.
        let Some(user) = self.repository.find_by_email(email).await? else {
            return Ok(());
        };

        let token = self
            .tokens
            .issue(TokenNamespace::Forgot, &user.id, self.token_ttl)
            .await?;
        self.dispatch_link(user.email.as_str(), self.change_password_url(&token))
            .await;

        Ok(())
    }

    async fn change_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<Option<User>, UserError> {
        let Some(user_id) = self.tokens.consume(TokenNamespace::Forgot, token).await? else {
            return Ok(None);
        };

        validation::validate_password(new_password)?;

        let Some(mut user) = self.repository.find_by_id(&user_id).await? else {
            return Ok(None);
        };

        user.password_hash = self.hash_password(new_password.to_string()).await?;
        let updated = self.repository.update(user).await?;

        tracing::info!(user_id = %user_id, "Password changed");

        Ok(Some(updated))
    }

    async fn delete_user(&self, id: &str) -> Result<bool, UserError> {
        let Ok(user_id) = UserId::from_string(id) else {
            return Ok(false);
        };

        self.repository.delete(&user_id).await
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, UserError> {
        self.repository.find_by_id(id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }
}


#[cfg(test)]
mod flow_tests {
    //! Full-lifecycle tests running the real service against in-memory
    //! stores and a mailer that records every dispatched link.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::outbound::memory::MemoryTokenStore;
    use crate::user::errors::MailerError;
    use crate::user::errors::UserError;

    #[derive(Default)]
    struct MemoryRepository {
        users: Mutex<HashMap<UserId, User>>,
    }

    #[async_trait]
    impl UserRepository for MemoryRepository {
        async fn create(&self, user: User) -> Result<User, UserError> {
            let mut users = self.users.lock().unwrap();
            if users
                .values()
                .any(|u| u.username.as_str() == user.username.as_str())
            {
                return Err(UserError::UsernameAlreadyExists(
                    user.username.as_str().to_string(),
                ));
            }
            if users.values().any(|u| u.email.as_str() == user.email.as_str()) {
                return Err(UserError::EmailAlreadyExists(
                    user.email.as_str().to_string(),
                ));
            }
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
            Ok(self.users.lock().unwrap().get(id).cloned())
        }

        async fn find_by_login(&self, login: &str) -> Result<Option<User>, UserError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.username.as_str() == login || u.email.as_str() == login)
                .cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email.as_str() == email)
                .cloned())
        }

        async fn list_all(&self) -> Result<Vec<User>, UserError> {
            Ok(self.users.lock().unwrap().values().cloned().collect())
        }

        async fn update(&self, user: User) -> Result<User, UserError> {
            let mut users = self.users.lock().unwrap();
            if !users.contains_key(&user.id) {
                return Err(UserError::NotFound(user.id.to_string()));
            }
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn delete(&self, id: &UserId) -> Result<bool, UserError> {
            Ok(self.users.lock().unwrap().remove(id).is_some())
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, String)>>,
    }

    impl RecordingMailer {
        fn last_token(&self) -> String {
            let sent = self.sent.lock().unwrap();
            let (_, url) = sent.last().expect("a link should have been dispatched");
            url.rsplit('/').next().unwrap().to_string()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, address: &str, url: &str) -> Result<(), MailerError> {
            self.sent
                .lock()
                .unwrap()
                .push((address.to_string(), url.to_string()));
            Ok(())
        }
    }

    type FlowService = AccountService<MemoryRepository, MemoryTokenStore, RecordingMailer>;

    fn flow_service() -> (Arc<FlowService>, Arc<RecordingMailer>) {
        let mailer = Arc::new(RecordingMailer::default());
        let service = Arc::new(AccountService::new(
            Arc::new(MemoryRepository::default()),
            Arc::new(MemoryTokenStore::new()),
            Arc::clone(&mailer),
            "http://localhost:3000".to_string(),
            Duration::from_secs(24 * 60 * 60),
        ));
        (service, mailer)
    }

    fn ann_lee() -> SignUpInput {
        SignUpInput {
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            username: "annlee".to_string(),
            email: "ann@example.com".to_string(),
            password: "secret123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_confirm_sign_in_lifecycle() {
        let (service, mailer) = flow_service();

        let created = service.sign_up(ann_lee()).await.unwrap();
        assert!(!created.confirmed);
        assert_ne!(created.password_hash, "secret123");

        // Correct credentials, but the account is not confirmed yet.
        assert!(service
            .sign_in("ann@example.com", "secret123")
            .await
            .unwrap()
            .is_none());

        let token = mailer.last_token();
        assert!(service.confirm_user(&token).await.unwrap());

        let signed_in = service
            .sign_in("ann@example.com", "secret123")
            .await
            .unwrap()
            .expect("confirmed account should sign in");
        assert!(signed_in.confirmed);

        // Username works as a login identifier too.
        assert!(service
            .sign_in("annlee", "secret123")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_concurrent_confirmations_have_one_winner() {
        let (service, mailer) = flow_service();

        service.sign_up(ann_lee()).await.unwrap();
        let token = mailer.last_token();

        let first = tokio::spawn({
            let service = Arc::clone(&service);
            let token = token.clone();
            async move { service.confirm_user(&token).await.unwrap() }
        });
        let second = tokio::spawn({
            let service = Arc::clone(&service);
            async move { service.confirm_user(&token).await.unwrap() }
        });

        let (first, second) = (first.await.unwrap(), second.await.unwrap());
        assert!(first ^ second);
    }

    #[tokio::test]
    async fn test_password_reset_lifecycle() {
        let (service, mailer) = flow_service();

        let created = service.sign_up(ann_lee()).await.unwrap();
        let confirm_token = mailer.last_token();
        service.confirm_user(&confirm_token).await.unwrap();

        assert!(service.forgot_password("ann@example.com").await.is_ok());
        let reset_token = mailer.last_token();

        let updated = service
            .change_password(&reset_token, "newsecret")
            .await
            .unwrap()
            .expect("fresh token should redeem");
        assert_eq!(updated.id, created.id);

        // The token burned with the first redemption.
        assert!(service
            .change_password(&reset_token, "another")
            .await
            .unwrap()
            .is_none());

        // Old password out, new password in.
        assert!(service
            .sign_in("annlee", "secret123")
            .await
            .unwrap()
            .is_none());
        assert!(service
            .sign_in("annlee", "newsecret")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_conflicts() {
        let (service, _) = flow_service();

        service.sign_up(ann_lee()).await.unwrap();

        let mut second = ann_lee();
        second.email = "other@example.com".to_string();
        assert!(matches!(
            service.sign_up(second).await,
            Err(UserError::UsernameAlreadyExists(_))
        ));
    }
}
