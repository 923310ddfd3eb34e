use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::domain::{Identity, UserRecord};
use super::errors::AuthError;
use super::repository::UserRepository;
use super::token::TokenService;

/// Take the credential out of an `Authorization: <scheme> <token>` header value.
///
/// The scheme word itself is not checked; only the second segment matters.
pub fn extract_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    let _scheme = parts.next()?;
    parts.next()
}

/// Auth business service independent of web framework.
///
/// Holds the two request guards: [`AuthService::authenticate`] turns an
/// authorization header into an [`Identity`], and
/// [`AuthService::authorize_admin`] admits only identities whose stored
/// user record has the admin role.
pub struct AuthService<R: UserRepository> {
    repo: Arc<R>,
    tokens: TokenService,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: TokenService) -> Self { Self { repo, tokens } }

    pub fn tokens(&self) -> &TokenService { &self.tokens }

    /// Issue a token for a registered user.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::AuthService, repository::mock::MockUserRepository};
    /// use service::auth::token::{TokenConfig, TokenService};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockUserRepository::default().with_user("a@x.com", None));
    /// let svc = AuthService::new(repo, TokenService::new(TokenConfig { secret: "secret".into(), ttl: None }));
    /// let token = tokio_test::block_on(svc.issue_token("a@x.com")).unwrap();
    /// assert_eq!(svc.tokens().verify(&token).unwrap().email, "a@x.com");
    /// assert!(tokio_test::block_on(svc.issue_token("nobody@x.com")).is_err());
    /// ```
    #[instrument(skip(self))]
    pub async fn issue_token(&self, email: &str) -> Result<String, AuthError> {
        if self.repo.find_user_by_email(email).await?.is_none() {
            debug!("token requested for unknown email");
            return Err(AuthError::NoSuchIdentity);
        }
        let token = self.tokens.issue(email)?;
        info!("access_token_issued");
        Ok(token)
    }

    /// Authentication guard: verify the header's token and expose the caller.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Identity, AuthError> {
        let header = authorization.ok_or_else(|| AuthError::Unauthorized("missing authorization header".into()))?;
        let token = extract_token(header)
            .ok_or_else(|| AuthError::Unauthorized("authorization header has no token segment".into()))?;
        let claims = self.tokens.verify(token).map_err(|e| {
            warn!(err = %e, "token verification failed");
            AuthError::Unauthorized(e.to_string())
        })?;
        Ok(Identity { email: claims.email })
    }

    /// Authorization guard: the identity's user record must exist and be admin.
    #[instrument(skip(self), fields(email = %identity.email))]
    pub async fn authorize_admin(&self, identity: &Identity) -> Result<UserRecord, AuthError> {
        match self.repo.find_user_by_email(&identity.email).await? {
            Some(user) if user.is_admin() => Ok(user),
            Some(_) => Err(AuthError::Forbidden("admin role required".into())),
            None => Err(AuthError::Forbidden("no user record for identity".into())),
        }
    }

    /// Whether `email` is the caller's own address and that user is an admin.
    pub async fn is_admin(&self, identity: &Identity, email: &str) -> Result<bool, AuthError> {
        if identity.email != email {
            return Ok(false);
        }
        Ok(self
            .repo
            .find_user_by_email(email)
            .await?
            .is_some_and(|u| u.is_admin()))
    }
}
