//! OIDC client implementation using the openidconnect crate.
//!
//! One pending nonce binds the whole flow: it is sent as the OAuth2 `state`
//! parameter and as the ID-token `nonce`, stored in the caller's session
//! between redirect and callback.

use newsroom_access::ProviderClaims;
use openidconnect::core::{
    CoreAuthenticationFlow, CoreClient, CoreProviderMetadata, CoreUserInfoClaims,
};
use openidconnect::{
    AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointMaybeSet, EndpointNotSet,
    EndpointSet, IssuerUrl, Nonce, OAuth2TokenResponse, RedirectUrl, Scope, TokenResponse,
};

use crate::config::OidcConfig;

/// The client type produced by provider discovery.
type DiscoveredClient = CoreClient<
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointMaybeSet,
    EndpointMaybeSet,
>;

/// OIDC client for authenticating users against the identity provider.
pub struct OidcClient {
    provider_metadata: CoreProviderMetadata,
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_url: RedirectUrl,
    config: OidcConfig,
}

impl OidcClient {
    /// Creates a new OIDC client by discovering the provider metadata.
    pub async fn discover(config: OidcConfig) -> Result<Self, OidcError> {
        let issuer_url = IssuerUrl::new(config.issuer_url.clone())
            .map_err(|e| OidcError::Configuration(format!("invalid issuer URL: {}", e)))?;

        let http_client = build_http_client()?;

        let provider_metadata = CoreProviderMetadata::discover_async(issuer_url, &http_client)
            .await
            .map_err(|e| OidcError::Discovery(format!("failed to discover provider: {}", e)))?;

        let redirect_url = RedirectUrl::new(config.redirect_uri.clone())
            .map_err(|e| OidcError::Configuration(format!("invalid redirect URI: {}", e)))?;

        let client_id = ClientId::new(config.client_id.clone());
        let client_secret = ClientSecret::new(config.client_secret.clone());

        Ok(Self {
            provider_metadata,
            client_id,
            client_secret,
            redirect_url,
            config,
        })
    }

    /// Builds the authorization URL carrying the given login nonce.
    ///
    /// The nonce doubles as the `state` parameter; the callback verifies
    /// both against the session's pending nonce.
    pub fn authorization_url(&self, nonce: &str) -> String {
        let client = self.core_client();

        let state = nonce.to_string();
        let token_nonce = nonce.to_string();
        let mut auth_request = client.authorize_url(
            CoreAuthenticationFlow::AuthorizationCode,
            move || CsrfToken::new(state),
            move || Nonce::new(token_nonce),
        );

        for scope in self.config.scopes() {
            auth_request = auth_request.add_scope(Scope::new(scope.to_string()));
        }

        let (auth_url, _, _) = auth_request.url();
        auth_url.to_string()
    }

    /// Exchanges the authorization code for tokens and extracts claims.
    ///
    /// Verifies the ID token against the pending nonce, then makes a
    /// best-effort userinfo request to fill in claims the ID token omitted.
    pub async fn exchange_code(&self, code: &str, nonce: &str) -> Result<ProviderClaims, OidcError> {
        let client = self.core_client();
        let http_client = build_http_client()?;

        let token_request = client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .map_err(|e| OidcError::TokenExchange(format!("token endpoint error: {}", e)))?;

        let token_response = token_request
            .request_async(&http_client)
            .await
            .map_err(|e| OidcError::TokenExchange(format!("token exchange failed: {}", e)))?;

        let id_token = token_response
            .id_token()
            .ok_or_else(|| OidcError::TokenExchange("no ID token in response".to_string()))?;

        let expected_nonce = Nonce::new(nonce.to_string());
        let claims = id_token
            .claims(&client.id_token_verifier(), &expected_nonce)
            .map_err(|e| {
                OidcError::TokenValidation(format!("ID token validation failed: {}", e))
            })?;

        let subject = claims.subject().to_string();
        let issuer = claims.issuer().to_string();
        let email: Option<String> = claims.email().map(|e| e.as_str().to_string());
        let display_name: Option<String> = claims
            .name()
            .and_then(|n| n.get(None))
            .map(|n| n.as_str().to_string())
            .or_else(|| claims.preferred_username().map(|u| u.as_str().to_string()));

        let mut provider_claims = ProviderClaims::new(subject, issuer)
            .with_email(email)
            .with_display_name(display_name);

        // Userinfo is supplementary: a failure here never fails the login.
        match self
            .fetch_userinfo(&client, &http_client, &token_response)
            .await
        {
            Ok(supplement) => provider_claims = provider_claims.merged_with(supplement),
            Err(e) => {
                tracing::debug!(
                    "userinfo request failed, continuing with ID token claims: {}",
                    e
                );
            }
        }

        Ok(provider_claims)
    }

    async fn fetch_userinfo(
        &self,
        client: &DiscoveredClient,
        http_client: &reqwest::Client,
        token_response: &(impl OAuth2TokenResponse + Sync),
    ) -> Result<ProviderClaims, OidcError> {
        let request = client
            .user_info(token_response.access_token().clone(), None)
            .map_err(|e| OidcError::Configuration(format!("no userinfo endpoint: {}", e)))?;

        let claims: CoreUserInfoClaims = request
            .request_async(http_client)
            .await
            .map_err(|e| OidcError::TokenValidation(format!("userinfo request failed: {}", e)))?;

        let subject = claims.subject().to_string();
        let issuer = claims
            .issuer()
            .map(|i| i.to_string())
            .unwrap_or_else(|| self.config.issuer_url.clone());
        let email = claims.email().map(|e| e.as_str().to_string());
        let display_name = claims
            .name()
            .and_then(|n| n.get(None))
            .map(|n| n.as_str().to_string());

        Ok(ProviderClaims::new(subject, issuer)
            .with_email(email)
            .with_display_name(display_name))
    }

    fn core_client(&self) -> DiscoveredClient {
        CoreClient::from_provider_metadata(
            self.provider_metadata.clone(),
            self.client_id.clone(),
            Some(self.client_secret.clone()),
        )
        .set_redirect_uri(self.redirect_url.clone())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &OidcConfig {
        &self.config
    }
}

fn build_http_client() -> Result<reqwest::Client, OidcError> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| OidcError::Configuration(format!("failed to create HTTP client: {}", e)))
}

/// OIDC-related errors.
#[derive(Debug)]
pub enum OidcError {
    /// Configuration error (invalid URLs, etc.)
    Configuration(String),
    /// Failed to discover provider metadata.
    Discovery(String),
    /// Token exchange failed.
    TokenExchange(String),
    /// Token validation failed.
    TokenValidation(String),
}

impl std::fmt::Display for OidcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "OIDC configuration error: {}", msg),
            Self::Discovery(msg) => write!(f, "OIDC discovery error: {}", msg),
            Self::TokenExchange(msg) => write!(f, "OIDC token exchange error: {}", msg),
            Self::TokenValidation(msg) => write!(f, "OIDC token validation error: {}", msg),
        }
    }
}

impl std::error::Error for OidcError {}
