//! HTTP DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::application::{ConfirmOtpInput, ExchangeCodeInput, SignInInput, SignUpInput};
use crate::domain::value_object::OAuthProvider;

// ============================================================================
// Callbacks
// ============================================================================

/// `GET /auth/callback` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub redirect_to: Option<String>,
}

impl From<CallbackQuery> for ExchangeCodeInput {
    fn from(query: CallbackQuery) -> Self {
        Self {
            code: query.code,
            redirect_to: query.redirect_to,
        }
    }
}

/// `GET /auth/confirm` query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmQuery {
    pub token_hash: Option<String>,
    #[serde(rename = "type")]
    pub otp_type: Option<String>,
    pub redirect_to: Option<String>,
}

impl From<ConfirmQuery> for ConfirmOtpInput {
    fn from(query: ConfirmQuery) -> Self {
        Self {
            token_hash: query.token_hash,
            otp_type: query.otp_type,
            redirect_to: query.redirect_to,
        }
    }
}

// ============================================================================
// Forms
// ============================================================================

/// Login form
#[derive(Clone, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl From<LoginForm> for SignInInput {
    fn from(form: LoginForm) -> Self {
        Self {
            email: form.email,
            password: form.password,
        }
    }
}

/// Registration form
///
/// `terms` is a checkbox: present (any value) when ticked.
#[derive(Clone, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub display_name: String,
    pub terms: Option<String>,
}

impl From<RegistrationForm> for SignUpInput {
    fn from(form: RegistrationForm) -> Self {
        let terms_accepted = form
            .terms
            .as_deref()
            .is_some_and(|v| !matches!(v, "" | "false" | "off" | "0"));

        Self {
            email: form.email,
            password: form.password,
            confirm_password: form.confirm_password,
            first_name: form.first_name,
            last_name: form.last_name,
            display_name: form.display_name,
            terms_accepted,
        }
    }
}

/// Social login form
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthForm {
    #[serde(default)]
    pub provider: String,
}

/// Forgot password form
#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub email: String,
}

/// Flash values carried back to form pages
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlashQuery {
    pub error: Option<String>,
    pub message: Option<String>,
}

// ============================================================================
// Pages
// ============================================================================

/// Form field description
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub name: &'static str,
    pub kind: &'static str,
    pub required: bool,
}

impl FieldView {
    pub const fn new(name: &'static str, kind: &'static str, required: bool) -> Self {
        Self {
            name,
            kind,
            required,
        }
    }
}

/// Auth page descriptor rendered by the frontend
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPageView {
    pub page: &'static str,
    pub locale: String,
    pub path: String,
    /// Form target; `None` for pages without a form
    pub action: Option<&'static str>,
    pub fields: Vec<FieldView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub social_providers: Vec<OAuthProvider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
