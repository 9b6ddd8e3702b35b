//! Email OTP type carried by confirmation links

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpType {
    #[display("signup")]
    Signup,
    #[display("invite")]
    Invite,
    #[display("magiclink")]
    #[serde(rename = "magiclink")]
    MagicLink,
    #[display("recovery")]
    Recovery,
    #[display("email_change")]
    EmailChange,
    #[display("email")]
    Email,
}

impl FromStr for OtpType {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "signup" => Ok(OtpType::Signup),
            "invite" => Ok(OtpType::Invite),
            "magiclink" => Ok(OtpType::MagicLink),
            "recovery" => Ok(OtpType::Recovery),
            "email_change" => Ok(OtpType::EmailChange),
            "email" => Ok(OtpType::Email),
            other => Err(AuthError::UnsupportedOtpType(other.to_string())),
        }
    }
}
