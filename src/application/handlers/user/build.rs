//! Typed construction of user commands from dispatch requests.

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::application::gateway::{BuildCommand, DispatchRequest};
use crate::bus::CallContext;
use crate::domain::foundation::{UserId, ValidationError};
use crate::domain::user::{
    ChangeEmailAddress, CommandKind, EmailAddress, RegisterWithEmail, RegisterWithFacebook,
    RegisterWithGoogle, UserCommand,
};

#[derive(Deserialize)]
struct EmailPayload {
    email: String,
}

#[derive(Deserialize)]
struct GooglePayload {
    email: String,
    google_id: String,
    access_token: String,
}

#[derive(Deserialize)]
struct FacebookPayload {
    email: String,
    facebook_id: String,
    access_token: String,
}

#[derive(Deserialize)]
struct ChangeEmailPayload {
    /// Defaults to the caller's own user ID.
    id: Option<String>,
    email: String,
}

impl BuildCommand for UserCommand {
    fn build(ctx: &CallContext, request: &DispatchRequest) -> Result<Self, ValidationError> {
        let kind = CommandKind::parse(&request.command)
            .ok_or_else(|| ValidationError::unknown_command(&request.command))?;

        let command: UserCommand = match kind {
            CommandKind::RegisterWithEmail => {
                let payload: EmailPayload = decode(request)?;
                RegisterWithEmail {
                    email: EmailAddress::new(payload.email)?,
                }
                .into()
            }
            CommandKind::RegisterWithGoogle => {
                let payload: GooglePayload = decode(request)?;
                RegisterWithGoogle {
                    email: EmailAddress::new(payload.email)?,
                    google_id: required("google_id", payload.google_id)?,
                    access_token: secret("access_token", payload.access_token)?,
                }
                .into()
            }
            CommandKind::RegisterWithFacebook => {
                let payload: FacebookPayload = decode(request)?;
                RegisterWithFacebook {
                    email: EmailAddress::new(payload.email)?,
                    facebook_id: required("facebook_id", payload.facebook_id)?,
                    access_token: secret("access_token", payload.access_token)?,
                }
                .into()
            }
            CommandKind::ChangeEmailAddress => {
                let payload: ChangeEmailPayload = decode(request)?;
                let id = match payload.id {
                    Some(raw) => raw.parse::<UserId>()?,
                    None => ctx
                        .identity()
                        .map(|identity| identity.user_id)
                        .ok_or_else(|| ValidationError::empty_field("id"))?,
                };
                ChangeEmailAddress {
                    id,
                    email: EmailAddress::new(payload.email)?,
                }
                .into()
            }
        };

        Ok(command)
    }
}

fn decode<T: DeserializeOwned>(request: &DispatchRequest) -> Result<T, ValidationError> {
    T::deserialize(&request.payload)
        .map_err(|e| ValidationError::invalid_format("payload", e.to_string()))
}

fn required(field: &str, value: String) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(value.to_string())
}

fn secret(field: &str, value: String) -> Result<SecretString, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(SecretString::new(value))
}
