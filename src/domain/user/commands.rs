//! Commands accepted by the user module.

use secrecy::SecretString;
use std::fmt;

use crate::domain::foundation::{Message, MessageKind, UserId};

use super::EmailAddress;

/// Routing tag for [`UserCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    RegisterWithEmail,
    RegisterWithGoogle,
    RegisterWithFacebook,
    ChangeEmailAddress,
}

impl CommandKind {
    /// Every command kind, in declaration order.
    pub const ALL: [CommandKind; 4] = [
        CommandKind::RegisterWithEmail,
        CommandKind::RegisterWithGoogle,
        CommandKind::RegisterWithFacebook,
        CommandKind::ChangeEmailAddress,
    ];

    /// Looks up a kind by its wire name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl MessageKind for CommandKind {
    fn name(&self) -> &'static str {
        match self {
            CommandKind::RegisterWithEmail => "register-with-email",
            CommandKind::RegisterWithGoogle => "register-with-google",
            CommandKind::RegisterWithFacebook => "register-with-facebook",
            CommandKind::ChangeEmailAddress => "change-email-address",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Register a new user with an email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterWithEmail {
    pub email: EmailAddress,
}

/// Register a new user through Google sign-in.
#[derive(Clone)]
pub struct RegisterWithGoogle {
    pub email: EmailAddress,
    pub google_id: String,
    pub access_token: SecretString,
}

/// Register a new user through Facebook sign-in.
#[derive(Clone)]
pub struct RegisterWithFacebook {
    pub email: EmailAddress,
    pub facebook_id: String,
    pub access_token: SecretString,
}

/// Change the email address of an existing user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEmailAddress {
    pub id: UserId,
    pub email: EmailAddress,
}

impl fmt::Debug for RegisterWithGoogle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterWithGoogle")
            .field("email", &self.email)
            .field("google_id", &self.google_id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for RegisterWithFacebook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterWithFacebook")
            .field("email", &self.email)
            .field("facebook_id", &self.facebook_id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Closed set of commands handled by the user module.
#[derive(Debug, Clone)]
pub enum UserCommand {
    RegisterWithEmail(RegisterWithEmail),
    RegisterWithGoogle(RegisterWithGoogle),
    RegisterWithFacebook(RegisterWithFacebook),
    ChangeEmailAddress(ChangeEmailAddress),
}

impl Message for UserCommand {
    type Kind = CommandKind;

    fn kind(&self) -> CommandKind {
        match self {
            UserCommand::RegisterWithEmail(_) => CommandKind::RegisterWithEmail,
            UserCommand::RegisterWithGoogle(_) => CommandKind::RegisterWithGoogle,
            UserCommand::RegisterWithFacebook(_) => CommandKind::RegisterWithFacebook,
            UserCommand::ChangeEmailAddress(_) => CommandKind::ChangeEmailAddress,
        }
    }
}

impl From<RegisterWithEmail> for UserCommand {
    fn from(cmd: RegisterWithEmail) -> Self {
        UserCommand::RegisterWithEmail(cmd)
    }
}

impl From<RegisterWithGoogle> for UserCommand {
    fn from(cmd: RegisterWithGoogle) -> Self {
        UserCommand::RegisterWithGoogle(cmd)
    }
}

impl From<RegisterWithFacebook> for UserCommand {
    fn from(cmd: RegisterWithFacebook) -> Self {
        UserCommand::RegisterWithFacebook(cmd)
    }
}

impl From<ChangeEmailAddress> for UserCommand {
    fn from(cmd: ChangeEmailAddress) -> Self {
        UserCommand::ChangeEmailAddress(cmd)
    }
}
