//! Dispatch gateway - the entry point transports call with raw requests.
//!
//! The gateway turns a [`DispatchRequest`] into a typed command and hands
//! it to the [`CommandBus`]. A request that cannot be built is rejected
//! with a validation error and never reaches the bus.

use serde::Deserialize;
use std::fmt;

use crate::bus::{CallContext, CommandBus, DispatchError};
use crate::domain::foundation::{Message, MessageKind, ValidationError};

/// A command as received from a transport, before it is typed.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchRequest {
    /// Wire name of the command kind, e.g. `register-with-email`.
    pub command: String,

    /// Command fields as JSON. Missing means `null`.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl DispatchRequest {
    pub fn new(command: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            command: command.into(),
            payload,
        }
    }
}

/// Builds a typed command from a raw request.
///
/// Implemented by each command family. The context is available so a
/// builder can fill fields from the caller's identity.
pub trait BuildCommand: Message + Sized {
    fn build(ctx: &CallContext, request: &DispatchRequest) -> Result<Self, ValidationError>;
}

/// Progress of a single dispatch, traced for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Received,
    Building,
    BuildFailed,
    Built,
    Dispatched,
    Completed,
    Cancelled,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DispatchState::Received => "received",
            DispatchState::Building => "building",
            DispatchState::BuildFailed => "build_failed",
            DispatchState::Built => "built",
            DispatchState::Dispatched => "dispatched",
            DispatchState::Completed => "completed",
            DispatchState::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Builds commands and sends them through the command bus.
pub struct DispatchGateway<C: Message> {
    bus: CommandBus<C>,
}

impl<C: Message> Clone for DispatchGateway<C> {
    fn clone(&self) -> Self {
        Self {
            bus: self.bus.clone(),
        }
    }
}

impl<C: BuildCommand> DispatchGateway<C> {
    pub fn new(bus: CommandBus<C>) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &CommandBus<C> {
        &self.bus
    }

    /// Builds and dispatches one command, returning its single outcome.
    pub async fn dispatch(
        &self,
        ctx: &CallContext,
        request: DispatchRequest,
    ) -> Result<(), DispatchError> {
        let correlation_id = ctx.correlation_id();
        let trace = |state: DispatchState| {
            tracing::debug!(
                command = %request.command,
                correlation_id = %correlation_id,
                state = %state,
                "Dispatch state"
            );
        };

        trace(DispatchState::Received);
        trace(DispatchState::Building);

        let command = match C::build(ctx, &request) {
            Ok(command) => command,
            Err(err) => {
                trace(DispatchState::BuildFailed);
                tracing::info!(
                    command = %request.command,
                    correlation_id = %correlation_id,
                    error = %err,
                    "Rejected invalid command"
                );
                return Err(err.into());
            }
        };
        trace(DispatchState::Built);

        let kind = command.kind();
        trace(DispatchState::Dispatched);
        let result = self.bus.publish(ctx, command).await;

        match &result {
            Err(DispatchError::Cancelled(reason)) => {
                trace(DispatchState::Cancelled);
                tracing::info!(
                    command = kind.name(),
                    correlation_id = %correlation_id,
                    %reason,
                    "Dispatch abandoned"
                );
            }
            _ => trace(DispatchState::Completed),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{CancellationError, CommandBusBuilder};
    use crate::domain::foundation::DomainError;
    use crate::ports::CommandHandler;
    use async_trait::async_trait;
    use serde_json::json;
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct EchoKind;

    impl fmt::Display for EchoKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    impl MessageKind for EchoKind {
        fn name(&self) -> &'static str {
            "echo"
        }
    }

    #[derive(Debug)]
    struct Echo {
        text: String,
    }

    impl Message for Echo {
        type Kind = EchoKind;

        fn kind(&self) -> EchoKind {
            EchoKind
        }
    }

    impl BuildCommand for Echo {
        fn build(_ctx: &CallContext, request: &DispatchRequest) -> Result<Self, ValidationError> {
            if request.command != "echo" {
                return Err(ValidationError::unknown_command(&request.command));
            }
            let text = request
                .payload
                .get("text")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| ValidationError::empty_field("text"))?;
            Ok(Echo {
                text: text.to_string(),
            })
        }
    }

    #[derive(Default)]
    struct CountingHandler {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CommandHandler<Echo> for CountingHandler {
        async fn handle(&self, _ctx: CallContext, command: Echo) -> Result<(), DomainError> {
            assert!(!command.text.is_empty());
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "CountingHandler"
        }
    }

    fn gateway() -> (DispatchGateway<Echo>, Arc<CountingHandler>) {
        let handler = Arc::new(CountingHandler::default());
        let bus = CommandBusBuilder::<Echo>::new()
            .subscribe(EchoKind, handler.clone())
            .unwrap()
            .build();
        (DispatchGateway::new(bus), handler)
    }

    #[tokio::test]
    async fn valid_request_is_acknowledged() {
        let (gateway, handler) = gateway();

        gateway
            .dispatch(
                &CallContext::background(),
                DispatchRequest::new("echo", json!({ "text": "hi" })),
            )
            .await
            .unwrap();

        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn build_failure_never_reaches_the_bus() {
        let (gateway, handler) = gateway();
        let ctx = CallContext::background();

        let missing = gateway
            .dispatch(&ctx, DispatchRequest::new("echo", json!({})))
            .await;
        assert!(matches!(
            missing,
            Err(DispatchError::Validation(ValidationError::EmptyField { ref field })) if field == "text"
        ));

        let unknown = gateway
            .dispatch(&ctx, DispatchRequest::new("shout", json!({ "text": "hi" })))
            .await;
        assert!(matches!(
            unknown,
            Err(DispatchError::Validation(ValidationError::UnknownCommand(ref name))) if name == "shout"
        ));

        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancelled_context_is_reported() {
        let (gateway, handler) = gateway();
        let (ctx, cancel) = CallContext::background().with_cancel();
        cancel.cancel();

        let result = gateway
            .dispatch(&ctx, DispatchRequest::new("echo", json!({ "text": "hi" })))
            .await;

        assert!(matches!(
            result,
            Err(DispatchError::Cancelled(CancellationError::Cancelled))
        ));
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn request_deserializes_without_payload() {
        let request: DispatchRequest = serde_json::from_str(r#"{"command":"echo"}"#).unwrap();
        assert_eq!(request.command, "echo");
        assert!(request.payload.is_null());
    }

    #[test]
    fn states_display_in_snake_case() {
        assert_eq!(DispatchState::BuildFailed.to_string(), "build_failed");
        assert_eq!(DispatchState::Completed.to_string(), "completed");
    }
}
