//! Caller-supplied discriminator functions and their safe invocation.

use crate::errors::Violation;
use crate::request::HttpRequest;
use crate::types::Field;
use async_trait::async_trait;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Error type discriminators may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What a discriminator decided for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discriminant {
    /// Validate the field against the variant with this id.
    Variant(String),
    /// No constraint applies to this field for this request.
    Unconstrained,
}

impl Discriminant {
    /// Variant id, or `None` when unconstrained.
    pub fn into_id(self) -> Option<String> {
        match self {
            Discriminant::Variant(id) => Some(id),
            Discriminant::Unconstrained => None,
        }
    }
}

impl From<String> for Discriminant {
    fn from(id: String) -> Self {
        Discriminant::Variant(id)
    }
}

impl From<&str> for Discriminant {
    fn from(id: &str) -> Self {
        Discriminant::Variant(id.to_string())
    }
}

impl<T: Into<Discriminant>> From<Option<T>> for Discriminant {
    fn from(id: Option<T>) -> Self {
        id.map_or(Discriminant::Unconstrained, Into::into)
    }
}

impl From<()> for Discriminant {
    fn from((): ()) -> Self {
        Discriminant::Unconstrained
    }
}

/// Only a JSON string selects a variant; any other value leaves the field unconstrained.
impl From<serde_json::Value> for Discriminant {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(id) => Discriminant::Variant(id),
            _ => Discriminant::Unconstrained,
        }
    }
}

/// Inspects a request and picks the schema variant that applies to one field.
#[async_trait]
pub trait Discriminator: Send + Sync {
    /// Decide which variant applies. Errors and panics become a rejection of the field.
    async fn discriminate(&self, request: &HttpRequest) -> Result<Discriminant, BoxError>;
}

/// Adapter turning a plain closure into a [`Discriminator`].
pub struct FnDiscriminator<F>(F);

/// Wrap a synchronous closure. It may return anything convertible into a
/// [`Discriminant`] and any error convertible into [`BoxError`].
pub fn discriminator_fn<F, D, E>(f: F) -> FnDiscriminator<F>
where
    F: Fn(&HttpRequest) -> Result<D, E> + Send + Sync,
    D: Into<Discriminant> + 'static,
    E: Into<BoxError> + 'static,
{
    FnDiscriminator(f)
}

#[async_trait]
impl<F, D, E> Discriminator for FnDiscriminator<F>
where
    F: Fn(&HttpRequest) -> Result<D, E> + Send + Sync,
    D: Into<Discriminant> + 'static,
    E: Into<BoxError> + 'static,
{
    async fn discriminate(&self, request: &HttpRequest) -> Result<Discriminant, BoxError> {
        (self.0)(request).map(Into::into).map_err(Into::into)
    }
}

#[async_trait]
impl<T: Discriminator + ?Sized> Discriminator for Arc<T> {
    async fn discriminate(&self, request: &HttpRequest) -> Result<Discriminant, BoxError> {
        (**self).discriminate(request).await
    }
}

/// Call a field's discriminator, turning errors and panics into a
/// [`Violation::ConstraintFunction`] for that field.
///
/// Returns `Ok(None)` when the field is unconstrained for this request.
pub async fn invoke(
    field: Field,
    discriminator: &dyn Discriminator,
    request: &HttpRequest,
) -> Result<Option<String>, Violation> {
    let outcome = AssertUnwindSafe(discriminator.discriminate(request))
        .catch_unwind()
        .await;

    match outcome {
        Ok(Ok(discriminant)) => Ok(discriminant.into_id()),
        Ok(Err(err)) => Err(Violation::ConstraintFunction {
            field,
            message: err.to_string(),
        }),
        Err(payload) => Err(Violation::ConstraintFunction {
            field,
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "discriminator panicked".to_string()
    }
}
