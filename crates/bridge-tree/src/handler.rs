//! Leaf handlers
//!
//! A [`Handler`] is a named, shareable `&C -> R` function. The name is only
//! used for rendering; dispatch never looks at it.

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

type HandlerFn<C, R> = dyn Fn(&C) -> R + Send + Sync;

/// Terminal action bound to a leaf
pub struct Handler<C, R> {
    name: Cow<'static, str>,
    func: Arc<HandlerFn<C, R>>,
}

impl<C, R> Handler<C, R> {
    /// Wrap a function, deriving the name from its type
    ///
    /// Function items render as their own name; closures render as
    /// `anonymous`.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&C) -> R + Send + Sync + 'static,
    {
        Self {
            name: Cow::Owned(derive_name(std::any::type_name::<F>())),
            func: Arc::new(func),
        }
    }

    /// Wrap a function under an explicit name
    pub fn named<F>(name: impl Into<Cow<'static, str>>, func: F) -> Self
    where
        F: Fn(&C) -> R + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Handler name used in tree previews
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the handler, converting a panic into a [`HandlerFault`]
    pub fn invoke(&self, ctx: &C) -> Result<R, HandlerFault> {
        panic::catch_unwind(AssertUnwindSafe(|| (self.func)(ctx))).map_err(|payload| HandlerFault {
            handler: self.name.to_string(),
            message: panic_message(payload.as_ref()),
        })
    }
}

impl<C, R> Clone for Handler<C, R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<C, R> fmt::Debug for Handler<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.name).finish()
    }
}

/// Marker for plain functions passed where a handler is expected
#[derive(Debug)]
pub enum FnMarker {}

/// Marker for ready-made [`Handler`] values
#[derive(Debug)]
pub enum HandlerMarker {}

/// Conversion into a [`Handler`]
///
/// Implemented for closures / function items and for `Handler` itself; the
/// marker parameter keeps the two impls apart and is always inferred.
pub trait IntoHandler<C, R, M> {
    /// Perform the conversion
    fn into_handler(self) -> Handler<C, R>;
}

impl<C, R, F> IntoHandler<C, R, FnMarker> for F
where
    F: Fn(&C) -> R + Send + Sync + 'static,
{
    fn into_handler(self) -> Handler<C, R> {
        Handler::new(self)
    }
}

impl<C, R> IntoHandler<C, R, HandlerMarker> for Handler<C, R> {
    fn into_handler(self) -> Handler<C, R> {
        self
    }
}

/// A handler panicked while running
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("handler '{handler}' failed: {message}")]
pub struct HandlerFault {
    /// Name of the faulting handler
    pub handler: String,
    /// Panic description
    pub message: String,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn derive_name(type_name: &str) -> String {
    if type_name.contains("{{closure}}") {
        return "anonymous".to_string();
    }
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base).to_string()
}
