//! Type-state markers for the builder pattern
//!
//! The builder carries its required parts inside these markers, so `build()`
//! only exists once both the URL and the router/handler pair are present.

use crate::traits::{MessageHandler, MessageRouter};

/// Marker trait for URL state
pub trait UrlState {}

/// URL has not been set
pub struct NoUrl;
impl UrlState for NoUrl {}

/// URL has been set
pub struct HasUrl(pub(crate) String);
impl UrlState for HasUrl {}

/// Marker trait for Router state
pub trait RouterState {}

/// Router has not been set
pub struct NoRouter;
impl RouterState for NoRouter {}

/// Router and handler have been set
pub struct HasRouter<R, H> {
    pub(crate) router: R,
    pub(crate) handler: H,
}

impl<R, H> RouterState for HasRouter<R, H>
where
    R: MessageRouter,
    H: MessageHandler<R::Message>,
{
}
