//! CLI command implementations.

pub(crate) mod authorize;
pub(crate) mod convert;
pub(crate) mod fetch;

pub(crate) use authorize::AuthorizeArgs;
pub(crate) use convert::ConvertArgs;
pub(crate) use fetch::FetchArgs;
