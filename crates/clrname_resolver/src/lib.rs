//! clrname_resolver: Resolve parsed type names to loaded types.
//!
//! The runtime is abstracted behind [`TypeHost`]; [`TypeResolver`] adds the
//! assembly probing heuristics and concurrent result caches.

mod error;
mod host;
mod options;
mod resolver;

pub use error::{ResolveError, ResolveResult};
pub use host::TypeHost;
pub use options::ResolverOptions;
pub use resolver::TypeResolver;
