//! The runtime seen by the resolver.

use std::hash::Hash;

/// Loaded assemblies and type lookup, supplied by the embedding application.
///
/// Implementations must be shareable across threads; [`TypeResolver::resolve_all`]
/// queries the host from a thread pool.
///
/// [`TypeResolver::resolve_all`]: crate::TypeResolver::resolve_all
pub trait TypeHost: Send + Sync {
    /// Handle to a loaded assembly.
    type Assembly: Clone + Eq + Hash + Send + Sync;
    /// Handle to a loaded type.
    type Type: Clone + Send + Sync;

    /// Currently loaded assemblies, in probing order.
    fn assemblies(&self) -> Vec<Self::Assembly>;

    /// Simple name of `assembly` (`mscorlib`, `System.Core`, ...).
    fn assembly_name(&self, assembly: &Self::Assembly) -> String;

    /// Simple name of the core library, probed first for namespaced types.
    fn core_assembly_name(&self) -> &str {
        "mscorlib"
    }

    /// Look up `name` (type name with generic arguments) in `assembly`.
    fn find_type(&self, assembly: &Self::Assembly, name: &str, ignore_case: bool) -> Option<Self::Type>;

    /// Look up a type of the global namespace by its simple name.
    fn find_global_type(
        &self,
        _assembly: &Self::Assembly,
        _simple_name: &str,
        _ignore_case: bool,
    ) -> Option<Self::Type> {
        None
    }
}
