//! Type resolution over a [`TypeHost`].
//!
//! A name that carries an assembly is looked up in that assembly only.
//! Otherwise assemblies are probed: the core library and every prefix of the
//! namespace first, then everything else. Assemblies found not to contain a
//! name are remembered and skipped by later lookups of the same name.

use clrname_parser::{parse, ScopeRef};
use dashmap::{DashMap, DashSet};
use indexmap::IndexMap;
use rayon::prelude::*;
use rustc_hash::{FxBuildHasher, FxHashSet};
use tracing::{debug, trace};

use crate::error::{ResolveError, ResolveResult};
use crate::host::TypeHost;
use crate::options::ResolverOptions;

/// Rendered name, case-folded when ignoring case, plus the case mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    name: String,
    ignore_case: bool,
}

impl CacheKey {
    fn new(name: &str, ignore_case: bool) -> Self {
        Self {
            name: fold(name, ignore_case),
            ignore_case,
        }
    }
}

/// Resolves type names against the assemblies of a [`TypeHost`].
///
/// Safe to share between threads; both caches are concurrent and start empty.
pub struct TypeResolver<H: TypeHost> {
    host: H,
    options: ResolverOptions,
    /// Resolved types.
    types: DashMap<CacheKey, H::Type, FxBuildHasher>,
    /// Assemblies known not to contain a name.
    absence: DashMap<CacheKey, DashSet<H::Assembly>, FxBuildHasher>,
}

impl<H: TypeHost> TypeResolver<H> {
    pub fn new(host: H) -> Self {
        Self::with_options(host, ResolverOptions::default())
    }

    pub fn with_options(host: H, options: ResolverOptions) -> Self {
        trace!(?options, "TypeResolver::new");
        Self {
            host,
            options,
            types: DashMap::with_hasher(FxBuildHasher),
            absence: DashMap::with_hasher(FxBuildHasher),
        }
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Parse `text` and resolve its root type.
    ///
    /// Without `throw_on_error`, unparsable and unknown names both yield
    /// `Ok(None)`.
    pub fn resolve(&self, text: &str) -> ResolveResult<Option<H::Type>> {
        let parsed = match parse(text) {
            Ok(parsed) => parsed,
            Err(err) if self.options.throw_on_error => return Err(err.into()),
            Err(err) => {
                debug!(text, code = err.code(), "unparsable type name");
                return Ok(None);
            }
        };

        let found = self.resolve_scope(parsed.root());
        if found.is_none() && self.options.throw_on_error {
            return Err(ResolveError::TypeNotFound(text.to_string()));
        }
        Ok(found)
    }

    /// Resolve many names in parallel. Results keep the order of `names`.
    pub fn resolve_all<S>(&self, names: &[S]) -> Vec<ResolveResult<Option<H::Type>>>
    where
        S: AsRef<str> + Sync,
    {
        names.par_iter().map(|name| self.resolve(name.as_ref())).collect()
    }

    /// Resolve an already parsed scope.
    pub fn resolve_scope(&self, scope: ScopeRef<'_>) -> Option<H::Type> {
        let key = CacheKey::new(scope.assembly_qualified_name(), self.options.ignore_case);
        if let Some(cached) = self.types.get(&key) {
            trace!(name = %key.name, "type cache hit");
            return Some(cached.value().clone());
        }

        let name = scope.full_name();
        let found = match scope.assembly_name() {
            Some(assembly) => self.find_in_assembly(assembly, name),
            None => self.probe(scope.name(), name, &key),
        };

        match &found {
            Some(ty) => {
                self.types.insert(key, ty.clone());
            }
            None => debug!(type_name = name, "type not found"),
        }
        found
    }

    /// Drop every cached result.
    pub fn clear_cache(&self) {
        self.types.clear();
        self.absence.clear();
    }

    /// Number of resolved types held in the cache.
    pub fn cached_type_count(&self) -> usize {
        self.types.len()
    }

    /// Whether `assembly` is remembered as not containing `name` (a
    /// fully-qualified rendering).
    pub fn is_known_absent(&self, name: &str, assembly: &H::Assembly) -> bool {
        self.absence
            .get(&CacheKey::new(name, self.options.ignore_case))
            .is_some_and(|set| set.contains(assembly))
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    fn find_in_assembly(&self, assembly: &str, name: &str) -> Option<H::Type> {
        let ignore_case = self.options.ignore_case;
        let assemblies = self.assembly_index(|_| true);
        let Some(handle) = assemblies.get(&fold(assembly, ignore_case)) else {
            debug!(assembly, "assembly not loaded");
            return None;
        };
        self.host.find_type(handle, name, ignore_case)
    }

    /// Search the loaded assemblies for a name without an assembly.
    fn probe(&self, type_name: &str, name: &str, key: &CacheKey) -> Option<H::Type> {
        let ignore_case = self.options.ignore_case;
        let known_absent: FxHashSet<H::Assembly> = self
            .absence
            .get(key)
            .map(|set| set.iter().map(|assembly| assembly.key().clone()).collect())
            .unwrap_or_default();

        let mut assemblies = self.assembly_index(|assembly| !known_absent.contains(assembly));
        if assemblies.is_empty() {
            trace!(type_name = name, "no candidate assemblies left");
            return None;
        }

        let (namespace, simple_name) = split_namespace(type_name);
        let mut absent = Vec::new();

        match namespace {
            Some(namespace) => {
                let candidates = candidate_assemblies(self.host.core_assembly_name(), namespace, ignore_case);
                for candidate in &candidates {
                    let Some(assembly) = assemblies.get(candidate) else {
                        continue;
                    };
                    if let Some(ty) = self.host.find_type(assembly, name, ignore_case) {
                        trace!(type_name = name, assembly = %candidate, "found by namespace");
                        self.absence.remove(key);
                        return Some(ty);
                    }
                }
                for candidate in &candidates {
                    absent.extend(assemblies.shift_remove(candidate));
                }
            }
            None => {
                let core = self.host.core_assembly_name();
                assemblies.retain(|assembly_name, assembly| {
                    let system = is_system_assembly(assembly_name, core);
                    if system {
                        absent.push(assembly.clone());
                    }
                    !system
                });
            }
        }

        for (assembly_name, assembly) in &assemblies {
            let found = self.host.find_type(assembly, name, ignore_case).or_else(|| {
                namespace
                    .is_none()
                    .then(|| self.host.find_global_type(assembly, simple_name, ignore_case))
                    .flatten()
            });
            if let Some(ty) = found {
                trace!(type_name = name, assembly = %assembly_name, "found by scan");
                self.absence.remove(key);
                return Some(ty);
            }
        }

        absent.extend(assemblies.into_values());
        self.record_absent(key, absent);
        None
    }

    /// Loaded assemblies by (folded) simple name, in host order. The first of
    /// several same-named assemblies wins.
    fn assembly_index(&self, keep: impl Fn(&H::Assembly) -> bool) -> IndexMap<String, H::Assembly> {
        let mut index = IndexMap::new();
        for assembly in self.host.assemblies() {
            if keep(&assembly) {
                let name = fold(&self.host.assembly_name(&assembly), self.options.ignore_case);
                index.entry(name).or_insert(assembly);
            }
        }
        index
    }

    fn record_absent(&self, key: &CacheKey, assemblies: Vec<H::Assembly>) {
        if assemblies.is_empty() {
            return;
        }
        trace!(name = %key.name, count = assemblies.len(), "recording absence");
        let set = self.absence.entry(key.clone()).or_default();
        for assembly in assemblies {
            set.insert(assembly);
        }
    }
}

fn fold(name: &str, ignore_case: bool) -> String {
    if ignore_case {
        name.to_lowercase()
    } else {
        name.to_string()
    }
}

/// Split `Ns.Sub.Type` into `(Some("Ns.Sub"), "Type")`.
fn split_namespace(type_name: &str) -> (Option<&str>, &str) {
    match type_name.rfind('.') {
        Some(dot) if dot > 0 => (Some(&type_name[..dot]), &type_name[dot + 1..]),
        Some(dot) => (None, &type_name[dot + 1..]),
        None => (None, type_name),
    }
}

/// The core library, then `A`, `A.B`, ... for namespace `A.B`.
fn candidate_assemblies(core: &str, namespace: &str, ignore_case: bool) -> Vec<String> {
    let mut candidates = vec![fold(core, ignore_case)];
    let mut prefix = String::new();
    for part in namespace.split('.') {
        if !prefix.is_empty() {
            prefix.push('.');
        }
        prefix.push_str(part);
        candidates.push(fold(&prefix, ignore_case));
    }
    candidates
}

fn is_system_assembly(name: &str, core: &str) -> bool {
    name.eq_ignore_ascii_case(core)
        || name.eq_ignore_ascii_case("system")
        || name.get(..7).is_some_and(|prefix| prefix.eq_ignore_ascii_case("system."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_namespace() {
        assert_eq!(split_namespace("System.Int32"), (Some("System"), "Int32"));
        assert_eq!(split_namespace("A.B.C`1"), (Some("A.B"), "C`1"));
        assert_eq!(split_namespace("Widget"), (None, "Widget"));
        assert_eq!(split_namespace(".Widget"), (None, "Widget"));
    }

    #[test]
    fn test_candidate_assemblies() {
        assert_eq!(
            candidate_assemblies("mscorlib", "Company.Product.Data", false),
            vec!["mscorlib", "Company", "Company.Product", "Company.Product.Data"]
        );
        assert_eq!(
            candidate_assemblies("MsCorLib", "Company.Data", true),
            vec!["mscorlib", "company", "company.data"]
        );
    }

    #[test]
    fn test_system_assemblies() {
        assert!(is_system_assembly("mscorlib", "mscorlib"));
        assert!(is_system_assembly("System", "mscorlib"));
        assert!(is_system_assembly("system.core", "mscorlib"));
        assert!(is_system_assembly("System.Xml.Linq", "mscorlib"));
        assert!(!is_system_assembly("Systemic", "mscorlib"));
        assert!(!is_system_assembly("App", "mscorlib"));
    }

    #[test]
    fn test_cache_key_folds_only_when_ignoring_case() {
        assert_eq!(CacheKey::new("Foo.Bar", false).name, "Foo.Bar");
        assert_eq!(CacheKey::new("Foo.Bar", true).name, "foo.bar");
        assert_ne!(CacheKey::new("foo.bar", false), CacheKey::new("foo.bar", true));
    }
}
