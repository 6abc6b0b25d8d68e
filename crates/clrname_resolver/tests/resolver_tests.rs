//! Type resolver integration tests against an in-memory host.

use std::sync::Mutex;

use clrname_resolver::{ResolveError, ResolverOptions, TypeHost, TypeResolver};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Asm(String);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Ty {
    assembly: String,
    name: String,
}

/// Host with fixed assemblies that records every `find_type` call.
struct MockHost {
    assemblies: Vec<(String, Vec<String>)>,
    global: Vec<(String, String)>,
    lookups: Mutex<Vec<(String, String)>>,
}

impl MockHost {
    fn new(assemblies: &[(&str, &[&str])]) -> Self {
        Self {
            assemblies: assemblies
                .iter()
                .map(|(name, types)| (name.to_string(), types.iter().map(|t| t.to_string()).collect()))
                .collect(),
            global: Vec::new(),
            lookups: Mutex::new(Vec::new()),
        }
    }

    fn with_global(mut self, assembly: &str, simple_name: &str) -> Self {
        self.global.push((assembly.to_string(), simple_name.to_string()));
        self
    }

    fn lookups(&self) -> Vec<(String, String)> {
        self.lookups.lock().unwrap().clone()
    }

    fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

fn same(a: &str, b: &str, ignore_case: bool) -> bool {
    if ignore_case {
        a.to_lowercase() == b.to_lowercase()
    } else {
        a == b
    }
}

impl TypeHost for MockHost {
    type Assembly = Asm;
    type Type = Ty;

    fn assemblies(&self) -> Vec<Asm> {
        self.assemblies.iter().map(|(name, _)| Asm(name.clone())).collect()
    }

    fn assembly_name(&self, assembly: &Asm) -> String {
        assembly.0.clone()
    }

    fn find_type(&self, assembly: &Asm, name: &str, ignore_case: bool) -> Option<Ty> {
        self.lookups
            .lock()
            .unwrap()
            .push((assembly.0.clone(), name.to_string()));
        let (_, types) = self.assemblies.iter().find(|(n, _)| *n == assembly.0)?;
        types.iter().find(|t| same(t, name, ignore_case)).map(|t| Ty {
            assembly: assembly.0.clone(),
            name: t.clone(),
        })
    }

    fn find_global_type(&self, assembly: &Asm, simple_name: &str, ignore_case: bool) -> Option<Ty> {
        self.global
            .iter()
            .find(|(a, t)| *a == assembly.0 && same(t, simple_name, ignore_case))
            .map(|(a, t)| Ty {
                assembly: a.clone(),
                name: t.clone(),
            })
    }
}

fn ty(assembly: &str, name: &str) -> Ty {
    Ty {
        assembly: assembly.to_string(),
        name: name.to_string(),
    }
}

fn lookup(assembly: &str, name: &str) -> (String, String) {
    (assembly.to_string(), name.to_string())
}

// ============================================================================
// Assembly-qualified names
// ============================================================================

#[test]
fn test_resolves_in_named_assembly() {
    let resolver = TypeResolver::new(MockHost::new(&[
        ("mscorlib", &["System.Int32"]),
        ("Lib", &["Lib.Widget"]),
    ]));
    let found = resolver.resolve("Lib.Widget, Lib").unwrap();
    assert_eq!(found, Some(ty("Lib", "Lib.Widget")));
    assert_eq!(resolver.host().lookups(), vec![lookup("Lib", "Lib.Widget")]);
}

#[test]
fn test_named_assembly_not_loaded() {
    let resolver = TypeResolver::new(MockHost::new(&[("Lib", &["Lib.Widget"])]));
    assert_eq!(resolver.resolve("Lib.Widget, Missing").unwrap(), None);
    assert_eq!(resolver.host().lookup_count(), 0);
}

#[test]
fn test_generic_names_carry_their_arguments() {
    let name = "System.Collections.Generic.List`1[[System.Int32, mscorlib]]";
    let resolver = TypeResolver::new(MockHost::new(&[("mscorlib", &[name])]));
    let found = resolver.resolve(&format!("{name}, mscorlib")).unwrap();
    assert_eq!(found, Some(ty("mscorlib", name)));
    assert_eq!(resolver.host().lookups(), vec![lookup("mscorlib", name)]);
}

// ============================================================================
// Probing
// ============================================================================

#[test]
fn test_namespace_prefixes_are_probed_first() {
    let resolver = TypeResolver::new(MockHost::new(&[
        ("mscorlib", &[]),
        ("Other", &[]),
        ("Company.Product", &["Company.Product.Thing"]),
    ]));
    let found = resolver.resolve("Company.Product.Thing").unwrap();
    assert_eq!(found, Some(ty("Company.Product", "Company.Product.Thing")));
    assert_eq!(
        resolver.host().lookups(),
        vec![
            lookup("mscorlib", "Company.Product.Thing"),
            lookup("Company.Product", "Company.Product.Thing"),
        ]
    );
}

#[test]
fn test_remaining_assemblies_are_scanned() {
    let resolver = TypeResolver::new(MockHost::new(&[
        ("mscorlib", &[]),
        ("Company", &[]),
        ("Other", &["Company.Product.Thing"]),
    ]));
    let found = resolver.resolve("Company.Product.Thing").unwrap();
    assert_eq!(found, Some(ty("Other", "Company.Product.Thing")));
    assert_eq!(resolver.host().lookup_count(), 3);
    assert!(!resolver.is_known_absent("Company.Product.Thing", &Asm("mscorlib".into())));
}

#[test]
fn test_absence_is_remembered() {
    let resolver = TypeResolver::new(MockHost::new(&[("mscorlib", &[]), ("App", &[])]));
    assert_eq!(resolver.resolve("Company.Thing").unwrap(), None);
    assert_eq!(resolver.host().lookup_count(), 2);
    assert!(resolver.is_known_absent("Company.Thing", &Asm("mscorlib".into())));
    assert!(resolver.is_known_absent("Company.Thing", &Asm("App".into())));

    assert_eq!(resolver.resolve("Company.Thing").unwrap(), None);
    assert_eq!(resolver.host().lookup_count(), 2);
}

#[test]
fn test_global_types_skip_system_assemblies() {
    let host = MockHost::new(&[
        ("mscorlib", &[]),
        ("System", &[]),
        ("System.Core", &[]),
        ("App", &[]),
    ])
    .with_global("App", "Widget");
    let resolver = TypeResolver::new(host);

    let found = resolver.resolve("Widget").unwrap();
    assert_eq!(found, Some(ty("App", "Widget")));
    assert_eq!(resolver.host().lookups(), vec![lookup("App", "Widget")]);
}

// ============================================================================
// Caching and options
// ============================================================================

#[test]
fn test_results_are_cached() {
    let resolver = TypeResolver::new(MockHost::new(&[("Lib", &["Lib.Widget"])]));
    resolver.resolve("Lib.Widget, Lib").unwrap();
    resolver.resolve("Lib.Widget, Lib").unwrap();
    assert_eq!(resolver.host().lookup_count(), 1);
    assert_eq!(resolver.cached_type_count(), 1);

    resolver.clear_cache();
    assert_eq!(resolver.cached_type_count(), 0);
    resolver.resolve("Lib.Widget, Lib").unwrap();
    assert_eq!(resolver.host().lookup_count(), 2);
}

#[test]
fn test_ignore_case() {
    let options = ResolverOptions::default().with_ignore_case(true);
    let resolver = TypeResolver::with_options(MockHost::new(&[("Lib", &["Lib.Widget"])]), options);
    assert_eq!(
        resolver.resolve("lib.WIDGET, LIB").unwrap(),
        Some(ty("Lib", "Lib.Widget"))
    );
    assert!(resolver.resolve("LIB.widget, lib").unwrap().is_some());
    assert_eq!(resolver.host().lookup_count(), 1);

    let strict = TypeResolver::new(MockHost::new(&[("Lib", &["Lib.Widget"])]));
    assert_eq!(strict.resolve("lib.widget, lib").unwrap(), None);
}

#[test]
fn test_throw_on_error() {
    let options = ResolverOptions::default().with_throw_on_error(true);
    let resolver = TypeResolver::with_options(MockHost::new(&[("mscorlib", &[])]), options);

    let err = resolver.resolve("Missing.Type").unwrap_err();
    assert!(matches!(err, ResolveError::TypeNotFound(ref name) if name == "Missing.Type"));
    assert_eq!(err.to_string(), "Type 'Missing.Type' cannot be found");

    match resolver.resolve("Foo]").unwrap_err() {
        ResolveError::Parse(err) => assert_eq!(err.code(), 2002),
        other => panic!("unexpected error: {other}"),
    }

    let lenient = TypeResolver::new(MockHost::new(&[("mscorlib", &[])]));
    assert_eq!(lenient.resolve("Foo]").unwrap(), None);
    assert_eq!(lenient.resolve("Missing.Type").unwrap(), None);
}

#[test]
fn test_options_from_json() {
    let options: ResolverOptions = serde_json::from_str(r#"{"ignoreCase": true}"#).unwrap();
    assert!(options.ignore_case);
    assert!(!options.throw_on_error);
    assert_eq!(
        serde_json::to_string(&ResolverOptions::default()).unwrap(),
        r#"{"throwOnError":false,"ignoreCase":false}"#
    );
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_resolve_all_keeps_order() {
    let types: Vec<String> = (0..32).map(|n| format!("Lib.Type{n}")).collect();
    let type_refs: Vec<&str> = types.iter().map(String::as_str).collect();
    let resolver = TypeResolver::new(MockHost::new(&[("Lib", &type_refs)]));

    let names: Vec<String> = (0..64)
        .map(|n| {
            if n % 2 == 0 {
                format!("Lib.Type{}, Lib", n / 2)
            } else {
                format!("Lib.Missing{n}, Lib")
            }
        })
        .collect();
    let results = resolver.resolve_all(&names);
    assert_eq!(results.len(), names.len());
    for (n, result) in results.into_iter().enumerate() {
        let found = result.unwrap();
        if n % 2 == 0 {
            assert_eq!(found, Some(ty("Lib", &format!("Lib.Type{}", n / 2))));
        } else {
            assert_eq!(found, None);
        }
    }
}

#[test]
fn test_same_name_from_many_threads() {
    let resolver = TypeResolver::new(MockHost::new(&[("mscorlib", &[]), ("Lib", &["Lib.Widget"])]));
    let names = vec!["Lib.Widget"; 48];
    let results = resolver.resolve_all(&names);
    assert!(results
        .into_iter()
        .all(|result| result.unwrap() == Some(ty("Lib", "Lib.Widget"))));
    assert_eq!(resolver.cached_type_count(), 1);
}
