//! Property tests: generated type names survive parse and re-render.

use clrname_parser::parse;
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Identity {
    assembly: String,
    properties: Option<(String, String, String)>,
}

impl Identity {
    fn render(&self) -> String {
        match &self.properties {
            None => self.assembly.clone(),
            Some((version, culture, token)) => format!(
                "{}, Version={version}, Culture={culture}, PublicKeyToken={token}",
                self.assembly
            ),
        }
    }
}

#[derive(Debug, Clone)]
enum Shape {
    Simple { name: String, array: String },
    Generic { name: String, args: Vec<(Shape, Option<Identity>)> },
}

impl Shape {
    fn short(&self) -> String {
        match self {
            Shape::Simple { name, array } => format!("{name}{array}"),
            Shape::Generic { name, args } => {
                let args: Vec<_> = args.iter().map(|(arg, _)| arg.short()).collect();
                format!("{name}`{}[{}]", args.len(), args.join(","))
            }
        }
    }

    fn full(&self) -> String {
        match self {
            Shape::Simple { name, array } => format!("{name}{array}"),
            Shape::Generic { name, args } => {
                let args: Vec<_> = args
                    .iter()
                    .map(|(arg, identity)| match identity {
                        Some(identity) => format!("[{}, {}]", arg.full(), identity.render()),
                        None => arg.full(),
                    })
                    .collect();
                format!("{name}`{}[{}]", args.len(), args.join(","))
            }
        }
    }

    fn scope_count(&self) -> usize {
        match self {
            Shape::Simple { .. } => 1,
            Shape::Generic { args, .. } => 1 + args.iter().map(|(arg, _)| arg.scope_count()).sum::<usize>(),
        }
    }
}

fn type_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z0-9_]{0,5}(\\.[A-Z][A-Za-z0-9_]{0,5}){0,2}"
}

fn array_suffix() -> impl Strategy<Value = String> {
    "(\\[,{0,2}\\]){0,2}"
}

fn identity() -> impl Strategy<Value = Identity> {
    let version = "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}";
    let culture = prop_oneof![Just("neutral"), Just("en-US"), Just("de")].prop_map(String::from);
    let token = prop_oneof![Just("null".to_string()), "[0-9a-f]{16}"];
    (
        "[a-z][a-z0-9]{0,5}(\\.[a-z][a-z0-9]{0,5})?",
        prop::option::of((version, culture, token)),
    )
        .prop_map(|(assembly, properties)| Identity { assembly, properties })
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = (type_name(), array_suffix()).prop_map(|(name, array)| Shape::Simple { name, array });
    leaf.prop_recursive(4, 24, 3, |inner| {
        (
            type_name(),
            prop::collection::vec((inner, prop::option::of(identity())), 1..=3),
        )
            .prop_map(|(name, args)| Shape::Generic { name, args })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn assembly_qualified_round_trip(shape in shape(), root in prop::option::of(identity())) {
        let text = match &root {
            Some(identity) => format!("{}, {}", shape.full(), identity.render()),
            None => shape.full(),
        };
        let result = parse(&text).unwrap();
        prop_assert_eq!(result.root().assembly_qualified_name(), text.as_str());
        prop_assert_eq!(result.root().full_name(), shape.full());
        prop_assert_eq!(result.root().short_name(), shape.short());
        prop_assert_eq!(result.tree().node_count(), shape.scope_count());
    }

    #[test]
    fn short_name_round_trip(shape in shape()) {
        let text = shape.short();
        let result = parse(&text).unwrap();
        prop_assert_eq!(result.root().short_name(), text.as_str());
        prop_assert_eq!(result.root().assembly_qualified_name(), text.as_str());
    }

    #[test]
    fn rendering_is_stable(shape in shape(), root in prop::option::of(identity())) {
        let text = match &root {
            Some(identity) => format!("{}, {}", shape.full(), identity.render()),
            None => shape.full(),
        };
        let first = parse(&text).unwrap();
        let second = parse(first.root().full_name()).unwrap();
        prop_assert_eq!(second.root().full_name(), first.root().full_name());
    }

    #[test]
    fn arbitrary_input_never_panics(text in "[A-Za-z0-9`\\[\\], =.\\t]{0,40}") {
        if let Err(err) = parse(&text) {
            prop_assert!(err.position() <= text.chars().count());
            prop_assert_eq!(err.text(), text.as_str());
        }
    }
}
