//! Registers a few custom types and creates instances of them.
//!
//! Registration events are logged at debug level.

use stix2::properties::{IntegerProperty, ListProperty, Property, ReferenceProperty, StringProperty};
use stix2::{fields, registry, v21, BuiltinType, ObjectKind, SpecVersion, Value};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let animal = v21::custom_object(
        (),
        "x-animal",
        vec![
            ("species", StringProperty::new().required().boxed()),
            ("animal_class", StringProperty::new().boxed()),
            ("x_legs", IntegerProperty::new().min(0).boxed()),
        ],
    );
    let observable = v21::custom_observable(
        (),
        "x-tag",
        vec![
            ("value", StringProperty::new().required().boxed()),
            ("owner_ref", ReferenceProperty::new().boxed()),
            ("related_refs", ListProperty::new(ReferenceProperty::new()).boxed()),
        ],
    );
    let extension = v21::custom_extension(
        (),
        &BuiltinType::observable("file"),
        "x-file-hash-ext",
        vec![("digest", StringProperty::new().boxed())],
    );

    for result in [animal, observable, extension] {
        match result {
            Ok(ty) => println!("registered {:?}", ty),
            Err(err) => eprintln!("failed: {}", err),
        }
    }

    match registry::instantiate(
        ObjectKind::DomainObject,
        "x-animal",
        &SpecVersion::V21,
        fields([("species", Value::from("lynx")), ("x_legs", Value::from(4i64))]),
    ) {
        Ok(obj) => {
            for (name, value) in obj.iter() {
                println!("  {:<20} {:?}", name, value);
            }
        }
        Err(err) => eprintln!("create failed: {}", err),
    }

    let bad = v21::custom_observable(
        (),
        "x-bad-tag",
        vec![("owner_ref", StringProperty::new().boxed())],
    );
    if let Err(err) = bad {
        println!("rejected: {}", err);
    }
}
