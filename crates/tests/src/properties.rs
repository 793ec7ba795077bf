use emptyobj_runtime::{
    conf::RuntimeConf,
    errors::ObjectError,
    props::{PropertyDescriptor, PropertyKey},
    realm::Realm,
    reflect::{self, KeyFilter},
    values::{BigIntValue, Symbol, TypeOf, Value},
};
use pretty_assertions::assert_eq;

fn keys(value: &Value) -> Vec<PropertyKey> {
    reflect::own_property_keys(value, &RuntimeConf::default()).unwrap()
}

#[test]
fn own_keys_order() {
    let realm = Realm::new();

    let sym = Symbol::new("sym");

    let obj = realm.new_object();
    obj.set("b", 1).unwrap();
    obj.set("2", 1).unwrap();
    obj.set(&sym, 1).unwrap();
    obj.set("a", 1).unwrap();
    obj.set("1", 1).unwrap();
    obj.set("01", 1).unwrap();

    assert_eq!(
        keys(&obj),
        vec![
            PropertyKey::from("1"),
            PropertyKey::from("2"),
            PropertyKey::from("b"),
            PropertyKey::from("a"),
            PropertyKey::from("01"),
            PropertyKey::from(sym),
        ]
    );
}

#[test]
fn enumerable_keys_are_filtered() {
    let realm = Realm::new();

    let sym = Symbol::new("visible");

    let obj = realm.new_object_from([("a", 1)]);
    obj.set(&sym, 1).unwrap();
    obj.define_property("hidden", PropertyDescriptor::new().value(1))
        .unwrap();
    obj.define_property(Symbol::new("hidden"), PropertyDescriptor::new().value(1))
        .unwrap();

    let conf = RuntimeConf::default();

    assert_eq!(
        reflect::enumerable_own_keys(&obj, KeyFilter::Strings, &conf).unwrap(),
        vec![PropertyKey::from("a")]
    );

    assert_eq!(
        reflect::enumerable_own_keys(&obj, KeyFilter::Symbols, &conf).unwrap(),
        vec![PropertyKey::from(sym)]
    );
}

#[test]
fn primitives_have_no_own_keys() {
    assert_eq!(keys(&Value::from("abc")), vec![]);
    assert_eq!(keys(&Value::Null), vec![]);
}

#[test]
fn arrays_keys_and_length() {
    let realm = Realm::new();

    let array = realm.new_array(["a".into(), "b".into()]);
    array.push("c").unwrap();

    assert_eq!(
        keys(&array),
        vec![
            PropertyKey::from(0_u32),
            PropertyKey::from(1_u32),
            PropertyKey::from(2_u32),
            PropertyKey::from("length"),
        ]
    );

    let length = reflect::get_own_property(
        &array,
        &PropertyKey::from("length"),
        &RuntimeConf::default(),
    )
    .unwrap()
    .unwrap();

    assert!(!length.enumerable);
    assert!(length.value().unwrap().same_value(&Value::from(3)));

    array.set(10_u32, "far").unwrap();

    assert!(
        reflect::get_own_property(&array, &PropertyKey::from("length"), &RuntimeConf::default())
            .unwrap()
            .unwrap()
            .value()
            .unwrap()
            .same_value(&Value::from(11))
    );
}

fn array_length(array: &Value) -> Value {
    reflect::get_own_property(array, &PropertyKey::from("length"), &RuntimeConf::default())
        .unwrap()
        .and_then(|prop| prop.value().cloned())
        .unwrap()
}

#[test]
fn assigning_array_length() {
    let realm = Realm::new();

    let array = realm.new_array([1.into(), 2.into(), 3.into()]);

    // Shrinking deletes the trailing elements
    array.set("length", 1).unwrap();

    assert!(array_length(&array).same_value(&Value::from(1)));
    assert_eq!(
        keys(&array),
        vec![PropertyKey::from(0_u32), PropertyKey::from("length")]
    );

    // Growing leaves holes
    array.set("length", 3).unwrap();
    assert_eq!(keys(&array).len(), 2);
    assert!(array_length(&array).same_value(&Value::from(3)));

    for invalid in [Value::from(-1), Value::from(1.5), Value::from("2"), Value::Null] {
        assert!(matches!(
            array.set("length", invalid),
            Err(ObjectError::InvalidArrayLength { .. })
        ));
    }

    assert!(matches!(
        array.define_property("length", PropertyDescriptor::new().value(f64::NAN)),
        Err(ObjectError::InvalidArrayLength { .. })
    ));

    assert!(array_length(&array).same_value(&Value::from(3)));

    // Plain objects can have any "length"
    let obj = realm.new_object();
    obj.set("length", "long").unwrap();
}

#[test]
fn shrinking_array_length_keeps_non_configurable_elements() {
    let realm = Realm::new();

    let array = realm.new_array([1.into(), 2.into()]);
    array
        .define_property(1_u32, PropertyDescriptor::new().configurable(false))
        .unwrap();

    assert_eq!(
        array.set("length", 0),
        Err(ObjectError::NonConfigurable {
            key: PropertyKey::from(1_u32)
        })
    );

    // Nothing was deleted
    assert_eq!(keys(&array).len(), 3);

    let frozen = realm.new_array([1.into()]);
    frozen.freeze().unwrap();

    assert_eq!(
        frozen.set("length", 0),
        Err(ObjectError::NonWritable {
            key: PropertyKey::from("length")
        })
    );

    // Same length is accepted, like redefining with the same value
    frozen
        .define_property("length", PropertyDescriptor::new().value(1))
        .unwrap();
}

#[test]
fn frozen_objects_reject_changes() {
    let realm = Realm::new();

    let obj = realm.new_object_from([("a", 1)]);
    obj.freeze().unwrap();

    assert!(obj.is_frozen().unwrap());
    assert!(obj.is_sealed().unwrap());

    assert_eq!(
        obj.set("a", 2),
        Err(ObjectError::NonWritable {
            key: PropertyKey::from("a")
        })
    );

    assert_eq!(
        obj.set("b", 2),
        Err(ObjectError::NotExtensible {
            key: PropertyKey::from("b")
        })
    );

    assert_eq!(
        obj.delete_property("a"),
        Err(ObjectError::NonConfigurable {
            key: PropertyKey::from("a")
        })
    );
}

#[test]
fn frozen_arrays_cannot_grow() {
    let realm = Realm::new();

    let array = realm.new_array([]);
    array.freeze().unwrap();

    assert!(matches!(
        array.push(1),
        Err(ObjectError::NotExtensible { .. })
    ));
}

#[test]
fn sealed_objects_stay_writable() {
    let realm = Realm::new();

    let obj = realm.new_object_from([("a", 1)]);
    obj.seal().unwrap();

    assert!(obj.is_sealed().unwrap());
    assert!(!obj.is_frozen().unwrap());

    obj.set("a", 2).unwrap();

    assert!(matches!(
        obj.delete_property("a"),
        Err(ObjectError::NonConfigurable { .. })
    ));
}

#[test]
fn empty_non_extensible_object_is_frozen() {
    let realm = Realm::new();

    let obj = realm.new_object();
    obj.prevent_extensions().unwrap();

    assert!(obj.is_frozen().unwrap());
}

#[test]
fn primitives_integrity() {
    let value = Value::from(1);

    value.freeze().unwrap();
    assert!(value.is_frozen().unwrap());

    assert!(matches!(
        value.set("a", 1),
        Err(ObjectError::NotAnObject {
            operation: "set",
            found: TypeOf::Number
        })
    ));
}

#[test]
fn descriptors_are_validated() {
    let realm = Realm::new();

    let obj = realm.new_object();

    assert!(matches!(
        obj.define_property(
            "a",
            PropertyDescriptor::new()
                .value(1)
                .getter(realm.new_function("get"))
        ),
        Err(ObjectError::InvalidDescriptor { .. })
    ));

    assert!(matches!(
        obj.define_property("a", PropertyDescriptor::new().getter(Value::from(1))),
        Err(ObjectError::InvalidDescriptor { .. })
    ));
}

#[test]
fn redefining_non_configurable_properties() {
    let realm = Realm::new();

    let obj = realm.new_object();

    obj.define_property(
        "fixed",
        PropertyDescriptor::new().value(1).enumerable(true),
    )
    .unwrap();

    // Same value is allowed
    obj.define_property("fixed", PropertyDescriptor::new().value(1))
        .unwrap();

    assert_eq!(
        obj.define_property("fixed", PropertyDescriptor::new().value(2)),
        Err(ObjectError::NonWritable {
            key: PropertyKey::from("fixed")
        })
    );

    assert_eq!(
        obj.define_property("fixed", PropertyDescriptor::new().getter(realm.new_function("get"))),
        Err(ObjectError::NonConfigurable {
            key: PropertyKey::from("fixed")
        })
    );
}

#[test]
fn switching_property_kind() {
    let realm = Realm::new();

    let obj = realm.new_object();

    obj.define_property(
        "prop",
        PropertyDescriptor::new()
            .value(1)
            .enumerable(true)
            .configurable(true),
    )
    .unwrap();

    obj.define_property(
        "prop",
        PropertyDescriptor::new().getter(realm.new_function("get")),
    )
    .unwrap();

    let prop = reflect::get_own_property(&obj, &PropertyKey::from("prop"), &RuntimeConf::default())
        .unwrap()
        .unwrap();

    assert!(prop.is_accessor());
    assert!(prop.enumerable);
    assert!(prop.configurable);
}

#[test]
fn accessors_without_setter_reject_assignment() {
    let realm = Realm::new();

    let obj = realm.new_object();

    obj.define_property(
        "computed",
        PropertyDescriptor::new()
            .getter(realm.new_function("get"))
            .enumerable(true),
    )
    .unwrap();

    assert_eq!(
        obj.set("computed", 1),
        Err(ObjectError::AccessorWithoutSetter {
            key: PropertyKey::from("computed")
        })
    );
}

#[test]
fn array_indices() {
    assert_eq!(PropertyKey::from("0").array_index(), Some(0));
    assert_eq!(PropertyKey::from("42").array_index(), Some(42));
    assert_eq!(PropertyKey::from("4294967294").array_index(), Some(4294967294));
    assert_eq!(PropertyKey::from("4294967295").array_index(), None);
    assert_eq!(PropertyKey::from("01").array_index(), None);
    assert_eq!(PropertyKey::from("-1").array_index(), None);
    assert_eq!(PropertyKey::from("1.5").array_index(), None);
    assert_eq!(PropertyKey::from("").array_index(), None);
    assert_eq!(PropertyKey::from(Symbol::new("0")).array_index(), None);
}

#[test]
fn bigint_parsing() {
    assert_eq!(BigIntValue::parse("000").unwrap().as_str(), "0");
    assert_eq!(BigIntValue::parse("-0").unwrap().as_str(), "0");
    assert_eq!(BigIntValue::parse("+0042").unwrap().as_str(), "42");
    assert_eq!(BigIntValue::parse("-12n").unwrap().as_str(), "-12");
    assert_eq!(
        BigIntValue::parse("99999999999999999999999999999999999999999").unwrap().as_str(),
        "99999999999999999999999999999999999999999"
    );

    assert!(matches!(
        BigIntValue::parse("1.5"),
        Err(ObjectError::InvalidBigInt { .. })
    ));
    assert!(BigIntValue::parse("").is_err());
    assert!(BigIntValue::parse("-").is_err());
}

#[test]
fn type_of() {
    let realm = Realm::new();

    assert_eq!(Value::Null.type_of(), TypeOf::Object);
    assert_eq!(Value::Undefined.type_of(), TypeOf::Undefined);
    assert_eq!(realm.new_array([]).type_of(), TypeOf::Object);
    assert_eq!(realm.new_function("f").type_of(), TypeOf::Function);
    assert_eq!(Value::from(BigIntValue::from(1_i64)).type_of(), TypeOf::BigInt);
    assert_eq!(Value::from(Symbol::anonymous()).type_of().to_string(), "symbol");
}

#[test]
fn same_value() {
    let realm = Realm::new();

    assert!(Value::Number(f64::NAN).same_value(&Value::Number(f64::NAN)));
    assert!(!Value::Number(0.0).same_value(&Value::Number(-0.0)));

    let obj = realm.new_object();
    assert!(obj.same_value(&obj.clone()));
    assert!(!obj.same_value(&realm.new_object()));

    let sym = Symbol::new("a");
    assert!(Value::from(sym.clone()).same_value(&Value::from(sym)));
    assert!(!Value::from(Symbol::new("a")).same_value(&Value::from(Symbol::new("a"))));
}

#[test]
fn realm_symbol_registry() {
    let realm = Realm::new();

    let first = realm.symbol_for("app.key");
    let second = realm.symbol_for("app.key");

    assert_eq!(first, second);
    assert_ne!(first, Symbol::new("app.key"));
    assert_eq!(realm.symbol_key_for(&first).as_deref(), Some("app.key"));
    assert_eq!(realm.symbol_key_for(&Symbol::new("app.key")), None);
}

#[test]
fn constructing_non_constructors() {
    let realm = Realm::new();

    assert!(matches!(
        realm.construct(&realm.new_function("plain")),
        Err(ObjectError::NotAConstructor { name }) if name == "plain"
    ));

    assert!(matches!(
        realm.construct(&realm.new_object()),
        Err(ObjectError::NotAConstructor { .. })
    ));

    assert!(matches!(
        realm.construct(&Value::from(1)),
        Err(ObjectError::NotAConstructor { .. })
    ));
}

#[test]
fn constructor_body_errors_are_propagated() {
    let realm = Realm::new();

    let failing = realm.new_constructor("Failing", |this| {
        this.freeze()?;
        this.set("a", 1)
    });

    assert!(matches!(
        realm.construct(&failing),
        Err(ObjectError::NotExtensible { .. })
    ));
}

#[test]
fn object_create_requires_an_object() {
    let realm = Realm::new();

    assert!(matches!(
        realm.new_object_with_proto(Some(&Value::from(1))),
        Err(ObjectError::NotAnObject {
            operation: "Object.create",
            ..
        })
    ));
}

#[test]
fn builtin_prototypes_have_hidden_methods() {
    let realm = Realm::new();

    let conf = RuntimeConf::default();

    assert!(
        reflect::enumerable_own_keys(realm.object_prototype(), KeyFilter::Strings, &conf)
            .unwrap()
            .is_empty()
    );

    assert!(
        keys(realm.object_prototype()).contains(&PropertyKey::from("hasOwnProperty"))
    );

    assert!(keys(realm.array_prototype()).contains(&PropertyKey::from("push")));
    assert!(keys(realm.function_prototype()).contains(&PropertyKey::from("call")));
}
