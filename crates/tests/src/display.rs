use emptyobj_prettify::PrettyPrintableExt;
use emptyobj_runtime::{
    props::{PropertyDescriptor, PropertyKey},
    proxy::{ProxyValue, TransparentHandler},
    realm::Realm,
    values::{BigIntValue, Symbol, Value},
};
use pretty_assertions::assert_eq;

use crate::prototype_of;

#[test]
fn primitives() {
    assert_eq!(Value::Undefined.display_inline(), "undefined");
    assert_eq!(Value::Null.display_inline(), "null");
    assert_eq!(Value::from(true).display_inline(), "true");
    assert_eq!(Value::from(1).display_inline(), "1");
    assert_eq!(Value::from(1.5).display_inline(), "1.5");
    assert_eq!(Value::Number(-0.0).display_inline(), "-0");
    assert_eq!(Value::Number(f64::NAN).display_inline(), "NaN");
    assert_eq!(Value::Number(f64::NEG_INFINITY).display_inline(), "-Infinity");
    assert_eq!(Value::from("it's").display_inline(), r"'it\'s'");
    assert_eq!(
        Value::from(BigIntValue::from(123_i64)).display_inline(),
        "123n"
    );
    assert_eq!(
        Value::from(Symbol::new("test")).display_inline(),
        "Symbol(test)"
    );
}

#[test]
fn objects() {
    let realm = Realm::new();

    assert_eq!(realm.new_object().display_inline(), "{}");

    assert_eq!(
        realm
            .new_object_from([("a", Value::from(1)), ("b", Value::from("two"))])
            .display_inline(),
        "{ a: 1, b: 'two' }"
    );

    assert_eq!(
        realm
            .new_object_from([("with space", 1), ("2", 2)])
            .display_inline(),
        "{ 2: 2, 'with space': 1 }"
    );

    assert_eq!(
        realm.new_object_with_proto(None).unwrap().display_inline(),
        "[Object: null prototype] {}"
    );
}

#[test]
fn only_enumerable_properties_are_shown() {
    let realm = Realm::new();

    let obj = realm.new_object_from([(Symbol::new("test"), 123)]);

    obj.define_property("hidden", PropertyDescriptor::new().value(1))
        .unwrap();

    assert_eq!(obj.display_inline(), "{ [Symbol(test)]: 123 }");
}

#[test]
fn arrays() {
    let realm = Realm::new();

    assert_eq!(realm.new_array([]).display_inline(), "[]");

    assert_eq!(
        realm
            .new_array([1.into(), 2.into(), 3.into()])
            .display_inline(),
        "[ 1, 2, 3 ]"
    );

    let sparse = realm.new_array([]);
    sparse.set(PropertyKey::from(1_u32), 2).unwrap();

    assert_eq!(sparse.display_inline(), "[ <1 empty item>, 2 ]");

    let sparse = realm.new_array([]);
    sparse.set(PropertyKey::from(3_u32), 4).unwrap();
    sparse.set("extra", true).unwrap();

    assert_eq!(sparse.display_inline(), "[ <3 empty items>, 4, extra: true ]");
}

#[test]
fn functions() {
    let realm = Realm::new();

    assert_eq!(realm.new_function("f").display_inline(), "[Function: f]");
    assert_eq!(
        realm.new_function("").display_inline(),
        "[Function (anonymous)]"
    );

    let func = realm.new_function("f");
    func.set("custom", 1).unwrap();

    assert_eq!(func.display_inline(), "[Function: f] { custom: 1 }");
}

#[test]
fn instances() {
    let realm = Realm::new();

    let parent = realm.new_constructor("Parent", |this| this.set("a", 1));
    prototype_of(&parent).set("inherited", 2).unwrap();

    assert_eq!(
        realm.construct(&parent).unwrap().display_inline(),
        "Parent { a: 1 }"
    );
}

#[test]
fn accessors_are_not_called() {
    let realm = Realm::new();

    let obj = realm.new_object();

    obj.define_property(
        "computed",
        PropertyDescriptor::new()
            .getter(realm.new_function("get"))
            .setter(realm.new_function("set"))
            .enumerable(true),
    )
    .unwrap();

    obj.define_property(
        "read",
        PropertyDescriptor::new()
            .getter(realm.new_function("get"))
            .enumerable(true),
    )
    .unwrap();

    assert_eq!(
        obj.display_inline(),
        "{ computed: [Getter/Setter], read: [Getter] }"
    );
}

#[test]
fn cycles() {
    let realm = Realm::new();

    let obj = realm.new_object();
    obj.set("itself", obj.clone()).unwrap();

    assert_eq!(obj.display_inline(), "{ itself: [Circular *] }");

    // Shared but acyclic references are displayed twice
    let shared = realm.new_object_from([("a", 1)]);
    let obj = realm.new_object_from([("x", shared.clone()), ("y", shared)]);

    assert_eq!(obj.display_inline(), "{ x: { a: 1 }, y: { a: 1 } }");
}

#[test]
fn proxies() {
    let realm = Realm::new();

    let (proxy, mut revoker) =
        ProxyValue::revocable(realm.new_object_from([("a", 1)]), TransparentHandler).unwrap();

    assert_eq!(proxy.display_inline(), "{ a: 1 }");

    revoker.revoke();

    assert_eq!(proxy.display_inline(), "<Revoked Proxy>");
}

#[test]
fn multiline() {
    let realm = Realm::new();

    let obj = realm.new_object_from(
        (0..10).map(|i| (format!("property{i}"), Value::from(format!("value number {i}")))),
    );

    let rendered = obj.display_multiline();

    assert!(rendered.starts_with("{\n  property0: 'value number 0',\n"));
    assert!(rendered.ends_with("  property9: 'value number 9'\n}"));

    assert_eq!(
        realm.new_object_from([("a", 1)]).display_multiline(),
        "{ a: 1 }"
    );
}
