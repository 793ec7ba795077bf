//!
//! This module implements pretty-printing for values.
//!
//! Rendering follows what developers are used to see in a console: only enumerable own
//! properties are shown, accessors are never called, and proxies show their target.
//!

use colored::Color;
use emptyobj_prettify::{PrettyPrintable, PrettyPrintablePiece, Styled};

use crate::{
    props::{Property, PropertyKey, PropertySlot},
    values::{ObjectKind, ObjectValue, Value},
};

impl PrettyPrintable for Value {
    type Context = ();

    fn generate_pretty_data(&self, _: &Self::Context) -> PrettyPrintablePiece {
        value_piece(self, &mut vec![])
    }
}

impl PrettyPrintable for PropertyKey {
    type Context = ();

    fn generate_pretty_data(&self, _: &Self::Context) -> PrettyPrintablePiece {
        match self {
            PropertyKey::String(key) => {
                if is_identifier(key) || key.parse::<u32>().is_ok() {
                    PrettyPrintablePiece::colorless_atomic(key)
                } else {
                    pretty_printable_string(key)
                }
            }

            PropertyKey::Symbol(symbol) => {
                PrettyPrintablePiece::colored_atomic(format!("[{symbol}]"), Color::Green)
            }
        }
    }
}

/// Generate the piece of a value
///
/// `seen` contains the identity of the objects currently being rendered, to detect cycles.
fn value_piece(value: &Value, seen: &mut Vec<usize>) -> PrettyPrintablePiece {
    match value {
        Value::Undefined => PrettyPrintablePiece::colored_atomic("undefined", Color::BrightBlack),

        Value::Null => PrettyPrintablePiece::colored_atomic("null", Color::BrightWhite),

        Value::Bool(bool) => PrettyPrintablePiece::colored_atomic(bool.to_string(), Color::Yellow),

        Value::Number(number) => {
            PrettyPrintablePiece::colored_atomic(format_number(*number), Color::Yellow)
        }

        Value::BigInt(bigint) => {
            PrettyPrintablePiece::colored_atomic(format!("{bigint}n"), Color::Yellow)
        }

        Value::String(string) => pretty_printable_string(string),

        Value::Symbol(symbol) => {
            PrettyPrintablePiece::colored_atomic(symbol.to_string(), Color::Green)
        }

        Value::Object(_) | Value::Proxy(_) => {
            let Some(identity) = value.identity() else {
                return PrettyPrintablePiece::Empty;
            };

            if seen.contains(&identity) {
                return PrettyPrintablePiece::colored_atomic("[Circular *]", Color::Cyan);
            }

            seen.push(identity);

            let piece = match value {
                Value::Proxy(proxy) => match proxy.target() {
                    Some(target) => value_piece(&target, seen),
                    None => PrettyPrintablePiece::colored_atomic("<Revoked Proxy>", Color::Cyan),
                },

                Value::Object(obj) => object_piece(&obj.read(), seen),

                _ => PrettyPrintablePiece::Empty,
            };

            seen.pop();

            piece
        }
    }
}

fn object_piece(obj: &ObjectValue, seen: &mut Vec<usize>) -> PrettyPrintablePiece {
    match &obj.kind {
        ObjectKind::Array => array_piece(obj, seen),

        ObjectKind::Function(func) => {
            let header = PrettyPrintablePiece::colored_atomic(
                if func.name.is_empty() {
                    "[Function (anonymous)]".to_owned()
                } else {
                    format!("[Function: {}]", func.name)
                },
                Color::Cyan,
            );

            let members = members_pieces(obj, seen, |_| true);

            if members.is_empty() {
                header
            } else {
                PrettyPrintablePiece::Join(vec![
                    header,
                    PrettyPrintablePiece::colorless_atomic(" "),
                    braces(members),
                ])
            }
        }

        ObjectKind::Ordinary => {
            let prefix = match &obj.prototype {
                None => Some(PrettyPrintablePiece::colored_atomic(
                    "[Object: null prototype] ",
                    Color::BrightBlack,
                )),

                Some(prototype) => constructor_name(prototype)
                    .map(|name| PrettyPrintablePiece::colorless_atomic(format!("{name} "))),
            };

            let body = braces(members_pieces(obj, seen, |_| true));

            match prefix {
                Some(prefix) => PrettyPrintablePiece::Join(vec![prefix, body]),
                None => body,
            }
        }
    }
}

fn array_piece(obj: &ObjectValue, seen: &mut Vec<usize>) -> PrettyPrintablePiece {
    let length = obj.array_length().unwrap_or(0);

    let mut items = vec![];
    let mut holes = 0;

    let flush_holes = |holes: &mut u32, items: &mut Vec<PrettyPrintablePiece>| {
        if *holes > 0 {
            items.push(PrettyPrintablePiece::colored_atomic(
                format!(
                    "<{holes} empty item{}>",
                    if *holes > 1 { "s" } else { "" }
                ),
                Color::BrightBlack,
            ));

            *holes = 0;
        }
    };

    for index in 0..length {
        match obj.properties.get(&PropertyKey::from(index)) {
            Some(property) => {
                flush_holes(&mut holes, &mut items);
                items.push(property_value_piece(property, seen));
            }

            None => holes += 1,
        }
    }

    flush_holes(&mut holes, &mut items);

    items.extend(members_pieces(obj, seen, |key| key.array_index().is_none()));

    PrettyPrintablePiece::List {
        begin: Styled::colorless("["),
        items,
        end: Styled::colorless("]"),
        padded: true,
    }
}

/// Generate `key: value` pieces for the enumerable own properties matching a filter
fn members_pieces(
    obj: &ObjectValue,
    seen: &mut Vec<usize>,
    filter: impl Fn(&PropertyKey) -> bool,
) -> Vec<PrettyPrintablePiece> {
    obj.properties
        .keys()
        .into_iter()
        .filter(|key| filter(key))
        .filter_map(|key| {
            let property = obj.properties.get(&key)?;

            if !property.enumerable {
                return None;
            }

            Some(PrettyPrintablePiece::Join(vec![
                key.generate_pretty_data(&()),
                PrettyPrintablePiece::colorless_atomic(": "),
                property_value_piece(property, seen),
            ]))
        })
        .collect()
}

fn property_value_piece(property: &Property, seen: &mut Vec<usize>) -> PrettyPrintablePiece {
    match &property.slot {
        PropertySlot::Data { value, writable: _ } => value_piece(value, seen),

        PropertySlot::Accessor { get, set } => PrettyPrintablePiece::colored_atomic(
            match (get, set) {
                (Some(_), Some(_)) => "[Getter/Setter]",
                (Some(_), None) => "[Getter]",
                (None, Some(_)) => "[Setter]",
                (None, None) => "undefined",
            },
            Color::Cyan,
        ),
    }
}

fn braces(items: Vec<PrettyPrintablePiece>) -> PrettyPrintablePiece {
    PrettyPrintablePiece::List {
        begin: Styled::colorless("{"),
        items,
        end: Styled::colorless("}"),
        padded: true,
    }
}

/// Name of the constructor a prototype belongs to, if it isn't a builtin one
fn constructor_name(prototype: &Value) -> Option<String> {
    let Value::Object(prototype) = prototype else {
        return None;
    };

    let constructor = prototype
        .read()
        .properties
        .get(&PropertyKey::from("constructor"))?
        .value()?
        .clone();

    let Value::Object(constructor) = constructor else {
        return None;
    };

    let constructor = constructor.read();
    let name = &constructor.function()?.name;

    (!name.is_empty() && name != "Object").then(|| name.clone())
}

pub fn pretty_printable_string(string: &str) -> PrettyPrintablePiece {
    PrettyPrintablePiece::colored_atomic(
        format!(
            "'{}'",
            string
                .replace('\\', "\\\\")
                .replace('\'', "\\'")
                .replace('\n', "\\n")
        ),
        Color::Green,
    )
}

fn format_number(number: f64) -> String {
    if number.is_nan() {
        "NaN".to_owned()
    } else if number.is_infinite() {
        if number > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
    } else if number == 0.0 && number.is_sign_negative() {
        "-0".to_owned()
    } else {
        number.to_string()
    }
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();

    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
