//! Addressing into the JSON tree being built.
//!
//! The parser never holds references into the output while parsing; it keeps
//! paths from the root instead and resolves them on every write.

use serde_json::{Map, Value};

/// One step of a path from the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Seg {
    Key(String),
    Index(usize),
}

/// Path from the document root to a value.
pub(crate) type ValuePath = Vec<Seg>;

/// Extend `base` with the dot-separated components of `key`.
pub(crate) fn join_key(base: &[Seg], key: &str) -> ValuePath {
    let mut path = base.to_vec();
    path.extend(key.split('.').map(|bit| Seg::Key(bit.to_owned())));
    path
}

/// Resolve `path`, creating missing object entries as `null`.
///
/// Any non-object value met where a key must be looked up is replaced with an
/// empty object. Index segments never create anything.
pub(crate) fn slot<'a>(root: &'a mut Value, path: &[Seg]) -> Option<&'a mut Value> {
    let mut current = root;
    for seg in path {
        current = match seg {
            Seg::Key(key) => {
                if !current.is_object() {
                    *current = Value::Object(Map::new());
                }
                current
                    .as_object_mut()?
                    .entry(key.as_str())
                    .or_insert(Value::Null)
            }
            Seg::Index(index) => current.as_array_mut()?.get_mut(*index)?,
        };
    }
    Some(current)
}

/// Resolve `path` to an array.
pub(crate) fn array_mut<'a>(root: &'a mut Value, path: &[Seg]) -> Option<&'a mut Vec<Value>> {
    slot(root, path)?.as_array_mut()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_join_key_splits_dots() {
        let path = join_key(&[Seg::Index(0)], "a.b");
        assert_eq!(
            path,
            vec![
                Seg::Index(0),
                Seg::Key("a".to_owned()),
                Seg::Key("b".to_owned())
            ]
        );
    }

    #[test]
    fn test_slot_creates_and_replaces_intermediates() {
        let mut root = json!({"a": "text"});
        let path = join_key(&[], "a.b");
        *slot(&mut root, &path).unwrap() = json!("x");
        assert_eq!(root, json!({"a": {"b": "x"}}));
    }

    #[test]
    fn test_slot_missing_index() {
        let mut root = json!({"list": []});
        let path = vec![Seg::Key("list".to_owned()), Seg::Index(3)];
        assert!(slot(&mut root, &path).is_none());
    }
}
