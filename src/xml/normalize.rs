use std::collections::BTreeMap;

use crate::xml::Element;

/// Child tags the integrator repeats under one parent. These accumulate
/// into ordered sequences; any other tag is stored last-write-wins.
static LIST_TAGS: phf::Set<&'static str> = phf::phf_set! {
    "State",
    "Delay",
    "Good",
    "Fail",
    "Item",
    "Package",
    "Pvz",
};

/// One value inside a [`NormalizedNode`]: attributes become text, child
/// elements become nested nodes, repeated child tags become sequences.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Text(String),
    Node(NormalizedNode),
    List(Vec<NormalizedNode>),
}

/// Plain nested-mapping view of a response [`Element`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizedNode {
    entries: BTreeMap<String, Value>,
}

impl NormalizedNode {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Scalar attribute value, if `key` holds one.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(Value::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Nested child node, if `key` holds one.
    #[must_use]
    pub fn node(&self, key: &str) -> Option<&NormalizedNode> {
        match self.entries.get(key) {
            Some(Value::Node(node)) => Some(node),
            _ => None,
        }
    }

    /// Repeated children in document order, if `key` holds a sequence.
    #[must_use]
    pub fn list(&self, key: &str) -> Option<&[NormalizedNode]> {
        match self.entries.get(key) {
            Some(Value::List(items)) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

/// Converts an element tree into a plain nested mapping.
///
/// Attributes are copied as text entries. Each child is normalized
/// recursively: children whose tag is in the repeating set append to an
/// ordered sequence under that tag, everything else stores directly under
/// its tag and a duplicate deterministically overwrites the previous one.
/// A leaf element normalizes to its (possibly empty) attribute mapping.
#[must_use]
pub fn normalize(element: &Element) -> NormalizedNode {
    let mut entries: BTreeMap<String, Value> = element
        .attributes()
        .map(|(name, value)| (name.to_owned(), Value::Text(value.to_owned())))
        .collect();

    for child in element.children() {
        let normalized = normalize(child);
        if LIST_TAGS.contains(child.tag()) {
            let slot = entries
                .entry(child.tag().to_owned())
                .or_insert_with(|| Value::List(Vec::new()));
            match slot {
                Value::List(items) => items.push(normalized),
                // An attribute shared the repeating tag's name; the
                // sequence takes over the key.
                other => *other = Value::List(vec![normalized]),
            }
        } else {
            entries.insert(child.tag().to_owned(), Value::Node(normalized));
        }
    }

    NormalizedNode { entries }
}
