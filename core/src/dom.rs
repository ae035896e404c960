// NOTE: DOM のデータ構造

use std::collections::{HashMap, HashSet};

pub type AttrMap = HashMap<String, String>;

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub children: Vec<Node>,
    pub node_type: NodeType,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeType {
    Text(String),
    Element(ElementData),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElementData {
    pub tag_name: String,
    pub attributes: AttrMap,
}

pub fn text(data: String) -> Node {
    Node { children: Vec::new(), node_type: NodeType::Text(data) }
}

pub fn elem(name: String, attrs: AttrMap, children: Vec<Node>) -> Node {
    Node {
        children,
        node_type: NodeType::Element(ElementData { tag_name: name, attributes: attrs }),
    }
}

impl Node {
    /// The element data, or `None` for a text node.
    pub fn element(&self) -> Option<&ElementData> {
        match self.node_type {
            NodeType::Element(ref elem) => Some(elem),
            NodeType::Text(_) => None,
        }
    }
}

impl ElementData {
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    // NOTE: class="a  b" のような連続した空白は空のクラス名にしない
    pub fn classes(&self) -> HashSet<&str> {
        match self.attributes.get("class") {
            Some(classlist) => classlist.split(' ').filter(|c| !c.is_empty()).collect(),
            None => HashSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element_with(attrs: &[(&str, &str)]) -> ElementData {
        ElementData {
            tag_name: "div".to_string(),
            attributes: attrs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        }
    }

    #[test]
    fn id_reads_the_id_attribute() {
        assert_eq!(element_with(&[("id", "main")]).id(), Some("main"));
        assert_eq!(element_with(&[]).id(), None);
    }

    #[test]
    fn classes_are_split_on_spaces() {
        let elem = element_with(&[("class", "a  b a")]);
        let expected: HashSet<&str> = ["a", "b"].into_iter().collect();
        assert_eq!(elem.classes(), expected);
        assert!(element_with(&[]).classes().is_empty());
    }

    #[test]
    fn element_is_none_for_text() {
        assert!(text("hi".to_string()).element().is_none());
        let node = elem("p".to_string(), AttrMap::new(), vec![]);
        assert_eq!(node.element().map(ElementData::tag_name), Some("p"));
    }
}
