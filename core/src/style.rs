// NOTE: DOM にスタイルを当てて StyledNode ツリーを作る
//
// Only specified values are produced. No inheritance, no defaults.

use std::collections::HashMap;
use std::fmt;

use crate::css::{Rule, Selector, SimpleSelector, Specificity, Stylesheet, Value};
use crate::dom::{ElementData, Node, NodeType};

pub type PropertyMap = HashMap<String, Value>;

#[derive(Clone, Debug, PartialEq)]
pub struct StyledNode<'a> {
    pub node: &'a Node,
    pub specified_values: PropertyMap,
    pub children: Vec<StyledNode<'a>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Display {
    Inline,
    Block,
    None,
}

impl<'a> StyledNode<'a> {
    pub fn value(&self, name: &str) -> Option<Value> {
        self.specified_values.get(name).cloned()
    }

    /// `name`, else `fallback_name`, else `default`. Layout uses this for
    /// longhands such as `margin-left` falling back to `margin`.
    pub fn lookup(&self, name: &str, fallback_name: &str, default: &Value) -> Value {
        self.value(name)
            .or_else(|| self.value(fallback_name))
            .unwrap_or_else(|| default.clone())
    }

    pub fn display(&self) -> Display {
        match self.value("display") {
            Some(Value::Keyword(s)) => match &*s {
                "block" => Display::Block,
                "none" => Display::None,
                _ => Display::Inline,
            },
            _ => Display::Inline,
        }
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self.node.node_type {
            NodeType::Element(ref elem) => {
                write!(f, "{}<{}", indent, elem.tag_name)?;
                if let Some(id) = elem.id() {
                    write!(f, "#{}", id)?;
                }
                for class in elem.attribute("class").unwrap_or("").split(' ').filter(|c| !c.is_empty()) {
                    write!(f, ".{}", class)?;
                }
                writeln!(f, ">")?;
            }
            NodeType::Text(ref text) => writeln!(f, "{}{:?}", indent, text)?,
        }

        let mut names: Vec<&String> = self.specified_values.keys().collect();
        names.sort();
        for name in names {
            writeln!(f, "{}  {}: {};", indent, name, self.specified_values[name])?;
        }

        for child in &self.children {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

// NOTE: one line per node, followed by its properties sorted by name
impl fmt::Display for StyledNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

/// Style every node of `root`. Text nodes get an empty map.
pub fn style_tree<'a>(root: &'a Node, stylesheet: &Stylesheet) -> StyledNode<'a> {
    StyledNode {
        node: root,
        specified_values: match root.node_type {
            NodeType::Element(ref elem) => specified_values(elem, stylesheet),
            NodeType::Text(_) => HashMap::new(),
        },
        children: root.children.iter().map(|child| style_tree(child, stylesheet)).collect(),
    }
}

// Lower specificity is applied first so that higher specificity overwrites it.
// sort_by is stable, so among equal specificities the later rule wins.
pub fn specified_values(elem: &ElementData, stylesheet: &Stylesheet) -> PropertyMap {
    let mut values = HashMap::new();
    let mut rules = matching_rules(elem, stylesheet);

    rules.sort_by(|&(a, _), &(b, _)| a.cmp(&b));
    for (specificity, rule) in rules {
        tracing::trace!("<{}> matched rule with specificity {:?}", elem.tag_name, specificity);
        for declaration in &rule.declarations {
            values.insert(declaration.name.clone(), declaration.value.clone());
        }
    }
    values
}

// (specificity of the best matching selector, rule)
pub type MatchedRule<'a> = (Specificity, &'a Rule);

pub fn matching_rules<'a>(elem: &ElementData, stylesheet: &'a Stylesheet) -> Vec<MatchedRule<'a>> {
    // NOTE: 全ルールを線形に走査している
    stylesheet.rules.iter().filter_map(|rule| match_rule(elem, rule)).collect()
}

// A rule matches when any of its selectors does.
pub fn match_rule<'a>(elem: &ElementData, rule: &'a Rule) -> Option<MatchedRule<'a>> {
    rule.selectors
        .iter()
        .filter(|selector| matches(elem, selector))
        .map(Selector::specificity)
        .max()
        .map(|specificity| (specificity, rule))
}

pub fn matches(elem: &ElementData, selector: &Selector) -> bool {
    match *selector {
        Selector::Simple(ref simple_selector) => matches_simple_selector(elem, simple_selector),
    }
}

pub fn matches_simple_selector(elem: &ElementData, selector: &SimpleSelector) -> bool {
    if selector.tag_name.iter().any(|name| elem.tag_name != *name) {
        return false;
    }

    if selector.id.iter().any(|id| elem.id() != Some(id.as_str())) {
        return false;
    }

    let elem_classes = elem.classes();
    if selector.classes.iter().any(|class| !elem_classes.contains(class.as_str())) {
        return false;
    }

    true
}
