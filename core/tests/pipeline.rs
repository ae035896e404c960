use std::time::{Duration, Instant};

use proptest::prelude::*;
use sumire_core::css::{self, Color, Value};
use sumire_core::dom::{self, AttrMap};
use sumire_core::style::Display;
use sumire_core::{html, Document, ParseErrorKind};

const PAGE: &str = r#"
<html>
    <body class="page">
        <h1 id="title">Title</h1>
        <div id="main" class="note wide">
            <p>Hello <em>world</em>!</p>
        </div>
    </body>
</html>
"#;

const SHEET: &str = r#"
* { display: block; }
em { display: inline; }
.note { color: #336699; padding: 4px; }
div.note.wide, h1 { margin: auto; }
#main { color: #000000; }
body { margin: 8px; }
"#;

#[test]
fn styles_a_small_page() {
    let document = Document::parse(PAGE, SHEET).unwrap();
    let html = document.style();
    assert_eq!(html.display(), Display::Block);

    let body = &html.children[0];
    assert_eq!(body.value("margin"), Some(Value::Length(8.0, css::Unit::Px)));

    let h1 = &body.children[0];
    assert_eq!(h1.value("margin"), Some(Value::Keyword("auto".to_string())));
    // text nodes carry no values
    assert!(h1.children[0].specified_values.is_empty());

    let main = &body.children[1];
    assert_eq!(main.value("color"), Some(Value::Color(Color { r: 0, g: 0, b: 0, a: 255 })));
    assert_eq!(main.value("padding").map(|v| v.to_px()), Some(4.0));

    let em = &main.children[0].children[1];
    assert_eq!(em.display(), Display::Inline);
}

#[test]
fn styled_tree_mirrors_the_dom() {
    let document = Document::parse(PAGE, "").unwrap();
    fn same_shape(node: &dom::Node, styled: &sumire_core::style::StyledNode<'_>) {
        assert!(std::ptr::eq(node, styled.node));
        assert!(styled.specified_values.is_empty());
        assert_eq!(node.children.len(), styled.children.len());
        for (child, styled_child) in node.children.iter().zip(&styled.children) {
            same_shape(child, styled_child);
        }
    }
    same_shape(&document.root, &document.style());
}

#[test]
fn document_parse_reports_the_first_failure() {
    let err = Document::parse("<a></b>", "div {width: 1em;}").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::MismatchedClosingTag { .. }));

    let err = Document::parse("<a></a>", "div {\n  width: 1em;\n}").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidUnit { unit: "em".to_string() });
    assert_eq!((err.location.line, err.location.column), (2, 11));
    assert_eq!(err.to_string(), "parse error at 2:11: unrecognized unit \"em\"");
}

// 40k elements is a few hundred KB of source. Anything slower than linear
// in the input length blows well past the bound.
#[test]
fn large_inputs_parse_in_linear_time() {
    const N: usize = 40_000;
    let page = format!("<body>{}</body>", "<p id=\"a\"></p>\n".repeat(N));
    let sheet = "p { width: 1px; }\n".repeat(N);

    let started = Instant::now();
    let root = html::parse(&page).unwrap();
    let stylesheet = css::parse(&sheet).unwrap();
    let elapsed = started.elapsed();

    assert_eq!(root.children.iter().filter(|child| child.element().is_some()).count(), N);
    assert_eq!(stylesheet.rules.len(), N);
    assert!(elapsed < Duration::from_secs(10), "parsing took {:?}", elapsed);

    // locations are still exact at the far end of a big input
    let err = css::parse(&format!("{}p {{ width: 1em; }}", sheet)).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidUnit { unit: "em".to_string() });
    assert_eq!((err.location.line, err.location.column), (N + 1, 13));
}

#[derive(Debug, Clone)]
struct Tree {
    name: String,
    children: Vec<Tree>,
}

impl Tree {
    fn to_html(&self) -> String {
        let inner: String = self.children.iter().map(Tree::to_html).collect();
        format!("<{0}>{1}</{0}>", self.name, inner)
    }

    fn to_node(&self) -> dom::Node {
        dom::elem(self.name.clone(), AttrMap::new(), self.children.iter().map(Tree::to_node).collect())
    }
}

fn tree() -> impl Strategy<Value = Tree> {
    let leaf = "[a-zA-Z][a-zA-Z0-9]{0,5}".prop_map(|name| Tree { name, children: vec![] });
    leaf.prop_recursive(4, 32, 4, |inner| {
        ("[a-zA-Z][a-zA-Z0-9]{0,5}", prop::collection::vec(inner, 0..4))
            .prop_map(|(name, children)| Tree { name, children })
    })
}

// (selector, specificity) pairs that all match <div id="x" class="a">
const SELECTORS: [(&str, (usize, usize, usize)); 6] = [
    ("*", (0, 0, 0)),
    ("div", (0, 0, 1)),
    (".a", (0, 1, 0)),
    ("div.a", (0, 1, 1)),
    ("#x", (1, 0, 0)),
    ("div#x.a", (1, 1, 1)),
];

proptest! {
    #[test]
    fn well_formed_documents_parse_back(t in tree()) {
        prop_assert_eq!(html::parse(&t.to_html()).unwrap(), t.to_node());
    }

    #[test]
    fn highest_specificity_then_latest_rule_wins(
        rules in prop::collection::vec((0..SELECTORS.len(), any::<u8>()), 1..8),
        unrelated in prop::collection::vec(0..SELECTORS.len(), 0..4),
    ) {
        let mut sheet = String::new();
        for &(selector, red) in &rules {
            sheet.push_str(&format!("{} {{ color: #{:02x}0000; }}\n", SELECTORS[selector].0, red));
        }
        // rules for another element must not change the outcome
        for &selector in &unrelated {
            let name = SELECTORS[selector].0.replace('a', "b").replace('x', "y").replace("div", "span");
            if name != "*" {
                sheet.push_str(&format!("{} {{ color: #00ff00; }}\n", name));
            }
        }

        let document = Document::parse("<div id=\"x\" class=\"a\"></div>", &sheet).unwrap();
        let winner = rules
            .iter()
            .enumerate()
            .max_by_key(|&(index, &(selector, _))| (SELECTORS[selector].1, index))
            .map(|(_, &(_, red))| red)
            .unwrap();

        prop_assert_eq!(
            document.style().value("color"),
            Some(Value::Color(Color { r: winner, g: 0, b: 0, a: 255 }))
        );
    }
}
