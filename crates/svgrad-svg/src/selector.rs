//! Selector resolution against the document tree
//!
//! id → exact match on the `id` attribute, class → membership in the
//! whitespace-separated `class` attribute, tag → tag-name match. Selectors
//! may match any number of elements; matches come back in document order.

use crate::document::{Element, SvgDocument};
use svgrad_prompt::{SelectorKind, SelectorSpec};

/// Whether one element matches the selector.
#[must_use]
pub fn matches(element: &Element, selector: &SelectorSpec) -> bool {
    match selector.kind {
        SelectorKind::Id => element.attr("id") == Some(selector.value.as_str()),
        SelectorKind::Class => element.has_class(&selector.value),
        SelectorKind::Tag => element.name == selector.value,
    }
}

/// All matching elements in document order (the root included).
#[must_use]
pub fn find_all<'a>(doc: &'a SvgDocument, selector: &SelectorSpec) -> Vec<&'a Element> {
    let mut found = Vec::new();
    collect(doc.root(), selector, &mut found);
    found
}

fn collect<'a>(element: &'a Element, selector: &SelectorSpec, found: &mut Vec<&'a Element>) {
    if matches(element, selector) {
        found.push(element);
    }
    for child in element.child_elements() {
        collect(child, selector, found);
    }
}

/// Apply `f` to every matching element; returns the match count.
pub fn for_each_matching(
    doc: &mut SvgDocument,
    selector: &SelectorSpec,
    f: &mut impl FnMut(&mut Element),
) -> usize {
    fn walk(
        element: &mut Element,
        selector: &SelectorSpec,
        f: &mut impl FnMut(&mut Element),
    ) -> usize {
        let mut count = 0;
        if matches(element, selector) {
            f(element);
            count += 1;
        }
        for child in element.child_elements_mut() {
            count += walk(child, selector, f);
        }
        count
    }
    walk(doc.root_mut(), selector, f)
}
