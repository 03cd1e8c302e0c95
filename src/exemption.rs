/*!
 * Exempt regions.
 *
 * Text inside scripts, styles, form fields, code blocks or live editable
 * regions is never rewritten. The check walks from an element up through
 * every ancestor.
 */

use std::collections::HashSet;

use crate::document::{ElementCategory, ElementView, HasCategory, HasEditableFlag};

/// Set of element categories whose subtrees are opaque to substitution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExemptionPolicy {
    categories: HashSet<ElementCategory>,
}

impl Default for ExemptionPolicy {
    fn default() -> Self {
        Self::from_categories([
            ElementCategory::Script,
            ElementCategory::Style,
            ElementCategory::NoScript,
            ElementCategory::Input,
            ElementCategory::TextArea,
            ElementCategory::Code,
            ElementCategory::Pre,
        ])
    }
}

impl ExemptionPolicy {
    pub fn from_categories<I: IntoIterator<Item = ElementCategory>>(categories: I) -> Self {
        Self {
            categories: categories.into_iter().collect(),
        }
    }

    /// Build from tag names in any case (`"script"`, `"PRE"`, ...)
    pub fn from_tag_names<'a, I: IntoIterator<Item = &'a str>>(tags: I) -> Self {
        Self::from_categories(tags.into_iter().map(ElementCategory::from_tag_name))
    }

    pub fn contains(&self, category: &ElementCategory) -> bool {
        self.categories.contains(category)
    }

    /// Check one element on its own, without looking at its ancestors
    pub fn is_exempt_element<E: HasCategory + HasEditableFlag>(&self, element: &E) -> bool {
        element.is_content_editable() || self.contains(&element.category())
    }

    /// Walk from `element` through every ancestor; true as soon as one is
    /// exempt. `None` (no parent element) is never exempt.
    pub fn is_exempt<E: ElementView>(&self, element: Option<E>) -> bool {
        let mut current = element;
        while let Some(el) = current {
            if self.is_exempt_element(&el) {
                return true;
            }
            current = el.parent_element();
        }
        false
    }
}
