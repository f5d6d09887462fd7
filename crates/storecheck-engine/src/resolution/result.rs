use storecheck_common::{ElementHandle, Locator};

/// A live element together with the locator that found it.
///
/// Only valid until the next navigation; never cache one across interactions.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub element: ElementHandle,
    pub locator: Locator,
}

/// Every element matched by the first successful locator of a set.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAll {
    pub elements: Vec<ElementHandle>,
    pub locator: Locator,
}

impl ResolvedAll {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn first(&self) -> Option<Resolved> {
        self.elements.first().map(|element| Resolved {
            element: *element,
            locator: self.locator.clone(),
        })
    }
}
