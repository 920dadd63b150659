//! Breadcrumb trail for nested-page navigation.
//!
//! The trail is a client-maintained stack, not a tree walk: descending into
//! a nested page pushes, revisiting a page already on the trail truncates
//! everything after it, and selecting a root page resets to a single entry.

/// One visited page on the trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub page_uuid: String,
    pub page_name: String,
}

/// Segment of the condensed display form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Index into [`Breadcrumbs::entries`].
    Crumb(usize),
    Ellipsis,
}

#[derive(Debug, Clone, Default)]
pub struct Breadcrumbs {
    trail: Vec<Crumb>,
}

impl Breadcrumbs {
    pub fn root(page_uuid: impl Into<String>, page_name: impl Into<String>) -> Self {
        Self {
            trail: vec![Crumb {
                page_uuid: page_uuid.into(),
                page_name: page_name.into(),
            }],
        }
    }

    /// Drop the whole trail and start over at a single entry.
    pub fn reset(&mut self, page_uuid: impl Into<String>, page_name: impl Into<String>) {
        *self = Self::root(page_uuid, page_name);
    }

    /// Navigate to a page: truncate to an existing entry (inclusive) or
    /// push a new one.
    pub fn navigate(&mut self, page_uuid: &str, page_name: &str) {
        match self.trail.iter().position(|c| c.page_uuid == page_uuid) {
            Some(pos) => self.trail.truncate(pos + 1),
            None => self.trail.push(Crumb {
                page_uuid: page_uuid.to_string(),
                page_name: page_name.to_string(),
            }),
        }
    }

    pub fn entries(&self) -> &[Crumb] {
        &self.trail
    }

    pub fn len(&self) -> usize {
        self.trail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trail.is_empty()
    }

    pub fn current(&self) -> Option<&Crumb> {
        self.trail.last()
    }

    /// Keep the displayed name of the current entry in sync once the real
    /// page title arrives from the backend.
    pub fn set_current_name(&mut self, page_name: &str) {
        if let Some(last) = self.trail.last_mut() {
            last.page_name = page_name.to_string();
        }
    }

    /// Condensed display form: with four or more entries, only the first
    /// two and the last are shown around an ellipsis.
    pub fn condensed(&self) -> Vec<Segment> {
        if self.trail.len() < 4 {
            return (0..self.trail.len()).map(Segment::Crumb).collect();
        }
        vec![
            Segment::Crumb(0),
            Segment::Crumb(1),
            Segment::Ellipsis,
            Segment::Crumb(self.trail.len() - 1),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trail_of(crumbs: &Breadcrumbs) -> Vec<&str> {
        crumbs.entries().iter().map(|c| c.page_uuid.as_str()).collect()
    }

    #[test]
    fn test_navigate_pushes_new_pages() {
        let mut crumbs = Breadcrumbs::root("a", "A");
        crumbs.navigate("b", "B");
        crumbs.navigate("c", "C");
        assert_eq!(trail_of(&crumbs), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_navigate_truncates_to_existing_entry() {
        let mut crumbs = Breadcrumbs::root("a", "A");
        crumbs.navigate("b", "B");
        crumbs.navigate("c", "C");
        crumbs.navigate("d", "D");

        crumbs.navigate("b", "B");
        assert_eq!(trail_of(&crumbs), vec!["a", "b"]);

        // navigating to the current entry keeps it
        crumbs.navigate("b", "B");
        assert_eq!(trail_of(&crumbs), vec!["a", "b"]);
    }

    #[test]
    fn test_reset_discards_trail() {
        let mut crumbs = Breadcrumbs::root("a", "A");
        crumbs.navigate("b", "B");
        crumbs.reset("z", "Z");
        assert_eq!(trail_of(&crumbs), vec!["z"]);
    }

    #[test]
    fn test_condensed_short_trail_shows_all() {
        let mut crumbs = Breadcrumbs::root("a", "A");
        crumbs.navigate("b", "B");
        crumbs.navigate("c", "C");
        assert_eq!(
            crumbs.condensed(),
            vec![Segment::Crumb(0), Segment::Crumb(1), Segment::Crumb(2)]
        );
    }

    #[test]
    fn test_condensed_long_trail_elides_middle() {
        let mut crumbs = Breadcrumbs::root("a", "A");
        for id in ["b", "c", "d", "e"] {
            crumbs.navigate(id, id);
        }
        assert_eq!(
            crumbs.condensed(),
            vec![
                Segment::Crumb(0),
                Segment::Crumb(1),
                Segment::Ellipsis,
                Segment::Crumb(4)
            ]
        );
    }

    #[test]
    fn test_set_current_name() {
        let mut crumbs = Breadcrumbs::root("a", "");
        crumbs.set_current_name("Home");
        assert_eq!(crumbs.current().map(|c| c.page_name.as_str()), Some("Home"));
    }
}
