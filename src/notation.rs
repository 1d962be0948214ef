//! Notation renderer boundary
//!
//! The sheet-music renderer is an external collaborator with a narrow
//! interface: load a MusicXML string, then render into its mount target.
//! A renderer instance must be fully torn down and recreated for every new
//! document, never reused; [`SheetView`] enforces that rule and clears any
//! previously displayed state when a load fails.

use crate::error::ClavierError;

/// External notation renderer.
pub trait NotationRenderer {
    /// Load a MusicXML document. A rejection surfaces to the user as inline
    /// error text via [`ClavierError::RenderError`].
    fn load(&mut self, xml: &str) -> Result<(), ClavierError>;
    fn render(&mut self);
}

/// Owns the current renderer instance and the teardown-and-recreate policy.
pub struct SheetView<R, F>
where
    F: FnMut() -> R,
{
    factory: F,
    renderer: Option<R>,
}

impl<R, F> SheetView<R, F>
where
    R: NotationRenderer,
    F: FnMut() -> R,
{
    /// `factory` constructs a fresh renderer against the mount target.
    pub fn new(factory: F) -> Self {
        SheetView {
            factory,
            renderer: None,
        }
    }

    /// Display a new document.
    ///
    /// Any previous renderer is dropped before a fresh one is created. On
    /// failure no renderer is kept, so stale notation never lingers behind
    /// an error message.
    pub fn load_document(&mut self, xml: &str) -> Result<(), ClavierError> {
        self.renderer = None;

        let mut renderer = (self.factory)();
        renderer.load(xml)?;
        renderer.render();
        self.renderer = Some(renderer);
        Ok(())
    }

    /// Tear down the current renderer, if any.
    pub fn clear(&mut self) {
        self.renderer = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.renderer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeRenderer;

    impl NotationRenderer for FakeRenderer {
        fn load(&mut self, xml: &str) -> Result<(), ClavierError> {
            if xml.is_empty() {
                return Err(ClavierError::RenderError("unreadable document".to_string()));
            }
            Ok(())
        }
        fn render(&mut self) {}
    }

    #[test]
    fn test_each_load_creates_a_fresh_renderer() {
        let instances = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&instances);
        let mut view = SheetView::new(move || {
            counter.set(counter.get() + 1);
            FakeRenderer
        });

        view.load_document("<score-partwise/>").unwrap();
        view.load_document("<score-partwise/>").unwrap();
        assert!(view.is_loaded());
        assert_eq!(instances.get(), 2);
    }

    #[test]
    fn test_failed_load_leaves_no_stale_state() {
        let mut view = SheetView::new(|| FakeRenderer);

        view.load_document("<score-partwise/>").unwrap();
        assert!(view.is_loaded());

        let err = view.load_document("").unwrap_err();
        assert!(matches!(err, ClavierError::RenderError(_)));
        assert!(!view.is_loaded());
    }
}
