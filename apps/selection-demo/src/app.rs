//! Selection logic shared by the web entry point and the tests.

use pointerwait_core::{EventTarget, Point, PointerInput, Selection};
use std::cell::RefCell;
use std::rc::Rc;

/// Drags shorter than this on both axes count as clicks and are ignored.
pub const CLICK_TOLERANCE: u32 = 2;

#[derive(Debug, Default)]
pub struct SelectionBoard {
    selections: RefCell<Vec<(Point, Point)>>,
    preview: RefCell<Option<(Point, Point)>>,
    bounds: Option<(Point, Point)>,
}

impl SelectionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps selection ends inside the `[min, max]` box.
    pub fn with_bounds(mut self, min: Point, max: Point) -> Self {
        self.bounds = Some((min, max));
        self
    }

    /// Completed selections as normalised (top-left, bottom-right) corners.
    pub fn selections(&self) -> Vec<(Point, Point)> {
        self.selections.borrow().clone()
    }

    /// Rectangle of the drag in progress, if any.
    pub fn preview(&self) -> Option<(Point, Point)> {
        *self.preview.borrow()
    }

    fn clip(&self, span: Selection) -> Selection {
        match self.bounds {
            Some((min, max)) => span.clamp_end(min, max),
            None => span,
        }
    }

    fn clear(&self) {
        self.selections.borrow_mut().clear();
        self.preview.borrow_mut().take();
    }
}

/// Records one selection per primary-button drag.
pub async fn selection_loop<T>(input: Rc<PointerInput<T>>, board: Rc<SelectionBoard>)
where
    T: EventTarget + Clone,
{
    loop {
        let selection = {
            let board = Rc::clone(&board);
            input
                .wait_for_drag(move |span| {
                    *board.preview.borrow_mut() = Some(board.clip(span).rect());
                })
                .await
        };
        let selection = board.clip(selection);
        board.preview.borrow_mut().take();

        if selection.is_click(CLICK_TOLERANCE) {
            log::debug!("ignoring click at {:?}", selection.end);
            continue;
        }
        let rect = selection.rect();
        log::info!("selected {:?} .. {:?}", rect.0, rect.1);
        board.selections.borrow_mut().push(rect);
    }
}

/// Clears the board on every right click.
pub async fn reset_loop<T>(input: Rc<PointerInput<T>>, board: Rc<SelectionBoard>)
where
    T: EventTarget + Clone,
{
    loop {
        input.wait_for_right_button_down().await;
        log::info!("clearing {} selections", board.selections.borrow().len());
        board.clear();
    }
}
