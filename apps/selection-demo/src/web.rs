//! Browser entry point.

use crate::app::{reset_loop, selection_loop, SelectionBoard};
use pointerwait_core::InputSettings;
use pointerwait_platform_web::{install_document_input, viewport_bounds};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));

    let input = Rc::new(install_document_input(InputSettings::default())?);
    let (min, max) = viewport_bounds()?;
    let board = Rc::new(SelectionBoard::new().with_bounds(min, max));

    spawn_local(selection_loop(Rc::clone(&input), Rc::clone(&board)));
    spawn_local(reset_loop(input, board));
    log::info!("selection demo running");
    Ok(())
}
