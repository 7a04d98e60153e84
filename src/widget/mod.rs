//! Browser binding for the navigator.
//!
//! `GridWidget` attaches to the grid's root element and drives a
//! [`Navigator`] from DOM input:
//! - `keydown`, `click` and `dblclick` listeners on the root element
//! - `setTimeout` for the delayed editor open
//! - The async Clipboard API for cut, copy and paste
//!
//! Unless the page calls `initLogging` first, `tracing` output at `warn` and
//! above goes to the browser console.
//!
//! Rendered cells are located by their `data-row-index` / `data-col-index`
//! attributes. Outbound events are queued while the shared state is borrowed
//! and delivered to the JS callback afterwards, so the callback may call back
//! into the widget.

mod console;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Function, Reflect};
use serde::Serialize;
use tracing::{debug, error};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Event, KeyboardEvent};

use crate::config::GridConfig;
use crate::coords::Coordinate;
use crate::error::GridError;
use crate::merge::MergeIndex;
use crate::navigation::{
    ClipboardRequest, EditorState, GridHost, KeyInput, KeyOutcome, Navigator, PendingCut,
    PendingPaste, TimerId,
};
use crate::types::{GridEvent, MergedCell, RowData};

const CELL_SELECTOR: &str = "[data-row-index][data-col-index]";

/// Route `tracing` output to the browser console, filtered by `directives`
/// (`EnvFilter` syntax, e.g. `"sheetgrid=debug"`).
///
/// Must run before the first `GridWidget` is created; returns false if
/// logging was already installed.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(directives: &str) -> bool {
    console::install(directives)
}

/// [`GridHost`] over the DOM.
struct DomHost {
    root: Element,
    queue: Vec<GridEvent<Element>>,
    /// Fires the pending delayed edit; installed once the shared state exists.
    timer_closure: Option<Closure<dyn FnMut()>>,
}

impl GridHost for DomHost {
    type Element = Element;

    fn dispatch(&mut self, event: GridEvent<Element>) {
        self.queue.push(event);
    }

    fn set_timeout(&mut self, delay_ms: u32) -> TimerId {
        let (Some(window), Some(closure)) = (web_sys::window(), self.timer_closure.as_ref())
        else {
            error!("no window to arm the editor timer on");
            return TimerId(-1);
        };
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay,
        ) {
            Ok(handle) => TimerId(handle),
            Err(e) => {
                error!("setTimeout failed: {e:?}");
                TimerId(-1)
            }
        }
    }

    fn clear_timeout(&mut self, id: TimerId) {
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(id.0);
        }
    }

    fn cell_element(&self, coords: Coordinate) -> Option<Element> {
        let selector = format!(
            "[data-row-index=\"{}\"][data-col-index=\"{}\"]",
            coords.row_index, coords.col_index
        );
        self.root.query_selector(&selector).ok().flatten()
    }
}

struct SharedState {
    navigator: Navigator<Element>,
    rows: Vec<RowData>,
    editor: Option<EditorState>,
    host: DomHost,
    callback: Option<Function>,
}

type State = Rc<RefCell<SharedState>>;
type Listener = (&'static str, Closure<dyn FnMut(Event)>);

/// Keyboard navigation and editing for a DOM-rendered grid.
#[wasm_bindgen]
pub struct GridWidget {
    state: State,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl GridWidget {
    /// Attach to `root` with a JSON [`GridConfig`].
    ///
    /// # Errors
    /// Throws if the configuration is malformed or inconsistent.
    #[wasm_bindgen(constructor)]
    pub fn new(root: Element, config_json: &str) -> Result<GridWidget, JsValue> {
        console_error_panic_hook::set_once();
        console::install(console::DEFAULT_FILTER);

        let navigator = GridConfig::from_json(config_json)?.build()?;
        let state = Rc::new(RefCell::new(SharedState {
            navigator,
            rows: Vec::new(),
            editor: None,
            host: DomHost {
                root: root.clone(),
                queue: Vec::new(),
                timer_closure: None,
            },
            callback: None,
        }));

        let timer_closure = {
            let weak = Rc::downgrade(&state);
            Closure::wrap(Box::new(move || {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                {
                    let mut s = state.borrow_mut();
                    let SharedState {
                        navigator, host, ..
                    } = &mut *s;
                    if let Some(timer) = navigator.pending_timer() {
                        navigator.on_delayed_edit_elapsed(host, timer);
                    }
                }
                flush(&state);
            }) as Box<dyn FnMut()>)
        };
        state.borrow_mut().host.timer_closure = Some(timer_closure);

        let listeners = attach_listeners(&root, &state);
        Ok(GridWidget { state, listeners })
    }

    /// Register the function receiving outbound events.
    #[wasm_bindgen(js_name = "setCallback")]
    pub fn set_callback(&self, callback: Function) {
        self.state.borrow_mut().callback = Some(callback);
    }

    /// Replace the row records.
    ///
    /// # Errors
    /// Throws if `rows` is not an array of objects.
    #[wasm_bindgen(js_name = "setRows")]
    pub fn set_rows(&self, rows: JsValue) -> Result<(), JsValue> {
        let rows: Vec<RowData> = serde_wasm_bindgen::from_value(rows)?;
        self.state.borrow_mut().rows = rows;
        Ok(())
    }

    /// Replace the merge regions.
    ///
    /// # Errors
    /// Throws if a region is malformed, overlaps another or leaves the grid.
    #[wasm_bindgen(js_name = "setMerges")]
    pub fn set_merges(&self, merges: JsValue) -> Result<(), JsValue> {
        let merges: Vec<MergedCell> = serde_wasm_bindgen::from_value(merges)?;
        let mut s = self.state.borrow_mut();
        let index = MergeIndex::validated(&merges, s.navigator.columns().len())?;
        s.navigator.set_merges(index);
        Ok(())
    }

    /// Report the external editor state; `null` or `undefined` when closed.
    ///
    /// # Errors
    /// Throws if `editor` is neither empty nor an editor state object.
    #[wasm_bindgen(js_name = "setEditorState")]
    pub fn set_editor_state(&self, editor: JsValue) -> Result<(), JsValue> {
        let editor = if editor.is_null() || editor.is_undefined() {
            None
        } else {
            Some(serde_wasm_bindgen::from_value::<EditorState>(editor)?)
        };
        self.state.borrow_mut().editor = editor;
        Ok(())
    }

    #[wasm_bindgen(js_name = "setInitialised")]
    pub fn set_initialised(&self, initialised: bool) {
        self.state.borrow_mut().navigator.set_initialised(initialised);
    }

    #[wasm_bindgen(js_name = "setSuppressControls")]
    pub fn set_suppress_controls(&self, suppress: bool) {
        self.state
            .borrow_mut()
            .navigator
            .set_suppress_controls(suppress);
    }

    /// Select a cell programmatically. Pass no indices to clear the selection.
    #[wasm_bindgen(js_name = "selectCell")]
    pub fn select_cell(
        &self,
        row_index: Option<i32>,
        col_index: Option<i32>,
        force: bool,
    ) -> bool {
        let coords = match (row_index, col_index) {
            (Some(r), Some(c)) => Coordinate::new(r, c),
            (None, None) => Coordinate::NONE,
            _ => {
                error!(?row_index, ?col_index, "partial coordinate passed to selectCell");
                return false;
            }
        };
        let committed = {
            let mut s = self.state.borrow_mut();
            let SharedState {
                navigator,
                rows,
                host,
                ..
            } = &mut *s;
            let target = host.cell_element(coords);
            navigator.select_cell(host, rows, coords, force, target)
        };
        flush(&self.state);
        committed
    }

    /// Write a value produced by the external editor.
    ///
    /// # Errors
    /// Throws if `value` cannot be represented as JSON.
    #[wasm_bindgen(js_name = "commitEdit")]
    pub fn commit_edit(
        &self,
        row_index: i32,
        col_index: i32,
        value: JsValue,
    ) -> Result<(), JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(value)?;
        {
            let mut s = self.state.borrow_mut();
            let SharedState {
                navigator,
                rows,
                host,
                ..
            } = &mut *s;
            navigator.commit_edit(host, rows, Coordinate::new(row_index, col_index), value);
        }
        flush(&self.state);
        Ok(())
    }

    /// Selected row index, or -1.
    #[wasm_bindgen(getter, js_name = "rowIndex")]
    pub fn row_index(&self) -> i32 {
        self.state.borrow().navigator.coords().row_index
    }

    /// Selected column index, or -1.
    #[wasm_bindgen(getter, js_name = "colIndex")]
    pub fn col_index(&self) -> i32 {
        self.state.borrow().navigator.coords().col_index
    }
}

impl Drop for GridWidget {
    fn drop(&mut self) {
        if let Some(root) = self.state.try_borrow().ok().map(|s| s.host.root.clone()) {
            for (kind, closure) in &self.listeners {
                let _ = root
                    .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            }
        }
        if let Ok(mut s) = self.state.try_borrow_mut() {
            let SharedState {
                navigator, host, ..
            } = &mut *s;
            navigator.teardown(host);
        }
    }
}

fn attach_listeners(root: &Element, state: &State) -> Vec<Listener> {
    let mut listeners: Vec<Listener> = Vec::new();

    let key_state = Rc::clone(state);
    listeners.push((
        "keydown",
        Closure::wrap(Box::new(move |event: Event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                if key_down(&key_state, &key_input(event)) {
                    event.prevent_default();
                }
            }
        }) as Box<dyn FnMut(Event)>),
    ));

    let click_state = Rc::clone(state);
    listeners.push((
        "click",
        Closure::wrap(Box::new(move |event: Event| {
            let Some((coords, cell)) = cell_from_event(&event) else {
                return;
            };
            {
                let mut s = click_state.borrow_mut();
                let SharedState {
                    navigator,
                    rows,
                    host,
                    ..
                } = &mut *s;
                navigator.handle_cell_click(host, rows, coords, Some(cell));
            }
            flush(&click_state);
        }) as Box<dyn FnMut(Event)>),
    ));

    let dblclick_state = Rc::clone(state);
    listeners.push((
        "dblclick",
        Closure::wrap(Box::new(move |event: Event| {
            let Some((coords, cell)) = cell_from_event(&event) else {
                return;
            };
            {
                let mut s = dblclick_state.borrow_mut();
                let SharedState {
                    navigator,
                    rows,
                    editor,
                    host,
                    ..
                } = &mut *s;
                navigator.handle_cell_double_click(
                    host,
                    rows,
                    editor.as_ref(),
                    coords,
                    Some(cell),
                );
            }
            flush(&dblclick_state);
        }) as Box<dyn FnMut(Event)>),
    ));

    for (kind, closure) in &listeners {
        root.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .ok();
    }
    listeners
}

fn key_input(event: &KeyboardEvent) -> KeyInput {
    KeyInput {
        key: event.key(),
        shift_key: event.shift_key(),
        ctrl_key: event.ctrl_key(),
        meta_key: event.meta_key(),
        alt_key: event.alt_key(),
    }
}

/// The rendered cell an event originated in, with its coordinate.
fn cell_from_event(event: &Event) -> Option<(Coordinate, Element)> {
    let target: Element = event.target()?.dyn_into().ok()?;
    let cell = target.closest(CELL_SELECTOR).ok().flatten()?;
    let row_index = cell.get_attribute("data-row-index")?.parse().ok()?;
    let col_index = cell.get_attribute("data-col-index")?.parse().ok()?;
    Some((Coordinate::new(row_index, col_index), cell))
}

fn key_down(state: &State, input: &KeyInput) -> bool {
    let outcome = {
        let mut s = state.borrow_mut();
        let SharedState {
            navigator,
            rows,
            editor,
            host,
            ..
        } = &mut *s;
        navigator.handle_key_down(host, rows, editor.as_ref(), input)
    };
    let handled = outcome.is_handled();
    if let KeyOutcome::Clipboard(request) = outcome {
        perform_clipboard(Rc::downgrade(state), request);
    }
    flush(state);
    handled
}

fn perform_clipboard(state: Weak<RefCell<SharedState>>, request: ClipboardRequest) {
    let Some(window) = web_sys::window() else {
        error!("no window for clipboard access");
        return;
    };
    let clipboard = window.navigator().clipboard();
    match request {
        ClipboardRequest::Write { text, cut } => {
            let promise = clipboard.write_text(&text);
            wasm_bindgen_futures::spawn_local(async move {
                let written = JsFuture::from(promise)
                    .await
                    .map(|_| ())
                    .map_err(|e| GridError::Clipboard(format!("{e:?}")));
                match cut {
                    Some(cut) => finish_cut(&state, cut, written),
                    None => {
                        if let Err(e) = written {
                            error!("copy failed: {e}");
                        }
                    }
                }
            });
        }
        ClipboardRequest::Read(paste) => {
            let promise = clipboard.read_text();
            wasm_bindgen_futures::spawn_local(async move {
                let read = JsFuture::from(promise)
                    .await
                    .map_err(|e| GridError::Clipboard(format!("{e:?}")))
                    .and_then(|text| {
                        text.as_string().ok_or_else(|| {
                            GridError::Clipboard("clipboard text is not a string".into())
                        })
                    });
                finish_paste(&state, paste, read);
            });
        }
    }
}

fn finish_cut(
    state: &Weak<RefCell<SharedState>>,
    cut: PendingCut,
    written: crate::error::Result<()>,
) {
    let Some(state) = state.upgrade() else {
        debug!("grid dropped before cut completed");
        return;
    };
    {
        let mut s = state.borrow_mut();
        let SharedState {
            navigator,
            rows,
            host,
            ..
        } = &mut *s;
        navigator.finish_cut(host, rows, cut, written);
    }
    flush(&state);
}

fn finish_paste(
    state: &Weak<RefCell<SharedState>>,
    paste: PendingPaste,
    read: crate::error::Result<String>,
) {
    let Some(state) = state.upgrade() else {
        debug!("grid dropped before paste completed");
        return;
    };
    {
        let mut s = state.borrow_mut();
        let SharedState {
            navigator,
            rows,
            host,
            ..
        } = &mut *s;
        navigator.finish_paste(host, rows, paste, read);
    }
    flush(&state);
}

/// Deliver queued events to the JS callback. Must be called with no borrow held.
fn flush(state: &State) {
    let (events, callback) = {
        let mut s = state.borrow_mut();
        (std::mem::take(&mut s.host.queue), s.callback.clone())
    };
    let Some(callback) = callback else {
        return;
    };
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    for event in events {
        let value = match event.serialize(&serializer) {
            Ok(value) => value,
            Err(e) => {
                error!("failed to serialize grid event: {e}");
                continue;
            }
        };
        if let Some(target) = event.target() {
            let _ = Reflect::set(&value, &JsValue::from_str("target"), target);
        }
        if let Err(e) = callback.call1(&JsValue::NULL, &value) {
            error!("grid event callback threw: {e:?}");
        }
    }
}
