//! Browser front-end on top of 3Dmol.js.
//!
//! Expects the page to load 3Dmol.js and to contain `#searchBox`,
//! `#resultsTable tbody`, `#gpcrList` (a datalist) and a `#viewer`
//! container; `#scoresTable tbody` is optional. Options are read from an
//! optional `<script type="application/toml" id="explorerOptions">` block;
//! without one the defaults apply. The session lives in a `RefCell` and is
//! never borrowed across an `.await`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::Vec3;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Document, Element, Event, HtmlElement, HtmlInputElement, KeyboardEvent, Response};

use crate::error::{ExplorerError, FetchError, LoadError};
use crate::loader::LoadOutcome;
use crate::options::Options;
use crate::session::Session;
use crate::structure::Structure;
use crate::table::VIEW_LABEL;
use crate::viewer::{AtomSelector, AtomStyle, ColorScheme, MolViewer, ViewerSession};

#[wasm_bindgen]
extern "C" {
    type GLViewer;

    #[wasm_bindgen(js_namespace = ["$3Dmol"], js_name = createViewer)]
    fn create_viewer(element: &HtmlElement, config: &JsValue) -> GLViewer;

    #[wasm_bindgen(method)]
    fn clear(this: &GLViewer);
    #[wasm_bindgen(method, js_name = addModel)]
    fn add_model(this: &GLViewer, data: &str, format: &str) -> JsValue;
    #[wasm_bindgen(method, js_name = setStyle)]
    fn set_style(this: &GLViewer, selection: &JsValue, style: &JsValue);
    #[wasm_bindgen(method, js_name = addStyle)]
    fn add_style(this: &GLViewer, selection: &JsValue, style: &JsValue);
    #[wasm_bindgen(method, js_name = addLabel)]
    fn add_label(this: &GLViewer, text: &str, options: &JsValue) -> JsValue;
    #[wasm_bindgen(method, js_name = removeAllLabels)]
    fn remove_all_labels(this: &GLViewer);
    #[wasm_bindgen(method, js_name = setClickable)]
    fn set_clickable(this: &GLViewer, selection: &JsValue, clickable: bool, callback: &js_sys::Function);
    #[wasm_bindgen(method, js_name = zoomTo)]
    fn zoom_to(this: &GLViewer, selection: &JsValue);
    #[wasm_bindgen(method)]
    fn render(this: &GLViewer);
}

/// [`MolViewer`] backed by a 3Dmol.js `GLViewer`.
///
/// The model is handed to 3Dmol as PDB text written from the parsed atoms,
/// so 3Dmol serial `n` is atom index `n - 1` on both sides. Spatial queries
/// run against the Rust-side structure.
pub struct WebViewer {
    handle: GLViewer,
    structure: Option<Structure>,
    on_click: js_sys::Function,
}

impl WebViewer {
    fn new(element: &HtmlElement, background: &str, on_click: js_sys::Function) -> Self {
        let config = to_js(&json!({ "backgroundColor": background }));
        Self {
            handle: create_viewer(element, &config),
            structure: None,
            on_click,
        }
    }

    /// Atom index of a 3Dmol serial number.
    #[must_use]
    pub fn index_of_serial(&self, serial: u32) -> Option<usize> {
        let index = (serial as usize).checked_sub(1)?;
        self.structure.as_ref()?.atom(index).map(|_| index)
    }

    fn selection(&self, selector: &AtomSelector) -> JsValue {
        if *selector == AtomSelector::all() {
            return to_js(&json!({}));
        }
        let serials: Vec<usize> = self
            .structure
            .as_ref()
            .map(|s| {
                s.atoms()
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| selector.matches(a))
                    .map(|(i, _)| i + 1)
                    .collect()
            })
            .unwrap_or_default();
        to_js(&json!({ "serial": serials }))
    }
}

impl MolViewer for WebViewer {
    fn clear(&mut self) {
        self.handle.clear();
        self.structure = None;
    }

    fn add_model(&mut self, structure: Structure) {
        let _ = self.handle.add_model(&structure.to_pdb(), "pdb");
        self.structure = Some(structure);
    }

    fn structure(&self) -> Option<&Structure> {
        self.structure.as_ref()
    }

    fn set_style(&mut self, selector: &AtomSelector, style: &AtomStyle) {
        self.handle
            .set_style(&self.selection(selector), &to_js(&style_json(style)));
    }

    fn add_style(&mut self, selector: &AtomSelector, style: &AtomStyle) {
        self.handle
            .add_style(&self.selection(selector), &to_js(&style_json(style)));
    }

    fn add_label(&mut self, text: &str, position: Vec3) {
        let options = json!({
            "position": { "x": position.x, "y": position.y, "z": position.z },
            "backgroundOpacity": 0.8,
            "fontSize": 12,
        });
        let _ = self.handle.add_label(text, &to_js(&options));
    }

    fn remove_all_labels(&mut self) {
        self.handle.remove_all_labels();
    }

    fn enable_picking(&mut self) {
        self.handle
            .set_clickable(&to_js(&json!({})), true, &self.on_click);
    }

    fn zoom_to(&mut self, selector: Option<&AtomSelector>) {
        let selection = selector.map_or_else(|| to_js(&json!({})), |s| self.selection(s));
        self.handle.zoom_to(&selection);
    }

    fn render(&mut self) {
        self.handle.render();
    }
}

/// 3Dmol style object for `style`.
fn style_json(style: &AtomStyle) -> Value {
    let mut out = serde_json::Map::new();
    if let Some(cartoon) = &style.cartoon {
        let spec = match &cartoon.color {
            ColorScheme::Uniform(rgb) => json!({ "color": hex(*rgb) }),
            ColorScheme::BFactorSpectrum { min, max, .. } => json!({
                "colorscheme": { "prop": "b", "gradient": "roygb", "min": min, "max": max }
            }),
        };
        let _ = out.insert("cartoon".to_owned(), spec);
    }
    if let Some(stick) = style.stick {
        let _ = out.insert("stick".to_owned(), json!({ "radius": stick.radius }));
    }
    Value::Object(out)
}

fn hex(rgb: [f32; 3]) -> String {
    let [r, g, b] = rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn to_js(value: &Value) -> JsValue {
    js_sys::JSON::parse(&value.to_string()).unwrap_or(JsValue::NULL)
}

/// Fetch `url` as text with the browser `fetch` API.
async fn fetch_text(url: &str) -> Result<String, FetchError> {
    let transport = |e: JsValue| FetchError::Transport {
        reference: url.to_owned(),
        message: e.as_string().unwrap_or_else(|| format!("{e:?}")),
    };
    let window = web_sys::window().ok_or_else(|| transport(JsValue::from_str("no window")))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(transport)?
        .dyn_into()
        .map_err(transport)?;
    if !response.ok() {
        return Err(FetchError::Status {
            reference: url.to_owned(),
            status: response.status(),
        });
    }
    let text = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    text.as_string()
        .ok_or_else(|| transport(JsValue::from_str("response body is not text")))
}

struct App {
    document: Document,
    session: RefCell<Session<WebViewer>>,
}

impl App {
    fn element(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn alert(message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    /// Mirror the results table into `#resultsTable tbody`.
    fn render_results(&self, session: &Session<WebViewer>) {
        let Some(tbody) = self.element("#resultsTable tbody") else {
            return;
        };
        tbody.set_inner_html("");
        let table = session.table();
        for (index, row) in table.rows().iter().enumerate() {
            let Ok(tr) = self.document.create_element("tr") else {
                continue;
            };
            for cell in &row.cells {
                if let Ok(td) = self.document.create_element("td") {
                    td.set_text_content(Some(cell.display(table.missing_indicator())));
                    let _ = tr.append_child(&td);
                }
            }
            if let (Ok(td), Ok(button)) = (
                self.document.create_element("td"),
                self.document.create_element("button"),
            ) {
                button.set_text_content(Some(VIEW_LABEL));
                let _ = button.set_attribute("data-row", &index.to_string());
                let _ = td.append_child(&button);
                let _ = tr.append_child(&td);
            }
            let _ = tbody.append_child(&tr);
        }
    }

    /// Mirror the scores table into `#scoresTable tbody`, if present.
    fn render_scores(&self, session: &Session<WebViewer>) {
        let Some(tbody) = self.element("#scoresTable tbody") else {
            return;
        };
        tbody.set_inner_html("");
        let Some(scores) = session.scores() else {
            return;
        };
        let missing = session.table().missing_indicator();
        for row in scores.rows() {
            let Ok(tr) = self.document.create_element("tr") else {
                continue;
            };
            for text in [row.label.as_str(), row.value.display(missing)] {
                if let Ok(td) = self.document.create_element("td") {
                    td.set_text_content(Some(text));
                    let _ = tr.append_child(&td);
                }
            }
            let _ = tbody.append_child(&tr);
        }
    }

    /// Fill the `#gpcrList` datalist.
    fn render_suggestions(&self, session: &Session<WebViewer>) {
        let Some(list) = self.element("#gpcrList") else {
            return;
        };
        list.set_inner_html("");
        for receptor in session.suggestions() {
            if let Ok(option) = self.document.create_element("option") {
                let _ = option.set_attribute("value", &receptor);
                let _ = list.append_child(&option);
            }
        }
    }

    fn search(&self, query: &str) {
        let mut session = self.session.borrow_mut();
        session.search(query);
        self.render_results(&session);
        self.render_scores(&session);
    }

    fn atom_clicked(&self, serial: u32) {
        let mut session = self.session.borrow_mut();
        let index = session.viewer().and_then(|v| v.index_of_serial(serial));
        if let Some(index) = index {
            let _ = session.atom_clicked(index);
        }
    }
}

async fn load_dataset(app: Rc<App>) {
    let source = app.session.borrow().options().data.source.clone();
    let fetched = fetch_text(&source).await;
    let mut session = app.session.borrow_mut();
    let result = fetched
        .map_err(LoadError::from)
        .and_then(|payload| session.dataset_loaded(&payload));
    match result {
        Ok(_) => {
            app.render_results(&session);
            app.render_suggestions(&session);
        }
        Err(e) => {
            log::warn!("dataset load failed: {e}");
            App::alert(&format!("Could not load {source}: {e}"));
        }
    }
}

async fn open_row(app: Rc<App>, index: usize) {
    let request = {
        let mut session = app.session.borrow_mut();
        let request = session.select_row(index);
        app.render_scores(&session);
        request
    };
    let Some(request) = request else {
        return;
    };
    let fetched = fetch_text(request.location()).await;
    let outcome = app.session.borrow_mut().structure_fetched(&request, fetched);
    if let LoadOutcome::Failed(e) = outcome {
        App::alert(&format!("Could not load structure: {e}"));
    }
}

fn listen<E: FromWasmAbi + 'static>(
    target: &web_sys::EventTarget,
    event: &str,
    handler: impl FnMut(E) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::<dyn FnMut(E)>::new(handler);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire(app: &Rc<App>) -> Result<(), JsValue> {
    let search_box: HtmlInputElement = app
        .document
        .get_element_by_id("searchBox")
        .ok_or("missing #searchBox")?
        .dyn_into()?;

    let weak = Rc::downgrade(app);
    let input = search_box.clone();
    listen(&search_box, "input", move |_: Event| {
        if let Some(app) = weak.upgrade() {
            app.search(&input.value());
        }
    })?;

    let weak = Rc::downgrade(app);
    let input = search_box.clone();
    listen(&search_box, "keydown", move |e: KeyboardEvent| {
        if e.key() == "Enter" {
            e.prevent_default();
            if let Some(app) = weak.upgrade() {
                app.search(&input.value());
            }
        }
    })?;

    if let Some(tbody) = app.element("#resultsTable tbody") {
        let weak = Rc::downgrade(app);
        listen(&tbody, "click", move |e: Event| {
            let row = e
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.get_attribute("data-row"))
                .and_then(|r| r.parse::<usize>().ok());
            if let (Some(index), Some(app)) = (row, weak.upgrade()) {
                spawn_local(open_row(app, index));
            }
        })?;
    }

    if let Some(viewer) = app.document.get_element_by_id("viewer") {
        let weak = Rc::downgrade(app);
        listen(&viewer, "dblclick", move |_: Event| {
            if let Some(app) = weak.upgrade() {
                app.session.borrow_mut().double_clicked();
            }
        })?;
    }
    Ok(())
}

fn build_app(document: Document, viewer_element: HtmlElement, options: Options) -> Rc<App> {
    Rc::new_cyclic(|weak: &Weak<App>| {
        let clicked = weak.clone();
        let on_click = Closure::<dyn FnMut(JsValue)>::new(move |atom: JsValue| {
            let serial = js_sys::Reflect::get(&atom, &JsValue::from_str("serial"))
                .ok()
                .and_then(|v| v.as_f64());
            if let (Some(serial), Some(app)) = (serial, clicked.upgrade()) {
                app.atom_clicked(serial as u32);
            }
        })
        .into_js_value()
        .unchecked_into::<js_sys::Function>();

        let background = options.style.background.clone();
        let viewer = ViewerSession::new(move || {
            WebViewer::new(&viewer_element, &background, on_click.clone())
        });
        App {
            document,
            session: RefCell::new(Session::new(options, viewer)),
        }
    })
}

/// Options from the page's TOML block, or the defaults when it is absent or
/// blank.
fn page_options(block: Option<&str>) -> Result<Options, ExplorerError> {
    match block.map(str::trim) {
        Some(toml) if !toml.is_empty() => Options::from_toml(toml),
        _ => Ok(Options::default()),
    }
}

/// Entry point: install logging, wire the page and load the dataset.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("no document")?;
    let viewer_element: HtmlElement = document
        .get_element_by_id("viewer")
        .ok_or("missing #viewer")?
        .dyn_into()?;

    let block = document
        .get_element_by_id("explorerOptions")
        .and_then(|el| el.text_content());
    let options = page_options(block.as_deref()).map_err(|e| {
        log::error!("bad explorer options: {e}");
        JsValue::from_str(&e.to_string())
    })?;
    log::info!("dataset source: {}", options.data.source);

    let app = build_app(document, viewer_element, options);
    wire(&app)?;
    spawn_local(load_dataset(app));
    Ok(())
}
