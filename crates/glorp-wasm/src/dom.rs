//! DOM window shells and taskbar mirroring
//!
//! Each live window becomes a `div.window` inside the desktop root with a
//! header (title plus minimize / maximize / close buttons carrying
//! `data-action`) and a body holding the content. The taskbar container is
//! rebuilt from the window manager's entries on every sync, so it can never
//! disagree with the windows.

use glorp_core::{WindowContent, WindowId, WindowManager};
use std::collections::BTreeSet;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlIFrameElement};

pub struct DomRenderer {
    document: Document,
    root: Element,
    taskbar: Element,
    mounted: BTreeSet<WindowId>,
}

impl DomRenderer {
    pub fn new(root_id: &str, taskbar_id: &str) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let root = document
            .get_element_by_id(root_id)
            .ok_or_else(|| JsValue::from_str(&format!("element #{root_id} not found")))?;
        let taskbar = document
            .get_element_by_id(taskbar_id)
            .ok_or_else(|| JsValue::from_str(&format!("element #{taskbar_id} not found")))?;

        Ok(Self {
            document,
            root,
            taskbar,
            mounted: BTreeSet::new(),
        })
    }

    /// Bring the DOM in line with the window manager
    pub fn sync(&mut self, wm: &WindowManager) -> Result<(), JsValue> {
        let stale: Vec<WindowId> = self.mounted.iter().filter(|id| !wm.contains(**id)).copied().collect();
        for id in stale {
            if let Some(element) = self.document.get_element_by_id(&id.to_string()) {
                element.remove();
            }
            self.mounted.remove(&id);
        }

        for window in wm.windows() {
            let element = match self.document.get_element_by_id(&window.id.to_string()) {
                Some(element) => element,
                None => {
                    let element = self.build_shell(window.id, &window.title, &window.content)?;
                    self.root.append_child(&element)?;
                    self.mounted.insert(window.id);
                    element
                }
            };

            let classes = element.class_list();
            classes.toggle_with_force("minimized", window.is_minimized())?;
            classes.toggle_with_force("fullscreen", window.is_fullscreen())?;
            classes.toggle_with_force("active", wm.focused() == Some(window.id))?;

            let style = element.dyn_ref::<HtmlElement>().map(HtmlElement::style);
            if let Some(style) = style {
                style.set_property("left", &format!("{}px", window.position.x))?;
                style.set_property("top", &format!("{}px", window.position.y))?;
                style.set_property("width", &format!("{}px", window.size.width))?;
                style.set_property("height", &format!("{}px", window.size.height))?;
                style.set_property("display", if window.is_visible() { "block" } else { "none" })?;
                let z = wm.z_index(window.id).unwrap_or(0);
                style.set_property("z-index", &z.to_string())?;
            }
        }

        self.sync_taskbar(wm)
    }

    fn build_shell(&self, id: WindowId, title: &str, content: &WindowContent) -> Result<Element, JsValue> {
        let shell = self.document.create_element("div")?;
        shell.set_id(&id.to_string());
        shell.set_class_name("window");

        let header = self.document.create_element("div")?;
        header.set_class_name("window-header");
        header.set_attribute("data-window", &id.to_string())?;

        let label = self.document.create_element("span")?;
        label.set_class_name("window-title");
        label.set_text_content(Some(title));
        header.append_child(&label)?;

        let controls = self.document.create_element("div")?;
        controls.set_class_name("window-controls");
        for action in ["minimize", "maximize", "close"] {
            let button = self.document.create_element("button")?;
            button.set_class_name(&format!("window-button {action}"));
            button.set_attribute("data-action", action)?;
            button.set_attribute("data-window", &id.to_string())?;
            controls.append_child(&button)?;
        }
        header.append_child(&controls)?;
        shell.append_child(&header)?;

        let body = self.document.create_element("div")?;
        body.set_class_name("window-content");
        match content {
            WindowContent::Markup(html) => body.set_inner_html(html),
            WindowContent::Embed { url } => {
                let frame = self.document.create_element("iframe")?.dyn_into::<HtmlIFrameElement>()?;
                frame.set_src(url);
                frame.set_attribute("style", "width: 100%; height: calc(100% - 40px); border: none;")?;
                body.append_child(&frame)?;
            }
            WindowContent::App(app) => {
                body.set_attribute("data-app", app.slug())?;
            }
        }
        shell.append_child(&body)?;
        Ok(shell)
    }

    fn sync_taskbar(&self, wm: &WindowManager) -> Result<(), JsValue> {
        self.taskbar.set_inner_html("");
        for entry in wm.taskbar().entries() {
            let item = self.document.create_element("div")?;
            item.set_class_name("taskbar-item");
            item.set_attribute("data-window", &entry.window_id.to_string())?;
            item.set_text_content(Some(&entry.title));
            let classes = item.class_list();
            classes.toggle_with_force("active", entry.active)?;
            classes.toggle_with_force("minimized", entry.minimized)?;
            self.taskbar.append_child(&item)?;
        }
        Ok(())
    }

    /// Canvas inside a game window's body, created on first use
    pub fn game_canvas(&self, id: WindowId, width: u32, height: u32) -> Result<web_sys::HtmlCanvasElement, JsValue> {
        let shell = self
            .document
            .get_element_by_id(&id.to_string())
            .ok_or_else(|| JsValue::from_str(&format!("{id} is not mounted")))?;
        let body = shell
            .last_element_child()
            .ok_or_else(|| JsValue::from_str(&format!("{id} has no body")))?;

        let canvas = self.document.create_element("canvas")?.dyn_into::<web_sys::HtmlCanvasElement>()?;
        canvas.set_width(width);
        canvas.set_height(height);
        canvas.set_class_name("game-canvas");
        body.set_inner_html("");
        body.append_child(&canvas)?;
        Ok(canvas)
    }
}
