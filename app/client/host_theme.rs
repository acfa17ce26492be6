use compression_board_charts::{HostStyleSample, HostStyleTheme};
use std::{
	cell::{Cell, RefCell},
	rc::Rc,
};
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{console, Document, Element, MutationObserver, MutationObserverInit, Window};

const DEBOUNCE_MS: i32 = 100;
const POLL_MS: i32 = 500;

/// The window whose document hosts the dashboard: the parent frame when it can be read, otherwise this window.
fn host_window(window: &Window) -> Window {
	match window.parent() {
		Ok(Some(parent)) if host_document(&parent).is_some() => parent,
		_ => window.clone(),
	}
}

/// A cross origin parent throws on access, so read its document through `Reflect`.
fn host_document(window: &Window) -> Option<Document> {
	js_sys::Reflect::get(window, &JsValue::from_str("document"))
		.ok()?
		.dyn_into::<Document>()
		.ok()
}

fn computed(window: &Window, element: &Element, property: &str) -> Option<String> {
	let style = window.get_computed_style(element).ok()??;
	let value = style.get_property_value(property).ok()?;
	let value = value.trim();
	if value.is_empty() {
		None
	} else {
		Some(value.to_owned())
	}
}

fn is_transparent(value: &str) -> bool {
	value == "transparent" || value == "rgba(0, 0, 0, 0)"
}

/// Host elements only. The dashboard's own cards and sidebar would just echo the current tokens.
fn outside_dashboard(element: &Element) -> bool {
	!matches!(element.closest("#compressionBoardMount"), Ok(Some(_)))
}

fn find_all(document: &Document, selectors: &[&str]) -> Vec<Element> {
	selectors
		.iter()
		.filter_map(|selector| document.query_selector(selector).ok().flatten())
		.filter(outside_dashboard)
		.collect()
}

pub fn sample_host_styles(window: &Window) -> HostStyleSample {
	let window = host_window(window);
	let document = match host_document(&window) {
		Some(document) => document,
		None => return HostStyleSample::default(),
	};
	let body: Element = match document.body() {
		Some(body) => body.into(),
		None => return HostStyleSample::default(),
	};
	let content = find_all(
		&document,
		&[".tb-main-content", ".main-content", "[class*=\"content\"]"],
	)
	.into_iter()
	.next()
	.unwrap_or_else(|| body.clone());
	let sidebar = find_all(&document, &[".tb-sidebar", ".sidebar", "[class*=\"sidebar\"]"])
		.into_iter()
		.next()
		.unwrap_or_else(|| body.clone());
	let background = computed(&window, &sidebar, "background-color")
		.filter(|color| !is_transparent(color))
		.or_else(|| computed(&window, &body, "background-color"));
	let text = computed(&window, &content, "color").or_else(|| computed(&window, &body, "color"));
	let font_family = computed(&window, &content, "font-family");
	let font_size = computed(&window, &content, "font-size");
	let border = find_all(
		&document,
		&[".card", "[class*=\"card\"]", "table", "td", "th", "[class*=\"border\"]"],
	)
	.into_iter()
	.chain(std::iter::once(content.clone()))
	.filter_map(|element| computed(&window, &element, "border-top-color"))
	.find(|color| !is_transparent(color) && Some(color) != background.as_ref());
	let card = find_all(&document, &[".card", "[class*=\"card\"]"])
		.into_iter()
		.next()
		.and_then(|card| computed(&window, &card, "background-color"));
	HostStyleSample {
		background,
		text,
		font_family,
		font_size,
		border,
		card,
	}
}

/**
Keep `theme` in sync with the host document. Attribute changes on the host's root and body are debounced, and a slow poll catches style changes no attribute reveals.
*/
pub fn observe(theme: Rc<RefCell<HostStyleTheme>>, window: &Window) -> Result<(), JsValue> {
	let refresh = {
		let window = window.clone();
		Closure::<dyn FnMut()>::new(move || {
			let sample = sample_host_styles(&window);
			if let Ok(mut theme) = theme.try_borrow_mut() {
				theme.update(&sample);
			}
		})
	};
	let refresh_fn: js_sys::Function = refresh.as_ref().unchecked_ref::<js_sys::Function>().clone();
	refresh.forget();

	let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let on_mutation = {
		let window = window.clone();
		let refresh_fn = refresh_fn.clone();
		Closure::<dyn FnMut()>::new(move || {
			if let Some(handle) = pending.take() {
				window.clear_timeout_with_handle(handle);
			}
			match window.set_timeout_with_callback_and_timeout_and_arguments_0(&refresh_fn, DEBOUNCE_MS) {
				Ok(handle) => pending.set(Some(handle)),
				Err(error) => console::error_1(&error),
			}
		})
	};
	let observer = MutationObserver::new(on_mutation.as_ref().unchecked_ref())?;
	on_mutation.forget();
	if let Some(document) = host_document(&host_window(window)) {
		let options = MutationObserverInit::new();
		options.set_attributes(true);
		options.set_attribute_filter(&js_sys::Array::of3(
			&"class".into(),
			&"style".into(),
			&"data-theme".into(),
		));
		if let Some(root) = document.document_element() {
			observer.observe_with_options(&root, &options)?;
		}
		if let Some(body) = document.body() {
			observer.observe_with_options(&body, &options)?;
		}
	}

	window.set_interval_with_callback_and_timeout_and_arguments_0(&refresh_fn, POLL_MS)?;
	Ok(())
}
