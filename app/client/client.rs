/*!
The browser side of the compression dashboard. The host imports `render.js`, which calls [`render`](fn.render.html). The client fetches the summary once, keeps a [`DashboardState`](../compression_board_dashboard/struct.DashboardState.html), and redraws the parts of the page an action touches. Charts are redrawn one animation frame after a layout change so their containers can be measured.
*/

use compression_board_charts::{
	build_series, export_svg, place_tooltip, render_tooltip, svg_file_name, tooltip_content,
	ChartBackend, ChartId, ColorTokens, HostStyleTheme, Point, ThemeProvider, ThemeRole,
	EMPTY_CHART_MESSAGE,
};
use compression_board_dashboard::{
	default_chart_size, export_csv, render_chart_body, render_dashboard, render_main, stylesheet,
	Action, CardId, DashboardState, DashboardViewOptions, ExportError, SortColumn, TableId,
};
use compression_board_metrics::{parse_summary, Precision, SummaryResponse};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::JsFuture;
use web_sys::{console, Document, Element, HtmlElement, HtmlInputElement, Window};

mod dom;
mod host_theme;

const SUMMARY_URL: &str = "/data/plugin/compression/api/summary";
const MOUNT_ID: &str = "compressionBoardMount";
const TOOLTIP_ID: &str = "compressionTooltipLayer";

/// Which part of the page an action invalidates.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Update {
	All,
	Sidebar,
	SidebarAndMain,
	Main,
}

impl Update {
	fn for_action(action: &Action) -> Update {
		match action {
			Action::Loaded(_) | Action::LoadFailed(_) => Update::All,
			Action::Search(_) => Update::Sidebar,
			Action::ToggleRun(_) | Action::SelectAll | Action::DeselectAll => Update::SidebarAndMain,
			Action::SortBy(_) | Action::ToggleChartExpanded(_) | Action::ToggleCard(_) => Update::Main,
		}
	}

	/// Every update that rebuilds the main area draws charts at their default size first.
	fn redraws_charts(self) -> bool {
		self != Update::Sidebar
	}
}

/// What a click asks for. Exports read the state but do not change it.
enum Command {
	Dispatch(Action),
	ExportCsv(TableId),
	ExportSvg(ChartId),
}

struct App {
	window: Window,
	document: Document,
	mount: Element,
	tooltip: HtmlElement,
	state: DashboardState,
	tokens: ColorTokens,
	backend: ChartBackend,
}

type AppHandle = Rc<RefCell<App>>;

impl App {
	fn view_options(&self) -> DashboardViewOptions<'_> {
		DashboardViewOptions {
			state: &self.state,
			tokens: &self.tokens,
			backend: self.backend,
		}
	}

	fn render_all(&self) {
		let html = render_dashboard(self.view_options()).to_string();
		self.mount.set_inner_html(&html);
	}

	fn render_main(&self) {
		if let Some(main) = self.document.get_element_by_id("dashboardMain") {
			let html = render_main(&self.state, &self.tokens, self.backend).to_string();
			main.set_inner_html(&html);
		}
	}

	/// Update the run list in place so the search field keeps its focus.
	fn sync_sidebar(&self) -> Result<(), JsValue> {
		for item in dom::query_all(&self.mount, ".run-item")? {
			let run = match item.get_attribute("data-run") {
				Some(run) => run,
				None => continue,
			};
			if let Some(item) = item.dyn_ref::<HtmlElement>() {
				item.set_hidden(!self.state.matches_search(&run));
			}
			if let Some(checkbox) = item.query_selector(".run-checkbox")? {
				if let Some(checkbox) = checkbox.dyn_ref::<HtmlInputElement>() {
					checkbox.set_checked(self.state.is_visible(&run));
				}
			}
		}
		if let Some(run_count) = self.document.get_element_by_id("runCount") {
			run_count.set_text_content(Some(&self.state.run_count_label()));
		}
		Ok(())
	}

	fn chart_size(&self, chart: ChartId, body: &Element) -> (f64, f64) {
		let (default_width, height) = default_chart_size(self.state.expanded_chart == Some(chart));
		let width = f64::from(body.client_width());
		let width = if width > 0.0 { width } else { default_width };
		(width, height)
	}

	fn redraw_charts(&self) {
		for chart in ChartId::ALL.iter().copied() {
			let body = match self.document.get_element_by_id(chart.element_id()) {
				Some(body) => body,
				None => continue,
			};
			let (width, height) = self.chart_size(chart, &body);
			let node = render_chart_body(&self.state, chart, &self.tokens, self.backend, width, height);
			body.set_inner_html(&node.to_string());
		}
	}

	/// Patch colors of the rendered page in place, the way `restyle` does for a node tree.
	fn restyle(&self) -> Result<(), JsValue> {
		if let Some(style) = self.mount.query_selector("style")? {
			style.set_text_content(Some(&stylesheet(&self.tokens)));
		}
		let selector = format!("[{}]", ThemeRole::ATTRIBUTE);
		for element in dom::query_all(&self.mount, &selector)? {
			let role = element
				.get_attribute(ThemeRole::ATTRIBUTE)
				.and_then(|key| ThemeRole::from_key(&key));
			if let Some(role) = role {
				let (attribute, value) = role.paint(&self.tokens);
				element.set_attribute(attribute, &value)?;
				if role == ThemeRole::Text || role == ThemeRole::SecondaryText {
					element.set_attribute("font-family", &self.tokens.font_family)?;
				}
			}
		}
		Ok(())
	}

	fn export_csv(&self, table: TableId) -> Result<(), JsValue> {
		let rows = self.state.visible_rows();
		match export_csv(table, &rows) {
			Ok(csv) => dom::download(&self.document, &csv, "text/csv", table.csv_file_name()),
			Err(ExportError::NoRunsSelected) => self
				.window
				.alert_with_message(&ExportError::NoRunsSelected.to_string()),
			Err(error) => Err(JsValue::from_str(&error.to_string())),
		}
	}

	fn export_svg(&self, chart: ChartId) -> Result<(), JsValue> {
		let (width, height) = match self.document.get_element_by_id(chart.element_id()) {
			Some(body) => self.chart_size(chart, &body),
			None => default_chart_size(false),
		};
		let node = render_chart_body(&self.state, chart, &self.tokens, self.backend, width, height);
		match export_svg(&node) {
			Some(svg) => dom::download(
				&self.document,
				&svg,
				"image/svg+xml",
				&svg_file_name(chart.title()),
			),
			None => self.window.alert_with_message(EMPTY_CHART_MESSAGE),
		}
	}

	fn show_tooltip(&self, marker: &Element, event: &web_sys::MouseEvent) -> Result<(), JsValue> {
		let chart = marker
			.closest("svg[data-chart]")?
			.and_then(|svg| svg.get_attribute("data-chart"))
			.and_then(|id| ChartId::from_element_id(&id));
		let run = marker.get_attribute("data-run");
		let precision = marker
			.get_attribute("data-precision")
			.and_then(|segment| Precision::from_segment(&segment));
		let (chart, run, precision) = match (chart, run, precision) {
			(Some(chart), Some(run), Some(precision)) => (chart, run, precision),
			_ => return Ok(()),
		};
		let view = match self.state.all_runs.iter().find(|view| view.run() == run) {
			Some(view) => view,
			None => return Ok(()),
		};
		let rows: Vec<_> = self.state.visible_rows().into_iter().cloned().collect();
		let series = build_series(chart, &rows, &self.state.colors);
		let point = match series
			.get(precision)
			.iter()
			.find(|point| point.run == run)
		{
			Some(point) => point,
			None => return Ok(()),
		};
		let content = tooltip_content(chart, point, view);
		self.tooltip
			.set_inner_html(&render_tooltip(&content, &self.tokens).to_string());
		self.tooltip.set_hidden(false);
		let size = (
			f64::from(self.tooltip.offset_width()),
			f64::from(self.tooltip.offset_height()),
		);
		let viewport = (
			self.window.inner_width()?.as_f64().unwrap_or(0.0),
			self.window.inner_height()?.as_f64().unwrap_or(0.0),
		);
		let cursor = Point {
			x: f64::from(event.client_x()),
			y: f64::from(event.client_y()),
		};
		let position = place_tooltip(cursor, size, viewport);
		let style = self.tooltip.style();
		style.set_property("left", &format!("{}px", position.x))?;
		style.set_property("top", &format!("{}px", position.y))?;
		Ok(())
	}

	fn hide_tooltip(&self) {
		self.tooltip.set_hidden(true);
	}
}

fn log_error(error: &JsValue) {
	console::error_2(&JsValue::from_str("compression board:"), error);
}

fn dispatch(app: &AppHandle, action: Action) {
	let update = Update::for_action(&action);
	let result = {
		let mut app = app.borrow_mut();
		let state = std::mem::take(&mut app.state);
		app.state = state.apply(action);
		match update {
			Update::All => {
				app.render_all();
				Ok(())
			}
			Update::Sidebar => app.sync_sidebar(),
			Update::SidebarAndMain => {
				app.render_main();
				app.sync_sidebar()
			}
			Update::Main => {
				app.render_main();
				Ok(())
			}
		}
	};
	if let Err(error) = result {
		log_error(&error);
	}
	if update.redraws_charts() {
		if let Err(error) = schedule_chart_redraw(app) {
			log_error(&error);
		}
	}
}

/// Redraw charts on the next frame, once the browser has laid out their containers. A second request before then draws twice.
fn schedule_chart_redraw(app: &AppHandle) -> Result<(), JsValue> {
	let window = app.borrow().window.clone();
	let app = app.clone();
	let callback = Closure::once_into_js(move || {
		app.borrow().redraw_charts();
	});
	window.request_animation_frame(callback.unchecked_ref())?;
	Ok(())
}

fn click_command(target: &Element) -> Option<Command> {
	if let Some(button) = target.closest("[data-action]").ok().flatten() {
		let action = button.get_attribute("data-action")?;
		let key = button.get_attribute("data-target");
		return match action.as_str() {
			"select-all" => Some(Command::Dispatch(Action::SelectAll)),
			"deselect-all" => Some(Command::Dispatch(Action::DeselectAll)),
			"toggle-card" => CardId::from_key(&key?).map(|card| Command::Dispatch(Action::ToggleCard(card))),
			"expand-chart" => ChartId::from_element_id(&key?)
				.map(|chart| Command::Dispatch(Action::ToggleChartExpanded(chart))),
			"export-csv" => TableId::from_key(&key?).map(Command::ExportCsv),
			"export-svg" => ChartId::from_element_id(&key?).map(Command::ExportSvg),
			_ => None,
		};
	}
	let header = target.closest("[data-sort]").ok().flatten()?;
	let column = SortColumn::from_key(&header.get_attribute("data-sort")?)?;
	Some(Command::Dispatch(Action::SortBy(column)))
}

fn event_target(event: &web_sys::Event) -> Option<Element> {
	event.target()?.dyn_into::<Element>().ok()
}

/// Listen on the mount element once. Its contents are replaced on every render, so listeners are delegated.
fn wire_events(app: &AppHandle) -> Result<(), JsValue> {
	let mount = app.borrow().mount.clone();

	let handle = app.clone();
	let on_click = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
		let command = match event_target(&event).and_then(|target| click_command(&target)) {
			Some(command) => command,
			None => return,
		};
		let result = match command {
			Command::Dispatch(action) => {
				dispatch(&handle, action);
				Ok(())
			}
			Command::ExportCsv(table) => handle.borrow().export_csv(table),
			Command::ExportSvg(chart) => handle.borrow().export_svg(chart),
		};
		if let Err(error) = result {
			log_error(&error);
		}
	});
	mount.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
	on_click.forget();

	let handle = app.clone();
	let on_change = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
		let run = event_target(&event)
			.filter(|target| target.class_list().contains("run-checkbox"))
			.and_then(|target| target.get_attribute("data-run"));
		if let Some(run) = run {
			dispatch(&handle, Action::ToggleRun(run));
		}
	});
	mount.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
	on_change.forget();

	let handle = app.clone();
	let on_input = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
		let term = event_target(&event)
			.filter(|target| target.id() == "runSearch")
			.and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
			.map(|input| input.value());
		if let Some(term) = term {
			dispatch(&handle, Action::Search(term));
		}
	});
	mount.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
	on_input.forget();

	let handle = app.clone();
	let on_mouse_over = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
		let marker = event
			.target()
			.and_then(|target| target.dyn_into::<Element>().ok())
			.and_then(|target| target.closest(".marker").ok().flatten());
		if let Some(marker) = marker {
			if let Err(error) = handle.borrow().show_tooltip(&marker, &event) {
				log_error(&error);
			}
		}
	});
	mount.add_event_listener_with_callback("mouseover", on_mouse_over.as_ref().unchecked_ref())?;
	on_mouse_over.forget();

	let handle = app.clone();
	let on_mouse_out = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
		let left_marker = event_target(&event)
			.map(|target| target.closest(".marker").ok().flatten().is_some())
			.unwrap_or(false);
		if left_marker {
			handle.borrow().hide_tooltip();
		}
	});
	mount.add_event_listener_with_callback("mouseout", on_mouse_out.as_ref().unchecked_ref())?;
	on_mouse_out.forget();

	Ok(())
}

/// Follow the theme provider. Only the interface is used here; how it learns about changes is its own business.
fn connect_theme(app: &AppHandle, provider: &mut dyn ThemeProvider) {
	app.borrow_mut().tokens = provider.current_tokens();
	let app = app.clone();
	provider.on_change(Box::new(move |tokens: &ColorTokens| {
		let mut app = match app.try_borrow_mut() {
			Ok(app) => app,
			Err(_) => {
				console::warn_1(&JsValue::from_str("compression board: skipped a theme change during a render"));
				return;
			}
		};
		app.tokens = tokens.clone();
		if let Err(error) = app.restyle() {
			log_error(&error);
		}
	}));
}

fn js_error(value: JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

async fn fetch_summary(window: &Window) -> Result<SummaryResponse, String> {
	let response = JsFuture::from(window.fetch_with_str(SUMMARY_URL))
		.await
		.map_err(js_error)?;
	let response: web_sys::Response = response.dyn_into().map_err(js_error)?;
	if !response.ok() {
		return Err(format!("the summary request failed with status {}", response.status()));
	}
	let text = JsFuture::from(response.text().map_err(js_error)?)
		.await
		.map_err(js_error)?;
	let text = text.as_string().ok_or("the summary response was not text")?;
	parse_summary(&text).map_err(|error| error.to_string())
}

async fn load(app: AppHandle) {
	let window = app.borrow().window.clone();
	let action = match fetch_summary(&window).await {
		Ok(summary) => {
			console::log_1(&JsValue::from_str(&format!(
				"compression board: loaded {} runs",
				summary.runs.len()
			)));
			Action::Loaded(summary)
		}
		Err(message) => Action::LoadFailed(message),
	};
	dispatch(&app, action);
}

/// Replace a server rendered dashboard, if there is one, with a fresh mount point.
fn create_mount(document: &Document) -> Result<Element, JsValue> {
	if let Some(rendered) = document.get_element_by_id("compressionDashboard") {
		rendered.remove();
	}
	let body = document.body().ok_or_else(|| JsValue::from_str("the document has no body"))?;
	let mount = match document.get_element_by_id(MOUNT_ID) {
		Some(mount) => mount,
		None => {
			let mount = document.create_element("div")?;
			mount.set_id(MOUNT_ID);
			body.append_child(&mount)?;
			mount
		}
	};
	Ok(mount)
}

fn create_tooltip(document: &Document) -> Result<HtmlElement, JsValue> {
	let body = document.body().ok_or_else(|| JsValue::from_str("the document has no body"))?;
	let tooltip: HtmlElement = document.create_element("div")?.dyn_into()?;
	tooltip.set_id(TOOLTIP_ID);
	tooltip.set_hidden(true);
	let style = tooltip.style();
	style.set_property("position", "fixed")?;
	style.set_property("pointer-events", "none")?;
	style.set_property("z-index", "1000")?;
	body.append_child(&tooltip)?;
	Ok(tooltip)
}

#[wasm_bindgen]
pub fn render(backend: &str) -> Result<(), JsValue> {
	console_error_panic_hook::set_once();
	let backend = ChartBackend::from_key(backend).unwrap_or_default();
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("there is no window"))?;
	let document = window
		.document()
		.ok_or_else(|| JsValue::from_str("there is no document"))?;
	let mount = create_mount(&document)?;
	let tooltip = create_tooltip(&document)?;
	let app = Rc::new(RefCell::new(App {
		window: window.clone(),
		document,
		mount,
		tooltip,
		state: DashboardState::new(),
		tokens: ColorTokens::default(),
		backend,
	}));
	let theme = Rc::new(RefCell::new(HostStyleTheme::new(
		&host_theme::sample_host_styles(&window),
	)));
	connect_theme(&app, &mut *theme.borrow_mut());
	host_theme::observe(theme, &window)?;
	app.borrow().render_all();
	wire_events(&app)?;
	wasm_bindgen_futures::spawn_local(load(app));
	Ok(())
}

#[test]
fn test_updates_for_actions() {
	assert_eq!(Update::for_action(&Action::Search("res".to_owned())), Update::Sidebar);
	assert!(!Update::Sidebar.redraws_charts());
	assert_eq!(Update::for_action(&Action::SelectAll), Update::SidebarAndMain);
	assert_eq!(
		Update::for_action(&Action::ToggleChartExpanded(ChartId::Latency)),
		Update::Main
	);
	assert!(Update::Main.redraws_charts());
	assert_eq!(
		Update::for_action(&Action::LoadFailed("offline".to_owned())),
		Update::All
	);
}
