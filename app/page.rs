use crate::Context;
use compression_board_charts::ColorTokens;
use compression_board_dashboard::{render_dashboard, Action, DashboardState, DashboardViewOptions};
use compression_board_scalars::summary_response;
use compression_board_util::error::Result;
use html::{raw, HostNode, Node};
use hyper::{header, Body, Request, Response, StatusCode};

pub struct Document {
	/// The module that boots the browser client, if one is being served.
	pub client_module_src: Option<&'static str>,
	pub children: Vec<Node>,
}

impl From<Document> for Node {
	fn from(document: Document) -> Node {
		let client_script = document.client_module_src.map(|src| {
			HostNode::new("script")
				.attribute("type", "module")
				.child(raw!(format!(
					r#"import {{ render }} from "{}"; render();"#,
					src
				)))
		});
		HostNode::new("html")
			.attribute("lang", "en")
			.child(
				HostNode::new("head")
					.child(HostNode::empty("meta").attribute("charset", "utf-8"))
					.child(
						HostNode::empty("meta")
							.attribute("content", "width=device-width, initial-scale=1")
							.attribute("name", "viewport"),
					)
					.child(HostNode::new("title").child("Compression Board")),
			)
			.child(
				HostNode::new("body")
					.children(document.children)
					.child(client_script),
			)
			.into()
	}
}

/**
Render the dashboard from the current store. The page is complete without the browser client: every run is shown, sorting and filtering are left at their defaults, and charts are drawn at their default sizes with the default tokens.
*/
pub fn render_page(context: &Context, summary: compression_board_metrics::SummaryResponse) -> String {
	let state = DashboardState::new().apply(Action::Loaded(summary));
	let tokens = ColorTokens::default();
	let dashboard = render_dashboard(DashboardViewOptions {
		state: &state,
		tokens: &tokens,
		backend: context.options.chart_backend,
	});
	let client_module_src = context.options.client_dir.as_ref().map(|_| "./render.js");
	let document: Node = Document {
		client_module_src,
		children: vec![dashboard],
	}
	.into();
	format!("<!doctype html>{}", document)
}

pub(crate) async fn get(context: &Context, _request: Request<Body>) -> Result<Response<Body>> {
	let summary = {
		let store = context.store.read().await;
		summary_response(&crate::host_environment(&store))
	};
	let html = render_page(context, summary);
	Ok(Response::builder()
		.status(StatusCode::OK)
		.header(header::CONTENT_TYPE, "text/html; charset=utf-8")
		.body(Body::from(html))?)
}

#[tokio::test]
async fn test_page_renders_dashboard() {
	let logdir = tempfile::tempdir().unwrap();
	let benchmark = serde_json::json!({
		"alexnet": {
			"fp32": {"accuracy": 0.99, "model_size_mb": 200.0, "latency_mean_ms": 12.0},
			"int8": {"accuracy": 0.99, "model_size_mb": 10.0, "latency_mean_ms": 6.0}
		}
	});
	compression_board_writer::BenchmarkParser::new(0)
		.import(&benchmark, logdir.path())
		.unwrap();
	let store = crate::load_store(logdir.path().to_owned()).await.unwrap();
	let context = crate::test_context(store);
	let response = crate::get(&context, "/data/plugin/compression/").await;
	assert_eq!(response.status(), StatusCode::OK);
	let html = crate::body_string(response).await;
	assert!(html.starts_with("<!doctype html><html lang=\"en\">"));
	assert!(html.contains(r#"id="compressionDashboard""#));
	assert!(html.contains("1 of 1 runs"));
	assert!(html.contains("20.00x"));
	assert!(html.contains(r#"data-chart="paretoChart""#));
	assert!(!html.contains("<script"));
}

#[tokio::test]
async fn test_page_without_runs() {
	let context = crate::test_context(compression_board_scalars::ScalarStore::new());
	let response = crate::get(&context, "/data/plugin/compression/").await;
	let html = crate::body_string(response).await;
	assert!(html.contains(compression_board_dashboard::NO_DATA_MESSAGE));
}
