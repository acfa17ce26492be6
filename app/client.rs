use crate::{error::Error, Context, PLUGIN_ROUTE_PREFIX};
use compression_board_util::error::Result;
use hyper::{header, Body, Request, Response, StatusCode};

/// The wasm-bindgen JS glue of the browser client, relative to the client directory.
pub const CLIENT_MODULE_FILE_NAME: &str = "compression_board_app_client.js";

/**
The ES module the host imports to show the tab. With a client bundle it boots the wasm client, which fetches the summary and draws the dashboard itself. Without one it fetches the server rendered page into the document.
*/
pub fn render_module_source(backend: &str, has_client: bool) -> String {
	if has_client {
		format!(
			r#"import init, {{ render as renderDashboard }} from "{prefix}/client/{module}";

export async function render() {{
	await init();
	renderDashboard("{backend}");
}}
"#,
			prefix = PLUGIN_ROUTE_PREFIX,
			module = CLIENT_MODULE_FILE_NAME,
			backend = backend,
		)
	} else {
		format!(
			r#"export async function render() {{
	const response = await fetch("{prefix}/");
	document.body.innerHTML = await response.text();
}}
"#,
			prefix = PLUGIN_ROUTE_PREFIX,
		)
	}
}

pub(crate) async fn render_module(context: &Context, _request: Request<Body>) -> Result<Response<Body>> {
	let source = render_module_source(
		context.options.chart_backend.key(),
		context.options.client_dir.is_some(),
	);
	Ok(Response::builder()
		.status(StatusCode::OK)
		.header(header::CONTENT_TYPE, "text/javascript")
		.body(Body::from(source))?)
}

fn content_type(path: &str) -> Option<&'static str> {
	if path.ends_with(".js") {
		Some("text/javascript")
	} else if path.ends_with(".wasm") {
		Some("application/wasm")
	} else if path.ends_with(".svg") {
		Some("image/svg+xml")
	} else if path.ends_with(".css") {
		Some("text/css")
	} else {
		None
	}
}

/// Serve a file from the client directory. Components that could leave the directory are rejected.
pub(crate) async fn static_file(
	context: &Context,
	_request: Request<Body>,
	path_components: &[&str],
) -> Result<Response<Body>> {
	let client_dir = context.options.client_dir.as_ref().ok_or(Error::NotFound)?;
	let is_safe = |component: &&str| {
		!component.is_empty() && *component != "." && *component != ".." && !component.contains('\\')
	};
	if path_components.is_empty() || !path_components.iter().all(is_safe) {
		return Err(Error::BadRequest.into());
	}
	let relative_path = path_components.join("/");
	let path = client_dir.join(&relative_path);
	let data = match tokio::fs::read(&path).await {
		Ok(data) => data,
		Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
			return Err(Error::NotFound.into())
		}
		Err(error) => return Err(error.into()),
	};
	let mut response = Response::builder().status(StatusCode::OK);
	if let Some(content_type) = content_type(&relative_path) {
		response = response.header(header::CONTENT_TYPE, content_type);
	}
	Ok(response.body(Body::from(data))?)
}

#[test]
fn test_render_module_source() {
	let source = render_module_source("primitive", true);
	assert!(source.starts_with(
		r#"import init, { render as renderDashboard } from "/data/plugin/compression/client/compression_board_app_client.js";"#
	));
	assert!(source.contains(r#"renderDashboard("primitive");"#));
	insta::assert_snapshot!(render_module_source("vector", false), @r###"
	export async function render() {
		const response = await fetch("/data/plugin/compression/");
		document.body.innerHTML = await response.text();
	}
	"###);
}

#[tokio::test]
async fn test_static_files() {
	let client_dir = tempfile::tempdir().unwrap();
	std::fs::write(
		client_dir.path().join(CLIENT_MODULE_FILE_NAME),
		"export default function init() {}",
	)
	.unwrap();
	let context = std::sync::Arc::new(crate::Context::new(
		crate::Options {
			host: std::net::IpAddr::from([127, 0, 0, 1]),
			port: 6006,
			logdir: std::path::PathBuf::from("runs"),
			reload_interval: None,
			client_dir: Some(client_dir.path().to_owned()),
			chart_backend: compression_board_charts::ChartBackend::Vector,
		},
		compression_board_scalars::ScalarStore::new(),
	));
	let response = crate::get(
		&context,
		"/data/plugin/compression/client/compression_board_app_client.js",
	)
	.await;
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.headers()[header::CONTENT_TYPE], "text/javascript");
	assert_eq!(
		crate::body_string(response).await,
		"export default function init() {}"
	);
	let response = crate::get(&context, "/data/plugin/compression/client/missing.wasm").await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	let response = crate::get(&context, "/data/plugin/compression/client/../Cargo.toml").await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let response = crate::get(&context, "/data/plugin/compression/render.js").await;
	let source = crate::body_string(response).await;
	assert!(source.contains("await init();"));
}

#[tokio::test]
async fn test_static_files_without_client_dir() {
	let context = crate::test_context(compression_board_scalars::ScalarStore::new());
	let response = crate::get(&context, "/data/plugin/compression/client/index.js").await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
