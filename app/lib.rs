/*!
This crate is the compression plugin and a small host that serves it. The plugin answers a readiness check, describes its tab in the plugins listing, and mounts its routes under `/data/plugin/compression`. The host keeps the log directory loaded in a shared [`ScalarStore`](../compression_board_scalars/struct.ScalarStore.html) and reloads it periodically.
*/

use self::{error::Error, plugin::PLUGIN_NAME};
use compression_board_charts::ChartBackend;
use compression_board_scalars::ScalarStore;
use compression_board_util::error::Result;
use hyper::{Body, Method, Request, Response, StatusCode};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::RwLock;

mod api;
mod client;
mod error;
mod page;
mod plugin;

pub use self::plugin::{
	host_environment, plugins_listing, PluginManifest, ES_MODULE_PATH, PLUGIN_ROUTE_PREFIX,
	TAB_NAME,
};

pub struct Options {
	pub host: std::net::IpAddr,
	pub port: u16,
	pub logdir: PathBuf,
	/// How often to reload the log directory. `None` loads it once at startup.
	pub reload_interval: Option<Duration>,
	/// The directory holding the wasm-bindgen output of the browser client.
	pub client_dir: Option<PathBuf>,
	pub chart_backend: ChartBackend,
}

pub struct Context {
	pub options: Options,
	pub store: RwLock<ScalarStore>,
}

impl Context {
	pub fn new(options: Options, store: ScalarStore) -> Context {
		Context {
			options,
			store: RwLock::new(store),
		}
	}
}

pub async fn handle(context: Arc<Context>, request: Request<Body>) -> Response<Body> {
	let method = request.method().clone();
	let path = request.uri().path().to_owned();
	let path_components: Vec<_> = path.split('/').skip(1).collect();
	let result = match (&method, path_components.as_slice()) {
		(&Method::GET, &["health"]) => self::api::health::get(&context, request).await,
		(&Method::GET, &["data", "plugins_listing"]) => {
			self::api::plugins_listing::get(&context, request).await
		}
		(&Method::GET, &["data", "plugin", PLUGIN_NAME, ""]) => {
			self::page::get(&context, request).await
		}
		(&Method::GET, &["data", "plugin", PLUGIN_NAME, "render.js"]) => {
			self::client::render_module(&context, request).await
		}
		(&Method::GET, &["data", "plugin", PLUGIN_NAME, "api", "summary"]) => {
			self::api::summary::get(&context, request).await
		}
		(&Method::GET, &["data", "plugin", PLUGIN_NAME, "client", ref file_path @ ..]) => {
			self::client::static_file(&context, request, file_path).await
		}
		_ => Err(Error::NotFound.into()),
	};
	let response = match result {
		Ok(response) => response,
		Err(error) => error_response(error),
	};
	tracing::info!("{} {} {}", method, path, response.status().as_u16());
	response
}

fn error_response(error: compression_board_util::error::Error) -> Response<Body> {
	let (status, body) = match error.downcast_ref::<Error>() {
		Some(Error::BadRequest) => (StatusCode::BAD_REQUEST, "bad request"),
		Some(Error::NotFound) => (StatusCode::NOT_FOUND, "not found"),
		None => {
			tracing::error!(%error, "request failed");
			(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
		}
	};
	let mut response = Response::new(Body::from(body));
	*response.status_mut() = status;
	response
}

/// Load the log directory into a fresh store. A missing directory yields an empty store.
pub async fn load_store(logdir: PathBuf) -> Result<ScalarStore> {
	tokio::task::spawn_blocking(move || ScalarStore::load(&logdir)).await?
}

async fn reload_periodically(context: Arc<Context>, interval: Duration) {
	let mut ticker = tokio::time::interval(interval);
	// The first tick completes immediately and the store was just loaded.
	ticker.tick().await;
	loop {
		ticker.tick().await;
		match load_store(context.options.logdir.clone()).await {
			Ok(store) => {
				*context.store.write().await = store;
				tracing::debug!(logdir = %context.options.logdir.display(), "reloaded log directory");
			}
			Err(error) => {
				tracing::warn!(%error, "failed to reload log directory, keeping the previous store");
			}
		}
	}
}

pub fn run(options: Options) -> Result<()> {
	tokio::runtime::Builder::new_multi_thread()
		.enable_all()
		.build()?
		.block_on(run_impl(options))
}

async fn run_impl(options: Options) -> Result<()> {
	let store = load_store(options.logdir.clone()).await?;
	let host = options.host;
	let port = options.port;
	let reload_interval = options.reload_interval;
	let context = Arc::new(Context::new(options, store));
	if let Some(interval) = reload_interval {
		tokio::spawn(reload_periodically(context.clone(), interval));
	}
	tracing::info!(
		"open http://{}:{}{}/ or add the COMPRESSION tab to a dashboard",
		host,
		port,
		PLUGIN_ROUTE_PREFIX
	);
	compression_board_util::serve::serve(host, port, context, |context, request| async move {
		handle(context.as_ref().clone(), request).await
	})
	.await?;
	Ok(())
}

#[cfg(test)]
pub(crate) fn test_context(store: ScalarStore) -> Arc<Context> {
	Arc::new(Context::new(
		Options {
			host: std::net::IpAddr::from([127, 0, 0, 1]),
			port: 6006,
			logdir: PathBuf::from("runs"),
			reload_interval: None,
			client_dir: None,
			chart_backend: ChartBackend::Vector,
		},
		store,
	))
}

#[cfg(test)]
pub(crate) async fn get(context: &Arc<Context>, path: &str) -> Response<Body> {
	let request = Request::builder()
		.method(Method::GET)
		.uri(path)
		.body(Body::empty())
		.unwrap();
	handle(context.clone(), request).await
}

#[cfg(test)]
pub(crate) async fn body_string(response: Response<Body>) -> String {
	let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
	String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health() {
	let context = test_context(ScalarStore::new());
	let response = get(&context, "/health").await;
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_routes_are_not_found() {
	let context = test_context(ScalarStore::new());
	for path in &[
		"/",
		"/data/plugin/scalars/api/summary",
		"/data/plugin/compression/api/unknown",
	] {
		let response = get(&context, path).await;
		assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", path);
		assert_eq!(body_string(response).await, "not found");
	}
}

#[tokio::test]
async fn test_reload_replaces_store() {
	let logdir = tempfile::tempdir().unwrap();
	let context = Arc::new(Context::new(
		Options {
			host: std::net::IpAddr::from([127, 0, 0, 1]),
			port: 6006,
			logdir: logdir.path().to_owned(),
			reload_interval: None,
			client_dir: None,
			chart_backend: ChartBackend::Vector,
		},
		load_store(logdir.path().to_owned()).await.unwrap(),
	));
	assert!(context.store.read().await.is_empty());
	let benchmark = serde_json::json!({
		"alexnet": {
			"fp32": {"accuracy": 0.99, "model_size_mb": 200.0},
			"int8": {"accuracy": 0.99, "model_size_mb": 10.0}
		}
	});
	compression_board_writer::BenchmarkParser::new(0)
		.import(&benchmark, logdir.path())
		.unwrap();
	let store = load_store(context.options.logdir.clone()).await.unwrap();
	*context.store.write().await = store;
	let names: Vec<String> = context
		.store
		.read()
		.await
		.run_names()
		.map(|name| name.to_owned())
		.collect();
	assert_eq!(names, vec!["alexnet".to_owned()]);
}
