use crate::{api::json_response, plugin::plugins_listing, Context};
use compression_board_util::error::Result;
use hyper::{Body, Request, Response};

pub(crate) async fn get(context: &Context, _request: Request<Body>) -> Result<Response<Body>> {
	let store = context.store.read().await;
	let listing = plugins_listing(&crate::host_environment(&store));
	json_response(&listing)
}

#[tokio::test]
async fn test_plugins_listing() {
	let context = crate::test_context(compression_board_scalars::ScalarStore::new());
	let response = crate::get(&context, "/data/plugins_listing").await;
	assert_eq!(response.status(), hyper::StatusCode::OK);
	assert_eq!(
		response.headers()[hyper::header::CONTENT_TYPE],
		"application/json"
	);
	let body: serde_json::Value =
		serde_json::from_str(&crate::body_string(response).await).unwrap();
	assert_eq!(
		body,
		serde_json::json!({
			"compression": {
				"tab_name": "COMPRESSION",
				"es_module_path": "/plugin/compression/render.js",
				"disable_reload": false,
				"enabled": false
			}
		})
	);
}
