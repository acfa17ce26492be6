use crate::{api::json_response, Context};
use compression_board_scalars::summary_response;
use compression_board_util::error::Result;
use hyper::{Body, Request, Response};

/// Always answers 200. A store that cannot be read produces an empty run list with an error message.
pub(crate) async fn get(context: &Context, _request: Request<Body>) -> Result<Response<Body>> {
	let store = context.store.read().await;
	let summary = summary_response(&crate::host_environment(&store));
	json_response(&summary)
}

#[cfg(test)]
fn scalar(run: &str, tag: &str, value: f64) -> (String, compression_board_scalars::Event) {
	(
		run.to_owned(),
		compression_board_scalars::Event {
			tag: tag.to_owned(),
			step: 0,
			wall_time: 0.0,
			payload: compression_board_scalars::EventPayload::Scalar { value },
		},
	)
}

#[tokio::test]
async fn test_summary() {
	let mut store = compression_board_scalars::ScalarStore::new();
	let events = vec![
		scalar("alexnet", "alexnet/metrics/accuracy/fp32", 0.99),
		scalar("alexnet", "alexnet/metrics/accuracy/int8", 0.99),
		scalar("alexnet", "alexnet/performance/model_size_mb/fp32", 200.0),
		scalar("alexnet", "alexnet/performance/model_size_mb/int8", 10.0),
		scalar("alexnet", "alexnet/compression/size_ratio", 20.0),
		scalar("training", "training/training/loss", 0.5),
	];
	for (run, event) in events {
		store.add_event(&run, event);
	}
	let context = crate::test_context(store);
	let response = crate::get(&context, "/data/plugin/compression/api/summary").await;
	assert_eq!(response.status(), hyper::StatusCode::OK);
	let body: serde_json::Value =
		serde_json::from_str(&crate::body_string(response).await).unwrap();
	assert_eq!(
		body,
		serde_json::json!({
			"runs": [{
				"run": "alexnet",
				"accuracy_fp32": 0.99,
				"accuracy_int8": 0.99,
				"model_size_fp32": 200.0,
				"model_size_int8": 10.0,
				"size_ratio": 20.0
			}]
		})
	);
}

#[tokio::test]
async fn test_summary_of_empty_store() {
	let context = crate::test_context(compression_board_scalars::ScalarStore::new());
	let response = crate::get(&context, "/data/plugin/compression/api/summary").await;
	assert_eq!(response.status(), hyper::StatusCode::OK);
	let body: serde_json::Value =
		serde_json::from_str(&crate::body_string(response).await).unwrap();
	assert_eq!(body, serde_json::json!({ "runs": [] }));
}
