use compression_board_util::error::Result;
use hyper::{header, Body, Response, StatusCode};
use serde::Serialize;

pub mod health;
pub mod plugins_listing;
pub mod summary;

pub(crate) fn json_response<T>(value: &T) -> Result<Response<Body>>
where
	T: Serialize,
{
	let body = serde_json::to_vec(value)?;
	Ok(Response::builder()
		.status(StatusCode::OK)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body))?)
}
