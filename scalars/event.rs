use serde::{Deserialize, Serialize};

/// The name of the event log inside each run directory.
pub const EVENT_LOG_FILE_NAME: &str = "events.jsonl";

/**
One line of an event log. A scalar event carries `value`, a text event carries `text`.

```json
{"tag": "alexnet/compression/speedup", "step": 0, "wall_time": 1700000000.5, "value": 2.1}
```
*/
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
	pub tag: String,
	pub step: i64,
	pub wall_time: f64,
	#[serde(flatten)]
	pub payload: EventPayload,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventPayload {
	Scalar { value: f64 },
	Text { text: String },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalarEvent {
	pub step: i64,
	pub wall_time: f64,
	pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextEvent {
	pub step: i64,
	pub wall_time: f64,
	pub text: String,
}

/// Seconds since the unix epoch, as written into `wall_time`.
pub fn wall_time_now() -> f64 {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|duration| duration.as_secs_f64())
		.unwrap_or(0.0)
}

#[test]
fn test_event_json() {
	let event = Event {
		tag: "alexnet/compression/speedup".to_owned(),
		step: 3,
		wall_time: 10.5,
		payload: EventPayload::Scalar { value: 2.0 },
	};
	let line = serde_json::to_string(&event).unwrap();
	assert_eq!(
		line,
		r#"{"tag":"alexnet/compression/speedup","step":3,"wall_time":10.5,"value":2.0}"#
	);
	let text: Event =
		serde_json::from_str(r#"{"tag":"alexnet/metadata/info","step":0,"wall_time":1.0,"text":"Model: alexnet"}"#)
			.unwrap();
	assert_eq!(
		text.payload,
		EventPayload::Text {
			text: "Model: alexnet".to_owned()
		}
	);
}
