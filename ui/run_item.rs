use html::{style, HostNode, Node};

/// One run in the sidebar: a checkbox, its color swatch and its name. A run filtered out by the search is hidden, not removed.
pub struct RunItem {
	pub run: String,
	pub color: String,
	pub checked: bool,
	pub hidden: bool,
}

impl From<RunItem> for Node {
	fn from(item: RunItem) -> Node {
		let swatch_style = style! {
			"background-color" => item.color,
		};
		HostNode::new("label")
			.attribute("class", "run-item")
			.attribute("data-run", item.run.clone())
			.attribute("hidden", item.hidden)
			.child(
				HostNode::empty("input")
					.attribute("class", "run-checkbox")
					.attribute("type", "checkbox")
					.attribute("data-run", item.run.clone())
					.attribute("checked", item.checked),
			)
			.child(
				HostNode::new("span")
					.attribute("class", "run-color")
					.attribute("style", swatch_style),
			)
			.child(
				HostNode::new("span")
					.attribute("class", "run-name")
					.attribute("title", item.run.clone())
					.child(item.run),
			)
			.into()
	}
}

#[test]
fn test_run_item() {
	let node: Node = RunItem {
		run: "resnet18".to_owned(),
		color: "#ff7f0e".to_owned(),
		checked: false,
		hidden: true,
	}
	.into();
	assert_eq!(
		node.to_string(),
		r##"<label class="run-item" data-run="resnet18" hidden><input class="run-checkbox" type="checkbox" data-run="resnet18" /><span class="run-color" style="background-color: #ff7f0e;"></span><span class="run-name" title="resnet18">resnet18</span></label>"##
	);
}
