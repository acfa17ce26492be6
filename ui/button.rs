use html::{classes, HostNode, Node};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonType {
	Submit,
	Button,
	Reset,
}

/**
A button. `action` is written to `data-action` and `target` to `data-target`, so a single delegated click handler can dispatch every button on the page.
*/
pub struct Button {
	pub id: Option<String>,
	pub button_type: ButtonType,
	pub class: Option<&'static str>,
	pub action: Option<&'static str>,
	pub target: Option<String>,
	pub title: Option<String>,
	pub disabled: Option<bool>,
	pub children: Vec<Node>,
}

impl Default for Button {
	fn default() -> Button {
		Button {
			id: None,
			button_type: ButtonType::Button,
			class: None,
			action: None,
			target: None,
			title: None,
			disabled: None,
			children: Vec::new(),
		}
	}
}

impl From<Button> for Node {
	fn from(button: Button) -> Node {
		let button_type = match button.button_type {
			ButtonType::Submit => "submit",
			ButtonType::Button => "button",
			ButtonType::Reset => "reset",
		};
		HostNode::new("button")
			.attribute("class", classes!("button", button.class))
			.attribute("data-action", button.action.map(|action| action.to_owned()))
			.attribute("data-target", button.target)
			.attribute("disabled", button.disabled)
			.attribute("id", button.id)
			.attribute("title", button.title)
			.attribute("type", button_type)
			.children(button.children)
			.into()
	}
}

#[test]
fn test_button() {
	let node: Node = Button {
		action: Some("expand-chart"),
		target: Some("paretoChart".to_owned()),
		class: Some("chart-action"),
		title: Some("Expand".to_owned()),
		children: vec!["⤢".into()],
		..Default::default()
	}
	.into();
	assert_eq!(
		node.to_string(),
		r#"<button class="button chart-action" data-action="expand-chart" data-target="paretoChart" title="Expand" type="button">⤢</button>"#
	);
}
