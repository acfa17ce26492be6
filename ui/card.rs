use html::{classes, HostNode, Node};

/**
A card with a header and a body that can be collapsed. The header toggle carries `data-action="toggle-card"` and the card id.
*/
pub struct Card {
	pub id: String,
	pub title: String,
	pub collapsed: bool,
	pub actions: Vec<Node>,
	pub children: Vec<Node>,
}

impl From<Card> for Node {
	fn from(card: Card) -> Node {
		let collapsed = if card.collapsed {
			Some("collapsed")
		} else {
			None
		};
		let toggle = HostNode::new("button")
			.attribute("class", "card-toggle")
			.attribute("data-action", "toggle-card")
			.attribute("data-target", card.id.clone())
			.attribute("type", "button")
			.attribute("aria-expanded", if card.collapsed { "false" } else { "true" })
			.child(if card.collapsed { "▸" } else { "▾" });
		HostNode::new("div")
			.attribute("class", classes!("card", collapsed))
			.attribute("data-card", card.id)
			.child(
				HostNode::new("div")
					.attribute("class", "card-header")
					.child(toggle)
					.child(
						HostNode::new("span")
							.attribute("class", "card-title")
							.child(card.title),
					)
					.child(
						HostNode::new("div")
							.attribute("class", "card-actions")
							.children(card.actions),
					),
			)
			.child(
				HostNode::new("div")
					.attribute("class", "card-body")
					.attribute("hidden", card.collapsed)
					.children(card.children),
			)
			.into()
	}
}

#[test]
fn test_collapsed_card() {
	let node: Node = Card {
		id: "raw".to_owned(),
		title: "Raw Metrics".to_owned(),
		collapsed: true,
		actions: Vec::new(),
		children: vec!["table".into()],
	}
	.into();
	insta::assert_snapshot!(node.to_string(), @r###"<div class="card collapsed" data-card="raw"><div class="card-header"><button class="card-toggle" data-action="toggle-card" data-target="raw" type="button" aria-expanded="false">▸</button><span class="card-title">Raw Metrics</span><div class="card-actions"></div></div><div class="card-body" hidden>table</div></div>"###);
}
