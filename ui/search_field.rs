use html::{HostNode, Node};

pub struct SearchField {
	pub id: String,
	pub placeholder: Option<String>,
	pub value: Option<String>,
}

impl From<SearchField> for Node {
	fn from(field: SearchField) -> Node {
		HostNode::empty("input")
			.attribute("autocomplete", "off")
			.attribute("class", "form-text-field")
			.attribute("id", field.id)
			.attribute("placeholder", field.placeholder)
			.attribute("spellcheck", "false")
			.attribute("type", "search")
			.attribute("value", field.value)
			.into()
	}
}

#[test]
fn test_search_field() {
	let node: Node = SearchField {
		id: "runSearch".to_owned(),
		placeholder: Some("Search runs...".to_owned()),
		value: None,
	}
	.into();
	assert_eq!(
		node.to_string(),
		r#"<input autocomplete="off" class="form-text-field" id="runSearch" placeholder="Search runs..." spellcheck="false" type="search" />"#
	);
}
