use html::{classes, style, HostNode, Node};

pub struct Table {
	pub id: Option<String>,
	pub width: Option<String>,
	pub children: Vec<Node>,
}

impl From<Table> for Node {
	fn from(table: Table) -> Node {
		let style = style! {
			"width" => table.width.unwrap_or_else(|| "auto".into()),
		};
		HostNode::new("div")
			.attribute("class", "table-wrapper")
			.child(
				HostNode::new("table")
					.attribute("class", "table")
					.attribute("id", table.id)
					.attribute("style", style)
					.children(table.children),
			)
			.into()
	}
}

pub struct TableHeader {
	pub children: Vec<Node>,
}

impl From<TableHeader> for Node {
	fn from(header: TableHeader) -> Node {
		HostNode::new("thead")
			.attribute("class", "table-header")
			.child(HostNode::new("tr").children(header.children))
			.into()
	}
}

pub struct TableBody {
	pub children: Vec<Node>,
}

impl From<TableBody> for Node {
	fn from(body: TableBody) -> Node {
		HostNode::new("tbody").children(body.children).into()
	}
}

pub struct TableRow {
	pub color: Option<String>,
	pub children: Vec<Node>,
}

impl From<TableRow> for Node {
	fn from(row: TableRow) -> Node {
		let style = style! {
			"background-color" => row.color,
		};
		HostNode::new("tr")
			.attribute("style", if style.is_empty() { None } else { Some(style) })
			.children(row.children)
			.into()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
	Left,
	Center,
	Right,
}

impl TextAlign {
	fn class(self) -> &'static str {
		match self {
			TextAlign::Left => "table-align-left",
			TextAlign::Right => "table-align-right",
			TextAlign::Center => "table-align-center",
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
	Ascending,
	Descending,
}

impl SortDirection {
	pub fn reverse(self) -> SortDirection {
		match self {
			SortDirection::Ascending => SortDirection::Descending,
			SortDirection::Descending => SortDirection::Ascending,
		}
	}

	fn class(self) -> &'static str {
		match self {
			SortDirection::Ascending => "sort-asc",
			SortDirection::Descending => "sort-desc",
		}
	}
}

/**
A header cell. A cell with a `sort_key` is clickable and carries the key in `data-sort`. `sorted` marks the column the table is currently sorted by.
*/
pub struct TableHeaderCell {
	pub sort_key: Option<String>,
	pub sorted: Option<SortDirection>,
	pub text_align: Option<TextAlign>,
	pub children: Vec<Node>,
}

impl From<TableHeaderCell> for Node {
	fn from(cell: TableHeaderCell) -> Node {
		let text_align_class = cell.text_align.unwrap_or(TextAlign::Left).class();
		let sortable = if cell.sort_key.is_some() {
			Some("sortable")
		} else {
			None
		};
		let sorted = cell.sorted.map(|direction| direction.class());
		let class = classes!("table-header-cell", text_align_class, sortable, sorted);
		HostNode::new("th")
			.attribute("class", class)
			.attribute("data-sort", cell.sort_key)
			.children(cell.children)
			.into()
	}
}

pub struct TableCell {
	pub color: Option<String>,
	pub text_align: Option<TextAlign>,
	pub children: Vec<Node>,
}

impl From<TableCell> for Node {
	fn from(cell: TableCell) -> Node {
		let style = style! {
			"background-color" => cell.color,
		};
		let class = classes!(
			"table-cell",
			cell.text_align.map(|text_align| text_align.class())
		);
		HostNode::new("td")
			.attribute("class", class)
			.attribute("style", if style.is_empty() { None } else { Some(style) })
			.children(cell.children)
			.into()
	}
}

#[test]
fn test_sortable_header_cell() {
	let node: Node = TableHeaderCell {
		sort_key: Some("size_ratio".to_owned()),
		sorted: Some(SortDirection::Descending),
		text_align: Some(TextAlign::Right),
		children: vec!["Size Ratio".into()],
	}
	.into();
	assert_eq!(
		node.to_string(),
		r#"<th class="table-header-cell table-align-right sortable sort-desc" data-sort="size_ratio">Size Ratio</th>"#
	);
	let node: Node = TableHeaderCell {
		sort_key: None,
		sorted: None,
		text_align: None,
		children: vec!["Run".into()],
	}
	.into();
	assert_eq!(
		node.to_string(),
		r#"<th class="table-header-cell table-align-left">Run</th>"#
	);
}

#[test]
fn test_table() {
	let node: Node = Table {
		id: Some("rawTable".to_owned()),
		width: Some("100%".to_owned()),
		children: vec![TableBody {
			children: vec![TableRow {
				color: None,
				children: vec![TableCell {
					color: None,
					text_align: None,
					children: vec!["alexnet".into()],
				}
				.into()],
			}
			.into()],
		}
		.into()],
	}
	.into();
	insta::assert_snapshot!(node.to_string(), @r###"<div class="table-wrapper"><table class="table" id="rawTable" style="width: 100%;"><tbody><tr><td class="table-cell">alexnet</td></tr></tbody></table></div>"###);
}
