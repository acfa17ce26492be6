use crate::sort::{sort_rows, SortColumn};
use compression_board_charts::{ChartId, RunColors};
use compression_board_metrics::{aggregate, DerivedRunView, SummaryResponse};
use compression_board_ui::SortDirection;
use std::collections::BTreeSet;

/// The three collapsible cards of the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CardId {
	Pareto,
	Relative,
	Raw,
}

impl CardId {
	pub const ALL: [CardId; 3] = [CardId::Pareto, CardId::Relative, CardId::Raw];

	pub fn key(self) -> &'static str {
		match self {
			CardId::Pareto => "pareto",
			CardId::Relative => "relative",
			CardId::Raw => "raw",
		}
	}

	pub fn from_key(key: &str) -> Option<CardId> {
		CardId::ALL.iter().copied().find(|card| card.key() == key)
	}

	pub fn title(self) -> &'static str {
		match self {
			CardId::Pareto => "Pareto Frontier Analysis",
			CardId::Relative => "Relative Metrics (FP32 / INT8)",
			CardId::Raw => "Raw Metrics",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum LoadState {
	Loading,
	Loaded,
	Failed(String),
}

/// Everything a user can do to the dashboard, plus the outcome of the one fetch.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
	Loaded(SummaryResponse),
	LoadFailed(String),
	ToggleRun(String),
	SelectAll,
	DeselectAll,
	Search(String),
	SortBy(SortColumn),
	ToggleChartExpanded(ChartId),
	ToggleCard(CardId),
}

/// One entry of the sidebar run list.
#[derive(Clone, Debug, PartialEq)]
pub struct SidebarEntry<'a> {
	pub run: &'a str,
	pub color: &'static str,
	pub checked: bool,
	pub hidden: bool,
}

/**
The dashboard's view state. It is created empty, filled once when the summary arrives, and then changed only by [`apply`](#method.apply). Runs keep the order in which they were received, which is also the order their colors are assigned in.
*/
#[derive(Clone, Debug)]
pub struct DashboardState {
	pub load: LoadState,
	pub all_runs: Vec<DerivedRunView>,
	pub colors: RunColors,
	pub visible_runs: BTreeSet<String>,
	pub search_term: String,
	pub sort_column: Option<SortColumn>,
	pub sort_direction: SortDirection,
	pub expanded_chart: Option<ChartId>,
	pub collapsed_cards: BTreeSet<CardId>,
}

impl Default for DashboardState {
	fn default() -> DashboardState {
		DashboardState {
			load: LoadState::Loading,
			all_runs: Vec::new(),
			colors: RunColors::default(),
			visible_runs: BTreeSet::new(),
			search_term: String::new(),
			sort_column: None,
			sort_direction: SortDirection::Ascending,
			expanded_chart: None,
			collapsed_cards: BTreeSet::new(),
		}
	}
}

impl DashboardState {
	pub fn new() -> DashboardState {
		DashboardState::default()
	}

	pub fn apply(mut self, action: Action) -> DashboardState {
		match action {
			Action::Loaded(response) => {
				if let Some(error) = response.error {
					self.load = LoadState::Failed(error);
					return self;
				}
				self.all_runs = aggregate(&response.runs);
				self.colors = RunColors::new(self.all_runs.iter().map(|view| view.run()));
				self.visible_runs = self
					.all_runs
					.iter()
					.map(|view| view.run().to_owned())
					.collect();
				self.load = LoadState::Loaded;
			}
			Action::LoadFailed(message) => {
				self.load = LoadState::Failed(message);
			}
			Action::ToggleRun(run) => {
				if !self.all_runs.iter().any(|view| view.run() == run) {
					return self;
				}
				if !self.visible_runs.remove(&run) {
					self.visible_runs.insert(run);
				}
			}
			Action::SelectAll => {
				self.visible_runs = self
					.all_runs
					.iter()
					.map(|view| view.run().to_owned())
					.collect();
			}
			Action::DeselectAll => {
				self.visible_runs.clear();
			}
			Action::Search(term) => {
				self.search_term = term;
			}
			Action::SortBy(column) => {
				if self.sort_column == Some(column) {
					self.sort_direction = self.sort_direction.reverse();
				} else {
					self.sort_column = Some(column);
					self.sort_direction = SortDirection::Ascending;
				}
			}
			Action::ToggleChartExpanded(chart) => {
				self.expanded_chart = if self.expanded_chart == Some(chart) {
					None
				} else {
					Some(chart)
				};
			}
			Action::ToggleCard(card) => {
				if !self.collapsed_cards.remove(&card) {
					self.collapsed_cards.insert(card);
				}
			}
		}
		self
	}

	pub fn is_visible(&self, run: &str) -> bool {
		self.visible_runs.contains(run)
	}

	/// Whether the sidebar shows `run` under the current search term.
	pub fn matches_search(&self, run: &str) -> bool {
		run.to_lowercase()
			.contains(&self.search_term.trim().to_lowercase())
	}

	pub fn run_count_label(&self) -> String {
		format!("{} of {} runs", self.visible_runs.len(), self.all_runs.len())
	}

	pub fn sidebar_entries(&self) -> Vec<SidebarEntry<'_>> {
		self.all_runs
			.iter()
			.map(|view| SidebarEntry {
				run: view.run(),
				color: self.colors.get(view.run()),
				checked: self.is_visible(view.run()),
				hidden: !self.matches_search(view.run()),
			})
			.collect()
	}

	/// The rows of both tables: the visible runs in the current sort order. The search term does not affect them.
	pub fn visible_rows(&self) -> Vec<&DerivedRunView> {
		let mut rows: Vec<&DerivedRunView> = self
			.all_runs
			.iter()
			.filter(|view| self.is_visible(view.run()))
			.collect();
		if let Some(column) = self.sort_column {
			sort_rows(&mut rows, column, self.sort_direction);
		}
		rows
	}

	pub fn is_collapsed(&self, card: CardId) -> bool {
		self.collapsed_cards.contains(&card)
	}
}

#[cfg(test)]
fn loaded(runs: &[&str]) -> DashboardState {
	let runs = runs
		.iter()
		.map(|run| compression_board_metrics::RunMetricRecord::new(*run))
		.collect();
	DashboardState::new().apply(Action::Loaded(SummaryResponse { runs, error: None }))
}

#[test]
fn test_load_makes_every_run_visible() {
	let state = loaded(&["alexnet", "resnet18"]);
	assert_eq!(state.load, LoadState::Loaded);
	assert_eq!(state.run_count_label(), "2 of 2 runs");
	assert_eq!(state.colors.get("resnet18"), "#ff7f0e");
}

#[test]
fn test_load_error_is_shown() {
	let state = DashboardState::new().apply(Action::Loaded(SummaryResponse {
		runs: Vec::new(),
		error: Some("no scalar source".to_owned()),
	}));
	assert_eq!(state.load, LoadState::Failed("no scalar source".to_owned()));
	let state = DashboardState::new().apply(Action::LoadFailed("network error".to_owned()));
	assert_eq!(state.load, LoadState::Failed("network error".to_owned()));
}

#[test]
fn test_search_keeps_visibility() {
	let state = loaded(&["alexnet", "resnet18", "ResNet50"])
		.apply(Action::ToggleRun("resnet18".to_owned()))
		.apply(Action::Search("RESNET".to_owned()));
	let entries = state.sidebar_entries();
	let hidden: Vec<bool> = entries.iter().map(|entry| entry.hidden).collect();
	assert_eq!(hidden, vec![true, false, false]);
	assert_eq!(state.run_count_label(), "2 of 3 runs");
	let state = state.apply(Action::Search(String::new()));
	assert!(!state.is_visible("resnet18"));
	assert!(state.is_visible("alexnet"));
	let rows: Vec<&str> = state.visible_rows().iter().map(|row| row.run()).collect();
	assert_eq!(rows, vec!["alexnet", "ResNet50"]);
}

#[test]
fn test_select_all_ignores_search() {
	let state = loaded(&["alexnet", "resnet18"])
		.apply(Action::Search("alex".to_owned()))
		.apply(Action::DeselectAll);
	assert_eq!(state.run_count_label(), "0 of 2 runs");
	let state = state.apply(Action::SelectAll);
	assert_eq!(state.run_count_label(), "2 of 2 runs");
}

#[test]
fn test_toggle_unknown_run_is_ignored() {
	let state = loaded(&["alexnet"]).apply(Action::ToggleRun("vgg16".to_owned()));
	assert_eq!(state.run_count_label(), "1 of 1 runs");
}

#[test]
fn test_sort_cycle() {
	let column = SortColumn::Run;
	let state = loaded(&["b", "a", "c"]).apply(Action::SortBy(column));
	let order = |state: &DashboardState| -> Vec<String> {
		state
			.visible_rows()
			.iter()
			.map(|row| row.run().to_owned())
			.collect()
	};
	let ascending = order(&state);
	assert_eq!(ascending, vec!["a", "b", "c"]);
	let state = state.apply(Action::SortBy(column));
	assert_eq!(state.sort_direction, SortDirection::Descending);
	assert_eq!(order(&state), vec!["c", "b", "a"]);
	let state = state.apply(Action::SortBy(column));
	assert_eq!(order(&state), ascending);
	let state = state
		.apply(Action::SortBy(column))
		.apply(Action::SortBy(SortColumn::Field(compression_board_metrics::Field::SizeRatio)));
	assert_eq!(state.sort_direction, SortDirection::Ascending);
}

#[test]
fn test_expand_is_exclusive() {
	let state = loaded(&["alexnet"])
		.apply(Action::ToggleChartExpanded(ChartId::Pareto))
		.apply(Action::ToggleChartExpanded(ChartId::Energy));
	assert_eq!(state.expanded_chart, Some(ChartId::Energy));
	let state = state.apply(Action::ToggleChartExpanded(ChartId::Energy));
	assert_eq!(state.expanded_chart, None);
}

#[test]
fn test_toggle_card() {
	let state = loaded(&["alexnet"]).apply(Action::ToggleCard(CardId::Raw));
	assert!(state.is_collapsed(CardId::Raw));
	assert!(!state.is_collapsed(CardId::Pareto));
	let state = state.apply(Action::ToggleCard(CardId::Raw));
	assert!(!state.is_collapsed(CardId::Raw));
}
