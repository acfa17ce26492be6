/*!
This crate holds the dashboard's view state and renders it. A [`DashboardState`](struct.DashboardState.html) is changed only by applying an [`Action`](enum.Action.html), and every view function is a pure function of the state and the current color tokens. The same code renders the page on the server and redraws it in the browser.
*/

mod export;
mod sort;
mod state;
mod style;
mod table;
mod view;

pub use self::export::{export_csv, ExportError};
pub use self::sort::{compare_rows, sort_rows, SortColumn};
pub use self::state::{Action, CardId, DashboardState, LoadState, SidebarEntry};
pub use self::style::stylesheet;
pub use self::table::{Column, TableId};
pub use self::view::{
	default_chart_size, render_chart_body, render_chart_grid, render_dashboard, render_main,
	render_sidebar, render_table, DashboardViewOptions, NO_DATA_MESSAGE, NO_RUNS_SELECTED_MESSAGE,
};
pub use compression_board_ui::SortDirection;
