use compression_board_charts::{css_variables, ColorTokens};

const STYLESHEET: &str = r#"
.compression-dashboard {
	background-color: var(--cb-bg);
	color: var(--cb-text);
	display: grid;
	font-family: var(--cb-font-family);
	font-size: var(--cb-font-size);
	grid-template-columns: 260px 1fr;
	min-height: 100vh;
}
.sidebar {
	background-color: var(--cb-sidebar-bg);
	border-right: 1px solid var(--cb-border);
	display: grid;
	gap: 0.5rem;
	grid-auto-rows: max-content;
	padding: 1rem;
}
.sidebar-title {
	font-weight: 500;
}
.sidebar-actions {
	display: grid;
	gap: 0.5rem;
	grid-template-columns: 1fr 1fr;
}
.run-count {
	color: var(--cb-secondary-text);
}
.run-list {
	display: grid;
	gap: 0.25rem;
}
.run-item {
	align-items: center;
	border-radius: 4px;
	cursor: pointer;
	display: grid;
	gap: 0.5rem;
	grid-template-columns: auto 12px 1fr;
	padding: 0.25rem;
}
.run-item:hover {
	background-color: var(--cb-hover-bg);
}
.run-item[hidden] {
	display: none;
}
.run-color {
	border-radius: 2px;
	height: 12px;
	width: 12px;
}
.run-name {
	overflow: hidden;
	text-overflow: ellipsis;
	white-space: nowrap;
}
.main {
	display: grid;
	gap: 1rem;
	grid-auto-rows: max-content;
	padding: 1rem;
}
.status {
	color: var(--cb-secondary-text);
	padding: 2rem;
	text-align: center;
}
.status.error {
	color: #ea4335;
}
.card {
	background-color: var(--cb-card-bg);
	border: 1px solid var(--cb-border);
	border-radius: 8px;
	overflow: hidden;
}
.card-header {
	align-items: center;
	background-color: var(--cb-card-header-bg);
	display: grid;
	gap: 0.5rem;
	grid-template-columns: auto 1fr auto;
	padding: 0.5rem 1rem;
}
.card-title {
	font-weight: 500;
}
.card-body {
	padding: 1rem;
}
.card-body[hidden] {
	display: none;
}
.button, .card-toggle {
	background-color: var(--cb-header-bg);
	border: 1px solid var(--cb-border);
	border-radius: 4px;
	color: var(--cb-text);
	cursor: pointer;
	font: inherit;
	padding: 0.25rem 0.5rem;
}
.button:hover, .card-toggle:hover {
	background-color: var(--cb-hover-bg);
}
.button:active {
	background-color: var(--cb-active-button-bg);
}
.form-text-field {
	background-color: var(--cb-bg);
	border: 1px solid var(--cb-border);
	border-radius: 4px;
	color: var(--cb-text);
	font: inherit;
	padding: 0.25rem 0.5rem;
}
.chart-grid {
	display: grid;
	gap: 1rem;
	grid-template-columns: 1fr 1fr;
}
.chart-container {
	border: 1px solid var(--cb-border);
	border-radius: 4px;
	position: relative;
}
.chart-container.expanded {
	grid-column: 1 / -1;
}
.chart-header {
	align-items: center;
	display: grid;
	gap: 0.5rem;
	grid-template-columns: 1fr auto auto;
	padding: 0.5rem;
}
.chart-body svg {
	display: block;
	height: auto;
	max-width: 100%;
}
.chart-placeholder {
	padding: 4rem 1rem;
	text-align: center;
}
.table-wrapper {
	overflow-x: auto;
}
.table {
	border-collapse: collapse;
}
.table-header-cell {
	background-color: var(--cb-header-bg);
	border-bottom: 1px solid var(--cb-border);
	padding: 0.5rem;
	white-space: nowrap;
}
.table-header-cell.sortable {
	cursor: pointer;
	user-select: none;
}
.table-header-cell.sort-asc::after {
	content: " ▲";
}
.table-header-cell.sort-desc::after {
	content: " ▼";
}
.table-cell {
	border-bottom: 1px solid var(--cb-border);
	padding: 0.5rem;
}
.table-align-left {
	text-align: left;
}
.table-align-right {
	text-align: right;
}
.table-align-center {
	text-align: center;
}
tbody tr:nth-child(even) {
	background-color: var(--cb-even-row-bg);
}
tbody tr:hover {
	background-color: var(--cb-hover-bg);
}
.compression-tooltip {
	border-radius: 4px;
	box-shadow: 0 2px 6px rgba(0, 0, 0, 0.3);
	padding: 0.5rem;
	pointer-events: none;
	position: fixed;
	z-index: 10;
}
.compression-tooltip-title {
	font-weight: 500;
	margin-bottom: 0.25rem;
}
"#;

/// The dashboard's stylesheet with the color tokens bound to its custom properties.
pub fn stylesheet(tokens: &ColorTokens) -> String {
	format!("{}{}", css_variables(tokens), STYLESHEET)
}
