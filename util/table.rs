/// A plain-text table with a header row, padded to the widest cell in each column.
pub struct Table<'a> {
	pub padding: usize,
	pub header: &'a [&'a str],
	pub rows: &'a [Vec<String>],
}

impl<'a> std::fmt::Display for Table<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let n_columns = self.header.len();
		let mut column_widths: Vec<_> = vec![0; n_columns];
		// update column widths with header
		column_widths
			.iter_mut()
			.zip(self.header)
			.for_each(|(column_width, header)| *column_width = header.chars().count());
		// update column widths with values
		for row in self.rows.iter() {
			for (column_width, value) in column_widths.iter_mut().zip(row.iter()) {
				*column_width = usize::max(*column_width, value.chars().count());
			}
		}
		// write header
		let line = Line {
			column_widths: &column_widths,
			padding: self.padding,
		};
		let header: Vec<&str> = self.header.to_vec();
		let row = Row {
			column_widths: &column_widths,
			padding: self.padding,
			values: &header,
		};
		writeln!(f, "{}", row)?;
		writeln!(f, "{}", line)?;
		// write values
		for values in self.rows.iter() {
			let values: Vec<&str> = values.iter().map(|value| value.as_str()).collect();
			let row = Row {
				column_widths: &column_widths,
				padding: self.padding,
				values: &values,
			};
			writeln!(f, "{}", row)?;
		}
		Ok(())
	}
}

struct Line<'a> {
	column_widths: &'a [usize],
	padding: usize,
}

impl<'a> std::fmt::Display for Line<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "|")?;
		for column_width in self.column_widths.iter() {
			for _ in 0..column_width + 2 * self.padding {
				write!(f, "-")?;
			}
			write!(f, "|")?;
		}
		Ok(())
	}
}

struct Row<'a> {
	column_widths: &'a [usize],
	padding: usize,
	values: &'a [&'a str],
}

impl<'a> std::fmt::Display for Row<'a> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "|")?;
		for (column_width, value) in self.column_widths.iter().zip(self.values) {
			for _ in 0..self.padding {
				write!(f, " ")?;
			}
			write!(f, "{}", value)?;
			for _ in 0..column_width + self.padding - value.chars().count() {
				write!(f, " ")?;
			}
			write!(f, "|")?;
		}
		Ok(())
	}
}

#[test]
fn test_table() {
	let rows = vec![
		vec!["alexnet".to_owned(), "20.00x".to_owned()],
		vec!["resnet18".to_owned(), "-".to_owned()],
	];
	let table = Table {
		padding: 1,
		header: &["Run", "Size Ratio"],
		rows: &rows,
	};
	insta::assert_snapshot!(table.to_string(), @r###"
	| Run      | Size Ratio |
	|----------|------------|
	| alexnet  | 20.00x     |
	| resnet18 | -          |
	"###);
}
