use comfy_table::{presets::ASCII_MARKDOWN, Cell, CellAlignment, TableComponent};

use crate::backend::{table::mainmem::table::Table, workflow::form::EditForm};


const ASCII_TABLE_FORMAT: &str = "     ══            "; // header sep only

const INDEX_HEADER: &str = "#";



impl Table {
    /// renders rows `minimum..=maximum`, with each row's index in the first column
    pub fn as_string(&self, minimum: usize, maximum: usize) -> String {
        let mut text_table = comfy_table::Table::new();

        let mut header_row: Vec<Cell> = vec![Cell::new(INDEX_HEADER).set_alignment(CellAlignment::Right)];
        for col in self.columns() {
            header_row.push(Cell::new(col).set_alignment(CellAlignment::Center));
        }
        text_table.set_header(header_row);

        for (idx, record) in self.rows().iter().enumerate() {

            // window filter
            if idx < minimum || idx > maximum { continue; }

            let mut formatted_row: Vec<Cell> = vec![Cell::new(idx).set_alignment(CellAlignment::Right)];
            for value in record.values() {
                let cell = Cell::new(value);
                formatted_row.push(if value.is_number() { cell.set_alignment(CellAlignment::Right) } else { cell });
            }
            text_table.add_row(formatted_row);
        }
        text_table.load_preset(ASCII_TABLE_FORMAT);

        text_table.to_string()
    }
}


impl EditForm {
    pub fn as_string(&self) -> String {
        let mut text_table = comfy_table::Table::new();
        text_table.set_header(vec!["column", "current", "edited"]);

        for field in self.fields() {
            let marker = if field.is_modified() { "*" } else { "" };
            text_table.add_row(vec![
                field.column.clone(),
                field.original.to_string(),
                format!("{}{marker}", field.text),
            ]);
        }

        text_table.load_preset(ASCII_MARKDOWN).remove_style(TableComponent::HorizontalLines);

        format!("row {}\n{}", self.row_index(), text_table)
    }
}



#[cfg(test)]
mod tests {
    use crate::backend::workflow::form::Selection;

    use super::*;

    fn staff() -> Table {
        Table::from_strings(&["name", "title"], &[&["Ann", "Eng"], &["Bo", "Mgr"], &["Cy", "Ops"]]).unwrap()
    }

    #[test]
    fn window_limits_the_rendered_rows() {
        let text = staff().as_string(1, 1);
        assert!(text.contains("Bo"));
        assert!(!text.contains("Ann"));
        assert!(!text.contains("Cy"));
    }

    #[test]
    fn form_marks_modified_fields() {
        let t = staff();
        let mut form = EditForm::open(Selection::capture(&t, 0).unwrap(), t.columns());
        form.set_field("title", "Lead").unwrap();

        let text = form.as_string();
        assert!(text.starts_with("row 0"));
        assert!(text.contains("Lead*"));
        assert!(!text.contains("Ann*"));
    }
}
