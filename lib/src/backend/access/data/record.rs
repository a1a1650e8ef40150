use super::value::FieldValue;



/// One row of a table.
///
/// The values are positional: value `i` belongs to column `i` of the owning table's header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    data: Vec<FieldValue>
}



impl Record {
    pub fn new(data: Vec<FieldValue>) -> Self { Record { data } }

    pub fn values(&self) -> &[FieldValue] { &self.data }

    pub fn get(&self, column_index: usize) -> Option<&FieldValue> { self.data.get(column_index) }

    pub(crate) fn len(&self) -> usize { self.data.len() }

    pub(crate) fn set(&mut self, column_index: usize, value: FieldValue) -> Option<FieldValue> {
        let slot = self.data.get_mut(column_index)?;
        Some(std::mem::replace(slot, value))
    }

    /// the text of every cell, in column order
    pub fn to_strings(&self) -> Vec<String> {
        self.data.iter().map(|v| v.to_string()).collect()
    }
}


impl From<Vec<FieldValue>> for Record {
    fn from(data: Vec<FieldValue>) -> Self { Record::new(data) }
}

impl FromIterator<FieldValue> for Record {
    fn from_iter<I: IntoIterator<Item = FieldValue>>(iter: I) -> Self {
        Record::new(iter.into_iter().collect())
    }
}
