use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::scoring::{Coefficients, Observations};

/// One row of an observation grid.
///
/// `category` is derived: every write through [`StudentRecord::apply`] recomputes it,
/// and "" means no criterion has been answered yet. It is persisted under the grid's
/// own field name ([`Observations::LABEL_KEY`]); see `roster::wire`.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord<O> {
    pub id: String,
    pub name: String,
    pub observations: O,
    pub category: String,
}

impl<O: Observations> StudentRecord<O> {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            observations: O::default(),
            category: String::new(),
        }
    }

    /// Write one checkbox and relabel the student.
    pub fn apply(&mut self, update: O::Update, checked: bool, coefficients: &Coefficients) {
        self.observations.apply(update, checked);
        self.recompute(coefficients);
    }

    pub fn recompute(&mut self, coefficients: &Coefficients) {
        self.category = self.observations.classify(coefficients);
    }

    /// Whether a category could be determined.
    pub fn is_labelled(&self) -> bool {
        !self.category.is_empty()
    }

    /// Rows with a blank name are not kept as results.
    pub fn is_completed(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// The ordered rows of one diagnostic session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent, bound = "O: Observations")]
pub struct Roster<O> {
    students: Vec<StudentRecord<O>>,
}

impl<O: Observations> Default for Roster<O> {
    fn default() -> Self {
        Self::blank()
    }
}

impl<O: Observations> Roster<O> {
    /// A single unnamed row, as shown when no class list has been imported.
    pub fn blank() -> Self {
        Self {
            students: vec![StudentRecord::new("1", "")],
        }
    }

    /// One blank row per imported name, with ids "1".."n" in list order.
    ///
    /// Names are taken as given: no trimming, validation or de-duplication.
    pub fn from_names(names: &[String]) -> Self {
        if names.is_empty() {
            return Self::blank();
        }

        let students = names
            .iter()
            .enumerate()
            .map(|(i, name)| StudentRecord::new((i + 1).to_string(), name.clone()))
            .collect();
        Self { students }
    }

    pub fn from_records(students: Vec<StudentRecord<O>>) -> Self {
        Self { students }
    }

    pub fn students(&self) -> &[StudentRecord<O>] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    fn position(&self, id_or_name: &str) -> Option<usize> {
        self.students
            .iter()
            .position(|s| s.id == id_or_name)
            .or_else(|| self.students.iter().position(|s| s.name == id_or_name))
    }

    /// Look a student up by id first, then by exact name.
    pub fn find(&self, id_or_name: &str) -> Option<&StudentRecord<O>> {
        self.position(id_or_name).map(|i| &self.students[i])
    }

    /// Look a student up and require a non-blank name, since unnamed rows are never saved.
    pub fn find_named(&self, id_or_name: &str) -> Result<&StudentRecord<O>> {
        let record = self
            .find(id_or_name)
            .with_context(|| format!("No student '{}' in {}", id_or_name, O::KIND.title()))?;
        if !record.is_completed() {
            bail!(
                "Student {} of {} has no name and would not be saved; name it first",
                record.id,
                O::KIND.title()
            );
        }
        Ok(record)
    }

    fn find_mut(&mut self, id_or_name: &str) -> Result<&mut StudentRecord<O>> {
        let index = self
            .position(id_or_name)
            .with_context(|| format!("No student '{}' in {}", id_or_name, O::KIND.title()))?;
        Ok(&mut self.students[index])
    }

    /// Append a blank row and return its id.
    pub fn add_student(&mut self, name: impl Into<String>) -> String {
        let next = self
            .students
            .iter()
            .filter_map(|s| s.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let id = next.to_string();
        self.students.push(StudentRecord::new(id.clone(), name));
        id
    }

    /// Remove a row. The last remaining row cannot be removed.
    pub fn remove_student(&mut self, id_or_name: &str) -> Result<StudentRecord<O>> {
        let index = self
            .position(id_or_name)
            .with_context(|| format!("No student '{}' in {}", id_or_name, O::KIND.title()))?;
        if self.students.len() <= 1 {
            bail!("Cannot remove the last student of the grid");
        }
        Ok(self.students.remove(index))
    }

    pub fn rename(&mut self, id_or_name: &str, name: impl Into<String>) -> Result<()> {
        self.find_mut(id_or_name)?.name = name.into();
        Ok(())
    }

    /// Set the free-text teacher observation. Fails for grids without one.
    pub fn set_note(&mut self, id_or_name: &str, text: impl Into<String>) -> Result<()> {
        let record = self.find_mut(id_or_name)?;
        match record.observations.note_mut() {
            Some(note) => {
                *note = text.into();
                Ok(())
            }
            None => bail!("{} has no teacher observation field", O::KIND.title()),
        }
    }

    /// Write one checkbox for a student and recompute their category immediately.
    pub fn update(
        &mut self,
        id_or_name: &str,
        update: O::Update,
        checked: bool,
        coefficients: &Coefficients,
    ) -> Result<&StudentRecord<O>> {
        let record = self.find_mut(id_or_name)?;
        record.apply(update, checked, coefficients);
        Ok(&*record)
    }

    /// Relabel every row, e.g. after loading or after the coefficients changed.
    pub fn recompute_all(&mut self, coefficients: &Coefficients) {
        for student in &mut self.students {
            student.recompute(coefficients);
        }
    }

    /// Rows with a name, which are the ones saved as results.
    pub fn completed(&self) -> Vec<StudentRecord<O>> {
        self.students
            .iter()
            .filter(|s| s.is_completed())
            .cloned()
            .collect()
    }
}
