use super::target::TargetModel;

/// Ordered set of selected target models.
///
/// Toggling appends a model that is not yet selected and removes one that
/// is, so the remaining members keep their first-selected order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSelection {
    models: Vec<TargetModel>,
}

impl ModelSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `model` is selected after the toggle.
    pub fn toggle(&mut self, model: TargetModel) -> bool {
        if let Some(index) = self.models.iter().position(|current| *current == model) {
            self.models.remove(index);
            return false;
        }
        self.models.push(model);
        true
    }

    pub fn is_selected(&self, model: TargetModel) -> bool {
        self.models.contains(&model)
    }

    pub fn models(&self) -> &[TargetModel] {
        self.models.as_slice()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn joined(&self) -> String {
        self.models
            .iter()
            .map(|model| model.as_str())
            .collect::<Vec<&str>>()
            .join(", ")
    }
}

impl FromIterator<TargetModel> for ModelSelection {
    fn from_iter<I: IntoIterator<Item = TargetModel>>(iter: I) -> Self {
        let mut selection = ModelSelection::new();
        for model in iter {
            if !selection.is_selected(model) {
                selection.models.push(model);
            }
        }
        selection
    }
}
