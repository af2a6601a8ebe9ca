pub mod defaults;
pub mod preview;
pub mod tree;

use std::sync::Arc;

use rand::Rng;

use crate::binding::{BoundField, FieldHandlers};
use crate::engine::FieldSource;
use crate::error::AppError;
use crate::models::{FieldDescriptor, FieldOrGroup, FieldPatch, FieldPath, FieldVariant};

pub use defaults::{VariantDefaults, VariantDefaultsTable};
pub use preview::{FormPreview, PreviewRow};

/// Message shown while the error flag is set.
pub const GENERATION_ERROR_MESSAGE: &str = "Error generating form fields";

/// Identifies one generation request. Only the most recent ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationTicket(u64);

/// What a generation request sends to a [`FieldSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub ticket: GenerationTicket,
    pub definition: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// The field tree was replaced.
    Applied,
    /// The request failed; the error flag is set and the tree is untouched.
    Failed,
    /// A newer request was issued meanwhile; the result was dropped.
    Stale,
}

/// In-memory state of the form builder screen.
///
/// Edits never mutate the current tree in place: each one builds a new tree
/// and installs it, so no state is shared between successive versions.
pub struct FormBuilder {
    fields: Vec<FieldOrGroup>,
    selected_field: Option<FieldDescriptor>,
    dialog_open: bool,
    interface_text: String,
    loading: bool,
    error: bool,
    last_ticket: u64,
    defaults: VariantDefaultsTable,
}

impl Default for FormBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::with_defaults(VariantDefaultsTable::builtin())
    }

    pub fn with_defaults(defaults: VariantDefaultsTable) -> Self {
        Self {
            fields: Vec::new(),
            selected_field: None,
            dialog_open: false,
            interface_text: String::new(),
            loading: false,
            error: false,
            last_ticket: 0,
            defaults,
        }
    }

    // --------------------------------------------------------------------
    // Accessors
    // --------------------------------------------------------------------

    pub fn fields(&self) -> &[FieldOrGroup] {
        &self.fields
    }

    pub fn selected_field(&self) -> Option<&FieldDescriptor> {
        self.selected_field.as_ref()
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn interface_text(&self) -> &str {
        &self.interface_text
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn error_message(&self) -> Option<&'static str> {
        self.error.then_some(GENERATION_ERROR_MESSAGE)
    }

    pub fn set_interface_text(&mut self, text: impl Into<String>) {
        self.interface_text = text.into();
    }

    // --------------------------------------------------------------------
    // Field editing
    // --------------------------------------------------------------------

    /// Add a field of `variant` at row `index` (clamped), or at the end when `None`.
    ///
    /// Returns the generated field name.
    pub fn add_field(&mut self, variant: FieldVariant, index: Option<usize>) -> String {
        let name = self.unique_field_name();
        let position = index.map_or(self.fields.len(), |i| i.min(self.fields.len()));
        let defaults = self.defaults.get(variant).cloned().unwrap_or_default();

        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };

        let mut field = FieldDescriptor::new(
            name.clone(),
            "",
            variant,
            non_empty(defaults.label).unwrap_or_else(|| name.clone()),
        );
        field.description = Some(defaults.description);
        field.placeholder = Some(non_empty(defaults.placeholder).unwrap_or_else(|| "Placeholder".into()));
        field.required = true;
        field.checked = true;

        let mut next = self.fields.clone();
        next.insert(position, FieldOrGroup::Field(field));
        tree::renumber_rows(&mut next);
        self.fields = next;

        tracing::debug!(name = %name, variant = %variant, position, "Added form field");
        name
    }

    /// `name_` followed by ten random digits, redrawn until unused.
    fn unique_field_name(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = format!("name_{:010}", rng.gen_range(0..10_000_000_000u64));
            if !tree::contains_name(&self.fields, &candidate) {
                return candidate;
            }
        }
    }

    pub fn find_field_path(&self, name: &str) -> Option<FieldPath> {
        tree::find_field_path(&self.fields, name)
    }

    /// Replace the descriptor at `path` with `merge(old, patch)`.
    pub fn update_field(&mut self, path: &FieldPath, patch: &FieldPatch) -> Result<(), AppError> {
        self.fields = tree::updated_tree(&self.fields, path, patch)?;
        Ok(())
    }

    pub fn remove_field(&mut self, path: &FieldPath) -> Result<FieldDescriptor, AppError> {
        let (next, removed) = tree::tree_without(&self.fields, path)?;
        self.fields = next;
        Ok(removed)
    }

    /// Reorder top-level rows.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), AppError> {
        self.fields = tree::tree_with_moved_row(&self.fields, from, to)?;
        Ok(())
    }

    // --------------------------------------------------------------------
    // Edit dialog
    // --------------------------------------------------------------------

    /// Open the edit dialog on a snapshot of `field`.
    pub fn open_edit_dialog(&mut self, field: &FieldDescriptor) {
        self.selected_field = Some(field.clone());
        self.dialog_open = true;
    }

    pub fn close_edit_dialog(&mut self) {
        self.dialog_open = false;
    }

    /// Apply the dialog's result to the field it was opened on, then close it.
    ///
    /// The target is located by the snapshot's name. The dialog closes even
    /// when that lookup fails; the return value tells whether anything changed.
    pub fn save_field(&mut self, updated: FieldDescriptor) -> bool {
        let target = self.selected_field.as_ref().map(|f| f.name.clone());
        let applied = match target {
            Some(name) => match self.find_field_path(&name) {
                Some(path) => self.update_field(&path, &FieldPatch::from(updated)).is_ok(),
                None => {
                    tracing::warn!(name = %name, "Edited field no longer exists");
                    false
                }
            },
            None => false,
        };
        self.dialog_open = false;
        applied
    }

    // --------------------------------------------------------------------
    // Generation
    // --------------------------------------------------------------------

    /// Mark a generation request as in flight and hand out its ticket.
    pub fn begin_generation(&mut self) -> GenerationRequest {
        self.last_ticket += 1;
        self.loading = true;
        self.error = false;
        GenerationRequest {
            ticket: GenerationTicket(self.last_ticket),
            definition: serde_json::Value::String(self.interface_text.clone()),
        }
    }

    /// Apply the result of the request holding `ticket`.
    ///
    /// Success replaces the whole tree with the flat field list. Failure keeps
    /// the tree and raises the error flag. Results of superseded requests are
    /// ignored.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<Vec<FieldDescriptor>, AppError>,
    ) -> GenerationOutcome {
        if ticket.0 != self.last_ticket {
            tracing::debug!(ticket = ticket.0, latest = self.last_ticket, "Dropping stale generation result");
            return GenerationOutcome::Stale;
        }

        self.loading = false;
        match result {
            Ok(fields) => {
                self.fields = fields.into_iter().map(FieldOrGroup::Field).collect();
                GenerationOutcome::Applied
            }
            Err(e) => {
                tracing::error!("Error generating form fields: {}", e);
                self.error = true;
                GenerationOutcome::Failed
            }
        }
    }

    /// Generate fields from the current interface text.
    pub async fn generate_fields(&mut self, source: &dyn FieldSource) -> GenerationOutcome {
        let request = self.begin_generation();
        let result = source.fetch_fields(Some(&request.definition)).await;
        self.complete_generation(request.ticket, result)
    }

    // --------------------------------------------------------------------
    // Rendering
    // --------------------------------------------------------------------

    pub fn preview(&self) -> FormPreview {
        FormPreview::build(&self.fields)
    }

    /// Bind every field to `handlers`, one inner list per row.
    pub fn bind_fields(&self, handlers: Arc<dyn FieldHandlers>) -> Vec<Vec<BoundField>> {
        self.fields
            .iter()
            .map(|item| {
                item.fields()
                    .iter()
                    .map(|f| BoundField::new(f.clone(), handlers.clone()))
                    .collect()
            })
            .collect()
    }
}
