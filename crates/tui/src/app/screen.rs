use api_types::category::CategoryGroup;
use engine::{
    CategoryRow, DeleteGate, Editable, Entity, ItemRow, Lifecycle, ListController, ReferenceMaps,
    RequestError, Ticket, UnitRow, VendorRow, WarehouseRow,
    forms::{FieldInput, FieldSpec, FormModel},
};
use tokio::task::JoinHandle;

use super::{AppState, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

/// An open create or edit form.
#[derive(Debug)]
pub struct FormState<F> {
    pub mode: FormMode,
    pub form: F,
    pub focus: usize,
    pub error: Option<String>,
}

impl<F: FormModel> FormState<F> {
    pub fn new(mode: FormMode, form: F) -> Self {
        Self {
            mode,
            form,
            focus: 0,
            error: None,
        }
    }

    pub fn focused(&self) -> Option<&FieldSpec> {
        F::FIELDS.get(self.focus)
    }

    pub fn next_field(&mut self) {
        if !F::FIELDS.is_empty() {
            self.focus = (self.focus + 1) % F::FIELDS.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !F::FIELDS.is_empty() {
            self.focus = (self.focus + F::FIELDS.len() - 1) % F::FIELDS.len();
        }
    }

    fn typed_field(&mut self) -> Option<&mut String> {
        let input = self.focused()?.input;
        match input {
            FieldInput::Text | FieldInput::Number | FieldInput::Date => {
                self.form.value_mut(self.focus)
            }
            FieldInput::Group | FieldInput::Reference(_) => None,
        }
    }

    pub fn push(&mut self, ch: char) {
        if let Some(value) = self.typed_field() {
            value.push(ch);
        }
    }

    pub fn pop(&mut self) {
        if let Some(value) = self.typed_field() {
            value.pop();
        }
    }

    /// Moves a selection field to the next (or previous) choice. The first
    /// choice is always the empty placeholder.
    pub fn cycle(&mut self, refs: &ReferenceMaps, forward: bool) {
        let Some(spec) = self.focused().copied() else {
            return;
        };
        let choices = choices(spec.input, refs);
        if choices.len() < 2 {
            return;
        }
        let Some(value) = self.form.value_mut(self.focus) else {
            return;
        };
        let current = choices
            .iter()
            .position(|choice| choice == value)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % choices.len()
        } else {
            (current + choices.len() - 1) % choices.len()
        };
        *value = choices[next].clone();
    }
}

/// Raw values a selection field can take, placeholder first.
pub fn choices(input: FieldInput, refs: &ReferenceMaps) -> Vec<String> {
    let mut choices = vec![String::new()];
    match input {
        FieldInput::Group => {
            choices.extend(CategoryGroup::ALL.iter().map(|group| group.as_str().to_string()));
        }
        FieldInput::Reference(kind) => {
            if let Some(map) = refs.get(kind) {
                choices.extend(map.options().iter().map(|option| option.id.to_string()));
            }
        }
        FieldInput::Text | FieldInput::Number | FieldInput::Date => return Vec::new(),
    }
    choices
}

#[derive(Debug, Default)]
pub struct FilterState {
    pub input: String,
    pub applied: String,
    pub editing: bool,
}

/// Everything one section owns: its list, the reference maps of its last
/// load, the open form or delete modal, and its in-flight tasks.
#[derive(Debug)]
pub struct ScreenState<E: Entity> {
    pub list: ListController<E>,
    pub refs: ReferenceMaps,
    pub selected: usize,
    pub form: Option<FormState<E::Form>>,
    pub gate: DeleteGate,
    pub submit: Lifecycle,
    pub filter: FilterState,
    load_task: Option<JoinHandle<()>>,
    submit_task: Option<JoinHandle<()>>,
}

impl<E: Entity> Default for ScreenState<E> {
    fn default() -> Self {
        Self {
            list: ListController::new(),
            refs: ReferenceMaps::new(),
            selected: 0,
            form: None,
            gate: DeleteGate::default(),
            submit: Lifecycle::new(),
            filter: FilterState::default(),
            load_task: None,
            submit_task: None,
        }
    }
}

impl<E: Entity> ScreenState<E> {
    pub fn selected_row(&self) -> Option<&E> {
        self.list.rows().get(self.selected)
    }

    pub fn select_next(&mut self) {
        let len = self.list.rows().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_id(&mut self, id: i64) {
        if let Some(index) = self.list.rows().iter().position(|row| row.id() == id) {
            self.selected = index;
        }
    }

    pub fn clamp_selection(&mut self) {
        self.selected = self
            .selected
            .min(self.list.rows().len().saturating_sub(1));
    }

    /// Replaces the load task, aborting the one it supersedes.
    pub fn set_load_task(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.load_task.replace(handle) {
            previous.abort();
        }
    }

    pub fn set_submit_task(&mut self, handle: JoinHandle<()>) {
        if let Some(previous) = self.submit_task.replace(handle) {
            previous.abort();
        }
    }

    /// Abandons the in-flight list fetch, if any.
    pub fn cancel_load(&mut self) {
        if let Some(task) = self.load_task.take() {
            task.abort();
        }
        self.list.cancel();
    }

    pub fn shutdown(&mut self) {
        self.cancel_load();
        if let Some(task) = self.submit_task.take() {
            task.abort();
        }
        self.submit.cancel();
    }
}

/// Outcome of a task spawned for one section.
#[derive(Debug)]
pub enum ScreenEvent<E: Entity> {
    Loaded {
        ticket: Ticket,
        outcome: Result<(Vec<E>, ReferenceMaps), RequestError>,
    },
    Created {
        ticket: Ticket,
        outcome: Result<E, RequestError>,
    },
    Deleted {
        ticket: Ticket,
        id: i64,
        outcome: Result<(), RequestError>,
    },
}

/// Outcome of an edit: the update to patch in, already reconciled with the
/// server's echo.
#[derive(Debug)]
pub struct Edited<E: Editable> {
    pub ticket: Ticket,
    pub id: i64,
    pub outcome: Result<E::Update, RequestError>,
}

/// Messages from spawned request tasks back to the UI loop.
#[derive(Debug)]
pub enum Completion {
    Items(ScreenEvent<ItemRow>),
    Categories(ScreenEvent<CategoryRow>),
    Units(ScreenEvent<UnitRow>),
    Vendors(ScreenEvent<VendorRow>),
    Warehouses(ScreenEvent<WarehouseRow>),
    CategoryEdited(Edited<CategoryRow>),
    UnitEdited(Edited<UnitRow>),
    WarehouseEdited(Edited<WarehouseRow>),
}

/// Binds a row kind to its section and its slot in [`AppState`].
pub trait Screen: Entity {
    const SECTION: Section;
    /// Loads also fetch the category, unit and vendor collections.
    const HYDRATED: bool = false;

    fn state(app: &AppState) -> &ScreenState<Self>;
    fn state_mut(app: &mut AppState) -> &mut ScreenState<Self>;
    fn completion(event: ScreenEvent<Self>) -> Completion;
}

pub trait EditScreen: Screen + Editable {
    fn edited(event: Edited<Self>) -> Completion;
}

impl Screen for ItemRow {
    const SECTION: Section = Section::Items;
    const HYDRATED: bool = true;

    fn state(app: &AppState) -> &ScreenState<Self> {
        &app.items
    }

    fn state_mut(app: &mut AppState) -> &mut ScreenState<Self> {
        &mut app.items
    }

    fn completion(event: ScreenEvent<Self>) -> Completion {
        Completion::Items(event)
    }
}

impl Screen for CategoryRow {
    const SECTION: Section = Section::Categories;

    fn state(app: &AppState) -> &ScreenState<Self> {
        &app.categories
    }

    fn state_mut(app: &mut AppState) -> &mut ScreenState<Self> {
        &mut app.categories
    }

    fn completion(event: ScreenEvent<Self>) -> Completion {
        Completion::Categories(event)
    }
}

impl EditScreen for CategoryRow {
    fn edited(event: Edited<Self>) -> Completion {
        Completion::CategoryEdited(event)
    }
}

impl Screen for UnitRow {
    const SECTION: Section = Section::Units;

    fn state(app: &AppState) -> &ScreenState<Self> {
        &app.units
    }

    fn state_mut(app: &mut AppState) -> &mut ScreenState<Self> {
        &mut app.units
    }

    fn completion(event: ScreenEvent<Self>) -> Completion {
        Completion::Units(event)
    }
}

impl EditScreen for UnitRow {
    fn edited(event: Edited<Self>) -> Completion {
        Completion::UnitEdited(event)
    }
}

impl Screen for VendorRow {
    const SECTION: Section = Section::Vendors;

    fn state(app: &AppState) -> &ScreenState<Self> {
        &app.vendors
    }

    fn state_mut(app: &mut AppState) -> &mut ScreenState<Self> {
        &mut app.vendors
    }

    fn completion(event: ScreenEvent<Self>) -> Completion {
        Completion::Vendors(event)
    }
}

impl Screen for WarehouseRow {
    const SECTION: Section = Section::Warehouses;

    fn state(app: &AppState) -> &ScreenState<Self> {
        &app.warehouses
    }

    fn state_mut(app: &mut AppState) -> &mut ScreenState<Self> {
        &mut app.warehouses
    }

    fn completion(event: ScreenEvent<Self>) -> Completion {
        Completion::Warehouses(event)
    }
}

impl EditScreen for WarehouseRow {
    fn edited(event: Edited<Self>) -> Completion {
        Completion::WarehouseEdited(event)
    }
}

#[cfg(test)]
mod tests {
    use engine::{EntityKind, ReferenceMap, forms::ItemForm};
    use serde_json::json;

    use super::*;

    fn refs() -> ReferenceMaps {
        let mut refs = ReferenceMaps::new();
        refs.insert(
            EntityKind::Unit,
            ReferenceMap::build(
                EntityKind::Unit,
                &[json!({ "id": 2, "code": "KG" }), json!({ "id": 5, "code": "EA" })],
            ),
        );
        refs
    }

    #[test]
    fn reference_field_cycles_through_placeholder() {
        let mut form = FormState::new(FormMode::Create, ItemForm::default());
        form.focus = 3;
        let refs = refs();

        form.cycle(&refs, true);
        assert_eq!(form.form.unit_id, "2");
        form.cycle(&refs, true);
        assert_eq!(form.form.unit_id, "5");
        form.cycle(&refs, true);
        assert_eq!(form.form.unit_id, "");
        form.cycle(&refs, false);
        assert_eq!(form.form.unit_id, "5");
    }

    #[test]
    fn typing_only_reaches_text_fields() {
        let mut form = FormState::new(FormMode::Create, ItemForm::default());
        form.push('A');
        form.focus = 2;
        form.push('9');
        form.prev_field();
        form.prev_field();
        form.pop();
        assert_eq!(form.form.item_id, "");
        assert_eq!(form.form.category_id, "");
    }

    #[test]
    fn missing_reference_map_leaves_only_placeholder() {
        let mut form = FormState::new(FormMode::Create, ItemForm::default());
        form.focus = 4;
        form.cycle(&ReferenceMaps::new(), true);
        assert_eq!(form.form.vendor_id, "");
        assert_eq!(choices(FieldInput::Group, &ReferenceMaps::new()).len(), 10);
    }
}
