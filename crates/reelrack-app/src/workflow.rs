// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use std::time::Duration;

use crate::model::CustomerDetail;

/// Delay before a panel reopens on a different row, covering the closing
/// transition of the previous row's panel.
pub const PANEL_SWITCH_DELAY: Duration = Duration::from_millis(220);
/// Delay before a successfully submitted edit panel closes itself.
pub const EDIT_AUTO_CLOSE_DELAY: Duration = Duration::from_millis(1500);

pub trait PanelForm: Default {
    fn reset(&mut self) {
        *self = Self::default();
    }

    /// Clears transient input after a successful submission. Mode-style
    /// selections survive; free-text fields do not.
    fn clear_transient(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RentMode {
    #[default]
    ById,
    ByName,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RentForm {
    pub mode: RentMode,
    pub customer_id: String,
    pub first_name: String,
    pub last_name: String,
}

/// Validated customer lookup for a rent submission, one of two mutually
/// exclusive modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RentLookup {
    ById(String),
    ByName { first: String, last: String },
}

impl RentForm {
    pub fn validate(&self) -> Result<RentLookup> {
        match self.mode {
            RentMode::ById => {
                let id = self.customer_id.trim();
                if id.is_empty() {
                    bail!("Enter a customer ID.");
                }
                Ok(RentLookup::ById(id.to_owned()))
            }
            RentMode::ByName => {
                let first = self.first_name.trim();
                let last = self.last_name.trim();
                if first.is_empty() || last.is_empty() {
                    bail!("Enter both first and last name.");
                }
                Ok(RentLookup::ByName {
                    first: first.to_owned(),
                    last: last.to_owned(),
                })
            }
        }
    }
}

impl PanelForm for RentForm {
    fn clear_transient(&mut self) {
        self.customer_id.clear();
        self.first_name.clear();
        self.last_name.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReturnForm {
    pub rental_id: String,
}

impl ReturnForm {
    pub fn validate(&self) -> Result<String> {
        let rental_id = self.rental_id.trim();
        if rental_id.is_empty() {
            bail!("Enter a rental ID.");
        }
        Ok(rental_id.to_owned())
    }
}

impl PanelForm for ReturnForm {
    fn clear_transient(&mut self) {
        self.rental_id.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl EditForm {
    /// Pre-populates from a cached detail record. The caller only passes a
    /// record whose status is Success; anything else opens blank.
    pub fn prefill(detail: &CustomerDetail) -> Self {
        Self {
            first_name: detail.first_name.clone(),
            last_name: detail.last_name.clone(),
            email: detail.email.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty()
            || self.last_name.trim().is_empty()
            || self.email.trim().is_empty()
        {
            bail!("First name, last name, and email are required.");
        }
        Ok(())
    }
}

impl PanelForm for EditForm {
    fn clear_transient(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddCustomerForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl AddCustomerForm {
    pub fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty()
            || self.last_name.trim().is_empty()
            || self.email.trim().is_empty()
        {
            bail!("First name, last name, and email are required.");
        }
        Ok(())
    }
}

impl PanelForm for AddCustomerForm {
    fn clear_transient(&mut self) {
        self.reset();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelStatus {
    pub kind: StatusKind,
    pub message: String,
}

impl PanelStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }
}

/// Outcome of a toggle; tells the UI what, if anything, to schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction<K> {
    Opened(K),
    Closed,
    /// The previous row's panel is closing; reopen for `target` when the
    /// timer stamped with `token` fires.
    SwitchScheduled {
        target: K,
        token: u64,
    },
}

/// Open/closed state of one workflow kind's inline panel. At most one row
/// has the panel open; timers carry a supersession token so callbacks that
/// lost a race against user input are no-ops.
#[derive(Debug, Clone)]
pub struct PanelController<K, F> {
    open: Option<K>,
    form: F,
    submitting: Option<K>,
    status: Option<PanelStatus>,
    pending_switch: Option<K>,
    token: u64,
}

impl<K: Copy + PartialEq, F: PanelForm> Default for PanelController<K, F> {
    fn default() -> Self {
        Self {
            open: None,
            form: F::default(),
            submitting: None,
            status: None,
            pending_switch: None,
            token: 0,
        }
    }
}

impl<K: Copy + PartialEq, F: PanelForm> PanelController<K, F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_target(&self) -> Option<K> {
        self.open
    }

    pub fn is_open(&self, target: K) -> bool {
        self.open == Some(target)
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn status(&self) -> Option<&PanelStatus> {
        self.status.as_ref()
    }

    pub fn set_form(&mut self, form: F) {
        self.form = form;
    }

    /// Opens the panel for `target`, closes it if it was already open for
    /// `target`, or schedules a delayed switch when another row's panel is
    /// open. Any outstanding timer is superseded.
    pub fn toggle(&mut self, target: K) -> PanelAction<K> {
        self.token += 1;
        self.pending_switch = None;
        self.status = None;

        if self.open == Some(target) {
            self.open = None;
            self.form.reset();
            return PanelAction::Closed;
        }

        if self.open.is_some() {
            self.open = None;
            self.form.reset();
            self.pending_switch = Some(target);
            return PanelAction::SwitchScheduled {
                target,
                token: self.token,
            };
        }

        self.open = Some(target);
        self.form.reset();
        PanelAction::Opened(target)
    }

    /// Completes a scheduled switch. Stale tokens are ignored.
    pub fn switch_fired(&mut self, token: u64) -> Option<K> {
        if token != self.token {
            return None;
        }
        let target = self.pending_switch.take()?;
        self.open = Some(target);
        self.form.reset();
        self.status = None;
        Some(target)
    }

    pub fn close(&mut self) {
        self.token += 1;
        self.open = None;
        self.pending_switch = None;
        self.form.reset();
        self.status = None;
    }

    /// Closes the panel only when it references `target` (delete success
    /// path). Pending switches onto the row are cancelled too.
    pub fn close_if_target(&mut self, target: K) {
        if self.open == Some(target) || self.pending_switch == Some(target) {
            self.close();
        }
    }

    /// Marks the submission in flight. Returns false (and changes nothing)
    /// when one is already pending, which is what keeps the submit control
    /// disabled locally.
    pub fn begin_submit(&mut self, target: K) -> bool {
        if self.submitting.is_some() {
            return false;
        }
        self.submitting = Some(target);
        true
    }

    pub fn is_submitting(&self, target: K) -> bool {
        self.submitting == Some(target)
    }

    pub fn submission_in_flight(&self) -> bool {
        self.submitting.is_some()
    }

    /// Records a success. Transient form fields clear and the message shows
    /// only when the panel still references the submission's row; a result
    /// arriving after the panel moved on just clears the in-flight flag.
    pub fn submit_succeeded(&mut self, target: K, message: impl Into<String>) {
        if self.submitting == Some(target) {
            self.submitting = None;
        }
        if self.open == Some(target) {
            self.status = Some(PanelStatus::success(message));
            self.form.clear_transient();
        }
    }

    pub fn submit_failed(&mut self, target: K, message: impl Into<String>) {
        if self.submitting == Some(target) {
            self.submitting = None;
        }
        if self.open == Some(target) {
            self.status = Some(PanelStatus::error(message));
        }
    }

    /// Reports a local validation error without touching in-flight state.
    pub fn reject(&mut self, target: K, message: impl Into<String>) {
        if self.open == Some(target) {
            self.status = Some(PanelStatus::error(message));
        }
    }

    /// Arms the post-success auto-close timer. Returns the token the timer
    /// must present; None when the panel no longer shows `target`.
    pub fn schedule_auto_close(&mut self, target: K) -> Option<u64> {
        if self.open != Some(target) {
            return None;
        }
        self.token += 1;
        Some(self.token)
    }

    /// Fires the auto-close timer. Stale tokens (the user already acted)
    /// are ignored.
    pub fn auto_close_fired(&mut self, token: u64) -> bool {
        if token != self.token || self.open.is_none() {
            return false;
        }
        self.close();
        true
    }
}

/// Guard against duplicate concurrent delete submissions. One delete is in
/// flight at a time; it is keyed by row so the completion event can clear
/// the right one.
#[derive(Debug, Clone, Copy)]
pub struct DeleteGuard<K> {
    in_flight: Option<K>,
}

impl<K> Default for DeleteGuard<K> {
    fn default() -> Self {
        Self { in_flight: None }
    }
}

impl<K: Copy + PartialEq> DeleteGuard<K> {
    pub fn begin(&mut self, target: K) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.in_flight = Some(target);
        true
    }

    pub fn is_deleting(&self, target: K) -> bool {
        self.in_flight == Some(target)
    }

    pub fn finish(&mut self, target: K) {
        if self.in_flight == Some(target) {
            self.in_flight = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AddCustomerForm, DeleteGuard, EditForm, PanelAction, PanelController, PanelForm,
        RentForm, RentLookup, RentMode, ReturnForm, StatusKind,
    };
    use crate::ids::{CustomerId, FilmId};
    use crate::model::CustomerDetail;

    fn rent_panel() -> PanelController<FilmId, RentForm> {
        PanelController::new()
    }

    #[test]
    fn rent_form_requires_active_mode_fields() {
        let mut form = RentForm::default();
        assert!(form.validate().is_err());

        form.customer_id = "  42  ".to_owned();
        assert_eq!(
            form.validate().expect("id mode validates"),
            RentLookup::ById("42".to_owned())
        );

        form.mode = RentMode::ByName;
        assert!(form.validate().is_err());
        form.first_name = "Mary".to_owned();
        assert!(form.validate().is_err());
        form.last_name = " Smith ".to_owned();
        assert_eq!(
            form.validate().expect("name mode validates"),
            RentLookup::ByName {
                first: "Mary".to_owned(),
                last: "Smith".to_owned(),
            }
        );
    }

    #[test]
    fn rent_form_clear_transient_keeps_mode() {
        let mut form = RentForm {
            mode: RentMode::ByName,
            customer_id: "3".to_owned(),
            first_name: "Mary".to_owned(),
            last_name: "Smith".to_owned(),
        };
        form.clear_transient();
        assert_eq!(form.mode, RentMode::ByName);
        assert!(form.first_name.is_empty());
        assert!(form.customer_id.is_empty());
    }

    #[test]
    fn return_form_requires_rental_id() {
        let mut form = ReturnForm::default();
        assert!(form.validate().is_err());
        form.rental_id = " 901 ".to_owned();
        assert_eq!(form.validate().expect("validates"), "901");
    }

    #[test]
    fn edit_form_prefills_from_detail() {
        let detail = CustomerDetail {
            id: CustomerId::new(1),
            first_name: "Mary".to_owned(),
            last_name: "Smith".to_owned(),
            email: "mary@example.com".to_owned(),
            active: true,
            active_rentals: Some(2),
        };
        let form = EditForm::prefill(&detail);
        assert_eq!(form.email, "mary@example.com");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn add_customer_form_requires_all_fields() {
        let mut form = AddCustomerForm::default();
        assert!(form.validate().is_err());
        form.first_name = "Ada".to_owned();
        form.last_name = "Lovelace".to_owned();
        form.email = "ada@example.com".to_owned();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn toggle_open_close_resets_form() {
        let mut panel = rent_panel();
        let target = FilmId::new(1);

        assert_eq!(panel.toggle(target), PanelAction::Opened(target));
        panel.form_mut().customer_id = "9".to_owned();

        assert_eq!(panel.toggle(target), PanelAction::Closed);
        assert!(panel.open_target().is_none());
        assert!(panel.form().customer_id.is_empty());
    }

    #[test]
    fn switching_rows_goes_through_a_scheduled_close() {
        let mut panel = rent_panel();
        let first = FilmId::new(1);
        let second = FilmId::new(2);

        panel.toggle(first);
        let action = panel.toggle(second);
        let PanelAction::SwitchScheduled { target, token } = action else {
            panic!("expected scheduled switch, got {action:?}");
        };
        assert_eq!(target, second);
        assert!(panel.open_target().is_none());

        assert_eq!(panel.switch_fired(token), Some(second));
        assert!(panel.is_open(second));
    }

    #[test]
    fn superseded_switch_timer_is_ignored() {
        let mut panel = rent_panel();
        panel.toggle(FilmId::new(1));
        let action = panel.toggle(FilmId::new(2));
        let PanelAction::SwitchScheduled { token, .. } = action else {
            panic!("expected scheduled switch");
        };

        // User opens a third row before the switch timer fires.
        panel.toggle(FilmId::new(3));
        assert!(panel.switch_fired(token).is_none());
        assert!(panel.is_open(FilmId::new(3)));
    }

    #[test]
    fn begin_submit_rejects_second_submission() {
        let mut panel = rent_panel();
        let target = FilmId::new(4);
        panel.toggle(target);

        assert!(panel.begin_submit(target));
        assert!(!panel.begin_submit(target));
        assert!(panel.is_submitting(target));

        panel.submit_succeeded(target, "Successfully rented.");
        assert!(!panel.submission_in_flight());
        assert!(panel.begin_submit(target));
    }

    #[test]
    fn rent_success_clears_fields_keeps_panel_open() {
        let mut panel = rent_panel();
        let target = FilmId::new(5);
        panel.toggle(target);
        {
            let form = panel.form_mut();
            form.mode = RentMode::ByName;
            form.first_name = "Mary".to_owned();
            form.last_name = "Smith".to_owned();
        }
        panel.begin_submit(target);
        panel.submit_succeeded(target, "Successfully rented.");

        assert!(panel.is_open(target));
        assert_eq!(panel.form().mode, RentMode::ByName);
        assert!(panel.form().first_name.is_empty());
        let status = panel.status().expect("status set");
        assert_eq!(status.kind, StatusKind::Success);
    }

    #[test]
    fn late_result_after_panel_moved_on_only_clears_in_flight() {
        let mut panel = rent_panel();
        let first = FilmId::new(6);
        panel.toggle(first);
        panel.begin_submit(first);

        panel.toggle(first); // user closes while the request is in flight
        panel.submit_succeeded(first, "Successfully rented.");

        assert!(panel.open_target().is_none());
        assert!(panel.status().is_none());
        assert!(!panel.submission_in_flight());
    }

    #[test]
    fn auto_close_fires_only_with_current_token() {
        let mut panel: PanelController<CustomerId, EditForm> = PanelController::new();
        let target = CustomerId::new(7);
        panel.toggle(target);

        let token = panel.schedule_auto_close(target).expect("panel open");
        assert!(panel.auto_close_fired(token));
        assert!(panel.open_target().is_none());

        // Second fire with the same token finds the panel gone.
        assert!(!panel.auto_close_fired(token));
    }

    #[test]
    fn auto_close_superseded_by_reopen() {
        let mut panel: PanelController<CustomerId, EditForm> = PanelController::new();
        let target = CustomerId::new(8);
        panel.toggle(target);
        let token = panel.schedule_auto_close(target).expect("panel open");

        panel.toggle(target);
        panel.toggle(target);
        assert!(!panel.auto_close_fired(token));
        assert!(panel.is_open(target));
    }

    #[test]
    fn close_if_target_ignores_other_rows() {
        let mut panel: PanelController<CustomerId, EditForm> = PanelController::new();
        panel.toggle(CustomerId::new(1));

        panel.close_if_target(CustomerId::new(2));
        assert!(panel.is_open(CustomerId::new(1)));

        panel.close_if_target(CustomerId::new(1));
        assert!(panel.open_target().is_none());
    }

    #[test]
    fn delete_guard_allows_one_in_flight_delete() {
        let mut guard: DeleteGuard<CustomerId> = DeleteGuard::default();
        let first = CustomerId::new(1);
        let second = CustomerId::new(2);

        assert!(guard.begin(first));
        assert!(!guard.begin(first));
        assert!(!guard.begin(second));
        assert!(guard.is_deleting(first));

        guard.finish(second);
        assert!(guard.is_deleting(first));
        guard.finish(first);
        assert!(guard.begin(second));
    }
}
