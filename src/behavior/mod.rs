use crate::events::{Behavior, EventState};
use crate::timers::TimerAction;
use crate::{Page, Result};

pub(crate) mod affordances;
pub(crate) mod notify;
pub(crate) mod time_label;
pub(crate) mod validation;

pub(crate) const MESSAGE_VISIBLE_MS: i64 = 5000;
pub(crate) const MESSAGE_FADE_MS: i64 = 500;
pub(crate) const TOAST_VISIBLE_MS: i64 = 3000;
pub(crate) const TOAST_FADE_MS: i64 = 500;
pub(crate) const RELATIVE_TIME_REFRESH_MS: i64 = 60_000;
pub(crate) const RESIZE_DEBOUNCE_MS: i64 = 250;

impl Page {
    pub(crate) fn install_behaviors(&mut self) -> Result<()> {
        let root = self.dom.root;

        for message in self.dom.query_all(root, ".message-card")? {
            self.schedule_auto_hide(message, MESSAGE_VISIBLE_MS, MESSAGE_FADE_MS);
        }

        for form in self.dom.query_all(root, "form")? {
            self.listeners.add(form, "submit", Behavior::ValidateOnSubmit);
        }

        for gated in self.dom.query_all(root, "[data-confirm]")? {
            self.listeners.add(gated, "click", Behavior::ConfirmGate);
        }

        self.apply_date_minimums()?;

        if let Some(search_form) = self.dom.query_first(root, "#searchForm")? {
            if let Some(filter) = self
                .dom
                .query_first(search_form, "select[name=completed]")?
            {
                self.listeners
                    .add(filter, "change", Behavior::FilterAutoSubmit { form: search_form });
            }
            if let Some(clear) = self.dom.query_first(root, "#clearSearch")? {
                self.listeners
                    .add(clear, "click", Behavior::ClearSearch { form: search_form });
            }
        }

        for link in self.dom.query_all(root, ".pagination-link")? {
            self.listeners.add(link, "click", Behavior::PaginationNav);
        }

        self.listeners.add(root, "keydown", Behavior::GlobalShortcuts);
        self.listeners
            .add(root, "visibilitychange", Behavior::VisibilityRefresh);
        self.listeners.add(root, "resize", Behavior::DebouncedEnhance);

        self.start_relative_time_refresh();
        Ok(())
    }

    pub(crate) fn run_behavior(
        &mut self,
        behavior: &Behavior,
        event: &mut EventState,
    ) -> Result<()> {
        match behavior {
            Behavior::ValidateOnSubmit => {
                let form = event.current_target;
                if !self.validate_form_node(form)? {
                    event.prevent_default();
                }
            }
            Behavior::ConfirmGate => self.run_confirm_gate(event),
            Behavior::FilterAutoSubmit { form } => {
                let form = *form;
                self.submit_programmatic(form)?;
            }
            Behavior::ClearSearch { form } => {
                let form = *form;
                self.run_clear_search(form)?;
            }
            Behavior::PaginationNav => {
                event.prevent_default();
                if let Some(href) = self.dom.attr(event.current_target, "href") {
                    if !href.is_empty() {
                        self.navigate(&href);
                    }
                }
            }
            Behavior::GlobalShortcuts => self.run_keyboard_shortcuts(event)?,
            Behavior::VisibilityRefresh => {
                if !self.hidden {
                    self.update_relative_times()?;
                }
            }
            Behavior::DebouncedEnhance => {
                // Each resize cancels the pending pass; only the last one runs.
                if let Some(pending) = self.resize_debounce_id.take() {
                    self.clear_timeout(pending);
                }
                let id = self.set_timeout(RESIZE_DEBOUNCE_MS, TimerAction::Enhance);
                self.resize_debounce_id = Some(id);
            }
        }
        Ok(())
    }

    pub(crate) fn apply_enhancements(&mut self) -> Result<()> {
        self.apply_date_minimums()?;
        self.update_relative_times()
    }

    fn apply_date_minimums(&mut self) -> Result<()> {
        let today = self.current_date().format("%Y-%m-%d").to_string();
        for field in self.dom.query_all(self.dom.root, "input[type=date]")? {
            self.dom.set_attr(field, "min", &today)?;
        }
        Ok(())
    }

    pub fn start_relative_time_refresh(&mut self) {
        if self.refresh_timer_id.is_some() {
            return;
        }
        let id = self.set_interval(RELATIVE_TIME_REFRESH_MS, TimerAction::RefreshTimeLabels);
        self.refresh_timer_id = Some(id);
    }

    pub fn stop_relative_time_refresh(&mut self) {
        if let Some(id) = self.refresh_timer_id.take() {
            self.clear_timeout(id);
        }
    }
}
