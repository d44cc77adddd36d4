use std::collections::VecDeque;

use crate::dom::NodeId;
use crate::events::EventState;
use crate::{Page, Result};

#[derive(Debug, Clone)]
pub enum ConfirmPolicy {
    AcceptAll,
    DismissAll,
    Scripted(VecDeque<bool>),
}

impl ConfirmPolicy {
    pub fn scripted(responses: impl IntoIterator<Item = bool>) -> Self {
        Self::Scripted(responses.into_iter().collect())
    }

    // A scripted queue that runs dry answers negatively, like DismissAll.
    fn answer(&mut self) -> bool {
        match self {
            Self::AcceptAll => true,
            Self::DismissAll => false,
            Self::Scripted(responses) => responses.pop_front().unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub message: String,
    pub accepted: bool,
}

impl Page {
    pub fn set_confirm_policy(&mut self, policy: ConfirmPolicy) {
        self.confirm_policy = policy;
    }

    pub fn confirm_prompts(&self) -> &[ConfirmPrompt] {
        &self.confirm_log
    }

    pub(crate) fn run_confirm_gate(&mut self, event: &mut EventState) {
        let message = self
            .dom
            .attr(event.current_target, "data-confirm")
            .unwrap_or_default();
        let accepted = self.confirm_policy.answer();
        self.confirm_log.push(ConfirmPrompt {
            message,
            accepted,
        });
        if !accepted {
            event.prevent_default();
        }
    }

    pub(crate) fn run_clear_search(&mut self, form: NodeId) -> Result<()> {
        if let Some(search) = self.dom.query_first(form, "input[name=search]")? {
            self.dom.set_value(search, "")?;
        }
        if let Some(filter) = self.dom.query_first(form, "select[name=completed]")? {
            self.dom.set_value(filter, "")?;
        }
        self.submit_programmatic(form)
    }

    pub(crate) fn run_keyboard_shortcuts(&mut self, event: &mut EventState) -> Result<()> {
        let Some(key) = event.key.clone() else {
            return Ok(());
        };

        if (key.ctrl || key.meta) && key.key == "n" {
            event.prevent_default();
            if let Some(link) = self
                .dom
                .query_first(self.dom.root, r#"a[href*="/todos/new"]"#)?
            {
                if let Some(href) = self.dom.attr(link, "href") {
                    self.navigate(&href);
                }
            }
            return Ok(());
        }

        if key.key == "Escape" {
            let Some(search) = self.dom.query_first(self.dom.root, "input[name=search]")? else {
                return Ok(());
            };
            if self.active_element == Some(search) {
                self.dom.set_value(search, "")?;
                self.blur_node(search)?;
            }
        }
        Ok(())
    }

    pub fn toggle_todo_completion(&mut self, todo_id: u64) -> Result<()> {
        let form = self.dom.create_detached_element("form");
        self.dom.set_attr(form, "method", "POST")?;
        self.dom
            .set_attr(form, "action", &format!("/todos/{todo_id}/toggle"))?;

        // Degrades gracefully: without both meta tags the form carries no token.
        let token = self.meta_content("_csrf")?;
        let header = self.meta_content("_csrf_header")?;
        if let (Some(token), Some(header)) = (token, header) {
            let input = self.dom.create_detached_element("input");
            self.dom.set_attr(input, "type", "hidden")?;
            self.dom.set_attr(input, "name", &header)?;
            self.dom.set_attr(input, "value", &token)?;
            self.dom.append_child(form, input)?;
        }

        let body = self
            .dom
            .query_first(self.dom.root, "body")?
            .unwrap_or(self.dom.root);
        self.dom.append_child(body, form)?;
        self.submit_programmatic(form)
    }

    fn meta_content(&self, name: &str) -> Result<Option<String>> {
        let selector = format!("meta[name={name}]");
        Ok(self
            .dom
            .query_first(self.dom.root, &selector)?
            .and_then(|meta| self.dom.attr(meta, "content")))
    }
}
