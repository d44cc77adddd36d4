use crate::dom::NodeId;
use crate::{Error, Page, Result};

pub(crate) const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

pub(crate) const REQUIRED_MESSAGE: &str = "This field is required.";
pub(crate) const EMAIL_MESSAGE: &str = "Enter a valid email address.";
pub(crate) const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match.";
pub(crate) const DUE_DATE_MESSAGE: &str = "Set a due date on or after today.";

pub fn is_valid_email(email: &str) -> bool {
    fancy_regex::Regex::new(EMAIL_PATTERN)
        .ok()
        .and_then(|regex| regex.is_match(email).ok())
        .unwrap_or(false)
}

impl Page {
    pub fn validate_form(&mut self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        let form = if self
            .dom
            .tag_name(target)
            .map(|tag| tag.eq_ignore_ascii_case("form"))
            .unwrap_or(false)
        {
            target
        } else {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form".into(),
                actual: self.dom.tag_name(target).unwrap_or("non-element").into(),
            });
        };
        self.validate_form_node(form)
    }

    // Rules are evaluated independently: every violation is reported, not
    // just the first. Only the submitting form's subtree is touched.
    pub(crate) fn validate_form_node(&mut self, form: NodeId) -> Result<bool> {
        let mut is_valid = true;

        for field in self.dom.query_all(form, "[required]")? {
            let value = self.dom.value(field)?;
            if value.trim().is_empty() {
                self.show_field_error(field, REQUIRED_MESSAGE)?;
                is_valid = false;
            } else {
                self.clear_field_error(field)?;
            }
        }

        for field in self.dom.query_all(form, "input[type=email]")? {
            let value = self.dom.value(field)?;
            if value.is_empty() {
                continue;
            }
            let matched = self.email_regex.is_match(&value).unwrap_or(false);
            if !matched {
                self.show_field_error(field, EMAIL_MESSAGE)?;
                is_valid = false;
            }
        }

        let password = self.dom.query_first(form, "input[name=password]")?;
        let confirmation = self.dom.query_first(form, "input[name=confirmPassword]")?;
        if let (Some(password), Some(confirmation)) = (password, confirmation) {
            if self.dom.value(password)? != self.dom.value(confirmation)? {
                self.show_field_error(confirmation, PASSWORD_MISMATCH_MESSAGE)?;
                is_valid = false;
            }
        }

        if let Some(due_date) = self.dom.query_first(form, "input[name=dueDate]")? {
            let value = self.dom.value(due_date)?;
            // An unparseable value passes; only a parsed date in the past fails.
            if !value.is_empty() {
                if let Some(selected) = crate::behavior::time_label::parse_date_input(&value) {
                    if selected < self.current_date() {
                        self.show_field_error(due_date, DUE_DATE_MESSAGE)?;
                        is_valid = false;
                    }
                }
            }
        }

        Ok(is_valid)
    }

    pub(crate) fn show_field_error(&mut self, field: NodeId, message: &str) -> Result<()> {
        let Some(wrapper) = self.dom.closest(field, ".mdl-textfield")? else {
            return Ok(());
        };
        self.dom.add_class(wrapper, "is-invalid")?;
        if let Some(slot) = self.dom.query_first(wrapper, ".mdl-textfield__error")? {
            self.dom.set_text_content(slot, message)?;
        }
        Ok(())
    }

    pub(crate) fn clear_field_error(&mut self, field: NodeId) -> Result<()> {
        let Some(wrapper) = self.dom.closest(field, ".mdl-textfield")? else {
            return Ok(());
        };
        self.dom.remove_class(wrapper, "is-invalid")?;
        Ok(())
    }
}
