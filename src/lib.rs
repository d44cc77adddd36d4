use std::error::Error as StdError;
use std::fmt;

use chrono::{Duration, NaiveDate};

mod behavior;
mod dom;
mod events;
mod html;
mod selector;
mod timers;

#[cfg(test)]
mod tests;

pub use behavior::affordances::{ConfirmPolicy, ConfirmPrompt};
pub use behavior::notify::ToastKind;
pub use behavior::validation::is_valid_email;
pub use timers::PendingTimer;

use dom::{Dom, NodeId};
use events::{KeyInput, ListenerStore};
use timers::ScheduledTask;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    SelectorNotFound(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    Runtime(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
            Self::Runtime(msg) => write!(f, "runtime error: {msg}"),
        }
    }
}

impl StdError for Error {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub action: String,
    pub method: String,
    pub fields: Vec<(String, String)>,
}

pub struct Page {
    dom: Dom,
    listeners: ListenerStore,
    task_queue: Vec<ScheduledTask>,
    active_element: Option<NodeId>,
    now_ms: i64,
    today: NaiveDate,
    timer_step_limit: usize,
    next_timer_id: i64,
    next_task_order: i64,
    url: String,
    navigations: Vec<String>,
    submissions: Vec<FormSubmission>,
    confirm_policy: ConfirmPolicy,
    confirm_log: Vec<ConfirmPrompt>,
    hidden: bool,
    refresh_timer_id: Option<i64>,
    resize_debounce_id: Option<i64>,
    email_regex: fancy_regex::Regex,
    trace: bool,
    trace_events: bool,
    trace_timers: bool,
    trace_logs: Vec<String>,
    trace_log_limit: usize,
    trace_to_stderr: bool,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::build("about:blank", html, chrono::Local::now().date_naive())
    }

    pub fn from_html_with_url(url: &str, html: &str) -> Result<Self> {
        Self::build(url, html, chrono::Local::now().date_naive())
    }

    pub fn from_html_with_today(html: &str, today: NaiveDate) -> Result<Self> {
        Self::build("about:blank", html, today)
    }

    fn build(url: &str, html: &str, today: NaiveDate) -> Result<Self> {
        let dom = html::parse_html(html)?;
        let email_regex = fancy_regex::Regex::new(behavior::validation::EMAIL_PATTERN)
            .map_err(|err| Error::Runtime(format!("email pattern failed to compile: {err}")))?;
        let mut page = Self {
            dom,
            listeners: ListenerStore::default(),
            task_queue: Vec::new(),
            active_element: None,
            now_ms: 0,
            today,
            timer_step_limit: 10_000,
            next_timer_id: 1,
            next_task_order: 0,
            url: url.to_string(),
            navigations: Vec::new(),
            submissions: Vec::new(),
            confirm_policy: ConfirmPolicy::AcceptAll,
            confirm_log: Vec::new(),
            hidden: false,
            refresh_timer_id: None,
            resize_debounce_id: None,
            email_regex,
            trace: false,
            trace_events: true,
            trace_timers: true,
            trace_logs: Vec::new(),
            trace_log_limit: 10_000,
            trace_to_stderr: true,
        };
        page.install_behaviors()?;
        Ok(page)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    pub fn submissions(&self) -> &[FormSubmission] {
        &self.submissions
    }

    pub fn set_today(&mut self, today: NaiveDate) -> Result<()> {
        self.today = today;
        self.apply_enhancements()
    }

    pub(crate) fn current_date(&self) -> NaiveDate {
        self.today + Duration::days(self.now_ms / 86_400_000)
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_first(self.dom.root, selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) || self.dom.readonly(target) {
            return Ok(());
        }

        let tag = self
            .dom
            .tag_name(target)
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: "non-element".into(),
            })?
            .to_ascii_lowercase();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }

        self.dom.set_value(target, text)?;
        self.dispatch_event(target, "input", None)?;
        Ok(())
    }

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        if !is_check_input(&self.dom, target) {
            let tag = self
                .dom
                .tag_name(target)
                .unwrap_or_default()
                .to_ascii_lowercase();
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input[type=checkbox|radio]".into(),
                actual: tag,
            });
        }

        if self.dom.checked(target)? != checked {
            self.dom.set_checked(target, checked)?;
            self.dispatch_event(target, "input", None)?;
            self.dispatch_event(target, "change", None)?;
        }
        Ok(())
    }

    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let tag = self
            .dom
            .tag_name(target)
            .unwrap_or_default()
            .to_ascii_lowercase();
        if tag != "select" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "select".into(),
                actual: tag,
            });
        }

        if self.dom.value(target)? != value {
            self.dom.set_value(target, value)?;
            self.dispatch_event(target, "change", None)?;
        }
        Ok(())
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }

        let outcome = self.dispatch_event(target, "click", None)?;
        if outcome.default_prevented {
            return Ok(());
        }

        if is_check_input(&self.dom, target) {
            let current = self.dom.checked(target)?;
            self.dom.set_checked(target, !current)?;
            self.dispatch_event(target, "input", None)?;
            self.dispatch_event(target, "change", None)?;
            return Ok(());
        }

        if let Some(anchor) = self.dom.closest(target, "a[href]")? {
            if let Some(href) = self.dom.attr(anchor, "href") {
                if !href.is_empty() {
                    self.navigate(&href);
                }
            }
            return Ok(());
        }

        if is_submit_control(&self.dom, target) {
            if let Some(form) = self.dom.closest(target, "form")? {
                self.request_submit(form)?;
            }
        }
        Ok(())
    }

    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let form = if self
            .dom
            .tag_name(target)
            .map(|tag| tag.eq_ignore_ascii_case("form"))
            .unwrap_or(false)
        {
            Some(target)
        } else {
            self.dom.closest(target, "form")?
        };
        if let Some(form) = form {
            self.request_submit(form)?;
        }
        Ok(())
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.focus_node(target)
    }

    pub fn blur(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.blur_node(target)
    }

    pub fn is_focused(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.active_element == Some(target))
    }

    pub fn press_key(&mut self, key: &str) -> Result<()> {
        self.press_key_with(key, false, false)
    }

    pub fn press_key_with(&mut self, key: &str, ctrl: bool, meta: bool) -> Result<()> {
        let target = self.active_element.unwrap_or(self.dom.root);
        let input = KeyInput {
            key: key.to_string(),
            ctrl,
            meta,
        };
        self.dispatch_event(target, "keydown", Some(input))?;
        Ok(())
    }

    pub fn set_hidden(&mut self, hidden: bool) -> Result<()> {
        if self.hidden == hidden {
            return Ok(());
        }
        self.hidden = hidden;
        self.dispatch_event(self.dom.root, "visibilitychange", None)?;
        Ok(())
    }

    pub fn resize(&mut self) -> Result<()> {
        self.dispatch_event(self.dom.root, "resize", None)?;
        Ok(())
    }

    pub(crate) fn focus_node(&mut self, node: NodeId) -> Result<()> {
        if self.dom.disabled(node) || self.active_element == Some(node) {
            return Ok(());
        }
        if let Some(current) = self.active_element {
            self.blur_node(current)?;
        }
        self.active_element = Some(node);
        self.dispatch_event(node, "focus", None)?;
        Ok(())
    }

    pub(crate) fn blur_node(&mut self, node: NodeId) -> Result<()> {
        if self.active_element != Some(node) {
            return Ok(());
        }
        self.dispatch_event(node, "blur", None)?;
        self.active_element = None;
        Ok(())
    }

    pub(crate) fn request_submit(&mut self, form: NodeId) -> Result<()> {
        let outcome = self.dispatch_event(form, "submit", None)?;
        if !outcome.default_prevented {
            self.record_submission(form)?;
        }
        Ok(())
    }

    // The programmatic path mirrors the browser's form.submit(): no submit
    // event is dispatched, so validation never runs.
    pub(crate) fn submit_programmatic(&mut self, form: NodeId) -> Result<()> {
        self.record_submission(form)
    }

    fn record_submission(&mut self, form: NodeId) -> Result<()> {
        let action = self.dom.attr(form, "action").unwrap_or_default();
        let method = self
            .dom
            .attr(form, "method")
            .unwrap_or_else(|| "get".into())
            .to_ascii_lowercase();

        let mut fields = Vec::new();
        for control in self.dom.query_all(form, "input, select, textarea")? {
            if self.dom.disabled(control) {
                continue;
            }
            let Some(name) = self.dom.attr(control, "name").filter(|n| !n.is_empty()) else {
                continue;
            };
            if is_check_input(&self.dom, control) {
                if !self.dom.checked(control)? {
                    continue;
                }
                let value = self.dom.value(control)?;
                fields.push((name, if value.is_empty() { "on".into() } else { value }));
                continue;
            }
            fields.push((name, self.dom.value(control)?));
        }

        let line = format!("[form] submit action={action} method={method} fields={}", fields.len());
        self.trace_line(line);
        self.submissions.push(FormSubmission {
            action,
            method,
            fields,
        });
        Ok(())
    }

    pub(crate) fn navigate(&mut self, url: &str) {
        let line = format!("[nav] {url}");
        self.trace_line(line);
        self.navigations.push(url.to_string());
        self.url = url.to_string();
    }

    pub fn text_of(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target).trim().to_string())
    }

    pub fn value_of(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.dom.attr(target, name))
    }

    pub fn style_of(&self, selector: &str, property: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.style_get(target, property))
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.dom.has_class(target, class_name))
    }

    pub fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.dom.query_first(self.dom.root, selector)?.is_some())
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.query_all(self.dom.root, selector)?.len())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let actual = self.text_of(selector)?;
        if actual != expected {
            return Err(self.assertion_failed(selector, expected, &actual));
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let actual = self.value_of(selector)?;
        if actual != expected {
            return Err(self.assertion_failed(selector, expected, &actual));
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        if !self.exists(selector)? {
            return Err(Error::SelectorNotFound(selector.to_string()));
        }
        Ok(())
    }

    fn assertion_failed(&self, selector: &str, expected: &str, actual: &str) -> Error {
        let snippet = self
            .dom
            .query_first(self.dom.root, selector)
            .ok()
            .flatten()
            .map(|node| self.dom.dump_node(node))
            .unwrap_or_else(|| "(not found)".into());
        Error::AssertionFailed {
            selector: selector.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            dom_snippet: snippet,
        }
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_to_stderr = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace_events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.trace_timers = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_log_limit = max_entries;
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_logs)
    }

    pub(crate) fn trace_event_line(&mut self, line: String) {
        if self.trace && self.trace_events {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_timer_line(&mut self, line: String) {
        if self.trace && self.trace_timers {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_line(&mut self, line: String) {
        if !self.trace {
            return;
        }
        if self.trace_to_stderr {
            eprintln!("{line}");
        }
        if self.trace_logs.len() >= self.trace_log_limit {
            self.trace_logs.remove(0);
        }
        self.trace_logs.push(line);
    }

    pub(crate) fn trace_node_label(&self, node: NodeId) -> String {
        match self.dom.tag_name(node) {
            Some(tag) => match self.dom.attr(node, "id") {
                Some(id) if !id.is_empty() => format!("{tag}#{id}"),
                _ => tag.to_string(),
            },
            None if node == self.dom.root => "#document".into(),
            None => "#text".into(),
        }
    }
}

fn is_check_input(dom: &Dom, node: NodeId) -> bool {
    if dom
        .tag_name(node)
        .map(|tag| !tag.eq_ignore_ascii_case("input"))
        .unwrap_or(true)
    {
        return false;
    }
    matches!(
        dom.attr(node, "type")
            .unwrap_or_else(|| "text".into())
            .to_ascii_lowercase()
            .as_str(),
        "checkbox" | "radio"
    )
}

fn is_submit_control(dom: &Dom, node: NodeId) -> bool {
    let Some(tag) = dom.tag_name(node) else {
        return false;
    };
    let kind = dom
        .attr(node, "type")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if tag.eq_ignore_ascii_case("button") {
        return kind.is_empty() || kind == "submit";
    }
    if tag.eq_ignore_ascii_case("input") {
        return kind == "submit";
    }
    false
}
