use crate::behavior::{TOAST_FADE_MS, TOAST_VISIBLE_MS};
use crate::dom::NodeId;
use crate::timers::TimerAction;
use crate::{Page, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
    Warning,
}

impl ToastKind {
    pub(crate) fn class_fragment(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }

    pub(crate) fn icon(self) -> &'static str {
        match self {
            Self::Success => "check_circle",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl Page {
    pub fn show_toast(&mut self, message: &str, kind: ToastKind) -> Result<()> {
        let Some(container) = self.dom.query_first(self.dom.root, ".page-content")? else {
            return Ok(());
        };

        let toast = self.dom.create_detached_element("div");
        self.dom.set_attr(
            toast,
            "class",
            &format!(
                "mdl-card mdl-shadow--2dp message-card {}-message fade-in",
                kind.class_fragment()
            ),
        )?;

        let body = self.dom.create_detached_element("div");
        self.dom
            .set_attr(body, "class", "mdl-card__supporting-text")?;
        self.dom.append_child(toast, body)?;

        let icon = self.dom.create_detached_element("i");
        self.dom.set_attr(icon, "class", "material-icons")?;
        self.dom.set_text_content(icon, kind.icon())?;
        self.dom.append_child(body, icon)?;

        let text = self.dom.create_detached_element("span");
        self.dom.set_text_content(text, message)?;
        self.dom.append_child(body, text)?;

        self.dom.insert_first_child(container, toast)?;
        self.schedule_auto_hide(toast, TOAST_VISIBLE_MS, TOAST_FADE_MS);
        Ok(())
    }

    pub fn auto_hide(&mut self, selector: &str, visible_ms: i64, fade_ms: i64) -> Result<()> {
        let target = self.select_one(selector)?;
        self.schedule_auto_hide(target, visible_ms, fade_ms);
        Ok(())
    }

    pub(crate) fn schedule_auto_hide(&mut self, node: NodeId, visible_ms: i64, fade_ms: i64) {
        self.set_timeout(
            visible_ms,
            TimerAction::BeginFadeOut {
                node,
                fade_ms,
            },
        );
    }

    pub fn show_loading(&mut self, selector: &str) -> Result<()> {
        let Some(target) = self.dom.query_first(self.dom.root, selector)? else {
            return Ok(());
        };
        self.dom.add_class(target, "loading")?;
        self.dom.set_attr(target, "disabled", "disabled")?;
        Ok(())
    }

    pub fn hide_loading(&mut self, selector: &str) -> Result<()> {
        let Some(target) = self.dom.query_first(self.dom.root, selector)? else {
            return Ok(());
        };
        self.dom.remove_class(target, "loading")?;
        self.dom.remove_attr(target, "disabled")?;
        Ok(())
    }
}
