use std::collections::HashMap;

use crate::dom::NodeId;
use crate::{Page, Result};

#[derive(Debug, Clone)]
pub(crate) enum Behavior {
    ValidateOnSubmit,
    ConfirmGate,
    FilterAutoSubmit { form: NodeId },
    ClearSearch { form: NodeId },
    PaginationNav,
    GlobalShortcuts,
    VisibilityRefresh,
    DebouncedEnhance,
}

#[derive(Debug, Clone)]
pub(crate) struct Listener {
    pub(crate) behavior: Behavior,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Listener>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, behavior: Behavior) {
        self.map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(Listener { behavior });
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<Listener> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct KeyInput {
    pub(crate) key: String,
    pub(crate) ctrl: bool,
    pub(crate) meta: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) default_prevented: bool,
    pub(crate) key: Option<KeyInput>,
}

impl EventState {
    fn new(event_type: &str, target: NodeId, key: Option<KeyInput>) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            default_prevented: false,
            key,
        }
    }

    pub(crate) fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

impl Page {
    pub(crate) fn dispatch_event(
        &mut self,
        target: NodeId,
        event_type: &str,
        key: Option<KeyInput>,
    ) -> Result<EventState> {
        let mut event = EventState::new(event_type, target, key);

        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }

        // Target first, then ancestors up to the document (bubble order).
        for node in path {
            event.current_target = node;
            let listeners = self.listeners.get(node, &event.event_type);
            for listener in listeners {
                if self.trace {
                    self.trace_event_line(format!(
                        "[event] {} target={} current={} behavior={:?} default_prevented={}",
                        event.event_type,
                        self.trace_node_label(event.target),
                        self.trace_node_label(event.current_target),
                        listener.behavior,
                        event.default_prevented
                    ));
                }
                self.run_behavior(&listener.behavior, &mut event)?;
            }
        }

        self.trace_event_line(format!(
            "[event] done {} target={} default_prevented={}",
            event.event_type,
            self.trace_node_label(event.target),
            event.default_prevented
        ));
        Ok(event)
    }
}
