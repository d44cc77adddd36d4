use std::collections::HashMap;

use crate::selector::{parse_selector_groups, AttrCondition, SelectorStep};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) checked: bool,
    pub(crate) disabled: bool,
    pub(crate) readonly: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let checked = attrs.contains_key("checked");
        let disabled = attrs.contains_key("disabled");
        let readonly = attrs.contains_key("readonly");
        let element = Element {
            tag_name,
            attrs,
            value,
            checked,
            disabled,
            readonly,
        };
        let id = self.create_node(Some(parent), NodeType::Element(element));
        if let Some(id_attr) = self
            .element(id)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            if !id_attr.is_empty() {
                self.id_index.insert(id_attr, id);
            }
        }
        id
    }

    pub(crate) fn create_detached_element(&mut self, tag_name: &str) -> NodeId {
        let element = Element {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: HashMap::new(),
            value: String::new(),
            checked: false,
            disabled: false,
            readonly: false,
        };
        self.create_node(None, NodeType::Element(element))
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes[node_id.0].node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node_id.0].node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes[node_id.0].parent
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub(crate) fn is_connected(&self, node_id: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(node) = cursor {
            if node == self.root {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document | NodeType::Element(_) => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
        }
    }

    pub(crate) fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self.element(node_id).is_none() {
            return Err(Error::Runtime("text target is not an element".into()));
        }
        let old_children = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in old_children {
            self.nodes[child.0].parent = None;
        }
        if !value.is_empty() {
            self.create_text(node_id, value.to_string());
        }
        self.rebuild_id_index();
        Ok(())
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|element| element.attrs.get(name).cloned())
    }

    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("attribute target is not an element".into()))?;
        element.attrs.insert(name.to_string(), value.to_string());
        match name {
            "value" => element.value = value.to_string(),
            "checked" => element.checked = true,
            "disabled" => element.disabled = true,
            "readonly" => element.readonly = true,
            "id" => self.rebuild_id_index(),
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("attribute target is not an element".into()))?;
        element.attrs.remove(name);
        match name {
            "checked" => element.checked = false,
            "disabled" => element.disabled = false,
            "readonly" => element.readonly = false,
            "id" => self.rebuild_id_index(),
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn has_class(&self, node_id: NodeId, class_name: &str) -> bool {
        self.element(node_id)
            .and_then(|element| element.attrs.get("class"))
            .map(|classes| classes.split_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    }

    pub(crate) fn add_class(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        if self.has_class(node_id, class_name) {
            return Ok(());
        }
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("class target is not an element".into()))?;
        let current = element.attrs.get("class").cloned().unwrap_or_default();
        let updated = if current.trim().is_empty() {
            class_name.to_string()
        } else {
            format!("{} {}", current.trim(), class_name)
        };
        element.attrs.insert("class".into(), updated);
        Ok(())
    }

    pub(crate) fn remove_class(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("class target is not an element".into()))?;
        let Some(current) = element.attrs.get("class").cloned() else {
            return Ok(());
        };
        let remaining = current
            .split_whitespace()
            .filter(|c| *c != class_name)
            .collect::<Vec<_>>()
            .join(" ");
        if remaining.is_empty() {
            element.attrs.remove("class");
        } else {
            element.attrs.insert("class".into(), remaining);
        }
        Ok(())
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("value target is not an element".into()))?;
        Ok(element.value.clone())
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self
            .tag_name(node_id)
            .map(|tag| tag.eq_ignore_ascii_case("select"))
            .unwrap_or(false)
        {
            return self.set_select_value(node_id, value);
        }
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("value target is not an element".into()))?;
        element.value = value.to_string();
        Ok(())
    }

    fn set_select_value(&mut self, select: NodeId, value: &str) -> Result<()> {
        let options = self.option_nodes(select);
        let matched = options
            .iter()
            .any(|option| self.option_value(*option) == value);
        let element = self
            .element_mut(select)
            .ok_or_else(|| Error::Runtime("value target is not an element".into()))?;
        element.value = if matched { value.to_string() } else { String::new() };
        Ok(())
    }

    pub(crate) fn checked(&self, node_id: NodeId) -> Result<bool> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("checked target is not an element".into()))?;
        Ok(element.checked)
    }

    pub(crate) fn set_checked(&mut self, node_id: NodeId, checked: bool) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("checked target is not an element".into()))?;
        element.checked = checked;
        Ok(())
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.disabled).unwrap_or(false)
    }

    pub(crate) fn readonly(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.readonly).unwrap_or(false)
    }

    fn option_nodes(&self, select: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = self.nodes[select.0].children.clone();
        stack.reverse();
        while let Some(node) = stack.pop() {
            if self
                .tag_name(node)
                .map(|tag| tag.eq_ignore_ascii_case("option"))
                .unwrap_or(false)
            {
                out.push(node);
            }
            for child in self.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    fn option_value(&self, option: NodeId) -> String {
        if let Some(value) = self.attr(option, "value") {
            return value;
        }
        self.text_content(option).trim().to_string()
    }

    pub(crate) fn initialize_form_control_values(&mut self) -> Result<()> {
        for node in self.all_element_nodes() {
            let tag = self
                .tag_name(node)
                .unwrap_or_default()
                .to_ascii_lowercase();
            match tag.as_str() {
                "textarea" => {
                    let text = self.text_content(node);
                    if let Some(element) = self.element_mut(node) {
                        element.value = text;
                    }
                }
                "select" => {
                    let options = self.option_nodes(node);
                    let selected = options
                        .iter()
                        .find(|option| self.attr(**option, "selected").is_some())
                        .or_else(|| options.first())
                        .copied();
                    let value = selected
                        .map(|option| self.option_value(option))
                        .unwrap_or_default();
                    if let Some(element) = self.element_mut(node) {
                        element.value = value;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.attach_child(parent, child, None)
    }

    pub(crate) fn insert_first_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.attach_child(parent, child, Some(0))
    }

    fn attach_child(&mut self, parent: NodeId, child: NodeId, at: Option<usize>) -> Result<()> {
        if self.element(parent).is_none() && parent != self.root {
            return Err(Error::Runtime("insert target is not an element".into()));
        }
        if child == self.root {
            return Err(Error::Runtime("cannot insert document root".into()));
        }
        // Prevent cycles: parent must not be inside child's subtree.
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(Error::Runtime("insert would create a cycle".into()));
        }
        if let Some(old_parent) = self.parent(child) {
            self.nodes[old_parent.0].children.retain(|id| *id != child);
        }
        match at {
            Some(index) => {
                let index = index.min(self.nodes[parent.0].children.len());
                self.nodes[parent.0].children.insert(index, child);
            }
            None => self.nodes[parent.0].children.push(child),
        }
        self.nodes[child.0].parent = Some(parent);
        self.rebuild_id_index();
        Ok(())
    }

    fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub(crate) fn remove_node(&mut self, node: NodeId) -> Result<()> {
        if node == self.root {
            return Err(Error::Runtime("cannot remove document root".into()));
        }
        let Some(parent) = self.parent(node) else {
            return Ok(());
        };
        self.nodes[parent.0].children.retain(|id| *id != node);
        self.nodes[node.0].parent = None;
        self.rebuild_id_index();
        Ok(())
    }

    pub(crate) fn style_get(&self, node_id: NodeId, property: &str) -> String {
        let Some(element) = self.element(node_id) else {
            return String::new();
        };
        parse_style_declarations(element.attrs.get("style").map(String::as_str))
            .into_iter()
            .find(|(prop, _)| prop == property)
            .map(|(_, value)| value)
            .unwrap_or_default()
    }

    pub(crate) fn style_set(&mut self, node_id: NodeId, property: &str, value: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("style target is not an element".into()))?;
        let mut decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        if let Some(pos) = decls.iter().position(|(prop, _)| prop == property) {
            if value.is_empty() {
                decls.remove(pos);
            } else {
                decls[pos].1 = value.to_string();
            }
        } else if !value.is_empty() {
            decls.push((property.to_string(), value.to_string()));
        }
        if decls.is_empty() {
            element.attrs.remove("style");
        } else {
            element
                .attrs
                .insert("style".into(), serialize_style_declarations(&decls));
        }
        Ok(())
    }

    fn rebuild_id_index(&mut self) {
        let mut next = HashMap::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if let NodeType::Element(element) = &self.nodes[node.0].node_type {
                if let Some(id) = element.attrs.get("id") {
                    if !id.is_empty() {
                        next.insert(id.clone(), node);
                    }
                }
            }
            for child in self.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        self.id_index = next;
    }

    fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        if matches!(self.nodes[node_id.0].node_type, NodeType::Element(_)) {
            out.push(node_id);
        }
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(self.root, &mut out);
        out
    }

    fn element_descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        for child in &self.nodes[scope.0].children {
            self.collect_elements_dfs(*child, &mut out);
        }
        out
    }

    pub(crate) fn query_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        if let [group] = groups.as_slice() {
            if let Some(id) = group.id_only() {
                return Ok(self
                    .by_id(id)
                    .filter(|node| self.is_in_scope(*node, scope))
                    .into_iter()
                    .collect());
            }
        }
        let mut matched = Vec::new();
        for candidate in self.element_descendants(scope) {
            if groups.iter().any(|step| self.matches_step(candidate, step)) {
                matched.push(candidate);
            }
        }
        Ok(matched)
    }

    pub(crate) fn query_first(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_all(scope, selector)?.into_iter().next())
    }

    pub(crate) fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if self.element(current).is_some()
                && groups.iter().any(|step| self.matches_step(current, step))
            {
                return Ok(Some(current));
            }
            cursor = self.parent(current);
        }
        Ok(None)
    }

    fn is_in_scope(&self, node_id: NodeId, scope: NodeId) -> bool {
        if scope == self.root {
            return self.is_connected(node_id);
        }
        self.is_descendant_of(node_id, scope)
    }

    fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };
        if let Some(tag) = &step.tag {
            if !element.tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &step.id {
            if element.attrs.get("id") != Some(id) {
                return false;
            }
        }
        for class in &step.classes {
            if !self.has_class(node_id, class) {
                return false;
            }
        }
        for condition in &step.attrs {
            let matched = match condition {
                AttrCondition::Exists { key } => element.attrs.contains_key(key),
                AttrCondition::Eq { key, value } => {
                    element.attrs.get(key).map(String::as_str) == Some(value.as_str())
                }
                AttrCondition::Contains { key, value } => element
                    .attrs
                    .get(key)
                    .map(|actual| actual.contains(value.as_str()))
                    .unwrap_or(false),
            };
            if !matched {
                return false;
            }
        }
        true
    }

    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Text(text) => text.clone(),
            NodeType::Document => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out
            }
            NodeType::Element(element) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag_name);
                let mut names = element.attrs.keys().collect::<Vec<_>>();
                names.sort();
                for name in names {
                    let value = &element.attrs[name];
                    out.push_str(&format!(" {name}=\"{value}\""));
                }
                out.push('>');
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out.push_str(&format!("</{}>", element.tag_name));
                out
            }
        }
    }
}

fn parse_style_declarations(style: Option<&str>) -> Vec<(String, String)> {
    let Some(style) = style else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for declaration in style.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = property.trim();
        let value = value.trim();
        if !property.is_empty() && !value.is_empty() {
            out.push((property.to_string(), value.to_string()));
        }
    }
    out
}

fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(property, value)| format!("{property}: {value}"))
        .collect::<Vec<_>>()
        .join("; ")
}
