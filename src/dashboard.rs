use std::sync::Arc;

use indexmap::IndexMap;

use crate::command::Command;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Grid,
    List,
}

pub struct Layout {
    kind: LayoutKind,
    commands: IndexMap<String, Arc<dyn Command>>,
}

impl Layout {
    fn new(kind: LayoutKind) -> Self {
        Self {
            kind,
            commands: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    /// Adds a button for `command`, titled with the command's name.
    pub fn add(&mut self, command: Arc<dyn Command>) -> Result<&mut Self, AppError> {
        let title = command.name().to_string();
        if self.commands.contains_key(&title) {
            return Err(AppError::Dashboard(format!("Duplicate title {title}")));
        }
        self.commands.insert(title, command);
        Ok(self)
    }

    pub fn command(&self, title: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(title).cloned()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }
}

#[derive(Default)]
pub struct Tab {
    layouts: IndexMap<String, Layout>,
}

impl Tab {
    /// Returns the named layout, creating it with `kind` on first use.
    pub fn layout(&mut self, name: &str, kind: LayoutKind) -> &mut Layout {
        self.layouts
            .entry(name.to_string())
            .or_insert_with(|| Layout::new(kind))
    }

    pub fn layout_names(&self) -> Vec<&str> {
        self.layouts.keys().map(String::as_str).collect()
    }
}

/// Operator dashboard: tabs of layouts of command buttons, kept in insertion order.
#[derive(Default)]
pub struct Dashboard {
    tabs: IndexMap<String, Tab>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab(&mut self, name: &str) -> &mut Tab {
        self.tabs.entry(name.to_string()).or_default()
    }

    pub fn tab_names(&self) -> Vec<&str> {
        self.tabs.keys().map(String::as_str).collect()
    }

    pub fn layout(&self, tab: &str, layout: &str) -> Option<&Layout> {
        self.tabs.get(tab)?.layouts.get(layout)
    }

    /// Finds the command behind a button.
    pub fn press(&self, tab: &str, layout: &str, title: &str) -> Result<Arc<dyn Command>, AppError> {
        self.layout(tab, layout)
            .and_then(|layout| layout.command(title))
            .ok_or_else(|| AppError::Dashboard(format!("No button {tab}/{layout}/{title}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::InstantCommand;

    fn noop(name: &str) -> Arc<dyn Command> {
        Arc::new(InstantCommand::new(name, || {}))
    }

    #[test]
    fn test_insertion_order() {
        let mut dashboard = Dashboard::new();
        let layout = dashboard.tab("Dashboard").layout("Vision", LayoutKind::Grid);
        layout.add(noop("Enable")).unwrap().add(noop("Disable")).unwrap();
        dashboard.tab("Debug");

        assert_eq!(dashboard.tab_names(), vec!["Dashboard", "Debug"]);
        let layout = dashboard.layout("Dashboard", "Vision").unwrap();
        assert_eq!(layout.kind(), LayoutKind::Grid);
        assert_eq!(layout.titles(), vec!["Enable", "Disable"]);
    }

    #[test]
    fn test_existing_layout_keeps_kind() {
        let mut dashboard = Dashboard::new();
        dashboard.tab("Dashboard").layout("Vision", LayoutKind::Grid);
        let layout = dashboard.tab("Dashboard").layout("Vision", LayoutKind::List);
        assert_eq!(layout.kind(), LayoutKind::Grid);
    }

    #[test]
    fn test_duplicate_title_is_error() {
        let mut dashboard = Dashboard::new();
        let layout = dashboard.tab("Dashboard").layout("Vision", LayoutKind::Grid);
        layout.add(noop("Enable")).unwrap();
        assert!(matches!(layout.add(noop("Enable")), Err(AppError::Dashboard(_))));
    }

    #[test]
    fn test_press() {
        let mut dashboard = Dashboard::new();
        dashboard
            .tab("Dashboard")
            .layout("Vision", LayoutKind::Grid)
            .add(noop("Enable"))
            .unwrap();

        assert_eq!(dashboard.press("Dashboard", "Vision", "Enable").unwrap().name(), "Enable");
        assert!(dashboard.press("Dashboard", "Vision", "Launch").is_err());
        assert!(dashboard.press("Dashboard", "Shooter", "Enable").is_err());
        assert!(dashboard.press("Auto", "Vision", "Enable").is_err());
    }
}
