//! Menu-driven dashboard session.

use anyhow::Result;
use inquire::{InquireError, Select, Text};
use std::fmt;
use weatherdash_core::{DashboardSession, SavedLocation, ViewMode};

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Search,
    CurrentLocation,
    OpenSaved,
    SaveCurrent,
    RemoveSaved,
    ToggleView,
    ToggleUnits,
    ToggleTheme,
    Refresh,
    Quit,
}

impl MenuItem {
    const ALL: [MenuItem; 10] = [
        MenuItem::Search,
        MenuItem::CurrentLocation,
        MenuItem::OpenSaved,
        MenuItem::SaveCurrent,
        MenuItem::RemoveSaved,
        MenuItem::ToggleView,
        MenuItem::ToggleUnits,
        MenuItem::ToggleTheme,
        MenuItem::Refresh,
        MenuItem::Quit,
    ];

    /// Items that make sense for the current state.
    fn available(has_snapshot: bool, has_saved: bool) -> Vec<MenuItem> {
        Self::ALL
            .into_iter()
            .filter(|item| match item {
                MenuItem::SaveCurrent => has_snapshot,
                MenuItem::OpenSaved | MenuItem::RemoveSaved => has_saved,
                _ => true,
            })
            .collect()
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuItem::Search => "Search for a city",
            MenuItem::CurrentLocation => "Use current location",
            MenuItem::OpenSaved => "Open a saved location",
            MenuItem::SaveCurrent => "Save this location",
            MenuItem::RemoveSaved => "Remove a saved location",
            MenuItem::ToggleView => "Switch hourly / daily",
            MenuItem::ToggleUnits => "Toggle units",
            MenuItem::ToggleTheme => "Toggle theme",
            MenuItem::Refresh => "Refresh screen",
            MenuItem::Quit => "Quit",
        })
    }
}

/// Display wrapper so saved locations can be listed in a prompt.
struct SavedChoice(SavedLocation);

impl fmt::Display for SavedChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.0.name, self.0.country)
    }
}

/// Run a prompt, treating Esc / Ctrl-C as "nothing chosen".
fn ask<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn pick_saved(session: &DashboardSession, prompt: &str) -> Result<Option<String>> {
    let choices: Vec<SavedChoice> = session
        .state()
        .saved
        .iter()
        .cloned()
        .map(SavedChoice)
        .collect();

    Ok(ask(Select::new(prompt, choices).prompt())?.map(|choice| choice.0.id))
}

pub async fn run(session: &mut DashboardSession) -> Result<()> {
    if session.state().current.is_none() {
        session.use_current_location().await;
    }

    loop {
        println!("{}", render::dashboard(session.state()));

        let state = session.state();
        let items = MenuItem::available(state.current.is_some(), !state.saved.is_empty());
        let Some(choice) = ask(Select::new("What next?", items).prompt())? else {
            break;
        };

        match choice {
            MenuItem::Search => {
                if let Some(query) = ask(Text::new("City:").prompt())? {
                    session.set_search_query(query);
                    session.search().await;
                }
            }
            MenuItem::CurrentLocation => session.use_current_location().await,
            MenuItem::OpenSaved => {
                if let Some(id) = pick_saved(session, "Open which location?")? {
                    session.select_saved(&id).await;
                }
            }
            MenuItem::SaveCurrent => session.save_current(),
            MenuItem::RemoveSaved => {
                if let Some(id) = pick_saved(session, "Remove which location?")? {
                    session.remove_saved(&id);
                }
            }
            MenuItem::ToggleView => {
                let next = match session.state().view_mode {
                    ViewMode::Hourly => ViewMode::Daily,
                    ViewMode::Daily => ViewMode::Hourly,
                };
                session.set_view_mode(next);
            }
            MenuItem::ToggleUnits => session.toggle_units(),
            MenuItem::ToggleTheme => session.toggle_theme(),
            MenuItem::Refresh => session.tick(chrono::Local::now()),
            MenuItem::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_hides_actions_without_targets() {
        let items = MenuItem::available(false, false);
        assert!(!items.contains(&MenuItem::SaveCurrent));
        assert!(!items.contains(&MenuItem::OpenSaved));
        assert!(!items.contains(&MenuItem::RemoveSaved));
        assert!(items.contains(&MenuItem::Search));
        assert_eq!(items.last(), Some(&MenuItem::Quit));
    }

    #[test]
    fn menu_shows_everything_when_possible() {
        assert_eq!(MenuItem::available(true, true).len(), MenuItem::ALL.len());
    }

    #[test]
    fn saved_choice_display() {
        let choice = SavedChoice(SavedLocation {
            id: "1".into(),
            name: "Oslo".into(),
            country: "NO".into(),
            latitude: 59.9,
            longitude: 10.7,
        });
        assert_eq!(choice.to_string(), "Oslo, NO");
    }
}
