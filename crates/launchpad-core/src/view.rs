//! View projection: what a frontend should render for a tab.
//!
//! Pure functions over a [`RegistrySnapshot`]. No I/O, no mutation.

use crate::registry::{RegistrySnapshot, SearchResults, SearchState};
use crate::types::{ClientKind, ClientRecord, InstallStatus, SearchHit};

/// Navigation tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Clients,
    Installed,
    Mods,
    Profiles,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Clients, Tab::Installed, Tab::Mods, Tab::Profiles];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Clients => "Clients",
            Tab::Installed => "Installed",
            Tab::Mods => "Mods",
            Tab::Profiles => "Profiles",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn next(self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// One client with the state needed to draw its card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientCard<'a> {
    pub client: &'a ClientRecord,
    pub status: Option<InstallStatus>,
}

impl ClientCard<'_> {
    /// Install button is disabled while an install is running.
    pub fn can_install(&self) -> bool {
        self.status != Some(InstallStatus::Installing)
    }

    pub fn badge(&self) -> Option<&'static str> {
        match self.client.kind {
            ClientKind::Mod => Some("MOD"),
            ClientKind::Installer => Some("INSTALLER"),
            ClientKind::Jar => None,
        }
    }

    pub fn size_label(&self) -> String {
        format!("{:.1} MB", self.client.size_mib())
    }

    pub fn installed_label(&self) -> Option<String> {
        self.client.installed_at.as_ref().map(|ts| ts.date_label())
    }
}

/// Mod tab state, with never-searched, searching, empty and failed kept apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchView<'a> {
    NeverSearched,
    Searching { query: &'a str },
    NoResults { query: &'a str },
    Results(&'a [SearchHit]),
    Failed { reason: &'a str },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TabView<'a> {
    Clients {
        cards: Vec<ClientCard<'a>>,
        loading: bool,
    },
    Installed {
        cards: Vec<ClientCard<'a>>,
    },
    Mods {
        search: SearchView<'a>,
    },
    /// Tab without backing functionality.
    Unavailable {
        title: &'static str,
    },
}

impl TabView<'_> {
    pub fn is_loading(&self) -> bool {
        match self {
            TabView::Clients { loading, .. } => *loading,
            TabView::Mods { search } => matches!(search, SearchView::Searching { .. }),
            TabView::Installed { .. } | TabView::Unavailable { .. } => false,
        }
    }

    /// Whether the tab should show its empty-state message.
    pub fn is_empty(&self) -> bool {
        match self {
            TabView::Clients { cards, loading } => cards.is_empty() && !loading,
            TabView::Installed { cards } => cards.is_empty(),
            TabView::Mods { search } => !matches!(
                search,
                SearchView::Results(_) | SearchView::Searching { .. }
            ),
            TabView::Unavailable { .. } => true,
        }
    }
}

pub fn project(tab: Tab, snapshot: &RegistrySnapshot) -> TabView<'_> {
    match tab {
        Tab::Clients => TabView::Clients {
            cards: cards(&snapshot.available, snapshot),
            loading: snapshot.is_scanning(),
        },
        Tab::Installed => TabView::Installed {
            cards: cards(&snapshot.installed, snapshot),
        },
        Tab::Mods => TabView::Mods {
            search: search_view(&snapshot.search),
        },
        Tab::Profiles => TabView::Unavailable {
            title: Tab::Profiles.title(),
        },
    }
}

pub fn search_view(search: &SearchState) -> SearchView<'_> {
    let query = search.last_query.as_deref().unwrap_or_default();
    if search.is_loading() {
        return SearchView::Searching { query };
    }
    match &search.results {
        SearchResults::NeverSearched => SearchView::NeverSearched,
        SearchResults::Hits(hits) if hits.is_empty() => SearchView::NoResults { query },
        SearchResults::Hits(hits) => SearchView::Results(hits),
        SearchResults::Failed { reason } => SearchView::Failed { reason },
    }
}

fn cards<'a>(clients: &'a [ClientRecord], snapshot: &RegistrySnapshot) -> Vec<ClientCard<'a>> {
    clients
        .iter()
        .map(|client| ClientCard {
            client,
            status: snapshot.status_of(&client.name),
        })
        .collect()
}
