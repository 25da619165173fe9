use crate::model::{CatalogMachine, Profile, SearchHit, SeasonStanding, VpnStatus};
use crate::state::{CommandOutcome, TrackerEvent};

/// Which catalog listing the sidebar table shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum CatalogTab {
    Current,
    Seasonal,
    Retired,
}

impl CatalogTab {
    pub(super) fn title(&self) -> &'static str {
        match self {
            CatalogTab::Current => "Current",
            CatalogTab::Seasonal => "Seasonal",
            CatalogTab::Retired => "Retired",
        }
    }

    pub(super) fn next(&self) -> CatalogTab {
        match self {
            CatalogTab::Current => CatalogTab::Seasonal,
            CatalogTab::Seasonal => CatalogTab::Retired,
            CatalogTab::Retired => CatalogTab::Current,
        }
    }
}

/// Everything that can change the app, funneled through one ordered queue so
/// tracker updates and selection picks can never interleave mid-handling.
#[derive(Debug)]
pub(super) enum AppEvent {
    Tracker(TrackerEvent),
    Profile(Result<Profile, String>),
    Season(Result<Option<SeasonStanding>, String>),
    Vpn(Result<VpnStatus, String>),
    Catalog {
        tab: CatalogTab,
        result: Result<Vec<CatalogMachine>, String>,
    },
    Search {
        scope: &'static str,
        term: String,
        result: Result<Vec<SearchHit>, String>,
    },
    Command(CommandOutcome),
    Ping(Option<u64>),
}
