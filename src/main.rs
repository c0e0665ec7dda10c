use itertools::Itertools;
use std::env;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tulumwellness::config::env_loader::load_config;
use tulumwellness::config::model::Config;
use tulumwellness::directory::display::{category_style, event_summary, format_event_date};
use tulumwellness::directory::filter::venue_label;
use tulumwellness::directory::model::Event;
use tulumwellness::pages::{
    load_event_details, load_events_page, load_home_page, load_venue_details, load_venues_page,
    PageError, PageState,
};
use tulumwellness::supabase::api::SupabaseAPI;
use tulumwellness::tracing::setup_loki;

const USAGE: &str = "Usage: tulumwellness <home|events|event ID|venues|venue ID>";

enum Command {
    Home,
    Events,
    Event(i64),
    Venues,
    Venue(i64),
}

impl Command {
    fn parse(args: &[String]) -> Option<Self> {
        let id = || args.get(1).and_then(|id| id.parse::<i64>().ok());

        match args.first().map(String::as_str) {
            None | Some("home") => Some(Command::Home),
            Some("events") => Some(Command::Events),
            Some("event") => id().map(Command::Event),
            Some("venues") => Some(Command::Venues),
            Some("venue") => id().map(Command::Venue),
            Some(_) => None,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let loki = setup_loki().await;

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = Command::parse(&args) else {
        error!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let succeeded = run(command, &config).await;

    if let Some((controller, handle)) = loki {
        controller.shutdown().await;
        let _ = handle.await;
    }

    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(command: Command, config: &Config) -> bool {
    let api = SupabaseAPI::new(&config.backend);

    match command {
        Command::Home => match load_home_page(&api, &config.listing).await {
            PageState::Ready(page) => {
                info!("Featured events:");
                log_events(&page.featured_events, |event| {
                    venue_label(&page.venue_names, event.venue_id).to_string()
                });
                info!("Popular venues: {}", page.venues.iter().map(|venue| &venue.name).join(", "));
                true
            }
            state => report_failure(state),
        },
        Command::Events => match load_events_page(&api).await {
            PageState::Ready(page) => {
                let filter = &config.event_filter;
                let visible = page.visible_events(filter);

                info!(
                    "Showing {} of {} events ({} active filters)",
                    visible.len(),
                    page.events.len(),
                    filter.active_filter_count()
                );

                if visible.is_empty() {
                    info!("No events found. Try adjusting your filters to find events");
                }

                log_events(&visible, |event| page.venue_label(event).to_string());
                true
            }
            state => report_failure(state),
        },
        Command::Event(id) => match load_event_details(&api, id).await {
            PageState::Ready(page) => {
                let event = &page.event;

                info!(
                    "{} [{} / {}]",
                    event.title,
                    event.category,
                    category_style(&event.category)
                );
                info!("{} at {}", format_event_date(&event.date), event.time);
                info!("Where: {}", page.venue_label());
                info!("{}", event.description);
                true
            }
            state => report_failure(state),
        },
        Command::Venues => match load_venues_page(&api).await {
            PageState::Ready(page) => {
                let visible = page.visible_venues(&config.venue_search);

                if visible.is_empty() {
                    info!("No venues found");
                }

                visible
                    .iter()
                    .for_each(|venue| info!("{} - {}", venue.name, venue.address));
                true
            }
            state => report_failure(state),
        },
        Command::Venue(id) => match load_venue_details(&api, id).await {
            PageState::Ready(page) => {
                info!("{} - {}", page.venue.name, page.venue.address);
                info!("Upcoming events at {}:", page.venue.name);
                log_events(&page.events, |event| {
                    venue_label(&page.venue_names, event.venue_id).to_string()
                });
                true
            }
            state => report_failure(state),
        },
    }
}

fn log_events(events: &[Event], venue_of: impl Fn(&Event) -> String) {
    events
        .iter()
        .for_each(|event| info!("{}", event_summary(event, &venue_of(event))));
}

fn report_failure<T>(state: PageState<T>) -> bool {
    let Some(page_error) = state.error() else {
        warn!("Page is still loading");
        return false;
    };

    if let Some(notification) = page_error.notification() {
        error!("{}: {}", notification.title, notification.description);
    }

    log_error_view(page_error);

    false
}

fn log_error_view(page_error: &PageError) {
    let back_to = page_error.back_to();

    warn!(
        "{} ({} -> {})",
        page_error.empty_state_title(),
        back_to.browse_label(),
        back_to.path()
    );
}
