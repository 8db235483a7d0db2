//! Plain-text rendering of session state for the terminal.

use vendmap_map::{
    Animation, CameraCommand, HeadlessMap, MapSession, MapView, MarkerHandle, Notice,
    PresentationMode, SearchField, SearchQuery,
};

type Session = MapSession<HeadlessMap>;

pub(crate) fn print_summary(session: &Session) {
    println!("locations loaded: {}", session.store().len());
    println!("records rejected: {}", session.store().rejected());
    println!("markers visible:  {}", session.visible().len());
    match session.boundaries() {
        Some(layer) => println!("boundary shapes:  {}", layer.len()),
        None => println!("boundary shapes:  none"),
    }
    print_view_state(session);
}

pub(crate) fn print_directory(session: &Session) {
    let directory = session.store().directory();
    if directory.is_empty() {
        println!("no locations loaded");
        return;
    }

    let header = format!("{:<24}{:<10}{:<10}NAME", "CITY", "ZIP", "MACHINES");
    println!("{header}");
    for entry in directory {
        println!(
            "{:<24}{:<10}{:<10}{}",
            truncate(&entry.city, 22),
            entry.zipcode,
            entry.machine_count,
            entry.name
        );
    }
}

pub(crate) fn print_search(session: &Session, query: &SearchQuery, matches: &[MarkerHandle]) {
    if query.is_empty() {
        println!("empty search; map reset to overview");
        print_view_state(session);
        return;
    }

    let field = match query.field() {
        SearchField::Location => "city or zip code",
        SearchField::Name => "name",
    };
    println!("search for {:?} by {field}: {} match(es)", query.term(), matches.len());

    if session.no_match_found() {
        println!("no location found; every marker is hidden");
    } else {
        for marker in matches {
            if let Some(record) = session.store().get(*marker) {
                println!(
                    "  {} ({} {}) {} | open {}",
                    record.name,
                    record.zipcode,
                    record.city,
                    record.address,
                    record.opening_hours
                );
            }
        }
    }
    if let Some(marker) = session.view().popup() {
        if let Some(record) = session.store().get(marker) {
            println!("popup open on: {}", record.name);
        }
    }
    print_view_state(session);
}

pub(crate) fn print_locate(session: &Session) {
    if let Some(Notice::LocationUnavailable(reason)) = session.notice() {
        println!("current location unavailable: {reason}");
        return;
    }
    if let Some(marker) = session.user_marker() {
        if let Some((coordinate, _)) = session.view().marker(marker) {
            println!("you are here: {coordinate}");
        }
    }
    print_view_state(session);
}

fn print_view_state(session: &Session) {
    let view = session.view();
    println!(
        "view: center {} zoom {:.2} mode {} theme {}",
        view.center(),
        view.current_zoom(),
        mode_label(session.mode()),
        session.theme().map_class()
    );
    if let Some(target) = session.camera_target() {
        println!("camera: {}", describe_camera(target));
    }
}

fn mode_label(mode: PresentationMode) -> &'static str {
    match mode {
        PresentationMode::BoundaryFill => "boundary-fill",
        PresentationMode::StreetDetail => "street-detail",
    }
}

fn describe_camera(command: &CameraCommand) -> String {
    match command {
        CameraCommand::PanTo {
            coordinate,
            zoom,
            animation,
        } => format!(
            "pan to {coordinate} at zoom {zoom} ({})",
            describe_animation(*animation)
        ),
        CameraCommand::FitBounds {
            bounds,
            padding,
            animation,
        } => format!(
            "fit [{:.4}, {:.4}] - [{:.4}, {:.4}] with {}px padding ({})",
            bounds.south,
            bounds.west,
            bounds.north,
            bounds.east,
            padding.0,
            describe_animation(*animation)
        ),
    }
}

fn describe_animation(animation: Animation) -> String {
    match animation {
        Animation::Instant => "instant".to_string(),
        Animation::Animated { duration } => format!("animated {:.1}s", duration.as_secs_f64()),
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() > max_chars {
        format!("{}...", value.chars().take(max_chars).collect::<String>())
    } else {
        value.to_string()
    }
}
