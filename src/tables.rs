use chrono::{DateTime, Utc};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;

use crate::api::holidaze::models::{Booking, Profile, Venue};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn build_venues_table(venues: &[Venue]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Name", "Location", "Price", "Guests", "Rating", "Amenities"]);
    for venue in venues {
        table.add_row(vec![
            Cell::new(&venue.id).add_attribute(Attribute::Dim),
            Cell::new(&venue.name).add_attribute(Attribute::Bold),
            Cell::new(venue.location.short()),
            Cell::new(format!("{:.0}", venue.price)).set_alignment(CellAlignment::Right),
            Cell::new(venue.max_guests).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}", venue.rating)).set_alignment(CellAlignment::Right).fg(
                if venue.rating >= 4.0 { Color::Green } else { Color::Reset },
            ),
            Cell::new(venue.amenities().iter().map(|amenity| format!("{amenity:?}")).join(", ")),
        ]);
    }
    table
}

/// Key-value view of a single venue, followed by its reservations.
pub fn build_venue_details_table(venue: &Venue) -> Table {
    let mut table = new_table();
    table.add_row(vec![Cell::new("Name"), Cell::new(&venue.name).add_attribute(Attribute::Bold)]);
    table.add_row(vec!["ID", venue.id.as_str()]);
    table.add_row(vec!["Description", venue.description.as_str()]);
    table.add_row(vec![Cell::new("Price"), Cell::new(format!("{:.0} per night", venue.price))]);
    table.add_row(vec![Cell::new("Max guests"), Cell::new(venue.max_guests)]);
    table.add_row(vec![Cell::new("Location"), Cell::new(venue.location.short())]);
    if let Some(owner) = &venue.owner {
        table.add_row(vec!["Owner", owner.name.as_str()]);
    }
    for media in &venue.media {
        table.add_row(vec!["Image", media.url.as_str()]);
    }
    for booking in venue.bookings.iter().flatten().sorted_by_key(|booking| booking.date_from) {
        table.add_row(vec![
            Cell::new("Reserved"),
            Cell::new(format!(
                "{} to {}",
                format_date(booking.date_from),
                format_date(booking.date_to),
            ))
            .fg(Color::DarkYellow),
        ]);
    }
    table
}

pub fn build_bookings_table(bookings: &[Booking]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ID", "Venue", "From", "To", "Guests"]);
    for booking in bookings.iter().sorted_by_key(|booking| booking.date_from) {
        table.add_row(vec![
            Cell::new(&booking.id).add_attribute(Attribute::Dim),
            Cell::new(booking.venue.as_ref().map_or("", |venue| venue.name.as_str())),
            Cell::new(format_date(booking.date_from)),
            Cell::new(format_date(booking.date_to)),
            Cell::new(booking.guests).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Bookings received by the venues of a manager.
pub fn build_received_bookings_table(venues: &[Venue]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Venue", "Booking", "Customer", "From", "To", "Guests"]);
    let bookings = venues
        .iter()
        .flat_map(|venue| venue.bookings.iter().flatten().map(move |booking| (venue, booking)))
        .sorted_by_key(|(_, booking)| booking.date_from);
    for (venue, booking) in bookings {
        table.add_row(vec![
            Cell::new(&venue.name).add_attribute(Attribute::Bold),
            Cell::new(&booking.id).add_attribute(Attribute::Dim),
            Cell::new(booking.customer.as_ref().map_or("", |customer| customer.name.as_str())),
            Cell::new(format_date(booking.date_from)),
            Cell::new(format_date(booking.date_to)),
            Cell::new(booking.guests).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn build_profile_table(profile: &Profile) -> Table {
    let mut table = new_table();
    table.add_row(vec![Cell::new("Name"), Cell::new(&profile.name).add_attribute(Attribute::Bold)]);
    table.add_row(vec!["Email", profile.email.as_str()]);
    table.add_row(vec![
        Cell::new("Role"),
        if profile.venue_manager {
            Cell::new("venue manager").fg(Color::Magenta)
        } else {
            Cell::new("customer")
        },
    ]);
    if let Some(bio) = &profile.bio {
        table.add_row(vec!["Bio", bio.as_str()]);
    }
    if let Some(avatar) = &profile.avatar {
        table.add_row(vec!["Avatar", avatar.url.as_str()]);
    }
    if let Some(banner) = &profile.banner {
        table.add_row(vec!["Banner", banner.url.as_str()]);
    }
    if let Some(count) = profile.count {
        table.add_row(vec![Cell::new("Venues"), Cell::new(count.venues)]);
        table.add_row(vec![Cell::new("Bookings"), Cell::new(count.bookings)]);
    }
    table
}
