use crate::domain::models::event::{Event, NewEventParams};
use crate::error::AppError;
use chrono::{DateTime, Utc};

const MIN_TITLE_LEN: usize = 3;
const MIN_DESCRIPTION_LEN: usize = 10;

#[derive(Debug, Default, Clone)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub capacity: Option<i32>,
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

fn check_title(title: &str) -> Result<(), AppError> {
    if title.trim().chars().count() < MIN_TITLE_LEN {
        return Err(AppError::Validation(format!("Title must be at least {} characters long", MIN_TITLE_LEN)));
    }
    Ok(())
}

fn check_description(description: &str) -> Result<(), AppError> {
    if description.trim().chars().count() < MIN_DESCRIPTION_LEN {
        return Err(AppError::Validation(format!("Description must be at least {} characters long", MIN_DESCRIPTION_LEN)));
    }
    Ok(())
}

fn check_location(location: &str) -> Result<(), AppError> {
    if location.trim().is_empty() {
        return Err(AppError::Validation("Location is required".into()));
    }
    Ok(())
}

fn check_date(date: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), AppError> {
    if date < start_of_day(now) {
        return Err(AppError::Validation("Event date must be today or in the future".into()));
    }
    Ok(())
}

/// Edits must land strictly after `now`; the start-of-day allowance is for creation only.
fn check_rescheduled_date(date: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), AppError> {
    if date < now {
        return Err(AppError::Validation("Event date must be today or in the future".into()));
    }
    Ok(())
}

fn check_capacity(capacity: i32) -> Result<(), AppError> {
    if capacity < 1 {
        return Err(AppError::Validation("Capacity must be at least 1".into()));
    }
    Ok(())
}

pub fn validate_new_event(params: &NewEventParams, now: DateTime<Utc>) -> Result<(), AppError> {
    check_title(&params.title)?;
    check_description(&params.description)?;
    check_location(&params.location)?;
    check_date(params.date, now)?;
    if let Some(capacity) = params.capacity {
        check_capacity(capacity)?;
    }
    Ok(())
}

/// Applies organizer edits to a copy of `event`. Capacity may never drop below
/// the bookings already confirmed; the store re-checks this at write time.
pub fn apply_changes(event: &Event, changes: EventChanges, now: DateTime<Utc>) -> Result<Event, AppError> {
    if event.is_past(now) {
        return Err(AppError::Validation("Cannot update an event that has already passed".into()));
    }

    let mut updated = event.clone();

    if let Some(capacity) = changes.capacity {
        check_capacity(capacity)?;
        if capacity < event.bookings_count {
            return Err(capacity_below_bookings(event.bookings_count));
        }
        updated.capacity = capacity;
    }
    if let Some(title) = changes.title {
        check_title(&title)?;
        updated.title = title.trim().to_string();
    }
    if let Some(description) = changes.description {
        check_description(&description)?;
        updated.description = description;
    }
    if let Some(date) = changes.date {
        check_rescheduled_date(date, now)?;
        updated.date = date;
    }
    if let Some(location) = changes.location {
        check_location(&location)?;
        updated.location = location.trim().to_string();
    }
    if let Some(image) = changes.image {
        if !image.trim().is_empty() {
            updated.image = image;
        }
    }

    updated.updated_at = now;
    updated.refresh_status(now);
    Ok(updated)
}

pub fn capacity_below_bookings(bookings_count: i32) -> AppError {
    AppError::Validation(format!(
        "Capacity cannot be less than current confirmed bookings ({}).",
        bookings_count
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn params(date: DateTime<Utc>) -> NewEventParams {
        NewEventParams {
            title: "Tokio Deep Dive".into(),
            description: "Runtimes, reactors and wakers".into(),
            date,
            location: "Room 4".into(),
            image: None,
            capacity: Some(5),
            organizer_id: "org".into(),
        }
    }

    #[test]
    fn test_new_event_rules() {
        let now = Utc::now();
        assert!(validate_new_event(&params(now + Duration::days(1)), now).is_ok());

        let mut short_title = params(now + Duration::days(1));
        short_title.title = "ab".into();
        assert!(matches!(validate_new_event(&short_title, now), Err(AppError::Validation(_))));

        let mut zero_capacity = params(now + Duration::days(1));
        zero_capacity.capacity = Some(0);
        assert!(matches!(validate_new_event(&zero_capacity, now), Err(AppError::Validation(_))));

        assert!(matches!(validate_new_event(&params(now - Duration::days(2)), now), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_capacity_cannot_drop_below_bookings() {
        let now = Utc::now();
        let mut event = Event::new(params(now + Duration::days(3)));
        event.bookings_count = 3;

        let err = apply_changes(&event, EventChanges { capacity: Some(2), ..Default::default() }, now).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("(3)")));

        let ok = apply_changes(&event, EventChanges { capacity: Some(3), ..Default::default() }, now).unwrap();
        assert_eq!(ok.capacity, 3);
        assert_eq!(ok.bookings_count, 3);
    }

    #[test]
    fn test_reschedule_rejects_time_already_gone_today() {
        let now = Utc::now();
        let event = Event::new(params(now + Duration::days(3)));

        let earlier = now - Duration::minutes(1);
        let err = apply_changes(&event, EventChanges { date: Some(earlier), ..Default::default() }, now);
        assert!(matches!(err, Err(AppError::Validation(_))));

        // Creation still accepts the same instant when it falls on today.
        if earlier >= start_of_day(now) {
            assert!(validate_new_event(&params(earlier), now).is_ok());
        }

        let later = now + Duration::hours(1);
        let ok = apply_changes(&event, EventChanges { date: Some(later), ..Default::default() }, now).unwrap();
        assert_eq!(ok.date, later);
    }

    #[test]
    fn test_past_event_is_frozen() {
        let now = Utc::now();
        let event = Event::new(params(now - Duration::hours(2)));
        let err = apply_changes(&event, EventChanges { title: Some("New title".into()), ..Default::default() }, now);
        assert!(matches!(err, Err(AppError::Validation(_))));
    }
}
