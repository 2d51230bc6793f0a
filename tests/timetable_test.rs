mod common;

use academic_scheduler::error::AppError;
use academic_scheduler::models::{Classroom, NewTimetableRequest, TimetableEntryRequest};
use academic_scheduler::services::TimetableService;
use common::*;

fn week(fx: &Fixture, room_slots: &[(&Classroom, &str)]) -> Vec<TimetableEntryRequest> {
    room_slots
        .iter()
        .map(|(room, slot)| entry_request(fx, room, slot))
        .collect()
}

#[tokio::test]
async fn creates_timetable_with_entries_in_order() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let service = TimetableService::new(db.clone(), locks());

    let timetable = service
        .create_timetable(NewTimetableRequest {
            title: "Semester 1".to_string(),
            entries: week(
                &fx,
                &[
                    (&fx.room, "Monday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Monday 10:00 AM - 11:00 AM"),
                    (&fx.room, "Tuesday 09:00 AM - 10:00 AM"),
                    (&fx.other_room, "Monday 09:00 AM - 10:00 AM"),
                ],
            ),
        })
        .await
        .expect("timetable is created");

    assert_eq!(timetable.entries.len(), 4);
    assert_eq!(timetable.entries[0].time_slot.to_string(), "Monday 09:00 AM - 10:00 AM");
    assert_eq!(timetable.entries[2].time_slot.to_string(), "Tuesday 09:00 AM - 10:00 AM");

    let stored = service.get("Semester 1").await.expect("timetable is stored");
    let slots: Vec<String> = stored.entries.iter().map(|e| e.time_slot.to_string()).collect();
    let created: Vec<String> = timetable.entries.iter().map(|e| e.time_slot.to_string()).collect();
    assert_eq!(slots, created);

    assert_eq!(service.titles().await.expect("titles"), vec!["Semester 1".to_string()]);
}

#[tokio::test]
async fn fewer_than_four_entries_is_rejected() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let service = TimetableService::new(db.clone(), locks());

    let result = service
        .create_timetable(NewTimetableRequest {
            title: "Too short".to_string(),
            entries: week(
                &fx,
                &[
                    (&fx.room, "Monday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Tuesday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Wednesday 09:00 AM - 10:00 AM"),
                ],
            ),
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(service.list().await.expect("list").is_empty());
}

#[tokio::test]
async fn clash_inside_one_request_creates_nothing() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let service = TimetableService::new(db.clone(), locks());

    let result = service
        .create_timetable(NewTimetableRequest {
            title: "Clashing".to_string(),
            entries: week(
                &fx,
                &[
                    (&fx.room, "Monday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Tuesday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Wednesday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Monday 09:30 AM - 10:30 AM"),
                ],
            ),
        })
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert!(service.titles().await.expect("titles").is_empty());
}

#[tokio::test]
async fn entries_conflict_across_timetables() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let service = TimetableService::new(db.clone(), locks());

    let first = service
        .create_timetable(NewTimetableRequest {
            title: "Year 1".to_string(),
            entries: week(
                &fx,
                &[
                    (&fx.room, "Monday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Tuesday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Wednesday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Thursday 09:00 AM - 10:00 AM"),
                ],
            ),
        })
        .await
        .expect("first timetable is created");

    let result = service
        .create_timetable(NewTimetableRequest {
            title: "Year 2".to_string(),
            entries: week(
                &fx,
                &[
                    (&fx.other_room, "Monday 09:00 AM - 10:00 AM"),
                    (&fx.other_room, "Tuesday 09:00 AM - 10:00 AM"),
                    (&fx.other_room, "Wednesday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Thursday 09:30 AM - 11:00 AM"),
                ],
            ),
        })
        .await;

    match result {
        Err(AppError::Conflict(conflict)) => {
            assert_eq!(conflict.booking_id, first.entries[3].id);
            assert_eq!(conflict.day, "Thursday");
        }
        other => panic!("expected a conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn duplicate_title_is_a_uniqueness_error() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let service = TimetableService::new(db.clone(), locks());

    let request = |rooms: &[(&Classroom, &str)]| NewTimetableRequest {
        title: "Semester 1".to_string(),
        entries: week(&fx, rooms),
    };

    service
        .create_timetable(request(&[
            (&fx.room, "Monday 09:00 AM - 10:00 AM"),
            (&fx.room, "Tuesday 09:00 AM - 10:00 AM"),
            (&fx.room, "Wednesday 09:00 AM - 10:00 AM"),
            (&fx.room, "Thursday 09:00 AM - 10:00 AM"),
        ]))
        .await
        .expect("first timetable is created");

    let again = service
        .create_timetable(request(&[
            (&fx.other_room, "Monday 09:00 AM - 10:00 AM"),
            (&fx.other_room, "Tuesday 09:00 AM - 10:00 AM"),
            (&fx.other_room, "Wednesday 09:00 AM - 10:00 AM"),
            (&fx.other_room, "Thursday 09:00 AM - 10:00 AM"),
        ]))
        .await;
    assert!(matches!(again, Err(AppError::Uniqueness(_))));
}

#[tokio::test]
async fn malformed_slot_names_the_entry() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let service = TimetableService::new(db.clone(), locks());

    let result = service
        .create_timetable(NewTimetableRequest {
            title: "Typo".to_string(),
            entries: week(
                &fx,
                &[
                    (&fx.room, "Monday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Funday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Wednesday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Thursday 09:00 AM - 10:00 AM"),
                ],
            ),
        })
        .await;

    match result {
        Err(AppError::Validation(msg)) => assert!(msg.starts_with("entry 2:"), "{msg}"),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn entry_edits_check_conflicts_and_refresh_the_timetable() {
    let db = setup_db().await;
    let fx = seed(&db).await;
    let service = TimetableService::new(db.clone(), locks());

    let timetable = service
        .create_timetable(NewTimetableRequest {
            title: "Semester 1".to_string(),
            entries: week(
                &fx,
                &[
                    (&fx.room, "Monday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Tuesday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Wednesday 09:00 AM - 10:00 AM"),
                    (&fx.room, "Thursday 09:00 AM - 10:00 AM"),
                ],
            ),
        })
        .await
        .expect("timetable is created");

    let added = service
        .add_entry("Semester 1", entry_request(&fx, &fx.room, "Friday 02:00 PM - 03:00 PM"))
        .await
        .expect("free slot is added");
    assert_eq!(added.entries.len(), 5);
    assert_eq!(added.entries[4].time_slot.to_string(), "Friday 02:00 PM - 03:00 PM");

    let clash = service
        .add_entry("Semester 1", entry_request(&fx, &fx.room, "Monday 09:30 AM - 10:30 AM"))
        .await;
    assert!(matches!(clash, Err(AppError::Conflict(_))));

    let monday = &timetable.entries[0].id;
    let moved = service
        .update_entry("Semester 1", monday, entry_request(&fx, &fx.room, "Monday 09:30 AM - 10:30 AM"))
        .await
        .expect("entry may overlap its own old slot");
    assert_eq!(moved.entries[0].time_slot.to_string(), "Monday 09:30 AM - 10:30 AM");

    let onto_tuesday = service
        .update_entry("Semester 1", monday, entry_request(&fx, &fx.room, "Tuesday 09:00 AM - 09:30 AM"))
        .await;
    assert!(matches!(onto_tuesday, Err(AppError::Conflict(_))));

    let trimmed = service.delete_entry("Semester 1", monday).await.expect("entry is deleted");
    assert_eq!(trimmed.entries.len(), 4);
    assert!(matches!(
        service.delete_entry("Semester 1", monday).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.add_entry("Missing", entry_request(&fx, &fx.room, "Friday 09:00 AM - 10:00 AM")).await,
        Err(AppError::NotFound(_))
    ));
}
