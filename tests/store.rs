//! Persistence-layer tests against an in-memory SQLite database with the
//! real migrations applied.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use nailspa::auth::new_id;
use nailspa::calendar;
use nailspa::status::AppointmentStatus;
use nailspa::store::appointments::StatusOutcome;
use nailspa::store::{appointments, catalog, clients, goals, manicurists, scheduling};
use nailspa::validate::{
    AppointmentInput, AppointmentServiceInput, AvailabilityEntry, ClientInput, ManicuristInput,
    SalesGoalInput, ScheduleEntry, ServiceInput, SpaScheduleEntry,
};

async fn setup() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    nailspa::db::run_migrations(&pool).await.expect("migrations");
    pool
}

async fn create_spa(pool: &SqlitePool, name: &str) -> String {
    let id = new_id();
    sqlx::query("INSERT INTO spas (id, name, created_at) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind("2024-01-01T00:00:00+00:00")
        .execute(pool)
        .await
        .expect("insert spa");
    id
}

fn client_input(name: &str) -> ClientInput {
    ClientInput {
        name: name.to_string(),
        phone: "3001234567".to_string(),
        email: None,
        notes: None,
    }
}

fn manicurist_input(name: &str) -> ManicuristInput {
    ManicuristInput {
        name: name.to_string(),
        phone: None,
        email: None,
        active: true,
    }
}

fn schedule_entry(day: i64, start: &str, end: &str) -> ScheduleEntry {
    ScheduleEntry {
        day_of_week: day,
        start_time: start.to_string(),
        end_time: end.to_string(),
        is_active: true,
    }
}

fn service_input(name: &str, price: i64) -> ServiceInput {
    ServiceInput {
        name: name.to_string(),
        description: None,
        price,
        duration_minutes: 45,
        active: true,
    }
}

#[tokio::test]
async fn update_and_delete_ignore_foreign_tenant_rows() {
    let pool = setup().await;
    let spa_a = create_spa(&pool, "Spa A").await;
    let spa_b = create_spa(&pool, "Spa B").await;

    let client = clients::create(&pool, &spa_a, &client_input("Laura"))
        .await
        .expect("create client");

    let updated = clients::update(&pool, &spa_b, &client.id, &client_input("Hacked"))
        .await
        .expect("update call");
    assert!(updated.is_none());

    let deleted = clients::delete(&pool, &spa_b, &client.id).await.expect("delete call");
    assert!(!deleted);

    // The row is untouched and invisible to the other tenant.
    let seen_by_a = clients::get(&pool, &spa_a, &client.id).await.expect("get");
    assert_eq!(seen_by_a.expect("still there").name, "Laura");
    let seen_by_b = clients::get(&pool, &spa_b, &client.id).await.expect("get");
    assert!(seen_by_b.is_none());
}

#[tokio::test]
async fn schedules_of_foreign_manicurist_are_not_found() {
    let pool = setup().await;
    let spa_a = create_spa(&pool, "Spa A").await;
    let spa_b = create_spa(&pool, "Spa B").await;

    let manicurist = manicurists::create(&pool, &spa_a, &manicurist_input("Sofía"))
        .await
        .expect("create manicurist");
    scheduling::replace_schedules(&pool, &spa_a, &manicurist.id, &[schedule_entry(0, "09:00", "18:00")])
        .await
        .expect("replace")
        .expect("owned");

    let foreign = scheduling::replace_schedules(
        &pool,
        &spa_b,
        &manicurist.id,
        &[schedule_entry(0, "10:00", "11:00")],
    )
    .await
    .expect("replace call");
    assert!(foreign.is_none());

    let rows = scheduling::schedules_for(&pool, &spa_a, &manicurist.id)
        .await
        .expect("list")
        .expect("owned");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].start_time, "09:00");

    assert!(scheduling::schedules_for(&pool, &spa_b, &manicurist.id)
        .await
        .expect("list")
        .is_none());
}

#[tokio::test]
async fn replace_schedules_is_idempotent_and_diffs_by_day() {
    let pool = setup().await;
    let spa = create_spa(&pool, "Spa").await;
    let manicurist = manicurists::create(&pool, &spa, &manicurist_input("Valentina"))
        .await
        .expect("create manicurist");

    let entries = vec![schedule_entry(0, "09:00", "18:00"), schedule_entry(3, "10:00", "16:00")];
    let first = scheduling::replace_schedules(&pool, &spa, &manicurist.id, &entries)
        .await
        .expect("replace")
        .expect("owned");
    assert_eq!(first.len(), 2);

    let second = scheduling::replace_schedules(&pool, &spa, &manicurist.id, &entries)
        .await
        .expect("replace")
        .expect("owned");
    assert_eq!(second.len(), 2);
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.day_of_week, b.day_of_week);
        assert_eq!(a.start_time, b.start_time);
        assert_eq!(a.end_time, b.end_time);
    }

    // Change Thursday's hours, drop Monday, add Friday.
    let reshaped = vec![schedule_entry(3, "11:00", "15:00"), schedule_entry(4, "09:00", "13:00")];
    let third = scheduling::replace_schedules(&pool, &spa, &manicurist.id, &reshaped)
        .await
        .expect("replace")
        .expect("owned");
    assert_eq!(third.len(), 2);

    let thursday = third.iter().find(|row| row.day_of_week == 3).expect("thursday");
    assert_eq!(thursday.start_time, "11:00");
    // An in-place update keeps the row id.
    let old_thursday = first.iter().find(|row| row.day_of_week == 3).unwrap();
    assert_eq!(thursday.id, old_thursday.id);
    assert!(third.iter().all(|row| row.day_of_week != 0));
}

fn spa_entry(day: i64, start: &str, end: &str, specific_date: Option<&str>) -> SpaScheduleEntry {
    SpaScheduleEntry {
        day_of_week: day,
        start_time: start.to_string(),
        end_time: end.to_string(),
        is_active: true,
        is_holiday: specific_date.is_some(),
        specific_date: specific_date.map(str::to_string),
    }
}

#[tokio::test]
async fn replace_spa_schedules_diffs_by_day_and_specific_date() {
    let pool = setup().await;
    let spa = create_spa(&pool, "Spa").await;

    // A weekly Wednesday block and a Christmas holiday row share the
    // same weekday but are distinct entries.
    let entries = vec![
        spa_entry(0, "09:00", "18:00", None),
        spa_entry(2, "09:00", "18:00", None),
        spa_entry(2, "09:00", "12:00", Some("2024-12-25")),
    ];
    let first = scheduling::replace_spa_schedules(&pool, &spa, &entries)
        .await
        .expect("replace");
    assert_eq!(first.len(), 3);
    let holiday = first
        .iter()
        .find(|row| row.specific_date.as_deref() == Some("2024-12-25"))
        .expect("holiday row");
    assert_eq!(holiday.is_holiday, 1);
    assert_eq!(holiday.end_time, "12:00");

    // Replaying the same input keeps every row and id.
    let second = scheduling::replace_spa_schedules(&pool, &spa, &entries)
        .await
        .expect("replace");
    assert_eq!(second.len(), 3);
    for row in &first {
        assert!(second.iter().any(|other| other.id == row.id));
    }

    // Shorten the holiday, drop Monday: the holiday row updates in
    // place, the plain Wednesday block survives untouched.
    let reshaped = vec![
        spa_entry(2, "09:00", "18:00", None),
        spa_entry(2, "10:00", "11:00", Some("2024-12-25")),
    ];
    let third = scheduling::replace_spa_schedules(&pool, &spa, &reshaped)
        .await
        .expect("replace");
    assert_eq!(third.len(), 2);
    assert!(third.iter().all(|row| row.day_of_week == 2));
    let updated_holiday = third
        .iter()
        .find(|row| row.specific_date.as_deref() == Some("2024-12-25"))
        .expect("holiday row");
    assert_eq!(updated_holiday.id, holiday.id);
    assert_eq!(updated_holiday.start_time, "10:00");

    // Spa hours belong to their tenant only.
    let other_spa = create_spa(&pool, "Otro").await;
    assert!(scheduling::spa_schedules(&pool, &other_spa)
        .await
        .expect("list")
        .is_empty());
}

#[tokio::test]
async fn availability_overrides_store_times_only_when_available() {
    let pool = setup().await;
    let spa = create_spa(&pool, "Spa").await;
    let manicurist = manicurists::create(&pool, &spa, &manicurist_input("Camila"))
        .await
        .expect("create manicurist");

    let entries = vec![
        AvailabilityEntry {
            date: "2024-07-15".to_string(),
            is_available: false,
            // Sent by a sloppy client; a full-day absence drops them.
            start_time: Some("09:00".to_string()),
            end_time: Some("12:00".to_string()),
            reason: Some("Vacaciones".to_string()),
        },
        AvailabilityEntry {
            date: "2024-07-20".to_string(),
            is_available: true,
            start_time: Some("10:00".to_string()),
            end_time: Some("14:00".to_string()),
            reason: None,
        },
    ];

    let rows = scheduling::replace_availability(&pool, &spa, &manicurist.id, &entries)
        .await
        .expect("replace")
        .expect("owned");
    assert_eq!(rows.len(), 2);

    let absence = rows.iter().find(|row| row.date == "2024-07-15").unwrap();
    assert_eq!(absence.is_available, 0);
    assert!(absence.start_time.is_none());
    assert!(absence.end_time.is_none());
    assert_eq!(absence.reason.as_deref(), Some("Vacaciones"));

    let special = rows.iter().find(|row| row.date == "2024-07-20").unwrap();
    assert_eq!(special.is_available, 1);
    assert_eq!(special.start_time.as_deref(), Some("10:00"));

    // Removing the absence keeps only the special-hours row, same id.
    let rows = scheduling::replace_availability(&pool, &spa, &manicurist.id, &entries[1..])
        .await
        .expect("replace")
        .expect("owned");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, special.id);
}

async fn appointment_fixture(
    pool: &SqlitePool,
    spa: &str,
    prices: &[i64],
    scheduled_at: &str,
) -> String {
    let client = clients::create(pool, spa, &client_input("Ana")).await.expect("client");
    let manicurist = manicurists::create(pool, spa, &manicurist_input("Paula"))
        .await
        .expect("manicurist");

    let mut services = Vec::new();
    for (index, price) in prices.iter().enumerate() {
        let service = catalog::create_service(pool, spa, &service_input(&format!("Servicio {index}"), *price))
            .await
            .expect("service");
        services.push(AppointmentServiceInput {
            service_id: service.id,
            manicurist_id: manicurist.id.clone(),
            price: *price,
        });
    }

    let input = AppointmentInput {
        client_id: client.id,
        manicurist_id: Some(manicurist.id.clone()),
        scheduled_at: scheduled_at.to_string(),
        payment_method_id: None,
        notes: None,
        services,
    };

    appointments::create(pool, spa, &input)
        .await
        .expect("create")
        .expect("references owned")
        .id
}

#[tokio::test]
async fn appointment_total_sums_line_items() {
    let pool = setup().await;
    let spa = create_spa(&pool, "Spa").await;
    let appointment_id =
        appointment_fixture(&pool, &spa, &[20_000, 15_000, 0], "2024-06-10T09:30").await;

    let services = appointments::services_of(&pool, &appointment_id).await.expect("services");
    assert_eq!(services.len(), 3);
    assert_eq!(calendar::appointment_total(&services), 35_000);
}

#[tokio::test]
async fn appointment_referencing_foreign_client_is_rejected() {
    let pool = setup().await;
    let spa_a = create_spa(&pool, "Spa A").await;
    let spa_b = create_spa(&pool, "Spa B").await;

    let foreign_client = clients::create(&pool, &spa_a, &client_input("Laura")).await.expect("client");

    let input = AppointmentInput {
        client_id: foreign_client.id,
        manicurist_id: None,
        scheduled_at: "2024-06-10T09:30".to_string(),
        payment_method_id: None,
        notes: None,
        services: vec![],
    };

    let created = appointments::create(&pool, &spa_b, &input).await.expect("create call");
    assert!(created.is_none());
    assert!(appointments::list(&pool, &spa_b, None).await.expect("list").is_empty());
}

#[tokio::test]
async fn status_machine_is_enforced_on_write() {
    let pool = setup().await;
    let spa = create_spa(&pool, "Spa").await;
    let id = appointment_fixture(&pool, &spa, &[30_000], "2024-06-10T09:30").await;

    // Skipping straight to completed is rejected.
    match appointments::set_status(&pool, &spa, &id, AppointmentStatus::Completed)
        .await
        .expect("call")
    {
        StatusOutcome::Illegal { from } => assert_eq!(from, AppointmentStatus::Scheduled),
        other => panic!("expected illegal transition, got {other:?}"),
    }

    for next in [
        AppointmentStatus::Confirmed,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
    ] {
        match appointments::set_status(&pool, &spa, &id, next).await.expect("call") {
            StatusOutcome::Updated(row) => assert_eq!(row.status, next.as_str()),
            other => panic!("expected update to {next}, got {other:?}"),
        }
    }

    // Completed is terminal; reviving the appointment is rejected.
    match appointments::set_status(&pool, &spa, &id, AppointmentStatus::Scheduled)
        .await
        .expect("call")
    {
        StatusOutcome::Illegal { from } => assert_eq!(from, AppointmentStatus::Completed),
        other => panic!("expected illegal transition, got {other:?}"),
    }

    // And invisible to another tenant.
    let other_spa = create_spa(&pool, "Otro").await;
    match appointments::set_status(&pool, &other_spa, &id, AppointmentStatus::Confirmed)
        .await
        .expect("call")
    {
        StatusOutcome::NotFound => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[tokio::test]
async fn goal_progress_counts_completed_appointments_in_month() {
    let pool = setup().await;
    let spa = create_spa(&pool, "Spa").await;

    let in_month = appointment_fixture(&pool, &spa, &[40_000, 10_000], "2024-06-10T09:30").await;
    let other_month = appointment_fixture(&pool, &spa, &[99_000], "2024-07-01T09:30").await;

    for id in [&in_month, &other_month] {
        for next in [
            AppointmentStatus::Confirmed,
            AppointmentStatus::InProgress,
            AppointmentStatus::Completed,
        ] {
            appointments::set_status(&pool, &spa, id, next).await.expect("status");
        }
    }

    // Still-scheduled revenue must not count.
    appointment_fixture(&pool, &spa, &[77_000], "2024-06-11T10:00").await;

    assert_eq!(
        goals::achieved_amount(&pool, &spa, 2024, 6).await.expect("achieved"),
        50_000
    );

    let goal = goals::upsert(
        &pool,
        &spa,
        &SalesGoalInput { year: 2024, month: 6, target_amount: 200_000 },
    )
    .await
    .expect("upsert");
    let progress = goals::progress(&pool, &spa, goal.clone()).await.expect("progress");
    assert_eq!(progress.achieved_amount, 50_000);
    assert_eq!(progress.percent, 25);

    // Upserting the same month overwrites the target, no second row.
    let goal_again = goals::upsert(
        &pool,
        &spa,
        &SalesGoalInput { year: 2024, month: 6, target_amount: 100_000 },
    )
    .await
    .expect("upsert");
    assert_eq!(goal_again.id, goal.id);
    assert_eq!(goal_again.target_amount, 100_000);
    assert_eq!(goals::list(&pool, &spa).await.expect("list").len(), 1);
}

#[tokio::test]
async fn deleting_appointment_removes_line_items() {
    let pool = setup().await;
    let spa = create_spa(&pool, "Spa").await;
    let id = appointment_fixture(&pool, &spa, &[20_000], "2024-06-10T09:30").await;

    assert!(appointments::delete(&pool, &spa, &id).await.expect("delete"));
    assert!(appointments::services_of(&pool, &id).await.expect("services").is_empty());
    assert!(!appointments::delete(&pool, &spa, &id).await.expect("second delete"));
}

#[tokio::test]
async fn week_listing_feeds_the_calendar() {
    let pool = setup().await;
    let spa = create_spa(&pool, "Spa").await;

    appointment_fixture(&pool, &spa, &[10_000], "2024-01-01T09:30").await;
    appointment_fixture(&pool, &spa, &[10_000], "2024-01-01T10:15").await;
    appointment_fixture(&pool, &spa, &[10_000], "2024-01-08T09:00").await;

    let rows = appointments::list_between(&pool, &spa, "2024-01-01T00:00", "2024-01-08T00:00")
        .await
        .expect("list");
    assert_eq!(rows.len(), 2);

    let monday = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let grid = calendar::bucket_week(&rows, monday);
    let first_day = &grid.days[0];
    let nine: &_ = first_day.hours.iter().find(|cell| cell.hour == 9).unwrap();
    let ten: &_ = first_day.hours.iter().find(|cell| cell.hour == 10).unwrap();
    assert_eq!(nine.appointments.len(), 1);
    assert_eq!(ten.appointments.len(), 1);
}
