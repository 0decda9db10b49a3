use serde::Serialize;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANICURIST: &str = "manicurist";

#[allow(dead_code)]
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub spa_id: String,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub password_hash: String,
    pub active: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ClientRow {
    pub id: String,
    pub spa_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ManicuristRow {
    pub id: String,
    pub spa_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub active: i64,
    pub created_at: String,
}

/// One recurring weekly working block. Day 0 is Monday.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ScheduleRow {
    pub id: String,
    pub manicurist_id: String,
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    pub is_active: i64,
}

/// Date-specific override of the weekly schedule. When `is_available`
/// is 0 the manicurist is out for the whole day; when 1 the times
/// replace the weekly block for that date.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AvailabilityRow {
    pub id: String,
    pub manicurist_id: String,
    pub date: String,
    pub is_available: i64,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SpaScheduleRow {
    pub id: String,
    pub spa_id: String,
    pub day_of_week: i64,
    pub start_time: String,
    pub end_time: String,
    pub is_active: i64,
    pub is_holiday: i64,
    pub specific_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ServiceRow {
    pub id: String,
    pub spa_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub duration_minutes: i64,
    pub active: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PaymentMethodRow {
    pub id: String,
    pub spa_id: String,
    pub name: String,
    pub active: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AppointmentRow {
    pub id: String,
    pub spa_id: String,
    pub client_id: String,
    pub client_name: Option<String>,
    pub manicurist_id: Option<String>,
    pub manicurist_name: Option<String>,
    pub scheduled_at: String,
    pub status: String,
    pub payment_method_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

/// One line item within an appointment: a service performed by a
/// manicurist at the price agreed when the appointment was taken.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AppointmentServiceRow {
    pub id: String,
    pub appointment_id: String,
    pub service_id: String,
    pub service_name: Option<String>,
    pub manicurist_id: String,
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SalesGoalRow {
    pub id: String,
    pub spa_id: String,
    pub year: i64,
    pub month: i64,
    pub target_amount: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ActivityRow {
    pub message: String,
    pub created_at: String,
}
